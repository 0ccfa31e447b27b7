//! Schema-driven validation and normalization of raw records.
//!
//! [`SpecValidator`] is the single entry point. It owns one schema per
//! [`EntityKind`], built from a [`LimitsProfile`], and runs every raw record
//! through the shared rule interpreter. Records that pass are normalized into
//! their canonical typed form; records that fail come back with every
//! violation found, never just the first.

mod normalize;
pub mod schemas;
mod warnings;


use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::context::{Clock, IdGenerator, SystemClock};
use crate::error::{SchemaError, ValidationError, ValidationResult, ValidationWarning};
use crate::generation::GenerationRequest;
use crate::limits::LimitsProfile;
use crate::module::ModuleSpec;
use crate::project::ProjectSpec;
use crate::schema::{evaluate, Schema};

use normalize::{decode, GenerationInput, ModuleInput, NormalizeContext, ProjectInput};

/// The kinds of record the validator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Module,
    Project,
    Generation,
}

impl EntityKind {
    /// Returns the kind name used on the command line and in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Module => "module",
            EntityKind::Project => "project",
            EntityKind::Generation => "generation",
        }
    }

    /// All entity kinds.
    pub fn all() -> &'static [EntityKind] {
        &[EntityKind::Module, EntityKind::Project, EntityKind::Generation]
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownEntityKind(s.to_string()))
    }
}

/// Schemas keyed by entity kind.
///
/// Every schema is checked for well-formedness when it is registered, so a
/// registry never holds a malformed schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<EntityKind, Arc<Schema>>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the standard schemas for `limits`.
    pub fn from_limits(limits: &LimitsProfile) -> Result<Self, SchemaError> {
        limits.check()?;
        let mut registry = Self::new();
        registry.register(EntityKind::Module, schemas::module_schema(limits))?;
        registry.register(EntityKind::Project, schemas::project_schema(limits))?;
        registry.register(EntityKind::Generation, schemas::generation_schema(limits))?;
        Ok(registry)
    }

    /// Checks and registers a schema, replacing any previous one for `kind`.
    pub fn register(&mut self, kind: EntityKind, schema: Schema) -> Result<(), SchemaError> {
        schema.check()?;
        self.schemas.insert(kind, Arc::new(schema));
        Ok(())
    }

    /// Returns the schema for `kind`.
    pub fn get(&self, kind: EntityKind) -> Result<&Arc<Schema>, SchemaError> {
        self.schemas
            .get(&kind)
            .ok_or(SchemaError::MissingSchema(kind))
    }
}

/// A normalized record of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Module(ModuleSpec),
    Project(ProjectSpec),
    Generation(GenerationRequest),
}

impl Record {
    /// The kind of this record.
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Module(_) => EntityKind::Module,
            Record::Project(_) => EntityKind::Project,
            Record::Generation(_) => EntityKind::Generation,
        }
    }

    /// Serializes the record to its canonical JSON value.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            Record::Module(m) => serde_json::to_value(m),
            Record::Project(p) => serde_json::to_value(p),
            Record::Generation(g) => serde_json::to_value(g),
        }
    }
}

/// Outcome of validating one raw record.
///
/// `record` is present exactly when `result` has no errors.
#[derive(Debug, Clone)]
pub struct Validated<T> {
    pub record: Option<T>,
    pub result: ValidationResult,
}

impl<T> Validated<T> {
    fn valid(record: T, result: ValidationResult) -> Self {
        Self {
            record: Some(record),
            result,
        }
    }

    fn invalid(result: ValidationResult) -> Self {
        Self {
            record: None,
            result,
        }
    }

    /// Returns true if the record passed validation.
    pub fn is_ok(&self) -> bool {
        self.record.is_some()
    }

    /// Errors in discovery order.
    pub fn errors(&self) -> &[ValidationError] {
        &self.result.errors
    }

    /// Warnings in discovery order.
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.result.warnings
    }

    /// Maps the normalized record, keeping the result.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validated<U> {
        Validated {
            record: self.record.map(f),
            result: self.result,
        }
    }

    /// Returns the record, or the errors if validation failed.
    pub fn into_result(self) -> Result<T, Vec<ValidationError>> {
        match self.record {
            Some(record) => Ok(record),
            None => Err(self.result.errors),
        }
    }
}

/// Validates and normalizes raw module, project, and generation records.
///
/// Time and ids used during normalization come from the injected [`Clock`]
/// and [`IdGenerator`]; by default these are the system clock and a randomly
/// seeded generator.
#[derive(Clone)]
pub struct SpecValidator {
    limits: LimitsProfile,
    registry: SchemaRegistry,
    clock: Arc<dyn Clock>,
    ids: Arc<IdGenerator>,
}

impl fmt::Debug for SpecValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecValidator")
            .field("limits", &self.limits.name)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl SpecValidator {
    /// Creates a validator for the given limits.
    pub fn new(limits: LimitsProfile) -> Result<Self, SchemaError> {
        let registry = SchemaRegistry::from_limits(&limits)?;
        Ok(Self::with_registry(limits, registry))
    }

    /// Creates a validator around an explicit registry.
    pub fn with_registry(limits: LimitsProfile, registry: SchemaRegistry) -> Self {
        Self {
            limits,
            registry,
            clock: Arc::new(SystemClock),
            ids: Arc::new(IdGenerator::new()),
        }
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the id generator.
    pub fn with_ids(mut self, ids: Arc<IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn limits(&self) -> &LimitsProfile {
        &self.limits
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn ids(&self) -> &Arc<IdGenerator> {
        &self.ids
    }

    /// Runs only the schema for `kind`, without normalizing.
    pub fn validate(&self, kind: EntityKind, raw: &Value) -> Result<ValidationResult, SchemaError> {
        Ok(evaluate(self.registry.get(kind)?, raw))
    }

    /// Validates a raw record and, if it passes, normalizes it.
    pub fn validate_and_normalize(
        &self,
        kind: EntityKind,
        raw: &Value,
    ) -> Result<Validated<Record>, SchemaError> {
        let _span = tracing::debug_span!("validate", kind = %kind).entered();
        match kind {
            EntityKind::Module => Ok(self.module(raw)?.map(Record::Module)),
            EntityKind::Project => Ok(self.project(raw)?.map(Record::Project)),
            EntityKind::Generation => Ok(self.generation(raw)?.map(Record::Generation)),
        }
    }

    /// Like [`validate_and_normalize`](Self::validate_and_normalize) with the
    /// kind given by name.
    pub fn validate_named(&self, kind: &str, raw: &Value) -> Result<Validated<Record>, SchemaError> {
        self.validate_and_normalize(kind.parse()?, raw)
    }

    /// Validates and normalizes a module.
    pub fn module(&self, raw: &Value) -> Result<Validated<ModuleSpec>, SchemaError> {
        let mut result = self.checked(EntityKind::Module, raw)?;
        if !result.is_ok() {
            return Ok(Validated::invalid(result));
        }
        let module = decode::<ModuleInput>(EntityKind::Module, raw)?.normalize(&self.context());
        result.warnings.extend(warnings::module_warnings(&module));
        Ok(Validated::valid(module, result))
    }

    /// Validates and normalizes a project, assigning a fresh id and metadata.
    pub fn project(&self, raw: &Value) -> Result<Validated<ProjectSpec>, SchemaError> {
        let mut result = self.checked(EntityKind::Project, raw)?;
        if !result.is_ok() {
            return Ok(Validated::invalid(result));
        }
        let project = decode::<ProjectInput>(EntityKind::Project, raw)?.normalize(&self.context());
        result.warnings.extend(warnings::project_warnings(&project));
        Ok(Validated::valid(project, result))
    }

    /// Validates and normalizes a generation request.
    pub fn generation(&self, raw: &Value) -> Result<Validated<GenerationRequest>, SchemaError> {
        let result = self.checked(EntityKind::Generation, raw)?;
        if !result.is_ok() {
            return Ok(Validated::invalid(result));
        }
        let request = decode::<GenerationInput>(EntityKind::Generation, raw)?.normalize();
        Ok(Validated::valid(request, result))
    }

    fn checked(&self, kind: EntityKind, raw: &Value) -> Result<ValidationResult, SchemaError> {
        let result = self.validate(kind, raw)?;
        if result.is_ok() {
            tracing::debug!(kind = %kind, "record passed validation");
        } else {
            tracing::debug!(kind = %kind, errors = result.errors.len(), "record failed validation");
        }
        Ok(result)
    }

    fn context(&self) -> NormalizeContext<'_> {
        NormalizeContext {
            clock: self.clock.as_ref(),
            ids: self.ids.as_ref(),
        }
    }
}
