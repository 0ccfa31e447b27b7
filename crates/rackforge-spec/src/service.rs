//! Project lifecycle: create, update, add and remove modules.
//!
//! Every operation validates the complete candidate project before anything
//! is returned, so callers only ever hold projects that passed validation.
//! Updates keep `id` and `createdAt`, bump `version` by exactly one, and never
//! move `updatedAt` backwards.

use serde_json::Value;
use thiserror::Error;

use crate::error::{SchemaError, ValidationError, ValidationWarning};
use crate::module::ModuleSpec;
use crate::project::{IdentityError, ProjectSpec};
use crate::validation::SpecValidator;

/// Errors from project lifecycle operations.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// The candidate project failed validation.
    #[error("project is invalid ({} error(s))", .0.len())]
    Invalid(Vec<ValidationError>),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Removing the module would leave the project empty.
    #[error("cannot remove the last module of a project")]
    LastModule,

    #[error("module index {index} out of range (project has {len} modules)")]
    ModuleIndex { index: usize, len: usize },

    /// The existing project's id or metadata is not system-shaped.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// The existing project is already at the highest representable version.
    #[error("project '{id}' cannot be revised past version {}", u32::MAX)]
    VersionOverflow { id: String },

    #[error("failed to serialize project: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A validated project plus any advisory warnings.
#[derive(Debug, Clone)]
pub struct ProjectOutcome {
    pub project: ProjectSpec,
    pub warnings: Vec<ValidationWarning>,
}

/// Creates and revises projects through a [`SpecValidator`].
///
/// The validator's clock and id generator drive timestamps and ids.
#[derive(Debug, Clone)]
pub struct ProjectService {
    validator: SpecValidator,
}

impl ProjectService {
    pub fn new(validator: SpecValidator) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &SpecValidator {
        &self.validator
    }

    /// Validates `raw` and creates a new project at version 1.
    pub fn create(&self, raw: &Value) -> Result<ProjectOutcome, ProjectError> {
        let validated = self.validator.project(raw)?;
        let warnings = validated.result.warnings.clone();
        let project = validated.into_result().map_err(ProjectError::Invalid)?;
        tracing::info!(id = %project.id, modules = project.modules.len(), "created project");
        Ok(ProjectOutcome { project, warnings })
    }

    /// Replaces the content of `existing` with `raw`.
    ///
    /// Fields in `raw` that only the system assigns (`id`, `metadata`) are
    /// ignored. `existing` must carry an assigned id and consistent metadata.
    pub fn update(&self, existing: &ProjectSpec, raw: &Value) -> Result<ProjectOutcome, ProjectError> {
        existing.check_identity()?;
        let metadata = existing
            .metadata
            .next(self.validator.clock().now())
            .ok_or_else(|| ProjectError::VersionOverflow {
                id: existing.id.clone(),
            })?;

        let validated = self.validator.project(raw)?;
        let warnings = validated.result.warnings.clone();
        let mut project = validated.into_result().map_err(ProjectError::Invalid)?;

        project.id = existing.id.clone();
        project.metadata = metadata;
        tracing::info!(
            id = %project.id,
            version = project.metadata.version,
            "updated project"
        );
        Ok(ProjectOutcome { project, warnings })
    }

    /// Appends a copy of `module` and revises the project.
    pub fn add_module(
        &self,
        existing: &ProjectSpec,
        module: &ModuleSpec,
    ) -> Result<ProjectOutcome, ProjectError> {
        let mut candidate = existing.clone();
        candidate.modules.push(module.clone());
        self.update(existing, &serde_json::to_value(&candidate)?)
    }

    /// Removes the module at `index` and revises the project.
    pub fn remove_module(
        &self,
        existing: &ProjectSpec,
        index: usize,
    ) -> Result<ProjectOutcome, ProjectError> {
        let len = existing.modules.len();
        if index >= len {
            return Err(ProjectError::ModuleIndex { index, len });
        }
        if len == 1 {
            return Err(ProjectError::LastModule);
        }
        let mut candidate = existing.clone();
        candidate.modules.remove(index);
        self.update(existing, &serde_json::to_value(&candidate)?)
    }
}
