//! Error types for record validation and processing.

use thiserror::Error;

use crate::limits::Bounds;
use crate::validation::EntityKind;

/// Error codes for rule violations found while validating a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// V001: Required field is absent or null
    MissingField,
    /// V002: Field value has the wrong primitive type
    TypeMismatch,
    /// V003: Field value is not one of the allowed values
    InvalidEnum,
    /// V004: Text or sequence length out of range
    LengthOutOfRange,
    /// V005: Numeric value out of range
    NumericOutOfRange,
    /// V006: A custom rule rejected the value
    CustomValidationFailure,
    /// V007: A nested record (array element or sub-object) is invalid
    NestedEntityInvalid,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "V001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::MissingField => "V001",
            ErrorCode::TypeMismatch => "V002",
            ErrorCode::InvalidEnum => "V003",
            ErrorCode::LengthOutOfRange => "V004",
            ErrorCode::NumericOutOfRange => "V005",
            ErrorCode::CustomValidationFailure => "V006",
            ErrorCode::NestedEntityInvalid => "V007",
        }
    }

    /// Returns the variant name as used in diagnostics (e.g., "MissingField").
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::MissingField => "MissingField",
            ErrorCode::TypeMismatch => "TypeMismatch",
            ErrorCode::InvalidEnum => "InvalidEnum",
            ErrorCode::LengthOutOfRange => "LengthOutOfRange",
            ErrorCode::NumericOutOfRange => "NumericOutOfRange",
            ErrorCode::CustomValidationFailure => "CustomValidationFailure",
            ErrorCode::NestedEntityInvalid => "NestedEntityInvalid",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Warning codes. Warnings never make a record invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W001: Project has no description
    MissingDescription,
    /// W002: Summed module draw exceeds the rack supply on a rail
    RailOverCapacity,
    /// W003: Summed module width exceeds the rack width
    RackOverfull,
    /// W004: Two controls share the same panel position
    StackedControls,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::MissingDescription => "W001",
            WarningCode::RailOverCapacity => "W002",
            WarningCode::RackOverfull => "W003",
            WarningCode::StackedControls => "W004",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, optional JSON path, and the
/// errors of a nested record when `code` is [`ErrorCode::NestedEntityInvalid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// JSON path to the problematic field (e.g., "modules\[0\].width").
    pub path: Option<String>,
    /// Errors found inside a nested record.
    pub details: Vec<ValidationError>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            details: Vec::new(),
        }
    }

    /// Creates a new validation error with a JSON path.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
            details: Vec::new(),
        }
    }

    /// Attaches the errors of a nested record.
    pub fn with_details(mut self, details: Vec<ValidationError>) -> Self {
        self.details = details;
        self
    }

    /// Re-roots this error (and its details) under `prefix`.
    pub fn prefixed(mut self, prefix: &str) -> Self {
        self.path = Some(join_path(prefix, self.path.as_deref()));
        self.details = self
            .details
            .into_iter()
            .map(|d| d.prefixed(prefix))
            .collect();
        self
    }

    /// Iterates over this error and every nested detail, depth first.
    pub fn flatten(&self) -> Vec<&ValidationError> {
        let mut out = vec![self];
        for detail in &self.details {
            out.extend(detail.flatten());
        }
        out
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validation warning with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The warning code.
    pub code: WarningCode,
    /// Human-readable warning message.
    pub message: String,
    /// JSON path to the problematic field.
    pub path: Option<String>,
}

impl ValidationWarning {
    /// Creates a new validation warning.
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation warning with a JSON path.
    pub fn with_path(
        code: WarningCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Re-roots this warning under `prefix`.
    pub fn prefixed(mut self, prefix: &str) -> Self {
        self.path = Some(join_path(prefix, self.path.as_deref()));
        self
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

fn join_path(prefix: &str, path: Option<&str>) -> String {
    match path {
        None | Some("") => prefix.to_string(),
        Some(p) if p.starts_with('[') => format!("{}{}", prefix, p),
        Some(p) => format!("{}.{}", prefix, p),
    }
}

/// Programmer/contract errors raised by the validation engine.
///
/// Rule violations are never reported through this type; they are returned
/// as data inside a [`ValidationResult`].
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A rule set is internally inconsistent.
    #[error("malformed schema '{schema}': field '{field}': {reason}")]
    MalformedRule {
        schema: String,
        field: String,
        reason: String,
    },

    /// The same field is declared twice.
    #[error("malformed schema '{schema}': duplicate field '{field}'")]
    DuplicateField { schema: String, field: String },

    /// An entity kind name was not recognized.
    #[error("unknown entity kind: {0}")]
    UnknownEntityKind(String),

    /// No schema is registered for an entity kind.
    #[error("no schema registered for entity kind '{0}'")]
    MissingSchema(EntityKind),

    /// A range on a field that normalization rounds has a fractional end.
    #[error("limits profile '{profile}': {field} must have whole-number bounds, got {bounds}")]
    FractionalBound {
        profile: String,
        field: String,
        bounds: Bounds,
    },

    /// A record passed its schema but could not be decoded into its typed form.
    #[error("record for '{kind}' passed validation but does not match its typed shape: {source}")]
    RecordShape {
        kind: EntityKind,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level error type for record I/O and configuration.
#[derive(Debug, Error)]
pub enum SpecError {
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Schema/contract error.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Unknown limits profile name.
    #[error("unknown limits profile: {0}")]
    UnknownProfile(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of record validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of validation warnings.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Creates a successful validation result.
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a failed validation result.
    pub fn failure(errors: Vec<ValidationError>) -> Self {
        Self {
            errors,
            warnings: Vec::new(),
        }
    }

    /// Adds an error to the result.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Adds a warning to the result.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Appends every error and warning of `other`.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error messages in discovery order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    /// Converts to a Result, returning Err if there are errors.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, Vec<ValidationError>> {
        if self.is_ok() {
            Ok(self.warnings)
        } else {
            Err(self.errors)
        }
    }
}
