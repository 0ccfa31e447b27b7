//! RackForge Record Library
//!
//! This crate provides the data model, schema validation, normalization, and
//! hashing for RackForge Eurorack module designs. Records arrive as raw JSON
//! (from the panel editor, project files, or generation forms) and leave as
//! canonical typed values.
//!
//! # Overview
//!
//! - **Modules**: panel dimensions in HP and mm, per-rail power draw, control
//!   placements as panel percentages, reference images
//! - **Projects**: an ordered list of modules in a rack with a power supply
//! - **Generation requests**: inputs for a 3D generation backend
//!
//! Every record kind is described by a declarative [`schema::Schema`] built
//! from a [`LimitsProfile`] and checked by one interpreter. All violations are
//! collected, never just the first.
//!
//! # Example
//!
//! ```
//! use rackforge_spec::{EntityKind, LimitsProfile, Record, SpecValidator};
//! use serde_json::json;
//!
//! let validator = SpecValidator::new(LimitsProfile::default()).unwrap();
//! let raw = json!({
//!     "name": " Dual LFO ",
//!     "width": 6,
//!     "height": 128.5,
//!     "depth": 24,
//!     "controls": [{"type": "knob", "x": 50, "y": 25}]
//! });
//!
//! let validated = validator.validate_and_normalize(EntityKind::Module, &raw).unwrap();
//! assert!(validated.errors().is_empty());
//!
//! let Some(Record::Module(module)) = validated.record else { unreachable!() };
//! assert_eq!(module.name, "Dual LFO");
//! assert!((module.hp_width - 30.48).abs() < 1e-9);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error codes, validation results, fatal error types
//! - [`limits`]: Limits profiles (`default`, `strict`, `skiff`)
//! - [`module`], [`project`], [`generation`]: Record types
//! - [`schema`]: Rule definitions and the interpreter
//! - [`validation`]: The validator, schemas, and normalization
//! - [`service`]: Project lifecycle operations
//! - [`editor`]: Panel editing with coordinate clamping
//! - [`context`]: Injected clock and id sources
//! - [`hash`]: Canonical JSON and BLAKE3 hashes

pub mod context;
pub mod editor;
pub mod error;
pub mod generation;
pub mod hash;
pub mod limits;
pub mod module;
pub mod project;
pub mod schema;
pub mod service;
pub mod validation;

// Re-export commonly used types at the crate root
pub use context::{Clock, IdGenerator, ManualClock, SystemClock};
pub use editor::{clamp_percent, EditorError, EditorMode, PanelEditor};
pub use error::{
    ErrorCode, SchemaError, SpecError, ValidationError, ValidationResult, ValidationWarning,
    WarningCode,
};
pub use generation::{Dimensions, GenerationRequest, InputType, QualityPreset};
pub use hash::{canonical_hash, canonical_record_hash, canonical_value_hash};
pub use limits::{Bounds, LimitsProfile};
pub use module::{ControlPlacement, ControlType, ImageRef, ModuleSpec, PowerRails, Rail, HP_MM};
pub use project::{is_valid_project_id, IdentityError, ProjectMetadata, ProjectSpec, RackSpec};
pub use service::{ProjectError, ProjectOutcome, ProjectService};
pub use validation::{EntityKind, Record, SchemaRegistry, SpecValidator, Validated};
