//! RackForge End-to-End Test Infrastructure
//!
//! This crate holds the integration tests that span more than one crate:
//!
//! - Validation: raw JSON -> normalized records, with property tests
//! - Projects: create/update/add-module revision rules under a manual clock
//! - Layout: validated modules -> 3D geometry and back
//! - CLI: command functions run against files in a temp directory
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p rackforge-tests
//! ```

pub mod fixtures;

pub use fixtures::{
    fixed_start, generation_json, module_json, project_json, validator_at, write_fixture,
};
