//! RackForge CLI library.
//!
//! This crate provides the command implementations behind the `rackforge`
//! binary: input loading, validation, project revision, layout projection,
//! and mock generation.

pub mod commands;
pub mod input;
pub mod logging;
