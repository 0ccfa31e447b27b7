//! CLI command implementations.

pub mod generate;
pub mod json_output;
pub mod layout;
pub mod limits;
pub mod project;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use rackforge_spec::{LimitsProfile, ValidationError, ValidationResult};

/// Resolves the limits profile from `--limits NAME` or `--limits-file FILE`.
pub fn resolve_limits(name: Option<&str>, file: Option<&str>) -> Result<LimitsProfile> {
    match (name, file) {
        (_, Some(path)) => LimitsProfile::from_path(Path::new(path))
            .with_context(|| format!("Failed to load limits file: {}", path)),
        (name, None) => LimitsProfile::resolve(name).with_context(|| {
            format!(
                "expected one of: {}",
                LimitsProfile::BUILTIN.join(", ")
            )
        }),
    }
}

/// Prints errors and warnings in human-readable form.
pub fn print_validation_result(result: &ValidationResult) {
    if !result.errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for error in &result.errors {
            print_error(error, 1);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for warning in &result.warnings {
            let path_info = warning
                .path
                .as_ref()
                .map(|p| format!(" at {}", p))
                .unwrap_or_default();
            println!(
                "  {} [{}]{}: {}",
                "!".yellow(),
                warning.code.to_string().yellow(),
                path_info.dimmed(),
                warning.message
            );
        }
    }
}

fn print_error(error: &ValidationError, depth: usize) {
    let indent = "  ".repeat(depth);
    let path_info = error
        .path
        .as_ref()
        .map(|p| format!(" at {}", p))
        .unwrap_or_default();
    println!(
        "{}{} [{}]{}: {}",
        indent,
        "x".red(),
        error.code.to_string().red(),
        path_info.dimmed(),
        error.message
    );
    for detail in &error.details {
        print_error(detail, depth + 1);
    }
}
