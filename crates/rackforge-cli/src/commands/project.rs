//! Project command implementations: create, update, add-module.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use rackforge_spec::{
    ModuleSpec, ProjectError, ProjectOutcome, ProjectService, ProjectSpec, SpecValidator,
    ValidationResult,
};

use super::{print_validation_result, resolve_limits};
use crate::input::{load_json, write_json};

fn service(limits_name: Option<&str>) -> Result<ProjectService> {
    let limits = resolve_limits(limits_name, None)?;
    Ok(ProjectService::new(SpecValidator::new(limits)?))
}

fn load_project(path: &str) -> Result<ProjectSpec> {
    let loaded =
        load_json(Path::new(path)).with_context(|| format!("Failed to load project: {}", path))?;
    let project: ProjectSpec = serde_json::from_value(loaded.value)
        .with_context(|| format!("{} is not a saved project", path))?;
    project
        .check_identity()
        .with_context(|| format!("{} is not a saved project", path))?;
    Ok(project)
}

/// Writes the outcome, or reports the errors of a rejected project.
fn finish(outcome: Result<ProjectOutcome, ProjectError>, out: Option<&str>) -> Result<ExitCode> {
    match outcome {
        Ok(ProjectOutcome { project, warnings }) => {
            if !warnings.is_empty() {
                let result = ValidationResult {
                    errors: Vec::new(),
                    warnings,
                };
                print_validation_result(&result);
            }
            write_json(&project, out.map(Path::new))?;
            eprintln!(
                "{} {} (version {})",
                "Saved".green().bold(),
                project.id,
                project.metadata.version
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(ProjectError::Invalid(errors)) => {
            let count = errors.len();
            print_validation_result(&ValidationResult::failure(errors));
            println!("\n{} project has {} error(s)", "FAILED".red().bold(), count);
            Ok(ExitCode::from(1))
        }
        Err(other) => Err(other.into()),
    }
}

/// Creates a project from a raw project document.
pub fn create(input: &str, out: Option<&str>, limits_name: Option<&str>) -> Result<ExitCode> {
    let service = service(limits_name)?;
    let raw = load_json(Path::new(input))
        .with_context(|| format!("Failed to load input file: {}", input))?;
    finish(service.create(&raw.value), out)
}

/// Replaces a saved project's content, bumping its version.
pub fn update(
    project: &str,
    input: &str,
    out: Option<&str>,
    limits_name: Option<&str>,
) -> Result<ExitCode> {
    let service = service(limits_name)?;
    let existing = load_project(project)?;
    let raw = load_json(Path::new(input))
        .with_context(|| format!("Failed to load input file: {}", input))?;
    finish(service.update(&existing, &raw.value), out)
}

/// Adds a module to a saved project.
///
/// The module document is validated and normalized on its own first so its
/// errors are reported with module-relative paths.
pub fn add_module(
    project: &str,
    module: &str,
    out: Option<&str>,
    limits_name: Option<&str>,
) -> Result<ExitCode> {
    let service = service(limits_name)?;
    let existing = load_project(project)?;
    let raw = load_json(Path::new(module))
        .with_context(|| format!("Failed to load module: {}", module))?;

    let validated = service.validator().module(&raw.value)?;
    let module: ModuleSpec = match validated.record {
        Some(m) => m,
        None => {
            print_validation_result(&validated.result);
            println!("\n{} module is invalid", "FAILED".red().bold());
            return Ok(ExitCode::from(1));
        }
    };
    finish(service.add_module(&existing, &module), out)
}
