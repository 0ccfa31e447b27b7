//! Validate command implementation
//!
//! Validates a module, project, or generation request and prints the
//! normalized record.

use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;
use rackforge_spec::{canonical_record_hash, EntityKind, SpecValidator};

use super::json_output::{
    error_codes, input_error_to_json, print_json, validation_error_to_json,
    validation_warning_to_json, JsonError, ValidateOutput,
};
use super::{print_validation_result, resolve_limits};
use crate::input::load_json;

/// Run the validate command
///
/// # Arguments
/// * `kind` - Entity kind: module, project, or generation
/// * `input` - Path to the JSON record
/// * `limits_name` - Optional built-in limits profile
/// * `limits_file` - Optional limits profile file
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(
    kind: &str,
    input: &str,
    limits_name: Option<&str>,
    limits_file: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        run_json(kind, input, limits_name, limits_file)
    } else {
        run_human(kind, input, limits_name, limits_file)
    }
}

fn run_human(
    kind: &str,
    input: &str,
    limits_name: Option<&str>,
    limits_file: Option<&str>,
) -> Result<ExitCode> {
    let start = Instant::now();
    let kind: EntityKind = kind.parse()?;
    let limits = resolve_limits(limits_name, limits_file)?;

    println!("{} {} ({})", "Validating:".cyan().bold(), input, kind);
    println!("{} {}", "Limits:".dimmed(), limits.name);

    let loaded = load_json(Path::new(input))
        .with_context(|| format!("Failed to load input file: {}", input))?;
    let validator = SpecValidator::new(limits)?;
    let validated = validator.validate_and_normalize(kind, &loaded.value)?;
    let duration_ms = start.elapsed().as_millis() as u64;

    print_validation_result(&validated.result);

    match validated.record {
        Some(record) => {
            let hash = canonical_record_hash(&record)?;
            println!("\n{} {}", "Record hash:".dimmed(), &hash[..16]);
            println!("{}", serde_json::to_string_pretty(&record.to_value()?)?);
            println!(
                "\n{} {} is valid ({}ms)",
                "SUCCESS".green().bold(),
                kind,
                duration_ms
            );
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!(
                "\n{} {} has {} error(s) ({}ms)",
                "FAILED".red().bold(),
                kind,
                validated.result.errors.len(),
                duration_ms
            );
            Ok(ExitCode::from(1))
        }
    }
}

fn run_json(
    kind: &str,
    input: &str,
    limits_name: Option<&str>,
    limits_file: Option<&str>,
) -> Result<ExitCode> {
    let failure = |errors: Vec<JsonError>, limits: String| ValidateOutput {
        success: false,
        kind: kind.to_string(),
        limits,
        errors,
        warnings: Vec::new(),
        result: None,
        record_hash: None,
        source_hash: None,
    };

    let entity: EntityKind = match kind.parse() {
        Ok(k) => k,
        Err(e) => {
            print_json(&failure(
                vec![JsonError::new(error_codes::SCHEMA, e.to_string())],
                String::new(),
            ))?;
            return Ok(ExitCode::from(1));
        }
    };

    let limits = match resolve_limits(limits_name, limits_file) {
        Ok(l) => l,
        Err(e) => {
            print_json(&failure(
                vec![JsonError::new(error_codes::UNKNOWN_LIMITS, format!("{:#}", e))],
                limits_name.unwrap_or_default().to_string(),
            ))?;
            return Ok(ExitCode::from(1));
        }
    };
    let limits_label = limits.name.clone();

    let loaded = match load_json(Path::new(input)) {
        Ok(l) => l,
        Err(e) => {
            print_json(&failure(
                vec![input_error_to_json(&e, Some(input))],
                limits_label,
            ))?;
            return Ok(ExitCode::from(1));
        }
    };

    let validator = SpecValidator::new(limits)?;
    let validated = match validator.validate_and_normalize(entity, &loaded.value) {
        Ok(v) => v,
        Err(e) => {
            print_json(&failure(
                vec![JsonError::new(error_codes::SCHEMA, e.to_string())],
                limits_label,
            ))?;
            return Ok(ExitCode::from(1));
        }
    };

    let (result, record_hash) = match &validated.record {
        Some(record) => (Some(record.to_value()?), Some(canonical_record_hash(record)?)),
        None => (None, None),
    };

    let output = ValidateOutput {
        success: validated.is_ok(),
        kind: entity.to_string(),
        limits: limits_label,
        errors: validated
            .errors()
            .iter()
            .map(validation_error_to_json)
            .collect(),
        warnings: validated
            .warnings()
            .iter()
            .map(validation_warning_to_json)
            .collect(),
        result,
        record_hash,
        source_hash: Some(loaded.source_hash),
    };
    print_json(&output)?;

    if output.success {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}
