//! Generate command implementation
//!
//! Validates a generation request and runs it through the mock backend.

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use rackforge_generate::{
    generate_with_timeout, GenerateError, GenerationOutput, Generator, MockGenerator, MockTimings,
};
use rackforge_spec::{GenerationRequest, LimitsProfile, SpecValidator};

use super::json_output::{
    generate_error_to_json, input_error_to_json, print_json, validation_error_to_json,
    GenerateOutput,
};
use super::print_validation_result;
use crate::input::load_json;

/// Longest a single generation may run before it is abandoned.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Run the generate command
///
/// # Arguments
/// * `input` - Path to the generation request JSON
/// * `instant` - Skip the simulated stage delays
/// * `timeout_ms` - Abandon generation after this many milliseconds
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 on success, 1 on any failure
pub fn run(
    input: &str,
    instant: bool,
    timeout_ms: Option<u64>,
    json_output: bool,
) -> Result<ExitCode> {
    let timings = if instant {
        MockTimings::instant()
    } else {
        MockTimings::default()
    };
    let validator = SpecValidator::new(LimitsProfile::default())?;
    let generator = MockGenerator::new(validator.clone()).with_timings(timings);
    let limit = Duration::from_millis(timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS));

    if json_output {
        run_json(input, &validator, &generator, limit)
    } else {
        run_human(input, &validator, &generator, limit)
    }
}

fn run_human(
    input: &str,
    validator: &SpecValidator,
    generator: &MockGenerator,
    limit: Duration,
) -> Result<ExitCode> {
    println!("{} {}", "Generating:".cyan().bold(), input);

    let loaded = load_json(Path::new(input))
        .with_context(|| format!("Failed to load input file: {}", input))?;
    let validated = validator.generation(&loaded.value)?;
    let request = match validated.record {
        Some(request) => request,
        None => {
            print_validation_result(&validated.result);
            println!("\n{} request is invalid", "FAILED".red().bold());
            return Ok(ExitCode::from(1));
        }
    };

    println!(
        "{} {} ({})",
        "Backend:".dimmed(),
        generator.name(),
        request.quality_preset
    );

    match block_on(generator, &request, limit)? {
        Ok(output) => {
            for stage in &output.stages {
                println!("  {} {} ({}ms)", "+".green(), stage.stage, stage.duration_ms);
            }
            println!("{}", serde_json::to_string_pretty(&output.housing)?);
            println!(
                "\n{} generated in {}ms",
                "SUCCESS".green().bold(),
                output.total_ms()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(GenerateError::InvalidRequest(errors)) => {
            print_validation_result(&rackforge_spec::ValidationResult::failure(errors));
            println!("\n{} request is invalid", "FAILED".red().bold());
            Ok(ExitCode::from(1))
        }
        Err(e) => {
            println!("\n{} [{}] {}", "FAILED".red().bold(), e.code(), e);
            Ok(ExitCode::from(1))
        }
    }
}

fn run_json(
    input: &str,
    validator: &SpecValidator,
    generator: &MockGenerator,
    limit: Duration,
) -> Result<ExitCode> {
    let loaded = match load_json(Path::new(input)) {
        Ok(l) => l,
        Err(e) => {
            print_json(&GenerateOutput {
                success: false,
                errors: vec![input_error_to_json(&e, Some(input))],
                result: None,
            })?;
            return Ok(ExitCode::from(1));
        }
    };

    let validated = validator.generation(&loaded.value)?;
    let request = match validated.record {
        Some(request) => request,
        None => {
            print_json(&GenerateOutput {
                success: false,
                errors: validated
                    .result
                    .errors
                    .iter()
                    .map(validation_error_to_json)
                    .collect(),
                result: None,
            })?;
            return Ok(ExitCode::from(1));
        }
    };

    let output = match block_on(generator, &request, limit)? {
        Ok(result) => GenerateOutput {
            success: true,
            errors: Vec::new(),
            result: Some(result),
        },
        Err(e) => GenerateOutput {
            success: false,
            errors: generate_error_to_json(&e),
            result: None,
        },
    };
    print_json(&output)?;

    if output.success {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

/// Drives one generation on a single-threaded runtime.
fn block_on(
    generator: &dyn Generator,
    request: &GenerationRequest,
    limit: Duration,
) -> Result<Result<GenerationOutput, GenerateError>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start async runtime")?;
    Ok(runtime.block_on(generate_with_timeout(generator, request, limit)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rackforge_spec::{ImageRef, InputType, QualityPreset};

    #[test]
    fn test_block_on_instant_mock() {
        let generator = MockGenerator::instant().unwrap();
        let request = GenerationRequest {
            input_type: InputType::Image,
            dimensions: None,
            images: vec![ImageRef::new("front.png", "image/png", 2048)],
            quality_preset: QualityPreset::High,
        };

        let output = block_on(&generator, &request, Duration::from_secs(5))
            .unwrap()
            .unwrap();
        assert_eq!(output.backend, "mock");
        assert_eq!(output.stages.len(), 2);
    }
}
