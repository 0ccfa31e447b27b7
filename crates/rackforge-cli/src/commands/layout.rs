//! Layout command implementation
//!
//! Validates a module and prints its 3D projection.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use rackforge_layout::{check_clearance, geometry_hash, ModuleGeometry, PanelLayoutProjector};
use rackforge_spec::SpecValidator;
use serde::Serialize;

use super::{print_validation_result, resolve_limits};
use crate::input::load_json;

/// Projection plus its content hash, printed with `--hash`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HashedGeometry<'a> {
    pub geometry_hash: String,
    #[serde(flatten)]
    pub geometry: &'a ModuleGeometry,
}

/// Run the layout command
///
/// # Arguments
/// * `input` - Path to the module JSON
/// * `pretty` - Pretty-print the geometry
/// * `with_hash` - Include the geometry hash in the output
/// * `clearance_mm` - Optional edge margin to check controls against
/// * `limits_name` - Optional built-in limits profile
///
/// # Returns
/// Exit code: 0 on success, 1 if the module is invalid or a control
/// violates the clearance margin
pub fn run(
    input: &str,
    pretty: bool,
    with_hash: bool,
    clearance_mm: Option<f64>,
    limits_name: Option<&str>,
) -> Result<ExitCode> {
    let limits = resolve_limits(limits_name, None)?;
    let loaded = load_json(Path::new(input))
        .with_context(|| format!("Failed to load input file: {}", input))?;

    let validated = SpecValidator::new(limits)?.module(&loaded.value)?;
    let module = match validated.record {
        Some(module) => module,
        None => {
            print_validation_result(&validated.result);
            eprintln!("\n{} module is invalid", "FAILED".red().bold());
            return Ok(ExitCode::from(1));
        }
    };

    let geometry = PanelLayoutProjector::default().project(&module);
    let skipped = module.controls.len() - geometry.placements.len();
    if skipped > 0 {
        eprintln!(
            "{} {} control(s) have no 3D shape and were skipped",
            "note:".yellow(),
            skipped
        );
    }

    let json = if with_hash {
        let wrapped = HashedGeometry {
            geometry_hash: geometry_hash(&geometry)?,
            geometry: &geometry,
        };
        to_json(&wrapped, pretty)?
    } else {
        to_json(&geometry, pretty)?
    };
    println!("{}", json);

    if let Some(margin) = clearance_mm {
        let violations = check_clearance(&geometry, margin);
        if !violations.is_empty() {
            for violation in &violations {
                eprintln!("  {} {}", "x".red(), violation);
            }
            eprintln!(
                "\n{} {} clearance violation(s) at {} mm",
                "FAILED".red().bold(),
                violations.len(),
                margin
            );
            return Ok(ExitCode::from(1));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
