//! Limits command implementation

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use rackforge_spec::LimitsProfile;

use super::resolve_limits;

/// Prints one profile as JSON, or lists the built-in profiles.
pub fn run(name: Option<&str>) -> Result<ExitCode> {
    match name {
        Some(name) => {
            let profile = resolve_limits(Some(name), None)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        None => {
            println!("{}", "Built-in limits profiles:".cyan().bold());
            for name in LimitsProfile::BUILTIN {
                if let Some(profile) = LimitsProfile::by_name(name) {
                    println!("  {}", summary(&profile));
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn summary(profile: &LimitsProfile) -> String {
    format!(
        "{:<8} width {}-{} HP, depth {}-{} mm, {} mA/rail per module, {} mA/rail supply",
        profile.name,
        profile.module.width_hp.min,
        profile.module.width_hp.max,
        profile.module.depth_mm.min,
        profile.module.depth_mm.max,
        profile.module.max_rail_draw_ma,
        profile.project.max_rail_supply_ma
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_names_profile() {
        let line = summary(&LimitsProfile::skiff());
        assert!(line.starts_with("skiff"));
        assert!(line.contains("depth 20-30 mm"));
    }
}
