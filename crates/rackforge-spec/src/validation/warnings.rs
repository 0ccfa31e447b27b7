//! Advisory checks on normalized records.

use crate::error::{ValidationWarning, WarningCode};
use crate::module::ModuleSpec;
use crate::project::ProjectSpec;

/// Flags controls placed on exactly the same percentage point.
pub(crate) fn module_warnings(module: &ModuleSpec) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    for (j, later) in module.controls.iter().enumerate() {
        let stacked_on = module.controls[..j]
            .iter()
            .position(|earlier| earlier.x == later.x && earlier.y == later.y);
        if let Some(i) = stacked_on {
            warnings.push(ValidationWarning::with_path(
                WarningCode::StackedControls,
                format!(
                    "control {} is at the same position as control {} ({}, {})",
                    j, i, later.x, later.y
                ),
                format!("controls[{}]", j),
            ));
        }
    }
    warnings
}

pub(crate) fn project_warnings(project: &ProjectSpec) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if project.description.is_none() {
        warnings.push(ValidationWarning::with_path(
            WarningCode::MissingDescription,
            "project has no description",
            "description",
        ));
    }

    let supply = &project.rack.power_supply;
    for (rail, draw) in project.total_draw().iter() {
        let available = supply.get(rail);
        if draw > available {
            warnings.push(ValidationWarning::with_path(
                WarningCode::RailOverCapacity,
                format!(
                    "modules draw {} mA on {} but the rack supplies {} mA",
                    draw, rail, available
                ),
                format!("rack.powerSupply.{}", rail),
            ));
        }
    }

    let used = project.total_width_hp();
    if used > project.rack.width {
        warnings.push(ValidationWarning::with_path(
            WarningCode::RackOverfull,
            format!(
                "modules occupy {} HP but the rack is {} HP wide",
                used, project.rack.width
            ),
            "rack.width",
        ));
    }

    for (index, module) in project.modules.iter().enumerate() {
        let prefix = format!("modules[{}]", index);
        warnings.extend(module_warnings(module).into_iter().map(|w| w.prefixed(&prefix)));
    }

    warnings
}
