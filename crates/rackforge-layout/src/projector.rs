//! Percentage placements to 3D positions and back.

use std::collections::BTreeMap;

use rackforge_spec::{ControlPlacement, ControlType, ModuleSpec, HP_MM};

use crate::geometry::{
    BoxGeometry, ModuleGeometry, Placement, Shape, Vec3, CONTROL_STANDOFF_MM, HOUSING_OPACITY,
    PANEL_THICKNESS_MM, PCB_HEIGHT_INSET_MM, PCB_RECESS_MM, PCB_THICKNESS_MM, PCB_WIDTH_INSET_MM,
};

/// The physical extent of a module panel in mm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelFrame {
    pub width_mm: f64,
    pub height_mm: f64,
    pub depth_mm: f64,
}

impl PanelFrame {
    pub fn new(width_hp: u32, height_mm: f64, depth_mm: f64) -> Self {
        Self {
            width_mm: f64::from(width_hp) * HP_MM,
            height_mm,
            depth_mm,
        }
    }

    pub fn of(module: &ModuleSpec) -> Self {
        Self::new(module.width, module.height, module.depth)
    }

    /// Maps a panel percentage (origin top-left) to a 3D position in front
    /// of the panel.
    pub fn to_3d(&self, x_pct: f64, y_pct: f64) -> Vec3 {
        Vec3::new(
            x_pct / 100.0 * self.width_mm - self.width_mm / 2.0,
            self.height_mm / 2.0 - y_pct / 100.0 * self.height_mm,
            self.depth_mm / 2.0 + CONTROL_STANDOFF_MM,
        )
    }

    /// Recovers the panel percentage for a 3D position. `z` is ignored.
    pub fn to_percent(&self, position: Vec3) -> (f64, f64) {
        let x = if self.width_mm > 0.0 {
            (position.x + self.width_mm / 2.0) / self.width_mm * 100.0
        } else {
            0.0
        };
        let y = if self.height_mm > 0.0 {
            (self.height_mm / 2.0 - position.y) / self.height_mm * 100.0
        } else {
            0.0
        };
        (x, y)
    }

    /// The panel front plate, centered on the panel-front plane.
    pub fn panel_box(&self) -> BoxGeometry {
        BoxGeometry::solid(
            Vec3::new(self.width_mm, self.height_mm, PANEL_THICKNESS_MM),
            Vec3::new(0.0, 0.0, self.depth_mm / 2.0),
        )
    }

    /// The PCB, recessed behind the panel front.
    pub fn pcb_box(&self) -> BoxGeometry {
        BoxGeometry::solid(
            Vec3::new(
                self.width_mm - PCB_WIDTH_INSET_MM,
                self.height_mm - PCB_HEIGHT_INSET_MM,
                PCB_THICKNESS_MM,
            ),
            Vec3::new(0.0, 0.0, self.depth_mm / 2.0 - PCB_RECESS_MM),
        )
    }

    /// The full module volume.
    pub fn housing_box(&self) -> BoxGeometry {
        BoxGeometry::translucent(
            Vec3::new(self.width_mm, self.height_mm, self.depth_mm),
            Vec3::ZERO,
            HOUSING_OPACITY,
        )
    }
}

/// Projects module panels into 3D.
///
/// Control types are looked up in a shape table; the default table knows
/// knobs, jacks, and switches. Controls whose type is not in the table are
/// left out of the output.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelLayoutProjector {
    shapes: BTreeMap<String, Shape>,
}

impl Default for PanelLayoutProjector {
    fn default() -> Self {
        let mut shapes = BTreeMap::new();
        shapes.insert(
            ControlType::Knob.as_str().to_string(),
            Shape::Cylinder {
                radius: 4.0,
                height: 6.0,
            },
        );
        shapes.insert(
            ControlType::Jack.as_str().to_string(),
            Shape::Cylinder {
                radius: 3.0,
                height: 8.0,
            },
        );
        shapes.insert(
            ControlType::Switch.as_str().to_string(),
            Shape::Box {
                width: 6.0,
                height: 12.0,
                depth: 4.0,
            },
        );
        Self { shapes }
    }
}

impl PanelLayoutProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the shape for a control type.
    pub fn with_shape(mut self, control_type: impl Into<String>, shape: Shape) -> Self {
        self.shapes.insert(control_type.into(), shape);
        self
    }

    /// The shape drawn for `control_type`, if known.
    pub fn shape_for(&self, control_type: &str) -> Option<Shape> {
        self.shapes.get(control_type).copied()
    }

    /// Projects every control of `module` and builds its boxes.
    ///
    /// Coordinates are used as given; callers clamp them to `[0, 100]`.
    pub fn project(&self, module: &ModuleSpec) -> ModuleGeometry {
        let frame = PanelFrame::of(module);
        let placements = module
            .controls
            .iter()
            .filter_map(|control| self.place(&frame, control))
            .collect::<Vec<_>>();

        tracing::trace!(
            module = %module.name,
            controls = module.controls.len(),
            placed = placements.len(),
            "projected panel"
        );

        ModuleGeometry {
            panel_box: frame.panel_box(),
            pcb_box: frame.pcb_box(),
            housing_box: frame.housing_box(),
            placements,
        }
    }

    fn place(&self, frame: &PanelFrame, control: &ControlPlacement) -> Option<Placement> {
        let Some(shape) = self.shape_for(&control.control_type) else {
            tracing::debug!(
                id = %control.id,
                control_type = %control.control_type,
                "skipping control with no shape"
            );
            return None;
        };
        Some(Placement {
            control_id: control.id.clone(),
            control_type: control.control_type.clone(),
            label: control.label.clone(),
            position: frame.to_3d(control.x, control.y),
            shape,
        })
    }
}

/// Projects `module` with the default shape table.
pub fn project_controls(module: &ModuleSpec) -> ModuleGeometry {
    PanelLayoutProjector::default().project(module)
}

/// Recovers panel percentages for a position produced by projecting `module`.
pub fn unproject(module: &ModuleSpec, position: Vec3) -> (f64, f64) {
    PanelFrame::of(module).to_percent(position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rackforge_spec::ControlPlacement;

    fn module_with(controls: Vec<ControlPlacement>) -> ModuleSpec {
        let mut module = ModuleSpec::builder("Test", 4, 128.5, 25.0).build();
        module.controls = controls;
        module
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9 && (a.z - b.z).abs() < 1e-9
    }

    #[test]
    fn test_centered_knob() {
        let module = module_with(vec![ControlPlacement::new("knob", 50.0, 50.0).with_id("k")]);
        let geometry = project_controls(&module);
        assert_eq!(geometry.placements.len(), 1);
        assert!(approx(geometry.placements[0].position, Vec3::new(0.0, 0.0, 13.5)));
        assert_eq!(
            geometry.placements[0].shape,
            Shape::Cylinder {
                radius: 4.0,
                height: 6.0
            }
        );
    }

    #[test]
    fn test_top_left_corner() {
        let module = module_with(vec![ControlPlacement::new("jack", 0.0, 0.0)]);
        let placement = &project_controls(&module).placements[0];
        assert!(approx(
            placement.position,
            Vec3::new(-20.32 / 2.0, 128.5 / 2.0, 13.5)
        ));
    }

    #[test]
    fn test_bottom_right_corner() {
        let module = module_with(vec![ControlPlacement::new("switch", 100.0, 100.0)]);
        let placement = &project_controls(&module).placements[0];
        assert!(approx(
            placement.position,
            Vec3::new(20.32 / 2.0, -128.5 / 2.0, 13.5)
        ));
    }

    #[test]
    fn test_unknown_type_is_skipped() {
        let module = module_with(vec![
            ControlPlacement::new("slider", 10.0, 10.0),
            ControlPlacement::new("knob", 20.0, 20.0).with_id("k"),
        ]);
        let geometry = project_controls(&module);
        assert_eq!(geometry.placements.len(), 1);
        assert_eq!(geometry.placements[0].control_id, "k");
    }

    #[test]
    fn test_custom_shape_table() {
        let projector = PanelLayoutProjector::new().with_shape(
            "slider",
            Shape::Box {
                width: 4.0,
                height: 40.0,
                depth: 5.0,
            },
        );
        let module = module_with(vec![ControlPlacement::new("slider", 10.0, 10.0)]);
        assert_eq!(projector.project(&module).placements.len(), 1);
    }

    #[test]
    fn test_boxes() {
        let geometry = project_controls(&module_with(vec![]));
        assert_eq!(geometry.panel_box.size, Vec3::new(4.0 * HP_MM, 128.5, 2.0));
        assert_eq!(geometry.panel_box.position, Vec3::new(0.0, 0.0, 12.5));
        assert!(approx(geometry.pcb_box.size, Vec3::new(4.0 * HP_MM - 4.0, 118.5, 1.6)));
        assert_eq!(geometry.pcb_box.position, Vec3::new(0.0, 0.0, 2.5));
        assert_eq!(geometry.housing_box.size, Vec3::new(4.0 * HP_MM, 128.5, 25.0));
        assert_eq!(geometry.housing_box.position, Vec3::ZERO);
        assert!(geometry.housing_box.opacity < 1.0);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let module = module_with(vec![
            ControlPlacement::new("knob", 33.3, 12.5),
            ControlPlacement::new("jack", 66.6, 87.5),
        ]);
        assert_eq!(project_controls(&module), project_controls(&module));
    }

    #[test]
    fn test_round_trip() {
        let module = module_with(vec![]);
        let frame = PanelFrame::of(&module);
        for (x, y) in [(0.0, 0.0), (12.5, 99.0), (50.0, 50.0), (100.0, 3.25)] {
            let (rx, ry) = unproject(&module, frame.to_3d(x, y));
            assert!((rx - x).abs() < 1e-9, "{} vs {}", rx, x);
            assert!((ry - y).abs() < 1e-9, "{} vs {}", ry, y);
        }
    }
}
