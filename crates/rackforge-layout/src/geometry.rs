//! Output geometry types.

use serde::{Deserialize, Serialize};

/// Panel front thickness in mm.
pub const PANEL_THICKNESS_MM: f64 = 2.0;
/// PCB board thickness in mm.
pub const PCB_THICKNESS_MM: f64 = 1.6;
/// How far the PCB sits behind the panel front, in mm.
pub const PCB_RECESS_MM: f64 = 10.0;
/// PCB is this much narrower than the panel, in mm.
pub const PCB_WIDTH_INSET_MM: f64 = 4.0;
/// PCB is this much shorter than the panel (clear of the rails), in mm.
pub const PCB_HEIGHT_INSET_MM: f64 = 10.0;
/// Controls stand this far in front of the panel front, in mm.
pub const CONTROL_STANDOFF_MM: f64 = 1.0;
/// Opacity of the housing volume.
pub const HOUSING_OPACITY: f64 = 0.3;

/// A point or extent in millimetres.
///
/// Axes: x to the right, y up, z out of the panel. The origin is the center
/// of the housing volume.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns true if every component is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// The solid used to draw a control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Cylinder standing out of the panel along z.
    Cylinder { radius: f64, height: f64 },
    /// Axis-aligned box.
    Box { width: f64, height: f64, depth: f64 },
}

impl Shape {
    /// Half width and half height of the footprint on the panel plane.
    pub fn footprint_half_extents(&self) -> (f64, f64) {
        match *self {
            Shape::Cylinder { radius, .. } => (radius, radius),
            Shape::Box { width, height, .. } => (width / 2.0, height / 2.0),
        }
    }
}

/// An axis-aligned box positioned by its center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxGeometry {
    /// Extent along x, y and z.
    pub size: Vec3,
    pub position: Vec3,
    /// 1.0 is opaque.
    pub opacity: f64,
}

impl BoxGeometry {
    pub fn solid(size: Vec3, position: Vec3) -> Self {
        Self {
            size,
            position,
            opacity: 1.0,
        }
    }

    pub fn translucent(size: Vec3, position: Vec3, opacity: f64) -> Self {
        Self {
            size,
            position,
            opacity,
        }
    }
}

/// One projected control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub control_id: String,
    pub control_type: String,
    pub label: String,
    pub position: Vec3,
    pub shape: Shape,
}

/// Everything needed to render one module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleGeometry {
    pub panel_box: BoxGeometry,
    pub pcb_box: BoxGeometry,
    pub housing_box: BoxGeometry,
    pub placements: Vec<Placement>,
}
