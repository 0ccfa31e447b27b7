//! Panel-edge clearance checks for projected controls.

use std::fmt;

use serde::Serialize;

use crate::geometry::{ModuleGeometry, Placement};

/// A panel edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Edge::Left => "left",
            Edge::Right => "right",
            Edge::Top => "top",
            Edge::Bottom => "bottom",
        };
        write!(f, "{}", name)
    }
}

/// A control whose footprint comes closer to an edge than allowed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearanceViolation {
    pub control_id: String,
    pub edge: Edge,
    /// How far past the allowed line the footprint reaches, in mm.
    pub overlap_mm: f64,
}

impl fmt::Display for ClearanceViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "control '{}' crosses the {} edge by {:.2} mm",
            self.control_id, self.edge, self.overlap_mm
        )
    }
}

/// Reports every control whose footprint reaches within `margin_mm` of a
/// panel edge. A margin of zero reports only controls that cross the edge.
pub fn check_clearance(geometry: &ModuleGeometry, margin_mm: f64) -> Vec<ClearanceViolation> {
    let half_w = geometry.panel_box.size.x / 2.0 - margin_mm;
    let half_h = geometry.panel_box.size.y / 2.0 - margin_mm;

    geometry
        .placements
        .iter()
        .flat_map(|p| violations_for(p, half_w, half_h))
        .collect()
}

fn violations_for(placement: &Placement, half_w: f64, half_h: f64) -> Vec<ClearanceViolation> {
    let (hx, hy) = placement.shape.footprint_half_extents();
    let pos = placement.position;
    let reaches = [
        (Edge::Left, -(pos.x - hx) - half_w),
        (Edge::Right, (pos.x + hx) - half_w),
        (Edge::Top, (pos.y + hy) - half_h),
        (Edge::Bottom, -(pos.y - hy) - half_h),
    ];

    reaches
        .into_iter()
        .filter(|(_, overlap)| *overlap > 1e-9)
        .map(|(edge, overlap_mm)| ClearanceViolation {
            control_id: placement.control_id.clone(),
            edge,
            overlap_mm,
        })
        .collect()
}
