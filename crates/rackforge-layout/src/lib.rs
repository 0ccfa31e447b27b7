//! RackForge panel layout projection.
//!
//! Control placements are stored as percentages of the panel (origin
//! top-left) so they survive panel resizing. This crate maps them into
//! millimetre positions in a housing-centered 3D frame, adds the panel, PCB,
//! and housing boxes used for rendering, and maps positions back.
//!
//! ```
//! use rackforge_layout::project_controls;
//! use rackforge_spec::{ControlPlacement, ModuleSpec};
//!
//! let module = ModuleSpec::builder("Attenuator", 4, 128.5, 25.0)
//!     .control(ControlPlacement::new("knob", 50.0, 50.0))
//!     .build();
//!
//! let geometry = project_controls(&module);
//! let p = geometry.placements[0].position;
//! assert!(p.x.abs() < 1e-9 && p.y.abs() < 1e-9);
//! assert_eq!(p.z, 13.5);
//! ```

pub mod clearance;
pub mod geometry;
pub mod projector;

pub use clearance::{check_clearance, ClearanceViolation, Edge};
pub use geometry::{BoxGeometry, ModuleGeometry, Placement, Shape, Vec3};
pub use projector::{project_controls, unproject, PanelFrame, PanelLayoutProjector};

use rackforge_spec::SpecError;

/// BLAKE3 hash of the canonical JSON of a projection.
///
/// Two projections of an unmodified module always hash identically.
pub fn geometry_hash(geometry: &ModuleGeometry) -> Result<String, SpecError> {
    rackforge_spec::canonical_hash(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rackforge_spec::{ControlPlacement, ModuleSpec};

    #[test]
    fn test_geometry_hash_tracks_content() {
        let mut module = ModuleSpec::builder("Mult", 2, 128.5, 20.0)
            .control(ControlPlacement::new("jack", 50.0, 20.0).with_id("ctl_a"))
            .build();
        let first = geometry_hash(&project_controls(&module)).unwrap();
        assert_eq!(first, geometry_hash(&project_controls(&module)).unwrap());

        module.controls[0].y = 21.0;
        assert_ne!(first, geometry_hash(&project_controls(&module)).unwrap());
    }
}
