//! Property-based validation tests for RackForge using proptest.
//!
//! These tests check that validation never panics, that every in-range
//! record passes, that out-of-range values fail exactly where expected, and
//! that normalization and projection are stable.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p rackforge-tests --test proptest_validation
//! ```

use proptest::prelude::*;
use serde_json::{json, Value};

use rackforge_layout::{project_controls, unproject, PanelFrame};
use rackforge_spec::{ControlPlacement, ErrorCode, LimitsProfile, ModuleSpec, SpecValidator, HP_MM};
use rackforge_tests::{fixed_start, validator_at};

fn validator() -> SpecValidator {
    validator_at(fixed_start(), 11).1
}

fn raw_module(width: u32, height: f64, depth: f64, controls: Vec<(f64, f64)>) -> Value {
    let controls: Vec<Value> = controls
        .into_iter()
        .enumerate()
        .map(|(i, (x, y))| json!({"type": "knob", "x": x, "y": y, "id": format!("k{}", i)}))
        .collect();
    json!({
        "name": "Prop",
        "width": width,
        "height": height,
        "depth": depth,
        "powerDraw": {"+12V": 50},
        "controls": controls
    })
}

// ============================================================================
// 1. Arbitrary Input
// ============================================================================

/// Strategy for JSON values of mixed shape.
fn arbitrary_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        (-1e6f64..1e6).prop_map(Value::from),
        "[a-zA-Z0-9 +\\-]{0,12}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map(
                prop_oneof![
                    Just("name".to_string()),
                    Just("width".to_string()),
                    Just("controls".to_string()),
                    Just("powerDraw".to_string()),
                    Just("modules".to_string()),
                    Just("rack".to_string()),
                    Just("images".to_string()),
                    "[a-z]{1,6}",
                ],
                inner,
                0..6
            )
            .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    /// Random documents never panic, and a rejected record is never returned.
    #[test]
    fn validation_never_panics(raw in arbitrary_json()) {
        let validator = validator();
        for kind in ["module", "project", "generation"] {
            let validated = validator.validate_named(kind, &raw).unwrap();
            prop_assert_eq!(validated.record.is_some(), validated.is_ok());
        }
    }
}

// ============================================================================
// 2. Module Ranges
// ============================================================================

proptest! {
    /// Every module inside the default limits validates without errors.
    #[test]
    fn in_range_modules_pass(
        width in 2u32..=42,
        height in 100.0f64..=150.0,
        depth in 20.0f64..=45.0,
        controls in prop::collection::vec((0.0f64..=100.0, 0.0f64..=100.0), 0..6),
    ) {
        let validated = validator()
            .module(&raw_module(width, height, depth, controls))
            .unwrap();
        prop_assert!(validated.is_ok(), "{:?}", validated.errors());
    }

    /// Widths outside 2..=42 fail with exactly one range error at `width`.
    #[test]
    fn out_of_range_widths_fail(width in prop_oneof![0u32..2, 43u32..400]) {
        let validated = validator()
            .module(&raw_module(width, 128.5, 30.0, vec![]))
            .unwrap();
        prop_assert_eq!(validated.errors().len(), 1);
        prop_assert_eq!(validated.errors()[0].code, ErrorCode::NumericOutOfRange);
        prop_assert_eq!(validated.errors()[0].path.as_deref(), Some("width"));
    }

    /// Control coordinates outside the panel are nested errors.
    #[test]
    fn off_panel_controls_fail(x in 100.001f64..1000.0) {
        let validated = validator()
            .module(&raw_module(8, 128.5, 30.0, vec![(x, 50.0)]))
            .unwrap();
        prop_assert_eq!(validated.errors().len(), 1);
        let nested = &validated.errors()[0];
        prop_assert_eq!(nested.code, ErrorCode::NestedEntityInvalid);
        prop_assert_eq!(nested.details[0].path.as_deref(), Some("controls[0].x"));
    }

    /// Derived widths always follow the HP width.
    #[test]
    fn hp_width_is_derived(width in 2u32..=42, claimed in 0.0f64..1000.0) {
        let mut raw = raw_module(width, 128.5, 30.0, vec![]);
        raw["hpWidth"] = json!(claimed);
        let module = validator().module(&raw).unwrap().record.unwrap();
        prop_assert!((module.hp_width - f64::from(width) * HP_MM).abs() < 1e-9);
    }

    /// Validating a normalized module again changes nothing.
    #[test]
    fn normalization_is_idempotent(
        width in 2u32..=42,
        height in 100.0f64..=150.0,
        depth in 20.0f64..=45.0,
        pad in "[ ]{0,3}",
    ) {
        let validator = validator();
        let mut raw = raw_module(width, height, depth, vec![(10.0, 10.0)]);
        raw["name"] = json!(format!("{}Prop{}", pad, pad));

        let once = validator.module(&raw).unwrap().record.unwrap();
        let again = validator
            .module(&serde_json::to_value(&once).unwrap())
            .unwrap()
            .record
            .unwrap();
        prop_assert_eq!(once, again);
    }
}

// ============================================================================
// 3. Limits Profiles
// ============================================================================

proptest! {
    /// The strict profile rejects rail draw the default profile accepts.
    #[test]
    fn strict_profile_tightens_rail_draw(draw in 300.5f64..=500.0) {
        let mut raw = raw_module(8, 128.5, 30.0, vec![]);
        raw["powerDraw"] = json!({"+12V": draw});

        let default = SpecValidator::new(LimitsProfile::default()).unwrap();
        let strict = SpecValidator::new(LimitsProfile::strict()).unwrap();
        prop_assert!(default.module(&raw).unwrap().is_ok());
        prop_assert!(!strict.module(&raw).unwrap().is_ok());
    }
}

// ============================================================================
// 4. Projection
// ============================================================================

proptest! {
    /// Percent -> 3D -> percent returns the original placement.
    #[test]
    fn projection_round_trips(
        width in 2u32..=42,
        height in 100.0f64..=150.0,
        depth in 20.0f64..=45.0,
        x in 0.0f64..=100.0,
        y in 0.0f64..=100.0,
    ) {
        let module = ModuleSpec::builder("Prop", width, height, depth)
            .control(ControlPlacement::new("knob", x, y).with_id("k"))
            .build();
        let geometry = project_controls(&module);
        let (bx, by) = unproject(&module, geometry.placements[0].position);
        prop_assert!((bx - x).abs() < 1e-9, "x: {} vs {}", bx, x);
        prop_assert!((by - y).abs() < 1e-9, "y: {} vs {}", by, y);
    }

    /// Every projected control sits on the panel face.
    #[test]
    fn projected_controls_stay_on_panel(
        x in 0.0f64..=100.0,
        y in 0.0f64..=100.0,
    ) {
        let frame = PanelFrame::new(10, 128.5, 30.0);
        let p = frame.to_3d(x, y);
        prop_assert!(p.x.abs() <= frame.width_mm / 2.0 + 1e-9);
        prop_assert!(p.y.abs() <= frame.height_mm / 2.0 + 1e-9);
        prop_assert!(p.is_finite());
    }
}
