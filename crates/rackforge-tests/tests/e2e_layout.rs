//! End-to-end layout and generation tests.
//!
//! Raw module JSON goes through validation and normalization, then into the
//! panel projector; generation requests go through the mock backend.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;

use rackforge_generate::{generate_with_timeout, GenerateError, Generator, MockGenerator};
use rackforge_layout::{
    check_clearance, geometry_hash, unproject, PanelLayoutProjector, Shape,
};
use rackforge_spec::{EntityKind, GenerationRequest, ModuleSpec, Record};
use rackforge_tests::{fixed_start, generation_json, module_json, validator_at};

fn normalized_module(raw: &serde_json::Value) -> ModuleSpec {
    let (_, validator) = validator_at(fixed_start(), 21);
    validator.module(raw).unwrap().into_result().unwrap()
}

// ============================================================================
// Projection
// ============================================================================

#[test]
fn test_validated_module_projects_every_known_control() {
    let module = normalized_module(&module_json("Filter", 8));
    let geometry = PanelLayoutProjector::default().project(&module);

    assert_eq!(geometry.placements.len(), 2);
    let knob = &geometry.placements[0];
    assert_eq!(knob.control_id, "knob-freq");
    assert_eq!(knob.label, "Freq");
    assert!(knob.position.x.abs() < 1e-9);
    assert!(knob.position.y > 0.0);

    let (x, y) = unproject(&module, knob.position);
    assert!((x - 50.0).abs() < 1e-9);
    assert!((y - 25.0).abs() < 1e-9);
}

#[test]
fn test_generated_control_ids_reach_the_projection() {
    let mut raw = module_json("Mixer", 12);
    raw["controls"] = json!([
        {"type": "switch", "x": 20, "y": 40},
        {"type": "jack", "x": 80, "y": 90, "id": "   "}
    ]);
    let module = normalized_module(&raw);
    let geometry = PanelLayoutProjector::default().project(&module);

    let ids: Vec<&str> = geometry
        .placements
        .iter()
        .map(|p| p.control_id.as_str())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.iter().all(|id| id.starts_with("ctl_")));
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn test_custom_control_types_need_a_shape() {
    let (_, validator) = validator_at(fixed_start(), 22);
    let mut limits = validator.limits().clone();
    limits.module.control_types.push("slider".to_string());
    let validator = rackforge_spec::SpecValidator::new(limits).unwrap();

    let mut raw = module_json("Fader bank", 10);
    raw["controls"] = json!([
        {"type": "slider", "x": 30, "y": 50, "id": "fader"},
        {"type": "knob", "x": 70, "y": 50, "id": "trim"}
    ]);
    let module = validator.module(&raw).unwrap().into_result().unwrap();

    let default = PanelLayoutProjector::default().project(&module);
    assert_eq!(default.placements.len(), 1);
    assert_eq!(default.placements[0].control_id, "trim");

    let extended = PanelLayoutProjector::default().with_shape(
        "slider",
        Shape::Box {
            width: 4.0,
            height: 30.0,
            depth: 6.0,
        },
    );
    assert_eq!(extended.project(&module).placements.len(), 2);
}

#[test]
fn test_projection_hash_is_stable_across_runs() {
    let module = normalized_module(&module_json("Envelope", 6));
    let first = geometry_hash(&PanelLayoutProjector::default().project(&module)).unwrap();
    let second = geometry_hash(&PanelLayoutProjector::default().project(&module)).unwrap();
    assert_eq!(first, second);

    let mut moved = module.clone();
    moved.controls[0].x = 10.0;
    let third = geometry_hash(&PanelLayoutProjector::default().project(&moved)).unwrap();
    assert_ne!(first, third);
}

#[test]
fn test_edge_controls_violate_clearance() {
    let mut raw = module_json("Edge", 4);
    raw["controls"] = json!([{"type": "knob", "x": 0, "y": 50, "id": "edge"}]);
    let module = normalized_module(&raw);
    let geometry = PanelLayoutProjector::default().project(&module);

    let violations = check_clearance(&geometry, 0.0);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].control_id, "edge");
}

#[test]
fn test_record_hash_ignores_key_order() {
    let (_, validator) = validator_at(fixed_start(), 23);
    let a = json!({"name": "Clock", "width": 4, "height": 128.5, "depth": 25});
    let b = json!({"depth": 25, "height": 128.5, "width": 4, "name": "Clock"});

    let hash = |raw: &serde_json::Value| {
        let record: Record = validator
            .validate_and_normalize(EntityKind::Module, raw)
            .unwrap()
            .record
            .unwrap();
        rackforge_spec::canonical_record_hash(&record).unwrap()
    };
    assert_eq!(hash(&a), hash(&b));
}

// ============================================================================
// Generation
// ============================================================================

#[tokio::test]
async fn test_validated_request_generates() {
    let (_, validator) = validator_at(fixed_start(), 24);
    let request: GenerationRequest = validator
        .generation(&generation_json("draft"))
        .unwrap()
        .into_result()
        .unwrap();

    let generator = MockGenerator::instant().unwrap();
    let output = generate_with_timeout(&generator, &request, Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(output.backend, generator.name());
    assert_eq!(output.housing.size.x, 40.0);
    assert_eq!(output.stages.len(), 2);
}

#[tokio::test]
async fn test_mock_rejects_requests_it_would_not_validate() {
    let (_, validator) = validator_at(fixed_start(), 25);
    let mut request: GenerationRequest = validator
        .generation(&generation_json("high"))
        .unwrap()
        .into_result()
        .unwrap();
    request.images.clear();

    let generator = MockGenerator::instant().unwrap();
    let err = generator.generate(&request).await.unwrap_err();
    match err {
        GenerateError::InvalidRequest(errors) => assert!(!errors.is_empty()),
        other => panic!("expected invalid request, got {}", other),
    }
}
