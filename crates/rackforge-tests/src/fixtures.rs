//! Shared records and validator setups for integration tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rackforge_spec::{IdGenerator, LimitsProfile, ManualClock, SpecValidator};
use serde_json::{json, Value};

/// Start of every manual clock in the suite: 2024-01-01T00:00:00Z.
pub fn fixed_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid start date")
}

/// A validator with the default limits, a manual clock, and seeded ids.
///
/// The clock is returned so tests can move time between operations.
pub fn validator_at(start: DateTime<Utc>, seed: u64) -> (Arc<ManualClock>, SpecValidator) {
    let clock = Arc::new(ManualClock::new(start));
    let validator = SpecValidator::new(LimitsProfile::default())
        .expect("built-in schemas register")
        .with_clock(clock.clone())
        .with_ids(Arc::new(IdGenerator::seeded(seed)));
    (clock, validator)
}

/// A valid raw module with one knob and one jack.
pub fn module_json(name: &str, width: u32) -> Value {
    json!({
        "name": name,
        "width": width,
        "height": 128.5,
        "depth": 30,
        "powerDraw": {"+12V": 80, "-12V": 60, "+5V": 0},
        "controls": [
            {"type": "knob", "x": 50, "y": 25, "label": "Freq", "id": "knob-freq"},
            {"type": "jack", "x": 50, "y": 85, "label": "Out", "id": "jack-out"}
        ]
    })
}

/// A valid raw project holding `modules` in an 84 HP rack.
pub fn project_json(name: &str, modules: Vec<Value>) -> Value {
    json!({
        "name": name,
        "description": "Integration test rack",
        "modules": modules,
        "rack": {"width": 84, "powerSupply": {"+12V": 1500, "-12V": 1000, "+5V": 500}}
    })
}

/// A valid raw generation request.
pub fn generation_json(preset: &str) -> Value {
    json!({
        "inputType": "3d_sketch",
        "dimensions": {"width": 40, "height": 128.5, "depth": 30},
        "images": [{"name": "sketch.png", "mimeType": "image/png", "sizeBytes": 4096}],
        "qualityPreset": preset
    })
}

/// Writes `value` as JSON to `dir/name` and returns the path.
pub fn write_fixture(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    let text = serde_json::to_string_pretty(value).expect("fixture serializes");
    std::fs::write(&path, text).expect("fixture writes");
    path
}
