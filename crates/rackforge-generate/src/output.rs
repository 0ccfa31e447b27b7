//! Generation results.

use rackforge_layout::BoxGeometry;
use rackforge_spec::{InputType, QualityPreset};
use serde::{Deserialize, Serialize};

/// Duration of one named generation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    /// Stage name (e.g., "generate", "optimize").
    pub stage: String,
    pub duration_ms: u64,
}

impl StageTiming {
    pub fn new(stage: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            stage: stage.into(),
            duration_ms,
        }
    }
}

/// What a backend produced for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutput {
    /// Backend identifier.
    pub backend: String,
    pub input_type: InputType,
    pub quality_preset: QualityPreset,
    /// Bounding housing of the generated model.
    pub housing: BoxGeometry,
    pub stages: Vec<StageTiming>,
}

impl GenerationOutput {
    /// Sum of all stage durations.
    pub fn total_ms(&self) -> u64 {
        self.stages.iter().map(|s| s.duration_ms).sum()
    }
}
