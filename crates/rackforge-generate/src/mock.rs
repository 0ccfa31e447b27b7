//! A timer-driven placeholder backend.

use std::time::Duration;

use async_trait::async_trait;
use rackforge_layout::geometry::HOUSING_OPACITY;
use rackforge_layout::{BoxGeometry, PanelFrame, Vec3};
use rackforge_spec::{GenerationRequest, LimitsProfile, QualityPreset, SpecValidator};
use tokio::time::Instant;

use crate::error::GenerateError;
use crate::output::{GenerationOutput, StageTiming};
use crate::Generator;

/// Housing used when a request carries no dimensions: a 4 HP, 3U module.
const DEFAULT_WIDTH_HP: u32 = 4;
const DEFAULT_HEIGHT_MM: f64 = 128.5;
const DEFAULT_DEPTH_MM: f64 = 25.0;

/// Simulated stage delays per quality preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockTimings {
    pub draft: Duration,
    pub standard: Duration,
    pub high: Duration,
    /// Mesh optimization pass, independent of the preset.
    pub optimize: Duration,
}

impl Default for MockTimings {
    fn default() -> Self {
        Self {
            draft: Duration::from_millis(500),
            standard: Duration::from_millis(1500),
            high: Duration::from_millis(3000),
            optimize: Duration::from_millis(250),
        }
    }
}

impl MockTimings {
    /// No delays at all.
    pub fn instant() -> Self {
        Self {
            draft: Duration::ZERO,
            standard: Duration::ZERO,
            high: Duration::ZERO,
            optimize: Duration::ZERO,
        }
    }

    /// The generation delay for `preset`.
    pub fn for_preset(&self, preset: QualityPreset) -> Duration {
        match preset {
            QualityPreset::Draft => self.draft,
            QualityPreset::Standard => self.standard,
            QualityPreset::High => self.high,
        }
    }
}

/// Validates the request, waits, and returns a housing box.
#[derive(Debug, Clone)]
pub struct MockGenerator {
    validator: SpecValidator,
    timings: MockTimings,
}

impl MockGenerator {
    pub const NAME: &'static str = "mock";

    pub fn new(validator: SpecValidator) -> Self {
        Self {
            validator,
            timings: MockTimings::default(),
        }
    }

    /// A mock that validates against the default limits and never waits.
    pub fn instant() -> Result<Self, GenerateError> {
        let validator = SpecValidator::new(LimitsProfile::default())?;
        Ok(Self::new(validator).with_timings(MockTimings::instant()))
    }

    pub fn with_timings(mut self, timings: MockTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn timings(&self) -> &MockTimings {
        &self.timings
    }

    fn housing(request: &GenerationRequest) -> BoxGeometry {
        match &request.dimensions {
            Some(d) => BoxGeometry::translucent(
                Vec3::new(d.width, d.height, d.depth),
                Vec3::ZERO,
                HOUSING_OPACITY,
            ),
            None => PanelFrame::new(DEFAULT_WIDTH_HP, DEFAULT_HEIGHT_MM, DEFAULT_DEPTH_MM)
                .housing_box(),
        }
    }
}

async fn timed_stage(name: &str, delay: Duration) -> StageTiming {
    let start = Instant::now();
    tokio::time::sleep(delay).await;
    let elapsed = start.elapsed().as_millis();
    StageTiming::new(name, u64::try_from(elapsed).unwrap_or(u64::MAX))
}

#[async_trait]
impl Generator for MockGenerator {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutput, GenerateError> {
        let raw = serde_json::to_value(request).map_err(|e| GenerateError::Backend {
            backend: Self::NAME.to_string(),
            message: e.to_string(),
        })?;
        let request = self
            .validator
            .generation(&raw)?
            .into_result()
            .map_err(GenerateError::InvalidRequest)?;

        tracing::info!(
            input_type = %request.input_type,
            preset = %request.quality_preset,
            "starting mock generation"
        );
        let stages = vec![
            timed_stage("generate", self.timings.for_preset(request.quality_preset)).await,
            timed_stage("optimize", self.timings.optimize).await,
        ];

        Ok(GenerationOutput {
            backend: Self::NAME.to_string(),
            input_type: request.input_type,
            quality_preset: request.quality_preset,
            housing: Self::housing(&request),
            stages,
        })
    }
}
