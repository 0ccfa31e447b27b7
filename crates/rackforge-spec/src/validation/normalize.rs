//! Normalization of records that passed their schema.
//!
//! Raw records are decoded into lenient input shapes (real-valued
//! dimensions, optional collections) and then converted into the canonical
//! records: strings trimmed, dimensions rounded, omitted rails zeroed,
//! missing control ids assigned, and derived fields recomputed. Derived
//! fields are not part of the input shapes, so user-supplied values for them
//! are dropped.

use serde::Deserialize;
use serde_json::Value;

use crate::context::{Clock, IdGenerator};
use crate::error::SchemaError;
use crate::generation::{Dimensions, GenerationRequest, InputType, QualityPreset};
use crate::module::{ControlPlacement, ImageRef, ModuleSpec, PowerRails};
use crate::project::{ProjectMetadata, ProjectSpec, RackSpec};
use crate::validation::EntityKind;

/// Time and id sources used while normalizing.
pub(crate) struct NormalizeContext<'a> {
    pub clock: &'a dyn Clock,
    pub ids: &'a IdGenerator,
}

/// Decodes a schema-valid raw record into its input shape.
pub(crate) fn decode<T: for<'de> Deserialize<'de>>(
    kind: EntityKind,
    raw: &Value,
) -> Result<T, SchemaError> {
    serde_json::from_value(raw.clone()).map_err(|source| SchemaError::RecordShape { kind, source })
}

fn round_u32(value: f64) -> u32 {
    value.round() as u32
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageInput {
    name: String,
    mime_type: String,
    size_bytes: f64,
    #[serde(default)]
    data: Option<String>,
}

impl ImageInput {
    fn normalize(self) -> ImageRef {
        ImageRef {
            name: trimmed(&self.name),
            mime_type: trimmed(&self.mime_type),
            size_bytes: self.size_bytes.round() as u64,
            data: self.data,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ControlInput {
    #[serde(rename = "type")]
    control_type: String,
    x: f64,
    y: f64,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

impl ControlInput {
    fn normalize(self, ctx: &NormalizeContext<'_>) -> ControlPlacement {
        let id = self
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| ctx.ids.control_id(ctx.clock.now()));

        ControlPlacement {
            control_type: self.control_type,
            x: self.x,
            y: self.y,
            label: self.label.as_deref().map(trimmed).unwrap_or_default(),
            id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ModuleInput {
    name: String,
    width: f64,
    height: f64,
    depth: f64,
    #[serde(default)]
    power_draw: Option<PowerRails>,
    #[serde(default)]
    controls: Option<Vec<ControlInput>>,
    #[serde(default)]
    images: Option<Vec<ImageInput>>,
}

impl ModuleInput {
    pub(crate) fn normalize(self, ctx: &NormalizeContext<'_>) -> ModuleSpec {
        let mut module = ModuleSpec {
            name: trimmed(&self.name),
            width: round_u32(self.width),
            height: self.height.round(),
            depth: self.depth.round(),
            power_draw: self.power_draw.unwrap_or_default(),
            controls: self
                .controls
                .unwrap_or_default()
                .into_iter()
                .map(|c| c.normalize(ctx))
                .collect(),
            images: self
                .images
                .unwrap_or_default()
                .into_iter()
                .map(ImageInput::normalize)
                .collect(),
            hp_width: 0.0,
            volume_cm3: 0.0,
        };
        module.refresh_derived();
        module
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RackInput {
    width: f64,
    power_supply: PowerRails,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectInput {
    name: String,
    #[serde(default)]
    description: Option<String>,
    modules: Vec<ModuleInput>,
    rack: RackInput,
}

impl ProjectInput {
    /// Produces a freshly created project: new id, version 1.
    pub(crate) fn normalize(self, ctx: &NormalizeContext<'_>) -> ProjectSpec {
        let now = ctx.clock.now();
        ProjectSpec {
            id: ctx.ids.project_id(now),
            name: trimmed(&self.name),
            description: self
                .description
                .as_deref()
                .map(trimmed)
                .filter(|d| !d.is_empty()),
            modules: self
                .modules
                .into_iter()
                .map(|m| m.normalize(ctx))
                .collect(),
            rack: RackSpec {
                width: round_u32(self.rack.width),
                power_supply: self.rack.power_supply,
            },
            metadata: ProjectMetadata::fresh(now),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationInput {
    input_type: InputType,
    #[serde(default)]
    dimensions: Option<Dimensions>,
    images: Vec<ImageInput>,
    #[serde(default)]
    quality_preset: Option<QualityPreset>,
}

impl GenerationInput {
    pub(crate) fn normalize(self) -> GenerationRequest {
        GenerationRequest {
            input_type: self.input_type,
            dimensions: self.dimensions,
            images: self.images.into_iter().map(ImageInput::normalize).collect(),
            quality_preset: self.quality_preset.unwrap_or_default(),
        }
    }
}
