//! Requests for the generation capability.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::module::ImageRef;

/// What the generation request is driven by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputType {
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "3d_sketch")]
    Sketch3d,
    #[serde(rename = "dimensions")]
    Dimensions,
}

impl InputType {
    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Image => "image",
            InputType::Sketch3d => "3d_sketch",
            InputType::Dimensions => "dimensions",
        }
    }

    /// Returns all input types.
    pub fn all() -> &'static [InputType] {
        &[InputType::Image, InputType::Sketch3d, InputType::Dimensions]
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output quality preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Draft,
    #[default]
    Standard,
    High,
}

impl QualityPreset {
    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Draft => "draft",
            QualityPreset::Standard => "standard",
            QualityPreset::High => "high",
        }
    }

    /// Returns all presets.
    pub fn all() -> &'static [QualityPreset] {
        &[
            QualityPreset::Draft,
            QualityPreset::Standard,
            QualityPreset::High,
        ]
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Target bounding dimensions in mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// A request for the (placeholder) generation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub input_type: InputType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub quality_preset: QualityPreset,
}
