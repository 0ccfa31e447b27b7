//! The schemas for every entity kind, built from a [`LimitsProfile`].

use std::sync::Arc;

use crate::generation::{InputType, QualityPreset};
use crate::limits::{Bounds, GenerationLimits, ImageLimits, LimitsProfile, ModuleLimits};
use crate::schema::rules::{InputTypeRule, PowerRailRule};
use crate::schema::{Rule, Schema, ValueType};

fn bounded_number(bounds: Bounds) -> [Rule; 4] {
    [
        Rule::Required,
        Rule::Type(ValueType::Number),
        Rule::Min(bounds.min),
        Rule::Max(bounds.max),
    ]
}

fn text(min: usize, max: usize) -> [Rule; 4] {
    [
        Rule::Required,
        Rule::Type(ValueType::String),
        Rule::MinLength(min),
        Rule::MaxLength(max),
    ]
}

/// Schema for an attached reference image.
pub fn image_schema(limits: &ImageLimits) -> Schema {
    Schema::new("image")
        .field("name", text(1, limits.name_max_len))
        .field(
            "mimeType",
            [
                Rule::Required,
                Rule::Type(ValueType::String),
                Rule::one_of(limits.mime_types.iter().cloned()),
            ],
        )
        .field(
            "sizeBytes",
            [
                Rule::Required,
                Rule::Type(ValueType::Integer),
                Rule::Min(0.0),
                Rule::Max(limits.max_size_bytes as f64),
            ],
        )
        .field("data", [Rule::Type(ValueType::String)])
}

/// Schema for a control placement.
pub fn control_schema(limits: &ModuleLimits) -> Schema {
    let percent = Bounds::new(0.0, 100.0);
    Schema::new("control")
        .field(
            "type",
            [
                Rule::Required,
                Rule::Type(ValueType::String),
                Rule::one_of(limits.control_types.iter().cloned()),
            ],
        )
        .field("x", bounded_number(percent))
        .field("y", bounded_number(percent))
        .field(
            "label",
            [Rule::Type(ValueType::String), Rule::MaxLength(limits.label_max_len)],
        )
        .field("id", [Rule::Type(ValueType::String)])
}

/// Schema for a module.
pub fn module_schema(limits: &LimitsProfile) -> Schema {
    let module = &limits.module;
    Schema::new("module")
        .field("name", text(1, module.name_max_len))
        .field("width", bounded_number(module.width_hp))
        .field("height", bounded_number(module.height_mm))
        .field("depth", bounded_number(module.depth_mm))
        .field(
            "powerDraw",
            [
                Rule::Type(ValueType::Object),
                Rule::custom(PowerRailRule::new(module.max_rail_draw_ma)),
            ],
        )
        .field(
            "controls",
            [
                Rule::Type(ValueType::Array),
                Rule::each("control", Arc::new(control_schema(module))),
            ],
        )
        .field(
            "images",
            [
                Rule::Type(ValueType::Array),
                Rule::each("image", Arc::new(image_schema(&limits.image))),
            ],
        )
}

/// Schema for a project's rack.
pub fn rack_schema(limits: &LimitsProfile) -> Schema {
    Schema::new("rack")
        .field("width", bounded_number(limits.project.rack_width_hp))
        .field(
            "powerSupply",
            [
                Rule::Required,
                Rule::Type(ValueType::Object),
                Rule::custom(PowerRailRule::new(limits.project.max_rail_supply_ma)),
            ],
        )
}

/// Schema for a project.
pub fn project_schema(limits: &LimitsProfile) -> Schema {
    Schema::new("project")
        .field("name", text(1, limits.project.name_max_len))
        .field(
            "description",
            [
                Rule::Type(ValueType::String),
                Rule::MaxLength(limits.project.description_max_len),
            ],
        )
        .field(
            "modules",
            [
                Rule::Required,
                Rule::Type(ValueType::Array),
                Rule::MinLength(1),
                Rule::each("module", Arc::new(module_schema(limits))),
            ],
        )
        .field(
            "rack",
            [
                Rule::Required,
                Rule::Type(ValueType::Object),
                Rule::nested("rack", Arc::new(rack_schema(limits))),
            ],
        )
}

/// Schema for requested generation dimensions.
pub fn dimensions_schema(limits: &GenerationLimits) -> Schema {
    Schema::new("dimensions")
        .field("width", bounded_number(limits.dimension_mm))
        .field("height", bounded_number(limits.dimension_mm))
        .field("depth", bounded_number(limits.dimension_mm))
}

/// Schema for a generation request.
pub fn generation_schema(limits: &LimitsProfile) -> Schema {
    Schema::new("generation")
        .field(
            "inputType",
            [
                Rule::Required,
                Rule::Type(ValueType::String),
                Rule::one_of(InputType::all().iter().map(|t| t.as_str())),
                Rule::custom(InputTypeRule),
            ],
        )
        .field(
            "dimensions",
            [
                Rule::Type(ValueType::Object),
                Rule::nested("dimensions", Arc::new(dimensions_schema(&limits.generation))),
            ],
        )
        .field(
            "images",
            [
                Rule::Required,
                Rule::Type(ValueType::Array),
                Rule::MinLength(limits.generation.min_images),
                Rule::MaxLength(limits.generation.max_images),
                Rule::each("image", Arc::new(image_schema(&limits.image))),
            ],
        )
        .field(
            "qualityPreset",
            [
                Rule::Type(ValueType::String),
                Rule::one_of(QualityPreset::all().iter().map(|p| p.as_str())),
            ],
        )
}
