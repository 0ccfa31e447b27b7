//! Module records: panel dimensions, power draw, controls, and images.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Eurorack horizontal pitch: 1 HP = 5.08 mm.
pub const HP_MM: f64 = 5.08;

/// One of the three standard Eurorack supply rails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rail {
    #[serde(rename = "+12V")]
    Plus12V,
    #[serde(rename = "-12V")]
    Minus12V,
    #[serde(rename = "+5V")]
    Plus5V,
}

impl Rail {
    /// Returns the wire name of the rail.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rail::Plus12V => "+12V",
            Rail::Minus12V => "-12V",
            Rail::Plus5V => "+5V",
        }
    }

    /// Returns all rails in wire order.
    pub fn all() -> &'static [Rail] {
        &[Rail::Plus12V, Rail::Minus12V, Rail::Plus5V]
    }
}

impl fmt::Display for Rail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Rail {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+12V" => Ok(Rail::Plus12V),
            "-12V" => Ok(Rail::Minus12V),
            "+5V" => Ok(Rail::Plus5V),
            _ => Err(format!("unknown rail: {}", s)),
        }
    }
}

/// Milliamps per rail. Used for module draw and for rack supply capacity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PowerRails {
    #[serde(rename = "+12V", default)]
    pub plus_12v: f64,
    #[serde(rename = "-12V", default)]
    pub minus_12v: f64,
    #[serde(rename = "+5V", default)]
    pub plus_5v: f64,
}

impl PowerRails {
    /// Creates a rail set from explicit values.
    pub fn new(plus_12v: f64, minus_12v: f64, plus_5v: f64) -> Self {
        Self {
            plus_12v,
            minus_12v,
            plus_5v,
        }
    }

    /// Returns the current on `rail`.
    pub fn get(&self, rail: Rail) -> f64 {
        match rail {
            Rail::Plus12V => self.plus_12v,
            Rail::Minus12V => self.minus_12v,
            Rail::Plus5V => self.plus_5v,
        }
    }

    /// Sets the current on `rail`.
    pub fn set(&mut self, rail: Rail, milliamps: f64) {
        match rail {
            Rail::Plus12V => self.plus_12v = milliamps,
            Rail::Minus12V => self.minus_12v = milliamps,
            Rail::Plus5V => self.plus_5v = milliamps,
        }
    }

    /// Iterates over (rail, mA) pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (Rail, f64)> + '_ {
        Rail::all().iter().map(move |r| (*r, self.get(*r)))
    }

    /// Per-rail sum of two rail sets.
    pub fn add(&self, other: &PowerRails) -> PowerRails {
        PowerRails {
            plus_12v: self.plus_12v + other.plus_12v,
            minus_12v: self.minus_12v + other.minus_12v,
            plus_5v: self.plus_5v + other.plus_5v,
        }
    }
}

/// Control types with a known panel geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    Knob,
    Jack,
    Switch,
}

impl ControlType {
    /// Returns the control type as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlType::Knob => "knob",
            ControlType::Jack => "jack",
            ControlType::Switch => "switch",
        }
    }
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ControlType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "knob" => Ok(ControlType::Knob),
            "jack" => Ok(ControlType::Jack),
            "switch" => Ok(ControlType::Switch),
            _ => Err(format!("unknown control type: {}", s)),
        }
    }
}

/// A control placed on a panel.
///
/// `x` and `y` are percentages of the panel width and height with the origin
/// at the top-left corner, so a layout survives panel resizing. `control_type`
/// is kept as text: the set of accepted types is configuration, and consumers
/// that only understand some types skip the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPlacement {
    #[serde(rename = "type")]
    pub control_type: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub id: String,
}

impl ControlPlacement {
    /// Creates an unlabeled control without an id.
    pub fn new(control_type: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            control_type: control_type.into(),
            x,
            y,
            label: String::new(),
            id: String::new(),
        }
    }

    /// Sets the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Returns the known control type, if any.
    pub fn kind(&self) -> Option<ControlType> {
        self.control_type.parse().ok()
    }
}

/// A reference image attached to a module or generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl ImageRef {
    /// Creates an image reference without inline data.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            data: None,
        }
    }
}

/// A Eurorack module.
///
/// `hp_width` and `volume_cm3` are derived; they are recomputed on every
/// normalization and any user-supplied value is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSpec {
    pub name: String,
    /// Width in HP.
    pub width: u32,
    /// Panel height in mm.
    pub height: f64,
    /// Depth behind the panel in mm.
    pub depth: f64,
    #[serde(default)]
    pub power_draw: PowerRails,
    #[serde(default)]
    pub controls: Vec<ControlPlacement>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub hp_width: f64,
    #[serde(default)]
    pub volume_cm3: f64,
}

impl ModuleSpec {
    /// Creates a new module builder.
    pub fn builder(name: impl Into<String>, width: u32, height: f64, depth: f64) -> ModuleBuilder {
        ModuleBuilder::new(name, width, height, depth)
    }

    /// Panel width in mm.
    pub fn width_mm(&self) -> f64 {
        f64::from(self.width) * HP_MM
    }

    /// Recomputes `hp_width` and `volume_cm3` from the dimensions.
    pub fn refresh_derived(&mut self) {
        self.hp_width = self.width_mm();
        self.volume_cm3 = self.width_mm() * self.height / 10.0 * self.depth / 10.0;
    }
}

/// Builder for [`ModuleSpec`].
#[derive(Debug, Clone)]
pub struct ModuleBuilder {
    module: ModuleSpec,
}

impl ModuleBuilder {
    /// Creates a builder with no controls, images, or power draw.
    pub fn new(name: impl Into<String>, width: u32, height: f64, depth: f64) -> Self {
        Self {
            module: ModuleSpec {
                name: name.into(),
                width,
                height,
                depth,
                power_draw: PowerRails::default(),
                controls: Vec::new(),
                images: Vec::new(),
                hp_width: 0.0,
                volume_cm3: 0.0,
            },
        }
    }

    /// Sets the draw on one rail.
    pub fn power(mut self, rail: Rail, milliamps: f64) -> Self {
        self.module.power_draw.set(rail, milliamps);
        self
    }

    /// Adds a control.
    pub fn control(mut self, control: ControlPlacement) -> Self {
        self.module.controls.push(control);
        self
    }

    /// Adds an image.
    pub fn image(mut self, image: ImageRef) -> Self {
        self.module.images.push(image);
        self
    }

    /// Builds the module with derived fields filled in.
    pub fn build(mut self) -> ModuleSpec {
        self.module.refresh_derived();
        self.module
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rail_wire_names() {
        let json = serde_json::to_string(&Rail::Minus12V).unwrap();
        assert_eq!(json, "\"-12V\"");
        assert_eq!("+5V".parse::<Rail>().unwrap(), Rail::Plus5V);
        assert!("+9V".parse::<Rail>().is_err());
    }

    #[test]
    fn test_power_rails_serialize_with_wire_names() {
        let rails = PowerRails::new(120.0, 40.0, 0.0);
        let value = serde_json::to_value(rails).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"+12V": 120.0, "-12V": 40.0, "+5V": 0.0})
        );
    }

    #[test]
    fn test_power_rails_missing_rail_defaults_to_zero() {
        let rails: PowerRails = serde_json::from_str(r#"{"+12V": 60}"#).unwrap();
        assert_eq!(rails.get(Rail::Plus12V), 60.0);
        assert_eq!(rails.get(Rail::Minus12V), 0.0);
        assert_eq!(rails.get(Rail::Plus5V), 0.0);
    }

    #[test]
    fn test_builder_fills_derived_fields() {
        let module = ModuleSpec::builder("VCO", 10, 128.0, 30.0)
            .power(Rail::Plus12V, 80.0)
            .control(ControlPlacement::new("knob", 50.0, 20.0).with_label("Freq"))
            .build();

        assert_eq!(module.hp_width, 10.0 * HP_MM);
        assert!((module.volume_cm3 - 50.8 * 12.8 * 3.0).abs() < 1e-9);
        assert_eq!(module.controls[0].kind(), Some(ControlType::Knob));
    }

    #[test]
    fn test_control_placement_type_field_name() {
        let control = ControlPlacement::new("jack", 10.0, 90.0).with_id("ctl_1");
        let value = serde_json::to_value(&control).unwrap();
        assert_eq!(value["type"], "jack");
        assert_eq!(value["id"], "ctl_1");
        assert_eq!(value["label"], "");
    }

    #[test]
    fn test_unknown_control_type_has_no_kind() {
        let control = ControlPlacement::new("slider", 10.0, 10.0);
        assert_eq!(control.kind(), None);
    }
}
