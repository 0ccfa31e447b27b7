//! Configurable limits used by the validation schemas.
//!
//! Every numeric bound the validator enforces (panel dimensions, rail
//! currents, image sizes, control types) lives in a [`LimitsProfile`] so that
//! different power-supply and case designs can be described without touching
//! code. Profiles can be selected by name or loaded from a JSON file.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SpecError};

/// An inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum allowed value (inclusive).
    pub min: f64,
    /// Maximum allowed value (inclusive).
    pub max: f64,
}

impl Bounds {
    /// Creates a new range.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if both ends are whole numbers.
    pub fn is_integral(&self) -> bool {
        self.min.fract() == 0.0 && self.max.fract() == 0.0
    }

    /// Returns true if `value` is finite and within the range.
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Limits for a single module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleLimits {
    /// Panel width in HP.
    pub width_hp: Bounds,
    /// Panel height in mm.
    pub height_mm: Bounds,
    /// Depth behind the panel in mm.
    pub depth_mm: Bounds,
    /// Maximum module name length (characters, after trimming).
    pub name_max_len: usize,
    /// Maximum draw per rail in mA.
    pub max_rail_draw_ma: f64,
    /// Control types accepted on a panel.
    pub control_types: Vec<String>,
    /// Maximum control label length.
    pub label_max_len: usize,
}

impl Default for ModuleLimits {
    fn default() -> Self {
        Self {
            width_hp: Bounds::new(2.0, 42.0),
            height_mm: Bounds::new(100.0, 150.0),
            depth_mm: Bounds::new(20.0, 45.0),
            name_max_len: 50,
            max_rail_draw_ma: Self::DEFAULT_MAX_RAIL_DRAW_MA,
            control_types: Self::DEFAULT_CONTROL_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            label_max_len: 32,
        }
    }
}

impl ModuleLimits {
    /// Default maximum draw per module rail in mA.
    pub const DEFAULT_MAX_RAIL_DRAW_MA: f64 = 500.0;

    /// Default control types.
    pub const DEFAULT_CONTROL_TYPES: &'static [&'static str] = &["knob", "jack", "switch"];
}

/// Limits for a project and its rack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectLimits {
    /// Maximum project name length.
    pub name_max_len: usize,
    /// Maximum description length.
    pub description_max_len: usize,
    /// Rack width in HP.
    pub rack_width_hp: Bounds,
    /// Maximum supply capacity per rail in mA.
    pub max_rail_supply_ma: f64,
}

impl Default for ProjectLimits {
    fn default() -> Self {
        Self {
            name_max_len: 100,
            description_max_len: 500,
            rack_width_hp: Bounds::new(84.0, 168.0),
            max_rail_supply_ma: Self::DEFAULT_MAX_RAIL_SUPPLY_MA,
        }
    }
}

impl ProjectLimits {
    /// Default maximum supply per project rail in mA.
    pub const DEFAULT_MAX_RAIL_SUPPLY_MA: f64 = 2000.0;
}

/// Limits for generation requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationLimits {
    /// Each requested dimension in mm.
    pub dimension_mm: Bounds,
    /// Minimum number of reference images.
    pub min_images: usize,
    /// Maximum number of reference images.
    pub max_images: usize,
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self {
            dimension_mm: Bounds::new(10.0, 500.0),
            min_images: 1,
            max_images: 5,
        }
    }
}

/// Limits for attached reference images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageLimits {
    /// Maximum image size in bytes.
    pub max_size_bytes: u64,
    /// Accepted MIME types.
    pub mime_types: Vec<String>,
    /// Maximum file name length.
    pub name_max_len: usize,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_size_bytes: Self::DEFAULT_MAX_SIZE_BYTES,
            mime_types: ["image/png", "image/jpeg", "image/webp", "image/gif", "image/svg+xml"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            name_max_len: 255,
        }
    }
}

impl ImageLimits {
    /// Default maximum image size (10 MiB).
    pub const DEFAULT_MAX_SIZE_BYTES: u64 = 10 * 1024 * 1024;
}

/// A complete limits profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitsProfile {
    /// Profile identifier (e.g., "default", "strict", "skiff").
    pub name: String,
    /// Module limits.
    pub module: ModuleLimits,
    /// Project limits.
    pub project: ProjectLimits,
    /// Generation request limits.
    pub generation: GenerationLimits,
    /// Image limits.
    pub image: ImageLimits,
}

impl Default for LimitsProfile {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            module: ModuleLimits::default(),
            project: ProjectLimits::default(),
            generation: GenerationLimits::default(),
            image: ImageLimits::default(),
        }
    }
}

impl LimitsProfile {
    /// Names of the built-in profiles.
    pub const BUILTIN: &'static [&'static str] = &["default", "strict", "skiff"];

    /// Creates a new profile with the given name and default limits.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Conservative limits for small linear supplies.
    pub fn strict() -> Self {
        Self {
            name: "strict".to_string(),
            module: ModuleLimits {
                max_rail_draw_ma: 300.0,
                ..ModuleLimits::default()
            },
            project: ProjectLimits {
                max_rail_supply_ma: 1200.0,
                ..ProjectLimits::default()
            },
            generation: GenerationLimits {
                max_images: 3,
                ..GenerationLimits::default()
            },
            image: ImageLimits {
                max_size_bytes: 2 * 1024 * 1024,
                ..ImageLimits::default()
            },
        }
    }

    /// Shallow "skiff" cases: limited depth and a short rack row.
    pub fn skiff() -> Self {
        Self {
            name: "skiff".to_string(),
            module: ModuleLimits {
                depth_mm: Bounds::new(20.0, 30.0),
                ..ModuleLimits::default()
            },
            project: ProjectLimits {
                rack_width_hp: Bounds::new(84.0, 104.0),
                max_rail_supply_ma: 1500.0,
                ..ProjectLimits::default()
            },
            generation: GenerationLimits::default(),
            image: ImageLimits::default(),
        }
    }

    /// Looks up a built-in profile by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default()),
            "strict" => Some(Self::strict()),
            "skiff" => Some(Self::skiff()),
            _ => None,
        }
    }

    /// Parses and checks a profile from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, SpecError> {
        let profile: Self = serde_json::from_str(json)?;
        profile.check()?;
        Ok(profile)
    }

    /// Checks that every range applied to a rounded field has whole-number
    /// ends, so a value that passes its range still passes after rounding.
    pub fn check(&self) -> Result<(), SchemaError> {
        let rounded = [
            ("module.width_hp", self.module.width_hp),
            ("module.height_mm", self.module.height_mm),
            ("module.depth_mm", self.module.depth_mm),
            ("project.rack_width_hp", self.project.rack_width_hp),
        ];
        for (field, bounds) in rounded {
            if !bounds.is_integral() {
                return Err(SchemaError::FractionalBound {
                    profile: self.name.clone(),
                    field: field.to_string(),
                    bounds,
                });
            }
        }
        Ok(())
    }

    /// Loads a profile from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, SpecError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Resolves a profile from an optional built-in name.
    pub fn resolve(name: Option<&str>) -> Result<Self, SpecError> {
        match name {
            None => Ok(Self::default()),
            Some(n) => Self::by_name(n).ok_or_else(|| SpecError::UnknownProfile(n.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_matches_eurorack_limits() {
        let profile = LimitsProfile::default();
        assert_eq!(profile.name, "default");
        assert_eq!(profile.module.width_hp, Bounds::new(2.0, 42.0));
        assert_eq!(profile.module.height_mm, Bounds::new(100.0, 150.0));
        assert_eq!(profile.module.depth_mm, Bounds::new(20.0, 45.0));
        assert_eq!(profile.module.max_rail_draw_ma, 500.0);
        assert_eq!(profile.project.max_rail_supply_ma, 2000.0);
        assert_eq!(profile.project.rack_width_hp, Bounds::new(84.0, 168.0));
        assert_eq!(profile.generation.max_images, 5);
        assert_eq!(profile.module.control_types, vec!["knob", "jack", "switch"]);
    }

    #[test]
    fn test_by_name() {
        for name in LimitsProfile::BUILTIN {
            let profile = LimitsProfile::by_name(name).unwrap();
            assert_eq!(&profile.name, name);
        }
        assert!(LimitsProfile::by_name("nonexistent").is_none());
    }

    #[test]
    fn test_resolve_unknown_profile() {
        assert!(LimitsProfile::resolve(None).is_ok());
        let err = LimitsProfile::resolve(Some("tiny")).unwrap_err();
        assert_eq!(err.to_string(), "unknown limits profile: tiny");
    }

    #[test]
    fn test_profile_json_roundtrip() {
        let profile = LimitsProfile::skiff();
        let json = serde_json::to_string(&profile).unwrap();
        let parsed = LimitsProfile::from_json_str(&json).unwrap();
        assert_eq!(parsed, profile);
        assert_eq!(parsed.module.depth_mm.max, 30.0);
    }

    #[test]
    fn test_builtin_profiles_pass_check() {
        for name in LimitsProfile::BUILTIN {
            LimitsProfile::by_name(name).unwrap().check().unwrap();
        }
    }

    #[test]
    fn test_fractional_bound_on_rounded_field_rejected() {
        let mut profile = LimitsProfile::new("narrow");
        profile.module.width_hp = Bounds::new(2.0, 41.5);
        let err = profile.check().unwrap_err();
        assert!(matches!(
            err,
            SchemaError::FractionalBound { ref field, .. } if field == "module.width_hp"
        ));

        let json = serde_json::to_string(&profile).unwrap();
        assert!(matches!(
            LimitsProfile::from_json_str(&json),
            Err(SpecError::Schema(SchemaError::FractionalBound { .. }))
        ));
    }

    #[test]
    fn test_fractional_bound_on_unrounded_field_allowed() {
        let mut profile = LimitsProfile::new("fine");
        profile.generation.dimension_mm = Bounds::new(10.5, 499.5);
        assert!(profile.check().is_ok());
    }

    #[test]
    fn test_bounds_contains() {
        let b = Bounds::new(2.0, 42.0);
        assert!(b.contains(2.0));
        assert!(b.contains(42.0));
        assert!(!b.contains(42.5));
        assert!(!b.contains(f64::NAN));
        assert_eq!(b.to_string(), "[2, 42]");
    }
}
