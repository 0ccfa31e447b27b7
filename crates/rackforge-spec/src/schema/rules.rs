//! Built-in custom rules.

use serde_json::{Map, Value};

use super::CustomRule;
use crate::error::{ErrorCode, ValidationError, ValidationResult};
use crate::generation::InputType;
use crate::module::Rail;

/// Validates a rail → milliamp mapping.
///
/// Every key must be a known rail name and every value a number within
/// `[0, max_ma]`. Omitted rails are allowed.
#[derive(Debug, Clone)]
pub struct PowerRailRule {
    max_ma: f64,
}

impl PowerRailRule {
    /// Creates a rule with the given per-rail limit.
    pub fn new(max_ma: f64) -> Self {
        Self { max_ma }
    }
}

impl CustomRule for PowerRailRule {
    fn name(&self) -> &str {
        "power_rails"
    }

    fn check(&self, field: &str, value: &Value, _record: &Map<String, Value>) -> ValidationResult {
        let mut result = ValidationResult::default();
        let Some(rails) = value.as_object() else {
            return result;
        };

        for (key, current) in rails {
            let path = format!("{}.{}", field, key);
            if key.parse::<Rail>().is_err() {
                result.add_error(ValidationError::with_path(
                    ErrorCode::CustomValidationFailure,
                    format!(
                        "{} has unknown rail '{}' (expected +12V, -12V, or +5V)",
                        field, key
                    ),
                    path,
                ));
                continue;
            }
            match current.as_f64() {
                None => result.add_error(ValidationError::with_path(
                    ErrorCode::CustomValidationFailure,
                    format!("{} rail {} must be a number", field, key),
                    path,
                )),
                Some(ma) if !ma.is_finite() || ma < 0.0 || ma > self.max_ma => {
                    result.add_error(ValidationError::with_path(
                        ErrorCode::CustomValidationFailure,
                        format!(
                            "{} rail {} must be between 0 and {} mA, got {}",
                            field, key, self.max_ma, ma
                        ),
                        path,
                    ))
                }
                Some(_) => {}
            }
        }
        result
    }
}

/// Cross-field checks for generation requests keyed on `inputType`.
///
/// A `dimensions` request must carry a `dimensions` object. Unknown input
/// types are left to the allowed-values rule.
#[derive(Debug, Clone, Default)]
pub struct InputTypeRule;

impl CustomRule for InputTypeRule {
    fn name(&self) -> &str {
        "input_type"
    }

    fn check(&self, field: &str, value: &Value, record: &Map<String, Value>) -> ValidationResult {
        let mut result = ValidationResult::default();
        let input_type = value.as_str().and_then(|s| {
            InputType::all()
                .iter()
                .copied()
                .find(|t| t.as_str() == s)
        });

        if input_type == Some(InputType::Dimensions)
            && record.get("dimensions").map_or(true, Value::is_null)
        {
            result.add_error(ValidationError::with_path(
                ErrorCode::CustomValidationFailure,
                format!("dimensions are required when {} is 'dimensions'", field),
                "dimensions",
            ));
        }
        result
    }
}
