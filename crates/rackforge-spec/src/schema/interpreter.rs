//! The rule interpreter shared by every schema.

use serde_json::{Map, Value};

use super::{FieldSchema, Rule, Schema, ValueType};
use crate::error::{ErrorCode, ValidationError, ValidationResult};

/// Validates `record` against `schema`.
///
/// Every field is checked and every violation is collected; evaluation never
/// stops at the first failing field. Within a field, a missing required value
/// or a type mismatch skips the field's remaining rules.
pub fn evaluate(schema: &Schema, record: &Value) -> ValidationResult {
    let mut result = ValidationResult::default();

    let Some(map) = record.as_object() else {
        result.add_error(ValidationError::new(
            ErrorCode::TypeMismatch,
            format!(
                "{} must be an object, got {}",
                schema.name,
                ValueType::name_of(record)
            ),
        ));
        return result;
    };

    for field in &schema.fields {
        evaluate_field(field, map, &mut result);
    }

    tracing::trace!(
        schema = %schema.name,
        errors = result.errors.len(),
        "evaluated schema"
    );
    result
}

fn evaluate_field(field: &FieldSchema, record: &Map<String, Value>, result: &mut ValidationResult) {
    let name = field.name.as_str();
    let mut rules: Vec<&Rule> = field.rules.iter().collect();
    rules.sort_by_key(|r| r.stage());

    let Some(value) = record.get(name).filter(|v| !v.is_null()) else {
        if field.is_required() {
            result.add_error(ValidationError::with_path(
                ErrorCode::MissingField,
                format!("{} is required", name),
                name,
            ));
        }
        return;
    };

    for rule in rules {
        match rule {
            Rule::Required => {}
            Rule::Type(expected) => {
                if !expected.matches(value) {
                    result.add_error(ValidationError::with_path(
                        ErrorCode::TypeMismatch,
                        format!(
                            "{} must be of type {}, got {}",
                            name,
                            expected,
                            ValueType::name_of(value)
                        ),
                        name,
                    ));
                    return;
                }
            }
            Rule::AllowedValues(allowed) => {
                if !allowed.contains(value) {
                    result.add_error(ValidationError::with_path(
                        ErrorCode::InvalidEnum,
                        format!(
                            "{} must be one of [{}], got {}",
                            name,
                            display_list(allowed),
                            display_value(value)
                        ),
                        name,
                    ));
                }
            }
            Rule::MinLength(min) => {
                if let Some(len) = length_of(value) {
                    if len < *min {
                        result.add_error(ValidationError::with_path(
                            ErrorCode::LengthOutOfRange,
                            format!("{} length must be at least {}, got {}", name, min, len),
                            name,
                        ));
                    }
                }
            }
            Rule::MaxLength(max) => {
                if let Some(len) = length_of(value) {
                    if len > *max {
                        result.add_error(ValidationError::with_path(
                            ErrorCode::LengthOutOfRange,
                            format!("{} length must be at most {}, got {}", name, max, len),
                            name,
                        ));
                    }
                }
            }
            Rule::Min(min) => {
                if let Some(n) = value.as_f64() {
                    if !n.is_finite() || n < *min {
                        result.add_error(ValidationError::with_path(
                            ErrorCode::NumericOutOfRange,
                            format!("{} must be at least {}, got {}", name, min, n),
                            name,
                        ));
                    }
                }
            }
            Rule::Max(max) => {
                if let Some(n) = value.as_f64() {
                    if !n.is_finite() || n > *max {
                        result.add_error(ValidationError::with_path(
                            ErrorCode::NumericOutOfRange,
                            format!("{} must be at most {}, got {}", name, max, n),
                            name,
                        ));
                    }
                }
            }
            Rule::Custom(custom) => {
                let outcome = custom.check(name, value, record);
                if !outcome.is_ok() {
                    tracing::debug!(rule = custom.name(), field = name, "custom rule failed");
                }
                result.merge(outcome);
            }
            Rule::Each { label, schema } => {
                let Some(items) = value.as_array() else {
                    continue;
                };
                for (index, item) in items.iter().enumerate() {
                    let path = format!("{}[{}]", name, index);
                    let inner = evaluate(schema, item);
                    merge_nested(
                        result,
                        inner,
                        &path,
                        format!("Invalid {} at index {}", label, index),
                    );
                }
            }
            Rule::Nested { label, schema } => {
                let inner = evaluate(schema, value);
                merge_nested(result, inner, name, format!("Invalid {}", label));
            }
        }
    }
}

fn merge_nested(result: &mut ValidationResult, inner: ValidationResult, path: &str, message: String) {
    result
        .warnings
        .extend(inner.warnings.into_iter().map(|w| w.prefixed(path)));
    if inner.errors.is_empty() {
        return;
    }
    let details = inner.errors.into_iter().map(|e| e.prefixed(path)).collect();
    result.add_error(
        ValidationError::with_path(ErrorCode::NestedEntityInvalid, message, path)
            .with_details(details),
    );
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.trim().chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s),
        other => other.to_string(),
    }
}

fn display_list(values: &[Value]) -> String {
    values
        .iter()
        .map(display_value)
        .collect::<Vec<_>>()
        .join(", ")
}
