//! Declarative record schemas.
//!
//! A [`Schema`] maps field names to rule lists. Rules are plain data
//! ([`Rule`]) except for the two extension points: [`Rule::Custom`] holds an
//! injected [`CustomRule`] and [`Rule::Each`] / [`Rule::Nested`] hold the
//! schema used for recursive validation. A single interpreter
//! ([`evaluate`]) runs every schema.
//!
//! Rules within a field always run in the fixed order given by
//! [`Rule::stage`], whatever order they were declared in.

mod interpreter;
pub mod rules;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{SchemaError, ValidationResult};

pub use interpreter::evaluate;

/// Primitive JSON value types a field can be declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    /// Any finite or non-finite JSON number.
    Number,
    /// A number with no fractional part.
    Integer,
    Boolean,
    Array,
    Object,
}

impl ValueType {
    /// Returns the type name used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Integer => "integer",
            ValueType::Boolean => "boolean",
            ValueType::Array => "array",
            ValueType::Object => "object",
        }
    }

    /// Returns true if `value` is of this type.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ValueType::String => value.is_string(),
            ValueType::Number => value.is_number(),
            ValueType::Integer => value.as_f64().is_some_and(|n| n.fract() == 0.0),
            ValueType::Boolean => value.is_boolean(),
            ValueType::Array => value.is_array(),
            ValueType::Object => value.is_object(),
        }
    }

    /// Returns the type name of an arbitrary JSON value.
    pub fn name_of(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, ValueType::Number | ValueType::Integer)
    }

    fn has_length(&self) -> bool {
        matches!(self, ValueType::String | ValueType::Array)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A rule implemented in code rather than declared as data.
///
/// The returned result's errors and warnings are appended verbatim to the
/// record's result.
pub trait CustomRule: Send + Sync {
    /// Name used in logs and `Debug` output.
    fn name(&self) -> &str;

    /// Checks `value` (the field named `field`) with access to the whole record.
    fn check(&self, field: &str, value: &Value, record: &Map<String, Value>) -> ValidationResult;
}

/// One validation rule.
#[derive(Clone)]
pub enum Rule {
    /// Field must be present and non-null.
    Required,
    /// Field must have this primitive type.
    Type(ValueType),
    /// Field must equal one of these values.
    AllowedValues(Vec<Value>),
    /// Minimum text length (chars, trimmed) or element count.
    MinLength(usize),
    /// Maximum text length (chars, trimmed) or element count.
    MaxLength(usize),
    /// Minimum numeric value (inclusive).
    Min(f64),
    /// Maximum numeric value (inclusive).
    Max(f64),
    /// Injected rule.
    Custom(Arc<dyn CustomRule>),
    /// Validate every element of an array against `schema`.
    Each { label: String, schema: Arc<Schema> },
    /// Validate an object against `schema`.
    Nested { label: String, schema: Arc<Schema> },
}

impl Rule {
    /// Evaluation stage; lower stages run first.
    pub fn stage(&self) -> u8 {
        match self {
            Rule::Required => 0,
            Rule::Type(_) => 1,
            Rule::AllowedValues(_) => 2,
            Rule::MinLength(_) | Rule::MaxLength(_) => 3,
            Rule::Min(_) | Rule::Max(_) => 4,
            Rule::Custom(_) => 5,
            Rule::Each { .. } | Rule::Nested { .. } => 6,
        }
    }

    /// Shorthand for an allowed-values rule over strings.
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::AllowedValues(values.into_iter().map(|s| Value::String(s.into())).collect())
    }

    /// Shorthand for [`Rule::Each`].
    pub fn each(label: impl Into<String>, schema: Arc<Schema>) -> Self {
        Rule::Each {
            label: label.into(),
            schema,
        }
    }

    /// Shorthand for [`Rule::Nested`].
    pub fn nested(label: impl Into<String>, schema: Arc<Schema>) -> Self {
        Rule::Nested {
            label: label.into(),
            schema,
        }
    }

    /// Shorthand for [`Rule::Custom`].
    pub fn custom(rule: impl CustomRule + 'static) -> Self {
        Rule::Custom(Arc::new(rule))
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => write!(f, "Required"),
            Rule::Type(t) => write!(f, "Type({})", t),
            Rule::AllowedValues(v) => f.debug_tuple("AllowedValues").field(v).finish(),
            Rule::MinLength(n) => write!(f, "MinLength({})", n),
            Rule::MaxLength(n) => write!(f, "MaxLength({})", n),
            Rule::Min(n) => write!(f, "Min({})", n),
            Rule::Max(n) => write!(f, "Max({})", n),
            Rule::Custom(rule) => write!(f, "Custom({})", rule.name()),
            Rule::Each { label, schema } => write!(f, "Each({}: {})", label, schema.name),
            Rule::Nested { label, schema } => write!(f, "Nested({}: {})", label, schema.name),
        }
    }
}

/// The rules for one field.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub name: String,
    pub rules: Vec<Rule>,
}

impl FieldSchema {
    fn declared_type(&self) -> Option<ValueType> {
        self.rules.iter().find_map(|r| match r {
            Rule::Type(t) => Some(*t),
            _ => None,
        })
    }

    fn is_required(&self) -> bool {
        self.rules.iter().any(|r| matches!(r, Rule::Required))
    }
}

/// A declarative schema for one record shape.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Schema name (e.g., "module").
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldSchema>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field with its rules.
    pub fn field(mut self, name: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.push(FieldSchema {
            name: name.into(),
            rules: rules.into_iter().collect(),
        });
        self
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of required fields, in declaration order.
    pub fn required_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.is_required())
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Checks that the schema itself is well formed, recursing into nested
    /// schemas.
    pub fn check(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    schema: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            self.check_field(field)?;
        }
        Ok(())
    }

    fn check_field(&self, field: &FieldSchema) -> Result<(), SchemaError> {
        let malformed = |reason: String| SchemaError::MalformedRule {
            schema: self.name.clone(),
            field: field.name.clone(),
            reason,
        };

        let declared = field.declared_type();
        let types: Vec<ValueType> = field
            .rules
            .iter()
            .filter_map(|r| match r {
                Rule::Type(t) => Some(*t),
                _ => None,
            })
            .collect();
        if types.len() > 1 {
            return Err(malformed("more than one type rule".to_string()));
        }

        let (mut min, mut max, mut min_len, mut max_len) = (None, None, None, None);
        for rule in &field.rules {
            match rule {
                Rule::Required | Rule::Type(_) | Rule::Custom(_) => {}
                Rule::AllowedValues(values) => {
                    if values.is_empty() {
                        return Err(malformed("allowed values set is empty".to_string()));
                    }
                }
                Rule::MinLength(n) | Rule::MaxLength(n) => {
                    if declared.is_some_and(|t| !t.has_length()) {
                        return Err(malformed(format!(
                            "length bound on a field of type {}",
                            declared.map(|t| t.as_str()).unwrap_or_default()
                        )));
                    }
                    if matches!(rule, Rule::MinLength(_)) {
                        min_len = Some(*n);
                    } else {
                        max_len = Some(*n);
                    }
                }
                Rule::Min(n) | Rule::Max(n) => {
                    if !n.is_finite() {
                        return Err(malformed(format!("numeric bound {} is not finite", n)));
                    }
                    if declared.is_some_and(|t| !t.is_numeric()) {
                        return Err(malformed(format!(
                            "numeric bound on a field of type {}",
                            declared.map(|t| t.as_str()).unwrap_or_default()
                        )));
                    }
                    if matches!(rule, Rule::Min(_)) {
                        min = Some(*n);
                    } else {
                        max = Some(*n);
                    }
                }
                Rule::Each { schema, .. } => {
                    if declared != Some(ValueType::Array) {
                        return Err(malformed("element rule requires type array".to_string()));
                    }
                    schema.check()?;
                }
                Rule::Nested { schema, .. } => {
                    if declared != Some(ValueType::Object) {
                        return Err(malformed("nested rule requires type object".to_string()));
                    }
                    schema.check()?;
                }
            }
        }

        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(malformed(format!("min {} is greater than max {}", lo, hi)));
            }
        }
        if let (Some(lo), Some(hi)) = (min_len, max_len) {
            if lo > hi {
                return Err(malformed(format!(
                    "minLength {} is greater than maxLength {}",
                    lo, hi
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let mut rules = [
            Rule::Max(3.0),
            Rule::Custom(Arc::new(rules::PowerRailRule::new(500.0))),
            Rule::Type(ValueType::Number),
            Rule::MinLength(1),
            Rule::Required,
            Rule::one_of(["a"]),
        ];
        rules.sort_by_key(Rule::stage);
        let stages: Vec<u8> = rules.iter().map(Rule::stage).collect();
        assert_eq!(stages, vec![0, 1, 2, 3, 4, 5]);
        assert!(matches!(rules[0], Rule::Required));
    }

    #[test]
    fn test_value_type_matches() {
        assert!(ValueType::Integer.matches(&serde_json::json!(4)));
        assert!(ValueType::Integer.matches(&serde_json::json!(4.0)));
        assert!(!ValueType::Integer.matches(&serde_json::json!(4.5)));
        assert!(ValueType::Number.matches(&serde_json::json!(4.5)));
        assert!(!ValueType::Number.matches(&serde_json::json!("4")));
        assert_eq!(ValueType::name_of(&Value::Null), "null");
    }

    #[test]
    fn test_check_rejects_min_above_max() {
        let schema = Schema::new("broken").field(
            "width",
            [Rule::Type(ValueType::Number), Rule::Min(10.0), Rule::Max(2.0)],
        );
        let err = schema.check().unwrap_err();
        assert!(matches!(err, SchemaError::MalformedRule { .. }));
        assert!(err.to_string().contains("min 10 is greater than max 2"));
    }

    #[test]
    fn test_check_rejects_numeric_bound_on_string() {
        let schema = Schema::new("broken").field("name", [Rule::Type(ValueType::String), Rule::Min(1.0)]);
        assert!(schema.check().is_err());
    }

    #[test]
    fn test_check_rejects_duplicate_field() {
        let schema = Schema::new("broken")
            .field("name", [Rule::Required])
            .field("name", [Rule::Required]);
        assert!(matches!(
            schema.check(),
            Err(SchemaError::DuplicateField { .. })
        ));
    }

    #[test]
    fn test_check_rejects_empty_enum_and_untyped_nesting() {
        let empty = Schema::new("broken").field("kind", [Rule::AllowedValues(vec![])]);
        assert!(empty.check().is_err());

        let inner = Arc::new(Schema::new("inner"));
        let untyped = Schema::new("broken").field("items", [Rule::each("item", inner)]);
        assert!(untyped.check().is_err());
    }

    #[test]
    fn test_check_recurses_into_nested_schemas() {
        let inner = Arc::new(Schema::new("inner").field("x", [Rule::Min(5.0), Rule::Max(1.0)]));
        let outer = Schema::new("outer").field(
            "items",
            [Rule::Type(ValueType::Array), Rule::each("item", inner)],
        );
        assert!(outer.check().is_err());
    }

    #[test]
    fn test_required_fields() {
        let schema = Schema::new("s")
            .field("a", [Rule::Required])
            .field("b", [Rule::Type(ValueType::String)])
            .field("c", [Rule::Required]);
        assert_eq!(schema.required_fields(), vec!["a", "c"]);
        assert!(schema.get("b").is_some());
    }

    #[test]
    fn test_rule_debug_names_custom_rules() {
        let rule = Rule::custom(rules::PowerRailRule::new(500.0));
        assert_eq!(format!("{:?}", rule), "Custom(power_rails)");
    }
}
