//! Canonical JSON and BLAKE3 content hashes.
//!
//! Records are hashed as `hex(BLAKE3(JCS(json)))`, where JCS is the JSON
//! Canonicalization Scheme (RFC 8785): object keys sorted, no whitespace,
//! shortest number forms. Two records with the same content therefore hash
//! identically regardless of field order or how the numbers were written.

use serde::Serialize;
use serde_json::{Number, Value};

use crate::error::SpecError;
use crate::validation::Record;

/// Hashes a normalized record.
///
/// # Example
/// ```
/// use rackforge_spec::hash::canonical_record_hash;
/// use rackforge_spec::{ModuleSpec, Record};
///
/// let module = ModuleSpec::builder("Mult", 2, 128.5, 20.0).build();
/// let hash = canonical_record_hash(&Record::Module(module)).unwrap();
/// assert_eq!(hash.len(), 64);
/// ```
pub fn canonical_record_hash(record: &Record) -> Result<String, SpecError> {
    canonical_value_hash(&record.to_value()?)
}

/// Hashes any serializable value through its JSON form.
pub fn canonical_hash<T: Serialize>(value: &T) -> Result<String, SpecError> {
    canonical_value_hash(&serde_json::to_value(value)?)
}

/// Hashes a JSON value. Returns 64 lowercase hex characters.
pub fn canonical_value_hash(value: &Value) -> Result<String, SpecError> {
    let canonical = canonicalize_json(value);
    Ok(blake3::hash(canonical.as_bytes()).to_hex().to_string())
}

/// Renders `value` as canonical JSON.
pub fn canonicalize_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(n)),
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_value(item, out);
            }
            out.push('}');
        }
    }
}

fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if !f.is_finite() => "null".to_string(),
        Some(f) if f == 0.0 => "0".to_string(),
        // 2.0 and 2 are the same number
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => format!("{}", f),
        None => "null".to_string(),
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if c < '\u{20}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{ControlPlacement, ModuleSpec};
    use serde_json::json;

    #[test]
    fn test_key_order_does_not_matter() {
        let a = json!({"width": 4, "name": "Mult", "controls": []});
        let b = json!({"controls": [], "name": "Mult", "width": 4});
        assert_eq!(canonicalize_json(&a), canonicalize_json(&b));
        assert_eq!(
            canonicalize_json(&a),
            r#"{"controls":[],"name":"Mult","width":4}"#
        );
    }

    #[test]
    fn test_integer_like_floats() {
        assert_eq!(canonicalize_json(&json!(25.0)), "25");
        assert_eq!(canonicalize_json(&json!(-0.0)), "0");
        assert_eq!(canonicalize_json(&json!(128.5)), "128.5");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(canonicalize_json(&json!("a\"b\n")), r#""a\"b\n""#);
        assert_eq!(canonicalize_json(&json!("\u{1}")), r#""\u0001""#);
    }

    #[test]
    fn test_record_hash_is_stable() {
        let module = ModuleSpec::builder("Mult", 2, 128.5, 20.0)
            .control(ControlPlacement::new("jack", 50.0, 30.0).with_id("ctl_1"))
            .build();
        let first = canonical_record_hash(&Record::Module(module.clone())).unwrap();
        let second = canonical_record_hash(&Record::Module(module.clone())).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);

        let mut moved = module;
        moved.controls[0].x = 51.0;
        assert_ne!(first, canonical_record_hash(&Record::Module(moved)).unwrap());
    }

    #[test]
    fn test_blake3_of_canonical_form() {
        let value = json!({"b": 1, "a": 2});
        let expected = blake3::hash(br#"{"a":2,"b":1}"#).to_hex().to_string();
        assert_eq!(canonical_value_hash(&value).unwrap(), expected);
    }
}
