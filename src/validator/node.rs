//! Recursive validation of one value against one compiled schema node.
//!
//! Every function here appends to the shared `out` list and keeps going;
//! nothing returns early on the first problem except a type mismatch, after
//! which the node's remaining checks are meaningless.

use super::Violation;
use crate::spec::{ArraySchema, IntegerSchema, ObjectSchema, StringSchema, ValidationSchema};
use serde_json::Value;

/// Validate `value` against `schema`, reporting problems under `path`.
///
/// `path` is the runtime diagnostic path: the schema's `full_path` with
/// every `items` replaced by the concrete element index.
pub fn validate_node(schema: &ValidationSchema, value: &Value, path: &str, out: &mut Vec<Violation>) {
    if value.is_null() && schema.nullable() {
        return;
    }

    match schema {
        ValidationSchema::String(s) => validate_string(s, value, path, out),
        ValidationSchema::Integer(s) => validate_integer(s, value, path, out),
        ValidationSchema::Object(s) => validate_object(s, value, path, out),
        ValidationSchema::Array(s) => validate_array(s, value, path, out),
    }
}

fn plural(n: u64, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

fn validate_string(schema: &StringSchema, value: &Value, path: &str, out: &mut Vec<Violation>) {
    let Some(text) = value.as_str() else {
        out.push(Violation::new(path, "invalid data type - string expected"));
        return;
    };

    if let Some(allowed) = &schema.enum_values {
        if !allowed.contains(text) {
            let listed: Vec<&str> = allowed.iter().map(String::as_str).collect();
            out.push(Violation::new(
                path,
                format!("invalid value - must be one of: {}", listed.join(", ")),
            ));
        }
    }

    if let Some(min) = schema.min_length {
        if (text.chars().count() as u64) < min {
            out.push(Violation::new(
                path,
                format!("must be at least {} long", plural(min, "character", "characters")),
            ));
        }
    }
}

/// Parse `s` as a decimal integer only if printing it back gives `s` again.
///
/// Rejects leading zeros, signs other than a leading `-`, whitespace and
/// partial numeric prefixes, so `"007"`, `"+7"`, `" 7"` and `"7px"` all fail.
#[must_use]
pub fn parse_canonical_integer(s: &str) -> Option<i64> {
    s.parse::<i64>().ok().filter(|n| n.to_string() == s)
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .filter(|f| *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => parse_canonical_integer(s),
        _ => None,
    }
}

fn validate_integer(schema: &IntegerSchema, value: &Value, path: &str, out: &mut Vec<Violation>) {
    let Some(number) = as_integer(value) else {
        out.push(Violation::new(path, "invalid data type - integer expected"));
        return;
    };

    if let Some(min) = schema.minimum {
        if number < min {
            out.push(Violation::new(
                path,
                format!("must be greater than or equal to {min}"),
            ));
        }
    }
    if let Some(max) = schema.maximum {
        if number > max {
            out.push(Violation::new(path, format!("must be less than or equal to {max}")));
        }
    }
}

pub(super) fn validate_object(
    schema: &ObjectSchema,
    value: &Value,
    path: &str,
    out: &mut Vec<Violation>,
) {
    let Some(record) = value.as_object() else {
        out.push(Violation::new(path, "invalid data type - object expected"));
        return;
    };

    for name in &schema.required {
        if !record.contains_key(name) {
            out.push(Violation::new(
                format!("{path}.{name}"),
                "required field is not present",
            ));
        }
    }

    for (key, field) in record {
        match schema.properties.get(key) {
            // Optional nulls are skipped; required ones recurse so the
            // property's nullable flag decides.
            Some(property) => {
                if !field.is_null() || schema.is_required(key) {
                    validate_node(property, field, &format!("{path}.{key}"), out);
                }
            }
            None => {
                if !schema.additional_properties {
                    out.push(Violation::new(format!("{path}.{key}"), "field is not permitted"));
                }
            }
        }
    }
}

fn validate_array(schema: &ArraySchema, value: &Value, path: &str, out: &mut Vec<Violation>) {
    let pieces: Vec<Value>;
    let items: &[Value] = if schema.pipe_delimited {
        let Some(text) = value.as_str() else {
            out.push(Violation::new(
                path,
                "invalid data type - pipe-delimited string expected",
            ));
            return;
        };
        // "" carries no elements rather than one empty element.
        pieces = if text.is_empty() {
            Vec::new()
        } else {
            text.split('|')
                .map(|piece| Value::String(piece.to_string()))
                .collect()
        };
        &pieces
    } else {
        let Some(list) = value.as_array() else {
            out.push(Violation::new(path, "invalid data type - array expected"));
            return;
        };
        list
    };

    if let Some(min) = schema.min_items {
        if (items.len() as u64) < min {
            out.push(Violation::new(
                path,
                format!("must contain at least {}", plural(min, "item", "items")),
            ));
        }
    }

    for (index, item) in items.iter().enumerate() {
        validate_node(&schema.item_schema, item, &format!("{path}.{index}"), out);
    }
}
