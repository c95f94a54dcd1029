//! Value semantics: truthiness, comparison, display and escaping.

use std::cmp::Ordering;

use serde_json::Value;

/// `false`, `null`, `0`, `NaN` and `""` are falsy; everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Short type name used in error messages.
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `===`: no coercion; numbers compare by value regardless of representation.
///
/// Arrays and objects compare structurally.
pub fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => l.as_f64() == r.as_f64(),
        _ => left == right,
    }
}

/// `==` with JavaScript coercion.
///
/// `null` equals only `null`. A string against an array or object compares
/// as text; any other mix of types compares as numbers.
pub fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        _ if kind(left) == kind(right) => strict_equals(left, right),
        (Value::String(s), Value::Array(_) | Value::Object(_)) => *s == primitive_text(right),
        (Value::Array(_) | Value::Object(_), Value::String(s)) => primitive_text(left) == *s,
        _ => to_number(left) == to_number(right),
    }
}

/// Ordering for `<`, `<=`, `>`, `>=` with JavaScript coercion.
///
/// Two strings (after arrays and objects become text) compare as strings;
/// anything else compares as numbers. `None` when either side is `NaN`.
pub fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    let as_text = |v: &Value| match v {
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => Some(primitive_text(v)),
        _ => None,
    };
    match (as_text(left), as_text(right)) {
        (Some(l), Some(r)) => Some(l.cmp(&r)),
        _ => to_number(left).partial_cmp(&to_number(right)),
    }
}

/// Numeric value of `value` as JavaScript's `Number()` would produce it.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_number(s),
        Value::Array(_) | Value::Object(_) => parse_number(&primitive_text(value)),
    }
}

fn parse_number(text: &str) -> f64 {
    let text = text.trim();
    match text {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust also accepts "inf" and "nan", which JavaScript does not.
        _ if text.chars().any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E')) => f64::NAN,
        _ => text.parse().unwrap_or(f64::NAN),
    }
}

/// Text an array or object turns into when coerced to a primitive.
fn primitive_text(value: &Value) -> String {
    match value {
        Value::Object(_) => "[object Object]".to_string(),
        other => display(other),
    }
}

/// Text form of a value as it appears in rendered output.
pub fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Append `text` to `out` with HTML special characters escaped.
pub fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
