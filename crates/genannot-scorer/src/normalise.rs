//! Lenient numeric coercion for upstream JSON fields.
//!
//! Upstream payloads are inconsistent about numeric types: the same field may
//! arrive as a number, a numeric string, or a list holding either. Anything
//! that cannot be read as a finite number is "no value", never an error.

use serde_json::Value;

/// Coerce a JSON value to a finite `f64`.
///
/// - numbers are taken as-is
/// - strings are parsed after trimming
/// - a non-empty list uses its first element
/// - everything else (null, bool, object, empty list, NaN, ±inf) is `None`
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Array(items) => match items.first()? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        },
        _ => None,
    }?;
    v.is_finite().then_some(v)
}

/// Look up `key` on `value` only if `value` is a JSON object.
pub fn object_field<'a>(value: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    value?.as_object()?.get(key)
}
