//! Scalar coercion and nested sub-object access
//!
//! Every accessor returns the type's zero value when the field is absent,
//! null, or not coercible.

use crate::types::{FlatRecord, JsonValue};
use serde_json::Value;

/// JSON text used for an absent sub-object
pub const EMPTY_JSON: &str = "{}";

/// Field lookup that treats `null` as absent
pub fn field<'a>(object: &'a Value, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|v| !v.is_null())
}

/// Coerce to an integer (0 when missing)
pub fn to_int(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(0)
        }
        Some(Value::Bool(b)) => i64::from(*b),
        _ => 0,
    }
}

/// Coerce to a float (0.0 when missing)
pub fn to_float(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}

/// Coerce to a string ("" when missing)
///
/// Strings pass through; other values render as their JSON text.
pub fn to_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Compact JSON text of a value, or `{}` when absent
pub fn to_json_blob(value: Option<&Value>) -> String {
    value.map_or_else(|| EMPTY_JSON.to_string(), ToString::to_string)
}

/// Strip CR/LF and escape backslashes and double quotes in free text
pub fn sanitize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\r' | '\n' => {}
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out
}

/// An optional nested sub-object of a source record
///
/// Wraps the presence test so that every derived field of an absent
/// sub-object falls back to its zero value.
#[derive(Debug, Clone, Copy)]
pub struct SubObject<'a>(Option<&'a Value>);

impl<'a> SubObject<'a> {
    /// Look up `key` on `parent`
    pub fn of(parent: &'a Value, key: &str) -> Self {
        Self(field(parent, key))
    }

    /// Whether the sub-object was present
    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// The raw value, if present
    pub fn value(&self) -> Option<&'a Value> {
        self.0
    }

    /// Verbatim JSON of the sub-object, `{}` when absent
    pub fn json(&self) -> String {
        to_json_blob(self.0)
    }

    /// Integer sub-field
    pub fn int(&self, key: &str) -> i64 {
        to_int(self.get(key))
    }

    /// Float sub-field
    pub fn float(&self, key: &str) -> f64 {
        to_float(self.get(key))
    }

    /// String sub-field
    pub fn text(&self, key: &str) -> String {
        to_text(self.get(key))
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.and_then(|v| field(v, key))
    }
}

/// Insert a field into a flat row
pub fn put(row: &mut FlatRecord, key: &str, value: impl Into<JsonValue>) {
    row.insert(key.to_string(), value.into());
}
