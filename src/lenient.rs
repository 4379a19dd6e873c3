//! Tolerant field decoders for sparse `profiles` rows.
//!
//! Columns are loosely typed: a sleep value may be stored as `"7.5"`, a
//! free-text answer as `12`. These helpers coerce what they can and turn the
//! rest into `None` instead of failing the whole row.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn number<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite()))
}

pub fn text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_text(Value::deserialize(d)?))
}

fn value_to_text(v: Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
