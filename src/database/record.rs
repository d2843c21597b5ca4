use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::schema::ColumnPolicy;

const TRUE_TOKENS: &[&str] = &["true", "1", "yes", "y"];
const FALSE_TOKENS: &[&str] = &["false", "0", "no", "n"];

/// A materials row shaped for API output: array columns as sequences,
/// boolean-ish columns as booleans where the stored token is recognised.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MaterialRecord(Map<String, Value>);

impl MaterialRecord {
    pub fn id(&self) -> Option<&Value> {
        self.0.get("id")
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }
}

/// Converts raw storage rows into typed records.
///
/// Decoding never fails: a value in an unrecognised shape is passed through
/// as stored so that legacy rows cannot break a listing.
#[derive(Clone)]
pub struct RecordCodec {
    policy: Arc<dyn ColumnPolicy>,
}

impl RecordCodec {
    pub fn new(policy: Arc<dyn ColumnPolicy>) -> Self {
        Self { policy }
    }

    pub fn decode(&self, raw: Map<String, Value>) -> MaterialRecord {
        let out = raw
            .into_iter()
            .map(|(column, value)| {
                let value = if self.policy.is_array_column(&column) {
                    parse_array_sequence(value)
                } else if self.policy.is_boolean_column(&column) {
                    coerce_boolish(value)
                } else {
                    value
                };
                (column, value)
            })
            .collect();
        MaterialRecord(out)
    }

    pub fn decode_all(&self, rows: Vec<Map<String, Value>>) -> Vec<MaterialRecord> {
        rows.into_iter().map(|row| self.decode(row)).collect()
    }
}

/// Read a stored array column.
///
/// Accepts canonical JSON (`["a","b"]`), the legacy single-quoted form
/// (`['a','b']`) and a bare scalar, which becomes a one-element sequence.
pub fn parse_array_sequence(value: Value) -> Value {
    let text = match &value {
        Value::Null | Value::Array(_) => return value,
        other => match scalar_text(other) {
            Some(text) => text,
            None => return value,
        },
    };

    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "[]" {
        return Value::Array(vec![]);
    }

    if let Some(items) = parse_json_array(trimmed) {
        return Value::Array(items);
    }
    if let Some(items) = parse_json_array(&trimmed.replace('\'', "\"")) {
        return Value::Array(items);
    }

    Value::Array(vec![Value::String(trimmed.to_string())])
}

/// Read a stored boolean-ish column. Unrecognised tokens come back untouched.
pub fn coerce_boolish(value: Value) -> Value {
    if value.is_boolean() {
        return value;
    }

    let token = match scalar_text(&value) {
        Some(text) => text.trim().to_lowercase(),
        None => return value,
    };

    if TRUE_TOKENS.contains(&token.as_str()) {
        Value::Bool(true)
    } else if FALSE_TOKENS.contains(&token.as_str()) {
        Value::Bool(false)
    } else {
        value
    }
}

fn parse_json_array(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

/// Text form of a stored value. Integral floats render without a fraction
/// so that a REAL `1.0` reads the same as an INTEGER `1`.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                Some(n.to_string())
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                        Some(format!("{}", f as i64))
                    }
                    _ => Some(n.to_string()),
                }
            }
        }
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}
