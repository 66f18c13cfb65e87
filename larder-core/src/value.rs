//! Runtime values passed to and from unit functions
//!
//! Values can be numbers, text, booleans, objects, lists, null, or errors.
//! Errors travel as ordinary values so callers can degrade gracefully.

use crate::LarderError;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Runtime value in Larder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
    Object(HashMap<String, Value>),
    List(Vec<Value>),
    Null,
    Error(LarderError),
}

impl Value {
    // ========== Safe Accessors (never panic) ==========

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get field from object. Returns Error value if not found or not an object.
    pub fn get(&self, key: &str) -> Value {
        match self {
            Value::Object(map) => {
                map.get(key).cloned().unwrap_or_else(|| {
                    Value::Error(LarderError::new("UNDEFINED_FIELD", format!("Undefined field: {}", key)))
                })
            }
            Value::Error(e) => Value::Error(e.clone()),
            _ => Value::Error(LarderError::type_error("Object", self.type_name())),
        }
    }

    /// Type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Text(_) => "Text",
            Value::Bool(_) => "Bool",
            Value::Object(_) => "Object",
            Value::List(_) => "List",
            Value::Null => "Null",
            Value::Error(_) => "Error",
        }
    }

    /// Convert to number (may return Error)
    pub fn to_number(&self) -> Value {
        match self {
            Value::Number(n) => Value::Number(*n),
            Value::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) => Value::Number(n),
                Err(_) => Value::Error(LarderError::parse_error(format!("'{}' is not a number", s))),
            },
            Value::Error(e) => Value::Error(e.clone()),
            _ => Value::Error(LarderError::type_error("Number", self.type_name())),
        }
    }

    // ========== JSON Bridge ==========

    /// Build a value from tool-call JSON
    pub fn from_json(json: &JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => match n.as_f64() {
                Some(f) => Value::Number(f),
                None => Value::Text(n.to_string()),
            },
            JsonValue::String(s) => Value::Text(s.clone()),
            JsonValue::Array(arr) => Value::List(arr.iter().map(Value::from_json).collect()),
            JsonValue::Object(obj) => {
                Value::Object(obj.iter().map(|(k, v)| (k.clone(), Value::from_json(v))).collect())
            }
        }
    }

    /// Render a value as plain JSON for tool results
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            // Non-finite numbers have no JSON form
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(JsonValue::Number)
                .unwrap_or_else(|| JsonValue::String(n.to_string())),
            Value::Text(s) => JsonValue::String(s.clone()),
            Value::List(l) => JsonValue::Array(l.iter().map(Value::to_json).collect()),
            Value::Object(o) => {
                JsonValue::Object(o.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
            }
            Value::Error(e) => serde_json::json!({"_error": {"code": e.code, "message": e.message}}),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Object(obj) => {
                // Amounts display as "value unit"
                match (obj.get("value"), obj.get("unit")) {
                    (Some(Value::Number(v)), Some(Value::Text(u))) => write!(f, "{} {}", v, u),
                    _ => write!(f, "[Object]"),
                }
            }
            Value::List(items) => {
                if items.len() <= 5 {
                    let contents: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                    write!(f, "[{}]", contents.join(", "))
                } else {
                    write!(f, "[{}]", items.len())
                }
            }
            Value::Null => write!(f, "null"),
            Value::Error(e) => write!(f, "#ERROR: {}", e.code),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<LarderError> for Value {
    fn from(e: LarderError) -> Self {
        Value::Error(e)
    }
}
