//! Argument extraction for unit functions

use larder_core::{LarderError, Value};
use crate::catalog::{lookup_unit, UnitType};

/// Extract a number from a Value, returning error context
pub fn extract_number(value: &Value, func: &str, arg: &str) -> Result<f64, LarderError> {
    match value {
        Value::Number(n) => Ok(*n),
        // Numbers typed as text by tool clients
        Value::Text(s) => s.trim().parse::<f64>()
            .map_err(|_| LarderError::arg_type(func, arg, "Number", "Text")),
        Value::Null => Err(LarderError::arg_type(func, arg, "Number", "Null")),
        Value::Error(e) => Err(e.clone()),
        other => Err(LarderError::arg_type(func, arg, "Number", other.type_name())),
    }
}

/// Extract a text string from a Value
pub fn extract_text(value: &Value, func: &str, arg: &str) -> Result<String, LarderError> {
    match value {
        Value::Text(s) => Ok(s.clone()),
        Value::Null => Err(LarderError::arg_type(func, arg, "Text", "Null")),
        Value::Error(e) => Err(e.clone()),
        other => Err(LarderError::arg_type(func, arg, "Text", other.type_name())),
    }
}

/// Extract optional text (missing, null or empty all mean absent)
pub fn extract_optional_text(args: &[Value], index: usize) -> Option<String> {
    args.get(index).and_then(|v| match v {
        Value::Text(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    })
}

/// Extract a unit given by shorthand, label or alias
pub fn extract_unit(value: &Value, func: &str, arg: &str) -> Result<UnitType, LarderError> {
    let text = extract_text(value, func, arg)?;
    lookup_unit(&text).map_err(|e| LarderError::from(e).with_note(format!("in {}() argument '{}'", func, arg)))
}

/// Validate a positive, finite number
pub fn validate_positive(value: f64, func: &str, arg: &str) -> Result<(), LarderError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(LarderError::domain_error(format!(
            "{}(): {} must be positive, got {}",
            func, arg, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_number() {
        assert_eq!(extract_number(&Value::Number(42.0), "test", "arg").unwrap(), 42.0);
        assert_eq!(extract_number(&Value::from("1.5"), "test", "arg").unwrap(), 1.5);
        let err = extract_number(&Value::Bool(true), "test", "arg").unwrap_err();
        assert_eq!(err.code, "ARG_TYPE");
    }

    #[test]
    fn test_extract_unit() {
        assert_eq!(extract_unit(&Value::from("Cups"), "test", "unit").unwrap(), UnitType::Cup);
        let err = extract_unit(&Value::from("handful"), "test", "unit").unwrap_err();
        assert_eq!(err.code, "UNKNOWN_UNIT");
        assert_eq!(err.notes, vec!["in test() argument 'unit'".to_string()]);
    }

    #[test]
    fn test_extract_optional_text() {
        let args = [Value::Number(1.0), Value::from(""), Value::from("de-DE")];
        assert_eq!(extract_optional_text(&args, 1), None);
        assert_eq!(extract_optional_text(&args, 2).as_deref(), Some("de-DE"));
        assert_eq!(extract_optional_text(&args, 5), None);
    }
}
