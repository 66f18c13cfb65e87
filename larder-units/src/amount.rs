//! Amount type - a value with an associated cooking unit

use std::fmt;
use serde::{Serialize, Deserialize};
use larder_core::Value;
use crate::catalog::UnitType;
use crate::category::UnitCategory;
use crate::convert::{self, ConversionError};
use crate::format;

/// A quantity of an ingredient: `{ "value": 2, "unit": "tbsp" }` when persisted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    pub value: f64,
    pub unit: UnitType,
}

impl Amount {
    pub fn new(value: f64, unit: UnitType) -> Self {
        Amount { value, unit }
    }

    pub fn category(&self) -> UnitCategory {
        self.unit.category()
    }

    /// Convert to another unit
    pub fn convert(self, target: UnitType) -> Result<Amount, ConversionError> {
        convert::convert(self, target)
    }

    /// Convert to another unit, keeping this amount when the units don't mix
    pub fn convert_or_keep(self, target: UnitType) -> Amount {
        self.convert(target).unwrap_or(self)
    }

    /// Multiply the value, keeping the unit
    pub fn scale(self, factor: f64) -> Amount {
        Amount::new(self.value * factor, self.unit)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(
            [
                ("value".to_string(), Value::Number(self.value)),
                ("unit".to_string(), Value::from(self.unit.shorthand())),
            ]
            .into_iter()
            .collect(),
        )
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format::format_quantity(self.value, Some(self.unit), larder_plugin::DEFAULT_LOCALE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_document_shape() {
        let amount: Amount = serde_json::from_str(r#"{"value": 2, "unit": "tbsp"}"#).unwrap();
        assert_eq!(amount, Amount::new(2.0, UnitType::Tablespoon));

        let json = serde_json::to_value(Amount::new(0.5, UnitType::FluidOunce)).unwrap();
        assert_eq!(json, serde_json::json!({"value": 0.5, "unit": "fl oz"}));
    }

    #[test]
    fn test_unknown_persisted_unit_rejected() {
        assert!(serde_json::from_str::<Amount>(r#"{"value": 1, "unit": "dash"}"#).is_err());
    }

    #[test]
    fn test_convert_or_keep() {
        let tsp = Amount::new(1.0, UnitType::Teaspoon);
        assert_eq!(tsp.convert_or_keep(UnitType::Ounce), tsp);
        let ml = tsp.convert_or_keep(UnitType::Milliliter);
        assert_eq!(ml.unit, UnitType::Milliliter);
        assert!((ml.value - 4.92892159375).abs() < 1e-12);
    }

    #[test]
    fn test_scale_keeps_unit() {
        let scaled = Amount::new(1.5, UnitType::Cup).scale(2.0);
        assert_eq!(scaled, Amount::new(3.0, UnitType::Cup));
    }

    #[test]
    fn test_display_formats_quantity() {
        assert_eq!(Amount::new(0.5, UnitType::Cup).to_string(), "1/2 cup");
        assert_eq!(Amount::new(250.0, UnitType::Gram).to_string(), "250 g");
    }
}
