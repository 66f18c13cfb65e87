//! Quantity formatting
//!
//! Turns a value and unit into display text: "1/4 cup", "2 cups", "250 g".
//! Formatting never fails; odd input degrades to a plain number.

use larder_plugin::{DEFAULT_LOCALE, DEFAULT_SIGNIFICANT_DIGITS};
use crate::catalog::UnitType;
use crate::fraction::MixedFraction;
use crate::locale::{format_decimal, group_digits, number_locale};

/// Values closer to zero than this display as "0"
pub const ZERO_EPSILON: f64 = 1e-5;

/// Display options for quantities
#[derive(Debug, Clone, PartialEq)]
pub struct FormatOptions {
    pub locale: String,
    pub significant_digits: u32,
    pub max_denominator: i64,
    pub fraction_tolerance: f64,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            locale: DEFAULT_LOCALE.to_string(),
            significant_digits: DEFAULT_SIGNIFICANT_DIGITS,
            max_denominator: 8,
            fraction_tolerance: 0.005,
        }
    }
}

impl FormatOptions {
    pub fn for_locale(locale: &str) -> Self {
        FormatOptions {
            locale: locale.to_string(),
            ..Default::default()
        }
    }

    pub fn with_significant_digits(mut self, digits: u32) -> Self {
        self.significant_digits = digits;
        self
    }
}

/// Format `value` with an optional unit using default options for `locale`
pub fn format_quantity(value: f64, unit: Option<UnitType>, locale: &str) -> String {
    format_quantity_with(value, unit, &FormatOptions::for_locale(locale))
}

/// Format `value` with an optional unit
pub fn format_quantity_with(value: f64, unit: Option<UnitType>, options: &FormatOptions) -> String {
    let locale = number_locale(&options.locale);
    let Some(unit) = unit else {
        return format_decimal(value, locale, options.significant_digits);
    };

    if value.abs() < ZERO_EPSILON {
        return with_label("0".to_string(), unit, 0.0);
    }

    if let Some(symbol) = metric_symbol(unit) {
        return format!("{} {}", format_decimal(value, locale, options.significant_digits), symbol);
    }

    match MixedFraction::approximate(value, options.max_denominator, options.fraction_tolerance) {
        Some(mixed) if !mixed.is_zero() => {
            let whole = group_digits(&mixed.whole.to_string(), locale);
            with_label(mixed.render(&whole), unit, mixed.value())
        }
        _ => with_label(format_decimal(value, locale, options.significant_digits), unit, value),
    }
}

/// Invariant symbol for metric units
fn metric_symbol(unit: UnitType) -> Option<&'static str> {
    match unit {
        UnitType::Milligram => Some("mg"),
        UnitType::Gram => Some("g"),
        UnitType::Kilogram => Some("kg"),
        UnitType::Milliliter => Some("mL"),
        UnitType::Liter => Some("ℓ"),
        _ => None,
    }
}

/// Attach the unit label, singular for values in (0, 1]
fn with_label(number: String, unit: UnitType, shown: f64) -> String {
    if let Some(symbol) = metric_symbol(unit) {
        return format!("{} {}", number, symbol);
    }
    if unit == UnitType::Piece {
        return number;
    }
    let name = unit.name();
    let magnitude = shown.abs();
    let label = if magnitude > 0.0 && magnitude <= 1.0 { name.label() } else { name.plural() };
    format!("{} {}", number, label)
}
