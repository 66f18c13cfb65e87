//! Conversion engine
//!
//! Converts an amount to another unit of the same category. Failures are
//! ordinary `Err` values; nothing here panics.

use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;
use larder_core::LarderError;
use crate::amount::Amount;
use crate::catalog::{unit_type_from_shorthand, UnitType};
use crate::category::{category_for, UnitCategory};

/// Milliliters in one US teaspoon
pub const ML_PER_TEASPOON: f64 = 4.92892159375;

/// Factor from each unit to the base unit of its category:
/// grams for mass, ounces for weight, milliliters for volume.
/// Count units have no entry.
static FACTORS: LazyLock<HashMap<UnitType, f64>> = LazyLock::new(|| {
    let tsp = ML_PER_TEASPOON;
    HashMap::from([
        (UnitType::Milligram, 0.001),
        (UnitType::Gram, 1.0),
        (UnitType::Kilogram, 1000.0),
        (UnitType::Ounce, 1.0),
        (UnitType::Pound, 16.0),
        (UnitType::Milliliter, 1.0),
        (UnitType::Liter, 1000.0),
        (UnitType::Teaspoon, tsp),
        (UnitType::Tablespoon, tsp * 3.0),
        (UnitType::FluidOunce, tsp * 6.0),
        (UnitType::Cup, tsp * 48.0),
        (UnitType::Pint, tsp * 96.0),
        (UnitType::Quart, tsp * 192.0),
        (UnitType::Gallon, tsp * 768.0),
    ])
});

/// Errors that can occur during unit conversion
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// No catalog entry or conversion factor for the unit
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    /// Units belong to categories that cannot be bridged
    #[error("cannot convert {from} ({from_category}) to {to} ({to_category}): incompatible units")]
    IncompatibleUnits {
        from: UnitType,
        to: UnitType,
        from_category: UnitCategory,
        to_category: UnitCategory,
    },
}

impl From<ConversionError> for LarderError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::UnknownUnit(unit) => LarderError::unknown_unit(&unit),
            ConversionError::IncompatibleUnits { from, to, from_category, to_category } => {
                LarderError::incompatible_units(
                    from.shorthand(),
                    to.shorthand(),
                    from_category.name(),
                    to_category.name(),
                )
            }
        }
    }
}

fn factor(unit: UnitType) -> Result<f64, ConversionError> {
    FACTORS.get(&unit)
        .copied()
        .ok_or_else(|| ConversionError::UnknownUnit(unit.shorthand().to_string()))
}

/// Convert an amount to `target`
///
/// Same-unit conversion is the identity. Otherwise both units must share a
/// category with numeric factors; mass and weight do not mix, and count
/// units only convert to themselves.
pub fn convert(amount: Amount, target: UnitType) -> Result<Amount, ConversionError> {
    if amount.unit == target {
        return Ok(Amount::new(amount.value, target));
    }

    let from_category = category_for(amount.unit);
    let to_category = category_for(target);
    if from_category != to_category || from_category == UnitCategory::Piece {
        debug!(from = %amount.unit, to = %target, "rejected conversion across categories");
        return Err(ConversionError::IncompatibleUnits {
            from: amount.unit,
            to: target,
            from_category,
            to_category,
        });
    }

    let ratio = factor(amount.unit)? / factor(target)?;
    Ok(Amount::new(amount.value * ratio, target))
}

/// `convert` with the target fixed
pub fn convert_to(target: UnitType) -> impl Fn(Amount) -> Result<Amount, ConversionError> {
    move |amount| convert(amount, target)
}

/// `convert` with the amount fixed
pub fn convert_from(amount: Amount) -> impl Fn(UnitType) -> Result<Amount, ConversionError> {
    move |target| convert(amount, target)
}

/// Whether `from` can be converted to `to`
pub fn is_convertible(from: UnitType, to: UnitType) -> bool {
    convert(Amount::new(1.0, from), to).is_ok()
}

/// Convert a value between two persisted shorthands
pub fn convert_shorthand(value: f64, from: &str, to: &str) -> Result<Amount, ConversionError> {
    let from = unit_type_from_shorthand(from)?;
    let to = unit_type_from_shorthand(to)?;
    convert(Amount::new(value, from), to)
}
