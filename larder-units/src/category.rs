//! Category resolution
//!
//! Every unit belongs to exactly one category. Conversions only happen inside
//! a category; the Mass/Weight grouping below is for pick lists only.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use crate::catalog::{Unit, UnitType, UNITS};

/// Physical dimension grouping of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    /// Metric mass (mg, g, kg)
    Mass,
    /// Avoirdupois weight (oz, lb)
    Weight,
    Volume,
    /// Counted units that never convert
    Piece,
}

impl UnitCategory {
    pub const ALL: [UnitCategory; 4] = [
        UnitCategory::Mass,
        UnitCategory::Weight,
        UnitCategory::Volume,
        UnitCategory::Piece,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UnitCategory::Mass => "mass",
            UnitCategory::Weight => "weight",
            UnitCategory::Volume => "volume",
            UnitCategory::Piece => "piece",
        }
    }

    /// Categories offered together in a target-unit pick list
    pub fn display_group(self) -> &'static [UnitCategory] {
        match self {
            UnitCategory::Mass | UnitCategory::Weight => &[UnitCategory::Mass, UnitCategory::Weight],
            UnitCategory::Volume => &[UnitCategory::Volume],
            UnitCategory::Piece => &[UnitCategory::Piece],
        }
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for UnitCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        UnitCategory::ALL.iter()
            .copied()
            .find(|c| c.name() == key)
            .ok_or_else(|| format!("unknown unit category: {}", s.trim()))
    }
}

/// Category of a unit
pub fn category_for(unit: UnitType) -> UnitCategory {
    unit.category()
}

/// Catalog entries of a category, in display order
pub fn units_in_category(category: UnitCategory) -> Vec<Unit> {
    UNITS.by_category(category)
}

/// Sensible target units when switching away from `unit`
///
/// Mass and weight units are listed together even though the engine
/// refuses to convert between them.
pub fn target_units_for(unit: UnitType) -> Vec<Unit> {
    category_for(unit)
        .display_group()
        .iter()
        .flat_map(|&category| units_in_category(category))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(units: &[Unit]) -> Vec<UnitType> {
        units.iter().map(|u| u.value).collect()
    }

    #[test]
    fn test_category_for() {
        assert_eq!(category_for(UnitType::Gram), UnitCategory::Mass);
        assert_eq!(category_for(UnitType::Pound), UnitCategory::Weight);
        assert_eq!(category_for(UnitType::FluidOunce), UnitCategory::Volume);
        assert_eq!(category_for(UnitType::Pinch), UnitCategory::Piece);
    }

    #[test]
    fn test_every_unit_in_exactly_one_category() {
        for unit in UnitType::ALL {
            let hits = UnitCategory::ALL.iter()
                .filter(|&&c| units_in_category(c).iter().any(|u| u.value == unit))
                .count();
            assert_eq!(hits, 1, "{} listed in {} categories", unit, hits);
        }
    }

    #[test]
    fn test_units_in_category_order() {
        assert_eq!(
            values(&units_in_category(UnitCategory::Mass)),
            vec![UnitType::Milligram, UnitType::Gram, UnitType::Kilogram]
        );
        assert_eq!(
            values(&units_in_category(UnitCategory::Volume)),
            vec![
                UnitType::Milliliter, UnitType::Liter, UnitType::Teaspoon, UnitType::Tablespoon,
                UnitType::FluidOunce, UnitType::Cup, UnitType::Pint, UnitType::Quart, UnitType::Gallon,
            ]
        );
    }

    #[test]
    fn test_targets_group_mass_and_weight() {
        let expected = vec![
            UnitType::Milligram, UnitType::Gram, UnitType::Kilogram,
            UnitType::Ounce, UnitType::Pound,
        ];
        assert_eq!(values(&target_units_for(UnitType::Gram)), expected);
        assert_eq!(values(&target_units_for(UnitType::Ounce)), expected);
    }

    #[test]
    fn test_targets_for_volume_and_piece() {
        assert_eq!(target_units_for(UnitType::Cup).len(), 9);
        assert_eq!(
            values(&target_units_for(UnitType::Piece)),
            vec![UnitType::Piece, UnitType::Pinch]
        );
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(" Volume ".parse::<UnitCategory>().unwrap(), UnitCategory::Volume);
        assert!("length".parse::<UnitCategory>().is_err());
    }
}
