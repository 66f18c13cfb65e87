//! Larder Units - Cooking Unit Catalog and Conversion
//!
//! Converts ingredient amounts between kitchen units and renders them
//! for display.
//!
//! Categories:
//! - Mass (mg, g, kg)
//! - Weight (oz, lb)
//! - Volume (ml, l, tsp, tbsp, fl oz, cup, pt, qt, gal)
//! - Piece (pc, pinch)
//!
//! Mass and weight are kept apart: grams never convert to ounces.

mod catalog;
mod category;
mod amount;
mod convert;
mod fraction;
mod locale;
mod format;
mod scaling;
mod helpers;
mod functions;

pub use catalog::{UnitType, UnitName, Unit, UnitCatalog, UNITS, unit_for, unit_type_from_shorthand, lookup_unit};
pub use category::{UnitCategory, category_for, units_in_category, target_units_for};
pub use amount::Amount;
pub use convert::{convert, convert_to, convert_from, is_convertible, convert_shorthand, ConversionError, ML_PER_TEASPOON};
pub use fraction::MixedFraction;
pub use locale::{NumberLocale, number_locale, find_number_locale, format_decimal};
pub use format::{format_quantity, format_quantity_with, FormatOptions, ZERO_EPSILON};
pub use scaling::scale_servings;

use larder_plugin::PluginRegistry;

/// Load unit functions into registry
pub fn load_units_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        // Conversion (2 functions)
        .with_function(functions::Convert)
        .with_function(functions::ScaleServings)

        // Display (1 function)
        .with_function(functions::FormatQuantity)

        // Catalog (4 functions)
        .with_function(functions::UnitCategoryFn)
        .with_function(functions::UnitsInCategory)
        .with_function(functions::TargetUnits)
        .with_function(functions::UnitLookup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::Value;
    use larder_plugin::EvalContext;
    use std::sync::Arc;

    #[test]
    fn test_library_registers_all_functions() {
        let registry = load_units_library(PluginRegistry::new());
        let names: Vec<&str> = registry.function_metas().iter().map(|m| m.name).collect();
        assert_eq!(
            names,
            vec![
                "convert",
                "format_quantity",
                "scale_servings",
                "target_units",
                "unit_category",
                "unit_lookup",
                "units_in_category",
            ]
        );
    }

    #[test]
    fn test_call_through_registry() {
        let registry = Arc::new(load_units_library(PluginRegistry::new()));
        let ctx = EvalContext::new(registry.clone());

        let scaled = registry.call_function(
            "scale_servings",
            &[Value::Number(2.0), Value::from("cups"), Value::Number(4.0), Value::Number(6.0)],
            &ctx,
        );
        let text = registry.call_function(
            "format_quantity",
            &[scaled.get("value"), scaled.get("unit")],
            &ctx,
        );
        assert_eq!(text, Value::from("3 cups"));
    }

    #[test]
    fn test_amount_display_matches_formatter() {
        let amount = Amount::new(1.5, UnitType::Cup);
        assert_eq!(amount.to_string(), "1 1/2 cups");
        let tsp = convert_shorthand(1.0, "tbsp", "tsp").unwrap();
        assert!((tsp.value - 3.0).abs() < 1e-9);
    }
}
