//! Unit functions exposed through the plugin registry

use larder_plugin::prelude::*;
use crate::amount::Amount;
use crate::catalog::{lookup_unit, Unit};
use crate::category::{target_units_for, units_in_category, UnitCategory};
use crate::convert::convert;
use crate::format::{format_quantity_with, FormatOptions};
use crate::helpers::{extract_number, extract_optional_text, extract_text, extract_unit};
use crate::scaling::scale_servings;

fn unit_list(units: Vec<Unit>) -> Value {
    Value::List(units.iter().map(Unit::to_value).collect())
}

// ============ convert ============

pub struct Convert;

static CONVERT_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("value", "Number", "Quantity to convert"),
    ArgMeta::required("from_unit", "Text", "Source unit (e.g., \"tbsp\")"),
    ArgMeta::required("to_unit", "Text", "Target unit (e.g., \"tsp\")"),
];

static CONVERT_EXAMPLES: [&str; 3] = [
    "convert(1, \"tbsp\", \"tsp\") → {value: 3, unit: \"tsp\"}",
    "convert(1, \"lb\", \"oz\") → {value: 16, unit: \"oz\"}",
    "convert(1, \"tsp\", \"oz\") → INCOMPATIBLE_UNITS",
];

static CONVERT_RELATED: [&str; 2] = ["target_units", "format_quantity"];

impl FunctionPlugin for Convert {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "convert",
            description: "Convert an amount to another unit of the same category",
            usage: "convert(value, from_unit, to_unit)",
            args: &CONVERT_ARGS,
            returns: "Object",
            examples: &CONVERT_EXAMPLES,
            category: "units",
            related: &CONVERT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() < 3 {
            return Value::Error(LarderError::arg_count("convert", 3, args.len()));
        }

        let value = match extract_number(&args[0], "convert", "value") {
            Ok(n) => n,
            Err(e) => return Value::Error(e),
        };
        let from = match extract_unit(&args[1], "convert", "from_unit") {
            Ok(u) => u,
            Err(e) => return Value::Error(e),
        };
        let to = match extract_unit(&args[2], "convert", "to_unit") {
            Ok(u) => u,
            Err(e) => return Value::Error(e),
        };

        match convert(Amount::new(value, from), to) {
            Ok(amount) => amount.to_value(),
            Err(e) => Value::Error(e.into()),
        }
    }
}

// ============ format_quantity ============

pub struct FormatQuantity;

static FORMAT_QUANTITY_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("value", "Number", "Quantity to display"),
    ArgMeta::optional("unit", "Text", "Unit of the quantity; omit for a bare number", "none"),
    ArgMeta::optional("locale", "Text", "Locale for number formatting", "server locale"),
];

static FORMAT_QUANTITY_EXAMPLES: [&str; 4] = [
    "format_quantity(0.25, \"cup\") → \"1/4 cup\"",
    "format_quantity(2, \"cup\") → \"2 cups\"",
    "format_quantity(1234.5, \"g\", \"de-DE\") → \"1.235 g\"",
    "format_quantity(12) → \"12\"",
];

static FORMAT_QUANTITY_RELATED: [&str; 1] = ["convert"];

impl FunctionPlugin for FormatQuantity {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "format_quantity",
            description: "Render a quantity as text with fractions and plural unit labels",
            usage: "format_quantity(value, [unit], [locale])",
            args: &FORMAT_QUANTITY_ARGS,
            returns: "Text",
            examples: &FORMAT_QUANTITY_EXAMPLES,
            category: "units",
            related: &FORMAT_QUANTITY_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        if args.is_empty() {
            return Value::Error(LarderError::arg_count("format_quantity", 1, 0));
        }

        let value = match extract_number(&args[0], "format_quantity", "value") {
            Ok(n) => n,
            Err(e) => return Value::Error(e),
        };

        // An unrecognised unit degrades to a bare number
        let unit = extract_optional_text(args, 1).and_then(|text| lookup_unit(&text).ok());
        let locale = extract_optional_text(args, 2).unwrap_or_else(|| ctx.locale.clone());

        let options = FormatOptions::for_locale(&locale)
            .with_significant_digits(ctx.significant_digits);
        Value::Text(format_quantity_with(value, unit, &options))
    }
}

// ============ unit_category ============

pub struct UnitCategoryFn;

static UNIT_CATEGORY_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("unit", "Text", "Unit shorthand or name"),
];

static UNIT_CATEGORY_EXAMPLES: [&str; 2] = [
    "unit_category(\"tbsp\") → \"volume\"",
    "unit_category(\"oz\") → \"weight\"",
];

static UNIT_CATEGORY_RELATED: [&str; 2] = ["units_in_category", "target_units"];

impl FunctionPlugin for UnitCategoryFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "unit_category",
            description: "Category (mass, weight, volume, piece) of a unit",
            usage: "unit_category(unit)",
            args: &UNIT_CATEGORY_ARGS,
            returns: "Text",
            examples: &UNIT_CATEGORY_EXAMPLES,
            category: "units",
            related: &UNIT_CATEGORY_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.is_empty() {
            return Value::Error(LarderError::arg_count("unit_category", 1, 0));
        }

        match extract_unit(&args[0], "unit_category", "unit") {
            Ok(unit) => Value::from(unit.category().name()),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ units_in_category ============

pub struct UnitsInCategory;

static UNITS_IN_CATEGORY_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("category", "Text", "One of mass, weight, volume, piece"),
];

static UNITS_IN_CATEGORY_EXAMPLES: [&str; 1] = [
    "units_in_category(\"weight\") → [{value: \"oz\", label: \"ounce\"}, {value: \"lb\", label: \"pound\"}]",
];

static UNITS_IN_CATEGORY_RELATED: [&str; 2] = ["unit_category", "target_units"];

impl FunctionPlugin for UnitsInCategory {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "units_in_category",
            description: "Units belonging to a category, in display order",
            usage: "units_in_category(category)",
            args: &UNITS_IN_CATEGORY_ARGS,
            returns: "List",
            examples: &UNITS_IN_CATEGORY_EXAMPLES,
            category: "units",
            related: &UNITS_IN_CATEGORY_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.is_empty() {
            return Value::Error(LarderError::arg_count("units_in_category", 1, 0));
        }

        let text = match extract_text(&args[0], "units_in_category", "category") {
            Ok(t) => t,
            Err(e) => return Value::Error(e),
        };

        match text.parse::<UnitCategory>() {
            Ok(category) => unit_list(units_in_category(category)),
            Err(e) => Value::Error(
                LarderError::domain_error(e).with_suggestion("Use mass, weight, volume or piece"),
            ),
        }
    }
}

// ============ target_units ============

pub struct TargetUnits;

static TARGET_UNITS_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("unit", "Text", "Current unit of the amount"),
];

static TARGET_UNITS_EXAMPLES: [&str; 2] = [
    "target_units(\"g\") → mg, g, kg, oz, lb",
    "target_units(\"cup\") → ml, l, tsp, tbsp, fl oz, cup, pt, qt, gal",
];

static TARGET_UNITS_RELATED: [&str; 2] = ["convert", "units_in_category"];

impl FunctionPlugin for TargetUnits {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "target_units",
            description: "Units offered when switching away from a unit (mass and weight are listed together)",
            usage: "target_units(unit)",
            args: &TARGET_UNITS_ARGS,
            returns: "List",
            examples: &TARGET_UNITS_EXAMPLES,
            category: "units",
            related: &TARGET_UNITS_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.is_empty() {
            return Value::Error(LarderError::arg_count("target_units", 1, 0));
        }

        match extract_unit(&args[0], "target_units", "unit") {
            Ok(unit) => unit_list(target_units_for(unit)),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ unit_lookup ============

pub struct UnitLookup;

static UNIT_LOOKUP_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("text", "Text", "Shorthand, name, plural or alias"),
];

static UNIT_LOOKUP_EXAMPLES: [&str; 2] = [
    "unit_lookup(\"Tablespoons\") → {value: \"tbsp\", label: \"tablespoon\", category: \"volume\"}",
    "unit_lookup(\"lbs\") → {value: \"lb\", label: \"pound\", category: \"weight\"}",
];

static UNIT_LOOKUP_RELATED: [&str; 1] = ["unit_category"];

impl FunctionPlugin for UnitLookup {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "unit_lookup",
            description: "Resolve a unit spelling to its catalog entry",
            usage: "unit_lookup(text)",
            args: &UNIT_LOOKUP_ARGS,
            returns: "Object",
            examples: &UNIT_LOOKUP_EXAMPLES,
            category: "units",
            related: &UNIT_LOOKUP_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.is_empty() {
            return Value::Error(LarderError::arg_count("unit_lookup", 1, 0));
        }

        match extract_unit(&args[0], "unit_lookup", "text") {
            Ok(unit) => Unit::of(unit).to_value(),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ scale_servings ============

pub struct ScaleServings;

static SCALE_SERVINGS_ARGS: [ArgMeta; 4] = [
    ArgMeta::required("value", "Number", "Ingredient quantity in the original recipe"),
    ArgMeta::required("unit", "Text", "Unit of the quantity"),
    ArgMeta::required("from_servings", "Number", "Servings the recipe makes"),
    ArgMeta::required("to_servings", "Number", "Servings wanted"),
];

static SCALE_SERVINGS_EXAMPLES: [&str; 2] = [
    "scale_servings(2, \"cup\", 4, 6) → {value: 3, unit: \"cup\"}",
    "scale_servings(100, \"g\", 12, 6) → {value: 50, unit: \"g\"}",
];

static SCALE_SERVINGS_RELATED: [&str; 2] = ["convert", "format_quantity"];

impl FunctionPlugin for ScaleServings {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "scale_servings",
            description: "Scale an ingredient amount for a different number of servings",
            usage: "scale_servings(value, unit, from_servings, to_servings)",
            args: &SCALE_SERVINGS_ARGS,
            returns: "Object",
            examples: &SCALE_SERVINGS_EXAMPLES,
            category: "units",
            related: &SCALE_SERVINGS_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() < 4 {
            return Value::Error(LarderError::arg_count("scale_servings", 4, args.len()));
        }

        let value = match extract_number(&args[0], "scale_servings", "value") {
            Ok(n) => n,
            Err(e) => return Value::Error(e),
        };
        let unit = match extract_unit(&args[1], "scale_servings", "unit") {
            Ok(u) => u,
            Err(e) => return Value::Error(e),
        };
        let from = match extract_number(&args[2], "scale_servings", "from_servings") {
            Ok(n) => n,
            Err(e) => return Value::Error(e),
        };
        let to = match extract_number(&args[3], "scale_servings", "to_servings") {
            Ok(n) => n,
            Err(e) => return Value::Error(e),
        };

        match scale_servings(Amount::new(value, unit), from, to) {
            Ok(amount) => amount.to_value(),
            Err(e) => Value::Error(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn ctx() -> EvalContext {
        EvalContext::new(Arc::new(PluginRegistry::new()))
    }

    fn text(s: &str) -> Value {
        Value::from(s)
    }

    #[test]
    fn test_convert_function() {
        let result = Convert.call(&[Value::Number(1.0), text("lb"), text("ounces")], &ctx());
        assert_eq!(result.get("unit"), text("oz"));
        match result.get("value") {
            Value::Number(n) => assert!((n - 16.0).abs() < 1e-9),
            other => panic!("Expected Number, got {:?}", other),
        }
    }

    #[test]
    fn test_convert_function_incompatible() {
        match Convert.call(&[Value::Number(1.0), text("tsp"), text("oz")], &ctx()) {
            Value::Error(e) => assert_eq!(e.code, codes::INCOMPATIBLE_UNITS),
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_convert_function_arg_errors() {
        match Convert.call(&[Value::Number(1.0)], &ctx()) {
            Value::Error(e) => assert_eq!(e.code, codes::ARG_COUNT),
            other => panic!("Expected Error, got {:?}", other),
        }
        match Convert.call(&[Value::Number(1.0), text("tsp"), text("dash")], &ctx()) {
            Value::Error(e) => assert_eq!(e.code, codes::UNKNOWN_UNIT),
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_format_quantity_function() {
        assert_eq!(FormatQuantity.call(&[Value::Number(0.25), text("cup")], &ctx()), text("1/4 cup"));
        assert_eq!(FormatQuantity.call(&[Value::Number(7.0)], &ctx()), text("7"));
        assert_eq!(
            FormatQuantity.call(&[Value::Number(1234.5), text("g"), text("de-DE")], &ctx()),
            text("1.235 g")
        );
    }

    #[test]
    fn test_format_quantity_uses_context_locale() {
        let ctx = ctx().with_locale("it-IT").with_significant_digits(3);
        assert_eq!(FormatQuantity.call(&[Value::Number(2.346), text("l")], &ctx), text("2,35 ℓ"));
    }

    #[test]
    fn test_format_quantity_unknown_unit_degrades() {
        assert_eq!(FormatQuantity.call(&[Value::Number(2.0), text("handful")], &ctx()), text("2"));
    }

    #[test]
    fn test_category_functions() {
        assert_eq!(UnitCategoryFn.call(&[text("tbsp")], &ctx()), text("volume"));

        let weight = UnitsInCategory.call(&[text("Weight")], &ctx());
        assert_eq!(weight.as_list().map(|l| l.len()), Some(2));
        assert!(UnitsInCategory.call(&[text("length")], &ctx()).is_error());

        let targets = TargetUnits.call(&[text("g")], &ctx());
        let shorthands: Vec<Value> = targets.as_list().unwrap().iter().map(|u| u.get("value")).collect();
        assert_eq!(shorthands, vec![text("mg"), text("g"), text("kg"), text("oz"), text("lb")]);
    }

    #[test]
    fn test_unit_lookup_function() {
        let entry = UnitLookup.call(&[text("Tablespoons")], &ctx());
        assert_eq!(entry.get("value"), text("tbsp"));
        assert_eq!(entry.get("label"), text("tablespoon"));
    }

    #[test]
    fn test_scale_servings_function() {
        let result = ScaleServings.call(
            &[Value::Number(2.0), text("cup"), Value::Number(4.0), Value::Number(6.0)],
            &ctx(),
        );
        assert_eq!(result.get("value"), Value::Number(3.0));
        assert_eq!(result.get("unit"), text("cup"));

        let bad = ScaleServings.call(
            &[Value::Number(2.0), text("cup"), Value::Number(0.0), Value::Number(6.0)],
            &ctx(),
        );
        assert!(bad.is_error());
    }
}
