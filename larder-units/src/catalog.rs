//! Unit catalog - the fixed set of cooking units, their labels and shorthands

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use serde::{Serialize, Deserialize};
use larder_core::Value;
use crate::category::UnitCategory;
use crate::convert::ConversionError;

/// Global unit catalog
pub static UNITS: LazyLock<UnitCatalog> = LazyLock::new(UnitCatalog::new);

/// Canonical unit code. Serializes as the shorthand stored in recipe documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitType {
    #[serde(rename = "mg")]
    Milligram,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "oz")]
    Ounce,
    #[serde(rename = "lb")]
    Pound,
    #[serde(rename = "ml")]
    Milliliter,
    #[serde(rename = "l")]
    Liter,
    #[serde(rename = "tsp")]
    Teaspoon,
    #[serde(rename = "tbsp")]
    Tablespoon,
    #[serde(rename = "fl oz")]
    FluidOunce,
    #[serde(rename = "cup")]
    Cup,
    #[serde(rename = "pt")]
    Pint,
    #[serde(rename = "qt")]
    Quart,
    #[serde(rename = "gal")]
    Gallon,
    #[serde(rename = "pc")]
    Piece,
    #[serde(rename = "pinch")]
    Pinch,
}

impl UnitType {
    /// Every unit, in display order
    pub const ALL: [UnitType; 16] = [
        UnitType::Milligram,
        UnitType::Gram,
        UnitType::Kilogram,
        UnitType::Ounce,
        UnitType::Pound,
        UnitType::Milliliter,
        UnitType::Liter,
        UnitType::Teaspoon,
        UnitType::Tablespoon,
        UnitType::FluidOunce,
        UnitType::Cup,
        UnitType::Pint,
        UnitType::Quart,
        UnitType::Gallon,
        UnitType::Piece,
        UnitType::Pinch,
    ];

    /// Shorthand as persisted in recipe documents
    pub fn shorthand(self) -> &'static str {
        match self {
            UnitType::Milligram => "mg",
            UnitType::Gram => "g",
            UnitType::Kilogram => "kg",
            UnitType::Ounce => "oz",
            UnitType::Pound => "lb",
            UnitType::Milliliter => "ml",
            UnitType::Liter => "l",
            UnitType::Teaspoon => "tsp",
            UnitType::Tablespoon => "tbsp",
            UnitType::FluidOunce => "fl oz",
            UnitType::Cup => "cup",
            UnitType::Pint => "pt",
            UnitType::Quart => "qt",
            UnitType::Gallon => "gal",
            UnitType::Piece => "pc",
            UnitType::Pinch => "pinch",
        }
    }

    pub fn name(self) -> UnitName {
        match self {
            UnitType::Milligram => UnitName::Milligram,
            UnitType::Gram => UnitName::Gram,
            UnitType::Kilogram => UnitName::Kilogram,
            UnitType::Ounce => UnitName::Ounce,
            UnitType::Pound => UnitName::Pound,
            UnitType::Milliliter => UnitName::Milliliter,
            UnitType::Liter => UnitName::Liter,
            UnitType::Teaspoon => UnitName::Teaspoon,
            UnitType::Tablespoon => UnitName::Tablespoon,
            UnitType::FluidOunce => UnitName::FluidOunce,
            UnitType::Cup => UnitName::Cup,
            UnitType::Pint => UnitName::Pint,
            UnitType::Quart => UnitName::Quart,
            UnitType::Gallon => UnitName::Gallon,
            UnitType::Piece => UnitName::Piece,
            UnitType::Pinch => UnitName::Pinch,
        }
    }

    pub fn category(self) -> UnitCategory {
        match self {
            UnitType::Milligram | UnitType::Gram | UnitType::Kilogram => UnitCategory::Mass,
            UnitType::Ounce | UnitType::Pound => UnitCategory::Weight,
            UnitType::Milliliter
            | UnitType::Liter
            | UnitType::Teaspoon
            | UnitType::Tablespoon
            | UnitType::FluidOunce
            | UnitType::Cup
            | UnitType::Pint
            | UnitType::Quart
            | UnitType::Gallon => UnitCategory::Volume,
            UnitType::Piece | UnitType::Pinch => UnitCategory::Piece,
        }
    }

    /// Metric units display with an invariant symbol instead of a word
    pub fn is_metric(self) -> bool {
        matches!(
            self,
            UnitType::Milligram
                | UnitType::Gram
                | UnitType::Kilogram
                | UnitType::Milliliter
                | UnitType::Liter
        )
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.shorthand())
    }
}

impl FromStr for UnitType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        unit_type_from_shorthand(s)
    }
}

/// Human-readable label, one per `UnitType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitName {
    Milligram,
    Gram,
    Kilogram,
    Ounce,
    Pound,
    Milliliter,
    Liter,
    Teaspoon,
    Tablespoon,
    FluidOunce,
    Cup,
    Pint,
    Quart,
    Gallon,
    Piece,
    Pinch,
}

impl UnitName {
    pub const ALL: [UnitName; 16] = [
        UnitName::Milligram,
        UnitName::Gram,
        UnitName::Kilogram,
        UnitName::Ounce,
        UnitName::Pound,
        UnitName::Milliliter,
        UnitName::Liter,
        UnitName::Teaspoon,
        UnitName::Tablespoon,
        UnitName::FluidOunce,
        UnitName::Cup,
        UnitName::Pint,
        UnitName::Quart,
        UnitName::Gallon,
        UnitName::Piece,
        UnitName::Pinch,
    ];

    pub fn unit_type(self) -> UnitType {
        match self {
            UnitName::Milligram => UnitType::Milligram,
            UnitName::Gram => UnitType::Gram,
            UnitName::Kilogram => UnitType::Kilogram,
            UnitName::Ounce => UnitType::Ounce,
            UnitName::Pound => UnitType::Pound,
            UnitName::Milliliter => UnitType::Milliliter,
            UnitName::Liter => UnitType::Liter,
            UnitName::Teaspoon => UnitType::Teaspoon,
            UnitName::Tablespoon => UnitType::Tablespoon,
            UnitName::FluidOunce => UnitType::FluidOunce,
            UnitName::Cup => UnitType::Cup,
            UnitName::Pint => UnitType::Pint,
            UnitName::Quart => UnitType::Quart,
            UnitName::Gallon => UnitType::Gallon,
            UnitName::Piece => UnitType::Piece,
            UnitName::Pinch => UnitType::Pinch,
        }
    }

    /// Singular label
    pub fn label(self) -> &'static str {
        match self {
            UnitName::Milligram => "milligram",
            UnitName::Gram => "gram",
            UnitName::Kilogram => "kilogram",
            UnitName::Ounce => "ounce",
            UnitName::Pound => "pound",
            UnitName::Milliliter => "milliliter",
            UnitName::Liter => "liter",
            UnitName::Teaspoon => "teaspoon",
            UnitName::Tablespoon => "tablespoon",
            UnitName::FluidOunce => "fluid ounce",
            UnitName::Cup => "cup",
            UnitName::Pint => "pint",
            UnitName::Quart => "quart",
            UnitName::Gallon => "gallon",
            UnitName::Piece => "piece",
            UnitName::Pinch => "pinch",
        }
    }

    /// Plural label (English rules)
    pub fn plural(self) -> &'static str {
        match self {
            UnitName::Milligram => "milligrams",
            UnitName::Gram => "grams",
            UnitName::Kilogram => "kilograms",
            UnitName::Ounce => "ounces",
            UnitName::Pound => "pounds",
            UnitName::Milliliter => "milliliters",
            UnitName::Liter => "liters",
            UnitName::Teaspoon => "teaspoons",
            UnitName::Tablespoon => "tablespoons",
            UnitName::FluidOunce => "fluid ounces",
            UnitName::Cup => "cups",
            UnitName::Pint => "pints",
            UnitName::Quart => "quarts",
            UnitName::Gallon => "gallons",
            UnitName::Piece => "pieces",
            UnitName::Pinch => "pinches",
        }
    }
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Catalog entry exposed to pick lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub value: UnitType,
    pub label: UnitName,
}

impl Unit {
    pub fn of(unit: UnitType) -> Self {
        Unit { value: unit, label: unit.name() }
    }

    pub fn category(&self) -> UnitCategory {
        self.value.category()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(
            [
                ("value".to_string(), Value::from(self.value.shorthand())),
                ("label".to_string(), Value::from(self.label.label())),
                ("category".to_string(), Value::from(self.category().name())),
            ]
            .into_iter()
            .collect(),
        )
    }
}

/// Look up the catalog entry for a label
pub fn unit_for(name: UnitName) -> Unit {
    Unit::of(name.unit_type())
}

/// Resolve an exact shorthand (`"tbsp"`, `"fl oz"`) to its unit
pub fn unit_type_from_shorthand(code: &str) -> Result<UnitType, ConversionError> {
    UNITS.get_shorthand(code)
        .ok_or_else(|| ConversionError::UnknownUnit(code.to_string()))
}

/// Resolve a shorthand, label, plural or common alias, ignoring case and spacing
pub fn lookup_unit(text: &str) -> Result<UnitType, ConversionError> {
    UNITS.lookup(text)
        .ok_or_else(|| ConversionError::UnknownUnit(text.trim().to_string()))
}

/// Registry of all catalog units
pub struct UnitCatalog {
    entries: Vec<Unit>,
    shorthands: HashMap<&'static str, UnitType>,
    aliases: HashMap<String, UnitType>,
}

impl UnitCatalog {
    pub fn new() -> Self {
        let mut catalog = UnitCatalog {
            entries: Vec::with_capacity(UnitType::ALL.len()),
            shorthands: HashMap::new(),
            aliases: HashMap::new(),
        };
        for unit in UnitType::ALL {
            catalog.register(unit);
        }
        catalog.register_aliases();
        catalog
    }

    /// All entries in display order
    pub fn entries(&self) -> &[Unit] {
        &self.entries
    }

    /// Exact shorthand lookup
    pub fn get_shorthand(&self, code: &str) -> Option<UnitType> {
        self.shorthands.get(code).copied()
    }

    /// Lenient lookup: shorthand first, then aliases
    pub fn lookup(&self, text: &str) -> Option<UnitType> {
        let key = normalize(text);
        self.shorthands.get(key.as_str())
            .or_else(|| self.aliases.get(&key))
            .copied()
    }

    /// Entries of one category, in display order
    pub fn by_category(&self, category: UnitCategory) -> Vec<Unit> {
        self.entries.iter()
            .filter(|u| u.category() == category)
            .copied()
            .collect()
    }

    /// Every entry grouped by category
    pub fn grouped(&self) -> Vec<(UnitCategory, Vec<Unit>)> {
        UnitCategory::ALL.iter()
            .map(|&category| (category, self.by_category(category)))
            .collect()
    }

    fn register(&mut self, unit: UnitType) {
        let previous = self.shorthands.insert(unit.shorthand(), unit);
        debug_assert!(previous.is_none(), "duplicate shorthand {}", unit.shorthand());
        self.entries.push(Unit::of(unit));
        self.alias(unit.name().label(), unit);
        self.alias(unit.name().plural(), unit);
    }

    fn alias(&mut self, alias: &str, unit: UnitType) {
        self.aliases.insert(alias.to_string(), unit);
    }

    fn register_aliases(&mut self) {
        self.alias("mgs", UnitType::Milligram);
        self.alias("gr", UnitType::Gram);
        self.alias("gm", UnitType::Gram);
        self.alias("gms", UnitType::Gram);
        self.alias("gramme", UnitType::Gram);
        self.alias("grammes", UnitType::Gram);
        self.alias("kgs", UnitType::Kilogram);
        self.alias("kilo", UnitType::Kilogram);
        self.alias("kilos", UnitType::Kilogram);
        self.alias("ozs", UnitType::Ounce);
        self.alias("lbs", UnitType::Pound);
        self.alias("millilitre", UnitType::Milliliter);
        self.alias("millilitres", UnitType::Milliliter);
        self.alias("ltr", UnitType::Liter);
        self.alias("litre", UnitType::Liter);
        self.alias("litres", UnitType::Liter);
        self.alias("ℓ", UnitType::Liter);
        self.alias("tsps", UnitType::Teaspoon);
        self.alias("tbs", UnitType::Tablespoon);
        self.alias("tbl", UnitType::Tablespoon);
        self.alias("tbsps", UnitType::Tablespoon);
        self.alias("floz", UnitType::FluidOunce);
        self.alias("fl. oz", UnitType::FluidOunce);
        self.alias("fl. oz.", UnitType::FluidOunce);
        self.alias("cups", UnitType::Cup);
        self.alias("c", UnitType::Cup);
        self.alias("pts", UnitType::Pint);
        self.alias("qts", UnitType::Quart);
        self.alias("gals", UnitType::Gallon);
        self.alias("pcs", UnitType::Piece);
        self.alias("ea", UnitType::Piece);
        self.alias("each", UnitType::Piece);
    }
}

impl Default for UnitCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase, trim and collapse inner whitespace
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
