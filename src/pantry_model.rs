//! # Pantry and Recipe Data Model
//!
//! This module defines the data structures shared by the planning engine:
//! recipes with their ingredient lists, pantry rows with on-hand stock,
//! planned order counts, and the completed-cook history records.
//!
//! ## Core Concepts
//!
//! - **Ingredient**: a named quantity in one of six fixed units
//! - **Recipe**: an ordered ingredient list with a category and optional times
//! - **PantryItem**: an ingredient already in stock, independent of any recipe
//! - **CompletedCook**: one "batch cooked" event in the undo history
//!
//! ## Usage
//!
//! ```rust
//! use smart_pantry::pantry_model::{Category, Ingredient, Recipe, Unit};
//!
//! let challah = Recipe::new("r1", "Challah", Category::Pareve)
//!     .with_ingredient(Ingredient::new("flour", 500.0, Unit::Grams))
//!     .with_ingredient(Ingredient::new("eggs", 2.0, Unit::Units))
//!     .with_prep_time(30);
//!
//! assert_eq!(challah.ingredients.len(), 2);
//! ```
//!
//! All types serialize with the field names the persisted JSON snapshots use
//! (`recipeId`, `imageUrl`, millisecond timestamps), so existing snapshots
//! load unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Measurement units supported by recipes and the pantry.
///
/// Identity-relevant: two ingredients with the same name but different units
/// are distinct entries everywhere in the engine. There is no automatic
/// conversion between `Grams` and `Kg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Grams
    Grams,
    /// Kilograms
    Kg,
    /// Individual pieces/items
    Units,
    /// Liters
    Liters,
    /// Cans
    Cans,
    /// Packs/packages
    Packs,
}

impl Unit {
    /// Short display label for the unit
    pub fn display_name(&self) -> &'static str {
        match self {
            Unit::Grams => "g",
            Unit::Kg => "kg",
            Unit::Units => "units",
            Unit::Liters => "L",
            Unit::Cans => "cans",
            Unit::Packs => "packs",
        }
    }

    /// Stable identifier used in identity keys and persisted snapshots
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Grams => "grams",
            Unit::Kg => "kg",
            Unit::Units => "units",
            Unit::Liters => "liters",
            Unit::Cans => "cans",
            Unit::Packs => "packs",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Recipe categories, following household kosher-kitchen conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Meat dishes
    Meat,
    /// Dairy dishes
    Dairy,
    /// Neither meat nor dairy
    Pareve,
    /// Desserts
    Dessert,
    /// Everything else
    Other,
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

/// A named quantity of something a recipe needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// The ingredient name as the user typed it (e.g., "flour", "Olive Oil")
    pub name: String,

    /// Amount needed for a single batch; positive at entry time
    pub quantity: f64,

    /// Measurement unit
    pub unit: Unit,
}

impl Ingredient {
    /// Create a new ingredient
    pub fn new(name: &str, quantity: f64, unit: Unit) -> Self {
        Self {
            name: name.to_string(),
            quantity,
            unit,
        }
    }

    /// Check that the ingredient is acceptable for entry into a recipe
    /// or the pantry: non-blank name and positive quantity.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        if self.quantity <= 0.0 || !self.quantity.is_finite() {
            return Err(ValidationError::NonPositiveQuantity(self.quantity));
        }
        Ok(())
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.quantity, self.unit, self.name)
    }
}

/// A recipe: ingredient list plus presentation metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Opaque identifier, unique within the recipe collection
    pub id: String,

    /// Recipe name
    pub name: String,

    /// Kitchen category
    #[serde(default)]
    pub category: Category,

    /// Ingredients for a single batch, in entry order
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,

    /// Optional photo (data URL or http URL)
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Preparation time in minutes
    #[serde(rename = "prepTime", skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<u32>,

    /// Cooking time in minutes
    #[serde(rename = "cookTime", skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<u32>,
}

impl Recipe {
    /// Create a new recipe with no ingredients
    pub fn new(id: &str, name: &str, category: Category) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category,
            ingredients: Vec::new(),
            image_url: None,
            prep_time: None,
            cook_time: None,
        }
    }

    /// Append an ingredient
    pub fn with_ingredient(mut self, ingredient: Ingredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    /// Set the preparation time in minutes
    pub fn with_prep_time(mut self, minutes: u32) -> Self {
        self.prep_time = Some(minutes);
        self
    }

    /// Set the cooking time in minutes
    pub fn with_cook_time(mut self, minutes: u32) -> Self {
        self.cook_time = Some(minutes);
        self
    }

    /// Set the recipe image
    pub fn with_image_url(mut self, url: &str) -> Self {
        self.image_url = Some(url.to_string());
        self
    }

    /// Validate the recipe for entry into the store: non-blank recipe name
    /// and every ingredient individually valid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        for ingredient in &self.ingredients {
            ingredient.validate()?;
        }
        Ok(())
    }
}

/// An ingredient already on hand, independent of any recipe.
///
/// Unique per `(normalized name, unit)` key within the pantry collection;
/// the state store reconciles duplicates on write. Quantity may legitimately
/// be zero after cooking consumed the stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PantryItem {
    /// Item name as the user typed it
    pub name: String,

    /// On-hand amount, never negative
    pub quantity: f64,

    /// Measurement unit
    pub unit: Unit,
}

impl PantryItem {
    /// Create a new pantry row
    pub fn new(name: &str, quantity: f64, unit: Unit) -> Self {
        Self {
            name: name.to_string(),
            quantity,
            unit,
        }
    }

    /// Check that the row is acceptable for entry: non-blank name and
    /// non-negative quantity (zero stock is a valid pantry row).
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        if self.quantity < 0.0 || !self.quantity.is_finite() {
            return Err(ValidationError::NegativeQuantity(self.quantity));
        }
        Ok(())
    }
}

/// Planned batch counts, keyed by recipe id. Zero or missing means
/// "not ordered". Counts are never negative (unsigned by construction,
/// clamped at the mutation boundary).
pub type OrderMap = HashMap<String, u32>;

/// One "batch cooked" event, newest first in the history list.
///
/// This list is the only audit trail of pantry mutations; removing a record
/// via undo also reverses its pantry and order effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedCook {
    /// Opaque record identifier
    pub id: String,

    /// The recipe that was cooked
    #[serde(rename = "recipeId")]
    pub recipe_id: String,

    /// When the batch was marked cooked (stored as epoch milliseconds,
    /// matching historical snapshots)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Persisted UI language preference. Display-string localization itself is
/// the UI layer's concern; the engine only stores the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    En,
    /// Hebrew
    He,
}

impl Default for Language {
    fn default() -> Self {
        Language::He
    }
}

/// Rejection reasons for data entering the store.
///
/// Validation happens at the store boundary so the aggregation and netting
/// engines can assume well-formed input and stay total.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Name is empty or whitespace-only
    BlankName,
    /// Quantity must be strictly positive at entry
    NonPositiveQuantity(f64),
    /// Pantry quantity must not be negative
    NegativeQuantity(f64),
    /// Recipe id collides with an existing recipe
    DuplicateId(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::BlankName => write!(f, "name must not be blank"),
            ValidationError::NonPositiveQuantity(q) => {
                write!(f, "quantity must be positive, got {q}")
            }
            ValidationError::NegativeQuantity(q) => {
                write!(f, "quantity must not be negative, got {q}")
            }
            ValidationError::DuplicateId(id) => {
                write!(f, "recipe id already exists: {id}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_builder() {
        let recipe = Recipe::new("r1", "Shakshuka", Category::Dairy)
            .with_ingredient(Ingredient::new("eggs", 4.0, Unit::Units))
            .with_ingredient(Ingredient::new("tomatoes", 400.0, Unit::Grams))
            .with_prep_time(10)
            .with_cook_time(20);

        assert_eq!(recipe.id, "r1");
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.prep_time, Some(10));
        assert_eq!(recipe.cook_time, Some(20));
        assert!(recipe.validate().is_ok());
    }

    #[test]
    fn test_ingredient_validation() {
        assert!(Ingredient::new("flour", 200.0, Unit::Grams).validate().is_ok());

        assert_eq!(
            Ingredient::new("  ", 200.0, Unit::Grams).validate(),
            Err(ValidationError::BlankName)
        );
        assert_eq!(
            Ingredient::new("flour", 0.0, Unit::Grams).validate(),
            Err(ValidationError::NonPositiveQuantity(0.0))
        );
        assert_eq!(
            Ingredient::new("flour", -1.0, Unit::Grams).validate(),
            Err(ValidationError::NonPositiveQuantity(-1.0))
        );
    }

    #[test]
    fn test_pantry_item_zero_quantity_is_valid() {
        // Zero stock is a legitimate row (left behind after cooking).
        assert!(PantryItem::new("flour", 0.0, Unit::Grams).validate().is_ok());
        assert_eq!(
            PantryItem::new("flour", -5.0, Unit::Grams).validate(),
            Err(ValidationError::NegativeQuantity(-5.0))
        );
    }

    #[test]
    fn test_unit_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Unit::Grams).unwrap();
        assert_eq!(json, r#""grams""#);
        let unit: Unit = serde_json::from_str(r#""liters""#).unwrap();
        assert_eq!(unit, Unit::Liters);
    }

    #[test]
    fn test_recipe_serde_field_names_match_snapshots() {
        let recipe = Recipe::new("r1", "Cake", Category::Dessert)
            .with_image_url("data:image/jpeg;base64,abc")
            .with_prep_time(15);

        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["imageUrl"], "data:image/jpeg;base64,abc");
        assert_eq!(json["prepTime"], 15);
        assert_eq!(json["category"], "dessert");
        // Absent optionals are omitted entirely.
        assert!(json.get("cookTime").is_none());
    }

    #[test]
    fn test_recipe_deserialization_ignores_legacy_ingredient_ids() {
        // Old snapshots carried a per-ingredient id; it is not part of the
        // model and must not break loading.
        let json = r#"{
            "id": "r1",
            "name": "Soup",
            "category": "pareve",
            "ingredients": [
                {"id": "169000.123", "name": "carrots", "quantity": 3, "unit": "units"}
            ]
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.ingredients[0].name, "carrots");
        assert_eq!(recipe.ingredients[0].unit, Unit::Units);
    }

    #[test]
    fn test_completed_cook_timestamp_millis() {
        let record = CompletedCook {
            id: "c1".to_string(),
            recipe_id: "r1".to_string(),
            timestamp: DateTime::from_timestamp_millis(1_700_000_000_000).unwrap(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["timestamp"], 1_700_000_000_000i64);
        assert_eq!(json["recipeId"], "r1");

        let back: CompletedCook = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
