//! # Application State Store
//!
//! Owns the four entity collections (recipes, orders, pantry, cook history)
//! plus the language preference, and is the only place allowed to mutate
//! them. The aggregation and netting engines read through it; the cooking
//! ledger mutates through it.
//!
//! Entry validation lives here so everything downstream can assume
//! well-formed data: blank names and non-positive quantities are rejected at
//! this boundary and never reach the engines.

use log::{info, warn};

use crate::matcher::MatchKey;
use crate::pantry_model::{
    CompletedCook, Language, OrderMap, PantryItem, Recipe, ValidationError,
};

/// The whole application state, owned by one controller and passed
/// explicitly to the engine functions. Nothing here is global.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Recipe collection, user-edited, long-lived
    pub recipes: Vec<Recipe>,
    /// Planned batch counts per recipe id
    pub orders: OrderMap,
    /// On-hand stock, unique per identity key
    pub pantry: Vec<PantryItem>,
    /// Completed-cook records, newest first
    pub history: Vec<CompletedCook>,
    /// Persisted UI language preference
    pub language: Language,
}

impl AppState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a recipe by id
    pub fn recipe(&self, recipe_id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == recipe_id)
    }

    /// Current batch count for a recipe (0 when absent)
    pub fn order_count(&self, recipe_id: &str) -> u32 {
        self.orders.get(recipe_id).copied().unwrap_or(0)
    }

    /// Insert a new recipe after validation.
    ///
    /// Rejects blank recipe names, invalid ingredients, and id collisions.
    pub fn add_recipe(&mut self, recipe: Recipe) -> Result<(), ValidationError> {
        recipe.validate()?;
        if self.recipes.iter().any(|r| r.id == recipe.id) {
            return Err(ValidationError::DuplicateId(recipe.id));
        }
        info!("Adding recipe '{}' ({})", recipe.name, recipe.id);
        self.recipes.push(recipe);
        Ok(())
    }

    /// Replace an existing recipe in place, keyed by id. Returns `false`
    /// when no recipe with that id exists.
    pub fn update_recipe(&mut self, recipe: Recipe) -> Result<bool, ValidationError> {
        recipe.validate()?;
        match self.recipes.iter_mut().find(|r| r.id == recipe.id) {
            Some(slot) => {
                info!("Updating recipe '{}' ({})", recipe.name, recipe.id);
                *slot = recipe;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete a recipe and purge its order-map entry, so no dangling order
    /// can reference it afterwards. Returns `false` when the id was unknown.
    pub fn delete_recipe(&mut self, recipe_id: &str) -> bool {
        let before = self.recipes.len();
        self.recipes.retain(|r| r.id != recipe_id);
        let removed = self.recipes.len() != before;
        if removed {
            if self.orders.remove(recipe_id).is_some() {
                info!("Purged order entry for deleted recipe {recipe_id}");
            }
            info!("Deleted recipe {recipe_id}");
        }
        removed
    }

    /// Set the planned batch count for a recipe. A count of zero removes the
    /// entry entirely (zero and missing mean the same thing).
    pub fn set_order(&mut self, recipe_id: &str, count: u32) {
        if count == 0 {
            self.orders.remove(recipe_id);
        } else {
            self.orders.insert(recipe_id.to_string(), count);
        }
    }

    /// Adjust a batch count by a signed delta, clamped at zero. This is the
    /// single mutation boundary that keeps order counts non-negative.
    pub fn adjust_order(&mut self, recipe_id: &str, delta: i32) {
        let current = self.order_count(recipe_id) as i64;
        let next = (current + i64::from(delta)).max(0) as u32;
        self.set_order(recipe_id, next);
    }

    /// Add stock to the pantry, reconciling by identity key: if a row with
    /// the same `(normalized name, unit)` already exists, the quantity is
    /// added to it instead of creating a duplicate row.
    pub fn upsert_pantry_item(&mut self, item: PantryItem) -> Result<(), ValidationError> {
        item.validate()?;
        let key = item.match_key();
        match self.pantry.iter_mut().find(|row| row.match_key() == key) {
            Some(row) => {
                row.quantity += item.quantity;
            }
            None => self.pantry.push(item),
        }
        Ok(())
    }

    /// Remove a pantry row by identity key. Returns `false` when absent.
    pub fn remove_pantry_item(&mut self, key: &str) -> bool {
        let before = self.pantry.len();
        self.pantry.retain(|row| row.match_key() != key);
        self.pantry.len() != before
    }

    /// Collapse any duplicate pantry rows that share an identity key by
    /// summing their quantities into the first occurrence. Loaded snapshots
    /// may carry duplicates from older app versions; this runs once after
    /// load to restore the uniqueness invariant.
    pub fn reconcile_pantry(&mut self) {
        let mut seen: Vec<(String, usize)> = Vec::new();
        let mut merged: Vec<PantryItem> = Vec::new();

        for row in self.pantry.drain(..) {
            let key = row.match_key();
            match seen.iter().find(|(k, _)| *k == key) {
                Some((_, idx)) => {
                    warn!("Merging duplicate pantry row for key {key}");
                    merged[*idx].quantity += row.quantity;
                }
                None => {
                    seen.push((key, merged.len()));
                    merged.push(row);
                }
            }
        }

        self.pantry = merged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pantry_model::{Category, Ingredient, Unit};

    fn sample_recipe(id: &str) -> Recipe {
        Recipe::new(id, "Bread", Category::Pareve)
            .with_ingredient(Ingredient::new("flour", 500.0, Unit::Grams))
    }

    #[test]
    fn test_add_and_lookup_recipe() {
        let mut state = AppState::new();
        state.add_recipe(sample_recipe("r1")).unwrap();

        assert!(state.recipe("r1").is_some());
        assert!(state.recipe("r2").is_none());
    }

    #[test]
    fn test_add_recipe_rejects_duplicates_and_invalid_input() {
        let mut state = AppState::new();
        state.add_recipe(sample_recipe("r1")).unwrap();

        assert_eq!(
            state.add_recipe(sample_recipe("r1")),
            Err(ValidationError::DuplicateId("r1".to_string()))
        );

        let blank = Recipe::new("r2", "  ", Category::Other);
        assert_eq!(state.add_recipe(blank), Err(ValidationError::BlankName));

        let bad_qty = Recipe::new("r3", "Soup", Category::Other)
            .with_ingredient(Ingredient::new("water", -1.0, Unit::Liters));
        assert!(state.add_recipe(bad_qty).is_err());
        assert_eq!(state.recipes.len(), 1);
    }

    #[test]
    fn test_update_recipe() {
        let mut state = AppState::new();
        state.add_recipe(sample_recipe("r1")).unwrap();

        let mut edited = sample_recipe("r1");
        edited.name = "Sourdough".to_string();
        assert_eq!(state.update_recipe(edited), Ok(true));
        assert_eq!(state.recipe("r1").unwrap().name, "Sourdough");

        assert_eq!(state.update_recipe(sample_recipe("missing")), Ok(false));
    }

    #[test]
    fn test_delete_recipe_purges_order_entry() {
        let mut state = AppState::new();
        state.add_recipe(sample_recipe("r1")).unwrap();
        state.set_order("r1", 3);

        assert!(state.delete_recipe("r1"));
        assert!(state.recipe("r1").is_none());
        assert_eq!(state.order_count("r1"), 0);
        assert!(!state.orders.contains_key("r1"));

        assert!(!state.delete_recipe("r1"));
    }

    #[test]
    fn test_order_adjustment_clamps_at_zero() {
        let mut state = AppState::new();
        state.adjust_order("r1", 2);
        assert_eq!(state.order_count("r1"), 2);

        state.adjust_order("r1", -5);
        assert_eq!(state.order_count("r1"), 0);
        // Clamped-to-zero entries are dropped, not kept as zeros.
        assert!(!state.orders.contains_key("r1"));
    }

    #[test]
    fn test_pantry_upsert_merges_by_key() {
        let mut state = AppState::new();
        state
            .upsert_pantry_item(PantryItem::new("Flour", 200.0, Unit::Grams))
            .unwrap();
        state
            .upsert_pantry_item(PantryItem::new("  flour ", 300.0, Unit::Grams))
            .unwrap();

        assert_eq!(state.pantry.len(), 1);
        assert_eq!(state.pantry[0].quantity, 500.0);
    }

    #[test]
    fn test_pantry_upsert_keeps_units_distinct() {
        let mut state = AppState::new();
        state
            .upsert_pantry_item(PantryItem::new("flour", 500.0, Unit::Grams))
            .unwrap();
        state
            .upsert_pantry_item(PantryItem::new("flour", 1.0, Unit::Kg))
            .unwrap();

        assert_eq!(state.pantry.len(), 2);
    }

    #[test]
    fn test_pantry_upsert_rejects_invalid_rows() {
        let mut state = AppState::new();
        assert!(state
            .upsert_pantry_item(PantryItem::new("", 1.0, Unit::Units))
            .is_err());
        assert!(state
            .upsert_pantry_item(PantryItem::new("rice", -2.0, Unit::Kg))
            .is_err());
        assert!(state.pantry.is_empty());
    }

    #[test]
    fn test_reconcile_pantry_collapses_loaded_duplicates() {
        let mut state = AppState::new();
        // Simulate a snapshot that already contains duplicates.
        state.pantry = vec![
            PantryItem::new("flour", 100.0, Unit::Grams),
            PantryItem::new("sugar", 50.0, Unit::Grams),
            PantryItem::new("FLOUR ", 150.0, Unit::Grams),
        ];

        state.reconcile_pantry();

        assert_eq!(state.pantry.len(), 2);
        assert_eq!(state.pantry[0].name, "flour");
        assert_eq!(state.pantry[0].quantity, 250.0);
    }

    #[test]
    fn test_remove_pantry_item() {
        let mut state = AppState::new();
        state
            .upsert_pantry_item(PantryItem::new("flour", 500.0, Unit::Grams))
            .unwrap();

        assert!(state.remove_pantry_item("flour_grams"));
        assert!(!state.remove_pantry_item("flour_grams"));
        assert!(state.pantry.is_empty());
    }
}
