//! # Order Aggregation
//!
//! Explodes planned orders (recipe id → batch count) into a merged ingredient
//! demand map, keyed by the shared identity key from [`crate::matcher`].
//!
//! Aggregation is a pure fold over the orders: no hidden state, and splitting
//! an order map into parts and summing the per-key totals gives the same
//! result as aggregating the whole. Stale order entries pointing at deleted
//! recipes are skipped, never an error.

use log::debug;
use std::collections::HashMap;

use crate::matcher::MatchKey;
use crate::pantry_model::{OrderMap, Recipe, Unit};

/// One merged demand row: everything every ordered batch needs of a single
/// `(name, unit)` identity.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandEntry {
    /// Display name, taken from the first ingredient seen for this key
    pub name: String,
    /// Total quantity across all contributing recipe batches
    pub total_needed: f64,
    /// Measurement unit (part of the identity key)
    pub unit: Unit,
}

/// Aggregate planned orders into per-ingredient demand.
///
/// For every order with a positive batch count whose recipe still exists,
/// each ingredient contributes `quantity * batch_count` under its identity
/// key. The first-seen spelling of the name is kept for display; later
/// contributions only add to the total.
///
/// Skipped, by design:
/// - orders whose recipe id no longer resolves (stale references)
/// - orders with a zero batch count
/// - ingredients with blank names (cannot form a meaningful key)
pub fn aggregate_demand(orders: &OrderMap, recipes: &[Recipe]) -> HashMap<String, DemandEntry> {
    let mut totals: HashMap<String, DemandEntry> = HashMap::new();

    for (recipe_id, &batch_count) in orders {
        if batch_count == 0 {
            continue;
        }
        let Some(recipe) = recipes.iter().find(|r| r.id == *recipe_id) else {
            debug!("Skipping order for unknown recipe id: {recipe_id}");
            continue;
        };

        for ingredient in &recipe.ingredients {
            if ingredient.name.trim().is_empty() {
                continue;
            }
            let contribution = ingredient.quantity * f64::from(batch_count);
            totals
                .entry(ingredient.match_key())
                .and_modify(|entry| entry.total_needed += contribution)
                .or_insert_with(|| DemandEntry {
                    name: ingredient.name.trim().to_string(),
                    total_needed: contribution,
                    unit: ingredient.unit,
                });
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pantry_model::{Category, Ingredient};

    fn recipe(id: &str, ingredients: Vec<Ingredient>) -> Recipe {
        let mut r = Recipe::new(id, id, Category::Other);
        r.ingredients = ingredients;
        r
    }

    #[test]
    fn test_single_recipe_scales_by_batch_count() {
        let recipes = vec![recipe(
            "a",
            vec![Ingredient::new("flour", 200.0, Unit::Grams)],
        )];
        let orders = OrderMap::from([("a".to_string(), 3)]);

        let demand = aggregate_demand(&orders, &recipes);

        let entry = &demand["flour_grams"];
        assert_eq!(entry.total_needed, 600.0);
        assert_eq!(entry.unit, Unit::Grams);
    }

    #[test]
    fn test_merges_across_recipes_by_key() {
        let recipes = vec![
            recipe("a", vec![Ingredient::new("flour", 200.0, Unit::Grams)]),
            recipe("b", vec![Ingredient::new(" Flour ", 300.0, Unit::Grams)]),
        ];
        let orders = OrderMap::from([("a".to_string(), 2), ("b".to_string(), 1)]);

        let demand = aggregate_demand(&orders, &recipes);

        assert_eq!(demand.len(), 1);
        assert_eq!(demand["flour_grams"].total_needed, 700.0);
        // First-seen spelling wins for display; merge order depends on map
        // iteration, so only check it is one of the two trimmed spellings.
        let name = &demand["flour_grams"].name;
        assert!(name == "flour" || name == "Flour");
    }

    #[test]
    fn test_different_units_stay_distinct() {
        let recipes = vec![recipe(
            "a",
            vec![
                Ingredient::new("flour", 500.0, Unit::Grams),
                Ingredient::new("flour", 1.0, Unit::Kg),
            ],
        )];
        let orders = OrderMap::from([("a".to_string(), 1)]);

        let demand = aggregate_demand(&orders, &recipes);

        assert_eq!(demand.len(), 2);
        assert_eq!(demand["flour_grams"].total_needed, 500.0);
        assert_eq!(demand["flour_kg"].total_needed, 1.0);
    }

    #[test]
    fn test_zero_count_and_unknown_recipe_are_skipped() {
        let recipes = vec![recipe(
            "a",
            vec![Ingredient::new("flour", 200.0, Unit::Grams)],
        )];
        let orders = OrderMap::from([
            ("a".to_string(), 0),
            ("deleted".to_string(), 5),
        ]);

        let demand = aggregate_demand(&orders, &recipes);
        assert!(demand.is_empty());
    }

    #[test]
    fn test_blank_ingredient_names_excluded() {
        let recipes = vec![recipe(
            "a",
            vec![
                Ingredient::new("  ", 1.0, Unit::Units),
                Ingredient::new("eggs", 2.0, Unit::Units),
            ],
        )];
        let orders = OrderMap::from([("a".to_string(), 1)]);

        let demand = aggregate_demand(&orders, &recipes);
        assert_eq!(demand.len(), 1);
        assert!(demand.contains_key("eggs_units"));
    }

    #[test]
    fn test_recipe_with_no_ingredients_contributes_nothing() {
        let recipes = vec![recipe("a", vec![])];
        let orders = OrderMap::from([("a".to_string(), 4)]);
        assert!(aggregate_demand(&orders, &recipes).is_empty());
    }

    #[test]
    fn test_aggregation_is_associative_over_order_partitions() {
        let recipes = vec![
            recipe(
                "a",
                vec![
                    Ingredient::new("flour", 200.0, Unit::Grams),
                    Ingredient::new("eggs", 2.0, Unit::Units),
                ],
            ),
            recipe(
                "b",
                vec![
                    Ingredient::new("flour", 300.0, Unit::Grams),
                    Ingredient::new("milk", 1.0, Unit::Liters),
                ],
            ),
        ];
        let whole = OrderMap::from([("a".to_string(), 2), ("b".to_string(), 3)]);
        let left = OrderMap::from([("a".to_string(), 2)]);
        let right = OrderMap::from([("b".to_string(), 3)]);

        let combined = aggregate_demand(&whole, &recipes);
        let from_left = aggregate_demand(&left, &recipes);
        let from_right = aggregate_demand(&right, &recipes);

        for (key, entry) in &combined {
            let split_total = from_left.get(key).map_or(0.0, |e| e.total_needed)
                + from_right.get(key).map_or(0.0, |e| e.total_needed);
            assert_eq!(entry.total_needed, split_total, "key {key}");
        }
        let split_keys: std::collections::HashSet<_> =
            from_left.keys().chain(from_right.keys()).collect();
        assert_eq!(split_keys.len(), combined.len());
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let recipes = vec![recipe(
            "a",
            vec![Ingredient::new("flour", 200.0, Unit::Grams)],
        )];
        let orders = OrderMap::from([("a".to_string(), 2)]);

        let first = aggregate_demand(&orders, &recipes);
        let second = aggregate_demand(&orders, &recipes);
        assert_eq!(first, second);
    }
}
