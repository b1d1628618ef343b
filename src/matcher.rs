//! # Ingredient Identity Matching
//!
//! This module owns the single key-derivation function used wherever two
//! ingredient-shaped things need to be compared: demand aggregation, pantry
//! lookups during netting, and the cooking ledger's stock mutations.
//!
//! Every component must call [`ingredient_key`] (directly or through
//! [`MatchKey`]) rather than building its own variant. Divergent key
//! derivations fragment aggregation silently, which is the main correctness
//! hazard in this engine.

use crate::pantry_model::{Ingredient, PantryItem, Unit};

/// Derive the identity key for a `(name, unit)` pair.
///
/// Normalization is trim + ASCII-agnostic case folding; nothing fuzzier.
/// `"Flour "` and `"flour"` in grams collide, `"flour"` in grams and
/// `"flour"` in kg do not.
///
/// # Examples
///
/// ```rust
/// use smart_pantry::matcher::ingredient_key;
/// use smart_pantry::pantry_model::Unit;
///
/// assert_eq!(ingredient_key(" Flour ", Unit::Grams), "flour_grams");
/// assert_ne!(
///     ingredient_key("flour", Unit::Grams),
///     ingredient_key("flour", Unit::Kg)
/// );
/// ```
pub fn ingredient_key(name: &str, unit: Unit) -> String {
    format!("{}_{}", name.trim().to_lowercase(), unit.as_str())
}

/// Types that carry an ingredient identity
pub trait MatchKey {
    /// The `(normalized name, unit)` identity key
    fn match_key(&self) -> String;
}

impl MatchKey for Ingredient {
    fn match_key(&self) -> String {
        ingredient_key(&self.name, self.unit)
    }
}

impl MatchKey for PantryItem {
    fn match_key(&self) -> String {
        ingredient_key(&self.name, self.unit)
    }
}
