//! # Pantry Netting
//!
//! Takes aggregated demand and subtracts on-hand pantry stock, producing the
//! shopping list: what still has to be bought and what the pantry already
//! covers.
//!
//! This module only reads the pantry. Stock mutation is the cooking ledger's
//! job; keeping netting read-only means the shopping list can be recomputed
//! at any time without side effects.

use serde::Serialize;
use std::collections::HashMap;

use crate::aggregator::DemandEntry;
use crate::matcher::{ingredient_key, MatchKey};
use crate::pantry_model::{PantryItem, Unit};

/// One shopping-list row: demand netted against pantry stock.
///
/// Serialized field names match what the UI layer and historical snapshots
/// expect (`totalNeeded`, `inPantry`, `netToBuy`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingEntry {
    /// Display name (first-seen spelling from aggregation)
    pub name: String,
    /// Measurement unit
    pub unit: Unit,
    /// Total demand across all ordered batches
    #[serde(rename = "totalNeeded")]
    pub total_needed: f64,
    /// On-hand pantry quantity for the same identity key (0 if absent)
    #[serde(rename = "inPantry")]
    pub in_pantry: f64,
    /// `max(0, total_needed - in_pantry)`
    #[serde(rename = "netToBuy")]
    pub net_to_buy: f64,
}

/// The netted shopping list: a disjoint, exhaustive partition of the
/// aggregated demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingList {
    /// Entries with something left to buy (`net_to_buy > 0`)
    pub to_buy: Vec<ShoppingEntry>,
    /// Entries the pantry fully covers (`net_to_buy == 0`)
    pub stocked: Vec<ShoppingEntry>,
}

impl ShoppingList {
    /// Total number of aggregated entries across both partitions
    pub fn len(&self) -> usize {
        self.to_buy.len() + self.stocked.len()
    }

    /// True when nothing was aggregated at all
    pub fn is_empty(&self) -> bool {
        self.to_buy.is_empty() && self.stocked.is_empty()
    }
}

/// Net aggregated demand against the pantry.
///
/// For each demand entry, the pantry row with the same identity key supplies
/// `in_pantry` (0 when absent), and `net_to_buy = max(0, total_needed -
/// in_pantry)`. Entries partition into `to_buy` and `stocked`; every
/// aggregated key lands in exactly one of the two. Both partitions are
/// sorted alphabetically by name, case-insensitively.
pub fn net_against_pantry(
    demand: &HashMap<String, DemandEntry>,
    pantry: &[PantryItem],
) -> ShoppingList {
    let stock: HashMap<String, f64> = pantry
        .iter()
        .map(|item| (item.match_key(), item.quantity))
        .collect();

    let mut to_buy = Vec::new();
    let mut stocked = Vec::new();

    for entry in demand.values() {
        let key = ingredient_key(&entry.name, entry.unit);
        let in_pantry = stock.get(&key).copied().unwrap_or(0.0);
        let net_to_buy = (entry.total_needed - in_pantry).max(0.0);

        let row = ShoppingEntry {
            name: entry.name.clone(),
            unit: entry.unit,
            total_needed: entry.total_needed,
            in_pantry,
            net_to_buy,
        };

        if net_to_buy > 0.0 {
            to_buy.push(row);
        } else {
            stocked.push(row);
        }
    }

    to_buy.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    stocked.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    ShoppingList { to_buy, stocked }
}

/// Display-friendly rendering of a quantity: 1000 grams or more reads as kg,
/// rounded to two decimals.
///
/// Presentation only. The returned pair never feeds back into stored
/// quantities or units; the persisted pantry and recipe data keep whatever
/// unit the user entered.
pub fn display_quantity(quantity: f64, unit: Unit) -> (f64, Unit) {
    if unit == Unit::Grams && quantity >= 1000.0 {
        ((quantity / 10.0).round() / 100.0, Unit::Kg)
    } else {
        (quantity, unit)
    }
}

/// Render the to-buy partition as a shareable plain-text message, one line
/// per item, using the display conversion above.
pub fn export_text(list: &ShoppingList) -> String {
    let mut out = String::from("Shopping list:\n");
    for entry in &list.to_buy {
        let (qty, unit) = display_quantity(entry.net_to_buy, entry.unit);
        out.push_str(&format!("• {}: {} {}\n", entry.name, qty, unit));
    }
    out
}
