//! # Cooking Ledger
//!
//! The only component that mutates pantry stock. Marking a recipe batch
//! "cooked" consumes one batch's worth of ingredients (clamped at zero
//! stock), decrements the order count, and records the action in the
//! history list. Undo reverses those deltas and removes the record.
//!
//! The forward clamp loses information: if stock was short, the pantry row
//! bottoms out at zero and nobody remembers how short it was. Undo restores
//! the full nominal amounts, so after a clamped cook it can leave the pantry
//! *above* its true pre-cook level. That asymmetry is deliberate; see the
//! tests in `tests/ledger_tests.rs`.

use chrono::{DateTime, Utc};
use log::info;

use crate::matcher::MatchKey;
use crate::pantry_model::{CompletedCook, PantryItem};
use crate::state::AppState;

/// Result of a ledger operation. Precondition failures come back as values
/// so the caller can decide what to surface; the ledger never panics and
/// never partially applies an action.
#[derive(Debug, Clone, PartialEq)]
pub enum CookOutcome {
    /// The action was applied; carries the history record involved
    Applied(CompletedCook),
    /// Mark-cooked refused: the recipe has no remaining planned batches
    NoOrdersRemaining,
    /// Mark-cooked refused: no recipe with that id exists
    UnknownRecipe,
    /// Undo refused: no history record with that id exists
    UnknownRecord,
}

impl CookOutcome {
    /// True when the state was actually mutated
    pub fn applied(&self) -> bool {
        matches!(self, CookOutcome::Applied(_))
    }
}

/// Mark one batch of a recipe as cooked.
///
/// Preconditions: the recipe exists and its order count is positive;
/// otherwise this is a no-op reported through the outcome. On success, as
/// one logical transaction:
///
/// 1. every ingredient decrements its matching pantry row, floored at zero
///    (no matching row: the shortfall simply is not tracked, and no row is
///    created);
/// 2. the recipe's order count drops by one, floored at zero;
/// 3. a new record lands at the front of the history list.
pub fn mark_cooked(state: &mut AppState, recipe_id: &str) -> CookOutcome {
    let Some(recipe) = state.recipe(recipe_id) else {
        return CookOutcome::UnknownRecipe;
    };
    if state.order_count(recipe_id) == 0 {
        return CookOutcome::NoOrdersRemaining;
    }
    let ingredients = recipe.ingredients.clone();

    for needed in &ingredients {
        let key = needed.match_key();
        if let Some(row) = state.pantry.iter_mut().find(|r| r.match_key() == key) {
            row.quantity = (row.quantity - needed.quantity).max(0.0);
        }
    }

    let record = CompletedCook {
        id: new_record_id(),
        recipe_id: recipe_id.to_string(),
        // Truncate to milliseconds so the in-memory value matches the
        // epoch-millis precision the record is persisted with.
        timestamp: DateTime::from_timestamp_millis(Utc::now().timestamp_millis())
            .expect("current time fits in epoch milliseconds"),
    };
    state.history.insert(0, record.clone());
    state.adjust_order(recipe_id, -1);

    info!("Marked recipe {recipe_id} cooked (record {})", record.id);
    CookOutcome::Applied(record)
}

/// Undo a completed-cook record.
///
/// Precondition: the record exists; otherwise a no-op reported through the
/// outcome. On success:
///
/// 1. every ingredient of the recipe increments its matching pantry row, or
///    materializes a new row when none matches (the forward clamp may have
///    consumed a row down to zero or never had one to consume);
/// 2. the recipe's order count goes back up by one;
/// 3. the record leaves the history list.
///
/// If the recipe was deleted after it was cooked, there is nothing to
/// restore: the stale record is removed and no stock or order changes.
pub fn undo_cooked(state: &mut AppState, record_id: &str) -> CookOutcome {
    let Some(position) = state.history.iter().position(|r| r.id == record_id) else {
        return CookOutcome::UnknownRecord;
    };
    let record = state.history.remove(position);

    if let Some(recipe) = state.recipe(&record.recipe_id) {
        let ingredients = recipe.ingredients.clone();
        for needed in &ingredients {
            let key = needed.match_key();
            match state.pantry.iter_mut().find(|r| r.match_key() == key) {
                Some(row) => row.quantity += needed.quantity,
                None => state.pantry.push(PantryItem::new(
                    needed.name.trim(),
                    needed.quantity,
                    needed.unit,
                )),
            }
        }
        state.adjust_order(&record.recipe_id, 1);
        info!("Undid cook record {} for recipe {}", record.id, record.recipe_id);
    } else {
        info!(
            "Undid cook record {} for deleted recipe {}; nothing to restore",
            record.id, record.recipe_id
        );
    }

    CookOutcome::Applied(record)
}

/// Generate an opaque history-record id: epoch milliseconds plus a random
/// suffix to keep same-millisecond cooks distinct.
fn new_record_id() -> String {
    format!("{}-{:04x}", Utc::now().timestamp_millis(), rand::random::<u16>())
}
