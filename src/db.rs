//! # Snapshot Persistence
//!
//! Stores the application state as independent JSON slots in a single
//! key-value table, one slot per collection. Each slot loads on its own and
//! falls back to its empty default when missing or corrupt, so a damaged
//! snapshot degrades to a partial (or empty) state instead of failing
//! startup.
//!
//! Writes replace whole slots (last writer wins), which is sufficient for
//! the single-user, single-writer model this engine assumes.

use anyhow::{Context, Result};
use log::{info, warn};
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::pantry_model::{CompletedCook, Language, OrderMap, PantryItem, Recipe};
use crate::state::AppState;

/// Slot key for the recipe collection
pub const SLOT_RECIPES: &str = "recipes";
/// Slot key for the order map
pub const SLOT_ORDERS: &str = "orders";
/// Slot key for the pantry collection
pub const SLOT_PANTRY: &str = "pantry";
/// Slot key for the completed-cook history
pub const SLOT_COMPLETED: &str = "completed";
/// Slot key for the language preference
pub const SLOT_LANGUAGE: &str = "lang";

/// Initialize the snapshot table
pub fn init_store_schema(conn: &Connection) -> Result<()> {
    info!("Initializing snapshot store schema...");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS snapshots (
            slot TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create snapshots table")?;

    info!("Snapshot store schema initialized");
    Ok(())
}

/// Write one slot, replacing any previous value
pub fn save_slot<T: Serialize>(conn: &Connection, slot: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)
        .with_context(|| format!("Failed to serialize slot '{slot}'"))?;

    conn.execute(
        "INSERT INTO snapshots (slot, value, updated_at)
         VALUES (?1, ?2, CURRENT_TIMESTAMP)
         ON CONFLICT(slot) DO UPDATE SET
             value = excluded.value,
             updated_at = excluded.updated_at",
        params![slot, json],
    )
    .with_context(|| format!("Failed to write slot '{slot}'"))?;

    Ok(())
}

/// Read one slot, falling back to `T::default()` when the slot is missing
/// or its JSON no longer parses. The fallback path is logged but never an
/// error: a corrupt slot must not take the application down.
pub fn load_slot<T>(conn: &Connection, slot: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let mut stmt = conn
        .prepare("SELECT value FROM snapshots WHERE slot = ?1")
        .context("Failed to prepare slot read")?;

    let json: Option<String> = match stmt.query_row(params![slot], |row| row.get(0)) {
        Ok(value) => Some(value),
        Err(rusqlite::Error::QueryReturnedNoRows) => None,
        Err(e) => return Err(e).with_context(|| format!("Failed to read slot '{slot}'")),
    };

    match json {
        Some(json) => match serde_json::from_str(&json) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!("Slot '{slot}' is corrupt ({e}); falling back to default");
                Ok(T::default())
            }
        },
        None => {
            info!("Slot '{slot}' not found; using default");
            Ok(T::default())
        }
    }
}

/// Load the full application state, one slot at a time.
///
/// Pantry duplicates left behind by older snapshots are reconciled here, so
/// the in-memory state always satisfies the unique-key invariant.
pub fn load_app_state(conn: &Connection) -> Result<AppState> {
    let mut state = AppState {
        recipes: load_slot::<Vec<Recipe>>(conn, SLOT_RECIPES)?,
        orders: load_slot::<OrderMap>(conn, SLOT_ORDERS)?,
        pantry: load_slot::<Vec<PantryItem>>(conn, SLOT_PANTRY)?,
        history: load_slot::<Vec<CompletedCook>>(conn, SLOT_COMPLETED)?,
        language: load_slot::<Language>(conn, SLOT_LANGUAGE)?,
    };
    state.reconcile_pantry();

    info!(
        "Loaded state: {} recipes, {} orders, {} pantry rows, {} history records",
        state.recipes.len(),
        state.orders.len(),
        state.pantry.len(),
        state.history.len()
    );
    Ok(state)
}

/// Persist the full application state, every slot
pub fn save_app_state(conn: &Connection, state: &AppState) -> Result<()> {
    save_slot(conn, SLOT_RECIPES, &state.recipes)?;
    save_slot(conn, SLOT_ORDERS, &state.orders)?;
    save_slot(conn, SLOT_PANTRY, &state.pantry)?;
    save_slot(conn, SLOT_COMPLETED, &state.history)?;
    save_slot(conn, SLOT_LANGUAGE, &state.language)?;
    Ok(())
}
