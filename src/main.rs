use anyhow::Result;
use log::info;
use rusqlite::Connection;
use std::env;

use smart_pantry::aggregator::aggregate_demand;
use smart_pantry::db;
use smart_pantry::ledger::{self, CookOutcome};
use smart_pantry::netting::{display_quantity, export_text, net_against_pantry};
use smart_pantry::scan::{RecipeScanClient, ScanRequest};
use smart_pantry::scan_config::ScanConfig;
use smart_pantry::text_scan::IngredientLineParser;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Get database path from environment
    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "smart_pantry.db".to_string());
    info!("Opening snapshot store at: {database_url}");

    let conn = Connection::open(&database_url)?;
    db::init_store_schema(&conn)?;

    let mut state = db::load_app_state(&conn)?;

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("list") => {
            let demand = aggregate_demand(&state.orders, &state.recipes);
            let list = net_against_pantry(&demand, &state.pantry);

            if list.is_empty() {
                println!("Nothing ordered yet.");
                return Ok(());
            }
            for entry in &list.to_buy {
                let (qty, unit) = display_quantity(entry.net_to_buy, entry.unit);
                println!(
                    "  buy  {}: {} {} (need {}, have {})",
                    entry.name, qty, unit, entry.total_needed, entry.in_pantry
                );
            }
            for entry in &list.stocked {
                println!(
                    "  have {}: need {} {}, in pantry {}",
                    entry.name, entry.total_needed, entry.unit, entry.in_pantry
                );
            }
        }
        Some("export") => {
            let demand = aggregate_demand(&state.orders, &state.recipes);
            print!("{}", export_text(&net_against_pantry(&demand, &state.pantry)));
        }
        Some("cook") => {
            let recipe_id = args.get(1).ok_or_else(|| anyhow::anyhow!("usage: cook <recipe-id>"))?;
            match ledger::mark_cooked(&mut state, recipe_id) {
                CookOutcome::Applied(record) => {
                    db::save_app_state(&conn, &state)?;
                    println!("Cooked one batch of {recipe_id} (record {})", record.id);
                }
                CookOutcome::NoOrdersRemaining => {
                    println!("No planned batches left for {recipe_id}");
                }
                CookOutcome::UnknownRecipe => println!("No recipe with id {recipe_id}"),
                CookOutcome::UnknownRecord => unreachable!(),
            }
        }
        Some("undo") => {
            // Default to the most recent cook when no record id is given.
            let record_id = match args.get(1) {
                Some(id) => id.clone(),
                None => match state.history.first() {
                    Some(record) => record.id.clone(),
                    None => {
                        println!("Nothing to undo.");
                        return Ok(());
                    }
                },
            };
            match ledger::undo_cooked(&mut state, &record_id) {
                CookOutcome::Applied(record) => {
                    db::save_app_state(&conn, &state)?;
                    println!("Undid cook of {} (record {})", record.recipe_id, record.id);
                }
                CookOutcome::UnknownRecord => println!("No cook record with id {record_id}"),
                other => println!("Undo not applied: {other:?}"),
            }
        }
        Some("scan") => {
            let text = args[1..].join(" ");
            let client = RecipeScanClient::new(ScanConfig::from_env())?;
            match client.extract_recipe(ScanRequest::Text { text: text.clone() }).await {
                Ok(scanned) => {
                    let recipe = scanned.into_recipe(&format!(
                        "scan-{}",
                        chrono::Utc::now().timestamp_millis()
                    ));
                    println!("Extracted '{}' with {} ingredients:", recipe.name, recipe.ingredients.len());
                    for ingredient in &recipe.ingredients {
                        println!("  {ingredient}");
                    }
                }
                Err(e) => {
                    // Offline fallback: the local line parser handles the
                    // simple quantity-unit-name shapes.
                    info!("Scan service unavailable ({e}); using local parser");
                    let parsed = IngredientLineParser::new().parse(&text);
                    for ingredient in &parsed.ingredients {
                        println!("  {ingredient}");
                    }
                    for line in &parsed.unparsed_lines {
                        println!("  ? {line}");
                    }
                }
            }
        }
        Some(other) => {
            eprintln!("Unknown command: {other}");
            eprintln!("Usage: smart_pantry [list|export|cook <recipe-id>|undo [record-id]|scan <text>]");
        }
    }

    Ok(())
}
