//! # Smart Pantry
//!
//! Planning engine for a household recipe manager: aggregates planned recipe
//! orders into ingredient demand, nets demand against pantry stock to build
//! a shopping list, and keeps a reversible ledger of cooked batches that
//! consume pantry stock.

pub mod aggregator;
pub mod circuit_breaker;
pub mod db;
pub mod ledger;
pub mod matcher;
pub mod netting;
pub mod pantry_model;
pub mod scan;
pub mod scan_config;
pub mod state;
pub mod text_scan;
