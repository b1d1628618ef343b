//! # Recipe Scan Client
//!
//! Client for the external AI extraction service that turns a recipe photo
//! or pasted text into a recipe-shaped payload for pre-filling the recipe
//! form. The extraction itself happens on the service side; this module only
//! handles the request/response plumbing, retries with jittered backoff, and
//! the circuit breaker that keeps a failing service from being hammered.
//!
//! Extraction failures are always surfaced as typed [`ScanError`] values and
//! never touch stored state: the caller decides whether to retry, and a
//! failed scan leaves recipes, orders, and pantry exactly as they were.

use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::circuit_breaker::ScanCircuitBreaker;
use crate::pantry_model::{Category, Ingredient, Recipe};
use crate::scan_config::ScanConfig;

/// Custom error types for scan operations
#[derive(Debug, Clone)]
pub enum ScanError {
    /// Request validation errors (empty payload, oversized image)
    Validation(String),
    /// The circuit breaker is open; the service gets no request
    CircuitOpen,
    /// Transport or server-side errors
    Service(String),
    /// The service answered but the payload was not recipe-shaped
    Decode(String),
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::Validation(msg) => write!(f, "Validation error: {msg}"),
            ScanError::CircuitOpen => write!(f, "Scan service temporarily unavailable"),
            ScanError::Service(msg) => write!(f, "Scan service error: {msg}"),
            ScanError::Decode(msg) => write!(f, "Scan response error: {msg}"),
        }
    }
}

impl std::error::Error for ScanError {}

/// What to scan: a photo or pasted free text
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScanRequest {
    /// Base64-encoded image with its mime type
    #[serde(rename_all = "camelCase")]
    Image { mime_type: String, data: String },
    /// Pasted recipe text
    Text { text: String },
}

/// One ingredient row as the service reports it
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScannedIngredient {
    pub name: String,
    pub quantity: f64,
    pub unit: crate::pantry_model::Unit,
}

/// The recipe-shaped payload the service returns
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScannedRecipe {
    pub name: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub ingredients: Vec<ScannedIngredient>,
}

impl ScannedRecipe {
    /// Convert into a model recipe under the given id.
    ///
    /// Ingredient rows the service got wrong (blank names, non-positive
    /// quantities) are dropped with a warning rather than poisoning the
    /// form; store-boundary validation still applies when the user saves.
    pub fn into_recipe(self, id: &str) -> Recipe {
        let mut recipe = Recipe::new(id, self.name.trim(), self.category);
        for row in self.ingredients {
            let ingredient = Ingredient::new(row.name.trim(), row.quantity, row.unit);
            match ingredient.validate() {
                Ok(()) => recipe.ingredients.push(ingredient),
                Err(e) => warn!("Dropping scanned ingredient '{}': {e}", row.name),
            }
        }
        recipe
    }
}

/// Client for the extraction service
pub struct RecipeScanClient {
    http: reqwest::Client,
    config: ScanConfig,
    breaker: ScanCircuitBreaker,
}

impl RecipeScanClient {
    /// Create a client from configuration
    pub fn new(config: ScanConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let breaker = ScanCircuitBreaker::new(&config.recovery);
        Ok(Self {
            http,
            config,
            breaker,
        })
    }

    /// Run one extraction, retrying transient failures with exponential
    /// backoff plus random jitter. Client-side mistakes (4xx) and decode
    /// failures are not retried.
    pub async fn extract_recipe(&self, request: ScanRequest) -> Result<ScannedRecipe, ScanError> {
        self.validate_request(&request)?;

        if self.breaker.is_open() {
            return Err(ScanError::CircuitOpen);
        }

        let mut last_error = ScanError::Service("no attempts made".to_string());
        for attempt in 0..=self.config.recovery.max_retries {
            if attempt > 0 {
                tokio::time::sleep(self.retry_delay(attempt)).await;
                info!("Retrying recipe scan (attempt {attempt})");
            }

            match self.attempt(&request).await {
                Ok(recipe) => {
                    self.breaker.record_success();
                    info!(
                        "Scan extracted recipe '{}' with {} ingredients",
                        recipe.name,
                        recipe.ingredients.len()
                    );
                    return Ok(recipe);
                }
                // A malformed request or response will not improve on retry,
                // and says nothing about service health.
                Err(e @ (ScanError::Decode(_) | ScanError::Validation(_))) => return Err(e),
                Err(e) => {
                    warn!("Scan attempt {attempt} failed: {e}");
                    last_error = e;
                }
            }
        }

        self.breaker.record_failure();
        Err(last_error)
    }

    async fn attempt(&self, request: &ScanRequest) -> Result<ScannedRecipe, ScanError> {
        let mut builder = self.http.post(&self.config.endpoint).json(request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ScanError::Service(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            // The request itself is wrong; retrying will not help.
            return Err(ScanError::Decode(format!("service rejected request: {status}")));
        }
        if !status.is_success() {
            return Err(ScanError::Service(format!("service returned {status}")));
        }

        response
            .json::<ScannedRecipe>()
            .await
            .map_err(|e| ScanError::Decode(e.to_string()))
    }

    fn validate_request(&self, request: &ScanRequest) -> Result<(), ScanError> {
        match request {
            ScanRequest::Text { text } if text.trim().is_empty() => Err(ScanError::Validation(
                "scan text must not be empty".to_string(),
            )),
            ScanRequest::Image { data, .. } if data.len() > self.config.max_image_bytes => {
                Err(ScanError::Validation(format!(
                    "image exceeds {} byte limit",
                    self.config.max_image_bytes
                )))
            }
            ScanRequest::Image { data, .. } if data.is_empty() => Err(ScanError::Validation(
                "image payload must not be empty".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Exponential backoff capped at the configured maximum, plus up to
    /// 250ms of random jitter so parallel clients do not retry in lockstep.
    fn retry_delay(&self, attempt: u32) -> Duration {
        let recovery = &self.config.recovery;
        let exp = recovery
            .base_retry_delay_ms
            .saturating_mul(1u64 << attempt.min(16))
            .min(recovery.max_retry_delay_ms);
        let jitter = rand::thread_rng().gen_range(0..250);
        Duration::from_millis(exp + jitter)
    }
}
