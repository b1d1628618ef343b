//! # Scan Service Configuration
//!
//! Configuration for the external recipe-extraction service, including
//! retry/backoff and circuit-breaker parameters. Values come from the
//! environment where set, otherwise from the documented defaults.

use std::env;

// Constants for scan configuration
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8600/v1/extract";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const MAX_IMAGE_BYTES: usize = 1536 * 1024; // 1.5MB limit for uploaded photos

/// Recovery configuration for error handling
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Base delay between retries in milliseconds
    pub base_retry_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_retry_delay_ms: u64,
    /// Circuit breaker failure threshold
    pub circuit_breaker_threshold: u32,
    /// Circuit breaker reset timeout in seconds
    pub circuit_breaker_reset_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_retry_delay_ms: 1000,  // 1 second
            max_retry_delay_ms: 10000,  // 10 seconds
            circuit_breaker_threshold: 5,
            circuit_breaker_reset_secs: 60, // 1 minute
        }
    }
}

/// Configuration for the recipe-extraction client
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Service endpoint URL
    pub endpoint: String,
    /// Optional bearer token for the service
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum accepted image payload size in bytes
    pub max_image_bytes: usize,
    /// Recovery and error handling configuration
    pub recovery: RecoveryConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_image_bytes: MAX_IMAGE_BYTES,
            recovery: RecoveryConfig::default(),
        }
    }
}

impl ScanConfig {
    /// Build a configuration from the environment, falling back to defaults
    /// for anything unset or unparseable:
    ///
    /// - `SCAN_ENDPOINT` — service URL
    /// - `SCAN_API_KEY` — bearer token
    /// - `SCAN_TIMEOUT_SECS` — per-request timeout
    /// - `SCAN_MAX_RETRIES` — retry attempts
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mut recovery = defaults.recovery.clone();
        if let Some(retries) = env_parse::<u32>("SCAN_MAX_RETRIES") {
            recovery.max_retries = retries;
        }

        Self {
            endpoint: env::var("SCAN_ENDPOINT").unwrap_or(defaults.endpoint),
            api_key: env::var("SCAN_API_KEY").ok(),
            timeout_secs: env_parse("SCAN_TIMEOUT_SECS").unwrap_or(defaults.timeout_secs),
            max_image_bytes: defaults.max_image_bytes,
            recovery,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
