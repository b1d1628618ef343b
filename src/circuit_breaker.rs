//! # Circuit Breaker Module
//!
//! Failure-threshold breaker for the recipe-extraction service. When the
//! service fails repeatedly, the breaker opens and extraction requests fail
//! fast instead of piling more timeouts onto a struggling backend; after a
//! cooldown it closes again and lets traffic through.

use log::warn;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::scan_config::RecoveryConfig;

/// Tracks consecutive extraction failures and gates further requests.
///
/// Closed (normal) until `circuit_breaker_threshold` consecutive failures
/// accumulate; then open for `circuit_breaker_reset_secs`, after which the
/// counter resets and requests flow again. A single success closes it
/// immediately.
#[derive(Debug)]
pub struct ScanCircuitBreaker {
    inner: Mutex<BreakerState>,
    threshold: u32,
    reset_after: Duration,
}

#[derive(Debug, Default)]
struct BreakerState {
    consecutive_failures: u32,
    last_failure: Option<Instant>,
}

impl ScanCircuitBreaker {
    /// Create a breaker from the recovery configuration
    pub fn new(config: &RecoveryConfig) -> Self {
        Self {
            inner: Mutex::new(BreakerState::default()),
            threshold: config.circuit_breaker_threshold,
            reset_after: Duration::from_secs(config.circuit_breaker_reset_secs),
        }
    }

    /// Check whether requests should currently be blocked.
    ///
    /// Automatically re-closes once the cooldown has elapsed.
    pub fn is_open(&self) -> bool {
        let mut state = self.inner.lock().unwrap();

        if state.consecutive_failures < self.threshold {
            return false;
        }
        match state.last_failure {
            Some(at) if at.elapsed() < self.reset_after => true,
            _ => {
                // Cooldown over; give the service another chance.
                state.consecutive_failures = 0;
                state.last_failure = None;
                false
            }
        }
    }

    /// Record a failed extraction attempt
    pub fn record_failure(&self) {
        let mut state = self.inner.lock().unwrap();
        state.consecutive_failures += 1;
        state.last_failure = Some(Instant::now());
        if state.consecutive_failures == self.threshold {
            warn!(
                "Scan circuit breaker opened after {} consecutive failures",
                state.consecutive_failures
            );
        }
    }

    /// Record a successful extraction, closing the breaker
    pub fn record_success(&self) {
        let mut state = self.inner.lock().unwrap();
        state.consecutive_failures = 0;
        state.last_failure = None;
    }

    /// Current consecutive-failure count (diagnostics)
    pub fn failure_count(&self) -> u32 {
        self.inner.lock().unwrap().consecutive_failures
    }
}
