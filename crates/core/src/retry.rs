//! Exponential backoff for transient failures
//!
//! Used by the HTTP adapters. Services with a strict usage policy
//! (Nominatim) run with [`RetryConfig::no_retry`].
//!
//! ```rust,no_run
//! use facilitymap_core::retry::{retry_async, RetryConfig};
//!
//! # async fn demo() {
//! let summary = retry_async(&RetryConfig::default(), |_e: &&str| true, |_attempt| async {
//!     Ok::<_, &str>("summary")
//! })
//! .await;
//! assert_eq!(summary, Ok("summary"));
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Backoff policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, the first one included; 0 behaves like 1
    pub max_attempts: u32,
    /// Wait before the first retry
    pub base_delay: Duration,
    /// Upper bound for any single wait, before jitter
    pub max_delay: Duration,
    /// Growth factor between consecutive waits
    pub multiplier: f64,
    /// Extra random wait, as a fraction of the computed one (0 disables)
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
            jitter: 0.25,
        }
    }
}

impl RetryConfig {
    /// Single attempt, no waiting
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            jitter: 0.0,
            ..Self::default()
        }
    }

    /// Same policy without random jitter, so waits are reproducible
    #[must_use]
    pub fn without_jitter(mut self) -> Self {
        self.jitter = 0.0;
        self
    }

    /// Wait before retry number `retry` (1 is the first retry)
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        let growth = self.multiplier.max(1.0).powi(i32::try_from(retry - 1).unwrap_or(i32::MAX));
        let capped = (self.base_delay.as_secs_f64() * growth).min(self.max_delay.as_secs_f64());
        let spread = capped * self.jitter.clamp(0.0, 1.0) * random_unit();
        Duration::from_secs_f64(capped + spread)
    }
}

/// Value in [0, 1) drawn from the std hasher's random keys
fn random_unit() -> f64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let bits = RandomState::new().hash_one(std::time::Instant::now());
    (bits >> 11) as f64 / (1u64 << 53) as f64
}

/// Run `op` until it succeeds, `should_retry` rejects the error, or the
/// attempts run out; the last error is returned.
///
/// `op` receives the zero-based attempt number.
pub async fn retry_async<F, Fut, T, E, R>(config: &RetryConfig, should_retry: R, mut op: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
{
    let attempts = config.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        let err = match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        attempt += 1;
        if attempt >= attempts || !should_retry(&err) {
            return Err(err);
        }
        let wait = config.backoff(attempt);
        debug!(attempt, wait_ms = wait.as_millis() as u64, "Retrying");
        tokio::time::sleep(wait).await;
    }
}
