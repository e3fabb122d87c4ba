//! Request spacing for rate-limited upstream services
//!
//! [`RequestGate`] serialises work through a FIFO queue: at most one
//! operation runs at a time, and the next one starts no earlier than
//! `spacing` after the previous one finished. Idle time does not bank
//! allowance.
//!
//! # Example
//!
//! ```rust,no_run
//! use facilitymap_core::rate_limit::{RequestGate, SpacingConfig};
//!
//! # async fn demo() {
//! let gate = RequestGate::new(SpacingConfig::nominatim());
//! let answer = gate.run(|| async { 42 }).await;
//! assert_eq!(answer, 42);
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;

/// Spacing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpacingConfig {
    /// Minimum gap between the end of one request and the start of the next
    pub spacing: Duration,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self::nominatim()
    }
}

impl SpacingConfig {
    /// Nominatim usage policy: at most one request per second, with margin
    #[must_use]
    pub fn nominatim() -> Self {
        Self {
            spacing: Duration::from_millis(1100),
        }
    }

    /// Custom spacing in milliseconds
    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self {
            spacing: Duration::from_millis(ms),
        }
    }
}

/// Single-flight FIFO gate
///
/// Waiters are admitted in arrival order (the tokio mutex is fair).
#[derive(Debug)]
pub struct RequestGate {
    spacing: Duration,
    next_start: Mutex<Option<Instant>>,
}

impl RequestGate {
    /// Create a new gate
    #[must_use]
    pub fn new(config: SpacingConfig) -> Self {
        Self {
            spacing: config.spacing,
            next_start: Mutex::new(None),
        }
    }

    /// Configured spacing
    #[must_use]
    pub fn spacing(&self) -> Duration {
        self.spacing
    }

    /// Run `op` once every earlier caller has finished and the spacing has elapsed.
    ///
    /// The spacing is applied after `op` ends, whether it succeeded, failed
    /// or was cancelled by dropping the returned future.
    pub async fn run<F, Fut, T>(&self, op: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let next_start = self.next_start.lock().await;
        if let Some(at) = *next_start {
            tokio::time::sleep_until(at).await;
        }

        let _completion = Completion {
            next_start,
            spacing: self.spacing,
        };
        op().await
    }
}

/// Holds the gate while a request is in flight and stamps the next
/// start time when dropped.
struct Completion<'a> {
    next_start: MutexGuard<'a, Option<Instant>>,
    spacing: Duration,
}

impl Drop for Completion<'_> {
    fn drop(&mut self) {
        *self.next_start = Some(Instant::now() + self.spacing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex as StdMutex;

    #[tokio::test(start_paused = true)]
    async fn test_first_request_is_immediate() {
        let gate = RequestGate::new(SpacingConfig::nominatim());
        let start = Instant::now();
        gate.run(|| async {}).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spacing_between_requests() {
        let gate = Arc::new(RequestGate::new(SpacingConfig::from_millis(1100)));
        let starts = Arc::new(StdMutex::new(Vec::new()));
        let origin = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..3 {
            let gate = Arc::clone(&gate);
            let starts = Arc::clone(&starts);
            handles.push(tokio::spawn(async move {
                gate.run(|| async {
                    starts.lock().unwrap().push(origin.elapsed());
                    tokio::time::sleep(Duration::from_millis(300)).await;
                })
                .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let starts = starts.lock().unwrap();
        assert_eq!(starts.len(), 3);
        // Each start waits for the previous completion plus the spacing
        assert_eq!(starts[0], Duration::ZERO);
        assert_eq!(starts[1], Duration::from_millis(1400));
        assert_eq!(starts[2], Duration::from_millis(2800));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_time_does_not_bank() {
        let gate = RequestGate::new(SpacingConfig::from_millis(1000));
        gate.run(|| async {}).await;

        tokio::time::advance(Duration::from_secs(10)).await;

        let before = Instant::now();
        gate.run(|| async {}).await;
        assert_eq!(before.elapsed(), Duration::ZERO);

        let before = Instant::now();
        gate.run(|| async {}).await;
        assert_eq!(before.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_request_still_spaces_next() {
        let gate = RequestGate::new(SpacingConfig::from_millis(1100));

        let abandoned = tokio::time::timeout(
            Duration::from_millis(200),
            gate.run(|| tokio::time::sleep(Duration::from_millis(500))),
        )
        .await;
        assert!(abandoned.is_err());

        let cancelled_at = Instant::now();
        let started = gate.run(|| async { Instant::now() }).await;
        assert_eq!(started - cancelled_at, Duration::from_millis(1100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_while_waiting_leaves_schedule() {
        let gate = RequestGate::new(SpacingConfig::from_millis(1000));
        gate.run(|| async {}).await;

        // Dropped before its turn: no request was sent
        let waited = tokio::time::timeout(Duration::from_millis(100), gate.run(|| async {})).await;
        assert!(waited.is_err());

        let before = Instant::now();
        gate.run(|| async {}).await;
        assert_eq!(before.elapsed(), Duration::from_millis(900));
    }
}
