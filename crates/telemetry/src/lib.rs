//! Logging and run statistics for facilitymap
//!
//! - [`init_with_config`] installs the `tracing` subscriber (compact or JSON
//!   lines on stderr, `RUST_LOG` aware)
//! - [`metrics`] is a process-wide set of counters and timing aggregates
//! - [`Timer`] measures one operation into those aggregates

use facilitymap_core::config::LoggingConfig;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

static METRICS: Lazy<Metrics> = Lazy::new(Metrics::default);

/// Identifies one process run in log output
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Initialize logging with default configuration
pub fn init() -> anyhow::Result<()> {
    init_with_config(TelemetryConfig::default())
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to
/// stderr so command output on stdout stays machine-readable. Fails if a
/// subscriber is already installed.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(config.show_target)
                    .with_file(config.show_location)
                    .with_line_number(config.show_location),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_target(config.show_target)
                    .with_file(config.show_location)
                    .with_line_number(config.show_location),
            )
            .try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        json = config.json,
        "Logging initialized"
    );
    Ok(())
}

/// Session ID of this process
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_level: String,
    /// JSON lines instead of compact text
    pub json: bool,
    pub show_target: bool,
    /// Source file and line of each event
    pub show_location: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::from(&LoggingConfig::default())
    }
}

impl From<&LoggingConfig> for TelemetryConfig {
    fn from(logging: &LoggingConfig) -> Self {
        Self {
            log_level: logging.level.clone(),
            json: logging.json,
            show_target: false,
            show_location: false,
        }
    }
}

impl TelemetryConfig {
    /// `debug` level with targets shown, for `--verbose`
    #[must_use]
    pub fn verbose(mut self) -> Self {
        self.log_level = "debug".to_string();
        self.show_target = true;
        self
    }
}

/// Running aggregate of one timed operation, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimingStats {
    pub count: u64,
    pub total_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl TimingStats {
    fn first(ms: f64) -> Self {
        Self { count: 1, total_ms: ms, min_ms: ms, max_ms: ms }
    }

    fn add(&mut self, ms: f64) {
        self.count += 1;
        self.total_ms += ms;
        self.min_ms = self.min_ms.min(ms);
        self.max_ms = self.max_ms.max(ms);
    }

    pub fn mean_ms(&self) -> f64 {
        self.total_ms / self.count as f64
    }
}

/// Counters and timings of the current process
#[derive(Debug, Default)]
pub struct Metrics {
    inner: Mutex<MetricsSnapshot>,
}

/// Point-in-time copy of [`Metrics`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub counters: BTreeMap<String, u64>,
    pub timings: BTreeMap<String, TimingStats>,
}

impl Metrics {
    fn with<R>(&self, f: impl FnOnce(&mut MetricsSnapshot) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    pub fn increment(&self, name: &str) {
        self.increment_by(name, 1);
    }

    pub fn increment_by(&self, name: &str, value: u64) {
        self.with(|m| *m.counters.entry(name.to_string()).or_default() += value);
    }

    /// Current value of a counter; unknown counters are zero
    pub fn counter(&self, name: &str) -> u64 {
        self.with(|m| m.counters.get(name).copied().unwrap_or(0))
    }

    pub fn record_duration(&self, name: &str, duration: Duration) {
        let ms = duration.as_secs_f64() * 1000.0;
        self.with(|m| match m.timings.get_mut(name) {
            Some(stats) => stats.add(ms),
            None => {
                m.timings.insert(name.to_string(), TimingStats::first(ms));
            }
        });
    }

    pub fn timing(&self, name: &str) -> Option<TimingStats> {
        self.with(|m| m.timings.get(name).copied())
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.with(|m| m.clone())
    }
}

/// Process-wide metrics
pub fn metrics() -> &'static Metrics {
    &METRICS
}

/// Measures one operation into [`metrics`]
///
/// The duration is recorded exactly once, by [`Timer::stop`] or on drop.
pub struct Timer {
    name: &'static str,
    started: Instant,
    done: bool,
}

impl Timer {
    pub fn start(name: &'static str) -> Self {
        Self { name, started: Instant::now(), done: false }
    }

    /// Record and log the elapsed time
    pub fn stop(mut self) -> Duration {
        let elapsed = self.finish();
        tracing::debug!(operation = self.name, elapsed_ms = elapsed.as_millis() as u64, "Timed");
        elapsed
    }

    fn finish(&mut self) -> Duration {
        let elapsed = self.started.elapsed();
        if !self.done {
            self.done = true;
            metrics().record_duration(self.name, elapsed);
        }
        elapsed
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.finish();
    }
}
