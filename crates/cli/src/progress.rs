//! Progress indicators
//!
//! Spinners draw to stderr and stay hidden when it is not a terminal.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner for indeterminate progress
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Spinner that is never drawn, for machine-readable output
pub fn hidden() -> ProgressBar {
    ProgressBar::hidden()
}

/// Finish a spinner, clearing it from the terminal
pub fn finish(pb: &ProgressBar) {
    pb.finish_and_clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_creation() {
        let pb = spinner("Geocoding...");
        finish(&pb);
        assert!(pb.is_finished());
    }

    #[test]
    fn test_hidden_spinner() {
        let pb = hidden();
        assert!(pb.is_hidden());
        finish(&pb);
    }
}
