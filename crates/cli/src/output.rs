//! Status lines and value formatting for command output
//!
//! Warnings go to stderr and everything else to stdout, so redirected
//! output only carries results.

use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

/// One-line status messages with a leading symbol
pub struct Status;

impl Status {
    /// `✓ message` on stdout
    pub fn success(message: &str) {
        println!("{} {message}", "✓".green());
    }

    /// `ℹ message` on stdout
    pub fn info(message: &str) {
        println!("{} {message}", "ℹ".cyan());
    }

    /// `⚠ message` on stderr
    pub fn warning(message: &str) {
        eprintln!("{} {message}", "⚠".yellow().bold());
    }

    /// Bold title underlined to its display width
    pub fn header(title: &str) {
        println!("\n{}\n{}", title.bold(), rule(display_width(title)));
    }
}

fn rule(width: usize) -> String {
    "─".repeat(width).dimmed().to_string()
}

/// Terminal columns taken by `text`; East Asian wide characters count double.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Replace `open`/`close` markers in `text` with bold yellow.
///
/// Unbalanced markers are left as they are.
pub fn emphasize(text: &str, open: &str, close: &str) -> String {
    let Some(start) = text.find(open) else {
        return text.to_string();
    };
    let after_open = start + open.len();
    let Some(len) = text[after_open..].find(close) else {
        return text.to_string();
    };
    let end = after_open + len;
    let marked: &str = &text[after_open..end];
    format!(
        "{}{}{}",
        &text[..start],
        marked.bold().yellow(),
        emphasize(&text[end + close.len()..], open, close)
    )
}

/// Format a distance in kilometers for display
pub fn format_distance(km: f64) -> String {
    if !km.is_finite() {
        "∞".to_string()
    } else if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else if km < 100.0 {
        format!("{:.1} km", km)
    } else {
        format!("{:.0} km", km)
    }
}

/// Format a coordinate pair as `lat, lng` with five decimals
pub fn format_coordinates(lat: f64, lng: f64) -> String {
    format!("{:.5}, {:.5}", lat, lng)
}

/// `1 layer`, `3 layers`
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    let noun = if count == 1 { singular } else { plural };
    format!("{count} {noun}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.25), "250 m");
        assert_eq!(format_distance(12.345), "12.3 km");
        assert_eq!(format_distance(512.7), "513 km");
        assert_eq!(format_distance(f64::INFINITY), "∞");
    }

    #[test]
    fn test_format_coordinates() {
        assert_eq!(format_coordinates(25.0330, 121.5654), "25.03300, 121.56540");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1, "feature", "features"), "1 feature");
        assert_eq!(format_count(5, "feature", "features"), "5 features");
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("HQ-9"), 4);
        assert_eq!(display_width("機場"), 4);
        assert_eq!(display_width("臺灣　基地"), 10);
        assert_eq!(display_width("e\u{301}"), 1);
    }

    #[test]
    fn test_emphasize_keeps_text() {
        let out = emphasize("a <b>x</b> c <b>y</b>", "<b>", "</b>");
        assert!(!out.contains("<b>"));
        assert!(out.starts_with("a "));
        assert!(out.contains('x') && out.contains('y'));
        assert!(out.contains(&format!("{}", "x".bold().yellow())));

        assert_eq!(emphasize("plain", "<b>", "</b>"), "plain");
        assert_eq!(emphasize("open <b>only", "<b>", "</b>"), "open <b>only");
    }
}
