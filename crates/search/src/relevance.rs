//! Relevance scoring for search results.
//!
//! Local matches score in bands of 100/80/50. Geocoder results score
//! 40 plus an importance bonus, always below the lowest local band.

use serde::{Deserialize, Serialize};

/// Relevance levels for a local match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RelevanceScore {
    /// Field contains the query
    Contains = 50,
    /// Field starts with the query
    StartsWith = 80,
    /// Field equals the query
    Exact = 100,
}

impl RelevanceScore {
    pub fn value(self) -> f64 {
        f64::from(self as u32)
    }
}

/// Base score of geocoder results.
pub const REMOTE_BASE_SCORE: f64 = 40.0;

/// Score a folded field value against a folded query.
///
/// Both inputs must already be in comparison form (see
/// [`ScriptFolder::fold`](crate::ScriptFolder::fold)).
pub fn calculate_relevance(folded_text: &str, folded_query: &str) -> Option<RelevanceScore> {
    if folded_text == folded_query {
        Some(RelevanceScore::Exact)
    } else if folded_text.starts_with(folded_query) {
        Some(RelevanceScore::StartsWith)
    } else if folded_text.contains(folded_query) {
        Some(RelevanceScore::Contains)
    } else {
        None
    }
}

/// Score of a geocoder result from its provider importance.
///
/// Importance is clamped so the result stays under [`RelevanceScore::Contains`].
pub fn remote_score(importance: f64) -> f64 {
    let importance = if importance.is_finite() { importance } else { 0.0 };
    REMOTE_BASE_SCORE + importance.clamp(0.0, 0.99) * 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(calculate_relevance("hq-12", "hq-12"), Some(RelevanceScore::Exact));
    }

    #[test]
    fn test_starts_with() {
        assert_eq!(calculate_relevance("hq-12a 系统", "hq-12"), Some(RelevanceScore::StartsWith));
    }

    #[test]
    fn test_contains() {
        assert_eq!(calculate_relevance("部署 hq-12 阵地", "hq-12"), Some(RelevanceScore::Contains));
        assert_eq!(calculate_relevance("hq-9", "hq-12"), None);
    }

    #[test]
    fn test_band_values() {
        assert_eq!(RelevanceScore::Exact.value(), 100.0);
        assert_eq!(RelevanceScore::StartsWith.value(), 80.0);
        assert_eq!(RelevanceScore::Contains.value(), 50.0);
        assert!(RelevanceScore::Exact > RelevanceScore::Contains);
    }

    #[test]
    fn test_remote_score_below_local() {
        assert_eq!(remote_score(0.0), 40.0);
        assert!((remote_score(0.5) - 45.0).abs() < 1e-9);
        assert!(remote_score(1.0) < RelevanceScore::Contains.value());
        assert!(remote_score(7.0) < RelevanceScore::Contains.value());
        assert_eq!(remote_score(-1.0), 40.0);
        assert_eq!(remote_score(f64::NAN), 40.0);
    }
}
