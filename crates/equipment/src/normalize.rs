//! Lookup-name normalisation.
//!
//! Chinese designations of common missile families are rewritten to the
//! Latin designations used as encyclopedia titles.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Sub-variant without its own encyclopedia entry.
pub(crate) static YJ_12B: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?-u:\b)YJ-12B(?-u:\b)").unwrap());

/// Chinese family names (Traditional and Simplified) and their Latin prefix.
const FAMILIES: &[(&str, &str)] = &[
    ("紅旗|红旗", "HQ"),
    ("鷹擊|鹰击", "YJ"),
    ("東風|东风", "DF"),
    ("長劍|长剑", "CJ"),
];

static FAMILY_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    FAMILIES
        .iter()
        .map(|(names, prefix)| {
            let pattern = format!(r"^(?:{names})[-\s]?([0-9]+[A-Za-z]?)");
            (Regex::new(&pattern).unwrap(), *prefix)
        })
        .collect()
});

/// Name to send to the summary source for `name`.
///
/// `紅旗-12` becomes `HQ-12`, `鷹擊62` becomes `YJ-62`, `东风-21d` becomes
/// `DF-21D`; a suffix letter is upper-cased and anything after the code is
/// kept. `YJ-12B` is looked up as `YJ-12`.
pub fn normalize_for_lookup(name: &str) -> String {
    let mut normalized = YJ_12B.replace_all(name.trim(), "YJ-12").into_owned();
    for (pattern, prefix) in FAMILY_PATTERNS.iter() {
        normalized = pattern
            .replace(&normalized, |caps: &Captures| {
                format!("{prefix}-{}", caps[1].to_uppercase())
            })
            .into_owned();
    }
    normalized
}
