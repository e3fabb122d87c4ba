//! Equipment-name extraction from facility descriptions.

use crate::normalize::YJ_12B;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// An `裝備:` clause, ending before a tactical number, a URL, a full stop,
/// a newline or the end of the text.
static CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"裝備[：:]\s*([^。\n]*?)(?:\s+戰術編號|\s+https?://|。|\n|$)").unwrap()
});

static SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[、，,/]").unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\x{3000}]+").unwrap());

static PAREN_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[（(].*$").unwrap());

static MODEL_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9-]+$").unwrap());

/// Latin model designation, or CJK name with an optional code.
static LEADING_MODEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9_-]*|[\x{4e00}-\x{9fff}]+-?[A-Za-z0-9_]*)").unwrap()
});

static TRAILING_JUNK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\-\x{4e00}-\x{9fff}]+$").unwrap());

/// Equipment names listed in `text`, in order of first appearance.
///
/// Every `裝備:` / `裝備：` clause is split on `、，,/`. Each entry drops
/// parenthesised notes and trailing words, keeping the leading model
/// designation. Single-character names are discarded, duplicates keep their
/// first position, and at most `max_items` names are returned.
///
/// # Example
/// ```
/// use facilitymap_equipment::extract_equipment_names;
///
/// let names = extract_equipment_names("裝備：HQ-12（改）、J-16 戰機 戰術編號 602", 5);
/// assert_eq!(names, vec!["HQ-12", "J-16"]);
/// ```
pub fn extract_equipment_names(text: &str, max_items: usize) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for caps in CLAUSE.captures_iter(text) {
        let clause = caps.get(1).map_or("", |m| m.as_str()).trim();
        for entry in SEPARATOR.split(clause) {
            if let Some(name) = clean_entry(entry) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
    }

    if names.len() > max_items {
        debug!(found = names.len(), max_items, "Truncating equipment list");
        names.truncate(max_items);
    }
    names
}

fn clean_entry(entry: &str) -> Option<String> {
    let collapsed = WHITESPACE.replace_all(entry.trim(), " ");
    let mut name = PAREN_SUFFIX.replace(collapsed.trim(), "").into_owned();

    let model = name
        .split(' ')
        .next()
        .filter(|first| name.contains(' ') && MODEL_TOKEN.is_match(first))
        .map(str::to_string);
    if let Some(model) = model {
        name = model;
    }

    if let Some(leading) = LEADING_MODEL.captures(&name).and_then(|c| c.get(1)) {
        name = leading.as_str().to_string();
    }

    let name = TRAILING_JUNK.replace(&name, "");
    let name = YJ_12B.replace_all(&name, "YJ-12");
    (name.chars().count() > 1).then(|| name.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn extract(text: &str) -> Vec<String> {
        extract_equipment_names(text, 5)
    }

    #[test]
    fn test_single_and_separated() {
        assert_eq!(extract("裝備: HQ-12"), vec!["HQ-12"]);
        assert_eq!(extract("裝備：HQ-12、HQ-12A"), vec!["HQ-12", "HQ-12A"]);
        assert_eq!(extract("裝備：HQ-12/HQ-12A"), vec!["HQ-12", "HQ-12A"]);
        assert_eq!(extract("裝備：J-16,J-10，H-6"), vec!["J-16", "J-10", "H-6"]);
    }

    #[test]
    fn test_leading_model_token_kept() {
        assert_eq!(
            extract("裝備: M1A2 Abrams、Apache AH-64、Patriot missile system"),
            vec!["M1A2", "Apache", "Patriot"]
        );
    }

    #[test]
    fn test_clause_terminators() {
        assert_eq!(extract("裝備：紅旗-12（改良型） 戰術編號 602"), vec!["紅旗-12"]);
        assert_eq!(
            extract("裝備：YJ-12B、鷹擊-62 https://example.org/base"),
            vec!["YJ-12", "鷹擊-62"]
        );
        assert_eq!(extract("駐地。裝備：KJ-500。另有營舍"), vec!["KJ-500"]);
    }

    #[test]
    fn test_multiple_clauses_deduplicated() {
        let text = "裝備：J-16、J-10\n說明：第二聯隊\n裝備：J-16、Su-35S";
        assert_eq!(extract(text), vec!["J-16", "J-10", "Su-35S"]);
    }

    #[test]
    fn test_full_width_space_and_cjk_names() {
        assert_eq!(extract("裝備：殲-16\u{3000}戰機"), vec!["殲-16"]);
    }

    #[test]
    fn test_short_names_dropped() {
        assert_eq!(extract("裝備：X、HQ-9、 "), vec!["HQ-9"]);
    }

    #[test]
    fn test_truncated_to_max_items() {
        let text = "裝備：J-16、J-20、J-10、Su-30、H-6、Y-20";
        assert_eq!(extract_equipment_names(text, 5).len(), 5);
        assert_eq!(extract_equipment_names(text, 3), vec!["J-16", "J-20", "J-10"]);
    }

    #[test]
    fn test_no_clause() {
        assert!(extract("說明：雷達站").is_empty());
        assert!(extract("").is_empty());
    }

    proptest! {
        #[test]
        fn prop_names_unique_and_bounded(
            entries in prop::collection::vec("[A-Z]{1,3}-[0-9]{1,3}|[紅旗殲運]{1,2}-[0-9]{1,2}", 0..12),
            max_items in 0usize..8,
        ) {
            let text = format!("說明：測試。裝備：{}", entries.join("、"));
            let names = extract_equipment_names(&text, max_items);

            prop_assert!(names.len() <= max_items);
            for (i, name) in names.iter().enumerate() {
                prop_assert!(name.chars().count() > 1);
                prop_assert!(!names[..i].contains(name));
            }
        }
    }
}
