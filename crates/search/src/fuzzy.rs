//! Script-insensitive substring matching and highlighting.

use crate::ScriptFolder;
use std::ops::Range;

/// Opening tag wrapped around a highlighted match.
pub const HIGHLIGHT_OPEN: &str = r#"<mark class="search-highlight">"#;
/// Closing tag of a highlighted match.
pub const HIGHLIGHT_CLOSE: &str = "</mark>";

/// Case-insensitive substring test after folding both sides to Simplified script.
///
/// Empty text or query never match.
///
/// # Example
/// ```
/// use facilitymap_search::{fuzzy_match, ScriptFolder};
///
/// let folder = ScriptFolder::builtin();
/// assert!(fuzzy_match(&folder, "臺灣海峽", "台湾"));
/// assert!(fuzzy_match(&folder, "HQ-9 陣地", "hq-9"));
/// assert!(!fuzzy_match(&folder, "HQ-9 陣地", "hq-12"));
/// ```
pub fn fuzzy_match(folder: &ScriptFolder, text: &str, query: &str) -> bool {
    if text.is_empty() || query.is_empty() {
        return false;
    }
    folder.fold(text).contains(&folder.fold(query))
}

/// Byte range in `text` of the first script and case-insensitive occurrence of `query`.
///
/// [`ScriptFolder::fold`] works per character, so the folded query is found
/// here exactly when [`fuzzy_match`] reports a match, and the range always
/// falls on character boundaries of the original text.
pub fn find_match(folder: &ScriptFolder, text: &str, query: &str) -> Option<Range<usize>> {
    let needle = folder.fold(query);
    if text.is_empty() || needle.is_empty() {
        return None;
    }

    let mut folded = String::with_capacity(text.len());
    // (original byte range, end of its folded bytes)
    let mut segments: Vec<(Range<usize>, usize)> = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for (start, c) in text.char_indices() {
        folded.push_str(&folder.fold(c.encode_utf8(&mut buf)));
        segments.push((start..start + c.len_utf8(), folded.len()));
    }

    let found = folded.find(&needle)?;
    let last = found + needle.len() - 1;
    let first_seg = segments.iter().position(|(_, end)| *end > found)?;
    let last_seg = segments.iter().position(|(_, end)| *end > last)?;
    Some(segments[first_seg].0.start..segments[last_seg].0.end)
}

/// Wraps the first match of `query` in a `<mark>` element.
///
/// The original text keeps its casing and script; without a match the text
/// is returned unchanged.
pub fn highlight_match(folder: &ScriptFolder, text: &str, query: &str) -> String {
    match find_match(folder, text, query) {
        Some(range) => format!(
            "{}{HIGHLIGHT_OPEN}{}{HIGHLIGHT_CLOSE}{}",
            &text[..range.start],
            &text[range.clone()],
            &text[range.end..]
        ),
        None => text.to_string(),
    }
}
