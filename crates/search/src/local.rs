//! Ranked search over local features.

use crate::relevance::{calculate_relevance, RelevanceScore};
use crate::ScriptFolder;
use facilitymap_core::config::SearchConfig;
use facilitymap_core::feature::Feature;
use serde::Serialize;

/// Display name of features without `名稱` or `name`.
pub const UNNAMED: &str = "未命名";
/// Layer label of features without a `layer` property.
pub const UNCLASSIFIED: &str = "未分類";

/// Options for local search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Property fields to scan, in priority order
    pub fields: Vec<String>,
    /// Scanning stops once this many matches were found
    pub max_results: usize,
    /// Shorter trimmed queries return nothing
    pub min_query_length: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            fields: config.fields.clone(),
            max_results: config.max_results,
            min_query_length: config.min_query_length,
        }
    }
}

/// A feature matching a query.
#[derive(Debug, Clone, Serialize)]
pub struct LocalMatch<'a> {
    #[serde(skip)]
    pub feature: &'a Feature,
    /// First field, in priority order, that contained the query
    pub matched_field: String,
    pub score: RelevanceScore,
    pub display_name: String,
    pub layer: String,
    /// `(lat, lng)` when the feature has a point geometry
    pub coordinates: Option<(f64, f64)>,
}

/// Search features for `query`.
///
/// Each feature is scored on the first configured field whose folded value
/// contains the folded query. Scanning stops as soon as `max_results`
/// matches were collected, so with a full page the result is the first
/// matches in input order rather than the best-scoring ones. The page is
/// then sorted by descending score, keeping input order among equal scores.
pub fn search_local_features<'a, I>(
    folder: &ScriptFolder,
    features: I,
    query: &str,
    options: &SearchOptions,
) -> Vec<LocalMatch<'a>>
where
    I: IntoIterator<Item = &'a Feature>,
{
    let query = query.trim();
    if query.is_empty()
        || query.chars().count() < options.min_query_length
        || options.max_results == 0
    {
        return Vec::new();
    }

    let folded_query = folder.fold(query);
    let mut results = Vec::new();

    for feature in features {
        let hit = options.fields.iter().find_map(|field| {
            let value = feature.property_text(field)?;
            calculate_relevance(&folder.fold(&value), &folded_query).map(|score| (field, score))
        });

        if let Some((field, score)) = hit {
            results.push(LocalMatch {
                feature,
                matched_field: field.clone(),
                score,
                display_name: feature
                    .property_text("名稱")
                    .or_else(|| feature.property_text("name"))
                    .unwrap_or_else(|| UNNAMED.to_string()),
                layer: feature
                    .property_text("layer")
                    .unwrap_or_else(|| UNCLASSIFIED.to_string()),
                coordinates: feature.point(),
            });
            if results.len() >= options.max_results {
                break;
            }
        }
    }

    // Vec::sort_by is stable
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use facilitymap_core::feature::{Properties, PropertyValue};

    fn feature(props: &[(&str, &str)]) -> Feature {
        let properties: Properties = props
            .iter()
            .map(|(k, v)| ((*k).to_string(), PropertyValue::String((*v).to_string())))
            .collect();
        Feature::point_feature(25.0, 121.0, properties)
    }

    fn search<'a>(features: &'a [Feature], query: &str, options: &SearchOptions) -> Vec<LocalMatch<'a>> {
        search_local_features(&ScriptFolder::builtin(), features, query, options)
    }

    #[test]
    fn test_score_bands() {
        let features = vec![
            feature(&[("名稱", "HQ-12")]),
            feature(&[("名稱", "HQ-12A 系統")]),
            feature(&[("名稱", "防空陣地"), ("說明", "部署 HQ-12 飛彈")]),
        ];
        let results = search(&features, "HQ-12", &SearchOptions::default());
        let scores: Vec<_> = results.iter().map(|r| r.score.value()).collect();
        assert_eq!(scores, vec![100.0, 80.0, 50.0]);
        assert_eq!(results[2].matched_field, "說明");
    }

    #[test]
    fn test_first_matching_field_wins() {
        // 名稱 contains the query, 說明 equals it; 名稱 is scanned first
        let features = vec![feature(&[("名稱", "新竹 HQ-12 陣地"), ("說明", "HQ-12")])];
        let results = search(&features, "hq-12", &SearchOptions::default());
        assert_eq!(results[0].matched_field, "名稱");
        assert_eq!(results[0].score, RelevanceScore::Contains);
    }

    #[test]
    fn test_cross_script_match() {
        let features = vec![feature(&[("名稱", "臺灣海峽觀測站")])];
        let results = search(&features, "台湾", &SearchOptions::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, RelevanceScore::StartsWith);
    }

    #[test]
    fn test_early_exit_keeps_first_found() {
        let features = vec![
            feature(&[("名稱", "基地 A")]),
            feature(&[("名稱", "基地 B")]),
            feature(&[("名稱", "基地")]),
        ];
        let options = SearchOptions { max_results: 2, ..SearchOptions::default() };
        let results = search(&features, "基地", &options);
        // The exact match sits third and is never reached
        let names: Vec<_> = results.iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, vec!["基地 A", "基地 B"]);
    }

    #[test]
    fn test_stable_order_for_equal_scores() {
        let features = vec![
            feature(&[("名稱", "北部 雷達站")]),
            feature(&[("名稱", "雷達站")]),
            feature(&[("名稱", "南部 雷達站")]),
        ];
        let results = search(&features, "雷達站", &SearchOptions::default());
        let names: Vec<_> = results.iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, vec!["雷達站", "北部 雷達站", "南部 雷達站"]);
    }

    #[test]
    fn test_min_query_length_and_empty_query() {
        let features = vec![feature(&[("名稱", "HQ-12")])];
        let options = SearchOptions { min_query_length: 3, ..SearchOptions::default() };
        assert!(search(&features, "HQ", &options).is_empty());
        assert!(search(&features, "   ", &SearchOptions::default()).is_empty());
        assert!(search(&features, "", &SearchOptions::default()).is_empty());
    }

    #[test]
    fn test_display_defaults() {
        let features = vec![
            feature(&[("說明", "hangar")]),
            feature(&[("name", "Hangar 2"), ("說明", "Hangar 2 apron"), ("layer", "空軍")]),
        ];
        let results = search(&features, "hangar", &SearchOptions::default());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].display_name, UNNAMED);
        assert_eq!(results[0].layer, UNCLASSIFIED);
        assert_eq!(results[1].display_name, "Hangar 2");
        assert_eq!(results[1].layer, "空軍");
        assert_eq!(results[1].coordinates, Some((25.0, 121.0)));
    }

    #[test]
    fn test_numeric_property_matches() {
        let mut properties = Properties::new();
        properties.insert(
            "名稱".to_string(),
            PropertyValue::Number(serde_json::Number::from(602)),
        );
        let features = vec![Feature::point_feature(0.0, 0.0, properties)];
        let results = search(&features, "602", &SearchOptions::default());
        assert_eq!(results[0].score, RelevanceScore::Exact);
    }
}
