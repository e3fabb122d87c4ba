//! Local search augmented with geocoder results.

use crate::geocoder::{GeocodeBackend, GeocodedPlace, Geocoder, GeocoderOptions};
use crate::local::{search_local_features, LocalMatch, SearchOptions};
use crate::relevance::remote_score;
use crate::{highlight_match, ScriptFolder};
use facilitymap_core::config::ConfigSchema;
use facilitymap_core::feature::Feature;
use serde::Serialize;
use tracing::debug;

/// Layer label of geocoder results without a place type.
pub const REMOTE_DEFAULT_KIND: &str = "地點";

/// A geocoder hit ranked alongside local matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteMatch {
    pub display_name: String,
    pub name: String,
    pub layer: String,
    pub lat: f64,
    pub lng: f64,
    pub score: f64,
}

impl From<GeocodedPlace> for RemoteMatch {
    fn from(place: GeocodedPlace) -> Self {
        Self {
            layer: format!("🌍 {}", place.kind.as_deref().unwrap_or(REMOTE_DEFAULT_KIND)),
            score: remote_score(place.importance),
            display_name: place.display_name,
            name: place.name,
            lat: place.lat,
            lng: place.lng,
        }
    }
}

/// One entry of a combined result list.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum SearchResult<'a> {
    Local(LocalMatch<'a>),
    Remote(RemoteMatch),
}

impl SearchResult<'_> {
    pub fn score(&self) -> f64 {
        match self {
            SearchResult::Local(m) => m.score.value(),
            SearchResult::Remote(m) => m.score,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            SearchResult::Local(m) => &m.display_name,
            SearchResult::Remote(m) => &m.name,
        }
    }

    pub fn layer(&self) -> &str {
        match self {
            SearchResult::Local(m) => &m.layer,
            SearchResult::Remote(m) => &m.layer,
        }
    }

    /// `(lat, lng)` when known.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match self {
            SearchResult::Local(m) => m.coordinates,
            SearchResult::Remote(m) => Some((m.lat, m.lng)),
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            SearchResult::Local(_) => "local",
            SearchResult::Remote(_) => "remote",
        }
    }
}

/// Options for combined search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedOptions {
    pub local: SearchOptions,
    /// The geocoder is only asked when fewer local matches than this were found
    pub remote_threshold: usize,
    /// Trimmed queries shorter than this never reach the geocoder
    pub remote_min_query_length: usize,
    /// Cap on geocoder hits merged into the result
    pub remote_max_results: usize,
    pub include_remote: bool,
}

impl Default for CombinedOptions {
    fn default() -> Self {
        Self::from(&ConfigSchema::default())
    }
}

impl From<&ConfigSchema> for CombinedOptions {
    fn from(config: &ConfigSchema) -> Self {
        Self {
            local: SearchOptions::from(&config.search),
            remote_threshold: config.search.remote_threshold,
            remote_min_query_length: config.search.remote_min_query_length,
            remote_max_results: config.search.remote_max_results,
            include_remote: config.geocoder.enabled,
        }
    }
}

/// Search local features, topping up with geocoder results when few matched.
///
/// Local results are computed first. The geocoder is consulted only when it
/// is enabled, fewer than `remote_threshold` local matches were found and
/// the trimmed query is long enough. Remote hits always score below local
/// ones; the merged list is sorted by descending score and truncated to
/// `local.max_results`. Geocoder failures leave the local results as they are.
pub async fn search_combined<'a, B, I>(
    folder: &ScriptFolder,
    geocoder: Option<&Geocoder<B>>,
    features: I,
    query: &str,
    options: &CombinedOptions,
) -> Vec<SearchResult<'a>>
where
    B: GeocodeBackend,
    I: IntoIterator<Item = &'a Feature>,
{
    let local = search_local_features(folder, features, query, &options.local);
    let local_count = local.len();
    let mut results: Vec<SearchResult<'a>> = local.into_iter().map(SearchResult::Local).collect();

    let query = query.trim();
    let wants_remote = options.include_remote
        && local_count < options.remote_threshold
        && query.chars().count() >= options.remote_min_query_length;

    if let Some(geocoder) = geocoder.filter(|_| wants_remote) {
        let remote = geocoder.search(query).await;
        debug!(query, local = local_count, remote = remote.len(), "Combined search");
        results.extend(
            remote
                .into_iter()
                .take(options.remote_max_results)
                .map(|place| SearchResult::Remote(place.into())),
        );
        results.sort_by(|a, b| b.score().total_cmp(&a.score()));
    }

    results.truncate(options.local.max_results);
    results
}

/// Search context: script folder, geocoder with its cache and queue, options.
///
/// Build one per session; every search through it shares the geocoder's
/// cache and rate limit.
pub struct SearchEngine<B> {
    folder: ScriptFolder,
    geocoder: Option<Geocoder<B>>,
    options: CombinedOptions,
}

impl<B: GeocodeBackend> SearchEngine<B> {
    pub fn new(folder: ScriptFolder, geocoder: Option<Geocoder<B>>, options: CombinedOptions) -> Self {
        Self { folder, geocoder, options }
    }

    /// Engine with the built-in script table and a geocoder over `backend`.
    pub fn from_config(backend: B, config: &ConfigSchema) -> Self {
        let folder = ScriptFolder::builtin();
        let geocoder = config.geocoder.enabled.then(|| {
            Geocoder::new(backend, GeocoderOptions::from(&config.geocoder), folder.clone())
        });
        Self::new(folder, geocoder, CombinedOptions::from(config))
    }

    pub fn folder(&self) -> &ScriptFolder {
        &self.folder
    }

    pub fn options(&self) -> &CombinedOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut CombinedOptions {
        &mut self.options
    }

    pub fn geocoder(&self) -> Option<&Geocoder<B>> {
        self.geocoder.as_ref()
    }

    pub fn search_local<'a, I>(&self, features: I, query: &str) -> Vec<LocalMatch<'a>>
    where
        I: IntoIterator<Item = &'a Feature>,
    {
        search_local_features(&self.folder, features, query, &self.options.local)
    }

    pub async fn search_combined<'a, I>(&self, features: I, query: &str) -> Vec<SearchResult<'a>>
    where
        I: IntoIterator<Item = &'a Feature>,
    {
        search_combined(&self.folder, self.geocoder.as_ref(), features, query, &self.options).await
    }

    pub fn highlight(&self, text: &str, query: &str) -> String {
        highlight_match(&self.folder, text, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoder::tests::{place, FakeBackend};
    use facilitymap_core::feature::{Properties, PropertyValue};

    fn feature(name: &str) -> Feature {
        let mut props = Properties::new();
        props.insert("名稱".into(), PropertyValue::String(name.into()));
        Feature::point_feature(23.0, 120.0, props)
    }

    fn engine(backend: FakeBackend) -> SearchEngine<FakeBackend> {
        SearchEngine::from_config(backend, &ConfigSchema::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_enough_local_results_skip_remote() {
        let backend = FakeBackend::with(&[("機場", vec![place("22.5", "120.3", "Airport", 0.9)])]);
        let engine = engine(backend.clone());
        let features: Vec<_> = (0..6).map(|i| feature(&format!("機場 {i}"))).collect();

        let results = engine.search_combined(&features, "機場").await;
        assert_eq!(results.len(), 6);
        assert!(results.iter().all(|r| r.source() == "local"));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_skips_remote() {
        let backend = FakeBackend::default();
        let engine = engine(backend.clone());
        let features = vec![feature("花蓮")];

        let results = engine.search_combined(&features, "花蓮").await;
        assert_eq!(results.len(), 1);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_results_rank_below_local() {
        let backend = FakeBackend::with(&[(
            "Hualien",
            vec![
                place("24.02", "121.61", "Hualien Airport, Hualien, Taiwan", 2.5),
                place("23.97", "121.60", "Hualien City, Taiwan", 0.2),
            ],
        )]);
        let engine = engine(backend.clone());
        let features = vec![feature("Hualien AFB"), feature("Taitung")];

        let results = engine.search_combined(&features, "Hualien").await;
        let sources: Vec<_> = results.iter().map(|r| r.source()).collect();
        assert_eq!(sources, vec!["local", "remote", "remote"]);
        assert_eq!(results[0].score(), 80.0);
        assert!((results[1].score() - 49.9).abs() < 1e-9);
        assert!((results[2].score() - 42.0).abs() < 1e-9);
        assert_eq!(results[1].display_name(), "Hualien Airport");
        assert_eq!(results[1].layer(), "🌍 aerodrome");
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_failure_keeps_local() {
        let backend = FakeBackend { fail: true, ..FakeBackend::default() };
        let engine = engine(backend.clone());
        let features = vec![feature("Hualien AFB")];

        let results = engine.search_combined(&features, "Hualien").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source(), "local");
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_geocoder_is_never_used() {
        let backend = FakeBackend::default();
        let mut config = ConfigSchema::default();
        config.geocoder.enabled = false;
        let engine = SearchEngine::from_config(backend.clone(), &config);
        assert!(engine.geocoder().is_none());

        let features = vec![feature("Taitung")];
        assert!(engine.search_combined(&features, "Hualien").await.is_empty());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_merged_list_truncated() {
        let hits: Vec<_> = (0..5)
            .map(|i| place(&format!("24.0{i}"), "121.6", &format!("Hualien {i}"), 0.5))
            .collect();
        let backend = FakeBackend::with(&[("Hualien", hits)]);
        let mut engine = engine(backend);
        engine.options_mut().local.max_results = 3;
        engine.options_mut().remote_max_results = 2;

        let features = vec![feature("Hualien AFB")];
        let results = engine.search_combined(&features, "Hualien").await;
        assert_eq!(results.len(), 3);
        assert_eq!(results.iter().filter(|r| r.source() == "remote").count(), 2);
    }

    #[test]
    fn test_highlight_through_engine() {
        let engine = engine(FakeBackend::default());
        assert_eq!(
            engine.highlight("東風陣地", "东风"),
            r#"<mark class="search-highlight">東風</mark>陣地"#
        );
    }
}
