//! Rate-limited, cached remote geocoding.
//!
//! Every lookup first consults a TTL cache keyed by the lower-cased query.
//! Misses go through a single-flight FIFO gate that keeps a fixed gap after
//! each request, then to the [`GeocodeBackend`] under a timeout. Only
//! successful responses are cached.

use crate::error::{Result, SearchError};
use crate::ScriptFolder;
use facilitymap_core::cache::TtlCache;
use facilitymap_core::config::GeocoderConfig;
use facilitymap_core::rate_limit::{RequestGate, SpacingConfig};
use futures::future::join_all;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Queries shorter than this (after trimming) are never sent.
pub const MIN_REMOTE_QUERY_CHARS: usize = 2;

/// One raw geocoder hit, as returned by Nominatim's JSON format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NominatimPlace {
    #[serde(deserialize_with = "string_or_number")]
    pub lat: String,
    #[serde(deserialize_with = "string_or_number")]
    pub lon: String,
    pub display_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub importance: Option<f64>,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// A geocoder hit ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodedPlace {
    pub display_name: String,
    /// Short name, falling back to the first segment of the display name
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub kind: Option<String>,
    pub importance: f64,
}

impl GeocodedPlace {
    /// Converts a raw hit; hits with unparseable coordinates yield `None`.
    pub fn from_place(place: NominatimPlace) -> Option<Self> {
        let lat: f64 = place.lat.trim().parse().ok().filter(|v: &f64| v.is_finite())?;
        let lng: f64 = place.lon.trim().parse().ok().filter(|v: &f64| v.is_finite())?;
        let name = place
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| {
                place
                    .display_name
                    .split(',')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            });

        Some(Self {
            display_name: place.display_name,
            name,
            lat,
            lng,
            kind: place.kind,
            importance: place.importance.unwrap_or(0.0),
        })
    }
}

/// Transport to a geocoding service.
pub trait GeocodeBackend: Send + Sync {
    /// Look up a single query string.
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<NominatimPlace>>> + Send;
}

/// Tunables for [`Geocoder`].
#[derive(Debug, Clone)]
pub struct GeocoderOptions {
    pub spacing: Duration,
    pub cache_max_age: Duration,
    pub timeout: Duration,
}

impl Default for GeocoderOptions {
    fn default() -> Self {
        Self::from(&GeocoderConfig::default())
    }
}

impl From<&GeocoderConfig> for GeocoderOptions {
    fn from(config: &GeocoderConfig) -> Self {
        Self {
            spacing: config.request_spacing(),
            cache_max_age: config.cache_max_age(),
            timeout: config.timeout(),
        }
    }
}

/// Cached, rate-limited front of a [`GeocodeBackend`].
///
/// One instance owns its cache and queue; share it (for example behind an
/// `Arc`) between every caller that must respect the same rate limit.
pub struct Geocoder<B> {
    backend: B,
    cache: TtlCache<Vec<NominatimPlace>>,
    gate: RequestGate,
    timeout: Duration,
    folder: ScriptFolder,
}

impl<B: GeocodeBackend> Geocoder<B> {
    pub fn new(backend: B, options: GeocoderOptions, folder: ScriptFolder) -> Self {
        Self {
            backend,
            cache: TtlCache::new(options.cache_max_age),
            gate: RequestGate::new(SpacingConfig { spacing: options.spacing }),
            timeout: options.timeout,
            folder,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of cached query responses, fresh or stale.
    pub fn cached_queries(&self) -> usize {
        self.cache.len()
    }

    /// Raw lookup of one query string through cache and queue.
    pub async fn request(&self, query: &str) -> Result<Vec<NominatimPlace>> {
        let key = query.to_lowercase();
        if let Some(hit) = self.cache.get(&key) {
            debug!(query, "Geocoder cache hit");
            return Ok(hit);
        }

        self.gate
            .run(|| async {
                // An earlier caller in the queue may have fetched the same query
                if let Some(hit) = self.cache.get(&key) {
                    debug!(query, "Geocoder cache hit after queueing");
                    return Ok::<_, SearchError>(hit);
                }

                debug!(query, "Geocoder request");
                let places = tokio::time::timeout(self.timeout, self.backend.search(query))
                    .await
                    .map_err(|_| SearchError::Timeout(self.timeout))??;

                self.cache.insert(key.clone(), places.clone());
                Ok(places)
            })
            .await
    }

    /// Look up `query` in both scripts and merge the hits.
    ///
    /// The query and its Simplified form are requested (once if identical);
    /// a failed sub-query contributes nothing. Hits are de-duplicated on
    /// their coordinate pair, keeping the first.
    pub async fn search(&self, query: &str) -> Vec<GeocodedPlace> {
        if query.trim().chars().count() < MIN_REMOTE_QUERY_CHARS {
            return Vec::new();
        }

        let mut queries = vec![query.to_string()];
        let simplified = self.folder.to_simplified(query);
        if simplified != query {
            queries.push(simplified);
        }

        let responses = join_all(queries.iter().map(|q| self.request(q))).await;

        let mut seen = HashSet::new();
        let mut places = Vec::new();
        for (q, response) in queries.iter().zip(responses) {
            let hits = match response {
                Ok(hits) => hits,
                Err(e) => {
                    warn!(query = %q, error = %e, "Geocoder sub-query failed");
                    continue;
                }
            };
            for hit in hits {
                if !seen.insert(format!("{},{}", hit.lat, hit.lon)) {
                    continue;
                }
                match GeocodedPlace::from_place(hit) {
                    Some(place) => places.push(place),
                    None => debug!(query = %q, "Dropping geocoder hit without usable coordinates"),
                }
            }
        }
        places
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    /// In-memory backend recording call times.
    #[derive(Clone, Default)]
    pub(crate) struct FakeBackend {
        pub answers: Arc<Mutex<HashMap<String, Vec<NominatimPlace>>>>,
        pub calls: Arc<Mutex<Vec<(String, Instant)>>>,
        pub delay: Duration,
        pub fail: bool,
    }

    impl FakeBackend {
        pub fn with(answers: &[(&str, Vec<NominatimPlace>)]) -> Self {
            let backend = Self::default();
            {
                let mut map = backend.answers.lock().unwrap();
                for (q, places) in answers {
                    map.insert((*q).to_string(), places.clone());
                }
            }
            backend
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl GeocodeBackend for FakeBackend {
        async fn search(&self, query: &str) -> Result<Vec<NominatimPlace>> {
            self.calls.lock().unwrap().push((query.to_string(), Instant::now()));
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(SearchError::Remote("HTTP 503".into()));
            }
            Ok(self.answers.lock().unwrap().get(query).cloned().unwrap_or_default())
        }
    }

    pub(crate) fn place(lat: &str, lon: &str, display: &str, importance: f64) -> NominatimPlace {
        NominatimPlace {
            lat: lat.into(),
            lon: lon.into(),
            display_name: display.into(),
            name: None,
            kind: Some("aerodrome".into()),
            importance: Some(importance),
        }
    }

    fn geocoder(backend: FakeBackend) -> Geocoder<FakeBackend> {
        Geocoder::new(backend, GeocoderOptions::default(), ScriptFolder::builtin())
    }

    #[test]
    fn test_parse_nominatim_json() {
        let json = r#"[
            {"lat": "22.5770", "lon": "120.3500", "display_name": "Pingtung Airport, Pingtung, Taiwan",
             "type": "aerodrome", "importance": 0.41},
            {"lat": 25.0, "lon": 121.5, "display_name": "Taipei"}
        ]"#;
        let places: Vec<NominatimPlace> = serde_json::from_str(json).unwrap();
        assert_eq!(places[0].kind.as_deref(), Some("aerodrome"));
        assert_eq!(places[1].lat, "25.0");

        let converted = GeocodedPlace::from_place(places[0].clone()).unwrap();
        assert_eq!(converted.name, "Pingtung Airport");
        assert_eq!(converted.lat, 22.577);
        assert_eq!(converted.importance, 0.41);
    }

    #[test]
    fn test_unparseable_coordinates_dropped() {
        assert!(GeocodedPlace::from_place(place("north", "120", "X", 0.0)).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_is_not_sent() {
        let backend = FakeBackend::default();
        let geo = geocoder(backend.clone());
        assert!(geo.search(" a ").await.is_empty());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_both_scripts_queried_and_deduplicated() {
        let backend = FakeBackend::with(&[
            ("臺灣機場", vec![place("25.07", "121.55", "松山機場, 臺北", 0.5)]),
            (
                "台湾机场",
                vec![
                    place("25.07", "121.55", "松山机场, 台北", 0.5),
                    place("22.57", "120.35", "屏东机场, 屏东", 0.3),
                ],
            ),
        ]);
        let geo = geocoder(backend.clone());

        let places = geo.search("臺灣機場").await;
        let names: Vec<_> = places.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["松山機場", "屏东机场"]);
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_identical_scripts_queried_once() {
        let backend = FakeBackend::with(&[("Hualien", vec![place("24.02", "121.61", "Hualien", 0.6)])]);
        let geo = geocoder(backend.clone());
        assert_eq!(geo.search("Hualien").await.len(), 1);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_hit_skips_queue() {
        let backend = FakeBackend::with(&[("Hualien", vec![place("24.02", "121.61", "Hualien", 0.6)])]);
        let geo = geocoder(backend.clone());

        geo.request("Hualien").await.unwrap();
        let start = Instant::now();
        let cached = geo.request("HUALIEN").await.unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(backend.call_count(), 1);
        assert_eq!(geo.cached_queries(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_expires_after_an_hour() {
        let backend = FakeBackend::with(&[("Hualien", vec![place("24.02", "121.61", "Hualien", 0.6)])]);
        let geo = geocoder(backend.clone());

        geo.request("Hualien").await.unwrap();
        tokio::time::advance(Duration::from_secs(3601)).await;
        geo.request("Hualien").await.unwrap();
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_are_spaced_after_completion() {
        let backend = FakeBackend {
            delay: Duration::from_millis(300),
            ..FakeBackend::default()
        };
        let geo = Arc::new(geocoder(backend.clone()));
        let origin = Instant::now();

        let handles: Vec<_> = ["one", "two", "three"]
            .into_iter()
            .map(|q| {
                let geo = Arc::clone(&geo);
                tokio::spawn(async move { geo.request(q).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let offsets: Vec<_> = backend
            .calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, at)| at.duration_since(origin).as_millis())
            .collect();
        assert_eq!(offsets, vec![0, 1400, 2800]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_not_cached_and_still_spaced() {
        let backend = FakeBackend { fail: true, ..FakeBackend::default() };
        let geo = geocoder(backend.clone());

        assert!(geo.request("Hualien").await.is_err());
        let start = Instant::now();
        assert!(geo.request("Hualien").await.is_err());
        assert_eq!(start.elapsed(), Duration::from_millis(1100));
        assert_eq!(backend.call_count(), 2);
        assert_eq!(geo.cached_queries(), 0);
        assert!(geo.search("Hualien").await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_releases_queue() {
        let backend = FakeBackend {
            delay: Duration::from_secs(60),
            ..FakeBackend::default()
        };
        let geo = geocoder(backend.clone());

        let err = geo.request("slow").await.unwrap_err();
        assert!(matches!(err, SearchError::Timeout(d) if d == Duration::from_secs(10)));

        let start = Instant::now();
        let _ = geo.request("slow again").await;
        assert_eq!(backend.call_count(), 2);
        assert!(start.elapsed() >= Duration::from_millis(1100));
    }
}
