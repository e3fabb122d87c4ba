//! Nominatim geocoder endpoint

use crate::client::MapClient;
use crate::error::ApiResult;
use facilitymap_core::retry::RetryConfig;
use facilitymap_search::{GeocodeBackend, NominatimPlace, SearchError};

/// Geocoder API interface
///
/// Requests are never retried: the public instance allows one request per
/// second, and pacing is the caller's job (see `facilitymap_search::Geocoder`).
#[derive(Clone)]
pub struct NominatimApi {
    client: MapClient,
}

impl NominatimApi {
    /// Create a new geocoder API interface
    pub(crate) fn new(client: MapClient) -> Self {
        Self { client }
    }

    /// Query parameters for a free-text search
    #[must_use]
    pub fn query_params(&self, query: &str) -> Vec<(&'static str, String)> {
        let config = self.client.config();
        vec![
            ("q", query.to_string()),
            ("format", "json".to_string()),
            ("limit", config.result_limit.to_string()),
            ("addressdetails", "1".to_string()),
            ("accept-language", config.accept_language.clone()),
        ]
    }

    /// Search for places matching `query`
    ///
    /// A 404 answer is an empty result.
    pub async fn search_places(&self, query: &str) -> ApiResult<Vec<NominatimPlace>> {
        let places: Option<Vec<NominatimPlace>> = self
            .client
            .get_json_opt(
                &self.client.config().nominatim_url,
                &self.query_params(query),
                &RetryConfig::no_retry(),
            )
            .await?;
        Ok(places.unwrap_or_default())
    }
}

impl GeocodeBackend for NominatimApi {
    async fn search(&self, query: &str) -> Result<Vec<NominatimPlace>, SearchError> {
        self.search_places(query).await.map_err(SearchError::from)
    }
}
