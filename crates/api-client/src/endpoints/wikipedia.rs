//! Wikipedia page-summary endpoint

use crate::client::MapClient;
use crate::error::{ApiError, ApiResult};
use facilitymap_equipment::{EquipmentError, PageSummary, SummarySource};
use reqwest::Url;
use serde::Deserialize;

/// Page-summary API interface
#[derive(Clone)]
pub struct WikipediaApi {
    client: MapClient,
}

impl WikipediaApi {
    /// Create a new page-summary API interface
    pub(crate) fn new(client: MapClient) -> Self {
        Self { client }
    }

    /// Summary URL for `title`, encoded as a single path segment
    pub fn summary_url(&self, title: &str) -> ApiResult<Url> {
        let base = &self.client.config().wikipedia_url;
        let mut url = Url::parse(base).map_err(|e| ApiError::InvalidUrl(format!("{base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(base.clone()))?
            .pop_if_empty()
            .push(title);
        Ok(url)
    }

    /// Fetch the summary of `title`
    ///
    /// Missing pages, as a 404 or as an error payload, are `None`.
    pub async fn page_summary(&self, title: &str) -> ApiResult<Option<PageSummary>> {
        let url = self.summary_url(title)?;
        let payload: Option<SummaryPayload> = self
            .client
            .get_json_opt(url.as_str(), &[], &self.client.config().retry)
            .await?;
        Ok(payload.and_then(SummaryPayload::into_summary))
    }
}

impl SummarySource for WikipediaApi {
    async fn summary(&self, title: &str) -> Result<Option<PageSummary>, EquipmentError> {
        self.page_summary(title).await.map_err(EquipmentError::from)
    }
}

/// Page summary response body
#[derive(Debug, Deserialize)]
struct SummaryPayload {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    thumbnail: Option<ImageRef>,
    #[serde(default)]
    originalimage: Option<ImageRef>,
    #[serde(default)]
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ImageRef {
    source: String,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    #[serde(default)]
    desktop: Option<PageLink>,
}

#[derive(Debug, Deserialize)]
struct PageLink {
    page: String,
}

impl SummaryPayload {
    fn is_missing(&self) -> bool {
        self.status == Some(404)
            || self
                .kind
                .as_deref()
                .is_some_and(|kind| kind == "Internal error" || kind.ends_with("not_found"))
    }

    fn into_summary(self) -> Option<PageSummary> {
        if self.is_missing() {
            return None;
        }
        Some(PageSummary {
            title: self.title?,
            description: self.description,
            extract: self.extract,
            thumbnail: self.thumbnail.map(|image| image.source),
            original_image: self.originalimage.map(|image| image.source),
            page_url: self.content_urls.and_then(|urls| urls.desktop).map(|link| link.page),
        })
    }
}
