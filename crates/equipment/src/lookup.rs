//! Encyclopedia lookups for extracted equipment names.

use crate::catalog::basic_info;
use crate::error::{EquipmentError, Result};
use crate::extract::extract_equipment_names;
use crate::normalize::normalize_for_lookup;
use facilitymap_core::cache::TtlCache;
use facilitymap_core::config::{EquipmentConfig, LookupProfile};
use futures::future::join_all;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Descriptions longer than this many characters are cut and end in `...`.
pub const DESCRIPTION_MAX_CHARS: usize = 150;

/// Description of a fallback entry without offline data.
pub const UNAVAILABLE_DESCRIPTION: &str = "網路連線問題，無法載入詳細資訊";

/// Page summary as returned by a [`SummarySource`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSummary {
    pub title: String,
    /// Short description; preferred over `extract`
    pub description: Option<String>,
    pub extract: Option<String>,
    pub thumbnail: Option<String>,
    pub original_image: Option<String>,
    pub page_url: Option<String>,
}

/// Source of encyclopedia page summaries.
pub trait SummarySource: Send + Sync {
    /// Summary for `title`; `Ok(None)` when no such page exists.
    fn summary(&self, title: &str) -> impl Future<Output = Result<Option<PageSummary>>> + Send;
}

/// Resolved information about one equipment name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentInfo {
    /// Name as extracted from the text
    pub name: String,
    pub title: String,
    pub description: String,
    pub thumbnail: Option<String>,
    pub original_image: Option<String>,
    pub page_url: Option<String>,
    /// Built locally because the source could not be reached
    pub fallback: bool,
    /// Fallback built from the offline catalog
    pub offline_data: bool,
}

impl EquipmentInfo {
    fn from_summary(name: &str, summary: PageSummary) -> Self {
        let description = summary
            .description
            .filter(|d| !d.is_empty())
            .or(summary.extract)
            .map(|text| truncate_description(&text))
            .unwrap_or_default();

        Self {
            name: name.to_string(),
            title: summary.title,
            description,
            thumbnail: summary.thumbnail,
            original_image: summary.original_image,
            page_url: summary.page_url,
            fallback: false,
            offline_data: false,
        }
    }

    fn offline(name: &str, description: String, offline_data: bool) -> Self {
        Self {
            name: name.to_string(),
            title: name.to_string(),
            description,
            thumbnail: None,
            original_image: None,
            page_url: None,
            fallback: true,
            offline_data,
        }
    }
}

/// Cut `text` to [`DESCRIPTION_MAX_CHARS`] characters, appending `...` when cut.
pub fn truncate_description(text: &str) -> String {
    if text.chars().count() <= DESCRIPTION_MAX_CHARS {
        return text.to_string();
    }
    let head: String = text.chars().take(DESCRIPTION_MAX_CHARS).collect();
    format!("{}...", head.trim())
}

/// Batch and timeout limits of a lookup profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileLimits {
    /// Lookups issued concurrently
    pub batch_size: usize,
    /// Names taken from one text
    pub max_items: usize,
    /// Per-lookup timeout
    pub timeout: Duration,
}

impl ProfileLimits {
    pub fn for_profile(profile: LookupProfile) -> Self {
        match profile {
            LookupProfile::Desktop => Self {
                batch_size: 3,
                max_items: 5,
                timeout: Duration::from_secs(5),
            },
            LookupProfile::Mobile => Self {
                batch_size: 2,
                max_items: 3,
                timeout: Duration::from_secs(8),
            },
        }
    }
}

/// Resolves equipment names against a [`SummarySource`] with caching and
/// offline fallback.
pub struct EquipmentResolver<S> {
    source: S,
    cache: TtlCache<EquipmentInfo>,
    profile: LookupProfile,
    limits: ProfileLimits,
    batch_delay: Duration,
}

impl<S: SummarySource> EquipmentResolver<S> {
    pub fn new(source: S, config: &EquipmentConfig) -> Self {
        Self {
            source,
            cache: TtlCache::new(Duration::from_secs(config.cache_max_age_secs)),
            profile: config.profile,
            limits: ProfileLimits::for_profile(config.profile),
            batch_delay: Duration::from_millis(config.batch_delay_ms),
        }
    }

    pub fn profile(&self) -> LookupProfile {
        self.profile
    }

    pub fn limits(&self) -> ProfileLimits {
        self.limits
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Equipment names in `text`, capped by the profile.
    pub fn extract(&self, text: &str) -> Vec<String> {
        extract_equipment_names(text, self.limits.max_items)
    }

    /// Resolve one name.
    ///
    /// Returns `None` when the source has no page for it. Source failures
    /// and timeouts produce an uncached fallback entry, filled from the
    /// offline catalog when the model is known.
    pub async fn lookup(&self, name: &str) -> Option<EquipmentInfo> {
        let key = normalize_for_lookup(name);
        if let Some(hit) = self.cache.get(&key) {
            debug!(name, key = %key, "Equipment cache hit");
            return Some(hit);
        }

        let outcome = tokio::time::timeout(self.limits.timeout, self.source.summary(&key))
            .await
            .unwrap_or(Err(EquipmentError::Timeout(self.limits.timeout)));

        match outcome {
            Ok(Some(summary)) => {
                let info = EquipmentInfo::from_summary(name, summary);
                self.cache.insert(key, info.clone());
                Some(info)
            }
            Ok(None) => {
                debug!(name, key = %key, "No summary page");
                None
            }
            Err(e) => {
                warn!(name, key = %key, error = %e, "Equipment lookup failed, using offline data");
                Some(self.fallback(name, &key))
            }
        }
    }

    fn fallback(&self, name: &str, key: &str) -> EquipmentInfo {
        match basic_info(key).or_else(|| basic_info(name)) {
            Some(basic) => {
                let note = match self.profile {
                    LookupProfile::Desktop => "基本資訊",
                    LookupProfile::Mobile => "離線資料",
                };
                let description = format!("{} ({}) - {note}", basic.kind, basic.country);
                EquipmentInfo::offline(name, description, true)
            }
            None => EquipmentInfo::offline(name, UNAVAILABLE_DESCRIPTION.to_string(), false),
        }
    }

    /// Extract names from `text` and resolve them.
    ///
    /// Names are resolved in batches of the profile's size, concurrently
    /// within a batch, pausing between batches. Names without a page are
    /// left out of the result.
    pub async fn process_text(&self, text: &str) -> Vec<EquipmentInfo> {
        let names = self.extract(text);
        if names.is_empty() {
            return Vec::new();
        }

        let batches: Vec<&[String]> = names.chunks(self.limits.batch_size.max(1)).collect();
        let mut resolved = Vec::with_capacity(names.len());

        for (i, batch) in batches.iter().enumerate() {
            let results = join_all(batch.iter().map(|name| self.lookup(name))).await;
            resolved.extend(results.into_iter().flatten());

            if i + 1 < batches.len() {
                tokio::time::sleep(self.batch_delay).await;
            }
        }

        debug!(names = names.len(), resolved = resolved.len(), "Equipment lookup finished");
        resolved
    }
}
