//! HTTP adapters for the external services used by facilitymap
//!
//! The domain crates define their collaborators as traits; this crate
//! implements them over `reqwest`:
//!
//! - [`NominatimApi`] implements `facilitymap_search::GeocodeBackend`
//! - [`WikipediaApi`] implements `facilitymap_equipment::SummarySource`
//!
//! # Features
//!
//! - **Environment overrides**: endpoints, User-Agent and timeout
//! - **Retry with exponential backoff**: for transient failures, where the service allows it
//! - **Request correlation**: every request carries an `X-Request-ID`
//!
//! # Example
//!
//! ```rust,no_run
//! use facilitymap_api_client::{ClientConfig, MapClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MapClient::with_config(ClientConfig::from_env())?;
//!
//!     let places = client.nominatim().search_places("花蓮機場").await?;
//!     println!("{} places", places.len());
//!
//!     if let Some(page) = client.wikipedia().page_summary("Chengdu J-20").await? {
//!         println!("{}", page.title);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

#[cfg(test)]
mod test_server;

pub use client::MapClient;
pub use config::ClientConfig;
pub use endpoints::{NominatimApi, WikipediaApi};
pub use error::{ApiError, ApiErrorCode, ApiResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::MapClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::{NominatimApi, WikipediaApi};
    pub use crate::error::{ApiError, ApiResult};
}
