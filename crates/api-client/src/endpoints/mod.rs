//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for one external service and
//! implements the matching domain port.
//!
//! | Module | Service | Port |
//! |--------|---------|------|
//! | `nominatim` | OpenStreetMap Nominatim `search` | `facilitymap_search::GeocodeBackend` |
//! | `wikipedia` | Wikipedia REST `page/summary` | `facilitymap_equipment::SummarySource` |

pub mod nominatim;
pub mod wikipedia;

pub use nominatim::NominatimApi;
pub use wikipedia::WikipediaApi;
