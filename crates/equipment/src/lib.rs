//! Equipment extraction and lookup for facility descriptions.
//!
//! Facility descriptions list their equipment in `裝備:` clauses. This crate
//! pulls the model names out of such text, normalises Chinese missile
//! designations to their Latin names, and resolves them through a
//! [`SummarySource`] with a short-lived cache and an offline catalog.

mod catalog;
mod error;
mod extract;
mod lookup;
mod normalize;

pub use catalog::{basic_info, catalog, BasicEquipment};
pub use error::{EquipmentError, EquipmentErrorCode, Result};
pub use extract::extract_equipment_names;
pub use lookup::{
    truncate_description, EquipmentInfo, EquipmentResolver, PageSummary, ProfileLimits,
    SummarySource, DESCRIPTION_MAX_CHARS, UNAVAILABLE_DESCRIPTION,
};
pub use normalize::normalize_for_lookup;
