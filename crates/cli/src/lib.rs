//! Terminal helpers for the facilitymap command-line tools
//!
//! Provides shared CLI functionality:
//! - Status lines and headers
//! - Distance, coordinate and count formatting
//! - Spinners for remote lookups

#![warn(missing_docs)]

pub mod output;
pub mod progress;
