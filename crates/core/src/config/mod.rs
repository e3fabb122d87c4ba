//! Configuration loading and schema definitions
//!
//! Shared configuration types used by the engines and the CLI.

mod loader;
mod schema;

pub use loader::{parse_config, Config};
pub use schema::*;
