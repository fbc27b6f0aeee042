//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive runtime
//! behavior, helpers to load configuration from disk and the small
//! persisted state written back by the settings screen.

mod load;
mod schema;
mod state;

pub use load::default_log_path;
pub use schema::*;
pub use state::{PersistedToggles, state_path};

#[cfg(test)]
mod tests;
