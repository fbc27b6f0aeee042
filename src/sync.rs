//! Removable-drive synchronisation.
//!
//! A drive labeled like `sync.volume_label` is located, then either given the
//! canonical folder layout (first use) or merged into the local library
//! (copy what is missing, never overwrite).

mod job;
mod progress;
mod reconcile;
mod volume;

pub use job::{SyncJob, SyncPoll};
pub use reconcile::SyncReport;

#[cfg(test)]
mod tests;
