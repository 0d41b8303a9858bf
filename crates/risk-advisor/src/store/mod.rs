//! Collaborator Stores
//!
//! Where the engine's inputs come from and where scored profiles go. The
//! engine itself only ever sees an immutable [`Catalog`] snapshot.

mod file;
mod profiles;
mod seed;

pub use file::FileCatalogStore;
pub use profiles::{Assessment, MemoryProfileStore, ProfileStore};
pub use seed::SeedCatalogStore;

use std::sync::Arc;

use async_trait::async_trait;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::model::InstrumentRecord;

/// Source of instrument catalog snapshots (Strategy pattern)
///
/// Implement this for each backing source: built-in seed, JSON file, a
/// research database.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Current catalog snapshot. Cheap to clone and safe to hold across
    /// a refresh.
    async fn snapshot(&self) -> Result<Arc<Catalog>>;

    /// Strict single-instrument lookup
    async fn instrument(&self, symbol: &str) -> Result<InstrumentRecord> {
        let catalog = self.snapshot().await?;
        catalog.get(symbol).cloned()
    }

    /// Check if the backing source is usable
    async fn health_check(&self) -> bool;

    /// Store name
    fn name(&self) -> &str;
}
