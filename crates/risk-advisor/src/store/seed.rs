//! Seed Catalog Store
//!
//! Serves the built-in instrument universe. Always available.

use std::sync::Arc;

use async_trait::async_trait;

use super::CatalogStore;
use crate::catalog::{Catalog, seed_catalog};
use crate::error::Result;

pub struct SeedCatalogStore {
    catalog: Arc<Catalog>,
}

impl SeedCatalogStore {
    pub fn new() -> Result<Self> {
        Ok(Self {
            catalog: Arc::new(seed_catalog()?),
        })
    }
}

#[async_trait]
impl CatalogStore for SeedCatalogStore {
    async fn snapshot(&self) -> Result<Arc<Catalog>> {
        Ok(Arc::clone(&self.catalog))
    }

    async fn health_check(&self) -> bool {
        !self.catalog.is_empty()
    }

    fn name(&self) -> &str {
        "SeedCatalog"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorError;
    use crate::model::Sector;

    #[tokio::test]
    async fn test_seed_store() {
        let store = SeedCatalogStore::new().unwrap();
        assert!(store.health_check().await);

        let msft = store.instrument("msft").await.unwrap();
        assert_eq!(msft.symbol, "MSFT");
        assert_eq!(msft.sector, Sector::Technology);
    }

    #[tokio::test]
    async fn test_unknown_symbol() {
        let store = SeedCatalogStore::new().unwrap();
        let result = store.instrument("NOTREAL").await;
        assert!(matches!(result, Err(AdvisorError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_snapshots_share_one_catalog() {
        let store = SeedCatalogStore::new().unwrap();
        let first = store.snapshot().await.unwrap();
        let second = store.snapshot().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
