//! File Catalog Store
//!
//! Loads the catalog from a JSON array of instrument records. The loaded
//! snapshot is cached until [`FileCatalogStore::refresh`] swaps in a new one.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::CatalogStore;
use crate::catalog::Catalog;
use crate::error::Result;
use crate::model::InstrumentRecord;

pub struct FileCatalogStore {
    path: PathBuf,
    cached: RwLock<Option<Arc<Catalog>>>,
}

impl FileCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: RwLock::new(None),
        }
    }

    /// Load eagerly so a bad file fails at startup instead of first request.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(path);
        store.refresh().await?;
        Ok(store)
    }

    /// Re-read the file. On failure the previous snapshot stays in place.
    pub async fn refresh(&self) -> Result<Arc<Catalog>> {
        let catalog = match load(&self.path).await {
            Ok(catalog) => Arc::new(catalog),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Catalog reload failed: {}", e);
                return Err(e);
            }
        };

        tracing::info!(
            path = %self.path.display(),
            instruments = catalog.len(),
            "Loaded instrument catalog"
        );

        *self.cached.write().await = Some(Arc::clone(&catalog));
        Ok(catalog)
    }
}

async fn load(path: &Path) -> Result<Catalog> {
    let raw = tokio::fs::read_to_string(path).await?;
    let records: Vec<InstrumentRecord> = serde_json::from_str(&raw)?;
    Catalog::new(records)
}

#[async_trait]
impl CatalogStore for FileCatalogStore {
    async fn snapshot(&self) -> Result<Arc<Catalog>> {
        if let Some(catalog) = self.cached.read().await.as_ref() {
            return Ok(Arc::clone(catalog));
        }
        self.refresh().await
    }

    async fn health_check(&self) -> bool {
        tokio::fs::metadata(&self.path).await.is_ok()
    }

    fn name(&self) -> &str {
        "FileCatalog"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorError;
    use crate::model::Sector;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("catalog-{}.json", uuid::Uuid::new_v4()))
    }

    const TWO_RECORDS: &str = r#"[
        {"symbol": "msft", "name": "Microsoft", "sector": "technology",
         "risk_rating": 4, "strength": 92},
        {"symbol": "KO", "name": "Coca-Cola", "sector": "consumer_staples",
         "risk_rating": 2, "strength": "78", "expected_upside_pct": "6"}
    ]"#;

    #[tokio::test]
    async fn test_loads_json_catalog() {
        let path = temp_path();
        tokio::fs::write(&path, TWO_RECORDS).await.unwrap();

        let store = FileCatalogStore::open(&path).await.unwrap();
        let catalog = store.snapshot().await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("MSFT").unwrap().sector, Sector::Technology);
        assert!(store.health_check().await);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let path = temp_path();
        tokio::fs::write(&path, TWO_RECORDS).await.unwrap();
        let store = FileCatalogStore::open(&path).await.unwrap();

        tokio::fs::write(&path, "not json").await.unwrap();
        assert!(matches!(store.refresh().await, Err(AdvisorError::Serialization(_))));
        assert_eq!(store.snapshot().await.unwrap().len(), 2);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_symbols_rejected() {
        let path = temp_path();
        tokio::fs::write(
            &path,
            r#"[
                {"symbol": "KO", "name": "Coca-Cola", "sector": "consumer_staples",
                 "risk_rating": 2, "strength": 78},
                {"symbol": "ko", "name": "Coke", "sector": "consumer_staples",
                 "risk_rating": 2, "strength": 70}
            ]"#,
        )
        .await
        .unwrap();

        let result = FileCatalogStore::open(&path).await;
        assert!(matches!(result, Err(AdvisorError::Validation(_))));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_file() {
        let store = FileCatalogStore::new(temp_path());
        assert!(!store.health_check().await);
        assert!(matches!(store.snapshot().await, Err(AdvisorError::Io(_))));
    }
}
