//! Application State

use std::sync::Arc;

use risk_advisor::Advisor;
use risk_advisor::store::{CatalogStore, ProfileStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Engine with validated tunables
    pub advisor: Arc<Advisor>,

    /// Where catalog snapshots come from (seed or file)
    pub catalog: Arc<dyn CatalogStore>,

    /// Archive of scored questionnaires
    pub profiles: Arc<dyn ProfileStore>,
}
