use std::sync::Arc;

use crate::db::Database;
use crate::listings::ListingService;

/// Shared gateway state
#[derive(Clone)]
pub struct AppState {
    /// Listing lifecycle service
    pub service: Arc<ListingService>,
    /// PostgreSQL database (None when running on the in-memory store)
    pub pg_db: Option<Arc<Database>>,
}

impl AppState {
    pub fn new(service: Arc<ListingService>, pg_db: Option<Arc<Database>>) -> Self {
        Self { service, pg_db }
    }
}
