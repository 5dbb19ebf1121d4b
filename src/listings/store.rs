//! Persistence Interface
//!
//! The only storage surface the lifecycle service talks to. Conditional
//! semantics (version CAS, archive predicate, all-or-nothing batch) are part
//! of the contract, not the caller's job.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use super::concurrency::ConcurrencyMode;
use super::types::{
    Listing, ListingChanges, ListingId, ListingPage, ListingQuery, NewListing, OwnerScope,
};

/// Storage-level errors
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// Unique constraint on mls_number hit; caller may regenerate and retry
    #[error("duplicate MLS number")]
    DuplicateMlsNumber,

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return StoreError::DuplicateMlsNumber;
            }
        }
        StoreError::Database(e.to_string())
    }
}

/// Result of a transactional batch delete
///
/// The verify steps report every offending id, not just the first one.
#[derive(Debug, Clone)]
pub enum BatchDeleteOutcome {
    /// All rows deleted; carries the pre-delete records
    Deleted(Vec<Listing>),
    /// Some ids do not exist (or are not owned); nothing was deleted
    Missing(Vec<ListingId>),
    /// Some rows are still live; nothing was deleted
    NotArchived(Vec<ListingId>),
}

/// Listing persistence operations
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Insert a new row with version 1
    async fn insert(&self, row: NewListing) -> Result<Listing, StoreError>;

    /// Fetch a live row (archived rows read as absent)
    async fn fetch(&self, id: ListingId) -> Result<Option<Listing>, StoreError>;

    /// Fetch a row in any archival state, scoped to the owner
    async fn fetch_owned(
        &self,
        id: ListingId,
        scope: &OwnerScope,
    ) -> Result<Option<Listing>, StoreError>;

    /// Conditional update of a live row
    ///
    /// Applies `changes`, bumps version by exactly 1 and stamps the actor in
    /// one atomic write. With `ConcurrencyMode::Check` the write only matches
    /// when the stored version equals the expected one. Returns the updated
    /// row, or None when no row matched.
    async fn update_if(
        &self,
        id: ListingId,
        mode: ConcurrencyMode,
        changes: ListingChanges,
        actor: i64,
    ) -> Result<Option<Listing>, StoreError>;

    /// Version of the live row, for conflict classification after a missed CAS
    async fn current_version(&self, id: ListingId) -> Result<Option<i64>, StoreError>;

    /// Archive a live, owned row: set deleted_at, force status Cancelled
    ///
    /// The `deleted_at IS NULL` predicate makes a second call match nothing.
    async fn archive_if_live(
        &self,
        id: ListingId,
        scope: &OwnerScope,
        now: DateTime<Utc>,
    ) -> Result<Option<Listing>, StoreError>;

    /// Hard-delete an archived, owned row; returns the pre-delete record
    async fn delete_archived(
        &self,
        id: ListingId,
        scope: &OwnerScope,
    ) -> Result<Option<Listing>, StoreError>;

    /// Delete a set of archived, owned rows in one transaction
    ///
    /// Verifies existence and archival state first; any failure aborts the
    /// whole batch, so partial deletion is never observable.
    async fn batch_delete(
        &self,
        ids: &[ListingId],
        scope: &OwnerScope,
    ) -> Result<BatchDeleteOutcome, StoreError>;

    /// Filtered, paginated query over live rows
    async fn list(&self, query: &ListingQuery) -> Result<ListingPage, StoreError>;
}
