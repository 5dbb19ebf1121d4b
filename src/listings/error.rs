//! Listing Error Types
//!
//! Every lifecycle failure is a typed, returned value; nothing retries
//! internally except MLS regeneration in the service.

use thiserror::Error;

use super::status::ListingStatus;
use super::store::StoreError;
use super::types::ListingId;

/// Listing lifecycle error types
///
/// Error codes are stable strings surfaced in API responses.
#[derive(Error, Debug, Clone)]
pub enum ListingError {
    // === Validation Errors ===
    #[error("{0}")]
    Validation(String),

    // === Resource Errors ===
    #[error("Listing not found")]
    NotFound,

    #[error("One or more listings not found")]
    BatchNotFound { missing: Vec<ListingId> },

    // === Lifecycle Errors ===
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: ListingStatus,
        to: ListingStatus,
        allowed: &'static [ListingStatus],
    },

    #[error("Version conflict: listing was modified by another user (current version {current}, attempted {attempted})")]
    VersionConflict { current: i64, attempted: i64 },

    #[error("Listings must be archived before deletion")]
    NotArchived { ids: Vec<ListingId> },

    // === System Errors ===
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ListingError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            ListingError::Validation(_) => "VALIDATION_ERROR",
            ListingError::NotFound => "NOT_FOUND",
            ListingError::BatchNotFound { .. } => "NOT_FOUND",
            ListingError::InvalidTransition { .. } => "INVALID_TRANSITION",
            ListingError::VersionConflict { .. } => "VERSION_CONFLICT",
            ListingError::NotArchived { .. } => "NOT_ARCHIVED",
            ListingError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            ListingError::Validation(_) => 422,
            ListingError::NotFound | ListingError::BatchNotFound { .. } => 404,
            ListingError::InvalidTransition { .. } | ListingError::NotArchived { .. } => 400,
            ListingError::VersionConflict { .. } => 409,
            ListingError::Storage(_) => 500,
        }
    }
}

impl From<StoreError> for ListingError {
    fn from(e: StoreError) -> Self {
        ListingError::Storage(e.to_string())
    }
}

impl From<sqlx::Error> for ListingError {
    fn from(e: sqlx::Error) -> Self {
        ListingError::Storage(e.to_string())
    }
}
