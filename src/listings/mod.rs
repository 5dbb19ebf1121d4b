//! Listing Lifecycle Core
//!
//! CRUD with guarded status transitions, optimistic concurrency control and
//! an archive-before-delete workflow for real estate listings.
//!
//! Layering:
//! - `status`: the transition table and per-status side effects
//! - `types`: records, input DTOs and the typed update whitelist
//! - `store`: the persistence trait; `db` (PostgreSQL) and `memory` implement it
//! - `service`: orchestration, validation and event emission
//! - `events`: change notifications behind a sink trait

pub mod concurrency;
pub mod db;
pub mod error;
pub mod events;
pub mod memory;
pub mod service;
pub mod status;
pub mod store;
pub mod types;

pub use concurrency::ConcurrencyMode;
pub use db::PgListingStore;
pub use error::ListingError;
pub use events::{ListingAction, ListingEvent, LogSink, NotificationSink, RecordingSink};
pub use memory::MemoryListingStore;
pub use service::ListingService;
pub use status::{ListingStatus, TransitionEffects};
pub use store::{BatchDeleteOutcome, ListingStore, StoreError};
pub use types::{
    CreateListing, DeletedListing, Listing, ListingId, ListingPage, ListingPatch, ListingQuery,
    OwnerScope, SortDir, SortField,
};
