//! Listing Core - Listing Lifecycle Service
//!
//! A listing lifecycle service for real-estate transactions: guarded
//! status transitions, optimistic concurrency on updates, and an
//! archive-before-delete retention workflow.
//!
//! # Modules
//!
//! - [`listings`] - Domain core (status machine, service, stores, events)
//! - [`gateway`] - Axum HTTP gateway and Swagger UI
//! - [`db`] - PostgreSQL connection pool
//! - [`config`] - YAML configuration loading
//! - [`logging`] - tracing subscriber setup

pub mod config;
pub mod db;
pub mod gateway;
pub mod listings;
pub mod logging;

// Convenient re-exports at crate root
pub use listings::{
    ConcurrencyMode, CreateListing, DeletedListing, Listing, ListingError, ListingId,
    ListingPage, ListingPatch, ListingQuery, ListingService, ListingStatus, ListingStore,
    MemoryListingStore, OwnerScope, PgListingStore,
};
