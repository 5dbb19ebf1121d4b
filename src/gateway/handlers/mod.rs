//! Gateway request handlers

pub mod health;
pub mod listings;

pub use health::{HealthResponse, health_check};
pub use listings::{
    archive_listing, batch_delete_listings, create_listing, delete_listing, get_listing,
    list_listings, update_listing, update_listing_status,
};
