//! OpenAPI / Swagger UI Documentation
//!
//! Auto-generated OpenAPI 3.0 documentation for the listing API.
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::request::{
    BatchDeleteRequest, UpdateListingRequest, UpdateStatusRequest,
};
use crate::gateway::types::response::{ErrorDetail, ErrorResponse};
use crate::listings::{
    CreateListing, DeletedListing, Listing, ListingPage, ListingPatch, ListingStatus,
};

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Listing Core API",
        version = "1.0.0",
        description = "Listing lifecycle service: guarded status transitions, optimistic concurrency, archive-before-delete."
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::listings::create_listing,
        crate::gateway::handlers::listings::list_listings,
        crate::gateway::handlers::listings::get_listing,
        crate::gateway::handlers::listings::update_listing,
        crate::gateway::handlers::listings::update_listing_status,
        crate::gateway::handlers::listings::archive_listing,
        crate::gateway::handlers::listings::delete_listing,
        crate::gateway::handlers::listings::batch_delete_listings,
    ),
    components(
        schemas(
            HealthResponse,
            Listing,
            ListingPage,
            ListingStatus,
            ListingPatch,
            CreateListing,
            DeletedListing,
            UpdateListingRequest,
            UpdateStatusRequest,
            BatchDeleteRequest,
            ErrorResponse,
            ErrorDetail,
        )
    ),
    tags(
        (name = "Listings", description = "Listing lifecycle operations"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "Listing Core API");
        assert_eq!(spec.info.version, "1.0.0");
    }

    #[test]
    fn test_openapi_json_serializable() {
        let spec = ApiDoc::openapi();
        let json = spec.to_json();
        assert!(json.is_ok());
        assert!(json.unwrap().contains("Listing Core API"));
    }

    #[test]
    fn test_listing_endpoints_registered() {
        let spec = ApiDoc::openapi();
        let paths = spec.paths;
        assert!(paths.paths.contains_key("/api/v1/health"));
        assert!(paths.paths.contains_key("/api/v1/listings"));
        assert!(paths.paths.contains_key("/api/v1/listings/{id}"));
        assert!(paths.paths.contains_key("/api/v1/listings/{id}/status"));
        assert!(paths.paths.contains_key("/api/v1/listings/{id}/permanent"));
        assert!(paths.paths.contains_key("/api/v1/listings/batch-delete"));
    }
}
