//! Gateway types module
//!
//! Request and response DTOs for the HTTP boundary:
//!
//! - [`request`]: deserialization DTOs (update body, query params)
//! - [`response`]: `ApiResponse` envelope, `ApiError`, `ApiResult`

pub mod request;
pub mod response;

pub use request::{
    BatchDeleteRequest, ListingQueryParams, UpdateListingRequest, UpdateStatusRequest,
};
pub use response::{ApiError, ApiResponse, ApiResult, ErrorResponse, created, ok};
