//! API request types
//!
//! Thin deserialization DTOs; business validation lives in the listings
//! service.

use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::listings::{
    ConcurrencyMode, ListingError, ListingPatch, ListingQuery, ListingStatus, SortDir, SortField,
};

/// Update request: the field patch plus the caller's concurrency intent
///
/// `version` is the expected stored version for the conditional write.
/// `force: true` skips the check explicitly. Omitting both is rejected;
/// there is no silent unconditional path.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingRequest {
    /// Expected version for optimistic concurrency
    pub version: Option<i64>,
    /// Explicitly skip the version check
    #[serde(default)]
    pub force: bool,
    #[serde(flatten)]
    pub patch: ListingPatch,
}

impl UpdateListingRequest {
    /// Resolve the caller's concurrency intent
    pub fn mode(&self) -> Result<ConcurrencyMode, ListingError> {
        match (self.force, self.version) {
            (true, _) => Ok(ConcurrencyMode::Force),
            (false, Some(v)) => Ok(ConcurrencyMode::Check(v)),
            (false, None) => Err(ListingError::Validation(
                "version is required unless force is set".to_string(),
            )),
        }
    }
}

/// Status-only update request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateStatusRequest {
    pub status: ListingStatus,
}

/// Batch permanent-delete request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BatchDeleteRequest {
    pub ids: Vec<crate::listings::ListingId>,
}

/// Query parameters for the listing list endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListingQueryParams {
    /// Filter by status
    pub status: Option<ListingStatus>,
    /// Filter by property type (exact match)
    pub property_type: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_days_on_market: Option<i32>,
    pub max_days_on_market: Option<i32>,
    /// Sort column: created_at, list_price, listing_date, days_on_market
    pub sort_by: Option<SortField>,
    /// Sort direction: asc or desc
    pub sort_dir: Option<SortDir>,
    /// Page number, 1-based
    pub page: Option<u32>,
    /// Page size, capped at 100
    pub limit: Option<u32>,
}

impl ListingQueryParams {
    pub fn into_query(self) -> ListingQuery {
        let defaults = ListingQuery::default();
        ListingQuery {
            status: self.status,
            property_type: self.property_type,
            min_price: self.min_price,
            max_price: self.max_price,
            min_days_on_market: self.min_days_on_market,
            max_days_on_market: self.max_days_on_market,
            sort_by: self.sort_by.unwrap_or(defaults.sort_by),
            sort_dir: self.sort_dir.unwrap_or(defaults.sort_dir),
            page: self.page.unwrap_or(defaults.page),
            limit: self.limit.unwrap_or(defaults.limit),
        }
    }
}
