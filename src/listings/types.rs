//! Listing Core Types
//!
//! Data model for the listing lifecycle: records, input DTOs, the typed
//! update whitelist, and ownership scoping.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::status::ListingStatus;

/// Listing ID type - UUID v4 unique identifier
///
/// Assigned once at creation, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "1f0c6a0e-0f1a-4f5b-9d2e-7a4bb6f7a001")]
pub struct ListingId(uuid::Uuid);

impl ListingId {
    /// Generate a new unique ListingId
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Get the inner UUID value
    pub fn inner(&self) -> uuid::Uuid {
        self.0
    }
}

impl Default for ListingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ListingId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(uuid::Uuid::parse_str(s)?))
    }
}

impl From<uuid::Uuid> for ListingId {
    fn from(id: uuid::Uuid) -> Self {
        Self(id)
    }
}

/// A stored listing record
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub property_address: String,
    #[schema(value_type = String, example = "450000.00")]
    pub list_price: Decimal,
    pub property_type: Option<String>,
    pub description: Option<String>,
    pub status: ListingStatus,
    /// MLS number, assigned once at creation and never reassigned
    #[schema(example = "MLS20260123")]
    pub mls_number: String,
    pub days_on_market: Option<i32>,
    pub listing_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub listing_commission: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub buyer_commission: Option<Decimal>,
    /// Optimistic-concurrency version, starts at 1
    pub version: i64,
    /// Archive timestamp; set exactly once, implies status Cancelled
    pub deleted_at: Option<DateTime<Utc>>,
    pub listing_agent_id: Option<i64>,
    pub team_id: Option<i64>,
    pub last_modified_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Check whether the listing has been archived (soft-deleted)
    #[inline]
    pub fn is_archived(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Create listing input
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateListing {
    #[validate(length(min = 1, message = "property address is required"))]
    pub property_address: String,
    #[validate(custom(function = "validate_non_negative"))]
    #[schema(value_type = String, example = "450000.00")]
    pub list_price: Decimal,
    pub property_type: Option<String>,
    pub description: Option<String>,
    /// Initial status, defaults to Coming Soon
    pub status: Option<ListingStatus>,
    #[schema(value_type = Option<String>)]
    pub listing_commission: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub buyer_commission: Option<Decimal>,
    pub listing_agent_id: Option<i64>,
    pub team_id: Option<i64>,
}

fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(ValidationError::new("negative_price"));
    }
    Ok(())
}

/// Typed whitelist of updatable listing fields
///
/// `id`, `version` and `mls_number` have no slot here, so a patch can never
/// touch them. Unknown input keys are rejected at the deserialization layer.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingPatch {
    pub property_address: Option<String>,
    #[schema(value_type = Option<String>)]
    pub list_price: Option<Decimal>,
    pub property_type: Option<String>,
    pub description: Option<String>,
    pub status: Option<ListingStatus>,
    #[schema(value_type = Option<String>)]
    pub listing_commission: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub buyer_commission: Option<Decimal>,
}

impl ListingPatch {
    /// A patch with no fields set updates nothing and is rejected upstream
    pub fn is_empty(&self) -> bool {
        self.property_address.is_none()
            && self.list_price.is_none()
            && self.property_type.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.listing_commission.is_none()
            && self.buyer_commission.is_none()
    }
}

/// Fully-resolved row for insertion (MLS number and initial status decided)
#[derive(Debug, Clone)]
pub struct NewListing {
    pub id: ListingId,
    pub property_address: String,
    pub list_price: Decimal,
    pub property_type: Option<String>,
    pub description: Option<String>,
    pub status: ListingStatus,
    pub mls_number: String,
    pub days_on_market: Option<i32>,
    pub listing_date: Option<NaiveDate>,
    pub listing_commission: Option<Decimal>,
    pub buyer_commission: Option<Decimal>,
    pub listing_agent_id: Option<i64>,
    pub team_id: Option<i64>,
    pub last_modified_by: Option<i64>,
}

/// Column-level write set for a conditional update
///
/// Built by the service from a validated patch plus transition effects.
/// A `None` field keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ListingChanges {
    pub property_address: Option<String>,
    pub list_price: Option<Decimal>,
    pub property_type: Option<String>,
    pub description: Option<String>,
    pub status: Option<ListingStatus>,
    pub listing_commission: Option<Decimal>,
    pub buyer_commission: Option<Decimal>,
    pub days_on_market: Option<i32>,
    pub listing_date: Option<NaiveDate>,
}

/// Ownership predicate for archive and delete paths
///
/// A listing is owned when `listing_agent_id` matches the user or `team_id`
/// matches the caller's team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerScope {
    pub user_id: i64,
    pub team_id: Option<i64>,
}

impl OwnerScope {
    pub fn new(user_id: i64, team_id: Option<i64>) -> Self {
        Self { user_id, team_id }
    }

    /// Evaluate the predicate against a listing's owner columns
    pub fn owns(&self, agent_id: Option<i64>, team_id: Option<i64>) -> bool {
        if agent_id == Some(self.user_id) {
            return true;
        }
        matches!((self.team_id, team_id), (Some(mine), Some(theirs)) if mine == theirs)
    }
}

/// Summary of a hard-deleted listing
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedListing {
    pub id: ListingId,
    pub property_address: String,
}

/// Allowed sort columns for listing queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    ListPrice,
    ListingDate,
    DaysOnMarket,
}

impl SortField {
    /// Column name for ORDER BY (fixed allow-list, never caller-supplied)
    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::ListPrice => "list_price",
            SortField::ListingDate => "listing_date",
            SortField::DaysOnMarket => "days_on_market",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl SortDir {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// Filtered, paginated listing query (live rows only)
#[derive(Debug, Clone)]
pub struct ListingQuery {
    pub status: Option<ListingStatus>,
    pub property_type: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_days_on_market: Option<i32>,
    pub max_days_on_market: Option<i32>,
    pub sort_by: SortField,
    pub sort_dir: SortDir,
    pub page: u32,
    pub limit: u32,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            status: None,
            property_type: None,
            min_price: None,
            max_price: None,
            min_days_on_market: None,
            max_days_on_market: None,
            sort_by: SortField::default(),
            sort_dir: SortDir::default(),
            page: 1,
            limit: 20,
        }
    }
}

impl ListingQuery {
    /// Clamp page/limit into sane bounds
    pub fn normalized(mut self) -> Self {
        if self.page == 0 {
            self.page = 1;
        }
        self.limit = self.limit.clamp(1, 100);
        self
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1) * self.limit
    }
}

/// One page of listing results
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    pub items: Vec<Listing>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}
