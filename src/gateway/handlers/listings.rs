//! Listing lifecycle handlers
//!
//! Thin adapters over the listings service. Caller identity arrives
//! pre-authenticated in `X-User-ID`/`X-Team-ID` headers; the auth layer
//! itself is an external collaborator.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};

use super::super::state::AppState;
use super::super::types::{
    ApiError, ApiResult, BatchDeleteRequest, ListingQueryParams, UpdateListingRequest,
    UpdateStatusRequest, created, ok,
};
use crate::listings::{
    CreateListing, DeletedListing, Listing, ListingId, ListingPage, OwnerScope,
};

/// Extract the acting user id from HTTP headers
fn extract_actor(headers: &HeaderMap) -> Result<i64, ApiError> {
    let raw = headers
        .get("X-User-ID")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing X-User-ID header"))?;

    raw.parse::<i64>()
        .map_err(|_| ApiError::bad_request("Invalid X-User-ID format"))
}

/// Extract the caller's ownership scope (user id plus optional team id)
fn extract_scope(headers: &HeaderMap) -> Result<OwnerScope, ApiError> {
    let user_id = extract_actor(headers)?;
    let team_id = match headers.get("X-Team-ID").map(|v| v.to_str()) {
        Some(Ok(raw)) => Some(
            raw.parse::<i64>()
                .map_err(|_| ApiError::bad_request("Invalid X-Team-ID format"))?,
        ),
        Some(Err(_)) => return Err(ApiError::bad_request("Invalid X-Team-ID format")),
        None => None,
    };
    Ok(OwnerScope::new(user_id, team_id))
}

/// Create a listing
#[utoipa::path(
    post,
    path = "/api/v1/listings",
    request_body = CreateListing,
    responses(
        (status = 201, description = "Listing created", body = Listing),
        (status = 422, description = "Validation failed"),
        (status = 401, description = "Missing caller identity")
    ),
    tag = "Listings"
)]
pub async fn create_listing(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateListing>,
) -> ApiResult<Listing> {
    let actor = extract_actor(&headers)?;
    let listing = state.service.create(req, actor).await?;
    created(listing)
}

/// List listings with filters, sorting and pagination
#[utoipa::path(
    get,
    path = "/api/v1/listings",
    params(ListingQueryParams),
    responses(
        (status = 200, description = "One page of live listings", body = ListingPage)
    ),
    tag = "Listings"
)]
pub async fn list_listings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListingQueryParams>,
) -> ApiResult<ListingPage> {
    let page = state.service.list(params.into_query()).await?;
    ok(page)
}

/// Fetch a single live listing
#[utoipa::path(
    get,
    path = "/api/v1/listings/{id}",
    params(("id" = String, Path, description = "Listing id (UUID)")),
    responses(
        (status = 200, description = "Listing", body = Listing),
        (status = 404, description = "Listing not found or archived")
    ),
    tag = "Listings"
)]
pub async fn get_listing(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ListingId>,
) -> ApiResult<Listing> {
    let listing = state.service.get(id).await?;
    ok(listing)
}

/// Update a listing (conditional write)
#[utoipa::path(
    put,
    path = "/api/v1/listings/{id}",
    params(("id" = String, Path, description = "Listing id (UUID)")),
    request_body = UpdateListingRequest,
    responses(
        (status = 200, description = "Updated listing", body = Listing),
        (status = 400, description = "Illegal status transition"),
        (status = 404, description = "Listing not found or archived"),
        (status = 409, description = "Version conflict"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Listings"
)]
pub async fn update_listing(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ListingId>,
    headers: HeaderMap,
    Json(req): Json<UpdateListingRequest>,
) -> ApiResult<Listing> {
    let actor = extract_actor(&headers)?;
    let mode = req.mode()?;
    let listing = state.service.update(id, req.patch, mode, actor).await?;
    ok(listing)
}

/// Transition a listing to a new status
#[utoipa::path(
    patch,
    path = "/api/v1/listings/{id}/status",
    params(("id" = String, Path, description = "Listing id (UUID)")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated listing", body = Listing),
        (status = 400, description = "Illegal status transition"),
        (status = 404, description = "Listing not found or archived"),
        (status = 409, description = "Version conflict")
    ),
    tag = "Listings"
)]
pub async fn update_listing_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ListingId>,
    headers: HeaderMap,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Listing> {
    let actor = extract_actor(&headers)?;
    let listing = state.service.update_status(id, req.status, actor).await?;
    ok(listing)
}

/// Archive (soft-delete) a listing
#[utoipa::path(
    delete,
    path = "/api/v1/listings/{id}",
    params(("id" = String, Path, description = "Listing id (UUID)")),
    responses(
        (status = 200, description = "Archived listing", body = Listing),
        (status = 404, description = "Listing not found, not owned, or already archived")
    ),
    tag = "Listings"
)]
pub async fn archive_listing(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ListingId>,
    headers: HeaderMap,
) -> ApiResult<Listing> {
    let scope = extract_scope(&headers)?;
    let listing = state.service.archive(id, &scope).await?;
    ok(listing)
}

/// Permanently delete an archived listing
#[utoipa::path(
    delete,
    path = "/api/v1/listings/{id}/permanent",
    params(("id" = String, Path, description = "Listing id (UUID)")),
    responses(
        (status = 200, description = "Deleted listing summary", body = DeletedListing),
        (status = 400, description = "Listing is not archived"),
        (status = 404, description = "Listing not found or not owned")
    ),
    tag = "Listings"
)]
pub async fn delete_listing(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ListingId>,
    headers: HeaderMap,
) -> ApiResult<DeletedListing> {
    let scope = extract_scope(&headers)?;
    let deleted = state.service.delete(id, &scope).await?;
    ok(deleted)
}

/// Permanently delete a set of archived listings (all-or-nothing)
#[utoipa::path(
    post,
    path = "/api/v1/listings/batch-delete",
    request_body = BatchDeleteRequest,
    responses(
        (status = 200, description = "Deleted listing summaries", body = [DeletedListing]),
        (status = 400, description = "Some listings are not archived"),
        (status = 404, description = "Some listings were not found"),
        (status = 422, description = "Empty id list")
    ),
    tag = "Listings"
)]
pub async fn batch_delete_listings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<BatchDeleteRequest>,
) -> ApiResult<Vec<DeletedListing>> {
    let scope = extract_scope(&headers)?;
    let deleted = state.service.batch_delete(&req.ids, &scope).await?;
    ok(deleted)
}
