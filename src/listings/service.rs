//! Listing Lifecycle Service
//!
//! Orchestrates validation, the status state machine, optimistic concurrency
//! and the archive-before-delete workflow on top of a [`ListingStore`].
//! Events go out only after the storage write succeeds.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use rand::Rng;
use validator::Validate;

use super::concurrency::{classify_missed_write, ConcurrencyMode};
use super::error::ListingError;
use super::events::{ListingEvent, NotificationSink};
use super::status::{transition_effects, ListingStatus};
use super::store::{BatchDeleteOutcome, ListingStore, StoreError};
use super::types::{
    CreateListing, DeletedListing, Listing, ListingChanges, ListingId, ListingPage, ListingPatch,
    ListingQuery, NewListing, OwnerScope,
};

/// Attempts before giving up on a colliding MLS number
const MLS_GENERATION_ATTEMPTS: u32 = 5;

/// Generate a candidate MLS number: MLS + year + 4 random digits
///
/// Uniqueness is enforced by the storage layer; collisions are retried.
fn generate_mls_number() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
    format!("MLS{}{:04}", Utc::now().year(), suffix)
}

/// First human-readable message out of a validator error set
fn validation_message(errors: &validator::ValidationErrors) -> String {
    for (field, field_errors) in errors.field_errors() {
        if let Some(err) = field_errors.first() {
            if let Some(msg) = &err.message {
                return msg.to_string();
            }
            return format!("invalid value for {}", field);
        }
    }
    "invalid request".to_string()
}

/// Listing lifecycle operations
pub struct ListingService {
    store: Arc<dyn ListingStore>,
    sink: Arc<dyn NotificationSink>,
}

impl ListingService {
    pub fn new(store: Arc<dyn ListingStore>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { store, sink }
    }

    /// Create a new listing
    ///
    /// Status defaults to Coming Soon. An Active initial status starts the
    /// on-market clock immediately. The MLS number is regenerated on a
    /// uniqueness collision, up to a bounded number of attempts.
    pub async fn create(&self, req: CreateListing, actor: i64) -> Result<Listing, ListingError> {
        req.validate()
            .map_err(|e| ListingError::Validation(validation_message(&e)))?;

        let status = req.status.unwrap_or(ListingStatus::ComingSoon);
        let effects = transition_effects(status);
        let days_on_market = effects.reset_days_on_market.then_some(0);
        let listing_date = effects
            .set_listing_date_today
            .then(|| Utc::now().date_naive());

        for attempt in 1..=MLS_GENERATION_ATTEMPTS {
            let row = NewListing {
                id: ListingId::new(),
                property_address: req.property_address.clone(),
                list_price: req.list_price,
                property_type: req.property_type.clone(),
                description: req.description.clone(),
                status,
                mls_number: generate_mls_number(),
                days_on_market,
                listing_date,
                listing_commission: req.listing_commission,
                buyer_commission: req.buyer_commission,
                listing_agent_id: req.listing_agent_id,
                team_id: req.team_id,
                last_modified_by: Some(actor),
            };

            match self.store.insert(row).await {
                Ok(listing) => {
                    tracing::info!(
                        listing_id = %listing.id,
                        mls_number = %listing.mls_number,
                        status = %listing.status,
                        "listing created"
                    );
                    self.sink.publish(ListingEvent::created(&listing)).await;
                    return Ok(listing);
                }
                Err(StoreError::DuplicateMlsNumber) => {
                    tracing::warn!(attempt, "MLS number collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ListingError::Storage(
            "could not generate a unique MLS number".to_string(),
        ))
    }

    /// Fetch a live listing
    pub async fn get(&self, id: ListingId) -> Result<Listing, ListingError> {
        self.store.fetch(id).await?.ok_or(ListingError::NotFound)
    }

    /// Filtered, paginated query over live listings
    pub async fn list(&self, query: ListingQuery) -> Result<ListingPage, ListingError> {
        Ok(self.store.list(&query.normalized()).await?)
    }

    /// Conditionally update a live listing
    ///
    /// A status change must be legal per the state machine and is checked
    /// before any write. Entering Active resets the on-market clock. On a
    /// missed conditional write the failure is classified by re-reading the
    /// live version: still live means a version conflict, gone means not
    /// found.
    pub async fn update(
        &self,
        id: ListingId,
        patch: ListingPatch,
        mode: ConcurrencyMode,
        actor: i64,
    ) -> Result<Listing, ListingError> {
        if patch.is_empty() {
            return Err(ListingError::Validation("no fields to update".to_string()));
        }
        if let Some(price) = patch.list_price {
            if price.is_sign_negative() {
                return Err(ListingError::Validation(
                    "list price must not be negative".to_string(),
                ));
            }
        }

        let current = self.store.fetch(id).await?.ok_or(ListingError::NotFound)?;

        let mut changes = ListingChanges {
            property_address: patch.property_address.clone(),
            list_price: patch.list_price,
            property_type: patch.property_type.clone(),
            description: patch.description.clone(),
            status: None,
            listing_commission: patch.listing_commission,
            buyer_commission: patch.buyer_commission,
            days_on_market: None,
            listing_date: None,
        };

        // A patch restating the current status is not a transition.
        if let Some(next) = patch.status {
            if next != current.status {
                if !current.status.is_allowed(next) {
                    return Err(ListingError::InvalidTransition {
                        from: current.status,
                        to: next,
                        allowed: current.status.allowed_from(),
                    });
                }
                let effects = transition_effects(next);
                if effects.reset_days_on_market {
                    changes.days_on_market = Some(0);
                }
                if effects.set_listing_date_today {
                    changes.listing_date = Some(Utc::now().date_naive());
                }
                changes.status = Some(next);
            }
        }

        if let Some(new_price) = patch.list_price {
            if new_price != current.list_price {
                tracing::info!(
                    listing_id = %id,
                    old_price = %current.list_price,
                    new_price = %new_price,
                    "listing price changed"
                );
            }
        }

        match self.store.update_if(id, mode, changes, actor).await? {
            Some(updated) => {
                self.sink.publish(ListingEvent::updated(&updated)).await;
                Ok(updated)
            }
            None => {
                let live_version = self.store.current_version(id).await?;
                Err(classify_missed_write(mode, live_version))
            }
        }
    }

    /// Transition a listing to a new status
    ///
    /// Reads the current version and applies the change conditionally, so a
    /// concurrent writer surfaces as a version conflict instead of silently
    /// losing the race.
    pub async fn update_status(
        &self,
        id: ListingId,
        next: ListingStatus,
        actor: i64,
    ) -> Result<Listing, ListingError> {
        let current = self.store.fetch(id).await?.ok_or(ListingError::NotFound)?;
        let patch = ListingPatch {
            status: Some(next),
            ..Default::default()
        };
        self.update(id, patch, ConcurrencyMode::Check(current.version), actor)
            .await
    }

    /// Archive (soft-delete) a live, owned listing
    ///
    /// Sets the archive timestamp and forces status Cancelled. Archiving an
    /// already archived or missing listing reads as not found.
    pub async fn archive(&self, id: ListingId, scope: &OwnerScope) -> Result<Listing, ListingError> {
        let archived = self
            .store
            .archive_if_live(id, scope, Utc::now())
            .await?
            .ok_or(ListingError::NotFound)?;

        tracing::info!(listing_id = %id, "listing archived");
        self.sink.publish(ListingEvent::updated(&archived)).await;
        Ok(archived)
    }

    /// Permanently delete an archived, owned listing
    ///
    /// A live listing must be archived first; deleting it directly is
    /// rejected.
    pub async fn delete(
        &self,
        id: ListingId,
        scope: &OwnerScope,
    ) -> Result<DeletedListing, ListingError> {
        let existing = self
            .store
            .fetch_owned(id, scope)
            .await?
            .ok_or(ListingError::NotFound)?;
        if !existing.is_archived() {
            return Err(ListingError::NotArchived { ids: vec![id] });
        }

        let deleted = self
            .store
            .delete_archived(id, scope)
            .await?
            .ok_or(ListingError::NotFound)?;

        tracing::info!(listing_id = %id, "listing permanently deleted");
        self.sink.publish(ListingEvent::deleted(&deleted)).await;
        Ok(DeletedListing {
            id: deleted.id,
            property_address: deleted.property_address,
        })
    }

    /// Permanently delete a set of archived, owned listings
    ///
    /// All-or-nothing: any missing or still-live id aborts the whole batch
    /// with every offending id reported.
    pub async fn batch_delete(
        &self,
        ids: &[ListingId],
        scope: &OwnerScope,
    ) -> Result<Vec<DeletedListing>, ListingError> {
        if ids.is_empty() {
            return Err(ListingError::Validation(
                "no listing ids provided".to_string(),
            ));
        }

        match self.store.batch_delete(ids, scope).await? {
            BatchDeleteOutcome::Deleted(rows) => {
                tracing::info!(count = rows.len(), "listings permanently deleted");
                for row in &rows {
                    self.sink.publish(ListingEvent::deleted(row)).await;
                }
                Ok(rows
                    .into_iter()
                    .map(|l| DeletedListing {
                        id: l.id,
                        property_address: l.property_address,
                    })
                    .collect())
            }
            BatchDeleteOutcome::Missing(missing) => {
                Err(ListingError::BatchNotFound { missing })
            }
            BatchDeleteOutcome::NotArchived(ids) => Err(ListingError::NotArchived { ids }),
        }
    }
}
