//! Listing Change Notifications
//!
//! The core publishes an event after every successful write. Transport and
//! fan-out live outside this crate; the sink trait is the boundary.

use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;

use super::status::ListingStatus;
use super::types::{Listing, ListingId};

/// Event action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingAction {
    Created,
    Updated,
    Deleted,
}

/// Payload fields carried with every listing event
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEventData {
    pub id: ListingId,
    pub mls_number: String,
    pub property_address: String,
    pub list_price: Decimal,
    pub status: ListingStatus,
}

/// A listing change event
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEvent {
    pub entity_type: &'static str,
    pub entity_id: ListingId,
    pub action: ListingAction,
    pub data: ListingEventData,
}

impl ListingEvent {
    fn new(action: ListingAction, listing: &Listing) -> Self {
        Self {
            entity_type: "listing",
            entity_id: listing.id,
            action,
            data: ListingEventData {
                id: listing.id,
                mls_number: listing.mls_number.clone(),
                property_address: listing.property_address.clone(),
                list_price: listing.list_price,
                status: listing.status,
            },
        }
    }

    pub fn created(listing: &Listing) -> Self {
        Self::new(ListingAction::Created, listing)
    }

    pub fn updated(listing: &Listing) -> Self {
        Self::new(ListingAction::Updated, listing)
    }

    pub fn deleted(listing: &Listing) -> Self {
        Self::new(ListingAction::Deleted, listing)
    }
}

/// Notification boundary
///
/// Sinks must not fail the write path: delivery problems are theirs to log.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(&self, event: ListingEvent);
}

/// Default sink: structured log line per event
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn publish(&self, event: ListingEvent) {
        tracing::info!(
            entity_id = %event.entity_id,
            action = ?event.action,
            mls_number = %event.data.mls_number,
            "listing event"
        );
    }
}

/// Test sink that records published events in order
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ListingEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain recorded events
    pub fn take(&self) -> Vec<ListingEvent> {
        std::mem::take(&mut self.events.lock().unwrap())
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn publish(&self, event: ListingEvent) {
        self.events.lock().unwrap().push(event);
    }
}
