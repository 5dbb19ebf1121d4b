//! In-Memory Listing Store
//!
//! HashMap-backed implementation with the same conditional semantics as the
//! PostgreSQL store. Used by unit and integration tests; the whole batch
//! delete runs under one lock so partial deletion is never observable.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::concurrency::ConcurrencyMode;
use super::status::ListingStatus;
use super::store::{BatchDeleteOutcome, ListingStore, StoreError};
use super::types::{
    Listing, ListingChanges, ListingId, ListingPage, ListingQuery, NewListing, OwnerScope,
    SortDir, SortField,
};

/// In-memory listing store
#[derive(Default)]
pub struct MemoryListingStore {
    rows: Mutex<HashMap<ListingId, Listing>>,
}

impl MemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows, archived included
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn apply_changes(row: &mut Listing, changes: ListingChanges) {
    if let Some(v) = changes.property_address {
        row.property_address = v;
    }
    if let Some(v) = changes.list_price {
        row.list_price = v;
    }
    if let Some(v) = changes.property_type {
        row.property_type = Some(v);
    }
    if let Some(v) = changes.description {
        row.description = Some(v);
    }
    if let Some(v) = changes.status {
        row.status = v;
    }
    if let Some(v) = changes.listing_commission {
        row.listing_commission = Some(v);
    }
    if let Some(v) = changes.buyer_commission {
        row.buyer_commission = Some(v);
    }
    if let Some(v) = changes.days_on_market {
        row.days_on_market = Some(v);
    }
    if let Some(v) = changes.listing_date {
        row.listing_date = Some(v);
    }
}

fn matches_query(row: &Listing, query: &ListingQuery) -> bool {
    if row.is_archived() {
        return false;
    }
    if let Some(status) = query.status {
        if row.status != status {
            return false;
        }
    }
    if let Some(ref pt) = query.property_type {
        if row.property_type.as_deref() != Some(pt.as_str()) {
            return false;
        }
    }
    if let Some(min) = query.min_price {
        if row.list_price < min {
            return false;
        }
    }
    if let Some(max) = query.max_price {
        if row.list_price > max {
            return false;
        }
    }
    if let Some(min) = query.min_days_on_market {
        if row.days_on_market.is_none_or(|d| d < min) {
            return false;
        }
    }
    if let Some(max) = query.max_days_on_market {
        if row.days_on_market.is_none_or(|d| d > max) {
            return false;
        }
    }
    true
}

#[async_trait]
impl ListingStore for MemoryListingStore {
    async fn insert(&self, row: NewListing) -> Result<Listing, StoreError> {
        let mut rows = self.rows.lock().unwrap();

        if rows.values().any(|l| l.mls_number == row.mls_number) {
            return Err(StoreError::DuplicateMlsNumber);
        }

        let now = Utc::now();
        let listing = Listing {
            id: row.id,
            property_address: row.property_address,
            list_price: row.list_price,
            property_type: row.property_type,
            description: row.description,
            status: row.status,
            mls_number: row.mls_number,
            days_on_market: row.days_on_market,
            listing_date: row.listing_date,
            listing_commission: row.listing_commission,
            buyer_commission: row.buyer_commission,
            version: 1,
            deleted_at: None,
            listing_agent_id: row.listing_agent_id,
            team_id: row.team_id,
            last_modified_by: row.last_modified_by,
            created_at: now,
            updated_at: now,
        };
        rows.insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn fetch(&self, id: ListingId) -> Result<Option<Listing>, StoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.get(&id).filter(|l| !l.is_archived()).cloned())
    }

    async fn fetch_owned(
        &self,
        id: ListingId,
        scope: &OwnerScope,
    ) -> Result<Option<Listing>, StoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .get(&id)
            .filter(|l| scope.owns(l.listing_agent_id, l.team_id))
            .cloned())
    }

    async fn update_if(
        &self,
        id: ListingId,
        mode: ConcurrencyMode,
        changes: ListingChanges,
        actor: i64,
    ) -> Result<Option<Listing>, StoreError> {
        let mut rows = self.rows.lock().unwrap();

        let Some(row) = rows.get_mut(&id) else {
            return Ok(None);
        };
        if row.is_archived() {
            return Ok(None);
        }
        if let Some(expected) = mode.expected() {
            if row.version != expected {
                return Ok(None);
            }
        }

        apply_changes(row, changes);
        row.version += 1;
        row.last_modified_by = Some(actor);
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn current_version(&self, id: ListingId) -> Result<Option<i64>, StoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .get(&id)
            .filter(|l| !l.is_archived())
            .map(|l| l.version))
    }

    async fn archive_if_live(
        &self,
        id: ListingId,
        scope: &OwnerScope,
        now: DateTime<Utc>,
    ) -> Result<Option<Listing>, StoreError> {
        let mut rows = self.rows.lock().unwrap();

        let Some(row) = rows.get_mut(&id) else {
            return Ok(None);
        };
        if row.is_archived() || !scope.owns(row.listing_agent_id, row.team_id) {
            return Ok(None);
        }

        row.deleted_at = Some(now);
        row.status = ListingStatus::Cancelled;
        row.updated_at = now;
        Ok(Some(row.clone()))
    }

    async fn delete_archived(
        &self,
        id: ListingId,
        scope: &OwnerScope,
    ) -> Result<Option<Listing>, StoreError> {
        let mut rows = self.rows.lock().unwrap();

        let deletable = rows
            .get(&id)
            .map(|l| l.is_archived() && scope.owns(l.listing_agent_id, l.team_id))
            .unwrap_or(false);
        if !deletable {
            return Ok(None);
        }
        Ok(rows.remove(&id))
    }

    async fn batch_delete(
        &self,
        ids: &[ListingId],
        scope: &OwnerScope,
    ) -> Result<BatchDeleteOutcome, StoreError> {
        let mut rows = self.rows.lock().unwrap();

        let missing: Vec<ListingId> = ids
            .iter()
            .filter(|id| {
                rows.get(id)
                    .map(|l| !scope.owns(l.listing_agent_id, l.team_id))
                    .unwrap_or(true)
            })
            .copied()
            .collect();
        if !missing.is_empty() {
            return Ok(BatchDeleteOutcome::Missing(missing));
        }

        let not_archived: Vec<ListingId> = ids
            .iter()
            .filter(|id| rows.get(id).map(|l| !l.is_archived()).unwrap_or(false))
            .copied()
            .collect();
        if !not_archived.is_empty() {
            return Ok(BatchDeleteOutcome::NotArchived(not_archived));
        }

        let mut deleted = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(row) = rows.remove(id) {
                deleted.push(row);
            }
        }
        Ok(BatchDeleteOutcome::Deleted(deleted))
    }

    async fn list(&self, query: &ListingQuery) -> Result<ListingPage, StoreError> {
        let rows = self.rows.lock().unwrap();

        let mut matched: Vec<Listing> = rows
            .values()
            .filter(|l| matches_query(l, query))
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            let ord = match query.sort_by {
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::ListPrice => a.list_price.cmp(&b.list_price),
                SortField::ListingDate => a.listing_date.cmp(&b.listing_date),
                SortField::DaysOnMarket => a.days_on_market.cmp(&b.days_on_market),
            };
            match query.sort_dir {
                SortDir::Asc => ord,
                SortDir::Desc => ord.reverse(),
            }
        });

        let total = matched.len() as i64;
        let items: Vec<Listing> = matched
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();

        Ok(ListingPage {
            items,
            total,
            page: query.page,
            limit: query.limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn new_listing(address: &str, mls: &str, agent: i64) -> NewListing {
        NewListing {
            id: ListingId::new(),
            property_address: address.to_string(),
            list_price: Decimal::new(450_000, 0),
            property_type: None,
            description: None,
            status: ListingStatus::ComingSoon,
            mls_number: mls.to_string(),
            days_on_market: None,
            listing_date: None,
            listing_commission: None,
            buyer_commission: None,
            listing_agent_id: Some(agent),
            team_id: None,
            last_modified_by: Some(agent),
        }
    }

    #[tokio::test]
    async fn test_insert_starts_at_version_one() {
        let store = MemoryListingStore::new();
        let listing = store
            .insert(new_listing("1 Elm St", "MLS20260001", 7))
            .await
            .unwrap();
        assert_eq!(listing.version, 1);
        assert!(listing.deleted_at.is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_mls() {
        let store = MemoryListingStore::new();
        store
            .insert(new_listing("1 Elm St", "MLS20260001", 7))
            .await
            .unwrap();
        let err = store
            .insert(new_listing("2 Elm St", "MLS20260001", 7))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateMlsNumber));
    }

    #[tokio::test]
    async fn test_cas_update_bumps_version_once() {
        let store = MemoryListingStore::new();
        let listing = store
            .insert(new_listing("1 Elm St", "MLS20260001", 7))
            .await
            .unwrap();

        let changes = ListingChanges {
            list_price: Some(Decimal::new(475_000, 0)),
            ..Default::default()
        };
        let updated = store
            .update_if(listing.id, ConcurrencyMode::Check(1), changes, 7)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.list_price, Decimal::new(475_000, 0));
        assert_eq!(updated.last_modified_by, Some(7));
    }

    #[tokio::test]
    async fn test_cas_update_misses_on_stale_version() {
        let store = MemoryListingStore::new();
        let listing = store
            .insert(new_listing("1 Elm St", "MLS20260001", 7))
            .await
            .unwrap();

        store
            .update_if(
                listing.id,
                ConcurrencyMode::Check(1),
                ListingChanges::default(),
                7,
            )
            .await
            .unwrap()
            .unwrap();

        // Second writer still holds version 1
        let missed = store
            .update_if(
                listing.id,
                ConcurrencyMode::Check(1),
                ListingChanges::default(),
                8,
            )
            .await
            .unwrap();
        assert!(missed.is_none());
        assert_eq!(store.current_version(listing.id).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_force_update_ignores_version() {
        let store = MemoryListingStore::new();
        let listing = store
            .insert(new_listing("1 Elm St", "MLS20260001", 7))
            .await
            .unwrap();

        for _ in 0..3 {
            store
                .update_if(listing.id, ConcurrencyMode::Force, ListingChanges::default(), 7)
                .await
                .unwrap()
                .unwrap();
        }
        assert_eq!(store.current_version(listing.id).await.unwrap(), Some(4));
    }

    #[tokio::test]
    async fn test_archive_is_idempotent_via_predicate() {
        let store = MemoryListingStore::new();
        let listing = store
            .insert(new_listing("1 Elm St", "MLS20260001", 7))
            .await
            .unwrap();
        let scope = OwnerScope::new(7, None);

        let archived = store
            .archive_if_live(listing.id, &scope, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert!(archived.is_archived());
        assert_eq!(archived.status, ListingStatus::Cancelled);

        // Second archive matches nothing
        let second = store
            .archive_if_live(listing.id, &scope, Utc::now())
            .await
            .unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_archived_rows_invisible_to_live_paths() {
        let store = MemoryListingStore::new();
        let listing = store
            .insert(new_listing("1 Elm St", "MLS20260001", 7))
            .await
            .unwrap();
        let scope = OwnerScope::new(7, None);
        store
            .archive_if_live(listing.id, &scope, Utc::now())
            .await
            .unwrap();

        assert!(store.fetch(listing.id).await.unwrap().is_none());
        assert!(store.current_version(listing.id).await.unwrap().is_none());
        let missed = store
            .update_if(listing.id, ConcurrencyMode::Force, ListingChanges::default(), 7)
            .await
            .unwrap();
        assert!(missed.is_none());

        // Still visible to the owner-scoped read used by the delete path
        assert!(store.fetch_owned(listing.id, &scope).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_requires_archive() {
        let store = MemoryListingStore::new();
        let listing = store
            .insert(new_listing("1 Elm St", "MLS20260001", 7))
            .await
            .unwrap();
        let scope = OwnerScope::new(7, None);

        assert!(store
            .delete_archived(listing.id, &scope)
            .await
            .unwrap()
            .is_none());

        store
            .archive_if_live(listing.id, &scope, Utc::now())
            .await
            .unwrap();
        let deleted = store
            .delete_archived(listing.id, &scope)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(deleted.id, listing.id);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_delete_scoped_to_owner() {
        let store = MemoryListingStore::new();
        let listing = store
            .insert(new_listing("1 Elm St", "MLS20260001", 7))
            .await
            .unwrap();
        let owner = OwnerScope::new(7, None);
        let stranger = OwnerScope::new(99, None);

        store
            .archive_if_live(listing.id, &owner, Utc::now())
            .await
            .unwrap();
        assert!(store
            .delete_archived(listing.id, &stranger)
            .await
            .unwrap()
            .is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_batch_delete_all_or_nothing() {
        let store = MemoryListingStore::new();
        let scope = OwnerScope::new(7, None);
        let a = store
            .insert(new_listing("1 Elm St", "MLS20260001", 7))
            .await
            .unwrap();
        let b = store
            .insert(new_listing("2 Elm St", "MLS20260002", 7))
            .await
            .unwrap();

        store.archive_if_live(a.id, &scope, Utc::now()).await.unwrap();
        // b stays live

        let outcome = store.batch_delete(&[a.id, b.id], &scope).await.unwrap();
        match outcome {
            BatchDeleteOutcome::NotArchived(ids) => assert_eq!(ids, vec![b.id]),
            other => panic!("expected NotArchived, got {:?}", other),
        }
        // Nothing was deleted
        assert_eq!(store.len(), 2);

        store.archive_if_live(b.id, &scope, Utc::now()).await.unwrap();
        let outcome = store.batch_delete(&[a.id, b.id], &scope).await.unwrap();
        match outcome {
            BatchDeleteOutcome::Deleted(rows) => assert_eq!(rows.len(), 2),
            other => panic!("expected Deleted, got {:?}", other),
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_batch_delete_reports_missing_ids() {
        let store = MemoryListingStore::new();
        let scope = OwnerScope::new(7, None);
        let a = store
            .insert(new_listing("1 Elm St", "MLS20260001", 7))
            .await
            .unwrap();
        store.archive_if_live(a.id, &scope, Utc::now()).await.unwrap();

        let ghost = ListingId::new();
        let outcome = store.batch_delete(&[a.id, ghost], &scope).await.unwrap();
        match outcome {
            BatchDeleteOutcome::Missing(ids) => assert_eq!(ids, vec![ghost]),
            other => panic!("expected Missing, got {:?}", other),
        }
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_list_excludes_archived_and_paginates() {
        let store = MemoryListingStore::new();
        let scope = OwnerScope::new(7, None);

        for i in 0..5 {
            let mut row = new_listing(
                &format!("{} Elm St", i + 1),
                &format!("MLS2026000{}", i + 1),
                7,
            );
            row.list_price = Decimal::new(400_000 + i * 10_000, 0);
            store.insert(row).await.unwrap();
        }
        // Archive the cheapest one
        let cheapest = store
            .list(&ListingQuery {
                sort_by: SortField::ListPrice,
                sort_dir: SortDir::Asc,
                ..Default::default()
            })
            .await
            .unwrap()
            .items[0]
            .clone();
        store
            .archive_if_live(cheapest.id, &scope, Utc::now())
            .await
            .unwrap();

        let page = store
            .list(&ListingQuery {
                sort_by: SortField::ListPrice,
                sort_dir: SortDir::Asc,
                limit: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 4);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].list_price, Decimal::new(410_000, 0));

        let page2 = store
            .list(&ListingQuery {
                sort_by: SortField::ListPrice,
                sort_dir: SortDir::Asc,
                limit: 2,
                page: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page2.items.len(), 2);
        assert_eq!(page2.items[0].list_price, Decimal::new(430_000, 0));
    }

    #[tokio::test]
    async fn test_list_price_filters() {
        let store = MemoryListingStore::new();
        for i in 0..3 {
            let mut row = new_listing(
                &format!("{} Oak St", i + 1),
                &format!("MLS2026010{}", i + 1),
                7,
            );
            row.list_price = Decimal::new(400_000 + i * 100_000, 0);
            store.insert(row).await.unwrap();
        }

        let page = store
            .list(&ListingQuery {
                min_price: Some(Decimal::new(450_000, 0)),
                max_price: Some(Decimal::new(550_000, 0)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].list_price, Decimal::new(500_000, 0));
    }
}
