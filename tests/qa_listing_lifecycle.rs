use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use listing_core::listings::{ListingAction, RecordingSink};
use listing_core::{
    ConcurrencyMode, CreateListing, ListingError, ListingId, ListingPatch, ListingQuery,
    ListingService, ListingStatus, MemoryListingStore, OwnerScope,
};

/// Helper to build a service backed by the in-memory store
fn build_service() -> (ListingService, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let service = ListingService::new(Arc::new(MemoryListingStore::new()), sink.clone());
    (service, sink)
}

/// Helper to create a listing request owned by agent 7
fn listing_req(address: &str, price: i64) -> CreateListing {
    CreateListing {
        property_address: address.to_string(),
        list_price: Decimal::new(price, 0),
        property_type: Some("Single Family".to_string()),
        description: None,
        status: None,
        listing_commission: Some(Decimal::new(25, 1)),
        buyer_commission: Some(Decimal::new(25, 1)),
        listing_agent_id: Some(7),
        team_id: Some(3),
    }
}

#[tokio::test]
async fn qa_tc_lifecycle_with_optimistic_concurrency() {
    let (service, _sink) = build_service();

    // Setup: a fresh listing starts at Coming Soon, version 1, clock not running
    let listing = service
        .create(listing_req("42 Harbor View Dr", 899_000), 7)
        .await
        .unwrap();
    assert_eq!(listing.status, ListingStatus::ComingSoon);
    assert_eq!(listing.version, 1);
    assert_eq!(listing.days_on_market, None);

    // Action: jump straight to Sold. The state machine rejects it and names
    // the legal targets, without touching the row.
    let err = service
        .update_status(listing.id, ListingStatus::Sold, 7)
        .await
        .unwrap_err();
    match err {
        ListingError::InvalidTransition { from, to, allowed } => {
            assert_eq!(from, ListingStatus::ComingSoon);
            assert_eq!(to, ListingStatus::Sold);
            assert_eq!(allowed, &[ListingStatus::Active, ListingStatus::Cancelled]);
        }
        other => panic!("expected InvalidTransition, got {:?}", other),
    }
    assert_eq!(service.get(listing.id).await.unwrap().version, 1);

    // Action: go Active with the correct expected version
    let patch = ListingPatch {
        status: Some(ListingStatus::Active),
        ..Default::default()
    };
    let active = service
        .update(listing.id, patch, ConcurrencyMode::Check(1), 7)
        .await
        .unwrap();
    assert_eq!(active.version, 2, "successful write bumps the version");
    assert_eq!(active.days_on_market, Some(0), "activation starts the clock");
    assert_eq!(active.listing_date, Some(Utc::now().date_naive()));

    // Action: a second writer still holding version 1 must lose, and the
    // conflict reports both sides of the race.
    let stale = ListingPatch {
        list_price: Some(Decimal::new(925_000, 0)),
        ..Default::default()
    };
    let err = service
        .update(listing.id, stale, ConcurrencyMode::Check(1), 8)
        .await
        .unwrap_err();
    match err {
        ListingError::VersionConflict { current, attempted } => {
            assert_eq!(current, 2);
            assert_eq!(attempted, 1);
        }
        other => panic!("expected VersionConflict, got {:?}", other),
    }

    // The losing write left no trace
    let unchanged = service.get(listing.id).await.unwrap();
    assert_eq!(unchanged.version, 2);
    assert_eq!(unchanged.list_price, Decimal::new(899_000, 0));
}

#[tokio::test]
async fn qa_tc_archive_gates_permanent_delete() {
    let (service, sink) = build_service();
    let scope = OwnerScope::new(7, Some(3));

    let listing = service
        .create(listing_req("9 Pine Ridge Ct", 515_000), 7)
        .await
        .unwrap();
    sink.take();

    // Deleting a live listing is refused outright
    let err = service.delete(listing.id, &scope).await.unwrap_err();
    assert!(matches!(err, ListingError::NotArchived { .. }));

    // Archive: forces Cancelled, stamps the archive time, hides the row
    let archived = service.archive(listing.id, &scope).await.unwrap();
    assert_eq!(archived.status, ListingStatus::Cancelled);
    assert!(archived.deleted_at.is_some());
    assert!(matches!(
        service.get(listing.id).await,
        Err(ListingError::NotFound)
    ));

    // Archiving does not count as an edit for concurrency purposes
    assert_eq!(archived.version, listing.version);

    // Now the permanent delete goes through and returns the summary
    let deleted = service.delete(listing.id, &scope).await.unwrap();
    assert_eq!(deleted.id, listing.id);
    assert_eq!(deleted.property_address, "9 Pine Ridge Ct");

    let events = sink.take();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].action, ListingAction::Updated);
    assert_eq!(events[1].action, ListingAction::Deleted);
}

#[tokio::test]
async fn qa_tc_ownership_scope_covers_agent_and_team() {
    let (service, _sink) = build_service();

    let listing = service
        .create(listing_req("501 Elm St", 330_000), 7)
        .await
        .unwrap();

    // A stranger (wrong agent, wrong team) reads as not found
    let stranger = OwnerScope::new(99, Some(42));
    assert!(matches!(
        service.archive(listing.id, &stranger).await,
        Err(ListingError::NotFound)
    ));

    // A teammate who is not the listing agent still owns it via team_id
    let teammate = OwnerScope::new(11, Some(3));
    let archived = service.archive(listing.id, &teammate).await.unwrap();
    assert!(archived.is_archived());
}

#[tokio::test]
async fn qa_tc_batch_delete_is_all_or_nothing() {
    let (service, sink) = build_service();
    let scope = OwnerScope::new(7, Some(3));

    let a = service.create(listing_req("1 Oak Ave", 400_000), 7).await.unwrap();
    let b = service.create(listing_req("2 Oak Ave", 410_000), 7).await.unwrap();
    let c = service.create(listing_req("3 Oak Ave", 420_000), 7).await.unwrap();

    service.archive(a.id, &scope).await.unwrap();
    service.archive(b.id, &scope).await.unwrap();
    sink.take();

    // c is still live: the whole batch aborts and names the offender
    let err = service
        .batch_delete(&[a.id, b.id, c.id], &scope)
        .await
        .unwrap_err();
    match err {
        ListingError::NotArchived { ids } => assert_eq!(ids, vec![c.id]),
        other => panic!("expected NotArchived, got {:?}", other),
    }
    assert!(sink.is_empty(), "aborted batch must emit no events");

    // An unknown id aborts the same way, before the archive check
    let ghost = ListingId::new();
    let err = service
        .batch_delete(&[a.id, ghost], &scope)
        .await
        .unwrap_err();
    match err {
        ListingError::BatchNotFound { missing } => assert_eq!(missing, vec![ghost]),
        other => panic!("expected BatchNotFound, got {:?}", other),
    }

    // With every member archived the batch lands as a unit
    service.archive(c.id, &scope).await.unwrap();
    sink.take();

    let deleted = service
        .batch_delete(&[a.id, b.id, c.id], &scope)
        .await
        .unwrap();
    assert_eq!(deleted.len(), 3);

    let events = sink.take();
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e.action == ListingAction::Deleted));

    // Gone for good
    let page = service.list(ListingQuery::default()).await.unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn qa_tc_relist_after_cancellation_restarts_clock() {
    let (service, _sink) = build_service();

    let mut req = listing_req("77 Sunset Blvd", 1_250_000);
    req.status = Some(ListingStatus::Active);
    let listing = service.create(req, 7).await.unwrap();
    assert_eq!(listing.days_on_market, Some(0));

    let cancelled = service
        .update_status(listing.id, ListingStatus::Cancelled, 7)
        .await
        .unwrap();
    assert_eq!(cancelled.status, ListingStatus::Cancelled);

    // Cancelled listings can come back on market, with a fresh clock
    let relisted = service
        .update_status(listing.id, ListingStatus::Active, 7)
        .await
        .unwrap();
    assert_eq!(relisted.status, ListingStatus::Active);
    assert_eq!(relisted.days_on_market, Some(0));
    assert_eq!(relisted.listing_date, Some(Utc::now().date_naive()));
    assert_eq!(relisted.version, 3);
}

#[tokio::test]
async fn qa_tc_sold_is_terminal() {
    let (service, _sink) = build_service();

    let mut req = listing_req("12 Birch Ln", 600_000);
    req.status = Some(ListingStatus::Active);
    let listing = service.create(req, 7).await.unwrap();

    service
        .update_status(listing.id, ListingStatus::Sold, 7)
        .await
        .unwrap();

    for next in [
        ListingStatus::Active,
        ListingStatus::Pending,
        ListingStatus::Cancelled,
        ListingStatus::Withdrawn,
    ] {
        let err = service
            .update_status(listing.id, next, 7)
            .await
            .unwrap_err();
        assert!(
            matches!(err, ListingError::InvalidTransition { .. }),
            "Sold must not transition to {:?}",
            next
        );
    }
}
