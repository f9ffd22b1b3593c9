mod common;

use chrono::{NaiveDate, Utc};
use common::{draft, push_token, user, Harness, PUBLIC_BASE_URL};
use futures::StreamExt;
use object_store::ObjectStore;

use campus_lost_found::{
    domain::{
        errors::{LifecycleError, ValidationError},
        models::{ItemStatus, Posting, PostingKind},
        value_objects::ItemId,
    },
    ItemRepository, LifecycleService,
};

async fn only_active(harness: &Harness, kind: PostingKind) -> Vec<Posting> {
    harness.repository.active_postings(kind).await.unwrap()
}

#[tokio::test]
async fn test_create_posting_appears_once_in_feed() {
    let harness = Harness::new();
    let alice = user("alice");

    let id = harness
        .service
        .create(PostingKind::Found, draft("Blue Umbrella", "Library"), alice.clone())
        .await
        .unwrap();

    let feed = only_active(&harness, PostingKind::Found).await;
    assert_eq!(feed.len(), 1);

    let posting = &feed[0];
    assert_eq!(posting.id(), &id);
    assert_eq!(posting.kind(), PostingKind::Found);
    assert_eq!(posting.item_name(), "Blue Umbrella");
    assert_eq!(posting.location(), "Library");
    assert_eq!(posting.poster(), &alice);
    assert_eq!(posting.status(), ItemStatus::Active);
    assert_eq!(
        posting.occurred_date(),
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    );
    assert!(posting.image().url.starts_with(PUBLIC_BASE_URL));
    assert!(posting
        .image()
        .deletion_handle
        .as_str()
        .starts_with("found_images/"));
    assert!(harness.object_exists(&posting.image().deletion_handle).await);

    // The lost feed is a separate collection
    assert!(only_active(&harness, PostingKind::Lost).await.is_empty());
}

#[tokio::test]
async fn test_create_trims_form_fields() {
    let harness = Harness::new();

    let mut form = draft("  Water bottle ", " Gym ");
    form.occurred_time_label = " morning ".to_string();

    harness
        .service
        .create(PostingKind::Lost, form, user("alice"))
        .await
        .unwrap();

    let feed = only_active(&harness, PostingKind::Lost).await;
    assert_eq!(feed[0].item_name(), "Water bottle");
    assert_eq!(feed[0].location(), "Gym");
    assert_eq!(feed[0].occurred_time_label(), "morning");
}

#[tokio::test]
async fn test_newer_postings_come_first() {
    let harness = Harness::new();
    let poster = user("alice");

    for name in ["Keys", "Wallet", "Scarf"] {
        harness
            .service
            .create(PostingKind::Lost, draft(name, "Cafeteria"), poster.clone())
            .await
            .unwrap();
    }

    let names: Vec<String> = only_active(&harness, PostingKind::Lost)
        .await
        .iter()
        .map(|p| p.item_name().to_string())
        .collect();
    assert_eq!(names, vec!["Scarf", "Wallet", "Keys"]);
}

#[tokio::test]
async fn test_create_with_empty_description_touches_nothing() {
    let harness = Harness::new();
    harness.register("bob").await;

    let mut form = draft("Blue Umbrella", "Library");
    form.description = "   ".to_string();

    let err = harness
        .service
        .create(PostingKind::Found, form, user("alice"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        LifecycleError::Validation(ValidationError::EmptyField {
            field: "description"
        })
    );
    assert!(only_active(&harness, PostingKind::Found).await.is_empty());
    assert!(harness.transport.messages().await.is_empty());

    let stored: Vec<_> = harness.objects.list(None).collect().await;
    assert!(stored.is_empty(), "no upload should have been attempted");
}

#[tokio::test]
async fn test_create_without_date_is_rejected() {
    let harness = Harness::new();

    let mut form = draft("Blue Umbrella", "Library");
    form.occurred_date = None;

    let err = harness
        .service
        .create(PostingKind::Found, form, user("alice"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        LifecycleError::Validation(ValidationError::MissingOccurredDate)
    );
}

#[tokio::test]
async fn test_blue_umbrella_claim_scenario() {
    let harness = Harness::new();
    let alice = user("alice");
    let bob = user("bob");
    harness.register("alice").await;
    harness.register("bob").await;

    let id = harness
        .service
        .create(PostingKind::Found, draft("Blue Umbrella", "Library"), alice.clone())
        .await
        .unwrap();

    let snapshot = only_active(&harness, PostingKind::Found).await.remove(0);
    harness.transport.clear().await;

    let log_id = harness
        .service
        .claim(&id, bob.clone(), snapshot)
        .await
        .unwrap();

    // Log carries both parties
    let logs = harness.repository.list_logs().await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].id, log_id);
    assert_eq!(logs[0].poster.email, "alice@campus.edu");
    assert_eq!(logs[0].claimer.email, "bob@campus.edu");

    // Posting left the feed
    assert!(only_active(&harness, PostingKind::Found).await.is_empty());

    // Only alice hears about it, with bob's contact details
    let messages = harness.transport.messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].to, push_token("alice"));
    assert!(messages[0].body.contains("bob@campus.edu"));
    assert!(messages[0].body.contains(bob.phone.as_deref().unwrap()));
    assert_eq!(messages[0].data["event"], "posting_claimed");
    assert_eq!(messages[0].data["itemId"], id.as_str());
}

#[tokio::test]
async fn test_claim_keeps_image_for_the_log() {
    let harness = Harness::new();

    let id = harness
        .service
        .create(PostingKind::Lost, draft("Laptop", "Lab 3"), user("alice"))
        .await
        .unwrap();
    let snapshot = only_active(&harness, PostingKind::Lost).await.remove(0);
    let handle = snapshot.image().deletion_handle.clone();

    harness
        .service
        .claim(&id, user("bob"), snapshot)
        .await
        .unwrap();

    assert!(harness.object_exists(&handle).await);
}

#[tokio::test]
async fn test_log_fields_match_snapshot_at_claim_time() {
    let harness = Harness::new();
    let alice = user("alice");

    let id = harness
        .service
        .create(PostingKind::Lost, draft("Calculator", "Room 101"), alice.clone())
        .await
        .unwrap();
    let snapshot = only_active(&harness, PostingKind::Lost).await.remove(0);

    // Unrelated activity before and after the claim
    harness
        .service
        .create(PostingKind::Lost, draft("Headphones", "Quad"), user("carol"))
        .await
        .unwrap();

    let before = Utc::now();
    harness
        .service
        .claim(&id, user("bob"), snapshot.clone())
        .await
        .unwrap();

    harness
        .service
        .create(PostingKind::Lost, draft("Notebook", "Room 101"), alice)
        .await
        .unwrap();

    let log = harness.repository.list_logs().await.unwrap().remove(0);
    assert_eq!(log.kind, PostingKind::Lost);
    assert_eq!(&log.item_id, snapshot.id());
    assert_eq!(log.item_name, snapshot.item_name());
    assert_eq!(log.description, snapshot.description());
    assert_eq!(log.location, snapshot.location());
    assert_eq!(log.image_url, snapshot.image().url);
    assert_eq!(&log.poster, snapshot.poster());
    assert_eq!(log.occurred_date, snapshot.occurred_date());
    assert_eq!(log.occurred_time_label, snapshot.occurred_time_label());
    assert!(log.resolved_at >= before);
}

#[tokio::test]
async fn test_self_claim_is_rejected_without_side_effects() {
    let harness = Harness::new();
    let alice = user("alice");
    harness.register("alice").await;

    let id = harness
        .service
        .create(PostingKind::Found, draft("Blue Umbrella", "Library"), alice.clone())
        .await
        .unwrap();
    let snapshot = only_active(&harness, PostingKind::Found).await.remove(0);
    harness.transport.clear().await;

    let err = harness
        .service
        .claim(&id, alice.clone(), snapshot)
        .await
        .unwrap_err();

    assert!(matches!(err, LifecycleError::SelfClaim { .. }));
    assert!(harness.repository.list_logs().await.unwrap().is_empty());
    assert_eq!(only_active(&harness, PostingKind::Found).await.len(), 1);
    assert!(harness.transport.messages().await.is_empty());
}

#[tokio::test]
async fn test_second_claim_on_same_snapshot_fails_cleanly() {
    let harness = Harness::new();

    let id = harness
        .service
        .create(PostingKind::Found, draft("Blue Umbrella", "Library"), user("alice"))
        .await
        .unwrap();
    let snapshot = only_active(&harness, PostingKind::Found).await.remove(0);

    harness
        .service
        .claim(&id, user("bob"), snapshot.clone())
        .await
        .unwrap();

    let err = harness
        .service
        .claim(&id, user("carol"), snapshot)
        .await
        .unwrap_err();

    assert_eq!(err, LifecycleError::AlreadyResolved { item_id: id });
    assert_eq!(harness.repository.list_logs().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_claim_with_mismatched_id_is_rejected() {
    let harness = Harness::new();

    harness
        .service
        .create(PostingKind::Found, draft("Blue Umbrella", "Library"), user("alice"))
        .await
        .unwrap();
    let snapshot = only_active(&harness, PostingKind::Found).await.remove(0);

    let other = ItemId::new("some-other-posting".to_string()).unwrap();
    let err = harness
        .service
        .claim(&other, user("bob"), snapshot)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LifecycleError::Validation(ValidationError::InvalidField { .. })
    ));
    assert!(harness.repository.list_logs().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_claiming_a_resolved_snapshot_is_rejected() {
    let harness = Harness::new();

    let id = harness
        .service
        .create(PostingKind::Lost, draft("Keys", "Parking lot"), user("alice"))
        .await
        .unwrap();
    let mut snapshot = only_active(&harness, PostingKind::Lost).await.remove(0);
    snapshot.transition(ItemStatus::Resolved).unwrap();

    let err = harness
        .service
        .claim(&id, user("bob"), snapshot)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LifecycleError::Validation(ValidationError::InvalidStatusTransition { .. })
    ));
    assert_eq!(only_active(&harness, PostingKind::Lost).await.len(), 1);
}

#[tokio::test]
async fn test_create_then_remove_leaves_no_trace() {
    let harness = Harness::new();
    let alice = user("alice");

    let id = harness
        .service
        .create(PostingKind::Lost, draft("Keys", "Parking lot"), alice)
        .await
        .unwrap();
    let handle = only_active(&harness, PostingKind::Lost).await[0]
        .image()
        .deletion_handle
        .clone();

    harness
        .service
        .remove(PostingKind::Lost, &id, &handle)
        .await
        .unwrap();

    assert!(only_active(&harness, PostingKind::Lost).await.is_empty());
    assert!(harness.repository.list_logs().await.unwrap().is_empty());
    assert!(!harness.object_exists(&handle).await);
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let harness = Harness::new();

    let id = harness
        .service
        .create(PostingKind::Found, draft("Scarf", "Bus stop"), user("alice"))
        .await
        .unwrap();
    let handle = only_active(&harness, PostingKind::Found).await[0]
        .image()
        .deletion_handle
        .clone();

    for _ in 0..2 {
        harness
            .service
            .remove(PostingKind::Found, &id, &handle)
            .await
            .unwrap();
    }

    assert!(only_active(&harness, PostingKind::Found).await.is_empty());
}
