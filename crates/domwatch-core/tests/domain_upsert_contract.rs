//! Contract Test: Domain Upsert
//!
//! Constraints verified:
//! - A new FQDN is appended at the end; size grows by exactly one
//! - A known FQDN is replaced in its slot; size is unchanged
//! - Replacement is a full overwrite, not a field merge
//! - `update_domain` and `add_domain` produce identical collections

mod common;

use common::*;
use domwatch_core::{Domain, DomainStore, UpsertOutcome};

#[tokio::test]
async fn new_fqdn_is_appended_last() {
    for start in starting_collections() {
        let (_ws, store) = seeded_store(&start).await;
        let before = fqdns(&store).await;

        let outcome = store
            .add_domain(monitored("New", "new.example"))
            .await
            .expect("add succeeds");
        assert_eq!(outcome, UpsertOutcome::Created);

        let after = fqdns(&store).await;
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[..before.len()], &before[..]);
        assert_eq!(after.last().map(String::as_str), Some("new.example"));
    }
}

#[tokio::test]
async fn known_fqdn_is_replaced_in_place() {
    let start = vec![
        monitored("A", "a.example"),
        monitored("B", "b.example"),
        monitored("C", "c.example"),
    ];
    let (_ws, store) = seeded_store(&start).await;

    let replacement = Domain::new("B renamed", "b.example");
    let outcome = store
        .add_domain(replacement.clone())
        .await
        .expect("add succeeds");
    assert_eq!(outcome, UpsertOutcome::Updated);

    let domains = store.domains().await;
    assert_eq!(domains.len(), 3);
    assert_eq!(domains[0], start[0]);
    assert_eq!(domains[1], replacement);
    assert_eq!(domains[2], start[2]);
}

#[tokio::test]
async fn add_example_from_empty() {
    let (_ws, store) = seeded_store(&[]).await;

    store
        .add_domain(monitored("Example", "example.com"))
        .await
        .expect("first add");
    assert_eq!(store.len().await, 1);

    store
        .add_domain(Domain::new("Example2", "example.com"))
        .await
        .expect("second add");

    let domains = store.domains().await;
    assert_eq!(domains.len(), 1);
    assert_eq!(domains[0].name, "Example2");
    assert!(!domains[0].alerts);
    assert!(!domains[0].enabled);
}

#[tokio::test]
async fn update_is_equivalent_to_add() {
    let probes = vec![
        monitored("Fresh", "fresh.example"),
        Domain::new("Existing", "example.com"),
        Domain::new("Middle", "b.example").with_enabled(true),
    ];

    for start in starting_collections() {
        for probe in &probes {
            let (_ws_add, via_add) = seeded_store(&start).await;
            let (_ws_update, via_update) = seeded_store(&start).await;

            let added = via_add.add_domain(probe.clone()).await.expect("add");
            let updated = via_update
                .update_domain(probe.clone())
                .await
                .expect("update");

            assert_eq!(added, updated);
            assert_eq!(via_add.domains().await, via_update.domains().await);
        }
    }
}

#[tokio::test]
async fn update_of_missing_fqdn_inserts() {
    let (_ws, store) = seeded_store(&[]).await;

    let outcome = store
        .update_domain(monitored("Example", "example.com"))
        .await
        .expect("update succeeds");

    assert_eq!(outcome, UpsertOutcome::Created);
    assert_eq!(fqdns(&store).await, vec!["example.com".to_string()]);
}

#[tokio::test]
async fn mutations_reach_disk() {
    let (ws, store) = seeded_store(&[monitored("A", "a.example")]).await;
    store
        .add_domain(Domain::new("B", "b.example"))
        .await
        .expect("add");

    let reopened = DomainStore::load(&ws.config).await.expect("reopen");
    assert_eq!(reopened.domains().await, store.domains().await);
}
