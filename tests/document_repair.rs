mod common;

use link_repair::domain::entities::{ContentNode, LinkStatus};
use link_repair::error::{DocumentError, RetryError};
use tokio_util::sync::CancellationToken;

// ─── VALIDATE + REPAIR ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_repair_round_trip_through_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("handbook.json");
    let state = common::offline_state();
    let cancel = CancellationToken::new();

    let original = common::document(vec![
        common::hyperlink(
            "ops",
            "https://docs.example.com/TSRC-OPS-000001",
            "Ops Handbook",
        ),
        common::hyperlink(
            "leave",
            "https://docs.example.com/view?docid=CMS-HR-000042",
            "Leave Policy (012345)",
        ),
        common::hyperlink("plain", "https://www.example.com/", "Home page"),
    ]);
    state.store.save(&path, &original, &cancel).await.unwrap();

    let mut document = state.store.load(&path, &cancel).await.unwrap();
    let results = state
        .batch
        .run(document.hyperlinks(), &cancel, None)
        .await;

    let repaired = state
        .repair
        .apply_repairs(&mut document, &results, false)
        .unwrap();
    assert_eq!(repaired, 1);

    state.store.save(&path, &document, &cancel).await.unwrap();
    let reloaded = state.store.load(&path, &cancel).await.unwrap();

    let ops = &reloaded.hyperlinks[0];
    assert_eq!(ops.display_text(), "Operations Handbook (100001)");
    assert_eq!(ops.tooltip.as_deref(), Some("Open Ops Handbook"));
    assert_eq!(ops.first_run_properties(), Some(&common::hyperlink_style()));

    assert_eq!(reloaded.hyperlinks[1], original.hyperlinks[1]);
    assert_eq!(reloaded.hyperlinks[2], original.hyperlinks[2]);
}

#[tokio::test]
async fn test_tracked_repair_keeps_old_text_as_deletion() {
    let state = common::offline_state();
    let cancel = CancellationToken::new();
    let mut document = common::document(vec![common::hyperlink(
        "ops",
        "https://docs.example.com/TSRC-OPS-000001",
        "Operations Handbook",
    )]);

    let results = state
        .batch
        .run(document.hyperlinks(), &cancel, None)
        .await;
    assert_eq!(results[0].status, LinkStatus::Valid);
    assert!(results[0].requires_update);

    assert!(
        state
            .repair
            .apply_repair(&mut document, &results[0], true)
            .unwrap()
    );

    let link = &document.hyperlinks[0];
    assert_eq!(link.display_text(), "Operations Handbook (100001)");
    assert!(link.history);

    let content = link.content.as_ref().unwrap();
    assert_eq!(content.len(), 2);
    let (deleted, inserted) = match (&content[0], &content[1]) {
        (
            ContentNode::Deleted { revision: d, .. },
            ContentNode::Inserted { revision: i, .. },
        ) => (d, i),
        other => panic!("unexpected tracked structure: {:?}", other),
    };
    assert_eq!(deleted.author, "Integration Test");
    assert_eq!(inserted.author, "Integration Test");
    assert_eq!(deleted.date, inserted.date);
    assert_ne!(deleted.id, inserted.id);
}

#[tokio::test]
async fn test_expired_record_is_reported() {
    let state = common::offline_state();
    let document = common::document(vec![common::hyperlink(
        "legacy",
        "https://docs.example.com/TSRC-LEG-000777",
        "Legacy Procurement Guide (100777)",
    )]);

    let results = state
        .batch
        .run(document.hyperlinks(), &CancellationToken::new(), None)
        .await;

    assert_eq!(results[0].status, LinkStatus::Expired);
    assert!(results[0].is_expired);
    assert!(!results[0].requires_update);
}

// ─── STORE ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_load_rejects_malformed_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, r#"{"hyperlinks": [{"target": 5}]}"#).unwrap();

    let err = common::offline_state()
        .store
        .load(&path, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RetryError::Operation(DocumentError::Malformed(_))
    ));
}

#[tokio::test]
async fn test_load_cancelled() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");
    std::fs::write(&path, "{}").unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = common::offline_state()
        .store
        .load(&path, &cancel)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
}
