// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::collaborators::{CollabCall, FakeCollaborators};
use crate::phase::{Condition, PhaseKind};
use crate::table::TableRegistry;

fn registry() -> TableRegistry {
    TableRegistry::standard().unwrap()
}

fn batch_phase(kind: PhaseKind) -> Phase {
    Phase::new("bulk-1", kind).with_repository("merritt")
}

fn ids(values: &[u64]) -> Vec<Target> {
    values.iter().map(|&v| Target::Id(v)).collect()
}

fn make_bulk(
    kind: PhaseKind,
    targets: Vec<Target>,
) -> (BulkAction<FakeCollaborators>, FakeCollaborators) {
    let collaborators = FakeCollaborators::new();
    let action = BulkAction::new(batch_phase(kind), targets, &registry(), collaborators.clone())
        .unwrap();
    (action, collaborators)
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn empty_target_list_is_a_construction_error() {
    let err = BulkAction::new(
        batch_phase(PhaseKind::BatchQueue),
        Vec::new(),
        &registry(),
        FakeCollaborators::new(),
    )
    .unwrap_err();

    assert!(matches!(err, EngineError::EmptyTargets));
}

#[test]
fn non_bulk_kind_is_rejected() {
    let err = BulkAction::new(
        Phase::new("ph-1", PhaseKind::Queue),
        ids(&[7]),
        &registry(),
        FakeCollaborators::new(),
    )
    .unwrap_err();

    assert!(matches!(err, EngineError::NotBulk(PhaseKind::Queue)));
}

// =============================================================================
// describe_targets
// =============================================================================

#[test]
fn uniform_targets_drop_the_count() {
    assert_eq!(describe_targets(&ids(&[7, 9, 12])), "ids 7, 9, 12");
}

#[test]
fn single_target_is_singular() {
    assert_eq!(describe_targets(&ids(&[7])), "id 7");
}

#[test]
fn mixed_targets_render_counted_groups() {
    let targets = vec![
        Target::Id(7),
        Target::Id(9),
        Target::Doi("10.5061/dryad.x".to_string()),
    ];
    assert_eq!(
        describe_targets(&targets),
        "2 ids: 7, 9; 1 doi: 10.5061/dryad.x"
    );
}

#[test]
fn opaque_targets_classify_as_items() {
    let targets = vec![Target::Opaque("ark:/13030/m5z".to_string())];
    assert_eq!(describe_targets(&targets), "item ark:/13030/m5z");
}

// =============================================================================
// Verbs
// =============================================================================

#[tokio::test]
async fn batch_submit_rests_unretrieved() {
    let (mut action, fake) = make_bulk(PhaseKind::BatchQueue, ids(&[7, 9, 12]));

    let ok = action.submit().await.unwrap();

    assert!(ok);
    assert_eq!(action.state(), PhaseState::Unretrieved);
    assert_eq!(action.describe_targets(), "ids 7, 9, 12");
    assert_eq!(
        fake.calls(),
        vec![CollabCall::Enqueue {
            repository: "merritt".to_string(),
            submission_ids: vec!["7".to_string(), "9".to_string(), "12".to_string()],
        }]
    );
}

#[tokio::test]
async fn batch_submit_failure_aborts_collectively() {
    let (mut action, fake) = make_bulk(PhaseKind::BatchQueue, ids(&[7, 9]));
    fake.set_enqueue_fails(true);

    let ok = action.submit().await.unwrap();

    assert!(!ok);
    assert_eq!(action.state(), PhaseState::Aborted);
    assert_eq!(action.phase().condition, Some(Condition::Failed));
    let note = action.phase().note.as_deref().unwrap();
    assert!(note.contains("quota exceeded"), "note: {note}");
}

#[tokio::test]
async fn batch_store_promotes_every_target_in_order() {
    let (mut action, fake) = make_bulk(PhaseKind::BatchStore, ids(&[7, 9, 12]));

    assert!(action.store().await.unwrap());
    assert_eq!(action.state(), PhaseState::Completed);

    let promoted: Vec<_> = fake
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            CollabCall::Promote { submission_id } => Some(submission_id),
            _ => None,
        })
        .collect();
    assert_eq!(promoted, vec!["7", "9", "12"]);
}

#[tokio::test]
async fn batch_index_writes_every_record() {
    let (mut action, fake) = make_bulk(PhaseKind::BatchIndex, ids(&[7, 9]));
    let records = vec![
        IndexRecord::new("7", serde_json::json!({})),
        IndexRecord::new("9", serde_json::json!({})),
    ];

    assert!(action.index(records).await.unwrap());
    assert_eq!(action.state(), PhaseState::Indexed);
    assert_eq!(fake.call_count(), 2);
}

#[tokio::test]
async fn batch_unsubmit_completes() {
    let (mut action, fake) = make_bulk(PhaseKind::BatchUnqueue, ids(&[7]));

    assert!(action.unsubmit().await.unwrap());
    assert_eq!(action.state(), PhaseState::Completed);
    assert_eq!(
        fake.calls(),
        vec![CollabCall::Dequeue {
            repository: "merritt".to_string(),
            submission_ids: vec!["7".to_string()],
        }]
    );
}

#[tokio::test]
async fn batch_retrieve_after_submit() {
    let (mut action, _) = make_bulk(PhaseKind::BatchQueue, ids(&[7, 9]));

    assert!(action.submit().await.unwrap());
    assert!(action.retrieve().await.unwrap());
    assert_eq!(action.state(), PhaseState::Retrieved);
    assert_eq!(action.phase().condition, Some(Condition::Succeeded));
}

#[tokio::test]
async fn batch_cancel() {
    let (mut action, _) = make_bulk(PhaseKind::BatchQueue, ids(&[7]));

    assert!(action.cancel().await.unwrap());
    assert_eq!(action.state(), PhaseState::Canceled);
}

#[tokio::test]
async fn missing_repository_is_recovered() {
    let phase = Phase::new("bulk-2", PhaseKind::BatchQueue);
    let mut action =
        BulkAction::new(phase, ids(&[7]), &registry(), FakeCollaborators::new()).unwrap();

    let ok = action.submit().await.unwrap();

    assert!(!ok);
    assert_eq!(action.state(), PhaseState::Aborted);
    assert_eq!(
        action.phase().note.as_deref(),
        Some("missing precondition: repository")
    );
}

#[test]
fn targets_are_read_only() {
    let (action, _) = make_bulk(PhaseKind::BatchQueue, ids(&[7, 9, 12]));
    assert_eq!(action.targets().len(), 3);
    assert_eq!(action.targets()[0], Target::Id(7));
}

#[tokio::test]
async fn bulk_status_names_targets() {
    let (mut action, fake) = make_bulk(PhaseKind::BatchQueue, ids(&[7, 9]));
    fake.set_enqueue_fails(true);

    action.submit().await.unwrap();
    // note verbatim once failed
    assert!(action.status().contains("quota exceeded"));
}
