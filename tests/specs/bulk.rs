//! Bulk-phase engine specs

use crate::prelude::*;
use sd_core::{BulkAction, EngineError, FakeCollaborators, Phase, PhaseKind, PhaseState, Target};

fn batch(targets: &[u64]) -> (BulkAction<FakeCollaborators>, FakeCollaborators) {
    let collaborators = FakeCollaborators::new();
    let phase = Phase::new("spec-batch", PhaseKind::BatchQueue).with_repository("merritt");
    let targets = targets.iter().map(|&id| Target::Id(id)).collect();
    let action = BulkAction::new(phase, targets, &registry(), collaborators.clone()).unwrap();
    (action, collaborators)
}

#[tokio::test]
async fn batch_submit_names_all_targets_and_rests_unretrieved() {
    let (mut action, _) = batch(&[7, 9, 12]);

    assert!(action.submit().await.unwrap());

    assert_eq!(action.describe_targets(), "ids 7, 9, 12");
    assert_eq!(action.state(), PhaseState::Unretrieved);
}

#[test]
fn empty_batch_fails_before_any_transition() {
    let phase = Phase::new("spec-batch", PhaseKind::BatchQueue).with_repository("merritt");
    let err = BulkAction::new(phase, Vec::new(), &registry(), FakeCollaborators::new())
        .unwrap_err();

    assert!(matches!(err, EngineError::EmptyTargets));
}

#[tokio::test]
async fn batch_failure_reports_collectively() {
    let recorder = Recorder::arc();
    let (mut action, fake) = batch(&[7, 9]);
    action = action.with_callback(recorder.clone());
    fake.set_enqueue_fails(true);

    assert!(!action.submit().await.unwrap());

    assert_eq!(action.state(), PhaseState::Aborted);
    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].0);
}
