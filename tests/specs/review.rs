//! Review and scheduling specs

use crate::prelude::*;
use sd_core::{EngineError, Phase, PhaseKind, PhaseState};

fn review_phase() -> Phase {
    Phase::new("spec-review", PhaseKind::Review).with_submission("sub-1")
}

#[tokio::test]
async fn approve_requires_an_open_review() {
    let (mut action, _) = engine(review_phase());

    let err = action.approve().await.unwrap_err();

    assert!(matches!(err, EngineError::IllegalTransition { .. }));
    assert_eq!(action.state(), PhaseState::Started);
}

#[tokio::test]
async fn review_then_reject() {
    let (mut action, _) = engine(review_phase());

    assert!(action.review().await.unwrap());
    assert!(action.reject().await.unwrap());

    assert_eq!(action.state(), PhaseState::Rejected);
    assert_eq!(action.status(), "rejected by reviewer");
}

#[tokio::test]
async fn schedule_and_assign_complete_the_scheduling_phase() {
    let phase = Phase::new("spec-schedule", PhaseKind::Schedule).with_submission("sub-1");
    let (mut action, _) = engine(phase);

    assert!(action.schedule().await.unwrap());
    assert_eq!(action.status(), "review scheduled");

    assert!(action.assign("curator-7").await.unwrap());
    assert_eq!(action.state(), PhaseState::Completed);
}
