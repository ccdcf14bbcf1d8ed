//! Single-phase engine specs

use crate::prelude::*;
use sd_core::{Condition, EngineError, PackageRef, Phase, PhaseKind, PhaseState};

fn store_phase() -> Phase {
    Phase::new("spec-store", PhaseKind::Store).with_submission("sub-1")
}

#[tokio::test]
async fn successful_upload_rests_at_uploaded_with_success_callback() {
    let recorder = Recorder::arc();
    let (mut action, _) = engine(store_phase());
    action = action.with_callback(recorder.clone());

    assert!(action
        .upload(PackageRef::new("sub-1", "/tmp/sub-1.zip"))
        .await
        .unwrap());

    assert_eq!(action.state(), PhaseState::Uploaded);
    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0);
}

#[tokio::test]
async fn failed_upload_aborts_with_failure_callback() {
    let recorder = Recorder::arc();
    let (mut action, fake) = engine(store_phase());
    action = action.with_callback(recorder.clone());
    fake.set_upload_fails(true);

    assert!(!action
        .upload(PackageRef::new("sub-1", "/tmp/sub-1.zip"))
        .await
        .unwrap());

    assert_eq!(action.state(), PhaseState::Aborted);
    assert_eq!(action.phase().condition, Some(Condition::Failed));
    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].0);
    // status renders the recorded note verbatim
    assert!(calls[0].2.contains("payload rejected"));
}

#[tokio::test]
async fn verbs_out_of_order_are_illegal_and_harmless() {
    let (mut action, fake) = engine(store_phase());

    // promote before anything was uploaded
    let err = action.promote().await.unwrap_err();

    assert!(matches!(err, EngineError::IllegalTransition { .. }));
    assert_eq!(action.state(), PhaseState::Started);
    assert_eq!(fake.call_count(), 0);
}

#[tokio::test]
async fn status_is_stable_across_reads() {
    let (mut action, fake) = engine(store_phase());
    fake.set_upload_fails(true);
    action
        .upload(PackageRef::new("sub-1", "/tmp/sub-1.zip"))
        .await
        .unwrap();

    let first = action.status();
    let second = action.status();
    assert_eq!(first, second);
}
