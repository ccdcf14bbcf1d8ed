use super::*;

#[test]
fn new_phase_starts_clean() {
    let phase = Phase::new("ph-1", PhaseKind::Store);

    assert_eq!(phase.state, PhaseState::Started);
    assert!(phase.condition.is_none());
    assert!(phase.command.is_none());
    assert!(phase.note.is_none());
    assert!(!phase.failed());
    assert!(!phase.retry_requested());
}

#[test]
fn generate_produces_distinct_ids() {
    let a = Phase::generate(PhaseKind::Index);
    let b = Phase::generate(PhaseKind::Index);
    assert_ne!(a.id, b.id);
}

#[test]
fn builders_set_submission_and_repository() {
    let phase = Phase::new("ph-1", PhaseKind::Queue)
        .with_submission("sub-42")
        .with_repository("merritt");

    assert_eq!(phase.submission_id.as_deref(), Some("sub-42"));
    assert_eq!(phase.repository.as_deref(), Some("merritt"));
}

#[test]
fn failed_and_retry_flags() {
    let mut phase = Phase::new("ph-1", PhaseKind::Queue);
    phase.condition = Some(Condition::Failed);
    phase.command = Some(Command::Retry);

    assert!(phase.failed());
    assert!(phase.retry_requested());
}

#[test]
fn serde_round_trip_preserves_diagnostics() {
    let mut phase = Phase::new("ph-1", PhaseKind::Store).with_submission("sub-42");
    phase.state = PhaseState::Aborted;
    phase.condition = Some(Condition::Failed);
    phase.note = Some("payload rejected: checksum mismatch".to_string());

    let json = serde_json::to_string(&phase).unwrap();
    let loaded: Phase = serde_json::from_str(&json).unwrap();

    assert_eq!(loaded, phase);
}
