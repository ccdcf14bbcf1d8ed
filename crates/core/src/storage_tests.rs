use super::*;
use crate::phase::{Condition, PhaseKind, PhaseState};

fn store() -> (JsonPhaseStore, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonPhaseStore::open(dir.path()).unwrap();
    (store, dir)
}

#[test]
fn save_and_load_round_trip() {
    let (store, _dir) = store();
    let mut phase = Phase::new("ph-1", PhaseKind::Store).with_submission("sub-42");
    phase.state = PhaseState::Aborted;
    phase.condition = Some(Condition::Failed);
    phase.note = Some("storage service unavailable: connection refused".to_string());

    store.save(&phase).unwrap();
    let loaded = store.load(&phase.id).unwrap();

    assert_eq!(loaded, phase);
}

#[test]
fn load_missing_phase_is_not_found() {
    let (store, _dir) = store();
    let err = store.load(&PhaseId::new("nope")).unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[test]
fn delete_is_idempotent() {
    let (store, _dir) = store();
    let phase = Phase::new("ph-1", PhaseKind::Index);

    store.save(&phase).unwrap();
    store.delete(&phase.id).unwrap();
    store.delete(&phase.id).unwrap();

    assert!(store.load(&phase.id).is_err());
}

#[test]
fn list_returns_sorted_ids() {
    let (store, _dir) = store();
    for id in ["b-phase", "a-phase", "c-phase"] {
        store.save(&Phase::new(id, PhaseKind::Queue)).unwrap();
    }

    let ids = store.list().unwrap();
    assert_eq!(
        ids,
        vec![
            PhaseId::new("a-phase"),
            PhaseId::new("b-phase"),
            PhaseId::new("c-phase"),
        ]
    );
}

#[test]
fn open_temp_creates_a_usable_store() {
    let store = JsonPhaseStore::open_temp().unwrap();
    let phase = Phase::new("ph-1", PhaseKind::Upload);
    store.save(&phase).unwrap();
    assert_eq!(store.load(&phase.id).unwrap(), phase);
}
