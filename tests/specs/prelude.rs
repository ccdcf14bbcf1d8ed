//! Shared helpers for the workflow specs

use sd_core::{FakeCollaborators, Phase, PhaseAction, PhaseCallback, PhaseState, TableRegistry};
use std::sync::{Arc, Mutex};

pub fn registry() -> TableRegistry {
    TableRegistry::standard().unwrap()
}

pub fn engine(phase: Phase) -> (PhaseAction<FakeCollaborators>, FakeCollaborators) {
    let collaborators = FakeCollaborators::new();
    let action = PhaseAction::new(phase, &registry(), collaborators.clone()).unwrap();
    (action, collaborators)
}

/// Callback recorder shared across specs
#[derive(Default)]
pub struct Recorder {
    calls: Mutex<Vec<(bool, PhaseState, String)>>,
}

impl Recorder {
    pub fn arc() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<(bool, PhaseState, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl PhaseCallback for Recorder {
    fn on_complete(&self, success: bool, phase: &Phase, status: &str) {
        self.calls
            .lock()
            .unwrap()
            .push((success, phase.state, status.to_string()));
    }
}
