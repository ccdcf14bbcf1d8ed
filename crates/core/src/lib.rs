//! sd-core: state-machine core for the Submission Deposit (sd) workflow
//!
//! This crate provides:
//! - Phase control records and per-kind state tables
//! - The transition-sequence engine for single phases and batches
//! - Completion-callback dispatch (sync or deferred)
//! - Human-readable status rendering
//! - Collaborator traits for the external services phases call, with
//!   recording fakes for tests
//! - JSON-based phase storage for the persistence boundary

pub mod action;
pub mod bulk;
pub mod callback;
pub mod collaborators;
pub mod error;
pub mod phase;
pub mod sequence;
pub mod status;
pub mod storage;
pub mod table;

// Re-exports
pub use action::PhaseAction;
pub use bulk::{describe_targets, BulkAction, Target};
pub use callback::{CallbackDispatcher, PhaseCallback};
pub use collaborators::{
    CollabCall, Collaborators, FakeCollaborators, IndexError, IndexRecord, MemberRepository,
    ObjectStore, PackageRef, RepositoryError, ReviewDesk, ReviewError, SearchIndex, StoreError,
};
pub use error::EngineError;
pub use phase::{Command, Condition, Phase, PhaseId, PhaseKind, PhaseState};
pub use sequence::{StepError, StepResult, TransitionSequence};
pub use status::describe_status;
pub use storage::{JsonPhaseStore, StorageError};
pub use table::{StateTable, TableError, TableRegistry};
