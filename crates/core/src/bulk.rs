// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bulk phase engine
//!
//! [`BulkAction`] reuses the single-target transition machinery of
//! [`PhaseAction`] for operations whose unit of work is "act on every
//! target." The work function always receives the complete target set;
//! partitioning into smaller batches for the wire is the work function's own
//! concern, and it must finish (or join any internal fan-out) before
//! reporting a single collective outcome.

use crate::action::PhaseAction;
use crate::callback::PhaseCallback;
use crate::collaborators::{
    Collaborators, IndexRecord, MemberRepository, ObjectStore, SearchIndex,
};
use crate::error::EngineError;
use crate::phase::{Phase, PhaseState};
use crate::sequence::{StepError, TransitionSequence};
use crate::table::TableRegistry;
use std::fmt;
use std::sync::Arc;

/// Opaque reference to one item a bulk phase acts on
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Structured numeric identity
    Id(u64),
    /// Secondary identity (a DOI)
    Doi(String),
    /// Fallback: whatever string form the item carries
    Opaque(String),
}

impl Target {
    fn class(&self) -> &'static str {
        match self {
            Target::Id(_) => "id",
            Target::Doi(_) => "doi",
            Target::Opaque(_) => "item",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Id(id) => write!(f, "{id}"),
            Target::Doi(doi) => write!(f, "{doi}"),
            Target::Opaque(s) => write!(f, "{s}"),
        }
    }
}

/// Compact human-readable summary of a target list.
///
/// Targets are grouped by classification in order of first appearance. With a
/// single classification the count is dropped: `"ids 7, 9, 12"`. Mixed lists
/// render counted groups: `"2 ids: 7, 9; 1 doi: 10.5061/x"`.
pub fn describe_targets(targets: &[Target]) -> String {
    let mut groups: Vec<(&'static str, Vec<String>)> = Vec::new();
    for target in targets {
        let class = target.class();
        match groups.iter_mut().find(|(label, _)| *label == class) {
            Some((_, members)) => members.push(target.to_string()),
            None => groups.push((class, vec![target.to_string()])),
        }
    }

    let plural = |label: &str, n: usize| {
        if n == 1 {
            label.to_string()
        } else {
            format!("{label}s")
        }
    };

    if let [(label, members)] = groups.as_slice() {
        return format!("{} {}", plural(label, members.len()), members.join(", "));
    }
    groups
        .iter()
        .map(|(label, members)| {
            format!(
                "{} {}: {}",
                members.len(),
                plural(label, members.len()),
                members.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// State machine for a batch operation over one shared control record.
pub struct BulkAction<C: Collaborators> {
    inner: PhaseAction<C>,
    targets: Arc<Vec<Target>>,
}

impl<C: Collaborators> fmt::Debug for BulkAction<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkAction")
            .field("targets", &self.targets)
            .finish_non_exhaustive()
    }
}

impl<C: Collaborators> BulkAction<C> {
    /// Create a bulk engine. An empty target list or a non-bulk phase kind
    /// is a hard construction-time error.
    pub fn new(
        phase: Phase,
        targets: Vec<Target>,
        registry: &TableRegistry,
        collaborators: C,
    ) -> Result<Self, EngineError> {
        if targets.is_empty() {
            return Err(EngineError::EmptyTargets);
        }
        if !phase.kind.is_bulk() {
            return Err(EngineError::NotBulk(phase.kind));
        }
        let mut inner = PhaseAction::new(phase, registry, collaborators)?;
        let targets = Arc::new(targets);
        inner.targets = Some(Arc::clone(&targets));
        Ok(Self { inner, targets })
    }

    pub fn with_callback(mut self, callback: Arc<dyn PhaseCallback>) -> Self {
        self.inner = self.inner.with_callback(callback);
        self
    }

    pub fn with_async_dispatch(mut self) -> Self {
        self.inner = self.inner.with_async_dispatch();
        self
    }

    pub fn phase(&self) -> &Phase {
        self.inner.phase()
    }

    pub fn into_phase(self) -> Phase {
        self.inner.into_phase()
    }

    pub fn state(&self) -> PhaseState {
        self.inner.state()
    }

    /// Read-only view of the batch; the engine never mutates it
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn describe_targets(&self) -> String {
        describe_targets(&self.targets)
    }

    pub fn status(&self) -> String {
        self.inner.status()
    }

    fn target_ids(&self) -> Vec<String> {
        self.targets.iter().map(Target::to_string).collect()
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    /// Enqueue the whole batch at the member repository
    pub async fn submit(&mut self) -> Result<bool, EngineError> {
        let Some(repository) = self.phase().repository.clone() else {
            return self.inner.missing_precondition("submit", "repository");
        };
        let repo = self.inner.collaborators().repository();
        let ids = self.target_ids();
        let sequence = TransitionSequence::new("submit")
            .step(PhaseState::Enqueuing, move || async move {
                repo.enqueue(&repository, &ids).await.map_err(StepError::from)
            })
            .mark(PhaseState::Unretrieved);
        self.inner.transition_sequence(sequence).await
    }

    /// Confirm the member repository has picked the batch up
    pub async fn retrieve(&mut self) -> Result<bool, EngineError> {
        let Some(repository) = self.phase().repository.clone() else {
            return self.inner.missing_precondition("retrieve", "repository");
        };
        let repo = self.inner.collaborators().repository();
        let ids = self.target_ids();
        let sequence = TransitionSequence::new("retrieve")
            .step(PhaseState::Retrieving, move || async move {
                repo.retrieve(&repository, &ids).await.map_err(StepError::from)
            })
            .mark(PhaseState::Retrieved);
        self.inner.transition_sequence(sequence).await
    }

    /// Dequeue the whole batch
    pub async fn unsubmit(&mut self) -> Result<bool, EngineError> {
        let Some(repository) = self.phase().repository.clone() else {
            return self.inner.missing_precondition("unsubmit", "repository");
        };
        let repo = self.inner.collaborators().repository();
        let ids = self.target_ids();
        let sequence = TransitionSequence::new("unsubmit")
            .step(PhaseState::Dequeuing, move || async move {
                repo.dequeue(&repository, &ids).await.map_err(StepError::from)
            })
            .mark(PhaseState::Completed);
        self.inner.transition_sequence(sequence).await
    }

    /// Promote every target's uploaded package to permanent storage. Targets
    /// are promoted in order; the first failure halts and reports for the
    /// whole batch.
    pub async fn store(&mut self) -> Result<bool, EngineError> {
        let store = self.inner.collaborators().store();
        let ids = self.target_ids();
        let sequence = TransitionSequence::new("store")
            .step(PhaseState::Storing, move || async move {
                for id in &ids {
                    store.promote(id).await.map_err(StepError::from)?;
                }
                Ok(())
            })
            .mark(PhaseState::Completed);
        self.inner.transition_sequence(sequence).await
    }

    /// Write index entries for the whole batch
    pub async fn index(&mut self, records: Vec<IndexRecord>) -> Result<bool, EngineError> {
        let index = self.inner.collaborators().index();
        let sequence = TransitionSequence::new("index")
            .step(PhaseState::Indexing, move || async move {
                for record in &records {
                    index.put(record).await.map_err(StepError::from)?;
                }
                Ok(())
            })
            .mark(PhaseState::Indexed);
        self.inner.transition_sequence(sequence).await
    }

    /// Cancel the batch phase
    pub async fn cancel(&mut self) -> Result<bool, EngineError> {
        self.inner.cancel().await
    }
}

#[cfg(test)]
#[path = "bulk_tests.rs"]
mod tests;
