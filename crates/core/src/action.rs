// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-target phase engine
//!
//! [`PhaseAction`] owns one [`Phase`] and drives it through transition
//! sequences. [`PhaseAction::transition_to`] is the sole mutator of
//! `phase.state`; every verb is a thin wrapper that builds one
//! [`TransitionSequence`] whose work calls a collaborator, then runs it.
//!
//! Error policy: an illegal transition is returned as `Err` and never
//! absorbed. A failing work function is recovered locally: the phase moves
//! to its kind's failure state with `condition = failed` and a note, the
//! sequence halts, and the verb returns `Ok(false)`. Either way the
//! registered callback fires exactly once per invocation.

use crate::bulk::Target;
use crate::callback::{CallbackDispatcher, PhaseCallback};
use crate::collaborators::{
    Collaborators, IndexRecord, MemberRepository, ObjectStore, PackageRef, ReviewDesk,
    SearchIndex, StoreError,
};
use crate::error::EngineError;
use crate::phase::{Command, Condition, Phase, PhaseKind, PhaseState};
use crate::sequence::{StepError, StepWork, TransitionSequence};
use crate::status::describe_status;
use crate::table::{StateTable, TableError, TableRegistry};
use chrono::Utc;
use std::sync::Arc;

/// State machine for one phase instance.
///
/// One action is driven by one caller at a time; concurrent verb calls on the
/// same instance are a caller error and are not guarded here.
pub struct PhaseAction<C: Collaborators> {
    phase: Phase,
    table: Arc<StateTable>,
    collaborators: C,
    dispatcher: CallbackDispatcher,
    callback: Option<Arc<dyn PhaseCallback>>,
    asynchronous: bool,
    /// Set by [`BulkAction`](crate::bulk::BulkAction) so status text can
    /// name the targets involved
    pub(crate) targets: Option<Arc<Vec<Target>>>,
}

impl<C: Collaborators> PhaseAction<C> {
    /// Create an engine for `phase`, resolving its state table from the
    /// injected registry. An unknown kind is a configuration error.
    pub fn new(
        phase: Phase,
        registry: &TableRegistry,
        collaborators: C,
    ) -> Result<Self, TableError> {
        let table = registry.table(phase.kind)?;
        Ok(Self {
            phase,
            table,
            collaborators,
            dispatcher: CallbackDispatcher::new(),
            callback: None,
            asynchronous: false,
            targets: None,
        })
    }

    /// Register the completion callback for subsequent verbs
    pub fn with_callback(mut self, callback: Arc<dyn PhaseCallback>) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Dispatch callbacks on the background worker instead of inline
    pub fn with_async_dispatch(mut self) -> Self {
        self.asynchronous = true;
        self
    }

    /// Share a dispatcher (and its ordering worker) across engines
    pub fn with_dispatcher(mut self, dispatcher: CallbackDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn into_phase(self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> PhaseState {
        self.phase.state
    }

    pub fn table(&self) -> &StateTable {
        &self.table
    }

    /// Render the phase's current status string
    pub fn status(&self) -> String {
        describe_status(&self.phase, self.targets.as_deref().map(Vec::as_slice))
    }

    // =========================================================================
    // Transition engine
    // =========================================================================

    /// Atomically check-and-take one edge, returning the previous state.
    ///
    /// The sole mutator of `phase.state`. An illegal edge leaves the phase
    /// untouched.
    pub fn transition_to(
        &mut self,
        next: PhaseState,
        caller: &'static str,
    ) -> Result<PhaseState, EngineError> {
        let from = self.phase.state;
        if !self.table.allows(from, next) {
            return Err(EngineError::IllegalTransition {
                id: self.phase.id.clone(),
                kind: self.phase.kind,
                from,
                to: next,
                caller,
            });
        }
        self.phase.state = next;
        self.phase.updated_at = Utc::now();
        tracing::debug!(phase = %self.phase.id, caller, %from, to = %next, "transition");
        Ok(from)
    }

    /// Execute a sequence entry by entry, in declaration order.
    ///
    /// Halts on the first illegal transition (propagated as `Err`) or step
    /// failure (recovered into the failure state, returned as `Ok(false)`).
    /// Returns `Ok(true)` only if every entry completed. The callback fires
    /// exactly once on every exit path.
    pub async fn transition_sequence(
        &mut self,
        sequence: TransitionSequence,
    ) -> Result<bool, EngineError> {
        let caller = sequence.caller();
        let mut result: Result<bool, EngineError> = Ok(true);

        for entry in sequence.into_entries() {
            if let Err(err) = self.transition_to(entry.state, caller) {
                result = Err(err);
                break;
            }
            if let StepWork::Run(work) = entry.work {
                if let Err(step) = work().await {
                    self.record_step_failure(caller, step);
                    result = Ok(false);
                    break;
                }
            }
        }

        if matches!(result, Ok(true))
            && self.table.is_terminal(self.phase.state)
            && self.phase.state != self.table.cancel_state()
        {
            self.phase.condition = Some(Condition::Succeeded);
        }

        self.finish(caller, matches!(result, Ok(true)));
        result
    }

    /// Move to the failure state and record the diagnostic. The failure edge
    /// exists from every non-terminal state, so this cannot itself be
    /// illegal while the work-in-progressive-states convention holds.
    fn record_step_failure(&mut self, caller: &'static str, step: StepError) {
        tracing::warn!(phase = %self.phase.id, caller, note = %step.note, "step failed");
        if let Err(err) = self.transition_to(self.table.failure_state(), caller) {
            tracing::warn!(phase = %self.phase.id, %err, "failure state unreachable");
        }
        self.phase.condition = Some(Condition::Failed);
        if step.retry {
            self.phase.command = Some(Command::Retry);
        }
        self.phase.note = Some(step.note);
    }

    /// A verb was invoked without a required input. Recovered like a step
    /// failure, but before any transition is attempted.
    pub(crate) fn missing_precondition(
        &mut self,
        caller: &'static str,
        what: &str,
    ) -> Result<bool, EngineError> {
        self.record_step_failure(caller, StepError::new(format!("missing precondition: {what}")));
        self.finish(caller, false);
        Ok(false)
    }

    /// Dispatch the completion callback. Called exactly once per sequence
    /// invocation.
    fn finish(&self, caller: &'static str, success: bool) {
        let status = self.status();
        tracing::info!(
            phase = %self.phase.id,
            caller,
            state = %self.phase.state,
            success,
            "sequence finished"
        );
        let Some(callback) = &self.callback else {
            return;
        };
        if self.asynchronous {
            self.dispatcher
                .run_async(Arc::clone(callback), success, self.phase.clone(), status);
        } else {
            self.dispatcher
                .run_sync(callback.as_ref(), success, &self.phase, &status);
        }
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    /// Upload a package payload to staging storage
    pub async fn upload(&mut self, package: PackageRef) -> Result<bool, EngineError> {
        let store = self.collaborators.store();
        let mut sequence = TransitionSequence::new("upload").step(
            PhaseState::Uploading,
            move || async move { store.upload(&package).await.map_err(StepError::from) },
        );
        // A store phase pauses at `uploaded` until promotion; a plain upload
        // phase is done.
        sequence = match self.phase.kind {
            PhaseKind::Store => sequence.mark(PhaseState::Uploaded),
            _ => sequence.mark(PhaseState::Completed),
        };
        self.transition_sequence(sequence).await
    }

    /// Promote the uploaded package to permanent storage
    pub async fn promote(&mut self) -> Result<bool, EngineError> {
        let Some(submission_id) = self.phase.submission_id.clone() else {
            return self.missing_precondition("promote", "submission id");
        };
        let store = self.collaborators.store();
        let sequence = TransitionSequence::new("promote")
            .step(PhaseState::Storing, move || async move {
                store.promote(&submission_id).await.map_err(StepError::from)
            })
            .mark(PhaseState::Completed);
        self.transition_sequence(sequence).await
    }

    /// Write the search-index entry
    pub async fn index(&mut self, record: IndexRecord) -> Result<bool, EngineError> {
        let index = self.collaborators.index();
        let sequence = TransitionSequence::new("index")
            .step(PhaseState::Indexing, move || async move {
                index.put(&record).await.map_err(StepError::from)
            })
            .mark(PhaseState::Indexed);
        self.transition_sequence(sequence).await
    }

    /// Remove the search-index entry
    pub async fn deindex(&mut self) -> Result<bool, EngineError> {
        let Some(submission_id) = self.phase.submission_id.clone() else {
            return self.missing_precondition("deindex", "submission id");
        };
        let index = self.collaborators.index();
        let sequence = TransitionSequence::new("deindex")
            .step(PhaseState::Deindexing, move || async move {
                index.delete(&submission_id).await.map_err(StepError::from)
            })
            .mark(PhaseState::Completed);
        self.transition_sequence(sequence).await
    }

    /// Enqueue the submission at the member repository
    pub async fn submit(&mut self) -> Result<bool, EngineError> {
        let Some(repository) = self.phase.repository.clone() else {
            return self.missing_precondition("submit", "repository");
        };
        let Some(submission_id) = self.phase.submission_id.clone() else {
            return self.missing_precondition("submit", "submission id");
        };
        let repo = self.collaborators.repository();
        let sequence = TransitionSequence::new("submit")
            .step(PhaseState::Enqueuing, move || async move {
                repo.enqueue(&repository, &[submission_id])
                    .await
                    .map_err(StepError::from)
            })
            .mark(PhaseState::Unretrieved);
        self.transition_sequence(sequence).await
    }

    /// Confirm the member repository has picked the submission up
    pub async fn retrieve(&mut self) -> Result<bool, EngineError> {
        let Some(repository) = self.phase.repository.clone() else {
            return self.missing_precondition("retrieve", "repository");
        };
        let Some(submission_id) = self.phase.submission_id.clone() else {
            return self.missing_precondition("retrieve", "submission id");
        };
        let repo = self.collaborators.repository();
        let sequence = TransitionSequence::new("retrieve")
            .step(PhaseState::Retrieving, move || async move {
                repo.retrieve(&repository, &[submission_id])
                    .await
                    .map_err(StepError::from)
            })
            .mark(PhaseState::Retrieved);
        self.transition_sequence(sequence).await
    }

    /// Remove the submission from the member repository's intake queue
    pub async fn unsubmit(&mut self) -> Result<bool, EngineError> {
        let Some(repository) = self.phase.repository.clone() else {
            return self.missing_precondition("unsubmit", "repository");
        };
        let Some(submission_id) = self.phase.submission_id.clone() else {
            return self.missing_precondition("unsubmit", "submission id");
        };
        let repo = self.collaborators.repository();
        let sequence = TransitionSequence::new("unsubmit")
            .step(PhaseState::Dequeuing, move || async move {
                repo.dequeue(&repository, &[submission_id])
                    .await
                    .map_err(StepError::from)
            })
            .mark(PhaseState::Completed);
        self.transition_sequence(sequence).await
    }

    /// Delete the stored object
    pub async fn unstore(&mut self) -> Result<bool, EngineError> {
        let Some(submission_id) = self.phase.submission_id.clone() else {
            return self.missing_precondition("unstore", "submission id");
        };
        let store = self.collaborators.store();
        let sequence = TransitionSequence::new("unstore")
            .step(PhaseState::Unstoring, move || async move {
                store.delete(&submission_id).await.map_err(StepError::from)
            })
            .mark(PhaseState::Completed);
        self.transition_sequence(sequence).await
    }

    /// Withdraw the registration record at the member repository
    pub async fn unrecord(&mut self) -> Result<bool, EngineError> {
        let Some(repository) = self.phase.repository.clone() else {
            return self.missing_precondition("unrecord", "repository");
        };
        let Some(submission_id) = self.phase.submission_id.clone() else {
            return self.missing_precondition("unrecord", "submission id");
        };
        let repo = self.collaborators.repository();
        let sequence = TransitionSequence::new("unrecord")
            .step(PhaseState::Unrecording, move || async move {
                repo.withdraw(&repository, &[submission_id])
                    .await
                    .map_err(StepError::from)
            })
            .mark(PhaseState::Completed);
        self.transition_sequence(sequence).await
    }

    /// Open the human review; the phase rests at `reviewing` until a
    /// decision verb runs
    pub async fn review(&mut self) -> Result<bool, EngineError> {
        let Some(submission_id) = self.phase.submission_id.clone() else {
            return self.missing_precondition("review", "submission id");
        };
        let desk = self.collaborators.review();
        let sequence = TransitionSequence::new("review").step(
            PhaseState::Reviewing,
            move || async move {
                desk.open_review(&submission_id)
                    .await
                    .map_err(StepError::from)
            },
        );
        self.transition_sequence(sequence).await
    }

    /// Record an approval decision
    pub async fn approve(&mut self) -> Result<bool, EngineError> {
        self.decide("approve", true, PhaseState::Approving, PhaseState::Approved)
            .await
    }

    /// Record a rejection decision
    pub async fn reject(&mut self) -> Result<bool, EngineError> {
        self.decide("reject", false, PhaseState::Rejecting, PhaseState::Rejected)
            .await
    }

    async fn decide(
        &mut self,
        caller: &'static str,
        approved: bool,
        during: PhaseState,
        landed: PhaseState,
    ) -> Result<bool, EngineError> {
        let Some(submission_id) = self.phase.submission_id.clone() else {
            return self.missing_precondition(caller, "submission id");
        };
        let desk = self.collaborators.review();
        let sequence = TransitionSequence::new(caller)
            .step(during, move || async move {
                desk.record_decision(&submission_id, approved)
                    .await
                    .map_err(StepError::from)
            })
            .mark(landed);
        self.transition_sequence(sequence).await
    }

    /// Put the submission on the review schedule
    pub async fn schedule(&mut self) -> Result<bool, EngineError> {
        let Some(submission_id) = self.phase.submission_id.clone() else {
            return self.missing_precondition("schedule", "submission id");
        };
        let desk = self.collaborators.review();
        let sequence = TransitionSequence::new("schedule")
            .step(PhaseState::Scheduling, move || async move {
                desk.schedule(&submission_id).await.map_err(StepError::from)
            })
            .mark(PhaseState::Scheduled);
        self.transition_sequence(sequence).await
    }

    /// Assign the scheduled review to a reviewer
    pub async fn assign(&mut self, reviewer: &str) -> Result<bool, EngineError> {
        let Some(submission_id) = self.phase.submission_id.clone() else {
            return self.missing_precondition("assign", "submission id");
        };
        let desk = self.collaborators.review();
        let reviewer = reviewer.to_string();
        let sequence = TransitionSequence::new("assign")
            .step(PhaseState::Assigning, move || async move {
                desk.assign(&submission_id, &reviewer)
                    .await
                    .map_err(StepError::from)
            })
            .mark(PhaseState::Completed);
        self.transition_sequence(sequence).await
    }

    /// Cancel the phase. An ordinary transition: nothing in flight is
    /// interrupted, only future transitions are cut off.
    pub async fn cancel(&mut self) -> Result<bool, EngineError> {
        let sequence = TransitionSequence::new("cancel").mark(self.table.cancel_state());
        self.transition_sequence(sequence).await
    }

    /// Release resources the phase owns before the owning workflow removes
    /// it. Explicit, not a destroy hook: the caller must check the result.
    pub async fn cleanup(&mut self) -> Result<(), StoreError> {
        let Some(submission_id) = self.phase.submission_id.clone() else {
            return Ok(());
        };
        self.collaborators.store().delete(&submission_id).await
    }

    pub(crate) fn collaborators(&self) -> &C {
        &self.collaborators
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
