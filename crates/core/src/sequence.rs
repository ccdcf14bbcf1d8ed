// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transition sequences
//!
//! A [`TransitionSequence`] is the ephemeral, per-verb plan the engine
//! executes: an ordered list of target states, each paired with either a unit
//! of async work or nothing ("just transition"). It exists only for the
//! duration of one verb call and is consumed by
//! [`PhaseAction::transition_sequence`](crate::action::PhaseAction::transition_sequence).

use crate::phase::PhaseState;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Failure reported by a work function.
///
/// `note` is captured on the phase record and rendered verbatim by status
/// describers. `retry` asks the containing workflow to re-invoke the verb;
/// the engine records the request and enforces nothing about retry policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepError {
    pub note: String,
    pub retry: bool,
}

impl StepError {
    pub fn new(note: impl Into<String>) -> Self {
        Self {
            note: note.into(),
            retry: false,
        }
    }

    pub fn with_retry(mut self) -> Self {
        self.retry = true;
        self
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.note)
    }
}

/// Outcome of one work function
pub type StepResult = Result<(), StepError>;

/// Boxed future produced by a work function
pub type StepFuture = Pin<Box<dyn Future<Output = StepResult> + Send + 'static>>;

/// What a sequence entry does once its transition has been taken
pub(crate) enum StepWork {
    /// The transition alone satisfies the entry
    Mark,
    /// Side-effecting work; a failure halts the sequence
    Run(Box<dyn FnOnce() -> StepFuture + Send + 'static>),
}

pub(crate) struct SequenceEntry {
    pub(crate) state: PhaseState,
    pub(crate) work: StepWork,
}

/// Ordered per-invocation plan: target state -> work (or bare transition)
pub struct TransitionSequence {
    caller: &'static str,
    entries: Vec<SequenceEntry>,
}

impl TransitionSequence {
    /// Start a sequence; `caller` tags diagnostics and errors with the verb name
    pub fn new(caller: &'static str) -> Self {
        Self {
            caller,
            entries: Vec::new(),
        }
    }

    /// Add a bare transition entry
    pub fn mark(mut self, state: PhaseState) -> Self {
        self.entries.push(SequenceEntry {
            state,
            work: StepWork::Mark,
        });
        self
    }

    /// Add a transition guarded entry whose work runs after the transition
    pub fn step<F, Fut>(mut self, state: PhaseState, work: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = StepResult> + Send + 'static,
    {
        self.entries.push(SequenceEntry {
            state,
            work: StepWork::Run(Box::new(move || Box::pin(work()))),
        });
        self
    }

    pub fn caller(&self) -> &'static str {
        self.caller
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<SequenceEntry> {
        self.entries
    }
}

impl fmt::Debug for TransitionSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let states: Vec<_> = self
            .entries
            .iter()
            .map(|e| match e.work {
                StepWork::Mark => format!("{} (mark)", e.state),
                StepWork::Run(_) => format!("{} (work)", e.state),
            })
            .collect();
        f.debug_struct("TransitionSequence")
            .field("caller", &self.caller)
            .field("entries", &states)
            .finish()
    }
}

#[cfg(test)]
#[path = "sequence_tests.rs"]
mod tests;
