// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Symbolic phase states

use serde::{Deserialize, Serialize};
use std::fmt;

/// A symbolic state a deposit phase can occupy.
///
/// The full set is shared across phase kinds; which states (and which
/// transitions between them) are legal for a given kind is defined by that
/// kind's [`StateTable`](crate::table::StateTable). Progressive ("-ing")
/// states are the only ones a work function runs in; resting and terminal
/// states are reached by bare transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseState {
    /// Every phase starts here
    Started,
    Uploading,
    Uploaded,
    Storing,
    Indexing,
    Indexed,
    Enqueuing,
    /// Queued at the member repository, not yet picked up
    Unretrieved,
    Retrieving,
    Retrieved,
    Dequeuing,
    Unstoring,
    Deindexing,
    Unrecording,
    Reviewing,
    Approving,
    Approved,
    Rejecting,
    Rejected,
    Scheduling,
    Scheduled,
    Assigning,
    Completed,
    /// Caller chose to stop; terminal for every kind
    Canceled,
    /// A step failed; terminal failure state for every kind
    Aborted,
}

impl PhaseState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseState::Started => "started",
            PhaseState::Uploading => "uploading",
            PhaseState::Uploaded => "uploaded",
            PhaseState::Storing => "storing",
            PhaseState::Indexing => "indexing",
            PhaseState::Indexed => "indexed",
            PhaseState::Enqueuing => "enqueuing",
            PhaseState::Unretrieved => "unretrieved",
            PhaseState::Retrieving => "retrieving",
            PhaseState::Retrieved => "retrieved",
            PhaseState::Dequeuing => "dequeuing",
            PhaseState::Unstoring => "unstoring",
            PhaseState::Deindexing => "deindexing",
            PhaseState::Unrecording => "unrecording",
            PhaseState::Reviewing => "reviewing",
            PhaseState::Approving => "approving",
            PhaseState::Approved => "approved",
            PhaseState::Rejecting => "rejecting",
            PhaseState::Rejected => "rejected",
            PhaseState::Scheduling => "scheduling",
            PhaseState::Scheduled => "scheduled",
            PhaseState::Assigning => "assigning",
            PhaseState::Completed => "completed",
            PhaseState::Canceled => "canceled",
            PhaseState::Aborted => "aborted",
        }
    }
}

impl fmt::Display for PhaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
