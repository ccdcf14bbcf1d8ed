// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The phase control record

use super::kind::PhaseKind;
use super::state::PhaseState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a phase record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhaseId(pub String);

impl PhaseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PhaseId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PhaseId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Outcome flag orthogonal to `state`, used to disambiguate terminal states
/// that can be reached by both the success and the failure path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Succeeded,
    Failed,
}

/// Directive left behind by a step for the controlling caller to consume
/// after the sequence returns. The engine itself never acts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Retry,
}

/// One control record: a single step of a larger submission workflow.
///
/// `state` and `condition` are mutated only by the transition engine while a
/// sequence runs; everything else is set up front by the owning workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub id: PhaseId,
    pub kind: PhaseKind,
    pub state: PhaseState,
    pub condition: Option<Condition>,
    pub command: Option<Command>,
    /// Diagnostic captured on failure; rendered verbatim by status describers
    pub note: Option<String>,
    /// The submission this phase acts on
    pub submission_id: Option<String>,
    /// Member repository label, used by queue verbs and status templates
    pub repository: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Phase {
    /// Create a new phase in the `started` state
    pub fn new(id: impl Into<PhaseId>, kind: PhaseKind) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            kind,
            state: PhaseState::Started,
            condition: None,
            command: None,
            note: None,
            submission_id: None,
            repository: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new phase with a generated id
    pub fn generate(kind: PhaseKind) -> Self {
        Self::new(PhaseId::generate(), kind)
    }

    pub fn with_submission(mut self, submission_id: impl Into<String>) -> Self {
        self.submission_id = Some(submission_id.into());
        self
    }

    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    /// Whether the last sequence over this phase failed
    pub fn failed(&self) -> bool {
        self.condition == Some(Condition::Failed)
    }

    /// Whether a failing step asked the containing workflow to retry
    pub fn retry_requested(&self) -> bool {
        self.command == Some(Command::Retry)
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
