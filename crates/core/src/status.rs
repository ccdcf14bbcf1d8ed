// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable status rendering
//!
//! Pure functions from a phase (and, for bulk phases, its targets) to a
//! display string. Precedence: a recorded failure note verbatim, then a
//! per-state label, then a kind-specific template. The output is for logs
//! and UI only; nothing parses it.

use crate::bulk::{describe_targets, Target};
use crate::phase::{Phase, PhaseKind, PhaseState};

/// Render the current status of a phase.
///
/// Never mutates the phase; calling it twice in a row yields identical text.
pub fn describe_status(phase: &Phase, targets: Option<&[Target]>) -> String {
    if let Some(note) = &phase.note {
        return note.clone();
    }
    if let Some(label) = state_label(phase.state) {
        return label.to_string();
    }
    describe_type(phase, targets)
}

/// Per-state labels for resting and terminal states. Progressive states have
/// none and fall through to the kind template.
fn state_label(state: PhaseState) -> Option<&'static str> {
    match state {
        PhaseState::Uploaded => Some("uploaded to staging storage"),
        PhaseState::Indexed => Some("index entry written"),
        PhaseState::Unretrieved => Some("awaiting retrieval by the member repository"),
        PhaseState::Retrieved => Some("retrieved by the member repository"),
        PhaseState::Approved => Some("approved by reviewer"),
        PhaseState::Rejected => Some("rejected by reviewer"),
        PhaseState::Scheduled => Some("review scheduled"),
        PhaseState::Completed => Some("completed"),
        PhaseState::Canceled => Some("canceled"),
        _ => None,
    }
}

/// Kind-specific template, filled with the target summary (bulk) or the
/// phase's own submission identity.
fn describe_type(phase: &Phase, targets: Option<&[Target]>) -> String {
    let subject = match targets {
        Some(targets) => describe_targets(targets),
        None => phase
            .submission_id
            .clone()
            .unwrap_or_else(|| phase.id.to_string()),
    };
    let repo = phase.repository.as_deref().unwrap_or("member repository");

    match phase.kind {
        PhaseKind::Upload | PhaseKind::Store | PhaseKind::BatchStore => {
            format!("transferring {subject} to storage")
        }
        PhaseKind::Index | PhaseKind::BatchIndex => format!("indexing {subject}"),
        PhaseKind::Queue | PhaseKind::BatchQueue => {
            format!("submitting to {repo}: {subject}")
        }
        PhaseKind::Unqueue | PhaseKind::BatchUnqueue => {
            format!("withdrawing from {repo}: {subject}")
        }
        PhaseKind::Unstore => format!("removing stored object for {subject}"),
        PhaseKind::Unindex => format!("removing index entry for {subject}"),
        PhaseKind::Unrecord => format!("withdrawing record for {subject}"),
        PhaseKind::Review => format!("reviewing {subject}"),
        PhaseKind::Schedule => format!("scheduling review for {subject}"),
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
