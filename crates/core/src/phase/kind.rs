// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase kinds

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies which state table governs a phase.
///
/// The `Batch*` kinds are the bulk counterparts used by
/// [`BulkAction`](crate::bulk::BulkAction); they carry their own (smaller)
/// tables because a batch acts on items that already passed the single-item
/// preparation states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    /// Stage a package file in temporary object storage
    Upload,
    /// Upload and promote a package to permanent storage
    Store,
    /// Write a search-index entry
    Index,
    /// Enqueue at a member repository and await retrieval
    Queue,
    /// Dequeue from a member repository
    Unqueue,
    /// Delete the stored object
    Unstore,
    /// Delete the search-index entry
    Unindex,
    /// Withdraw the registration record at the member repository
    Unrecord,
    /// Human-review sub-sequence
    Review,
    /// Schedule and assign a review
    Schedule,
    BatchStore,
    BatchIndex,
    BatchQueue,
    BatchUnqueue,
}

impl PhaseKind {
    /// All kinds, in registry order
    pub const ALL: [PhaseKind; 14] = [
        PhaseKind::Upload,
        PhaseKind::Store,
        PhaseKind::Index,
        PhaseKind::Queue,
        PhaseKind::Unqueue,
        PhaseKind::Unstore,
        PhaseKind::Unindex,
        PhaseKind::Unrecord,
        PhaseKind::Review,
        PhaseKind::Schedule,
        PhaseKind::BatchStore,
        PhaseKind::BatchIndex,
        PhaseKind::BatchQueue,
        PhaseKind::BatchUnqueue,
    ];

    /// Whether this kind drives a batch of targets rather than a single item
    pub fn is_bulk(&self) -> bool {
        matches!(
            self,
            PhaseKind::BatchStore
                | PhaseKind::BatchIndex
                | PhaseKind::BatchQueue
                | PhaseKind::BatchUnqueue
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Upload => "upload",
            PhaseKind::Store => "store",
            PhaseKind::Index => "index",
            PhaseKind::Queue => "queue",
            PhaseKind::Unqueue => "unqueue",
            PhaseKind::Unstore => "unstore",
            PhaseKind::Unindex => "unindex",
            PhaseKind::Unrecord => "unrecord",
            PhaseKind::Review => "review",
            PhaseKind::Schedule => "schedule",
            PhaseKind::BatchStore => "batch_store",
            PhaseKind::BatchIndex => "batch_index",
            PhaseKind::BatchQueue => "batch_queue",
            PhaseKind::BatchUnqueue => "batch_unqueue",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
