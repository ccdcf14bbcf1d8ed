// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error types
//!
//! Only caller errors surface here. Step failures inside a work function are
//! recovered locally by the engine (state + condition + note + callback) and
//! never raised.

use crate::phase::{PhaseId, PhaseKind, PhaseState};
use crate::table::TableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The attempted edge is not in this kind's state table. The phase state
    /// is left unchanged.
    #[error("illegal transition for {kind} phase {id}: {from} -> {to} (caller: {caller})")]
    IllegalTransition {
        id: PhaseId,
        kind: PhaseKind,
        from: PhaseState,
        to: PhaseState,
        caller: &'static str,
    },

    /// A bulk action was constructed with no targets
    #[error("bulk phase requires at least one target")]
    EmptyTargets,

    /// A bulk action was constructed over a non-bulk phase kind
    #[error("phase kind {0} is not a bulk kind")]
    NotBulk(PhaseKind),

    /// No state table registered for the phase's kind
    #[error(transparent)]
    Table(#[from] TableError),
}
