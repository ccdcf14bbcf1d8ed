// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-kind state tables and the registry that holds them
//!
//! A [`StateTable`] is pure data: the set of legal states and edges for one
//! phase kind, plus the designated failure and cancel states. Tables are
//! built and validated once, at process start, inside
//! [`TableRegistry::standard`]; a bad table is a fatal configuration error,
//! never a runtime condition.

use crate::phase::{PhaseKind, PhaseState};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::Arc;
use thiserror::Error;

/// Errors detected while validating a state table at startup
#[derive(Debug, Error)]
pub enum TableError {
    #[error("{kind}: start state {state} has incoming edges")]
    StartHasIncoming { kind: PhaseKind, state: PhaseState },
    #[error("{kind}: terminal state {state} has outgoing edges")]
    TerminalHasOutgoing { kind: PhaseKind, state: PhaseState },
    #[error("{kind}: state {state} is unreachable from {start}")]
    Unreachable {
        kind: PhaseKind,
        state: PhaseState,
        start: PhaseState,
    },
    #[error("no state table registered for kind {0}")]
    UnknownKind(PhaseKind),
}

/// Immutable transition table for one phase kind
#[derive(Debug, Clone)]
pub struct StateTable {
    kind: PhaseKind,
    start: PhaseState,
    edges: BTreeSet<(PhaseState, PhaseState)>,
    terminals: BTreeSet<PhaseState>,
    failure: PhaseState,
    cancel: PhaseState,
}

impl StateTable {
    /// Build a table from a linear spine of states plus extra branch edges.
    ///
    /// The first spine state is the start state. Every non-terminal state
    /// gets implicit edges to the cancel and failure states, so a step
    /// failure or a cancel verb is always a legal transition mid-flight.
    fn new(
        kind: PhaseKind,
        spine: &[PhaseState],
        branches: &[(PhaseState, PhaseState)],
        terminals: &[PhaseState],
    ) -> Self {
        let start = spine[0];
        let mut edges: BTreeSet<(PhaseState, PhaseState)> = BTreeSet::new();
        for pair in spine.windows(2) {
            edges.insert((pair[0], pair[1]));
        }
        for &(from, to) in branches {
            edges.insert((from, to));
        }

        let mut terminals: BTreeSet<PhaseState> = terminals.iter().copied().collect();
        terminals.insert(PhaseState::Canceled);
        terminals.insert(PhaseState::Aborted);

        let members: BTreeSet<PhaseState> = edges
            .iter()
            .flat_map(|&(from, to)| [from, to])
            .chain([start])
            .collect();
        for state in members {
            if !terminals.contains(&state) {
                edges.insert((state, PhaseState::Canceled));
                edges.insert((state, PhaseState::Aborted));
            }
        }

        Self {
            kind,
            start,
            edges,
            terminals,
            failure: PhaseState::Aborted,
            cancel: PhaseState::Canceled,
        }
    }

    pub fn kind(&self) -> PhaseKind {
        self.kind
    }

    pub fn start(&self) -> PhaseState {
        self.start
    }

    /// The state a failing step lands the phase in
    pub fn failure_state(&self) -> PhaseState {
        self.failure
    }

    pub fn cancel_state(&self) -> PhaseState {
        self.cancel
    }

    /// Whether `from -> to` is a legal edge for this kind
    pub fn allows(&self, from: PhaseState, to: PhaseState) -> bool {
        self.edges.contains(&(from, to))
    }

    pub fn is_terminal(&self, state: PhaseState) -> bool {
        self.terminals.contains(&state)
    }

    /// All states mentioned by this table
    pub fn states(&self) -> BTreeSet<PhaseState> {
        self.edges
            .iter()
            .flat_map(|&(from, to)| [from, to])
            .chain([self.start])
            .collect()
    }

    /// Startup sanity check: the start state has no incoming edges, terminal
    /// states have no outgoing edges, and every state is reachable from the
    /// start.
    pub fn validate(&self) -> Result<(), TableError> {
        for &(from, to) in &self.edges {
            if to == self.start {
                return Err(TableError::StartHasIncoming {
                    kind: self.kind,
                    state: self.start,
                });
            }
            if self.terminals.contains(&from) {
                return Err(TableError::TerminalHasOutgoing {
                    kind: self.kind,
                    state: from,
                });
            }
        }

        let mut outgoing: BTreeMap<PhaseState, Vec<PhaseState>> = BTreeMap::new();
        for &(from, to) in &self.edges {
            outgoing.entry(from).or_default().push(to);
        }
        let mut seen: BTreeSet<PhaseState> = BTreeSet::new();
        let mut queue = VecDeque::from([self.start]);
        while let Some(state) = queue.pop_front() {
            if !seen.insert(state) {
                continue;
            }
            if let Some(next) = outgoing.get(&state) {
                queue.extend(next.iter().copied());
            }
        }
        for state in self.states() {
            if !seen.contains(&state) {
                return Err(TableError::Unreachable {
                    kind: self.kind,
                    state,
                    start: self.start,
                });
            }
        }
        Ok(())
    }
}

/// Validated collection of state tables, one per phase kind.
///
/// Built once and shared (`Arc`) into every engine instance; there is no
/// global lookup.
#[derive(Debug, Clone)]
pub struct TableRegistry {
    tables: HashMap<PhaseKind, Arc<StateTable>>,
}

impl TableRegistry {
    /// Build and validate the standard tables for every [`PhaseKind`]
    pub fn standard() -> Result<Self, TableError> {
        use PhaseState::*;

        let mut tables = HashMap::new();
        let mut register =
            |kind: PhaseKind,
             spine: &[PhaseState],
             branches: &[(PhaseState, PhaseState)],
             terminals: &[PhaseState]| {
                tables.insert(kind, Arc::new(StateTable::new(kind, spine, branches, terminals)));
            };

        register(PhaseKind::Upload, &[Started, Uploading, Completed], &[], &[Completed]);
        register(
            PhaseKind::Store,
            &[Started, Uploading, Uploaded, Storing, Completed],
            &[],
            &[Completed],
        );
        register(PhaseKind::Index, &[Started, Indexing, Indexed], &[], &[Indexed]);
        register(
            PhaseKind::Queue,
            &[Started, Enqueuing, Unretrieved, Retrieving, Retrieved],
            &[],
            &[Retrieved],
        );
        register(PhaseKind::Unqueue, &[Started, Dequeuing, Completed], &[], &[Completed]);
        register(PhaseKind::Unstore, &[Started, Unstoring, Completed], &[], &[Completed]);
        register(PhaseKind::Unindex, &[Started, Deindexing, Completed], &[], &[Completed]);
        register(PhaseKind::Unrecord, &[Started, Unrecording, Completed], &[], &[Completed]);
        register(
            PhaseKind::Review,
            &[Started, Reviewing],
            &[
                (Reviewing, Approving),
                (Approving, Approved),
                (Reviewing, Rejecting),
                (Rejecting, Rejected),
            ],
            &[Approved, Rejected],
        );
        register(
            PhaseKind::Schedule,
            &[Started, Scheduling, Scheduled, Assigning, Completed],
            &[],
            &[Completed],
        );

        // Bulk kinds: batches act on items that already passed single-item
        // preparation, so their tables are shorter.
        register(PhaseKind::BatchStore, &[Started, Storing, Completed], &[], &[Completed]);
        register(PhaseKind::BatchIndex, &[Started, Indexing, Indexed], &[], &[Indexed]);
        register(
            PhaseKind::BatchQueue,
            &[Started, Enqueuing, Unretrieved, Retrieving, Retrieved],
            &[],
            &[Retrieved],
        );
        register(
            PhaseKind::BatchUnqueue,
            &[Started, Dequeuing, Completed],
            &[],
            &[Completed],
        );

        let registry = Self { tables };
        registry.validate()?;
        Ok(registry)
    }

    /// Validate every registered table
    pub fn validate(&self) -> Result<(), TableError> {
        for kind in PhaseKind::ALL {
            self.table(kind)?.validate()?;
        }
        Ok(())
    }

    /// Look up the table for a kind
    pub fn table(&self, kind: PhaseKind) -> Result<Arc<StateTable>, TableError> {
        self.tables
            .get(&kind)
            .cloned()
            .ok_or(TableError::UnknownKind(kind))
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
