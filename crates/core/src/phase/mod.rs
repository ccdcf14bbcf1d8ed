// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase control records, kinds, and states

mod kind;
mod record;
mod state;

pub use kind::PhaseKind;
pub use record::{Command, Condition, Phase, PhaseId};
pub use state::PhaseState;
