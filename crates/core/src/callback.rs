// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion callback dispatch
//!
//! After a transition sequence finishes (success, failure, or halted) the
//! engine hands the outcome to the registered callback exactly once, either
//! inline ([`CallbackDispatcher::run_sync`]) or on a background worker
//! ([`CallbackDispatcher::run_async`]). The two paths are separate methods so
//! the concurrency contract is visible at the call site.

use crate::phase::Phase;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;

/// Completion handler registered by the workflow that starts a verb.
///
/// Exceptions (panics) inside the handler are the caller's problem; the
/// dispatcher never retries.
pub trait PhaseCallback: Send + Sync + 'static {
    fn on_complete(&self, success: bool, phase: &Phase, status: &str);
}

impl<F> PhaseCallback for F
where
    F: Fn(bool, &Phase, &str) + Send + Sync + 'static,
{
    fn on_complete(&self, success: bool, phase: &Phase, status: &str) {
        self(success, phase, status)
    }
}

struct Dispatch {
    callback: Arc<dyn PhaseCallback>,
    success: bool,
    phase: Phase,
    status: String,
}

/// Dispatches completion callbacks, inline or deferred.
///
/// The async path feeds a single worker task through an unbounded channel, so
/// dispatches through one dispatcher are delivered in the order they were
/// submitted. The worker is spawned lazily on first async use and exits when
/// every clone of the dispatcher has been dropped.
#[derive(Clone, Default)]
pub struct CallbackDispatcher {
    worker: Arc<Mutex<Option<mpsc::UnboundedSender<Dispatch>>>>,
}

impl CallbackDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoke the callback inline, before returning to the caller
    pub fn run_sync(&self, callback: &dyn PhaseCallback, success: bool, phase: &Phase, status: &str) {
        callback.on_complete(success, phase, status);
    }

    /// Submit the callback to the background worker and return immediately.
    ///
    /// Must be called from within a tokio runtime (the worker is spawned on
    /// first use).
    pub fn run_async(
        &self,
        callback: Arc<dyn PhaseCallback>,
        success: bool,
        phase: Phase,
        status: String,
    ) {
        let dispatch = Dispatch {
            callback,
            success,
            phase,
            status,
        };
        if self.sender().send(dispatch).is_err() {
            tracing::warn!("callback worker gone; dropping dispatch");
        }
    }

    fn sender(&self) -> mpsc::UnboundedSender<Dispatch> {
        let mut guard = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(tx) = guard.as_ref() {
            return tx.clone();
        }
        let (tx, mut rx) = mpsc::unbounded_channel::<Dispatch>();
        tokio::spawn(async move {
            while let Some(d) = rx.recv().await {
                d.callback.on_complete(d.success, &d.phase, &d.status);
            }
        });
        *guard = Some(tx.clone());
        tx
    }
}

impl std::fmt::Debug for CallbackDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackDispatcher").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "callback_tests.rs"]
mod tests;
