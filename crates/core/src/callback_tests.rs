// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::phase::{Phase, PhaseKind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn make_phase() -> Phase {
    Phase::new("ph-1", PhaseKind::Store)
}

#[test]
fn sync_dispatch_runs_inline() {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let callback = move |success: bool, _phase: &Phase, status: &str| {
        assert!(success);
        assert_eq!(status, "uploaded to staging storage");
        seen.fetch_add(1, Ordering::SeqCst);
    };

    let dispatcher = CallbackDispatcher::new();
    dispatcher.run_sync(&callback, true, &make_phase(), "uploaded to staging storage");

    // already delivered by the time run_sync returns
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn async_dispatch_preserves_submission_order() {
    let order: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&order);
    let callback: Arc<dyn PhaseCallback> =
        Arc::new(move |_success: bool, _phase: &Phase, status: &str| {
            seen.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(status.to_string());
        });

    let dispatcher = CallbackDispatcher::new();
    for i in 0..10 {
        dispatcher.run_async(Arc::clone(&callback), true, make_phase(), format!("status-{i}"));
    }

    tokio::time::sleep(Duration::from_millis(50)).await;

    let delivered = order.lock().unwrap_or_else(PoisonError::into_inner).clone();
    let expected: Vec<String> = (0..10).map(|i| format!("status-{i}")).collect();
    assert_eq!(delivered, expected);
}

#[tokio::test]
async fn async_dispatch_returns_before_delivery_completes() {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let callback: Arc<dyn PhaseCallback> =
        Arc::new(move |_success: bool, _phase: &Phase, _status: &str| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

    let dispatcher = CallbackDispatcher::new();
    dispatcher.run_async(callback, false, make_phase(), "aborted".to_string());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn closures_implement_phase_callback() {
    let called = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&called);
    let callback: Arc<dyn PhaseCallback> =
        Arc::new(move |success: bool, phase: &Phase, _status: &str| {
            assert!(!success);
            assert_eq!(phase.kind, PhaseKind::Store);
            seen.fetch_add(1, Ordering::SeqCst);
        });

    callback.on_complete(false, &make_phase(), "aborted");
    assert_eq!(called.load(Ordering::SeqCst), 1);
}
