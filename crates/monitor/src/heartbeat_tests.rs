// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::fake::{DispatchCall, RecordingDispatcher};
use std::sync::Arc;

fn monitor(
    max_failed_checks: u32,
    max_restart_attempts: u32,
    dispatcher: Arc<RecordingDispatcher>,
) -> HealthMonitor {
    HealthMonitor::new(
        max_failed_checks,
        max_restart_attempts,
        RecoveryAction::RestartProcess,
        dispatcher,
    )
}

#[tokio::test]
async fn healthy_tick_with_no_prior_failures_is_a_no_op() {
    let dispatcher = Arc::new(RecordingDispatcher::new());
    let m = monitor(3, 3, dispatcher.clone());
    let state = m.tick(true).await;
    assert_eq!(state, HeartbeatState::default());
    assert!(dispatcher.calls().is_empty());
}

#[tokio::test]
async fn exactly_max_failed_checks_consecutive_failures_trigger_exactly_one_recovery() {
    let dispatcher = Arc::new(RecordingDispatcher::new());
    let m = monitor(3, 3, dispatcher.clone());

    let s1 = m.tick(false).await;
    assert_eq!(s1.failed_checks, 1);
    assert!(dispatcher.calls().is_empty());

    let s2 = m.tick(false).await;
    assert_eq!(s2.failed_checks, 2);
    assert!(dispatcher.calls().is_empty());

    let s3 = m.tick(false).await;
    assert_eq!(dispatcher.calls(), vec![DispatchCall::RestartProcess]);
    assert_eq!(s3.failed_checks, 0, "failed_checks resets immediately after dispatch");
    assert_eq!(s3.restart_attempts, 1);
    assert!(!s3.recovering, "recovering clears after dispatch completes");
}

#[tokio::test]
async fn healthy_tick_after_failures_resets_both_counters() {
    let dispatcher = Arc::new(RecordingDispatcher::new());
    let m = monitor(5, 3, dispatcher.clone());

    m.tick(false).await;
    m.tick(false).await;
    let healthy = m.tick(true).await;

    assert_eq!(healthy.failed_checks, 0);
    assert_eq!(healthy.restart_attempts, 0);
    assert!(dispatcher.calls().is_empty());
}

#[tokio::test]
async fn exactly_max_restart_attempts_recoveries_dispatch_then_monitor_idles() {
    let dispatcher = Arc::new(RecordingDispatcher::new());
    let m = monitor(1, 2, dispatcher.clone());

    // Episode 1: immediate failure (max_failed_checks=1) -> recovery #1.
    m.tick(false).await;
    assert_eq!(dispatcher.calls().len(), 1);

    // Episode 2: recovery #2.
    m.tick(false).await;
    assert_eq!(dispatcher.calls().len(), 2);

    // Episode 3 (the (max_restart_attempts + 1)-th) dispatches nothing.
    let idled = m.tick(false).await;
    assert_eq!(dispatcher.calls().len(), 2, "no third dispatch once the budget is exhausted");
    assert!(!idled.recovering);
    assert_eq!(idled.restart_attempts, 2);
}

#[tokio::test]
async fn ticks_while_recovering_are_skipped() {
    // max_failed_checks=1 so the first failed tick both crosses the
    // threshold and, by virtue of a recording dispatcher that never clears
    // `recovering` mid-call in this harness, exercises the "recovering"
    // guard against a concurrent tick arriving for a different reason: a
    // manually-forced `recovering` flag.
    let dispatcher = Arc::new(RecordingDispatcher::new());
    let m = monitor(10, 3, dispatcher.clone());

    {
        let mut state = m.state.lock().await;
        state.recovering = true;
        state.failed_checks = 7;
    }

    let observed = m.tick(false).await;
    assert_eq!(observed.failed_checks, 7, "tick is a no-op while recovering");
    assert!(dispatcher.calls().is_empty());
}

#[tokio::test]
async fn disposed_monitor_ignores_further_ticks() {
    let dispatcher = Arc::new(RecordingDispatcher::new());
    let m = monitor(1, 3, dispatcher.clone());
    m.dispose();

    m.tick(false).await;
    m.tick(false).await;

    assert!(dispatcher.calls().is_empty());
    assert_eq!(m.snapshot().await, HeartbeatState::default());
}

#[tokio::test]
async fn recovery_dispatch_failure_still_clears_recovering() {
    let dispatcher = Arc::new(RecordingDispatcher::new());
    dispatcher.fail_next_dispatch();
    let m = monitor(1, 3, dispatcher.clone());

    let state = m.tick(false).await;
    assert!(!state.recovering);
    assert_eq!(state.restart_attempts, 1);
}
