// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::fake::RecordingDispatcher;
use servy_core::RecoveryAction;
use std::sync::atomic::{AtomicBool, Ordering};

struct ExitedOnce(AtomicBool);

#[async_trait]
impl LivenessProbe for ExitedOnce {
    async fn is_alive(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }
}

#[tokio::test(start_paused = true)]
async fn timer_ticks_the_monitor_on_the_configured_interval() {
    let dispatcher = Arc::new(RecordingDispatcher::new());
    let monitor = Arc::new(HealthMonitor::new(1, 3, RecoveryAction::RestartProcess, dispatcher.clone()));
    let probe = Arc::new(ExitedOnce(AtomicBool::new(false)));

    let timer = HeartbeatTimer::start(monitor.clone(), Duration::from_secs(1), probe);

    // First probed tick observes "alive" (healthy, no-op); the second
    // observes "exited" and, with max_failed_checks=1, dispatches recovery.
    tokio::time::advance(Duration::from_secs(1)).await;
    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_secs(1)).await;
    tokio::task::yield_now().await;

    assert_eq!(dispatcher.calls().len(), 1);
    timer.stop();
}
