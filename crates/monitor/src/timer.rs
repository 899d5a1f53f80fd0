// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The heartbeat timer: a dedicated task that fires [`HealthMonitor::tick`]
//! every `heartbeat_interval_seconds` (§5 "health-monitor timer callback").

use crate::heartbeat::HealthMonitor;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// The liveness probe the timer consults each tick. A thin seam so the
/// timer does not depend on `servy_process` directly.
#[async_trait]
pub trait LivenessProbe: Send + Sync + 'static {
    async fn is_alive(&self) -> bool;
}

/// Owns the periodic tick task. Dropping (or calling [`HeartbeatTimer::stop`])
/// cancels it; per §4.8 teardown order, this happens before anything else is
/// torn down.
pub struct HeartbeatTimer {
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl HeartbeatTimer {
    /// Only construct when `ServiceDefinition::health_monitoring_enabled`
    /// holds (§8: "no timer is created" otherwise).
    pub fn start(
        monitor: Arc<HealthMonitor>,
        interval: Duration,
        probe: Arc<dyn LivenessProbe>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let alive = probe.is_alive().await;
                monitor.tick(alive).await;
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    pub fn stop(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for HeartbeatTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
