// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires [`servy_monitor::RecoveryDispatcher`] to the concrete child
//! container, restart helper, and OS shutdown invocation (§4.7 step 6).

use async_trait::async_trait;
use parking_lot::Mutex;
use servy_monitor::{MonitorError, RecoveryDispatcher};
use servy_process::{ChildContainer, LaunchSpec, RunningProcess};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub struct ServiceRecoveryDispatcher {
    container: Arc<ChildContainer>,
    current_child: Arc<Mutex<Option<Arc<dyn RunningProcess>>>>,
    relaunch_spec: LaunchSpec,
    service_name: String,
    restart_helper_path: Option<PathBuf>,
}

impl ServiceRecoveryDispatcher {
    pub fn new(
        container: Arc<ChildContainer>,
        current_child: Arc<Mutex<Option<Arc<dyn RunningProcess>>>>,
        relaunch_spec: LaunchSpec,
        service_name: String,
        restart_helper_path: Option<PathBuf>,
    ) -> Self {
        Self {
            container,
            current_child,
            relaunch_spec,
            service_name,
            restart_helper_path,
        }
    }
}

#[async_trait]
impl RecoveryDispatcher for ServiceRecoveryDispatcher {
    async fn restart_process(&self) -> Result<(), MonitorError> {
        let stale = self.current_child.lock().clone();
        if let Some(stale) = stale {
            if !stale.has_exited().await {
                let _ = stale.shutdown(Duration::from_secs(5)).await;
            }
        }

        let fresh = self.container.launch(self.relaunch_spec.clone()).await?;
        *self.current_child.lock() = Some(fresh);
        Ok(())
    }

    async fn restart_service(&self) -> Result<(), MonitorError> {
        let helper = self.restart_helper_path.clone().ok_or_else(|| {
            MonitorError::HelperLaunchFailed(
                "svc-restart-helper was not found next to the supervisor binary".to_string(),
            )
        })?;

        tokio::process::Command::new(&helper)
            .arg(&self.service_name)
            .spawn()
            .map_err(|e| MonitorError::ServiceRestartFailed(e.to_string()))?;
        Ok(())
    }

    async fn restart_computer(&self) -> Result<(), MonitorError> {
        let result = if cfg!(windows) {
            tokio::process::Command::new("shutdown")
                .args(["/r", "/f", "/t", "0"])
                .spawn()
        } else {
            tokio::process::Command::new("shutdown")
                .args(["-r", "now"])
                .spawn()
        };
        result
            .map_err(|e| MonitorError::ComputerRestartFailed(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
