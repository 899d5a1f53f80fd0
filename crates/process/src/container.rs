// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestrates the main target's containment group lifetime across
//! launches, including `RestartProcess` re-launches (§4.5 edge case: reuse
//! the same group unless it has been released).

use crate::error::ProcessError;
use crate::group::{new_containment_group, ContainmentGroup};
use crate::launcher::{LaunchSpec, ProcessLauncher, RunningProcess};
use parking_lot::Mutex;
use std::sync::Arc;

/// Owns the one containment group per supervisor instance (§3) and launches
/// the main target into it, lazily (re)creating the group as needed.
pub struct ChildContainer {
    launcher: Arc<dyn ProcessLauncher>,
    group: Mutex<Option<Arc<dyn ContainmentGroup>>>,
}

impl ChildContainer {
    pub fn new(launcher: Arc<dyn ProcessLauncher>) -> Self {
        Self {
            launcher,
            group: Mutex::new(None),
        }
    }

    /// Launch `spec` into the containment group, creating one first if none
    /// exists yet (first launch, or a prior group was released).
    pub async fn launch(&self, spec: LaunchSpec) -> Result<Arc<dyn RunningProcess>, ProcessError> {
        let group = {
            let mut guard = self.group.lock();
            if guard.is_none() {
                *guard = Some(new_containment_group()?);
            }
            guard.clone().expect("just populated above")
        };

        self.launcher.launch(spec, Some(group)).await
    }

    /// Release the containment group, terminating any surviving members.
    /// Idempotent; a subsequent `launch` call creates a fresh group.
    pub fn release(&self) {
        let mut guard = self.group.lock();
        if let Some(group) = guard.take() {
            if let Err(err) = group.release() {
                tracing::warn!(error = %err, "containment group release failed");
            }
        }
    }

    pub fn has_group(&self) -> bool {
        self.group.lock().is_some()
    }
}

#[cfg(test)]
#[path = "container_tests.rs"]
mod tests;
