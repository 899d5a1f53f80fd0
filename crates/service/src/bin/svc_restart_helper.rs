// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! svc-restart-helper: a one-shot collaborator invoked by the supervisor's
//! `RestartService` recovery action (§4.7 step 6, §6 "Restart helper").
//!
//! The supervisor cannot restart its own service process from inside
//! itself — by the time the SCM has torn it down there is nothing left to
//! issue the start request. Instead it launches this separate executable
//! with the service name as its sole argument and exits; this binary
//! stops then starts that service through the SCM and exits itself,
//! invoke-and-forget from the supervisor's point of view.

fn main() {
    let service_name = match std::env::args().nth(1) {
        Some(name) if !name.is_empty() => name,
        _ => {
            eprintln!("usage: svc-restart-helper <service-name>");
            std::process::exit(2);
        }
    };

    match restart(&service_name) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("svc-restart-helper: failed to restart '{service_name}': {err}");
            std::process::exit(1);
        }
    }
}

#[cfg(windows)]
fn restart(service_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    use std::time::Duration;
    use windows_service::service::{ServiceAccess, ServiceState};
    use windows_service::service_manager::{ServiceManager, ServiceManagerAccess};

    let manager = ServiceManager::local_computer(None::<&str>, ServiceManagerAccess::CONNECT)?;
    let access = ServiceAccess::QUERY_STATUS | ServiceAccess::STOP | ServiceAccess::START;
    let service = manager.open_service(service_name, access)?;

    if service.query_status()?.current_state != ServiceState::Stopped {
        service.stop()?;
        wait_for_state(&service, ServiceState::Stopped, Duration::from_secs(30))?;
    }

    service.start::<&str>(&[])?;
    wait_for_state(&service, ServiceState::Running, Duration::from_secs(30))?;
    Ok(())
}

#[cfg(windows)]
fn wait_for_state(
    service: &windows_service::service::Service,
    target: windows_service::service::ServiceState,
    timeout: std::time::Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let deadline = std::time::Instant::now() + timeout;
    loop {
        if service.query_status()?.current_state == target {
            return Ok(());
        }
        if std::time::Instant::now() >= deadline {
            return Err(format!("timed out waiting for service state {target:?}").into());
        }
        std::thread::sleep(std::time::Duration::from_millis(200));
    }
}

#[cfg(not(windows))]
fn restart(_service_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    Err("svc-restart-helper requires the Windows Service Control Manager".into())
}
