// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Windows Service Control Manager integration: dispatches `svcd` as a
//! registered service and wires SCM start/stop control requests to a
//! [`LifecycleController`].

use crate::controller::LifecycleController;
use std::ffi::OsString;
use std::sync::Arc;
use std::time::Duration;
use windows_service::service::{
    ServiceControl, ServiceControlAccept, ServiceExitCode, ServiceState, ServiceStatus, ServiceType,
};
use windows_service::service_control_handler::{self, ServiceControlHandlerResult};
use windows_service::{define_windows_service, service_dispatcher, Result as SvcResult};

const SERVICE_TYPE: ServiceType = ServiceType::OWN_PROCESS;

define_windows_service!(ffi_service_main, service_main);

/// Blocks the calling thread, registering with the SCM and running the
/// dispatch loop until the service is stopped. Returns once the service has
/// fully stopped.
pub fn run(service_name: &str) -> SvcResult<()> {
    // `define_windows_service!` only allows the entry point to read its name
    // via a thread-local set here, since the generated FFI shim takes no
    // extra arguments of its own.
    SERVICE_NAME.with(|cell| *cell.borrow_mut() = service_name.to_string());
    service_dispatcher::start(service_name, ffi_service_main)
}

thread_local! {
    static SERVICE_NAME: std::cell::RefCell<String> = std::cell::RefCell::new(String::new());
}

fn service_main(arguments: Vec<OsString>) {
    let service_name = SERVICE_NAME.with(|cell| cell.borrow().clone());
    if let Err(err) = run_service(&service_name, arguments) {
        tracing::error!(error = %err, "service main exited with an error");
    }
}

fn run_service(service_name: &str, arguments: Vec<OsString>) -> SvcResult<()> {
    let runtime = tokio::runtime::Runtime::new().expect("failed to start tokio runtime for service body");
    let controller = Arc::new(LifecycleController::new(Arc::new(
        servy_process::OsProcessLauncher,
    )));

    let (shutdown_tx, mut shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);

    let controller_for_handler = Arc::clone(&controller);
    let runtime_handle = runtime.handle().clone();
    let event_handler = move |control_event| -> ServiceControlHandlerResult {
        match control_event {
            ServiceControl::Interrogate => ServiceControlHandlerResult::NoError,
            ServiceControl::Stop | ServiceControl::Shutdown => {
                let controller = Arc::clone(&controller_for_handler);
                runtime_handle.block_on(controller.on_stop());
                let _ = shutdown_tx.try_send(());
                ServiceControlHandlerResult::NoError
            }
            _ => ServiceControlHandlerResult::NotImplemented,
        }
    };

    let status_handle = service_control_handler::register(service_name, event_handler)?;

    status_handle.set_service_status(ServiceStatus {
        service_type: SERVICE_TYPE,
        current_state: ServiceState::StartPending,
        controls_accepted: ServiceControlAccept::empty(),
        exit_code: ServiceExitCode::Win32(0),
        checkpoint: 0,
        wait_hint: Duration::from_secs(5),
        process_id: None,
    })?;

    let args: Vec<String> = arguments
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();

    let start_result = runtime.block_on(controller.on_start(&args));

    let exit_code = match start_result {
        Ok(()) => {
            status_handle.set_service_status(ServiceStatus {
                service_type: SERVICE_TYPE,
                current_state: ServiceState::Running,
                controls_accepted: ServiceControlAccept::STOP | ServiceControlAccept::SHUTDOWN,
                exit_code: ServiceExitCode::Win32(0),
                checkpoint: 0,
                wait_hint: Duration::default(),
                process_id: None,
            })?;

            runtime.block_on(shutdown_rx.recv());
            0
        }
        Err(err) => {
            tracing::error!(error = %err, "OnStart failed");
            1
        }
    };

    status_handle.set_service_status(ServiceStatus {
        service_type: SERVICE_TYPE,
        current_state: ServiceState::Stopped,
        controls_accepted: ServiceControlAccept::empty(),
        exit_code: ServiceExitCode::Win32(exit_code),
        checkpoint: 0,
        wait_hint: Duration::default(),
        process_id: None,
    })?;

    Ok(())
}
