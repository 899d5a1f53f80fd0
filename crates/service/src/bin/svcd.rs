// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! svcd: the Windows service supervisor binary.
//!
//! Registered by the SCM with a positional argument vector describing the
//! target process; see `servy_core::decode_args` for the layout. On
//! non-Windows builds, or when invoked with `--local`, it runs the same
//! lifecycle directly under Ctrl-C instead of dispatching through the SCM,
//! which is how the supervisor is developed and tested off Windows.

use std::sync::Arc;
use tracing::{error, info};

fn print_version() {
    println!("svcd {}", env!("CARGO_PKG_VERSION"));
}

fn print_help() {
    print_version();
    println!("Windows service supervisor for an arbitrary target executable");
    println!();
    println!("USAGE:");
    println!("    svcd <args...>");
    println!();
    println!("svcd is normally started by the Service Control Manager with the");
    println!("argument vector configured for the service. It should not be invoked");
    println!("directly except for local development with --local.");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Print help information");
    println!("    -v, --version    Print version information");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args: Vec<String> = std::env::args().collect();

    if let Some(flag) = args.get(1) {
        match flag.as_str() {
            "--version" | "-V" | "-v" => {
                print_version();
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                print_help();
                return Ok(());
            }
            _ => {}
        }
    }

    let log_path = servy_service::config::diagnostic_log_path()?;
    servy_service::config::rotate_log_if_needed(&log_path);
    servy_service::config::write_startup_marker(&log_path)?;
    let _log_guard = servy_service::config::setup_logging(&log_path)?;

    let local_mode = args.get(1).map(|a| a == "--local").unwrap_or(false);
    if local_mode {
        args.remove(1);
    }

    #[cfg(windows)]
    if !local_mode {
        let service_name = args
            .iter()
            .rev()
            .find(|a| !a.starts_with('-'))
            .cloned()
            .unwrap_or_else(|| "servy".to_string());

        if let Err(err) = servy_service::run_as_service(&service_name) {
            error!(error = %err, "service dispatch failed");
            return Err(err.into());
        }
        return Ok(());
    }

    info!("starting supervisor in local (non-SCM) mode");
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_local(args))
}

async fn run_local(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let controller = Arc::new(servy_service::LifecycleController::new(Arc::new(
        servy_process::OsProcessLauncher,
    )));

    controller.on_start(&args).await?;

    tokio::signal::ctrl_c().await?;
    info!("received Ctrl-C, stopping supervised target");
    controller.on_stop().await;

    Ok(())
}
