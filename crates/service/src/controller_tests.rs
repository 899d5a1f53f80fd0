// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use servy_process::fake::FakeProcessLauncher;

fn args_for(tmp: &tempfile::TempDir, service_name: &str, recovery: &str) -> Vec<String> {
    let exe = tmp.path().join("target.exe");
    std::fs::write(&exe, b"").unwrap();

    vec![
        "servy".to_string(),
        exe.display().to_string(),
        "\"\"".to_string(),
        "\"\"".to_string(),
        "Normal".to_string(),
        "\"\"".to_string(),
        "\"\"".to_string(),
        "\"\"".to_string(),
        "1".to_string(),
        "1".to_string(),
        recovery.to_string(),
        "3".to_string(),
        "\"\"".to_string(),
        "\"\"".to_string(),
        "\"\"".to_string(),
        "\"\"".to_string(),
        "\"\"".to_string(),
        "\"\"".to_string(),
        "\"\"".to_string(),
        "\"\"".to_string(),
        "\"\"".to_string(),
        "\"\"".to_string(),
        service_name.to_string(),
    ]
}

#[tokio::test]
async fn on_start_launches_the_target_and_on_stop_tears_it_down() {
    let tmp = tempfile::tempdir().unwrap();
    let launcher = Arc::new(FakeProcessLauncher::new());
    let controller = LifecycleController::new(launcher.clone());

    let args = args_for(&tmp, "demo", "None");
    controller.on_start(&args).await.unwrap();

    assert_eq!(launcher.launch_count(), 1);
    let process = launcher.last_process().unwrap();
    assert_eq!(process.shutdown_calls(), 0);

    controller.on_stop().await;
    assert_eq!(process.shutdown_calls(), 1);

    // idempotent
    controller.on_stop().await;
    assert_eq!(process.shutdown_calls(), 1);
}

#[tokio::test]
async fn on_start_with_empty_executable_path_fails() {
    let launcher = Arc::new(FakeProcessLauncher::new());
    let controller = LifecycleController::new(launcher);

    let args = vec!["servy".to_string()];
    let err = controller.on_start(&args).await.unwrap_err();
    assert!(matches!(err, LifecycleError::Configuration(_)));
}

#[tokio::test]
async fn on_start_with_health_monitoring_enabled_creates_a_timer() {
    let tmp = tempfile::tempdir().unwrap();
    let launcher = Arc::new(FakeProcessLauncher::new());
    let controller = LifecycleController::new(launcher.clone());

    let args = args_for(&tmp, "demo", "RestartProcess");
    controller.on_start(&args).await.unwrap();

    {
        let guard = controller.state.lock();
        let state = guard.as_ref().unwrap();
        assert!(state.monitor.is_some());
        assert!(state.timer.is_some());
    }

    controller.on_stop().await;
}

#[tokio::test]
async fn resolve_working_directory_falls_back_to_system32_when_unset_and_parent_missing() {
    let definition = servy_core::ServiceDefinition {
        service_name: "demo".to_string(),
        executable_path: std::path::PathBuf::from("/does/not/exist/app.exe"),
        executable_args: String::new(),
        working_directory: None,
        priority: servy_core::Priority::Normal,
        stdout_path: None,
        stderr_path: None,
        rotation_size_bytes: 0,
        heartbeat_interval_seconds: 0,
        max_failed_checks: 0,
        recovery_action: servy_core::RecoveryAction::None,
        max_restart_attempts: 0,
        environment: Vec::new(),
        dependencies: Vec::new(),
        run_as_local_system: true,
        user_account: None,
        password: None,
        pre_launch: None,
    };

    let resolved = resolve_working_directory(&definition);
    assert_eq!(resolved, system32_directory());
}

#[tokio::test]
async fn child_liveness_probe_reports_false_once_process_has_exited() {
    let process = servy_process::fake::FakeRunningProcess::new(42);
    let current: Arc<Mutex<Option<Arc<dyn servy_process::RunningProcess>>>> =
        Arc::new(Mutex::new(Some(process.clone())));
    let probe = ChildLivenessProbe(current);

    assert!(probe.is_alive().await);
    process.mark_exited(0);
    assert!(!probe.is_alive().await);
}

#[tokio::test]
async fn child_liveness_probe_reports_false_once_child_has_been_cleared() {
    let current: Arc<Mutex<Option<Arc<dyn servy_process::RunningProcess>>>> =
        Arc::new(Mutex::new(None));
    let probe = ChildLivenessProbe(current);
    assert!(!probe.is_alive().await);
}
