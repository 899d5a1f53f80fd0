// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::fake::FakeProcessLauncher;
use crate::launcher::LaunchSpec;
use servy_core::Priority;
use std::path::PathBuf;

fn spec() -> LaunchSpec {
    LaunchSpec {
        executable_path: PathBuf::from("/usr/bin/true"),
        executable_args: String::new(),
        working_directory: PathBuf::from("/"),
        environment: Vec::new(),
        priority: Priority::Normal,
        stdout_sink: None,
        stderr_sink: None,
    }
}

#[tokio::test]
async fn first_launch_creates_a_containment_group() {
    let launcher = Arc::new(FakeProcessLauncher::new());
    let container = ChildContainer::new(launcher.clone());

    assert!(!container.has_group());
    container.launch(spec()).await.unwrap();
    assert!(container.has_group());
    assert!(launcher.calls()[0].containment_attached);
}

#[tokio::test]
async fn relaunch_reuses_the_existing_group() {
    let launcher = Arc::new(FakeProcessLauncher::new());
    let container = ChildContainer::new(launcher.clone());

    container.launch(spec()).await.unwrap();
    let group_present_after_first = container.has_group();
    container.launch(spec()).await.unwrap();

    assert!(group_present_after_first);
    assert!(container.has_group());
    assert_eq!(launcher.launch_count(), 2);
}

#[tokio::test]
async fn release_then_launch_creates_a_fresh_group() {
    let launcher = Arc::new(FakeProcessLauncher::new());
    let container = ChildContainer::new(launcher.clone());

    container.launch(spec()).await.unwrap();
    container.release();
    assert!(!container.has_group());

    container.launch(spec()).await.unwrap();
    assert!(container.has_group());
}
