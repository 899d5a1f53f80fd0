// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_starts_at_given_value() {
    let clock = FakeClock::new(Duration::from_secs(100));
    assert_eq!(clock.now(), Duration::from_secs(100));
}

#[test]
fn fake_clock_advances() {
    let clock = FakeClock::new(Duration::from_secs(0));
    clock.advance(Duration::from_secs(5));
    clock.advance(Duration::from_secs(2));
    assert_eq!(clock.now(), Duration::from_secs(7));
}

#[test]
fn system_clock_is_roughly_now() {
    let clock = SystemClock;
    let now = clock.now();
    assert!(now.as_secs() > 1_600_000_000);
}
