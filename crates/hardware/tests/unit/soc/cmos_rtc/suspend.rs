//! # Host Event Tests
//!
//! Suspend/resume under both suspend modes and host monotonic clock resets.

use std::time::Duration;

use pretty_assertions::assert_eq;

use rtcsim_core::config::{RtcConfig, SuspendMode};
use rtcsim_core::soc::devices::cmos_rtc::regs::CmosReg;

use crate::common::harness::{MS, SEC, TestRtc, Y2K};

fn frozen() -> TestRtc {
    TestRtc::with_config(RtcConfig {
        start_time: Some(Y2K),
        suspend_mode: SuspendMode::Frozen,
        ..RtcConfig::default()
    })
}

#[test]
fn running_mode_catches_up_with_wall_clock() {
    let mut t = TestRtc::new();
    t.run_until(1_500 * MS);
    t.rtc.notify_suspend();
    t.clock.suspend_for(Duration::from_secs(3600));
    t.rtc.notify_resume();

    assert_eq!(t.clock_secs(), Y2K + 3601);
    assert_eq!(t.peek(CmosReg::HOURS), 0x01);
    assert_eq!(t.peek(CmosReg::MINUTES), 0x00);
    assert_eq!(t.peek(CmosReg::SECONDS), 0x01);
    assert_eq!(t.rtc.stats().update_cycles, 1);
    assert_eq!(t.rtc.stats().resumes, 1);
    assert_eq!(t.rtc.next_deadline(), Some(2 * SEC));

    t.run_until(2 * SEC);
    assert_eq!(t.peek(CmosReg::SECONDS), 0x02);
}

#[test]
fn frozen_mode_keeps_guest_time() {
    let mut t = frozen();
    t.run_until(1_500 * MS);
    t.rtc.notify_suspend();
    t.clock.suspend_for(Duration::from_secs(3600));
    t.rtc.notify_resume();

    assert_eq!(t.clock_secs(), Y2K + 1);
    assert_eq!(t.rtc.next_deadline(), Some(2 * SEC));
}

#[test]
fn monotonic_time_during_suspend_is_not_replayed() {
    let mut t = TestRtc::new();
    t.run_until(1_500 * MS);
    t.rtc.notify_suspend();
    t.clock.advance(Duration::from_secs(3600));
    t.rtc.notify_resume();

    assert_eq!(t.clock_secs(), Y2K + 3601);
    assert_eq!(t.rtc.stats().update_cycles, 1);
    assert_eq!(t.rtc.next_deadline(), Some(3602 * SEC));
}

#[test]
fn frozen_mode_ignores_monotonic_gap() {
    let mut t = frozen();
    t.run_until(1_500 * MS);
    t.rtc.notify_suspend();
    t.clock.advance(Duration::from_secs(60));
    t.rtc.notify_resume();

    assert_eq!(t.clock_secs(), Y2K + 1);
    assert_eq!(t.rtc.next_deadline(), Some(62 * SEC));
}

#[test]
fn resume_reschedules_periodic_timer() {
    let mut t = TestRtc::new();
    t.write(CmosReg::STATUS_A.0, 0x2F);
    t.write(CmosReg::STATUS_B.0, 0x0A);
    t.run_until(1_200 * MS);
    t.rtc.notify_suspend();
    t.clock.advance(Duration::from_secs(10));
    t.rtc.notify_resume();

    let fires = t.rtc.stats().periodic_fires;
    t.run_until(t.now() + 499 * MS);
    assert_eq!(t.rtc.stats().periodic_fires, fires);
    t.run_for(Duration::from_millis(1));
    assert_eq!(t.rtc.stats().periodic_fires, fires + 1);
}

#[test]
fn resume_without_suspend_is_ignored() {
    let mut t = TestRtc::new();
    t.run_until(1_500 * MS);
    t.rtc.notify_resume();
    assert_eq!(t.rtc.stats().resumes, 0);
    assert_eq!(t.clock_secs(), Y2K + 1);
    assert_eq!(t.rtc.next_deadline(), Some(2 * SEC));
}

#[test]
fn clock_reset_backwards_keeps_guest_time() {
    let mut t = TestRtc::new();
    t.run_until(5_500 * MS);
    assert_eq!(t.clock_secs(), Y2K + 5);

    t.clock.set_monotonic_ns(1_000);
    t.rtc.notify_clock_reset(1_000);
    assert_eq!(t.clock_secs(), Y2K + 5);
    assert_eq!(t.rtc.next_deadline(), Some(1_000 + 500 * MS));
    assert_eq!(t.rtc.stats().clock_resets, 1);

    t.run_until(1_000 + 500 * MS);
    assert_eq!(t.read(CmosReg::SECONDS.0), 0x06);
}

#[test]
fn clock_reset_forwards_does_not_skip_seconds() {
    let mut t = TestRtc::new();
    t.run_until(2_500 * MS);

    t.clock.set_monotonic_ns(100 * SEC);
    t.rtc.notify_clock_reset(100 * SEC);
    assert_eq!(t.clock_secs(), Y2K + 2);
    assert_eq!(t.rtc.next_deadline(), Some(100 * SEC + 500 * MS));
}
