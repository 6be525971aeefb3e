//! # Lost Tick Tests
//!
//! Recovery of the update cycle after the host event loop stalls for several seconds.

use std::time::Duration;

use pretty_assertions::assert_eq;

use rtcsim_core::config::{LostTickPolicy, RtcConfig};
use rtcsim_core::soc::devices::cmos_rtc::regs::CmosReg;

use crate::common::harness::{MS, SEC, TestRtc, Y2K};

fn slewing(max_backlog_secs: u64) -> TestRtc {
    TestRtc::with_config(RtcConfig {
        start_time: Some(Y2K),
        lost_tick_policy: LostTickPolicy::Slew,
        slew_catchup_factor: 4,
        max_slew_backlog_secs: max_backlog_secs,
        ..RtcConfig::default()
    })
}

#[test]
fn discard_jumps_to_host_time() {
    let mut t = TestRtc::new();
    t.run_until(SEC);
    t.stall(Duration::from_secs(5));
    t.run_until(6 * SEC);

    let stats = t.rtc.stats();
    assert_eq!(stats.update_cycles, 2);
    assert_eq!(stats.discarded_secs, 4);
    assert_eq!(stats.slewed_secs, 0);
    assert_eq!(t.read(CmosReg::SECONDS.0), 0x06);
    assert_eq!(t.rtc.next_deadline(), Some(7 * SEC));
}

#[test]
fn slew_replays_missed_seconds() {
    let mut t = slewing(300);
    t.run_until(SEC);
    t.stall(Duration::from_secs(5));
    t.run_until(6 * SEC);
    assert_eq!(t.clock_secs(), Y2K + 2);
    assert_eq!(t.rtc.next_deadline(), Some(6_250 * MS));

    t.run_until(7_250 * MS);
    let stats = t.rtc.stats();
    assert_eq!(t.clock_secs(), Y2K + 7);
    assert_eq!(stats.update_cycles, 7);
    assert_eq!(stats.discarded_secs, 0);
    assert_eq!(stats.slewed_secs, 5);
    assert_eq!(t.rtc.next_deadline(), Some(8 * SEC));
}

#[test]
fn slew_drops_backlog_beyond_limit() {
    let mut t = slewing(2);
    t.run_until(SEC);
    t.stall(Duration::from_secs(10));
    t.run_until(11_500 * MS);

    let stats = t.rtc.stats();
    assert_eq!(stats.discarded_secs, 7);
    assert_eq!(stats.update_cycles, 4);
    assert_eq!(t.clock_secs(), Y2K + 11);
    assert_eq!(t.rtc.next_deadline(), Some(12 * SEC));
}

#[test]
fn slewed_updates_raise_each_interrupt() {
    let mut t = slewing(300);
    t.write(CmosReg::STATUS_B.0, 0x12);
    let _ = t.run_acking_until(SEC);
    t.stall(Duration::from_secs(3));
    let acks = t.run_acking_until(5 * SEC);
    // Seconds 2 through 5, one interrupt each.
    assert_eq!(acks, 4);
    assert_eq!(t.clock_secs(), Y2K + 5);
}
