//! # Simulator Tests
//!
//! Runs the deterministic event loop end to end through the bus and checks the report.

use std::time::Duration;

use rtcsim_core::config::{LostTickPolicy, RtcConfig};
use rtcsim_core::sim::Simulator;
use rtcsim_core::sim::simulator::DEFAULT_EPOCH_SECS;

use crate::common::init_tracing;

#[test]
fn update_interrupt_once_per_second() {
    init_tracing();
    let mut sim = Simulator::new(RtcConfig::default()).unwrap();
    sim.enable_update();
    sim.run_for(Duration::from_secs(10));

    let isr = sim.isr();
    assert_eq!(isr.update, 10);
    assert_eq!(isr.acks, 10);
    assert_eq!(sim.rtc().stats().update_cycles, 10);
    assert!(!sim.irq().is_high());
}

#[test]
fn periodic_interrupt_with_prompt_acks() {
    init_tracing();
    let mut sim = Simulator::new(RtcConfig::default()).unwrap();
    sim.enable_periodic(15);
    sim.run_for(Duration::from_secs(3));

    let isr = sim.isr();
    assert_eq!(isr.periodic, 6);
    assert_eq!(sim.rtc().stats().periodic_coalesced, 0);
}

#[test]
fn stall_is_absorbed_by_discard_policy() {
    init_tracing();
    let mut sim = Simulator::new(RtcConfig {
        lost_tick_policy: LostTickPolicy::Discard,
        ..RtcConfig::default()
    })
    .unwrap();
    sim.enable_update();
    sim.run_for(Duration::from_secs(1));
    sim.stall(Duration::from_secs(5));
    sim.run_for(Duration::from_secs(1));

    let stats = sim.rtc().stats();
    assert_eq!(stats.update_cycles, 3);
    assert_eq!(stats.discarded_secs, 4);
    let guest = sim.rtc().guest_time().assume_utc().unix_timestamp();
    assert_eq!(guest, DEFAULT_EPOCH_SECS + 7);
}

#[test]
fn suspend_keeps_wall_time() {
    init_tracing();
    let mut sim = Simulator::new(RtcConfig::default()).unwrap();
    sim.run_for(Duration::from_millis(500));
    sim.suspend(Duration::from_secs(3600));
    let guest = sim.rtc().guest_time().assume_utc().unix_timestamp();
    assert_eq!(guest, DEFAULT_EPOCH_SECS + 3600);
    assert_eq!(sim.rtc().stats().resumes, 1);
}

#[test]
fn report_serializes() {
    init_tracing();
    let mut sim = Simulator::new(RtcConfig::default()).unwrap();
    sim.enable_update();
    sim.run_for(Duration::from_secs(2));
    let report = sim.report();
    assert_eq!(report.host_ns, 2_000_000_000);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["isr"]["update"], 2);
    assert_eq!(json["rtc"]["update_cycles"], 2);
}

#[test]
fn invalid_config_is_rejected() {
    let result = Simulator::new(RtcConfig {
        base_year: 0,
        ..RtcConfig::default()
    });
    assert!(result.is_err());
}
