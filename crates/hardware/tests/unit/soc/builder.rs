//! # Builder and Handle Tests
//!
//! Verifies bus registration, configuration validation, and the host-side handle operations.

use mockall::Sequence;
use mockall::predicate::eq;

use rtcsim_core::clock::ManualClock;
use rtcsim_core::common::error::ConfigError;
use rtcsim_core::config::RtcConfig;
use rtcsim_core::soc::devices::cmos_rtc::regs::CmosReg;
use rtcsim_core::soc::interconnect::IoBus;
use rtcsim_core::soc::irq::LatchedIrq;
use rtcsim_core::soc::{init, init_with_config};

use crate::common::harness::{MS, SEC, Y2K};
use crate::common::init_tracing;
use crate::common::mocks::interrupts::MockPic;

fn manual_rtc(config: RtcConfig) -> (IoBus, ManualClock, LatchedIrq, rtcsim_core::RtcHandle) {
    init_tracing();
    let clock = ManualClock::from_unix_secs(Y2K);
    let irq = LatchedIrq::new();
    let mut bus = IoBus::new();
    let rtc = init_with_config(
        &mut bus,
        config,
        Box::new(clock.clone()),
        Box::new(irq.clone()),
    )
    .unwrap();
    (bus, clock, irq, rtc)
}

#[test]
fn init_registers_four_ports_at_0x70() {
    let mut bus = IoBus::new();
    let _rtc = init(&mut bus, 2000, Box::new(LatchedIrq::new()));
    assert_eq!(bus.device_count(), 1);
    for port in 0x70..=0x73 {
        assert!(bus.is_claimed(port));
    }
    assert!(!bus.is_claimed(0x74));
    assert_eq!(bus.irq_lines(), vec![("CMOS-RTC", 8)]);

    bus.write_u8(0x70, CmosReg::STATUS_D.0);
    assert_eq!(bus.read_u8(0x71), 0x80);
}

#[test]
fn init_with_config_honours_io_base_and_irq() {
    let (bus, _clock, _irq, _rtc) = manual_rtc(RtcConfig {
        io_base: 0x170,
        irq: 10,
        ..RtcConfig::default()
    });
    assert!(bus.is_claimed(0x170));
    assert!(!bus.is_claimed(0x70));
    assert_eq!(bus.irq_lines(), vec![("CMOS-RTC", 10)]);
}

#[test]
fn init_with_config_rejects_invalid_config() {
    let mut bus = IoBus::new();
    let result = init_with_config(
        &mut bus,
        RtcConfig {
            century_register: Some(0x05),
            ..RtcConfig::default()
        },
        Box::new(ManualClock::from_unix_secs(0)),
        Box::new(LatchedIrq::new()),
    );
    assert!(matches!(result, Err(ConfigError::Invalid { field: "century_register", .. })));
    assert_eq!(bus.device_count(), 0);
}

#[test]
fn cmos_byte_access_bypasses_index() {
    let (mut bus, _clock, _irq, rtc) = manual_rtc(RtcConfig::default());
    bus.write_u8(0x70, 0x20);
    rtc.set_cmos_byte(0x40, 0x5A);
    assert_eq!(rtc.get_cmos_byte(0x40), 0x5A);
    assert_eq!(rtc.lock().selected_index(), 0x20);

    rtc.set_cmos_byte(0xF0, 0x11);
    bus.write_u8(0x72, 0x70);
    assert_eq!(bus.read_u8(0x73), 0x11);
}

#[test]
fn register_access_acknowledges_like_the_guest() {
    let (_bus, clock, irq, rtc) = manual_rtc(RtcConfig::default());
    rtc.write_register(CmosReg::STATUS_B.0, 0x12);
    clock.set_monotonic_ns(SEC);
    rtc.lock().poll(SEC);
    assert!(irq.is_high());
    assert!(rtc.irq_asserted());

    assert_eq!(rtc.peek_cmos_byte(CmosReg::STATUS_C.0), 0x90);
    assert!(rtc.irq_asserted());
    assert_eq!(rtc.read_register(CmosReg::STATUS_C.0), 0x90);
    assert_eq!(rtc.read_register(CmosReg::STATUS_C.0), 0x00);
    assert!(!irq.is_high());
    assert_eq!(rtc.stats().acks, 2);
}

#[test]
fn cmos_byte_read_leaves_pending_interrupt() {
    let (_bus, clock, irq, rtc) = manual_rtc(RtcConfig::default());
    rtc.write_register(CmosReg::STATUS_B.0, 0x12);
    clock.set_monotonic_ns(SEC);
    rtc.lock().poll(SEC);
    assert!(irq.is_high());

    assert_eq!(rtc.get_cmos_byte(CmosReg::STATUS_C.0), 0x90);
    assert_eq!(rtc.get_cmos_byte(CmosReg::STATUS_C.0), 0x90);
    assert!(irq.is_high());
    assert_eq!(rtc.peek_cmos_byte(CmosReg::STATUS_C.0), 0x90);
    assert_eq!(rtc.stats().acks, 0);
    assert_eq!(rtc.stats().register_reads, 0);
}

#[test]
fn cmos_byte_write_has_no_side_effects() {
    let (_bus, clock, _irq, rtc) = manual_rtc(RtcConfig::default());
    clock.set_monotonic_ns(600 * MS);
    rtc.set_cmos_byte(CmosReg::SECONDS.0, 0x30);
    assert_eq!(rtc.get_cmos_byte(CmosReg::SECONDS.0), 0x30);
    // The clock was not re-latched: the next update still lands at 1 s and rewrites it.
    assert_eq!(rtc.lock().next_deadline(), Some(SEC));
    assert_eq!(rtc.guest_time().assume_utc().unix_timestamp(), Y2K);

    rtc.set_cmos_byte(CmosReg::STATUS_B.0, 0x42);
    assert_eq!(rtc.get_cmos_byte(CmosReg::STATUS_B.0), 0x42);
    assert_eq!(rtc.lock().next_deadline(), Some(SEC));
    assert_eq!(rtc.stats().register_writes, 0);

    clock.set_monotonic_ns(SEC);
    rtc.lock().poll(SEC);
    assert_eq!(rtc.get_cmos_byte(CmosReg::SECONDS.0), 0x01);
}

#[test]
fn shutdown_cancels_all_timers() {
    let (bus, clock, _irq, rtc) = manual_rtc(RtcConfig::default());
    rtc.write_register(CmosReg::STATUS_B.0, 0x42);
    assert!(bus.next_deadline().is_some());
    rtc.shutdown();
    assert_eq!(bus.next_deadline(), None);

    clock.set_monotonic_ns(5 * SEC);
    rtc.lock().poll(5 * SEC);
    assert_eq!(rtc.stats().update_cycles, 0);
    assert_eq!(rtc.peek_cmos_byte(CmosReg::STATUS_C.0), 0);
}

#[test]
fn guest_time_follows_clock() {
    let (_bus, clock, _irq, rtc) = manual_rtc(RtcConfig::default());
    clock.set_monotonic_ns(3 * SEC);
    rtc.lock().poll(3 * SEC);
    assert_eq!(rtc.guest_time().assume_utc().unix_timestamp(), Y2K + 3);
}

#[test]
fn irq_sink_sees_one_edge_per_update() {
    init_tracing();
    let mut seq = Sequence::new();
    let mut pic = MockPic::new();
    for level in [true, false, true, false] {
        let _ = pic
            .expect_set_level()
            .with(eq(level))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
    }
    let clock = ManualClock::from_unix_secs(Y2K);
    let mut bus = IoBus::new();
    let rtc = init_with_config(
        &mut bus,
        RtcConfig::default(),
        Box::new(clock.clone()),
        Box::new(pic),
    )
    .unwrap();
    rtc.write_register(CmosReg::STATUS_B.0, 0x12);

    clock.set_monotonic_ns(SEC);
    bus.poll(SEC);
    let _ = rtc.read_register(CmosReg::STATUS_C.0);
    clock.set_monotonic_ns(2 * SEC);
    bus.poll(2 * SEC);
    // Unacknowledged: later updates set UF again without a new edge.
    clock.set_monotonic_ns(3 * SEC);
    bus.poll(3 * SEC);
    // Shutdown lowers the line.
    rtc.shutdown();
}
