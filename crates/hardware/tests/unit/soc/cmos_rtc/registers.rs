//! # Register Protocol Tests
//!
//! Verifies the index/data protocol, the extended bank, and the side effects of writes to
//! status registers A and B.

use std::time::Duration;

use pretty_assertions::assert_eq;

use rtcsim_core::soc::devices::cmos_rtc::regs::CmosReg;

use crate::common::harness::{MS, SEC, TestRtc, Y2K};

/// 2021-06-15T13:45:30Z.
const JUNE_15_2021: i64 = 1_623_764_730;

#[test]
fn power_on_values() {
    let mut t = TestRtc::new();
    assert_eq!(t.read(CmosReg::STATUS_A.0), 0x26);
    assert_eq!(t.read(CmosReg::STATUS_B.0), 0x02);
    assert_eq!(t.read(CmosReg::STATUS_C.0), 0x00);
    assert_eq!(t.read(CmosReg::STATUS_D.0), 0x80);
    assert_eq!(t.read(CmosReg::SECONDS.0), 0x00);
    assert_eq!(t.read(CmosReg::DAY_OF_WEEK.0), 0x07);
    assert_eq!(t.read(CmosReg::DAY_OF_MONTH.0), 0x01);
    assert_eq!(t.read(CmosReg::MONTH.0), 0x01);
    assert_eq!(t.read(CmosReg::YEAR.0), 0x00);
    assert!(!t.irq.is_high());
}

#[test]
fn index_port_bit7_is_nmi_mask() {
    let mut t = TestRtc::new();
    t.rtc.io_write(0, 0x8A);
    assert_eq!(t.rtc.selected_index(), 0x0A);
    assert!(t.rtc.nmi_masked());
    assert_eq!(t.rtc.io_read(1), 0x26);

    t.rtc.io_write(0, 0x0A);
    assert!(!t.rtc.nmi_masked());
}

#[test]
fn index_ports_read_open_bus() {
    let mut t = TestRtc::new();
    assert_eq!(t.rtc.io_read(0), 0xFF);
    assert_eq!(t.rtc.io_read(2), 0xFF);
}

#[test]
fn extended_bank_is_separate_storage() {
    let mut t = TestRtc::new();
    t.rtc.io_write(2, 0x10);
    assert_eq!(t.rtc.selected_index(), 0x90);
    t.rtc.io_write(3, 0x55);
    assert_eq!(t.rtc.peek_register(0x90), 0x55);
    assert_eq!(t.read(0x10), 0x00);
}

#[test]
fn nvram_is_plain_storage() {
    let mut t = TestRtc::new();
    t.write(0x40, 0xAB);
    assert_eq!(t.read(0x40), 0xAB);
    assert_eq!(t.read(CmosReg::SECONDS.0), 0x00);
}

#[test]
fn data_access_reuses_last_index() {
    let mut t = TestRtc::new();
    t.rtc.io_write(0, 0x20);
    t.rtc.io_write(1, 1);
    t.rtc.io_write(1, 2);
    assert_eq!(t.rtc.io_read(1), 2);
    assert_eq!(t.rtc.io_read(1), 2);
}

#[test]
fn status_c_and_d_ignore_writes() {
    let mut t = TestRtc::new();
    t.write(CmosReg::STATUS_D.0, 0x00);
    assert_eq!(t.read(CmosReg::STATUS_D.0), 0x80);
    t.write(CmosReg::STATUS_C.0, 0xF0);
    assert_eq!(t.peek(CmosReg::STATUS_C), 0x00);
    assert!(!t.irq.is_high());
}

#[test]
fn status_a_write_masks_uip() {
    let mut t = TestRtc::new();
    t.write(CmosReg::STATUS_A.0, 0xA6);
    assert_eq!(t.read(CmosReg::STATUS_A.0), 0x26);
}

#[test]
fn uip_set_in_window_before_update() {
    let mut t = TestRtc::new();
    t.clock.set_monotonic_ns(SEC - 300_000);
    assert_eq!(t.read(CmosReg::STATUS_A.0) & 0x80, 0);
    t.clock.set_monotonic_ns(SEC - 100_000);
    assert_eq!(t.read(CmosReg::STATUS_A.0) & 0x80, 0x80);
    t.clock.set_monotonic_ns(SEC + 1);
    assert_eq!(t.read(CmosReg::STATUS_A.0) & 0x80, 0);
}

#[test]
fn setting_set_clears_uie() {
    let mut t = TestRtc::new();
    t.write(CmosReg::STATUS_B.0, 0x92);
    assert_eq!(t.read(CmosReg::STATUS_B.0), 0x82);
}

#[test]
fn set_freezes_clock_and_clear_latches() {
    let mut t = TestRtc::new();
    t.write(CmosReg::STATUS_B.0, 0x82);
    assert!(!t.rtc.clock_running());
    t.run_for(Duration::from_secs(3));
    assert_eq!(t.read(CmosReg::SECONDS.0), 0x00);
    assert_eq!(t.rtc.stats().update_cycles, 0);
    assert_eq!(t.read(CmosReg::STATUS_A.0) & 0x80, 0);

    t.write(CmosReg::SECONDS.0, 0x30);
    t.write(CmosReg::MINUTES.0, 0x15);
    assert_eq!(t.read(CmosReg::SECONDS.0), 0x30);
    assert_eq!(t.clock_secs(), Y2K);

    t.write(CmosReg::STATUS_B.0, 0x02);
    assert!(t.rtc.clock_running());
    assert_eq!(t.clock_secs(), Y2K + 15 * 60 + 30);

    t.run_for(Duration::from_secs(1));
    assert_eq!(t.read(CmosReg::SECONDS.0), 0x31);
}

#[test]
fn time_write_restarts_the_second() {
    let mut t = TestRtc::new();
    t.run_until(600 * MS);
    t.write(CmosReg::SECONDS.0, 0x10);
    t.run_until(1_500 * MS);
    assert_eq!(t.read(CmosReg::SECONDS.0), 0x10);
    t.run_until(1_600 * MS);
    assert_eq!(t.read(CmosReg::SECONDS.0), 0x11);
}

#[test]
fn data_mode_change_reencodes_time() {
    let mut t = TestRtc::starting_at(JUNE_15_2021);
    assert_eq!(t.read(CmosReg::HOURS.0), 0x13);

    t.write(CmosReg::STATUS_B.0, 0x06);
    assert_eq!(t.read(CmosReg::HOURS.0), 13);
    assert_eq!(t.read(CmosReg::MINUTES.0), 45);
    assert_eq!(t.read(CmosReg::YEAR.0), 21);

    t.write(CmosReg::STATUS_B.0, 0x00);
    assert_eq!(t.read(CmosReg::HOURS.0), 0x81);
    assert_eq!(t.read(CmosReg::MINUTES.0), 0x45);
    assert_eq!(t.clock_secs(), JUNE_15_2021);
}

#[test]
fn divider_reset_halts_and_restarts_half_second_later() {
    let mut t = TestRtc::new();
    t.run_until(200 * MS);
    t.write(CmosReg::STATUS_A.0, 0x76);
    assert!(!t.rtc.clock_running());
    t.run_for(Duration::from_secs(3));
    assert_eq!(t.rtc.stats().update_cycles, 0);
    assert_eq!(t.read(CmosReg::SECONDS.0), 0x00);

    t.write(CmosReg::STATUS_A.0, 0x26);
    assert!(t.rtc.clock_running());
    assert_eq!(t.rtc.next_deadline(), Some(3_200 * MS + 500 * MS));
    t.run_for(Duration::from_millis(490));
    assert_eq!(t.read(CmosReg::SECONDS.0), 0x00);
    t.run_for(Duration::from_millis(20));
    assert_eq!(t.read(CmosReg::SECONDS.0), 0x01);
}

#[test]
fn register_traffic_is_counted() {
    let mut t = TestRtc::new();
    t.write(0x30, 1);
    let _ = t.read(0x30);
    let _ = t.read(0x31);
    let stats = t.rtc.stats();
    assert_eq!(stats.register_writes, 1);
    assert_eq!(stats.register_reads, 2);
}
