//! Deterministic event loop around one RTC.
//!
//! The simulator plays the part of the VMM: it owns a manual host clock and the I/O bus,
//! advances time from one device deadline to the next, and, acting as a guest interrupt
//! handler, acknowledges the RTC by reading register C whenever the line is high. Host
//! misbehaviour (stalls, suspends, clock resets) can be injected between runs.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::clock::{HostClock, ManualClock};
use crate::common::constants::{PORT_DATA, PORT_INDEX};
use crate::common::error::ConfigError;
use crate::config::RtcConfig;
use crate::soc::builder::{RtcHandle, init_with_config};
use crate::soc::devices::cmos_rtc::regs::{CmosReg, StatusRegB, StatusRegC};
use crate::soc::interconnect::IoBus;
use crate::soc::irq::LatchedIrq;
use crate::stats::RtcStats;

/// Host wall-clock time the simulator starts at when the config has no start time
/// (2000-01-01T00:00:00Z).
pub const DEFAULT_EPOCH_SECS: i64 = 946_684_800;

/// Flags seen by the simulated interrupt handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IsrCounts {
    /// Handler invocations (register C reads).
    pub acks: u64,
    /// Acknowledgments that reported PF.
    pub periodic: u64,
    /// Acknowledgments that reported UF.
    pub update: u64,
    /// Acknowledgments that reported AF.
    pub alarm: u64,
}

/// Summary of a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    /// Simulated host time in nanoseconds.
    pub host_ns: u64,
    /// Calendar time held by the RTC at the end of the run.
    pub guest_time: String,
    /// Interrupt handler observations.
    pub isr: IsrCounts,
    /// Device counters.
    pub rtc: RtcStats,
}

/// Event loop driving one RTC on a [`ManualClock`].
#[derive(Debug)]
pub struct Simulator {
    clock: ManualClock,
    bus: IoBus,
    rtc: RtcHandle,
    irq: LatchedIrq,
    io_base: u16,
    auto_ack: bool,
    isr: IsrCounts,
}

impl Simulator {
    /// Builds a bus with one RTC configured by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn new(config: RtcConfig) -> Result<Self, ConfigError> {
        let clock = ManualClock::from_unix_secs(config.start_time.unwrap_or(DEFAULT_EPOCH_SECS));
        let irq = LatchedIrq::new();
        let io_base = config.io_base;
        let mut bus = IoBus::new();
        let rtc = init_with_config(
            &mut bus,
            config,
            Box::new(clock.clone()),
            Box::new(irq.clone()),
        )?;
        Ok(Self {
            clock,
            bus,
            rtc,
            irq,
            io_base,
            auto_ack: true,
            isr: IsrCounts::default(),
        })
    }

    /// Enables or disables the simulated interrupt handler.
    pub fn set_auto_ack(&mut self, enabled: bool) {
        self.auto_ack = enabled;
    }

    /// Shared handle to the device.
    pub const fn rtc(&self) -> &RtcHandle {
        &self.rtc
    }

    /// The simulator's host clock.
    pub const fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Interrupt line as seen by the platform.
    pub const fn irq(&self) -> &LatchedIrq {
        &self.irq
    }

    /// Handler observations so far.
    pub const fn isr(&self) -> IsrCounts {
        self.isr
    }

    /// Writes `val` to register `index` through the index and data ports.
    pub fn guest_write(&mut self, index: u8, val: u8) {
        self.bus.write_u8(self.io_base.wrapping_add(PORT_INDEX), index);
        self.bus.write_u8(self.io_base.wrapping_add(PORT_DATA), val);
    }

    /// Reads register `index` through the index and data ports.
    pub fn guest_read(&mut self, index: u8) -> u8 {
        self.bus.write_u8(self.io_base.wrapping_add(PORT_INDEX), index);
        self.bus.read_u8(self.io_base.wrapping_add(PORT_DATA))
    }

    fn modify_reg_b(&mut self, f: impl FnOnce(StatusRegB) -> StatusRegB) {
        let b = StatusRegB::from_bits(self.guest_read(CmosReg::STATUS_B.0));
        self.guest_write(CmosReg::STATUS_B.0, f(b).into_bits());
    }

    /// Programs rate-select code `rate` and enables the periodic interrupt.
    pub fn enable_periodic(&mut self, rate: u8) {
        let a = self.guest_read(CmosReg::STATUS_A.0);
        self.guest_write(CmosReg::STATUS_A.0, (a & 0xF0) | (rate & 0x0F));
        self.modify_reg_b(|b| b.with_pie(true));
    }

    /// Enables the update-ended interrupt.
    pub fn enable_update(&mut self) {
        self.modify_reg_b(|b| b.with_uie(true));
    }

    /// Programs the alarm registers (raw values; `0xC0` and above match anything) and
    /// enables the alarm interrupt.
    pub fn enable_alarm(&mut self, hours: u8, minutes: u8, seconds: u8) {
        self.guest_write(CmosReg::HOURS_ALARM.0, hours);
        self.guest_write(CmosReg::MINUTES_ALARM.0, minutes);
        self.guest_write(CmosReg::SECONDS_ALARM.0, seconds);
        self.modify_reg_b(|b| b.with_aie(true));
    }

    /// Reads register C like an interrupt handler and records what it reported.
    pub fn ack(&mut self) -> StatusRegC {
        let c = StatusRegC::from_bits(self.guest_read(CmosReg::STATUS_C.0));
        self.isr.acks += 1;
        self.isr.periodic += u64::from(c.pf());
        self.isr.update += u64::from(c.uf());
        self.isr.alarm += u64::from(c.af());
        c
    }

    fn service(&mut self, now: u64) {
        self.clock.set_monotonic_ns(now);
        self.bus.poll(now);
        if self.auto_ack && self.irq.is_high() {
            let _ = self.ack();
        }
    }

    /// Runs the event loop for `duration` of host time.
    pub fn run_for(&mut self, duration: Duration) {
        let target = self
            .clock
            .monotonic_ns()
            .saturating_add(duration.as_nanos() as u64);
        while let Some(deadline) = self.bus.next_deadline() {
            if deadline > target {
                break;
            }
            let now = deadline.max(self.clock.monotonic_ns());
            self.service(now);
        }
        self.service(target);
    }

    /// Advances host time without running the loop, as if the VMM thread were descheduled.
    pub fn stall(&mut self, duration: Duration) {
        debug!(?duration, "stall");
        self.clock.advance(duration);
    }

    /// Suspends the host for `gap` of wall-clock time during which the monotonic clock stops.
    pub fn suspend(&mut self, gap: Duration) {
        self.rtc.notify_suspend();
        self.clock.suspend_for(gap);
        self.rtc.notify_resume();
    }

    /// Moves the host monotonic clock to `ns` and notifies the device.
    pub fn clock_reset(&mut self, ns: u64) {
        self.clock.set_monotonic_ns(ns);
        self.rtc.notify_clock_reset(ns);
    }

    /// Summarizes the run so far.
    pub fn report(&self) -> SimReport {
        let report = SimReport {
            host_ns: self.clock.monotonic_ns(),
            guest_time: format!("{:?}", self.rtc.guest_time()),
            isr: self.isr,
            rtc: self.rtc.stats(),
        };
        info!(host_ns = report.host_ns, acks = report.isr.acks, "simulation report");
        report
    }
}
