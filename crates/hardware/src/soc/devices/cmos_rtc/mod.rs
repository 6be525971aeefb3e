//! MC146818 CMOS real-time clock.
//!
//! This module implements the RTC found at ports 0x70-0x73 on PC platforms. It provides:
//! 1. **Register file:** 256 bytes behind an index/data port pair, with an extended index
//!    port for the upper bank.
//! 2. **Clock:** Time and date registers kept in step with a host-derived time base, in BCD or
//!    binary and 12- or 24-hour format.
//! 3. **Interrupts:** Periodic, update-ended, and alarm flags in register C driving one IRQ
//!    line, with coalescing and reinjection of periodic ticks the guest could not keep up with.
//! 4. **Host events:** Host clock resets, suspend/resume, and snapshots.
//!
//! The device owns no threads. Its timers are deadlines on the host monotonic clock; an event
//! loop asks for [`CmosRtc::next_deadline`] and calls [`CmosRtc::poll`] once it has passed.
//! Guest port accesses poll first, so the guest never observes an overdue timer.

/// Alarm matcher.
pub mod alarm;

/// Time register codec.
pub mod codec;

/// Periodic tick coalescing and reinjection.
pub mod coalesce;

/// Periodic interrupt scheduler.
pub mod periodic;

/// Register map and status register layouts.
pub mod regs;

/// Save/restore image.
pub mod snapshot;

/// Update cycle controller and lost-tick handling.
pub mod update;

use std::fmt;

use time::{OffsetDateTime, PrimitiveDateTime};
use tracing::{debug, trace, warn};

use crate::clock::HostClock;
use crate::common::constants::{
    CMOS_SIZE, EXTENDED_BANK_BASE, NANOS_PER_SEC, NMI_DISABLE_BIT, PORT_DATA, PORT_EXT_DATA,
    PORT_EXT_INDEX, PORT_INDEX, RTC_PORT_COUNT, UIP_WINDOW_NS,
};
use crate::common::error::SnapshotError;
use crate::config::{RtcConfig, SuspendMode};
use crate::soc::irq::{IrqLine, IrqSink};
use crate::soc::traits::Device;
use crate::stats::RtcStats;

use self::alarm::AlarmRegisters;
use self::codec::{CodecMode, TimeRegisters, YearScheme};
use self::coalesce::Coalescer;
use self::periodic::PeriodicTimer;
use self::regs::{
    CmosReg, PERIODIC_RATE_TICKS, REG_A_POWER_ON, REG_B_POWER_ON, REG_D_VALUE, StatusRegA,
    StatusRegB, StatusRegC,
};
use self::snapshot::RtcSnapshot;
use self::update::UpdateController;

/// Value returned by the write-only index ports.
const INDEX_PORT_READ: u8 = 0xFF;

/// Host and guest time recorded at suspend.
#[derive(Debug, Clone, Copy)]
struct SuspendRecord {
    monotonic_ns: u64,
    wall_ns: i128,
    guest_ns: i128,
}

/// MC146818-compatible RTC and CMOS RAM.
pub struct CmosRtc {
    cmos: [u8; CMOS_SIZE],
    index: u8,
    nmi_masked: bool,
    config: RtcConfig,
    clock: Box<dyn HostClock>,
    irq: IrqLine,
    update: UpdateController,
    periodic: PeriodicTimer,
    coalesce: Coalescer,
    stats: RtcStats,
    suspended: Option<SuspendRecord>,
    shut_down: bool,
}

impl CmosRtc {
    /// Creates a running RTC showing the configured start time (or the host wall clock).
    ///
    /// `config` is expected to have passed [`RtcConfig::validate`].
    pub fn new(config: RtcConfig, clock: Box<dyn HostClock>, irq: Box<dyn IrqSink>) -> Self {
        let now = clock.monotonic_ns();
        let start_ns = config
            .start_time
            .map_or_else(|| clock.wall_ns(), |secs| i128::from(secs) * NANOS_PER_SEC as i128);
        let guest_ns = start_ns + i128::from(config.utc_offset_secs) * NANOS_PER_SEC as i128;

        let mut cmos = [0u8; CMOS_SIZE];
        cmos[usize::from(CmosReg::STATUS_A.0)] = REG_A_POWER_ON;
        cmos[usize::from(CmosReg::STATUS_B.0)] = REG_B_POWER_ON;
        cmos[usize::from(CmosReg::STATUS_D.0)] = REG_D_VALUE;

        let mut rtc = Self {
            cmos,
            index: 0,
            nmi_masked: false,
            update: UpdateController::new(&config, now, guest_ns),
            coalesce: Coalescer::new(config.max_coalesced),
            irq: IrqLine::new(config.irq, irq),
            periodic: PeriodicTimer::new(),
            stats: RtcStats::default(),
            suspended: None,
            shut_down: false,
            clock,
            config,
        };
        let _ = rtc.store_time(rtc.update.clock_secs());
        rtc.update.start();
        debug!(
            io_base = rtc.config.io_base,
            irq = rtc.config.irq,
            base_year = rtc.config.base_year,
            secs = rtc.update.clock_secs(),
            "cmos rtc created"
        );
        rtc
    }

    /// Static configuration of this instance.
    pub const fn config(&self) -> &RtcConfig {
        &self.config
    }

    /// Counters collected since creation.
    pub const fn stats(&self) -> &RtcStats {
        &self.stats
    }

    /// Current level of the IRQ line.
    pub const fn irq_asserted(&self) -> bool {
        self.irq.is_asserted()
    }

    /// Register addressed by the next data port access.
    pub const fn selected_index(&self) -> u8 {
        self.index
    }

    /// NMI mask bit from the last standard index port write.
    pub const fn nmi_masked(&self) -> bool {
        self.nmi_masked
    }

    /// Periodic ticks awaiting reinjection.
    pub const fn coalesced(&self) -> u32 {
        self.coalesce.count()
    }

    /// Returns whether the update cycle is running (SET clear, divider running).
    pub const fn clock_running(&self) -> bool {
        self.update.is_running()
    }

    fn now(&self) -> u64 {
        self.clock.monotonic_ns()
    }

    fn reg_a(&self) -> StatusRegA {
        StatusRegA::from_bits(self.cmos[usize::from(CmosReg::STATUS_A.0)])
    }

    fn reg_b(&self) -> StatusRegB {
        StatusRegB::from_bits(self.cmos[usize::from(CmosReg::STATUS_B.0)])
    }

    fn reg_c(&self) -> StatusRegC {
        StatusRegC::from_bits(self.cmos[usize::from(CmosReg::STATUS_C.0)])
    }

    fn set_reg_c(&mut self, c: StatusRegC) {
        self.cmos[usize::from(CmosReg::STATUS_C.0)] = c.into_bits();
    }

    fn mode(&self) -> CodecMode {
        CodecMode::from_reg_b(self.reg_b())
    }

    fn year_scheme(&self) -> YearScheme {
        if self.config.century_register.is_some() {
            YearScheme::Century
        } else {
            YearScheme::BaseOffset(self.config.base_year)
        }
    }

    const fn clock_should_run(a: StatusRegA, b: StatusRegB) -> bool {
        !b.set() && a.oscillator_running()
    }

    fn reg(&self, reg: CmosReg) -> u8 {
        self.cmos[usize::from(reg.0)]
    }

    fn time_registers(&self) -> TimeRegisters {
        TimeRegisters {
            seconds: self.reg(CmosReg::SECONDS),
            minutes: self.reg(CmosReg::MINUTES),
            hours: self.reg(CmosReg::HOURS),
            day_of_week: self.reg(CmosReg::DAY_OF_WEEK),
            day_of_month: self.reg(CmosReg::DAY_OF_MONTH),
            month: self.reg(CmosReg::MONTH),
            year: self.reg(CmosReg::YEAR),
            century: self.config.century_register.map(|i| self.cmos[usize::from(i)]),
        }
    }

    fn alarm_registers(&self) -> AlarmRegisters {
        AlarmRegisters {
            seconds: self.reg(CmosReg::SECONDS_ALARM),
            minutes: self.reg(CmosReg::MINUTES_ALARM),
            hours: self.reg(CmosReg::HOURS_ALARM),
        }
    }

    fn datetime_from_secs(secs: i64) -> PrimitiveDateTime {
        OffsetDateTime::from_unix_timestamp(secs).map_or(PrimitiveDateTime::MIN, |t| {
            PrimitiveDateTime::new(t.date(), t.time())
        })
    }

    /// Calendar time currently shown by the time registers' clock.
    pub fn clock_time(&self) -> PrimitiveDateTime {
        Self::datetime_from_secs(self.update.clock_secs())
    }

    /// Guest time in nanoseconds since the Unix epoch, as seen by the time base right now.
    pub fn guest_time_ns(&self) -> i128 {
        self.update.guest_ns(self.now())
    }

    /// Encodes `secs` into the time registers in the current mode.
    fn store_time(&mut self, secs: i64) -> PrimitiveDateTime {
        let dt = Self::datetime_from_secs(secs);
        let regs = codec::encode(dt, self.mode(), self.year_scheme());
        for (reg, val) in [
            (CmosReg::SECONDS, regs.seconds),
            (CmosReg::MINUTES, regs.minutes),
            (CmosReg::HOURS, regs.hours),
            (CmosReg::DAY_OF_WEEK, regs.day_of_week),
            (CmosReg::DAY_OF_MONTH, regs.day_of_month),
            (CmosReg::MONTH, regs.month),
            (CmosReg::YEAR, regs.year),
        ] {
            self.cmos[usize::from(reg.0)] = val;
        }
        if let (Some(index), Some(century)) = (self.config.century_register, regs.century) {
            self.cmos[usize::from(index)] = century;
        }
        dt
    }

    /// Decodes the time registers in `mode`; out-of-range fields are clamped.
    fn decode_time(&self, mode: CodecMode) -> i64 {
        let regs = self.time_registers();
        let decoded = codec::decode(&regs, mode, self.year_scheme());
        if decoded.clamped {
            warn!(?regs, datetime = ?decoded.datetime, "time registers out of range, clamped");
        }
        decoded.datetime.assume_utc().unix_timestamp()
    }

    fn latch_time_registers(&mut self, now: u64) {
        let secs = self.decode_time(self.mode());
        self.update.latch(now, secs);
    }

    /// Recomputes IRQF and the line from the pending and enabled flags.
    fn update_irq(&mut self) {
        let b = self.reg_b();
        let mut c = self.reg_c();
        let active = c.enabled_pending(b);
        c.set_irqf(active);
        self.set_reg_c(c);
        if self.irq.set(active) {
            if active {
                self.stats.irq_raises += 1;
            } else {
                self.stats.irq_lowers += 1;
            }
        }
    }

    fn update_in_progress(&self, now: u64) -> bool {
        self.update.is_running()
            && self
                .update
                .next_deadline()
                .is_some_and(|at| now < at && now >= at.saturating_sub(UIP_WINDOW_NS))
    }

    /// Earliest pending deadline among the update, periodic, and reinjection timers.
    pub fn next_deadline(&self) -> Option<u64> {
        [
            self.update.next_deadline(),
            self.periodic.next_deadline(),
            self.coalesce.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Services every timer due at host instant `now`.
    pub fn poll(&mut self, now: u64) {
        if self.shut_down {
            return;
        }

        let step = self.update.on_deadline(now);
        self.stats.discarded_secs += step.discarded;
        if step.evaluate {
            if step.slewed {
                self.stats.slewed_secs += 1;
            }
            self.run_update_cycle();
        }

        let fired = self.periodic.expire(now);
        if fired > 0 {
            self.periodic_fire(fired);
        }

        if self.coalesce.expire(now) {
            self.reinject();
        }

        self.update.observe(now);
    }

    /// Re-encodes the clock, sets UF, and evaluates the alarm.
    fn run_update_cycle(&mut self) {
        let dt = self.store_time(self.update.clock_secs());
        let mut c = self.reg_c();
        c.set_uf(true);
        if self
            .alarm_registers()
            .matches(self.mode(), dt.hour(), dt.minute(), dt.second())
        {
            trace!(time = ?dt.time(), "alarm");
            c.set_af(true);
            self.stats.alarms += 1;
        }
        self.set_reg_c(c);
        self.stats.update_cycles += 1;
        self.update_irq();
    }

    fn periodic_fire(&mut self, periods: u64) {
        self.stats.periodic_fires += periods;
        let mut c = self.reg_c();
        let mut backlog = periods - 1;
        if c.pf() {
            backlog += 1;
        } else {
            c.set_pf(true);
            self.set_reg_c(c);
        }
        if self.reg_b().pie() && backlog > 0 {
            let dropped = self.coalesce.absorb(backlog);
            self.stats.periodic_coalesced += backlog - dropped;
            self.stats.periodic_dropped += dropped;
        }
        trace!(periods, coalesced = self.coalesce.count(), "periodic fire");
        self.update_irq();
    }

    fn reinject(&mut self) {
        let mut c = self.reg_c();
        if !self.reg_b().pie() || c.pf() {
            return;
        }
        if self.coalesce.take_one() {
            c.set_pf(true);
            self.set_reg_c(c);
            self.stats.reinjected += 1;
            trace!(remaining = self.coalesce.count(), "periodic tick reinjected");
            self.update_irq();
        }
    }

    /// Reads register C: returns the pending flags (with IRQF), clears them, and lowers the line.
    ///
    /// If periodic ticks are backlogged and PIE is set, this acknowledgment schedules the next
    /// reinjection.
    pub fn read_and_clear(&mut self, now: u64) -> u8 {
        let val = self.reg_c().into_bits();
        self.set_reg_c(StatusRegC::new());
        self.stats.acks += 1;
        self.update_irq();
        if self.coalesce.count() > 0
            && self.reg_b().pie()
            && self.coalesce.next_deadline().is_none()
        {
            self.coalesce.arm(now, self.periodic.period_ns());
        }
        val
    }

    /// Drops the periodic backlog and cancels any pending reinjection.
    pub fn reset_reinjection(&mut self) {
        debug!(dropped = self.coalesce.count(), "reinjection reset");
        self.coalesce.reset();
    }

    /// Recomputes the periodic timer from registers A and B, restarting it relative to `now`.
    fn reprogram_periodic(&mut self, now: u64) {
        let a = self.reg_a();
        let b = self.reg_b();
        let ticks = PERIODIC_RATE_TICKS[usize::from(a.rate())];
        let armed = ticks != 0 && (b.pie() || b.sqwe()) && !a.divider_in_reset();
        if armed {
            let old = self.periodic.period_ticks();
            if old != ticks {
                debug!(rate = a.rate(), ticks, "periodic timer programmed");
                if old != 0 && self.coalesce.count() > 0 {
                    let scaled = u64::from(self.coalesce.count()) * u64::from(old)
                        / u64::from(ticks);
                    self.coalesce.set_count(scaled.min(u64::from(u32::MAX)) as u32);
                }
            }
            self.periodic.arm(now, ticks);
        } else {
            if self.periodic.is_armed() {
                debug!("periodic timer stopped");
            }
            self.periodic.disarm();
            self.coalesce.reset();
        }
    }

    fn write_reg_a(&mut self, val: u8, now: u64) {
        let b = self.reg_b();
        let old = self.reg_a();
        let new = StatusRegA::from_bits(val).with_uip(false);
        self.cmos[usize::from(CmosReg::STATUS_A.0)] = new.into_bits();

        let was = Self::clock_should_run(old, b);
        let is = Self::clock_should_run(new, b);
        if was && !is {
            debug!(divider = new.divider(), "clock halted by divider");
            self.update.halt();
        } else if !was && is {
            self.update.start_after_divider_reset(now);
        }
        self.reprogram_periodic(now);
    }

    fn write_reg_b(&mut self, val: u8, now: u64) {
        let old = self.reg_b();
        let mut new = StatusRegB::from_bits(val);
        if new.set() {
            new.set_uie(false);
        }

        let old_mode = CodecMode::from_reg_b(old);
        let new_mode = CodecMode::from_reg_b(new);
        if old_mode == new_mode {
            self.cmos[usize::from(CmosReg::STATUS_B.0)] = new.into_bits();
        } else {
            let secs = self.decode_time(old_mode);
            self.cmos[usize::from(CmosReg::STATUS_B.0)] = new.into_bits();
            let _ = self.store_time(secs);
            debug!(?new_mode, "data mode changed");
        }

        if old.set() && !new.set() {
            self.latch_time_registers(now);
        }

        let a = self.reg_a();
        let was = Self::clock_should_run(a, old);
        let is = Self::clock_should_run(a, new);
        if was && !is {
            debug!("SET: clock frozen");
            self.update.halt();
        } else if !was && is {
            debug!(secs = self.update.clock_secs(), "SET cleared: clock running");
            self.update.start();
        }

        self.reprogram_periodic(now);
        self.update_irq();
    }

    /// Returns what a guest read of register `index` would see, without side effects.
    pub fn peek_register(&self, index: u8) -> u8 {
        match CmosReg(index) {
            CmosReg::STATUS_A => self
                .reg_a()
                .with_uip(self.update_in_progress(self.now()))
                .into_bits(),
            CmosReg::STATUS_D => REG_D_VALUE,
            _ => self.cmos[usize::from(index)],
        }
    }

    /// Reads register `index` with register semantics (reading C acknowledges).
    pub fn read_register(&mut self, index: u8) -> u8 {
        let now = self.now();
        self.poll(now);
        self.stats.register_reads += 1;
        let val = match CmosReg(index) {
            CmosReg::STATUS_C => self.read_and_clear(now),
            _ => self.peek_register(index),
        };
        trace!(index, val, "cmos read");
        val
    }

    /// Writes register `index` with register semantics.
    pub fn write_register(&mut self, index: u8, val: u8) {
        let now = self.now();
        self.poll(now);
        self.stats.register_writes += 1;
        trace!(index, val, "cmos write");

        let reg = CmosReg(index);
        match reg {
            CmosReg::STATUS_A => self.write_reg_a(val, now),
            CmosReg::STATUS_B => self.write_reg_b(val, now),
            CmosReg::STATUS_C | CmosReg::STATUS_D => {}
            _ if reg.is_time() || self.config.century_register == Some(index) => {
                self.cmos[usize::from(index)] = val;
                if !self.reg_b().set() {
                    self.latch_time_registers(now);
                }
            }
            _ if reg.is_alarm() => {
                self.cmos[usize::from(index)] = val;
                debug!(?reg, val, "alarm programmed");
            }
            _ => self.cmos[usize::from(index)] = val,
        }
    }

    /// Stored byte at `index`, bypassing register semantics.
    ///
    /// Reading register C this way neither acknowledges nor lowers the line, and register A
    /// reports UIP as stored (always clear).
    pub const fn cmos_byte(&self, index: u8) -> u8 {
        self.cmos[index as usize]
    }

    /// Stores `val` at `index`, bypassing register semantics.
    ///
    /// Nothing is re-latched or re-armed: a time register written this way is overwritten by
    /// the next update cycle, and a status register takes effect only at the next guest write.
    pub fn set_cmos_byte(&mut self, index: u8, val: u8) {
        trace!(index, val, "cmos byte stored");
        self.cmos[usize::from(index)] = val;
    }

    /// Guest read of port `offset` (0 = index, 1 = data, 2 = extended index, 3 = extended data).
    pub fn io_read(&mut self, offset: u16) -> u8 {
        match offset {
            PORT_DATA | PORT_EXT_DATA => self.read_register(self.index),
            _ => INDEX_PORT_READ,
        }
    }

    /// Guest write of port `offset`.
    pub fn io_write(&mut self, offset: u16, val: u8) {
        match offset {
            PORT_INDEX => {
                self.index = val & !NMI_DISABLE_BIT;
                self.nmi_masked = val & NMI_DISABLE_BIT != 0;
            }
            PORT_EXT_INDEX => self.index = val | EXTENDED_BANK_BASE,
            PORT_DATA | PORT_EXT_DATA => self.write_register(self.index, val),
            _ => {}
        }
    }

    /// Re-anchors after the host monotonic clock jumped to `now`.
    ///
    /// Guest time continues from the latest value the guest could have observed, and every
    /// timer is rescheduled relative to `now`.
    pub fn notify_clock_reset(&mut self, now: u64) {
        self.stats.clock_resets += 1;
        self.update.clock_reset(now);
        if self.periodic.is_armed() {
            let ticks = self.periodic.period_ticks();
            self.periodic.arm(now, ticks);
        }
        if self.coalesce.next_deadline().is_some() {
            self.coalesce.arm(now, self.periodic.period_ns());
        }
        debug!(now, secs = self.update.clock_secs(), "host clock reset");
    }

    /// Records host and guest time at the start of a host suspend.
    pub fn notify_suspend(&mut self) {
        let now = self.now();
        self.poll(now);
        self.suspended = Some(SuspendRecord {
            monotonic_ns: now,
            wall_ns: self.clock.wall_ns(),
            guest_ns: self.update.guest_ns(now),
        });
        debug!(now, "host suspend");
    }

    /// Reconciles guest time after a host suspend and re-latches the clock without replaying
    /// the missed seconds.
    pub fn notify_resume(&mut self) {
        let Some(record) = self.suspended.take() else {
            warn!("resume without matching suspend");
            return;
        };
        let now = self.now();
        if self.update.is_running() {
            match self.config.suspend_mode {
                SuspendMode::Running => {
                    let monotonic_gap = i128::from(now.saturating_sub(record.monotonic_ns));
                    let wall_gap = self.clock.wall_ns() - record.wall_ns;
                    let missed = (wall_gap - monotonic_gap).max(0);
                    self.update.shift(now, missed);
                    debug!(missed_ns = %missed, "host resume");
                }
                SuspendMode::Frozen => {
                    self.update.reanchor(now, record.guest_ns);
                    debug!("host resume, guest time frozen across suspend");
                }
            }
            let _ = self.store_time(self.update.clock_secs());
        }
        if self.periodic.is_armed() {
            let ticks = self.periodic.period_ticks();
            self.periodic.arm(now, ticks);
        }
        if self.coalesce.next_deadline().is_some() {
            self.coalesce.arm(now, self.periodic.period_ns());
        }
        self.stats.resumes += 1;
    }

    /// Cancels every timer and lowers the line. The register file stays accessible.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.update.halt();
        self.periodic.disarm();
        self.coalesce.reset();
        let _ = self.irq.set(false);
        self.shut_down = true;
        debug!("cmos rtc shut down");
    }

    /// Captures the guest-visible state.
    pub fn snapshot(&mut self) -> RtcSnapshot {
        let now = self.now();
        self.poll(now);
        let guest_ns = self.update.guest_ns(now);
        RtcSnapshot {
            index: self.index,
            nmi_masked: self.nmi_masked,
            cmos: self.cmos.to_vec(),
            guest_secs: guest_ns.div_euclid(NANOS_PER_SEC as i128) as i64,
            guest_subsec_ns: guest_ns.rem_euclid(NANOS_PER_SEC as i128) as u32,
            coalesced: self.coalesce.count(),
        }
    }

    /// Replaces the device state with `snapshot`, rescheduling timers relative to now.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::ImageSize`] if the register image is not 256 bytes; the
    /// device is left unchanged.
    pub fn restore(&mut self, snapshot: &RtcSnapshot) -> Result<(), SnapshotError> {
        let image = snapshot.cmos_image()?;
        let now = self.now();

        self.cmos = image;
        let a = self.reg_a().with_uip(false);
        self.cmos[usize::from(CmosReg::STATUS_A.0)] = a.into_bits();
        self.cmos[usize::from(CmosReg::STATUS_D.0)] = REG_D_VALUE;
        self.index = snapshot.index;
        self.nmi_masked = snapshot.nmi_masked;

        let guest_ns = i128::from(snapshot.guest_secs) * NANOS_PER_SEC as i128
            + i128::from(snapshot.guest_subsec_ns);
        self.update.halt();
        self.update.reanchor(now, guest_ns);
        if Self::clock_should_run(self.reg_a(), self.reg_b()) {
            self.update.start();
        }

        self.periodic.disarm();
        self.coalesce.reset();
        self.reprogram_periodic(now);
        if self.periodic.is_armed() {
            self.coalesce.set_count(snapshot.coalesced);
        }
        self.update_irq();
        debug!(secs = snapshot.guest_secs, "cmos rtc restored");
        Ok(())
    }
}

impl Drop for CmosRtc {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for CmosRtc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CmosRtc")
            .field("index", &self.index)
            .field("clock_secs", &self.update.clock_secs())
            .field("reg_a", &self.reg_a())
            .field("reg_b", &self.reg_b())
            .field("reg_c", &self.reg_c())
            .field("coalesced", &self.coalesce.count())
            .field("irq", &self.irq)
            .finish_non_exhaustive()
    }
}

impl Device for CmosRtc {
    fn name(&self) -> &'static str {
        "CMOS-RTC"
    }

    fn port_range(&self) -> (u16, u16) {
        (self.config.io_base, RTC_PORT_COUNT)
    }

    fn io_read(&mut self, offset: u16) -> u8 {
        Self::io_read(self, offset)
    }

    fn io_write(&mut self, offset: u16, val: u8) {
        Self::io_write(self, offset, val);
    }

    fn poll(&mut self, now_ns: u64) {
        Self::poll(self, now_ns);
    }

    fn next_deadline(&self) -> Option<u64> {
        Self::next_deadline(self)
    }

    fn get_irq_id(&self) -> Option<u32> {
        Some(self.irq.irq())
    }
}
