//! Device statistics collection and reporting.
//!
//! This module tracks what the RTC has done since creation. It provides:
//! 1. **Periodic:** Timer fires, coalesced and dropped ticks, and reinjected edges.
//! 2. **Update:** Update cycles, alarms, and seconds discarded or replayed by the lost-tick policy.
//! 3. **Interrupts:** Line transitions and status register acknowledgments.
//! 4. **Host events:** Register traffic, host clock resets, and suspend/resume cycles.

use serde::Serialize;

/// Counters kept by one RTC instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RtcStats {
    /// Periodic timer expirations (every elapsed period counts once).
    pub periodic_fires: u64,
    /// Periodic ticks held back because PF was still pending.
    pub periodic_coalesced: u64,
    /// Periodic ticks lost because the backlog was full.
    pub periodic_dropped: u64,
    /// Backlogged ticks delivered after an acknowledgment.
    pub reinjected: u64,

    /// Update cycles evaluated (UF set).
    pub update_cycles: u64,
    /// Alarm matches (AF set).
    pub alarms: u64,
    /// Guest seconds skipped without an update cycle.
    pub discarded_secs: u64,
    /// Update cycles run behind the time base while catching up.
    pub slewed_secs: u64,

    /// Low-to-high transitions of the IRQ line.
    pub irq_raises: u64,
    /// High-to-low transitions of the IRQ line.
    pub irq_lowers: u64,
    /// Reads of register C.
    pub acks: u64,

    /// Data register reads.
    pub register_reads: u64,
    /// Data register writes.
    pub register_writes: u64,
    /// Host monotonic clock resets handled.
    pub clock_resets: u64,
    /// Suspend/resume cycles handled.
    pub resumes: u64,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"periodic"`, `"update"`, `"irq"`, `"host"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["periodic", "update", "irq", "host"];

impl RtcStats {
    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an empty slice to
    /// print all sections (same as `print()`).
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);

        println!("\n==========================================================");
        println!("MC146818 RTC STATISTICS");
        println!("==========================================================");
        if want("periodic") {
            let fires = self.periodic_fires.max(1);
            println!("PERIODIC INTERRUPT");
            println!("  periodic.fires         {}", self.periodic_fires);
            println!(
                "  periodic.coalesced     {} ({:.2}%)",
                self.periodic_coalesced,
                (self.periodic_coalesced as f64 / fires as f64) * 100.0
            );
            println!("  periodic.dropped       {}", self.periodic_dropped);
            println!("  periodic.reinjected    {}", self.reinjected);
            println!("----------------------------------------------------------");
        }
        if want("update") {
            println!("UPDATE CYCLE");
            println!("  update.cycles          {}", self.update_cycles);
            println!("  update.alarms          {}", self.alarms);
            println!("  update.discarded_secs  {}", self.discarded_secs);
            println!("  update.slewed_secs     {}", self.slewed_secs);
            println!("----------------------------------------------------------");
        }
        if want("irq") {
            println!("INTERRUPT LINE");
            println!("  irq.raises             {}", self.irq_raises);
            println!("  irq.lowers             {}", self.irq_lowers);
            println!("  irq.acks               {}", self.acks);
            println!("----------------------------------------------------------");
        }
        if want("host") {
            println!("HOST INTERFACE");
            println!("  io.reads               {}", self.register_reads);
            println!("  io.writes              {}", self.register_writes);
            println!("  host.clock_resets      {}", self.clock_resets);
            println!("  host.resumes           {}", self.resumes);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
