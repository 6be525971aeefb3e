//! Interrupt line plumbing.
//!
//! The device drives exactly one level-triggered line. `IrqSink` is the boundary to whatever
//! interrupt controller sits behind it; `IrqLine` wraps a sink and only forwards real
//! transitions, so a sink sees strictly alternating raise/lower calls.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tracing::trace;

/// Receiver of interrupt line level changes (an interrupt controller input pin).
pub trait IrqSink: Send {
    /// Drives the line high (`true`) or low (`false`).
    fn set_level(&mut self, high: bool);
}

/// Edge-tracking wrapper around an [`IrqSink`].
pub struct IrqLine {
    irq: u32,
    sink: Box<dyn IrqSink>,
    asserted: bool,
    raises: u64,
    lowers: u64,
}

impl IrqLine {
    /// Creates a deasserted line numbered `irq` that forwards to `sink`.
    pub fn new(irq: u32, sink: Box<dyn IrqSink>) -> Self {
        Self {
            irq,
            sink,
            asserted: false,
            raises: 0,
            lowers: 0,
        }
    }

    /// Line number.
    pub const fn irq(&self) -> u32 {
        self.irq
    }

    /// Current level.
    pub const fn is_asserted(&self) -> bool {
        self.asserted
    }

    /// Number of low-to-high transitions so far.
    pub const fn raises(&self) -> u64 {
        self.raises
    }

    /// Number of high-to-low transitions so far.
    pub const fn lowers(&self) -> u64 {
        self.lowers
    }

    /// Sets the level; returns `true` if this was a transition.
    pub fn set(&mut self, high: bool) -> bool {
        if high == self.asserted {
            return false;
        }
        self.asserted = high;
        if high {
            self.raises += 1;
        } else {
            self.lowers += 1;
        }
        trace!(irq = self.irq, high, "irq edge");
        self.sink.set_level(high);
        true
    }
}

impl fmt::Debug for IrqLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IrqLine")
            .field("irq", &self.irq)
            .field("asserted", &self.asserted)
            .field("raises", &self.raises)
            .field("lowers", &self.lowers)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
struct LatchedState {
    level: AtomicBool,
    raises: AtomicU64,
    lowers: AtomicU64,
}

/// Sink that records the line level and edge counts; clones share one record.
///
/// Used by the simulator and by embedders that poll the line instead of wiring a controller.
#[derive(Debug, Clone, Default)]
pub struct LatchedIrq {
    state: Arc<LatchedState>,
}

impl LatchedIrq {
    /// Creates a low line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current level.
    pub fn is_high(&self) -> bool {
        self.state.level.load(Ordering::SeqCst)
    }

    /// Number of raise calls observed.
    pub fn raises(&self) -> u64 {
        self.state.raises.load(Ordering::SeqCst)
    }

    /// Number of lower calls observed.
    pub fn lowers(&self) -> u64 {
        self.state.lowers.load(Ordering::SeqCst)
    }
}

impl IrqSink for LatchedIrq {
    fn set_level(&mut self, high: bool) {
        self.state.level.store(high, Ordering::SeqCst);
        let counter = if high {
            &self.state.raises
        } else {
            &self.state.lowers
        };
        let _ = counter.fetch_add(1, Ordering::SeqCst);
    }
}
