//! Simulation driver.
//!
//! Provides a deterministic event loop for exercising an RTC without a hypervisor.

/// Event loop, injected host events, and run reports.
pub mod simulator;

pub use simulator::{SimReport, Simulator};
