//! Platform components.
//!
//! This module organizes the pieces an RTC is attached to: the port I/O bus, the interrupt
//! line, the device implementations, and the builder that wires a device onto a bus.

/// RTC construction and the shared handle.
pub mod builder;

/// Port-mapped device implementations.
pub mod devices;

/// Port I/O bus and routing.
pub mod interconnect;

/// Interrupt line and sinks.
pub mod irq;

/// Device trait definitions for port I/O.
pub mod traits;

pub use builder::{RtcHandle, init, init_with_config};
