//! Board-agnostic link-layer driver for the jdwire single-wire bus
//!
//! This crate contains the bus logic that does not depend on specific
//! hardware implementations:
//!
//! - Receive path: low-pulse detection, header guard, frame deadline
//! - Transmit path: randomized arbitration, collision retry
//! - Periodic tick and announce scheduling
//! - Fault classification and diagnostics counters
//! - Timing configuration
//!
//! Hardware comes in through the `jdwire-hal` traits and the application
//! through [`traits::BusApp`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod diagnostics;
pub mod link;
pub mod safety;
pub mod scheduler;
pub mod state;
pub mod traits;

#[cfg(test)]
mod testing;

pub use config::{BusConfig, ConfigError};
pub use diagnostics::Diagnostics;
pub use link::{BusDriver, BusStatus, Parts, Platform};
pub use safety::{Fault, FaultMonitor, FaultSink, LinkHealth, Severity};
pub use state::{RxState, TimerEvent, TxState};
pub use traits::{BusApp, Rejected};
