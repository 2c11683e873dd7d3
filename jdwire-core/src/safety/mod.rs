//! Fault classification and reporting
//!
//! Recoverable faults are counted and signalled; fatal faults are escalated.

pub mod fault;
pub mod monitor;

pub use fault::{Fault, FaultSink, Severity};
pub use monitor::{FaultMonitor, LinkHealth};
