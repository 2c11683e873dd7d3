//! Fault monitor implementation
//!
//! A ready-made [`FaultSink`] that remembers what went wrong so the board's
//! main loop can decide whether to keep going.

use super::fault::{Fault, FaultSink};

/// Link health as seen by the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkHealth {
    /// No faults since the last acknowledge
    Ok,
    /// Recoverable faults occurred; the latest one is attached
    Degraded(Fault),
    /// A fatal fault occurred; the driver must not be used any more
    Halted(Fault),
}

/// Fault monitor
#[derive(Debug, Clone, Default)]
pub struct FaultMonitor {
    /// Most recent recoverable fault
    last: Option<Fault>,
    /// Recoverable faults since start
    recoverable_count: u32,
    /// First fatal fault, if any
    fatal: Option<Fault>,
}

impl FaultMonitor {
    /// Create a new fault monitor
    pub const fn new() -> Self {
        Self {
            last: None,
            recoverable_count: 0,
            fatal: None,
        }
    }

    /// Current link health; a fatal fault takes precedence
    pub fn check(&self) -> LinkHealth {
        if let Some(fault) = self.fatal {
            return LinkHealth::Halted(fault);
        }
        match self.last {
            Some(fault) => LinkHealth::Degraded(fault),
            None => LinkHealth::Ok,
        }
    }

    /// Most recent recoverable fault
    pub fn last_fault(&self) -> Option<Fault> {
        self.last
    }

    /// Number of recoverable faults seen
    pub fn recoverable_count(&self) -> u32 {
        self.recoverable_count
    }

    /// Fatal fault, if one was escalated
    pub fn fatal_fault(&self) -> Option<Fault> {
        self.fatal
    }

    /// Forget recoverable faults; a fatal fault is sticky
    pub fn acknowledge(&mut self) {
        self.last = None;
    }
}

impl FaultSink for FaultMonitor {
    fn signal(&mut self, fault: Fault) {
        self.last = Some(fault);
        self.recoverable_count = self.recoverable_count.saturating_add(1);
    }

    fn fatal(&mut self, fault: Fault) {
        if self.fatal.is_none() {
            self.fatal = Some(fault);
        }
    }
}
