//! Bus diagnostics counters
//!
//! Counters only ever grow (saturating) and are reset only by restarting
//! the driver.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Snapshot of the driver's fault and traffic counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnostics {
    /// Reserved; always 0
    pub bus_state: u32,
    /// Transmit start lost the line to another talker
    pub bus_lo_error: u32,
    /// Receive errors: transport error, short frame, checksum mismatch
    pub bus_uart_error: u32,
    /// Receptions abandoned by the header guard or frame deadline
    pub bus_timeout_error: u32,
    /// Frames whose transmission completed without error
    pub packets_sent: u32,
    /// Frames that passed validation
    pub packets_received: u32,
    /// Validated frames the application declined
    pub packets_dropped: u32,
}

impl Diagnostics {
    /// All counters at zero
    pub const fn new() -> Self {
        Self {
            bus_state: 0,
            bus_lo_error: 0,
            bus_uart_error: 0,
            bus_timeout_error: 0,
            packets_sent: 0,
            packets_received: 0,
            packets_dropped: 0,
        }
    }

    /// Total bus-level errors
    pub fn total_errors(&self) -> u32 {
        self.bus_lo_error
            .saturating_add(self.bus_uart_error)
            .saturating_add(self.bus_timeout_error)
    }

    /// Encode the snapshot with postcard for reporting over the bus
    #[cfg(feature = "serde")]
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], postcard::Error> {
        postcard::to_slice(self, buf)
    }
}

pub(crate) fn bump(counter: &mut u32) {
    *counter = counter.saturating_add(1);
}
