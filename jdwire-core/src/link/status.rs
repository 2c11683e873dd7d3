//! Bus status flags
//!
//! `RX_ACTIVE` and `TX_ACTIVE` are never set together; the bus is
//! half-duplex. `TX_QUEUED` is only meaningful while neither is set.

/// Set of bus status flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusStatus(u8);

impl BusStatus {
    /// A reception is in progress
    pub const RX_ACTIVE: u8 = 0x01;
    /// A transmission is in progress
    pub const TX_ACTIVE: u8 = 0x02;
    /// Arbitration pulse is armed
    pub const TX_QUEUED: u8 = 0x04;

    /// No flags set
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw flag bits
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Check if every flag is clear
    pub fn is_idle(&self) -> bool {
        self.0 == 0
    }

    /// Check if a reception is in progress
    pub fn is_receiving(&self) -> bool {
        self.0 & Self::RX_ACTIVE != 0
    }

    /// Check if a transmission is in progress
    pub fn is_transmitting(&self) -> bool {
        self.0 & Self::TX_ACTIVE != 0
    }

    /// Check if the arbitration pulse is armed
    pub fn is_tx_queued(&self) -> bool {
        self.0 & Self::TX_QUEUED != 0
    }

    /// Check if the wire is in use in either direction
    pub fn line_busy(&self) -> bool {
        self.0 & (Self::RX_ACTIVE | Self::TX_ACTIVE) != 0
    }

    pub(crate) fn set(&mut self, flags: u8) {
        self.0 |= flags;
    }

    pub(crate) fn clear(&mut self, flags: u8) {
        self.0 &= !flags;
    }
}
