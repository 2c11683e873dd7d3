//! Double-buffered receive slots
//!
//! One slot is armed for the next reception while the other may still be
//! read by the application during a synchronous hand-off.

use jdwire_protocol::FRAME_CAPACITY;

/// Bytes cleared before each reception; covers the header probe
const RX_CLEAR_LEN: usize = 16;

/// Bytes that must be non-zero for the header guard to see a header
const HEADER_PROBE_LEN: usize = 8;

/// Two frame-sized receive buffers
pub struct RxSlots {
    bufs: [[u8; FRAME_CAPACITY]; 2],
    active: usize,
}

impl Default for RxSlots {
    fn default() -> Self {
        Self::new()
    }
}

impl RxSlots {
    /// Both slots zeroed, slot 0 active
    pub const fn new() -> Self {
        Self {
            bufs: [[0; FRAME_CAPACITY]; 2],
            active: 0,
        }
    }

    /// Index of the slot armed for the next reception
    pub fn active(&self) -> usize {
        self.active
    }

    /// The active slot, for the peripheral to receive into
    pub fn active_mut(&mut self) -> &mut [u8] {
        &mut self.bufs[self.active]
    }

    /// Clear the header region of the active slot
    pub fn clear_header(&mut self) {
        self.bufs[self.active][..RX_CLEAR_LEN].fill(0);
    }

    /// Check if nothing has landed in the active slot's header
    pub fn header_missing(&self) -> bool {
        self.bufs[self.active][..HEADER_PROBE_LEN]
            .iter()
            .all(|&b| b == 0)
    }

    /// The active slot's contents
    pub fn active_ref(&self) -> &[u8] {
        &self.bufs[self.active]
    }

    /// Retire the active slot and arm the other one
    ///
    /// Returns the index of the retired slot.
    pub fn swap(&mut self) -> usize {
        let done = self.active;
        self.active ^= 1;
        done
    }

    /// Contents of a slot
    pub fn slot(&self, index: usize) -> &[u8] {
        &self.bufs[index & 1]
    }
}
