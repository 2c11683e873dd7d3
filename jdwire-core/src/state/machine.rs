//! Receive and transmit state machines
//!
//! The bus status flags are the source of truth for arbitration decisions;
//! these states track where each direction is in its protocol so the
//! driver can reject events that arrive out of order.

use super::events::{RxEvent, TxEvent};

/// Receive states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxState {
    /// Nothing on the wire
    #[default]
    Idle,
    /// Low pulse seen, waiting for the line to return high
    Arming,
    /// Bytes are being received into the active slot
    Receiving,
    /// Peripheral finished; slot being swapped out
    Completing,
    /// Reception abandoned
    TimedOut,
}

impl RxState {
    /// Process an event and return the next state
    pub fn transition(self, event: RxEvent) -> Self {
        use RxEvent::*;
        use RxState::*;

        match (self, event) {
            (Idle, LineFall) => Arming,

            (Arming, LineHigh) => Receiving,
            (Arming, LineStuck) => TimedOut,

            (Receiving, HeaderMissing) => TimedOut,
            (Receiving, Deadline) => TimedOut,
            (Receiving, Completed) => Completing,

            (Completing, Settled) => Idle,
            (TimedOut, Settled) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}

/// Transmit states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxState {
    /// Nothing to send
    #[default]
    Idle,
    /// Waiting for a quiet bus
    Queued,
    /// Arbitration pulse armed or firing
    Arbitrating,
    /// Bytes on the wire
    Transmitting,
}

impl TxState {
    /// Process an event and return the next state
    pub fn transition(self, event: TxEvent) -> Self {
        use TxEvent::*;
        use TxState::*;

        match (self, event) {
            (Idle, Enqueued) => Queued,

            (Queued, PulseArmed) => Arbitrating,

            // Re-armed after a reception replaced the pulse timer
            (Arbitrating, PulseArmed) => Arbitrating,
            (Arbitrating, BusBusy) => Queued,
            (Arbitrating, QueueEmpty) => Idle,
            (Arbitrating, Collision) => Queued,
            (Arbitrating, Started) => Transmitting,

            (Transmitting, Sent) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}
