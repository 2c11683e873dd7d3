//! Events that trigger state transitions

/// Events driving the receive state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxEvent {
    /// Line pulled low by another talker
    LineFall,
    /// Line returned high after the low pulse; reception started
    LineHigh,
    /// Line stayed low past the bounded wait
    LineStuck,
    /// Header guard expired with no header bytes
    HeaderMissing,
    /// Full-frame deadline expired
    Deadline,
    /// Peripheral reported the end of reception
    Completed,
    /// Timeout or completion handling finished
    Settled,
}

/// Events driving the transmit state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxEvent {
    /// Application has a frame to send
    Enqueued,
    /// Arbitration pulse timer armed
    PulseArmed,
    /// Pulse fired but the bus was taken in the meantime
    BusBusy,
    /// Application had nothing to send after all
    QueueEmpty,
    /// Transmission started
    Started,
    /// Transmit start lost a race with another talker
    Collision,
    /// Peripheral reported the end of transmission
    Sent,
}

/// Callbacks that can sit in the single timer slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerEvent {
    /// Idle heartbeat; runs the announce check and re-arms
    Tick,
    /// Randomized arbitration pulse
    ArbitrationPulse,
    /// Check that the frame header arrived after the low pulse
    HeaderGuard,
    /// Full-frame receive deadline
    RxTimeout,
}

impl TimerEvent {
    /// Check if this timer belongs to an in-flight reception
    pub fn is_rx_timer(&self) -> bool {
        matches!(self, TimerEvent::HeaderGuard | TimerEvent::RxTimeout)
    }
}
