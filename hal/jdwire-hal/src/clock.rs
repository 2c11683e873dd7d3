//! Time source and the single one-shot timer
//!
//! The driver never holds more than one outstanding timer. Scheduling a
//! new event replaces whatever was pending, so implementations only need
//! one compare channel.

/// Monotonic microsecond clock
pub trait Clock {
    /// Microseconds since an arbitrary epoch; never goes backwards
    fn now_us(&self) -> u64;
}

/// Single-slot one-shot timer
///
/// `E` is the event the board hands back to the driver on expiry.
pub trait OneShotTimer<E> {
    /// Fire `event` after `delay_us`, replacing any pending event
    fn schedule(&mut self, delay_us: u32, event: E);
}
