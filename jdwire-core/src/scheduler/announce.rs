//! Announce scheduler
//!
//! Decides when the application should broadcast its liveness announce.
//! A deadline of zero means the scheduler has never been armed; the first
//! check only establishes the baseline.

use jdwire_hal::Random;

/// Opportunistic checks run once per this many RX/TX events
pub const ANNOUNCE_THROTTLE: u16 = 256;

/// Periodic announce deadline with jitter
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnnounceScheduler {
    /// Next deadline (µs); 0 = never armed
    next_announce_us: u64,
    /// Rolling counter for opportunistic checks
    throttle: u8,
    interval_us: u32,
    jitter_mask: u32,
}

impl AnnounceScheduler {
    /// Create an unarmed scheduler
    pub const fn new(interval_us: u32, jitter_mask: u32) -> Self {
        Self {
            next_announce_us: 0,
            throttle: 0,
            interval_us,
            jitter_mask,
        }
    }

    /// Check if the baseline deadline has been set
    pub fn is_armed(&self) -> bool {
        self.next_announce_us != 0
    }

    /// Current deadline (µs)
    pub fn next_announce_us(&self) -> u64 {
        self.next_announce_us
    }

    /// Check the deadline and reschedule when it has passed
    ///
    /// Returns `true` when an announce is due. The deadline moves to
    /// `now + interval + jitter` whether or not one was due.
    pub fn check<R: Random + ?Sized>(&mut self, now_us: u64, rng: &mut R) -> bool {
        if now_us <= self.next_announce_us {
            return false;
        }

        let due = self.is_armed();
        let jitter = rng.next_u32() & self.jitter_mask;
        self.next_announce_us = now_us + self.interval_us as u64 + jitter as u64;
        due
    }

    /// Advance the rolling counter; `true` once every [`ANNOUNCE_THROTTLE`] calls
    pub fn throttle(&mut self) -> bool {
        let fire = self.throttle == 0;
        self.throttle = self.throttle.wrapping_add(1);
        fire
    }
}
