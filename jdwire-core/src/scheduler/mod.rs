//! Periodic scheduling
//!
//! The tick path re-evaluates "should I transmit / should I announce";
//! this module holds the announce half of that decision.

pub mod announce;

pub use announce::{AnnounceScheduler, ANNOUNCE_THROTTLE};
