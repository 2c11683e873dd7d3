//! Configuration types
//!
//! Timing constants for the bus driver, overridable per board.

pub mod timing;

pub use timing::*;
