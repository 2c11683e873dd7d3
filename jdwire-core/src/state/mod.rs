//! Link state machines
//!
//! Explicit, finite transitions for the receive and transmit directions,
//! plus the events the single timer slot can deliver.

pub mod events;
pub mod machine;

pub use events::{RxEvent, TimerEvent, TxEvent};
pub use machine::{RxState, TxState};
