//! jdwire Hardware Abstraction Layer
//!
//! This crate defines the collaborator traits the bus driver consumes.
//! Chip-specific glue implements them on top of the real timer, UART and
//! interrupt controller; the driver core stays board-agnostic and can be
//! exercised on the host against mock implementations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Board glue (ISR routing, app queue)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  jdwire-core (bus driver state machine) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  jdwire-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`clock::Clock`], [`clock::OneShotTimer`] - Monotonic time and the single timer slot
//! - [`uart::BusUart`] - Single-wire UART transport
//! - [`irq::InterruptControl`] - Global interrupt disable/enable (with a
//!   `critical-section` backed implementation behind the feature of that name)
//! - [`rng::Random`] - Jitter source

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod irq;
pub mod rng;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use clock::{Clock, OneShotTimer};
pub use irq::{InterruptControl, IrqGuard};
#[cfg(feature = "critical-section")]
pub use irq::CriticalSection;
pub use rng::{Random, XorShift32};
pub use uart::{BusUart, UartConfig, UartError};
