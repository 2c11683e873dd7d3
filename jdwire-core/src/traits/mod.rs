//! Collaborator traits owned by the driver core
//!
//! Hardware-facing traits live in `jdwire-hal`; this module holds the
//! application-facing side.

pub mod app;

pub use app::{BusApp, Rejected};
