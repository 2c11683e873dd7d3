//! jdwire frame protocol
//!
//! This crate defines the link-layer frame as it appears on the single-wire
//! bus. The driver only ever looks at the checksum and the size field; the
//! rest of the frame belongs to the application layer.
//!
//! # Frame Format
//!
//! Default (JACDAC) header layout, all multi-byte fields little-endian:
//! ```text
//! ┌───────┬──────┬───────┬───────────────────┬─────────────┐
//! │ CRC16 │ SIZE │ FLAGS │ DEVICE IDENTIFIER │ PAYLOAD     │
//! │ 2B    │ 1B   │ 1B    │ 8B                │ 0–236B      │
//! └───────┴──────┴───────┴───────────────────┴─────────────┘
//! ```
//!
//! The CRC covers everything after itself up to the end of the payload.
//! Offsets are carried by [`FrameLayout`] so other header revisions can be
//! described without touching the codec.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod crc;
pub mod frame;
pub mod queue;

pub use crc::crc16;
pub use frame::{
    frame_size, validate, FrameBuf, FrameError, FrameLayout, FRAME_CAPACITY, HEADER_LEN,
    MAX_PAYLOAD_SIZE,
};
pub use queue::FrameQueue;
