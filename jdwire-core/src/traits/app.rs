//! Application layer interface
//!
//! The driver knows nothing about services, addressing or the contents of
//! a frame. Everything above the raw frame lives behind this trait.

/// Application declined a received frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rejected;

/// Application layer collaborating with the bus driver
///
/// All methods run in interrupt context and must return quickly.
pub trait BusApp {
    /// Outgoing frame; ownership moves to the driver on pull and back on send
    type Frame: AsRef<[u8]>;

    /// Take the next frame to transmit
    fn pull_frame(&mut self) -> Option<Self::Frame>;

    /// A pulled frame has left the driver (sent, or failed at the transport)
    fn frame_sent(&mut self, frame: Self::Frame);

    /// Dispatch a validated frame
    ///
    /// `frame` is exactly `frame_size` bytes and is only valid for the
    /// duration of the call.
    fn handle_frame(&mut self, frame: &[u8]) -> Result<(), Rejected>;

    /// Queue an announce frame
    ///
    /// Returns `true` if a frame was queued, in which case the driver
    /// treats it as a `packet_ready` notification.
    fn queue_announce(&mut self) -> bool;
}
