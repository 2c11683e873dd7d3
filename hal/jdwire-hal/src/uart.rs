//! Single-wire UART transport
//!
//! The bus is one open-drain line shared by every device. The transport
//! owns the electrical details: the break/low pulse that precedes a frame,
//! switching the pin between receive and transmit, and collision detection
//! while sending.

/// Errors reported by the bus transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// Peripheral is already transmitting or receiving
    Busy,
    /// Another talker pulled the line low while we were claiming it
    Collision,
    /// Framing error
    Framing,
    /// Overrun error
    Overrun,
    /// Noise error
    Noise,
    /// Line did not return high within the bounded wait
    LineStuckLow,
    /// Other error
    Other,
}

/// Single-wire bus UART
///
/// Receive and transmit are asynchronous: the start calls return
/// immediately and the board reports completion back to the driver
/// (`on_rx_completed` / `on_tx_completed`). None of the methods may block
/// except [`BusUart::wait_high`], which is bounded.
pub trait BusUart {
    /// Configure the peripheral and put the line into idle (receive) mode
    fn init(&mut self);

    /// Start receiving into `buf`
    ///
    /// Reception ends when the line goes idle or `buf` is full. The
    /// implementation may keep writing into `buf` until the completion is
    /// reported or [`BusUart::disable`] is called; the driver does not
    /// reuse the buffer before that.
    fn start_rx(&mut self, buf: &mut [u8]);

    /// Drive the low pulse and start sending `data`
    ///
    /// Fails fast with [`UartError::Busy`] or [`UartError::Collision`] if
    /// the peripheral is busy or the line was taken by someone else.
    fn start_tx(&mut self, data: &[u8]) -> Result<(), UartError>;

    /// Wait (bounded) for the line to return to the idle level
    fn wait_high(&mut self) -> Result<(), UartError>;

    /// Abort any in-flight reception
    fn disable(&mut self);
}

/// UART configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Minimum low-pulse width that marks the start of a frame (µs)
    pub break_us: u16,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 1_000_000,
            break_us: 11,
        }
    }
}

impl UartConfig {
    /// Time on the wire for one byte (start + 8 data + stop) in µs, rounded up
    pub fn byte_time_us(&self) -> u32 {
        (10_000_000 + self.baudrate - 1) / self.baudrate
    }
}
