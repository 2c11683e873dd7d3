//! Bus timing configuration
//!
//! All durations are in microseconds. The defaults match a 1 Mbaud bus.

use jdwire_hal::rng::jitter_mask;
use jdwire_hal::uart::UartConfig;
use jdwire_protocol::FrameLayout;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Idle heartbeat period
pub const DEFAULT_TICK_INTERVAL_US: u32 = 10_000;

/// Nominal delay between a decision to send and the arbitration pulse
pub const DEFAULT_ARBITRATION_DELAY_US: u32 = 150;

/// Time from arming the pulse timer to the line actually going low
pub const DEFAULT_WRITE_OVERHEAD_US: u32 = 10;

/// How long after the low pulse the first header bytes must be in
pub const DEFAULT_HEADER_GUARD_US: u32 = 100;

/// Receive budget per byte (10 bit times at 1 Mbaud plus slack)
pub const DEFAULT_RX_BYTE_TIME_US: u32 = 12;

/// Fixed receive budget on top of the per-byte time
pub const DEFAULT_RX_TIMEOUT_MARGIN_US: u32 = 60;

/// Base interval between announce requests
pub const DEFAULT_ANNOUNCE_INTERVAL_US: u32 = 499_000;

/// Announce jitter mask (up to ~2 ms)
pub const DEFAULT_ANNOUNCE_JITTER_MASK: u32 = 0x7FF;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A duration that must be non-zero is zero
    ZeroTiming,
    /// Write overhead eats the whole arbitration window
    OverheadTooLarge,
    /// Idle tick is not longer than the arbitration delay
    TickTooShort,
    /// Announce interval is not longer than the idle tick
    AnnounceTooShort,
}

/// Bus driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusConfig {
    /// Idle heartbeat period
    pub tick_interval_us: u32,
    /// Nominal arbitration delay; randomized around this value
    pub arbitration_delay_us: u32,
    /// Subtracted from the arbitration delay to compensate for wake-up latency
    pub write_overhead_us: u32,
    /// Deadline for the header to arrive after the low pulse
    pub header_guard_us: u32,
    /// Receive time budget per declared byte
    pub rx_byte_time_us: u32,
    /// Fixed receive time budget
    pub rx_timeout_margin_us: u32,
    /// Base announce interval
    pub announce_interval_us: u32,
    /// Mask applied to a random value to get the announce jitter
    pub announce_jitter_mask: u32,
    /// Frame header layout
    #[cfg_attr(feature = "serde", serde(skip))]
    pub layout: FrameLayout,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            tick_interval_us: DEFAULT_TICK_INTERVAL_US,
            arbitration_delay_us: DEFAULT_ARBITRATION_DELAY_US,
            write_overhead_us: DEFAULT_WRITE_OVERHEAD_US,
            header_guard_us: DEFAULT_HEADER_GUARD_US,
            rx_byte_time_us: DEFAULT_RX_BYTE_TIME_US,
            rx_timeout_margin_us: DEFAULT_RX_TIMEOUT_MARGIN_US,
            announce_interval_us: DEFAULT_ANNOUNCE_INTERVAL_US,
            announce_jitter_mask: DEFAULT_ANNOUNCE_JITTER_MASK,
            layout: FrameLayout::JACDAC,
        }
    }
}

impl BusConfig {
    /// Defaults with the receive budget derived from the UART baud rate
    pub fn for_uart(uart: &UartConfig) -> Self {
        Self {
            rx_byte_time_us: uart.byte_time_us() + 2,
            ..Self::default()
        }
    }

    /// Full-frame receive deadline for a declared frame size
    pub fn rx_timeout_us(&self, frame_size: usize) -> u32 {
        (frame_size as u32)
            .saturating_mul(self.rx_byte_time_us)
            .saturating_add(self.rx_timeout_margin_us)
    }

    /// Shortest delay the arbitration timer can be armed with
    pub fn min_arbitration_delay_us(&self) -> u32 {
        let mask = jitter_mask(self.arbitration_delay_us);
        (self.arbitration_delay_us - (mask >> 1)).saturating_sub(self.write_overhead_us)
    }

    /// Check the timings are consistent
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_us == 0
            || self.arbitration_delay_us == 0
            || self.header_guard_us == 0
            || self.rx_byte_time_us == 0
        {
            return Err(ConfigError::ZeroTiming);
        }

        if self.min_arbitration_delay_us() == 0 {
            return Err(ConfigError::OverheadTooLarge);
        }

        if self.tick_interval_us <= self.arbitration_delay_us {
            return Err(ConfigError::TickTooShort);
        }

        if self.announce_interval_us <= self.tick_interval_us {
            return Err(ConfigError::AnnounceTooShort);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(BusConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rx_timeout_is_linear_in_size() {
        let config = BusConfig::default();
        assert_eq!(config.rx_timeout_us(12), 12 * 12 + 60);
        assert_eq!(config.rx_timeout_us(252), 252 * 12 + 60);
    }

    #[test]
    fn test_for_uart_matches_default_at_1mbaud() {
        let config = BusConfig::for_uart(&UartConfig::default());
        assert_eq!(config.rx_byte_time_us, DEFAULT_RX_BYTE_TIME_US);
    }

    #[test]
    fn test_min_arbitration_delay() {
        // around(150) bottoms out at 150 - 63
        assert_eq!(BusConfig::default().min_arbitration_delay_us(), 87 - 10);
    }

    #[test]
    fn test_overhead_too_large() {
        let config = BusConfig {
            write_overhead_us: 87,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::OverheadTooLarge));
    }

    #[test]
    fn test_zero_timing_rejected() {
        let config = BusConfig {
            header_guard_us: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTiming));
    }

    #[test]
    fn test_tick_must_exceed_arbitration() {
        let config = BusConfig {
            tick_interval_us: 150,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::TickTooShort));
    }

    #[test]
    fn test_announce_must_exceed_tick() {
        let config = BusConfig {
            announce_interval_us: 10_000,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::AnnounceTooShort));
    }
}
