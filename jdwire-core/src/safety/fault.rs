//! Bus faults and the sink they are reported to

use jdwire_hal::UartError;

/// How bad a fault is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Severity {
    /// Frame or attempt dropped; the driver is back to idle and continues
    Recoverable,
    /// Protocol invariant broken; driver state is no longer defined
    Fatal,
}

/// Faults detected by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// Line fell while a reception was still in progress (missed completion)
    ReentrantLineFall,
    /// No header after the low pulse, or body not complete by the deadline
    RxTimeout,
    /// Transport reported a receive error
    RxUart(UartError),
    /// Fewer bytes arrived than the header declared
    FrameTooShort,
    /// Checksum mismatch
    CrcMismatch,
    /// Transmit start lost the bus to another talker; frame kept for retry
    TxRace(UartError),
}

impl Fault {
    /// Classify this fault
    pub fn severity(&self) -> Severity {
        match self {
            Fault::ReentrantLineFall => Severity::Fatal,
            _ => Severity::Recoverable,
        }
    }

    /// Check if this fault must halt the driver
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

/// Receiver of fault notifications
///
/// `signal` is the non-fatal path: observable but execution continues.
/// `fatal` is the escalation path; boards typically reset or halt from it.
pub trait FaultSink {
    /// Report a recoverable fault
    fn signal(&mut self, fault: Fault);

    /// Escalate a fatal fault
    fn fatal(&mut self, fault: Fault);
}
