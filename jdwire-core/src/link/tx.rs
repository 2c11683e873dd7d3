//! Transmit path
//!
//! The application signals work with `packet_ready`; the driver then waits
//! a randomized arbitration delay, claims the line if it is still quiet and
//! starts the transfer. A frame that loses the race is kept and retried on
//! a later tick without pulling a new one.

use jdwire_hal::{BusUart, IrqGuard, UartError};

use super::{BusDriver, BusStatus, Platform};
use crate::diagnostics::bump;
use crate::safety::{Fault, FaultSink};
use crate::state::{TxEvent, TxState};
use crate::traits::BusApp;

impl<P: Platform, A: BusApp, F: FaultSink> BusDriver<P, A, F> {
    /// The application has a frame to send
    ///
    /// Arms the arbitration pulse right away when the bus is idle;
    /// otherwise the next re-arm point picks the pending flag up.
    pub fn packet_ready(&mut self) {
        let idle = {
            let _cs = IrqGuard::new(&self.irq);
            self.tx_pending = true;
            self.tx_state = self.tx_state.transition(TxEvent::Enqueued);
            self.status.is_idle()
        };

        if idle {
            self.set_tick_timer(0);
        }
    }

    pub(super) fn on_arbitration_pulse(&mut self) {
        self.poll_announce();

        {
            let _cs = IrqGuard::new(&self.irq);
            if self.status.line_busy() {
                self.tx_state = self.tx_state.transition(TxEvent::BusBusy);
                return;
            }
            self.status.set(BusStatus::TX_ACTIVE);
            self.status.clear(BusStatus::TX_QUEUED);
            self.tx_pending = false;
        }

        if self.tx_frame.is_none() {
            self.tx_frame = self.app.pull_frame();
        }

        let Some(frame) = self.tx_frame.as_ref() else {
            self.tx_state = self.tx_state.transition(TxEvent::QueueEmpty);
            self.tx_done();
            return;
        };

        let bytes = frame.as_ref();
        let len = self.config.layout.frame_size(bytes).min(bytes.len());
        let started = self.uart.start_tx(&bytes[..len]);

        match started {
            Ok(()) => {
                self.tx_state = self.tx_state.transition(TxEvent::Started);
                self.set_tick_timer(0);
            }
            Err(e) => {
                bump(&mut self.diagnostics.bus_lo_error);
                self.report(Fault::TxRace(e));
                self.tx_state = self.tx_state.transition(TxEvent::Collision);
                self.tx_done();
                // Retry on the next tick with the frame we already hold
                self.tx_pending = true;
            }
        }
    }

    /// Peripheral finished transmitting
    ///
    /// The frame is handed back to the application whether or not the
    /// transfer succeeded.
    pub fn on_tx_completed(&mut self, result: Result<(), UartError>) {
        if self.tx_state != TxState::Transmitting {
            trace!("stale tx completion");
            return;
        }

        match result {
            Ok(()) => bump(&mut self.diagnostics.packets_sent),
            Err(e) => warn!("jdwire: tx error {}", e),
        }

        let frame = {
            let _cs = IrqGuard::new(&self.irq);
            self.tx_frame.take()
        };
        if let Some(frame) = frame {
            self.app.frame_sent(frame);
        }

        self.tx_state = self.tx_state.transition(TxEvent::Sent);
        if self.tx_pending {
            self.tx_state = self.tx_state.transition(TxEvent::Enqueued);
        }
        self.tx_done();
    }

    fn tx_done(&mut self) {
        self.set_tick_timer(BusStatus::TX_ACTIVE);
    }
}
