//! Receive path
//!
//! A reception starts on the falling edge of the low pulse, is guarded by a
//! short header check and a size-proportional deadline, and ends when the
//! peripheral reports completion. The finished slot is swapped out before
//! the frame is validated and handed to the application.

use jdwire_hal::{BusUart, IrqGuard, OneShotTimer, UartError};
use jdwire_protocol::{FrameError, FRAME_CAPACITY};

use super::{BusDriver, BusStatus, Platform};
use crate::diagnostics::bump;
use crate::safety::{Fault, FaultSink};
use crate::state::{RxEvent, RxState, TimerEvent};
use crate::traits::BusApp;

impl<P: Platform, A: BusApp, F: FaultSink> BusDriver<P, A, F> {
    /// Falling edge on the bus line
    ///
    /// A fall while already receiving means a completion was missed; the
    /// driver state is no longer trustworthy and the fault is escalated.
    /// A fall while transmitting is our own low pulse and is ignored.
    pub fn on_line_fall(&mut self) -> Result<(), Fault> {
        if self.status.is_receiving() {
            error!("jdwire: line fall during reception");
            self.faults.fatal(Fault::ReentrantLineFall);
            return Err(Fault::ReentrantLineFall);
        }

        if self.status.is_transmitting() {
            trace!("line fall during tx");
            return Ok(());
        }

        {
            let _cs = IrqGuard::new(&self.irq);
            self.status.set(BusStatus::RX_ACTIVE);
        }
        self.rx_state = self.rx_state.transition(RxEvent::LineFall);
        self.rx.clear_header();

        if self.uart.wait_high().is_err() {
            self.rx_state = self.rx_state.transition(RxEvent::LineStuck);
            self.rx_timeout();
            return Ok(());
        }

        self.uart.start_rx(self.rx.active_mut());
        self.rx_state = self.rx_state.transition(RxEvent::LineHigh);
        self.timer
            .schedule(self.config.header_guard_us, TimerEvent::HeaderGuard);

        Ok(())
    }

    /// Header guard expired: abandon if nothing arrived, else arm the deadline
    pub(super) fn on_header_guard(&mut self) {
        if self.rx.header_missing() {
            self.rx_state = self.rx_state.transition(RxEvent::HeaderMissing);
            self.rx_timeout();
            return;
        }

        let frame_size = self.config.layout.frame_size(self.rx.active_ref());
        let delay = self.config.rx_timeout_us(frame_size);

        let _cs = IrqGuard::new(&self.irq);
        if self.status.is_receiving() {
            self.timer.schedule(delay, TimerEvent::RxTimeout);
        }
    }

    pub(super) fn on_rx_deadline(&mut self) {
        self.rx_state = self.rx_state.transition(RxEvent::Deadline);
        self.rx_timeout();
    }

    fn rx_timeout(&mut self) {
        bump(&mut self.diagnostics.bus_timeout_error);
        self.report(Fault::RxTimeout);
        self.uart.disable();
        self.rx_state = self.rx_state.transition(RxEvent::Settled);
        self.set_tick_timer(BusStatus::RX_ACTIVE);
    }

    /// Peripheral finished receiving
    ///
    /// `result` carries the number of bytes of the slot left unfilled, or
    /// the transport error. Completions that do not belong to an in-flight
    /// reception (it already timed out) are ignored.
    pub fn on_rx_completed(&mut self, result: Result<usize, UartError>) {
        if self.rx_state != RxState::Receiving {
            trace!("stale rx completion");
            return;
        }

        self.poll_announce();
        self.rx_state = self.rx_state.transition(RxEvent::Completed);

        let done = {
            let _cs = IrqGuard::new(&self.irq);
            self.rx.swap()
        };
        self.set_tick_timer(BusStatus::RX_ACTIVE);
        self.rx_state = self.rx_state.transition(RxEvent::Settled);

        let bytes_left = match result {
            Ok(left) => left,
            Err(e) => {
                bump(&mut self.diagnostics.bus_uart_error);
                self.report(Fault::RxUart(e));
                return;
            }
        };
        let received = FRAME_CAPACITY.saturating_sub(bytes_left);

        let layout = self.config.layout;
        if let Err(e) = layout.validate(self.rx.slot(done), received) {
            bump(&mut self.diagnostics.bus_uart_error);
            let fault = match e {
                FrameError::TooShort => Fault::FrameTooShort,
                _ => Fault::CrcMismatch,
            };
            self.report(fault);
            return;
        }

        bump(&mut self.diagnostics.packets_received);
        let size = layout.frame_size(self.rx.slot(done));
        if self.app.handle_frame(&self.rx.slot(done)[..size]).is_err() {
            debug!("frame rejected by app");
            bump(&mut self.diagnostics.packets_dropped);
        }
    }
}
