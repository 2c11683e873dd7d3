//! Bus driver
//!
//! [`BusDriver`] is the single owned context for one bus. The board glue
//! keeps it somewhere all interrupt handlers can reach (typically a
//! `critical_section::Mutex<RefCell<_>>`) and forwards each hardware event
//! to the matching entry point:
//!
//! | Hardware event              | Entry point                       |
//! |-----------------------------|-----------------------------------|
//! | Line falling edge           | [`BusDriver::on_line_fall`]       |
//! | UART receive finished       | [`BusDriver::on_rx_completed`]    |
//! | UART transmit finished      | [`BusDriver::on_tx_completed`]    |
//! | One-shot timer expired      | [`BusDriver::on_timer`]           |
//! | Application queued a frame  | [`BusDriver::packet_ready`]       |
//!
//! State shared between the two interrupt priorities (status flags, the
//! pending flag, slot and frame ownership) is only touched inside an
//! [`IrqGuard`]; UART calls and application callbacks run outside it.

mod rx;
mod slots;
mod status;
mod tx;

pub use slots::RxSlots;
pub use status::BusStatus;

use jdwire_hal::{BusUart, Clock, InterruptControl, IrqGuard, OneShotTimer, Random};

use crate::config::{BusConfig, ConfigError};
use crate::diagnostics::Diagnostics;
use crate::safety::{Fault, FaultSink};
use crate::scheduler::AnnounceScheduler;
use crate::state::{RxState, TimerEvent, TxEvent, TxState};
use crate::traits::BusApp;

/// Hardware collaborators of a board
pub trait Platform {
    /// Single-wire UART
    type Uart: BusUart;
    /// Monotonic clock with the single one-shot timer slot
    type Timer: Clock + OneShotTimer<TimerEvent>;
    /// Global interrupt control
    type Irq: InterruptControl;
    /// Jitter source
    type Rng: Random;
}

/// Hardware collaborators handed to the driver at construction
pub struct Parts<P: Platform> {
    pub uart: P::Uart,
    pub timer: P::Timer,
    pub irq: P::Irq,
    pub rng: P::Rng,
}

/// Link-layer driver for one bus
pub struct BusDriver<P: Platform, A: BusApp, F: FaultSink> {
    uart: P::Uart,
    timer: P::Timer,
    irq: P::Irq,
    rng: P::Rng,
    app: A,
    faults: F,
    config: BusConfig,

    status: BusStatus,
    /// Application has something to send
    tx_pending: bool,
    rx_state: RxState,
    tx_state: TxState,
    rx: RxSlots,
    /// Frame pulled from the application and not yet reported sent
    tx_frame: Option<A::Frame>,
    announce: AnnounceScheduler,
    diagnostics: Diagnostics,
}

impl<P: Platform, A: BusApp, F: FaultSink> BusDriver<P, A, F> {
    /// Create a driver; nothing touches the hardware until [`BusDriver::init`]
    pub fn new(parts: Parts<P>, app: A, faults: F, config: BusConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            uart: parts.uart,
            timer: parts.timer,
            irq: parts.irq,
            rng: parts.rng,
            app,
            faults,
            announce: AnnounceScheduler::new(
                config.announce_interval_us,
                config.announce_jitter_mask,
            ),
            config,
            status: BusStatus::empty(),
            tx_pending: false,
            rx_state: RxState::Idle,
            tx_state: TxState::Idle,
            rx: RxSlots::new(),
            tx_frame: None,
            diagnostics: Diagnostics::new(),
        })
    }

    /// Start the tick timer, bring up the UART and arm the announce baseline
    pub fn init(&mut self) {
        info!("jdwire: init");
        self.set_tick_timer(0);
        self.uart.init();
        self.check_announce();
    }

    /// Check if the driver has been started
    pub fn is_running(&self) -> bool {
        self.announce.is_armed()
    }

    /// Check if any status flag is set
    pub fn is_busy(&self) -> bool {
        !self.status.is_idle()
    }

    /// Current status flags
    pub fn status(&self) -> BusStatus {
        self.status
    }

    /// Receive state
    pub fn rx_state(&self) -> RxState {
        self.rx_state
    }

    /// Transmit state
    pub fn tx_state(&self) -> TxState {
        self.tx_state
    }

    /// Index of the receive slot armed for the next frame
    pub fn active_rx_slot(&self) -> usize {
        self.rx.active()
    }

    /// Check if a frame is held for (re)transmission
    pub fn has_tx_frame(&self) -> bool {
        self.tx_frame.is_some()
    }

    /// Snapshot of the counters
    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    /// Driver configuration
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Application layer
    pub fn app(&self) -> &A {
        &self.app
    }

    /// Application layer, mutably (e.g. to queue frames before `packet_ready`)
    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    /// Fault sink
    pub fn faults(&self) -> &F {
        &self.faults
    }

    /// UART
    pub fn uart(&self) -> &P::Uart {
        &self.uart
    }

    #[cfg(test)]
    pub(crate) fn uart_mut(&mut self) -> &mut P::Uart {
        &mut self.uart
    }

    /// Timer
    pub fn timer(&self) -> &P::Timer {
        &self.timer
    }

    #[cfg(test)]
    pub(crate) fn timer_mut(&mut self) -> &mut P::Timer {
        &mut self.timer
    }

    /// One-shot timer expiry
    pub fn on_timer(&mut self, event: TimerEvent) {
        if event.is_rx_timer() && self.rx_state != RxState::Receiving {
            trace!("stale rx timer {}", event);
            self.set_tick_timer(0);
            return;
        }

        match event {
            TimerEvent::Tick => self.on_tick(),
            TimerEvent::ArbitrationPulse => self.on_arbitration_pulse(),
            TimerEvent::HeaderGuard => self.on_header_guard(),
            TimerEvent::RxTimeout => self.on_rx_deadline(),
        }
    }

    fn on_tick(&mut self) {
        self.check_announce();
        self.set_tick_timer(0);
    }

    /// Central re-arm point after every RX/TX state change
    ///
    /// Clears `clear` from the status, then arms either the randomized
    /// arbitration pulse (something to send, bus quiet) or the idle tick.
    /// Does nothing while receiving; the RX path calls back on completion.
    fn set_tick_timer(&mut self, clear: u8) {
        let _cs = IrqGuard::new(&self.irq);
        self.status.clear(clear);

        if self.status.is_receiving() {
            return;
        }

        if self.tx_pending && !self.status.is_transmitting() {
            self.status.set(BusStatus::TX_QUEUED);
            self.tx_state = self.tx_state.transition(TxEvent::PulseArmed);
            let delay = self
                .rng
                .around(self.config.arbitration_delay_us)
                .saturating_sub(self.config.write_overhead_us);
            self.timer.schedule(delay, TimerEvent::ArbitrationPulse);
        } else {
            self.status.clear(BusStatus::TX_QUEUED);
            self.timer
                .schedule(self.config.tick_interval_us, TimerEvent::Tick);
        }
    }

    fn check_announce(&mut self) {
        let now = self.timer.now_us();
        if self.announce.check(now, &mut self.rng) {
            debug!("announce due at {=u64}", now);
            if self.app.queue_announce() {
                self.packet_ready();
            }
        }
    }

    /// Announce check on the busy path, once per 256 events
    fn poll_announce(&mut self) {
        if self.announce.throttle() {
            self.check_announce();
        }
    }

    fn report(&mut self, fault: Fault) {
        warn!("jdwire: {}", fault);
        self.faults.signal(fault);
    }
}
