//! Mock hardware and application for driver tests

use core::cell::Cell;

use jdwire_hal::{
    BusUart, Clock, InterruptControl, OneShotTimer, UartError, XorShift32,
};
use jdwire_protocol::{FrameBuf, FrameQueue, MAX_PAYLOAD_SIZE};

use crate::config::BusConfig;
use crate::link::{BusDriver, Parts, Platform};
use crate::safety::{Fault, FaultMonitor};
use crate::state::{RxState, TimerEvent};
use crate::traits::{BusApp, Rejected};

pub const DEVICE_ID: u64 = 0x1122_3344_5566_7788;

/// Clock value at driver start; the announce baseline needs a non-zero clock
pub const START_US: u64 = 1_000;

#[derive(Default)]
pub struct MockUart {
    pub initialized: bool,
    pub stuck_low: bool,
    /// Number of upcoming `start_tx` calls that report a collision
    pub tx_failures: u32,
    /// Frames successfully handed to the wire
    pub sent: Vec<FrameBuf>,
    /// Bytes the next reception will deliver
    pub incoming: Vec<u8>,
    /// Bytes written into the slot by the last reception
    pub rx_len: usize,
    pub rx_started: u32,
    pub disabled: u32,
}

impl MockUart {
    pub fn stage(&mut self, bytes: &[u8]) {
        self.incoming.clear();
        self.incoming.extend_from_slice(bytes);
    }
}

impl BusUart for MockUart {
    fn init(&mut self) {
        self.initialized = true;
    }

    fn start_rx(&mut self, buf: &mut [u8]) {
        let n = self.incoming.len().min(buf.len());
        buf[..n].copy_from_slice(&self.incoming[..n]);
        self.rx_len = n;
        self.incoming.clear();
        self.rx_started += 1;
    }

    fn start_tx(&mut self, data: &[u8]) -> Result<(), UartError> {
        if self.tx_failures > 0 {
            self.tx_failures -= 1;
            return Err(UartError::Collision);
        }
        self.sent
            .push(FrameBuf::from_bytes(data).expect("driver sent a malformed frame"));
        Ok(())
    }

    fn wait_high(&mut self) -> Result<(), UartError> {
        if self.stuck_low {
            Err(UartError::LineStuckLow)
        } else {
            Ok(())
        }
    }

    fn disable(&mut self) {
        self.disabled += 1;
    }
}

pub struct MockTimer {
    pub now: u64,
    slot: Option<(u32, TimerEvent)>,
}

impl MockTimer {
    pub fn new() -> Self {
        Self {
            now: START_US,
            slot: None,
        }
    }

    pub fn pending(&self) -> Option<(u32, TimerEvent)> {
        self.slot
    }

    /// Let the pending event expire, advancing the clock to its deadline
    pub fn expire(&mut self) -> Option<TimerEvent> {
        let (delay, event) = self.slot.take()?;
        self.now += delay as u64;
        Some(event)
    }
}

impl Clock for MockTimer {
    fn now_us(&self) -> u64 {
        self.now
    }
}

impl OneShotTimer<TimerEvent> for MockTimer {
    fn schedule(&mut self, delay_us: u32, event: TimerEvent) {
        self.slot = Some((delay_us, event));
    }
}

/// Interrupt mask that fails the test on nested critical sections
#[derive(Default)]
pub struct MockIrq {
    masked: Cell<bool>,
}

impl InterruptControl for MockIrq {
    fn disable(&self) {
        assert!(!self.masked.get(), "nested critical section");
        self.masked.set(true);
    }

    fn enable(&self) {
        self.masked.set(false);
    }
}

pub struct MockApp {
    pub queue: FrameQueue<8>,
    pub received: Vec<Vec<u8>>,
    pub sent: Vec<FrameBuf>,
    pub pulled: u32,
    pub announces: u32,
    pub reject: bool,
    /// Payload byte of the announce frame, if announces should be queued
    pub announce_payload: Option<u8>,
}

impl MockApp {
    pub fn new() -> Self {
        Self {
            queue: FrameQueue::new(),
            received: Vec::new(),
            sent: Vec::new(),
            pulled: 0,
            announces: 0,
            reject: false,
            announce_payload: None,
        }
    }

    /// Queue a one-byte frame; `false` if the queue is full
    pub fn enqueue(&mut self, tag: u8) -> bool {
        let mut frame = FrameBuf::new(DEVICE_ID, 0);
        frame.set_payload(&[tag]).expect("one byte fits");
        self.queue.push(frame).is_ok()
    }
}

impl BusApp for MockApp {
    type Frame = FrameBuf;

    fn pull_frame(&mut self) -> Option<FrameBuf> {
        let frame = self.queue.pop()?;
        self.pulled += 1;
        Some(frame)
    }

    fn frame_sent(&mut self, frame: FrameBuf) {
        self.sent.push(frame);
    }

    fn handle_frame(&mut self, frame: &[u8]) -> Result<(), Rejected> {
        if self.reject {
            return Err(Rejected);
        }
        self.received.push(frame.to_vec());
        Ok(())
    }

    fn queue_announce(&mut self) -> bool {
        self.announces += 1;
        match self.announce_payload {
            Some(tag) => self.enqueue(tag),
            None => false,
        }
    }
}

pub struct MockPlatform;

impl Platform for MockPlatform {
    type Uart = MockUart;
    type Timer = MockTimer;
    type Irq = MockIrq;
    type Rng = XorShift32;
}

pub type TestDriver = BusDriver<MockPlatform, MockApp, FaultMonitor>;

pub fn mock_parts_seeded(seed: u32) -> Parts<MockPlatform> {
    Parts {
        uart: MockUart::default(),
        timer: MockTimer::new(),
        irq: MockIrq::default(),
        rng: XorShift32::new(seed),
    }
}

pub fn mock_parts() -> Parts<MockPlatform> {
    mock_parts_seeded(0xC0FF_EE01)
}

pub fn driver_with(config: BusConfig) -> TestDriver {
    TestDriver::new(mock_parts(), MockApp::new(), FaultMonitor::new(), config)
        .expect("valid config")
}

pub fn driver() -> TestDriver {
    driver_with(BusConfig::default())
}

pub fn started_driver_with(config: BusConfig) -> TestDriver {
    let mut driver = driver_with(config);
    driver.init();
    driver
}

pub fn started_driver() -> TestDriver {
    started_driver_with(BusConfig::default())
}

pub fn started_driver_seeded(seed: u32) -> TestDriver {
    let mut driver = TestDriver::new(
        mock_parts_seeded(seed),
        MockApp::new(),
        FaultMonitor::new(),
        BusConfig::default(),
    )
    .expect("valid config");
    driver.init();
    driver
}

/// Expire the pending timer and dispatch it
pub fn fire(driver: &mut TestDriver) -> Option<TimerEvent> {
    let event = driver.timer_mut().expire()?;
    driver.on_timer(event);
    Some(event)
}

/// Run a full reception of `bytes`: low pulse, header guard, completion
pub fn receive(driver: &mut TestDriver, bytes: &[u8]) -> Result<(), Fault> {
    driver.uart_mut().stage(bytes);
    driver.on_line_fall()?;
    if driver.rx_state() != RxState::Receiving {
        return Ok(());
    }

    fire(driver);
    if driver.rx_state() != RxState::Receiving {
        return Ok(());
    }

    let left = jdwire_protocol::FRAME_CAPACITY - driver.uart().rx_len;
    driver.on_rx_completed(Ok(left));
    Ok(())
}

/// Sealed frame with `len` payload bytes
pub fn test_frame(len: u8) -> FrameBuf {
    let payload = [len; MAX_PAYLOAD_SIZE];
    let mut frame = FrameBuf::new(DEVICE_ID, 0);
    frame
        .set_payload(&payload[..len as usize])
        .expect("payload fits");
    frame.seal();
    frame
}
