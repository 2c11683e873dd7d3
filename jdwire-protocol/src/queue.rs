//! Outgoing frame queue for the application layer
//!
//! The driver itself keeps no queue. Applications that do not need
//! anything fancier can back their `pull_frame` with this FIFO.

use heapless::Deque;

use crate::frame::FrameBuf;

/// Fixed-capacity FIFO of sealed frames
pub struct FrameQueue<const N: usize> {
    frames: Deque<FrameBuf, N>,
}

impl<const N: usize> Default for FrameQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FrameQueue<N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            frames: Deque::new(),
        }
    }

    /// Append a frame, sealing it first
    ///
    /// Returns the frame back if the queue is full.
    pub fn push(&mut self, mut frame: FrameBuf) -> Result<(), FrameBuf> {
        if self.frames.is_full() {
            return Err(frame);
        }
        frame.seal();
        self.frames.push_back(frame)
    }

    /// Take the oldest frame
    pub fn pop(&mut self) -> Option<FrameBuf> {
        self.frames.pop_front()
    }

    /// Number of queued frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Check if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Check if no more frames fit
    pub fn is_full(&self) -> bool {
        self.frames.is_full()
    }
}
