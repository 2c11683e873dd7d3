//! Randomness for collision avoidance
//!
//! Quality requirements are low: the values only need to differ between
//! devices on the same bus so that simultaneous talkers drift apart.

/// Uniform random source
pub trait Random {
    /// Next uniformly distributed 32-bit value
    fn next_u32(&mut self) -> u32;

    /// A value near `n` with bounded jitter
    ///
    /// Picks the largest `2^k - 1` mask not above `n` and returns a value in
    /// `[n - mask / 2, n - mask / 2 + mask]`.
    fn around(&mut self, n: u32) -> u32 {
        let mask = jitter_mask(n);
        (n - (mask >> 1)) + (self.next_u32() & mask)
    }
}

/// Largest all-ones mask that does not exceed `n`
pub fn jitter_mask(n: u32) -> u32 {
    let mut mask: u32 = 0x0fff_ffff;
    while mask > n {
        mask >>= 1;
    }
    mask
}

/// Xorshift32 generator
///
/// Small enough for any target; seed it from something device-unique
/// (serial number, ADC noise) so devices do not share a sequence.
#[derive(Debug, Clone)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Create a generator; a zero seed is replaced since xorshift sticks at zero
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x2545_f491 } else { seed },
        }
    }
}

impl Random for XorShift32 {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}
