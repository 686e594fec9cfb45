//! FIFO touch controller wrapper for nRF52 hosts
//!
//! On nRF52 the STMPE610 FIFO depth does not always read correctly when
//! the FIFO is nearly empty, which shows up as false release events.
//! After the sampler drains what looks like the last point, this wrapper
//! stalls briefly so further samples can pile up before the next poll.

use embedded_hal::delay::DelayNs;
use pixbridge_hal::touch::{FifoTouch, RawPoint};

/// Stall after draining the FIFO, in milliseconds
pub const FIFO_SETTLE_MS: u32 = 50;

/// FIFO touch controller with a post-drain stall
pub struct SettlingFifo<T, D> {
    touch: T,
    delay: D,
    settle_ms: u32,
}

impl<T: FifoTouch, D: DelayNs> SettlingFifo<T, D> {
    /// Wrap a controller with the default settle time
    pub fn new(touch: T, delay: D) -> Self {
        Self::with_settle_ms(touch, delay, FIFO_SETTLE_MS)
    }

    /// Wrap a controller with a custom settle time
    pub fn with_settle_ms(touch: T, delay: D, settle_ms: u32) -> Self {
        Self {
            touch,
            delay,
            settle_ms,
        }
    }

    /// Settle time in milliseconds
    pub fn settle_ms(&self) -> u32 {
        self.settle_ms
    }

    /// Release the controller and delay provider
    pub fn release(self) -> (T, D) {
        (self.touch, self.delay)
    }
}

impl<T: FifoTouch, D: DelayNs> FifoTouch for SettlingFifo<T, D> {
    fn buffer_size(&mut self) -> u8 {
        self.touch.buffer_size()
    }

    fn get_point(&mut self) -> RawPoint {
        self.touch.get_point()
    }

    fn settle_after_drain(&mut self) {
        self.touch.settle_after_drain();
        // Deliberate blocking stall, not a yield
        self.delay.delay_ms(self.settle_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OnePoint {
        remaining: u8,
    }

    impl FifoTouch for OnePoint {
        fn buffer_size(&mut self) -> u8 {
            self.remaining
        }
        fn get_point(&mut self) -> RawPoint {
            self.remaining = self.remaining.saturating_sub(1);
            RawPoint::new(1000, 2000, 50)
        }
    }

    #[derive(Default)]
    struct RecordingDelay {
        total_ns: u64,
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    #[test]
    fn test_passthrough() {
        let mut fifo = SettlingFifo::new(OnePoint { remaining: 1 }, RecordingDelay::default());
        assert_eq!(fifo.buffer_size(), 1);
        assert_eq!(fifo.get_point(), RawPoint::new(1000, 2000, 50));
        assert_eq!(fifo.buffer_size(), 0);

        let (_, delay) = fifo.release();
        assert_eq!(delay.total_ns, 0);
    }

    #[test]
    fn test_settle_stalls() {
        let mut fifo = SettlingFifo::new(OnePoint { remaining: 1 }, RecordingDelay::default());
        assert_eq!(fifo.settle_ms(), 50);
        fifo.settle_after_drain();

        let (_, delay) = fifo.release();
        assert_eq!(delay.total_ns, 50_000_000);
    }
}
