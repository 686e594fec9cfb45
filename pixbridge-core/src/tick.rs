//! Renderer time base
//!
//! The timer interrupt is the only writer; everything else reads. Wraps
//! after about 49.7 days.

use portable_atomic::{AtomicU32, Ordering};

use pixbridge_hal::TickSink;

/// Millisecond counter advanced from the tick interrupt
#[derive(Debug)]
pub struct TickCounter {
    ms: AtomicU32,
}

impl TickCounter {
    pub const fn new() -> Self {
        Self {
            ms: AtomicU32::new(0),
        }
    }

    /// Milliseconds since start, wrapping
    pub fn now_ms(&self) -> u32 {
        self.ms.load(Ordering::Acquire)
    }

    /// Milliseconds elapsed since an earlier `now_ms()` reading
    pub fn elapsed_since(&self, earlier: u32) -> u32 {
        self.now_ms().wrapping_sub(earlier)
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSink for TickCounter {
    fn tick_inc(&self, ms: u32) {
        // Single writer: load/store keeps this off CAS on thumbv6m
        let now = self.ms.load(Ordering::Relaxed);
        self.ms.store(now.wrapping_add(ms), Ordering::Release);
    }
}
