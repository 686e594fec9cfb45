//! Tick timer abstractions
//!
//! A tick timer fires a fixed-rate interrupt and, on every interrupt,
//! advances the renderer's time base by one tick interval. Each hardware
//! family provides its own [`TickTimer`]; the divider math they share
//! lives in [`select_divider`].

/// Errors that can occur while configuring a tick timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// A frequency of 0 Hz was requested
    ZeroFrequency,
    /// No supported divider yields a compare value that fits the counter
    UnsupportedFrequency,
}

/// Receiver of time-base advances
///
/// `tick_inc` is called from interrupt context. Implementations must not
/// block, allocate, or take a lock that application code can hold.
pub trait TickSink: Sync {
    /// Advance the time base by `ms` milliseconds
    fn tick_inc(&self, ms: u32);
}

/// One heartbeat: the sink to advance and the amount to advance it by
///
/// Timer backends store this by value and call [`Tick::fire`] from their
/// interrupt handler.
#[derive(Clone, Copy)]
pub struct Tick {
    sink: &'static dyn TickSink,
    delta_ms: u32,
}

impl Tick {
    /// Create a heartbeat advancing `sink` by `delta_ms` per interrupt
    pub const fn new(sink: &'static dyn TickSink, delta_ms: u32) -> Self {
        Self { sink, delta_ms }
    }

    /// Milliseconds added per interrupt
    pub const fn delta_ms(&self) -> u32 {
        self.delta_ms
    }

    /// Advance the sink by one interval
    #[inline]
    pub fn fire(&self) {
        self.sink.tick_inc(self.delta_ms);
    }
}

impl core::fmt::Debug for Tick {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tick").field("delta_ms", &self.delta_ms).finish()
    }
}

/// Hardware timer producing a periodic heartbeat
///
/// Exactly one implementation is linked into a given firmware; the bridge
/// is generic over it.
pub trait TickTimer {
    /// Configure the peripheral for `frequency_hz` interrupts per second
    /// and start it. Every interrupt calls `tick.fire()`.
    ///
    /// On error the peripheral is left stopped.
    fn start(&mut self, frequency_hz: u32, tick: Tick) -> Result<(), TimerError>;

    /// Stop the peripheral and detach the heartbeat
    fn stop(&mut self);

    /// Check if the timer is currently running
    fn is_running(&self) -> bool;
}

/// Description of a timer's clock tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerClock {
    /// Input clock frequency in Hz (before the divider)
    pub clock_hz: u32,
    /// Width of the compare register in bits (1-64)
    pub counter_bits: u8,
    /// Supported dividers, ascending
    pub dividers: &'static [u32],
}

impl TimerClock {
    /// Largest value the compare register can hold
    pub const fn max_compare(&self) -> u64 {
        if self.counter_bits >= 64 {
            u64::MAX
        } else {
            (1u64 << self.counter_bits) - 1
        }
    }
}

/// Divider and compare value chosen for a target frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DividerChoice {
    /// Index into [`TimerClock::dividers`]
    pub index: usize,
    /// Divider value
    pub divider: u32,
    /// Compare value (counter ticks per interrupt)
    pub compare: u64,
}

/// Pick the smallest divider that keeps the compare value in range
///
/// compare = (clock_hz / divider) / frequency_hz
///
/// The compare value must be at least 1 and must fit the counter width.
/// Dividers are tried in ascending order so the finest resolution wins.
pub fn select_divider(clock: &TimerClock, frequency_hz: u32) -> Result<DividerChoice, TimerError> {
    if frequency_hz == 0 {
        return Err(TimerError::ZeroFrequency);
    }

    let max_compare = clock.max_compare();

    for (index, &divider) in clock.dividers.iter().enumerate() {
        if divider == 0 {
            continue;
        }
        let compare = (clock.clock_hz / divider) as u64 / frequency_hz as u64;
        if compare == 0 {
            // Dividers only grow from here, so the count only shrinks
            break;
        }
        if compare <= max_compare {
            return Ok(DividerChoice {
                index,
                divider,
                compare,
            });
        }
    }

    Err(TimerError::UnsupportedFrequency)
}
