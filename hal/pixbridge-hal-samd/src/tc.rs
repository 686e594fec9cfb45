//! TC timer/counter tick backend
//!
//! The TC runs in 16-bit match-PWM mode: the counter resets on compare
//! channel 0 and raises the CC0 interrupt, giving a fixed-rate callback.

use pixbridge_hal::timer::{select_divider, Tick, TickTimer, TimerClock, TimerError};

/// TC instance used by default
///
/// TCs are paired into 32-bit counters and parallel TFTs take TC2 for the
/// write strobe, so the tick uses TC4 or above.
pub const DEFAULT_TC: u8 = 4;

/// Clock tree seen by the TC: 48 MHz GCLK, 16-bit counter
pub const TC_CLOCK: TimerClock = TimerClock {
    clock_hz: 48_000_000,
    counter_bits: 16,
    dividers: &[1, 2, 4, 8, 16, 64, 256],
};

/// TC clock prescaler settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TcPrescaler {
    Div1,
    Div2,
    Div4,
    Div8,
    Div16,
    Div64,
    Div256,
}

impl TcPrescaler {
    /// Prescalers in the same order as [`TC_CLOCK`] dividers
    const ORDERED: [TcPrescaler; 7] = [
        TcPrescaler::Div1,
        TcPrescaler::Div2,
        TcPrescaler::Div4,
        TcPrescaler::Div8,
        TcPrescaler::Div16,
        TcPrescaler::Div64,
        TcPrescaler::Div256,
    ];

    /// Division factor
    pub const fn divider(self) -> u32 {
        match self {
            TcPrescaler::Div1 => 1,
            TcPrescaler::Div2 => 2,
            TcPrescaler::Div4 => 4,
            TcPrescaler::Div8 => 8,
            TcPrescaler::Div16 => 16,
            TcPrescaler::Div64 => 64,
            TcPrescaler::Div256 => 256,
        }
    }
}

/// Register-level access to one TC peripheral
///
/// Implementations own the interrupt vector: `attach` stores the heartbeat
/// where the TC handler can reach it, and the handler calls `tick.fire()`
/// on every CC0 match.
pub trait TimerCounter {
    /// Program prescaler and compare for 16-bit match-PWM mode
    fn configure(&mut self, prescaler: TcPrescaler, compare: u16);

    /// Install the CC0 callback
    fn attach(&mut self, tick: Tick);

    /// Remove the CC0 callback
    fn detach(&mut self);

    /// Enable or disable the counter
    fn enable(&mut self, enabled: bool);
}

/// Tick timer backed by a SAMD TC
pub struct SamdTickTimer<TC> {
    tc: TC,
    /// Last programmed (prescaler, compare), for diagnostics
    programmed: Option<(TcPrescaler, u16)>,
    running: bool,
}

impl<TC: TimerCounter> SamdTickTimer<TC> {
    /// Wrap a TC peripheral
    pub fn new(tc: TC) -> Self {
        Self {
            tc,
            programmed: None,
            running: false,
        }
    }

    /// Compute the prescaler and compare value for a tick frequency
    pub fn plan(frequency_hz: u32) -> Result<(TcPrescaler, u16), TimerError> {
        let choice = select_divider(&TC_CLOCK, frequency_hz)?;
        // select_divider bounds compare to 16 bits
        Ok((TcPrescaler::ORDERED[choice.index], choice.compare as u16))
    }

    /// Prescaler and compare currently programmed
    pub fn programmed(&self) -> Option<(TcPrescaler, u16)> {
        self.programmed
    }

    /// Stop the counter and hand back the peripheral
    pub fn release(mut self) -> TC {
        self.stop();
        self.tc
    }
}

impl<TC: TimerCounter> TickTimer for SamdTickTimer<TC> {
    fn start(&mut self, frequency_hz: u32, tick: Tick) -> Result<(), TimerError> {
        let (prescaler, compare) = Self::plan(frequency_hz)?;

        if self.running {
            self.stop();
        }

        self.tc.configure(prescaler, compare);
        self.tc.attach(tick);
        self.tc.enable(true);

        self.programmed = Some((prescaler, compare));
        self.running = true;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "TC{} tick: {}Hz via {} compare {}",
            DEFAULT_TC,
            frequency_hz,
            prescaler,
            compare
        );

        Ok(())
    }

    fn stop(&mut self) {
        if self.running {
            self.tc.enable(false);
            self.tc.detach();
            self.running = false;
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
