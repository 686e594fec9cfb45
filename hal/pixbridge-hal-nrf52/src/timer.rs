//! TIMER peripheral tick backend
//!
//! The TIMER runs in timer mode from the 16 MHz HFCLK with a 2^n
//! prescaler. Compare channel 0 raises an interrupt and the
//! COMPARE0→CLEAR shortcut restarts the count, so the interrupt repeats
//! at a fixed rate.

use pixbridge_hal::timer::{select_divider, Tick, TickTimer, TimerClock, TimerError};

/// Clock tree seen by the TIMER in 16-bit mode
pub const TIMER_CLOCK: TimerClock = TimerClock {
    clock_hz: 16_000_000,
    counter_bits: 16,
    dividers: &[1, 2, 4, 8, 16, 32, 64, 128, 256, 512],
};

/// NVIC priority for the tick interrupt
///
/// Lower urgency than the SoftDevice's reserved levels (0 and 1).
pub const IRQ_PRIORITY: u8 = 2;

/// Register-level access to one TIMER instance
pub trait NrfTimer {
    /// TASKS_STOP then TASKS_CLEAR
    fn halt(&mut self);

    /// Timer mode, 16-bit bitmode, PRESCALER, CC[0], INTENSET.COMPARE0
    /// and the COMPARE0_CLEAR shortcut
    fn configure(&mut self, prescaler: u8, compare: u16);

    /// Store the heartbeat for the handler, then disable, clear pending,
    /// set priority and re-enable the TIMER IRQ in the NVIC
    fn attach(&mut self, tick: Tick, priority: u8);

    /// Disable the IRQ and drop the heartbeat
    fn detach(&mut self);

    /// TASKS_START
    fn start(&mut self);

    /// Clear EVENTS_COMPARE[0] if set, returning whether it was set
    fn clear_compare_event(&self) -> bool;
}

/// Body of the TIMER interrupt handler
///
/// Acknowledges the compare event and advances the renderer clock. Touches
/// nothing but the timer's event register and the tick sink.
#[inline]
pub fn handle_interrupt<T: NrfTimer>(timer: &T, tick: &Tick) {
    timer.clear_compare_event();
    tick.fire();
}

/// Tick timer backed by an nRF52 TIMER
pub struct Nrf52TickTimer<T> {
    timer: T,
    running: bool,
}

impl<T: NrfTimer> Nrf52TickTimer<T> {
    /// Wrap a TIMER peripheral
    pub fn new(timer: T) -> Self {
        Self {
            timer,
            running: false,
        }
    }

    /// Compute the PRESCALER exponent and CC[0] value for a tick frequency
    pub fn plan(frequency_hz: u32) -> Result<(u8, u16), TimerError> {
        let choice = select_divider(&TIMER_CLOCK, frequency_hz)?;
        // Dividers are 2^index; compare is bounded to 16 bits
        Ok((choice.index as u8, choice.compare as u16))
    }

    /// Access the wrapped peripheral (for the interrupt handler)
    pub fn peripheral(&self) -> &T {
        &self.timer
    }

    /// Stop the timer and hand back the peripheral
    pub fn release(mut self) -> T {
        self.stop();
        self.timer
    }
}

impl<T: NrfTimer> TickTimer for Nrf52TickTimer<T> {
    fn start(&mut self, frequency_hz: u32, tick: Tick) -> Result<(), TimerError> {
        let (prescaler, compare) = Self::plan(frequency_hz)?;

        self.timer.halt();
        self.timer.configure(prescaler, compare);
        self.timer.attach(tick, IRQ_PRIORITY);
        self.timer.start();
        self.running = true;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "TIMER tick: {}Hz, prescaler 2^{}, CC0 {}",
            frequency_hz,
            prescaler,
            compare
        );

        Ok(())
    }

    fn stop(&mut self) {
        if self.running {
            self.timer.halt();
            self.timer.detach();
            self.running = false;
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::sync::atomic::{AtomicU32, Ordering};
    use pixbridge_hal::TickSink;

    struct CountingSink(AtomicU32);
    impl TickSink for CountingSink {
        fn tick_inc(&self, ms: u32) {
            self.0.fetch_add(ms, Ordering::Relaxed);
        }
    }

    #[derive(Default)]
    struct MockTimer {
        prescaler: Option<u8>,
        compare: Option<u16>,
        priority: Option<u8>,
        started: bool,
        halts: u8,
        event: Cell<bool>,
    }

    impl NrfTimer for MockTimer {
        fn halt(&mut self) {
            self.started = false;
            self.halts += 1;
        }
        fn configure(&mut self, prescaler: u8, compare: u16) {
            self.prescaler = Some(prescaler);
            self.compare = Some(compare);
        }
        fn attach(&mut self, _tick: Tick, priority: u8) {
            self.priority = Some(priority);
        }
        fn detach(&mut self) {
            self.priority = None;
        }
        fn start(&mut self) {
            self.started = true;
        }
        fn clear_compare_event(&self) -> bool {
            self.event.replace(false)
        }
    }

    #[test]
    fn test_plan_100hz() {
        // 16MHz / 100Hz = 160000 overflows 16 bits; /4 gives 40000
        assert_eq!(Nrf52TickTimer::<MockTimer>::plan(100), Ok((2, 40_000)));
    }

    #[test]
    fn test_plan_limits() {
        // 16MHz / 512 / 65535 ≈ 0.48Hz, so 1Hz still fits
        assert!(Nrf52TickTimer::<MockTimer>::plan(1).is_ok());
        assert_eq!(
            Nrf52TickTimer::<MockTimer>::plan(0),
            Err(TimerError::ZeroFrequency)
        );
        assert_eq!(
            Nrf52TickTimer::<MockTimer>::plan(20_000_000),
            Err(TimerError::UnsupportedFrequency)
        );
    }

    #[test]
    fn test_start_and_stop() {
        static SINK: CountingSink = CountingSink(AtomicU32::new(0));

        let mut timer = Nrf52TickTimer::new(MockTimer::default());
        timer.start(100, Tick::new(&SINK, 10)).unwrap();
        assert!(timer.is_running());
        assert!(timer.peripheral().started);
        assert_eq!(timer.peripheral().priority, Some(IRQ_PRIORITY));
        assert_eq!(timer.peripheral().compare, Some(40_000));

        let hw = timer.release();
        assert!(!hw.started);
        assert_eq!(hw.priority, None);
        // Halted once before configuring, once on stop
        assert_eq!(hw.halts, 2);
    }

    #[test]
    fn test_interrupt_handler() {
        static SINK: CountingSink = CountingSink(AtomicU32::new(0));

        let hw = MockTimer::default();
        let tick = Tick::new(&SINK, 10);

        hw.event.set(true);
        handle_interrupt(&hw, &tick);
        assert!(!hw.event.get());

        // Spurious entry still advances the clock
        handle_interrupt(&hw, &tick);
        assert_eq!(SINK.0.load(Ordering::Relaxed), 20);
    }
}
