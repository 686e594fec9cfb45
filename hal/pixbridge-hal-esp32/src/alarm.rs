//! Periodic alarm tick backend

use pixbridge_hal::timer::{select_divider, Tick, TickTimer, TimerClock, TimerError};

/// System timer as seen by alarms: 1 µs resolution, 64-bit period
pub const ALARM_CLOCK: TimerClock = TimerClock {
    clock_hz: 1_000_000,
    counter_bits: 64,
    dividers: &[1],
};

/// A periodic software alarm on the system timer
///
/// The alarm callback runs from the timer ISR and calls `tick.fire()`.
pub trait PeriodicAlarm {
    /// Arm the alarm to fire every `period_us` microseconds
    fn attach_us(&mut self, period_us: u64, tick: Tick);

    /// Disarm the alarm
    fn detach(&mut self);
}

/// Tick timer backed by a periodic system-timer alarm
pub struct Esp32TickTimer<A> {
    alarm: A,
    period_us: Option<u64>,
}

impl<A: PeriodicAlarm> Esp32TickTimer<A> {
    pub fn new(alarm: A) -> Self {
        Self {
            alarm,
            period_us: None,
        }
    }

    /// Alarm period for a tick frequency
    pub fn plan(frequency_hz: u32) -> Result<u64, TimerError> {
        select_divider(&ALARM_CLOCK, frequency_hz).map(|choice| choice.compare)
    }

    /// Currently armed period
    pub fn period_us(&self) -> Option<u64> {
        self.period_us
    }

    /// Disarm and hand back the alarm
    pub fn release(mut self) -> A {
        self.stop();
        self.alarm
    }
}

impl<A: PeriodicAlarm> TickTimer for Esp32TickTimer<A> {
    fn start(&mut self, frequency_hz: u32, tick: Tick) -> Result<(), TimerError> {
        let period_us = Self::plan(frequency_hz)?;

        if self.period_us.is_some() {
            self.alarm.detach();
        }
        self.alarm.attach_us(period_us, tick);
        self.period_us = Some(period_us);

        #[cfg(feature = "defmt")]
        defmt::debug!("alarm tick: {}Hz every {}us", frequency_hz, period_us);

        Ok(())
    }

    fn stop(&mut self) {
        if self.period_us.take().is_some() {
            self.alarm.detach();
        }
    }

    fn is_running(&self) -> bool {
        self.period_us.is_some()
    }
}
