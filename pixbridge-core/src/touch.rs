//! Touch sampling
//!
//! Turns raw readings from either touch modality into renderer pointer
//! samples in device coordinates.
//!
//! A FIFO controller buffers samples between polls; each poll pops one
//! and tells the renderer whether more are waiting. A resistive panel
//! reports instantaneous pressure, which drops out for a few polls
//! during a normal press, so release is debounced.

use pixbridge_hal::{AnalogTouch, FifoTouch, NoTouch, PanelDriver};

use crate::config::RELEASE_DEBOUNCE_POLLS;
use crate::rotation::{transform, Calibration, PanelGeometry};

/// Pointer state reported to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PointerState {
    Pressed,
    Released,
}

/// One pointer sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchSample {
    pub state: PointerState,
    /// Device x, in pixels
    pub x: u16,
    /// Device y, in pixels
    pub y: u16,
    /// More buffered samples are waiting; poll again before the next frame
    pub has_more: bool,
}

/// Sampler state carried between polls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchState {
    pub last_x: u16,
    pub last_y: u16,
    /// Consecutive below-threshold polls (analog only, saturating)
    pub release_count: u8,
}

impl TouchState {
    pub const fn new() -> Self {
        Self {
            last_x: 0,
            last_y: 0,
            release_count: 0,
        }
    }

    fn sample(&self, state: PointerState, has_more: bool) -> TouchSample {
        TouchSample {
            state,
            x: self.last_x,
            y: self.last_y,
            has_more,
        }
    }
}

/// Poll a FIFO controller once
pub fn poll_fifo<F: FifoTouch>(
    touch: &mut F,
    geometry: &PanelGeometry,
    state: &mut TouchState,
) -> TouchSample {
    let fifo = touch.buffer_size();
    if fifo == 0 {
        return state.sample(PointerState::Released, false);
    }

    let point = touch.get_point();
    let (x, y) = transform(point.x, point.y, &Calibration::DIGITAL, geometry);
    state.last_x = x;
    state.last_y = y;

    let has_more = fifo > 1;
    if !has_more {
        touch.settle_after_drain();
    }

    state.sample(PointerState::Pressed, has_more)
}

/// Poll a resistive panel once
pub fn poll_analog<A: AnalogTouch>(
    touch: &mut A,
    geometry: &PanelGeometry,
    state: &mut TouchState,
) -> TouchSample {
    let point = touch.get_point();

    if point.z < touch.pressure_threshold() {
        state.release_count = state.release_count.saturating_add(1);
        let pointer = if state.release_count >= RELEASE_DEBOUNCE_POLLS {
            PointerState::Released
        } else {
            PointerState::Pressed
        };
        return state.sample(pointer, false);
    }

    state.release_count = 0;
    let (x, y) = transform(point.x, point.y, &Calibration::ANALOG, geometry);
    state.last_x = x;
    state.last_y = y;

    state.sample(PointerState::Pressed, false)
}

/// Touch hardware attached to the panel, if any
pub enum TouchBackend<F = NoTouch, A = NoTouch> {
    None,
    DigitalFifo(F),
    AnalogResistive(A),
}

impl TouchBackend<NoTouch, NoTouch> {
    /// No touch hardware
    pub const fn none() -> Self {
        TouchBackend::None
    }
}

impl<F: FifoTouch> TouchBackend<F, NoTouch> {
    pub const fn fifo(touch: F) -> Self {
        TouchBackend::DigitalFifo(touch)
    }
}

impl<A: AnalogTouch> TouchBackend<NoTouch, A> {
    pub const fn analog(touch: A) -> Self {
        TouchBackend::AnalogResistive(touch)
    }
}

impl<F: FifoTouch, A: AnalogTouch> TouchBackend<F, A> {
    pub fn is_present(&self) -> bool {
        !matches!(self, TouchBackend::None)
    }

    /// Poll whichever modality is attached
    pub fn poll(&mut self, geometry: &PanelGeometry, state: &mut TouchState) -> Option<TouchSample> {
        match self {
            TouchBackend::None => None,
            TouchBackend::DigitalFifo(touch) => Some(poll_fifo(touch, geometry, state)),
            TouchBackend::AnalogResistive(touch) => Some(poll_analog(touch, geometry, state)),
        }
    }
}

/// Touch backend plus its carried state
pub struct TouchSampler<F = NoTouch, A = NoTouch> {
    backend: TouchBackend<F, A>,
    state: TouchState,
}

impl<F: FifoTouch, A: AnalogTouch> TouchSampler<F, A> {
    pub const fn new(backend: TouchBackend<F, A>) -> Self {
        Self {
            backend,
            state: TouchState::new(),
        }
    }

    pub fn is_present(&self) -> bool {
        self.backend.is_present()
    }

    pub fn state(&self) -> &TouchState {
        &self.state
    }

    /// Poll once against the panel's current size and rotation
    pub fn read<P: PanelDriver>(&mut self, panel: &P) -> Option<TouchSample> {
        let geometry = PanelGeometry::of(panel);
        self.backend.poll(&geometry, &mut self.state)
    }

    pub fn backend_mut(&mut self) -> &mut TouchBackend<F, A> {
        &mut self.backend
    }
}
