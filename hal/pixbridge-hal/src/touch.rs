//! Touch sensor abstractions
//!
//! Two sensing modalities are supported:
//!
//! - [`FifoTouch`]: a digital controller (STMPE610-class) that buffers
//!   samples in a hardware FIFO between polls
//! - [`AnalogTouch`]: a raw 4-wire resistive panel read through the ADC,
//!   reporting an instantaneous (x, y, pressure) triple

/// Raw sensor reading, in sensor units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawPoint {
    pub x: u16,
    pub y: u16,
    /// Pressure (z); 0 when the driver does not measure it
    pub z: u16,
}

impl RawPoint {
    pub const fn new(x: u16, y: u16, z: u16) -> Self {
        Self { x, y, z }
    }
}

/// FIFO-buffered digital touch controller
pub trait FifoTouch {
    /// Number of samples waiting in the FIFO
    fn buffer_size(&mut self) -> u8;

    /// Pop the oldest sample from the FIFO
    fn get_point(&mut self) -> RawPoint;

    /// Called after the sampler drains what looked like the last sample
    ///
    /// Controllers whose FIFO depth reads unreliably near empty on some
    /// hosts can stall here to let further samples arrive. The default
    /// does nothing.
    fn settle_after_drain(&mut self) {}
}

/// Resistive touch panel sampled through the ADC
pub trait AnalogTouch {
    /// Take one instantaneous (x, y, pressure) reading
    fn get_point(&mut self) -> RawPoint;

    /// Pressure below which the panel is considered untouched
    fn pressure_threshold(&self) -> u16;
}

/// Placeholder for the unused modality slot of a touch backend
///
/// Uninhabited: a value of this type can never exist, so the trait
/// methods are statically unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoTouch {}

impl FifoTouch for NoTouch {
    fn buffer_size(&mut self) -> u8 {
        match *self {}
    }

    fn get_point(&mut self) -> RawPoint {
        match *self {}
    }
}

impl AnalogTouch for NoTouch {
    fn get_point(&mut self) -> RawPoint {
        match *self {}
    }

    fn pressure_threshold(&self) -> u16 {
        match *self {}
    }
}
