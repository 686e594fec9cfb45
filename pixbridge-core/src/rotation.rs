//! Sensor-to-device coordinate mapping
//!
//! Touch sensors report positions in their own units, fixed to the glass.
//! The panel can be rotated in 90° steps, so every rotation needs its own
//! axis swap and direction before the linear remap into pixels.
//!
//! Relative to rotation 0:
//!
//! | Rotation | device x from | device y from | flipped sensor axes |
//! |----------|---------------|---------------|---------------------|
//! | 0        | sensor x      | sensor y      | none                |
//! | 1        | sensor y      | sensor x      | x                   |
//! | 2        | sensor x      | sensor y      | x, y                |
//! | 3        | sensor y      | sensor x      | y                   |

use pixbridge_hal::{PanelDriver, Rotation};

/// Calibration window of a touch sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// Raw x reading at one edge of the glass
    pub x_min: u16,
    /// Raw x reading at the opposite edge
    pub x_max: u16,
    pub y_min: u16,
    pub y_max: u16,
    /// Sensor x runs against device x at rotation 0
    pub invert_x: bool,
    /// Sensor y runs against device y at rotation 0
    pub invert_y: bool,
}

impl Calibration {
    /// STMPE610-class FIFO controller on the common 2.4"-3.5" breakouts
    pub const DIGITAL: Calibration = Calibration {
        x_min: 100,
        x_max: 3800,
        y_min: 100,
        y_max: 3750,
        invert_x: true,
        invert_y: false,
    };

    /// 4-wire resistive panel read through a 10-bit ADC
    pub const ANALOG: Calibration = Calibration {
        x_min: 325,
        x_max: 750,
        y_min: 240,
        y_max: 840,
        invert_x: false,
        invert_y: true,
    };
}

/// Panel size and orientation at the time of a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelGeometry {
    pub width: u16,
    pub height: u16,
    pub rotation: Rotation,
}

impl PanelGeometry {
    pub const fn new(width: u16, height: u16, rotation: Rotation) -> Self {
        Self {
            width,
            height,
            rotation,
        }
    }

    /// Read the current geometry from a panel driver
    pub fn of<P: PanelDriver>(panel: &P) -> Self {
        Self::new(panel.width(), panel.height(), panel.rotation())
    }
}

/// Linear remap of `value` from `[in_lo, in_hi]` to `[out_lo, out_hi]`
///
/// Either range may be descending. Integer math with truncating division;
/// a degenerate input range maps everything to `out_lo`. Computed in `i64`,
/// so any `u16`-sized inputs are safe.
pub fn map_range(value: i64, in_lo: i64, in_hi: i64, out_lo: i64, out_hi: i64) -> i64 {
    let span = in_hi - in_lo;
    if span == 0 {
        return out_lo;
    }
    (value - in_lo) * (out_hi - out_lo) / span + out_lo
}

/// Map one sensor axis onto a device axis of `extent` pixels
fn map_axis(raw: u16, min: u16, max: u16, descending: bool, extent: u16) -> u16 {
    let last = extent.saturating_sub(1) as i64;
    let (lo, hi) = if descending {
        (max as i64, min as i64)
    } else {
        (min as i64, max as i64)
    };
    map_range(raw as i64, lo, hi, 0, last).clamp(0, last) as u16
}

/// Map a raw sensor position to device pixels
///
/// The result is always inside `[0, width-1] × [0, height-1]`, even for
/// readings outside the calibration window.
pub fn transform(raw_x: u16, raw_y: u16, cal: &Calibration, geometry: &PanelGeometry) -> (u16, u16) {
    let (flip_x, flip_y) = match geometry.rotation {
        Rotation::Deg0 => (false, false),
        Rotation::Deg90 => (true, false),
        Rotation::Deg180 => (true, true),
        Rotation::Deg270 => (false, true),
    };
    let x_desc = cal.invert_x ^ flip_x;
    let y_desc = cal.invert_y ^ flip_y;

    if geometry.rotation.swaps_axes() {
        (
            map_axis(raw_y, cal.y_min, cal.y_max, y_desc, geometry.width),
            map_axis(raw_x, cal.x_min, cal.x_max, x_desc, geometry.height),
        )
    } else {
        (
            map_axis(raw_x, cal.x_min, cal.x_max, x_desc, geometry.width),
            map_axis(raw_y, cal.y_min, cal.y_max, y_desc, geometry.height),
        )
    }
}
