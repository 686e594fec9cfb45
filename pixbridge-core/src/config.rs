//! Bridge configuration
//!
//! Compile-time constants for the renderer glue, plus the runtime
//! [`BridgeConfig`] the board hands to [`crate::Bridge::new`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use pixbridge_hal::PanelEndianness;

/// Renderer tick interval in milliseconds (1-10 ms recommended)
pub const TICK_INTERVAL_MS: u32 = 10;

/// Consecutive below-threshold polls before a resistive panel reports release
pub const RELEASE_DEBOUNCE_POLLS: u8 = 4;

/// Rows of pixels in the renderer work buffer
#[cfg(not(feature = "constrained-ram"))]
pub const BUFFER_ROWS: usize = 16;

/// Rows of pixels in the renderer work buffer
///
/// Kept small so the buffer does not take most of a SAMD21's RAM.
#[cfg(feature = "constrained-ram")]
pub const BUFFER_ROWS: usize = 8;

/// Default maximum horizontal resolution the work buffer is sized for
pub const DEFAULT_HOR_RES_MAX: u16 = 320;

/// Runtime bridge settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BridgeConfig {
    /// Widest panel width, in pixels, across all rotations
    pub hor_res_max: u16,
    /// Rows of pixels in the work buffer
    pub buffer_rows: usize,
    /// Tick interval in milliseconds
    pub tick_interval_ms: u32,
    /// Renderer stores RGB565 cells byte-swapped
    pub renderer_color_swap: bool,
    /// How the panel's wire order relates to the renderer's
    pub endianness: PanelEndianness,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            hor_res_max: DEFAULT_HOR_RES_MAX,
            buffer_rows: BUFFER_ROWS,
            tick_interval_ms: TICK_INTERVAL_MS,
            renderer_color_swap: false,
            endianness: PanelEndianness::Inverted,
        }
    }
}

impl BridgeConfig {
    /// Default settings with a specific panel endianness
    pub fn for_endianness(endianness: PanelEndianness) -> Self {
        Self {
            endianness,
            ..Self::default()
        }
    }

    /// Number of 16-bit cells in the work buffer
    ///
    /// Returns `None` if the product overflows.
    pub fn buffer_cells(&self) -> Option<usize> {
        (self.hor_res_max as usize).checked_mul(self.buffer_rows)
    }

    /// Tick interrupt frequency in Hz
    ///
    /// Zero if the interval is zero or longer than one second, which every
    /// timer backend rejects.
    pub fn tick_frequency_hz(&self) -> u32 {
        if self.tick_interval_ms == 0 {
            0
        } else {
            1000 / self.tick_interval_ms
        }
    }

    /// Byte-swap flag passed to the panel on flush
    pub fn byte_swap(&self) -> bool {
        self.endianness.byte_swap(self.renderer_color_swap)
    }
}
