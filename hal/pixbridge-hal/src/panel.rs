//! Display panel abstractions
//!
//! Provides the subset of a TFT driver the bridge needs: geometry,
//! rotation, and a blocking windowed pixel write. Pixels are 16-bit
//! RGB565 cells.

/// Panel rotation in 90° steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// Native orientation
    #[default]
    Deg0 = 0,
    /// 90° clockwise
    Deg90 = 1,
    /// 180°
    Deg180 = 2,
    /// 270° clockwise
    Deg270 = 3,
}

impl Rotation {
    /// All rotations, in driver order
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Convert a driver rotation value (0-3). Higher bits are ignored,
    /// matching drivers that store rotation modulo 4.
    pub const fn from_raw(raw: u8) -> Self {
        match raw & 0x03 {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }

    /// Whether this rotation swaps the panel's x and y axes
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

/// Inclusive rectangle in device coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Area {
    pub x1: u16,
    pub y1: u16,
    pub x2: u16,
    pub y2: u16,
}

impl Area {
    /// Create an area from inclusive corners
    pub const fn new(x1: u16, y1: u16, x2: u16, y2: u16) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Width in pixels (x2 - x1 + 1)
    ///
    /// Zero for an inverted area; saturates at `u16::MAX` for a full
    /// 65536-pixel span.
    pub const fn width(&self) -> u16 {
        saturate_u16(span(self.x1, self.x2))
    }

    /// Height in pixels (y2 - y1 + 1), with the same limits as `width`
    pub const fn height(&self) -> u16 {
        saturate_u16(span(self.y1, self.y2))
    }

    /// Number of pixels covered, exact for any corners
    pub const fn pixel_count(&self) -> usize {
        span(self.x1, self.x2) as usize * span(self.y1, self.y2) as usize
    }
}

/// Inclusive span length; zero when `hi < lo`
const fn span(lo: u16, hi: u16) -> u32 {
    (hi as u32 + 1).saturating_sub(lo as u32)
}

const fn saturate_u16(v: u32) -> u16 {
    if v > u16::MAX as u32 {
        u16::MAX
    } else {
        v as u16
    }
}

/// How the panel's wire byte order relates to the renderer's color layout
///
/// The renderer may already store RGB565 cells byte-swapped. Depending on
/// the host's SPI peripheral, the driver must then either undo or keep
/// that swap so the panel sees big-endian pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PanelEndianness {
    /// Swap on the wire unless the renderer already swapped
    #[default]
    Inverted,
    /// Swap on the wire exactly when the renderer swapped
    FollowRenderer,
}

impl PanelEndianness {
    /// Byte-swap flag for `write_pixels`
    pub const fn byte_swap(self, renderer_color_swap: bool) -> bool {
        match self {
            PanelEndianness::Inverted => !renderer_color_swap,
            PanelEndianness::FollowRenderer => renderer_color_swap,
        }
    }
}

/// Framebuffer-style display driver
///
/// The panel is assumed to be initialized by the caller before it is
/// handed to the bridge.
pub trait PanelDriver {
    /// Width in pixels at the current rotation
    fn width(&self) -> u16;

    /// Height in pixels at the current rotation
    fn height(&self) -> u16;

    /// Current rotation
    fn rotation(&self) -> Rotation;

    /// Begin a bus transaction (assert chip select, lock the bus)
    fn start_write(&mut self);

    /// End the current bus transaction
    fn end_write(&mut self);

    /// Set the address window for subsequent pixel writes
    fn set_addr_window(&mut self, x: u16, y: u16, width: u16, height: u16);

    /// Write pixels into the current address window
    ///
    /// - `blocking`: wait until the transfer is complete before returning
    /// - `byte_swap`: swap the two bytes of every cell on the wire
    fn write_pixels(&mut self, pixels: &[u16], blocking: bool, byte_swap: bool);
}
