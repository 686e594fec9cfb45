//! Renderer-to-panel flush path

use pixbridge_hal::{Area, PanelDriver};

use crate::renderer::Renderer;

/// Writes renderer areas to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlushBridge {
    byte_swap: bool,
}

impl FlushBridge {
    pub const fn new(byte_swap: bool) -> Self {
        Self { byte_swap }
    }

    pub const fn byte_swap(&self) -> bool {
        self.byte_swap
    }

    /// Write `pixels` into `area` and tell the renderer the flush is done
    ///
    /// Blocks until the panel transfer completes. At most
    /// `area.pixel_count()` cells are written; a shorter slice writes only
    /// what it holds.
    pub fn flush<P: PanelDriver, R: Renderer>(
        &self,
        panel: &mut P,
        renderer: &mut R,
        area: Area,
        pixels: &[u16],
    ) {
        let count = area.pixel_count();
        let cells = if pixels.len() < count {
            #[cfg(feature = "defmt")]
            defmt::warn!("flush: {} cells for a {}-pixel area", pixels.len(), count);
            pixels
        } else {
            &pixels[..count]
        };

        panel.start_write();
        panel.set_addr_window(area.x1, area.y1, area.width(), area.height());
        panel.write_pixels(cells, true, self.byte_swap);
        panel.end_write();

        renderer.flush_ready();
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Recording panel and renderer shared by the core unit tests

    use alloc::vec::Vec;

    use pixbridge_hal::{PanelDriver, Rotation, TickSink};

    use crate::renderer::{DisplayRegistration, Renderer};
    use crate::tick::TickCounter;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum PanelOp {
        StartWrite,
        EndWrite,
        Window(u16, u16, u16, u16),
        Pixels { len: usize, blocking: bool, byte_swap: bool },
    }

    pub struct MockPanel {
        pub width: u16,
        pub height: u16,
        pub rotation: Rotation,
        pub ops: Vec<PanelOp>,
    }

    impl MockPanel {
        pub fn new(width: u16, height: u16) -> Self {
            Self {
                width,
                height,
                rotation: Rotation::Deg0,
                ops: Vec::new(),
            }
        }
    }

    impl PanelDriver for MockPanel {
        fn width(&self) -> u16 {
            self.width
        }
        fn height(&self) -> u16 {
            self.height
        }
        fn rotation(&self) -> Rotation {
            self.rotation
        }
        fn start_write(&mut self) {
            self.ops.push(PanelOp::StartWrite);
        }
        fn end_write(&mut self) {
            self.ops.push(PanelOp::EndWrite);
        }
        fn set_addr_window(&mut self, x: u16, y: u16, width: u16, height: u16) {
            self.ops.push(PanelOp::Window(x, y, width, height));
        }
        fn write_pixels(&mut self, pixels: &[u16], blocking: bool, byte_swap: bool) {
            self.ops.push(PanelOp::Pixels {
                len: pixels.len(),
                blocking,
                byte_swap,
            });
        }
    }

    static TICKS: TickCounter = TickCounter::new();

    #[derive(Default)]
    pub struct MockRenderer {
        pub inits: u8,
        pub log_forwarding: bool,
        pub display: Option<DisplayRegistration>,
        pub pointer: bool,
        pub flush_ready: u32,
    }

    impl Renderer for MockRenderer {
        fn init(&mut self) {
            self.inits += 1;
        }
        fn enable_log_forwarding(&mut self) {
            self.log_forwarding = true;
        }
        fn register_display(&mut self, display: DisplayRegistration) {
            self.display = Some(display);
        }
        fn register_pointer(&mut self) {
            self.pointer = true;
        }
        fn flush_ready(&mut self) {
            self.flush_ready += 1;
        }
        fn tick_sink(&self) -> &'static dyn TickSink {
            &TICKS
        }
    }
}
