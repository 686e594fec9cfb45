//! Renderer-facing interface
//!
//! The bridge drives a retained-mode renderer through this trait. The
//! renderer owns widgets, invalidation and the draw loop; the bridge
//! owns the hardware.

use pixbridge_hal::TickSink;

/// Display description handed to the renderer at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayRegistration {
    /// Panel width at the current rotation
    pub hor_res: u16,
    /// Panel height at the current rotation
    pub ver_res: u16,
    /// Size of the work buffer, in 16-bit cells
    pub buffer_cells: usize,
}

/// A log line forwarded by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecord<'a> {
    pub file: &'a str,
    pub line: u32,
    pub message: &'a str,
}

impl<'a> LogRecord<'a> {
    pub const fn new(file: &'a str, line: u32, message: &'a str) -> Self {
        Self {
            file,
            line,
            message,
        }
    }
}

/// Retained-mode renderer
pub trait Renderer {
    /// One-time renderer setup
    fn init(&mut self);

    /// Route the renderer's log output to the bridge's log callback
    fn enable_log_forwarding(&mut self);

    /// Register the display with its work buffer size
    fn register_display(&mut self, display: DisplayRegistration);

    /// Register a pointer input device polled through the bridge
    fn register_pointer(&mut self);

    /// Signal that the last flush reached the panel
    fn flush_ready(&mut self);

    /// Tick counter the timer interrupt advances
    fn tick_sink(&self) -> &'static dyn TickSink;
}
