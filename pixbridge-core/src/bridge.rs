//! Bridge lifecycle
//!
//! A [`Bridge`] owns everything between the renderer and the hardware:
//! the panel, the touch backend, the tick timer and the pixel work
//! buffer. It is built empty with [`Bridge::new`] and brought up with
//! [`Bridge::init`].
//!
//! Init order matters. Everything that can fail (buffer allocation, timer
//! setup) runs before anything is registered with the renderer, which
//! has no way to unregister. A failed init leaves the bridge as it was
//! and can be retried.

use alloc::vec::Vec;

use pixbridge_hal::{AnalogTouch, Area, FifoTouch, NoTouch, PanelDriver, Tick, TickTimer, TimerError};

use crate::config::BridgeConfig;
use crate::console::DebugConsole;
use crate::flush::FlushBridge;
use crate::renderer::{DisplayRegistration, LogRecord, Renderer};
use crate::touch::{TouchBackend, TouchSample, TouchSampler};

/// Bridge initialization errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeError {
    /// Pixel work buffer could not be allocated
    Allocation,
    /// Tick timer could not be configured
    Timer(TimerError),
    /// `init` called on a running bridge
    AlreadyInitialized,
}

impl From<TimerError> for BridgeError {
    fn from(e: TimerError) -> Self {
        BridgeError::Timer(e)
    }
}

/// Renderer glue for one panel
pub struct Bridge<P, F, A, T: TickTimer> {
    config: BridgeConfig,
    panel: P,
    touch: TouchSampler<F, A>,
    timer: T,
    flush: FlushBridge,
    pixels: Option<Vec<u16>>,
    debug: bool,
    /// Reserved for double buffering; nothing reads it yet
    first_frame: bool,
}

impl<P, T> Bridge<P, NoTouch, NoTouch, T>
where
    P: PanelDriver,
    T: TickTimer,
{
    /// Bridge for a panel without touch hardware
    pub fn without_touch(config: BridgeConfig, panel: P, timer: T) -> Self {
        Self::new(config, panel, TouchBackend::none(), timer)
    }
}

impl<P, F, A, T> Bridge<P, F, A, T>
where
    P: PanelDriver,
    F: FifoTouch,
    A: AnalogTouch,
    T: TickTimer,
{
    /// Create an uninitialized bridge
    ///
    /// The panel must already be initialized.
    pub fn new(config: BridgeConfig, panel: P, touch: TouchBackend<F, A>, timer: T) -> Self {
        Self {
            flush: FlushBridge::new(config.byte_swap()),
            config,
            panel,
            touch: TouchSampler::new(touch),
            timer,
            pixels: None,
            debug: false,
            first_frame: false,
        }
    }

    /// Bring the bridge up and register it with the renderer
    pub fn init<R: Renderer>(&mut self, renderer: &mut R, debug: bool) -> Result<(), BridgeError> {
        if self.is_initialized() {
            return Err(BridgeError::AlreadyInitialized);
        }

        renderer.init();
        if debug {
            renderer.enable_log_forwarding();
            // The renderer cannot turn forwarding off again
            self.debug = true;
        }

        let cells = self.config.buffer_cells().ok_or(BridgeError::Allocation)?;
        let mut pixels = Vec::new();
        if pixels.try_reserve_exact(cells).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("bridge: cannot allocate {} pixel cells", cells);
            return Err(BridgeError::Allocation);
        }
        pixels.resize(cells, 0);

        let tick = Tick::new(renderer.tick_sink(), self.config.tick_interval_ms);
        if let Err(e) = self.timer.start(self.config.tick_frequency_hz(), tick) {
            #[cfg(feature = "defmt")]
            defmt::warn!("bridge: tick timer failed: {}", e);
            return Err(e.into());
        }

        renderer.register_display(DisplayRegistration {
            hor_res: self.panel.width(),
            ver_res: self.panel.height(),
            buffer_cells: cells,
        });
        if self.touch.is_present() {
            renderer.register_pointer();
        }

        self.pixels = Some(pixels);
        self.first_frame = true;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "bridge: {}x{} panel, {} cells, tick {}ms",
            self.panel.width(),
            self.panel.height(),
            cells,
            self.config.tick_interval_ms
        );

        Ok(())
    }

    /// Stop the tick and free the work buffer
    ///
    /// Log forwarding, once enabled, stays on.
    pub fn deinit(&mut self) {
        self.timer.stop();
        self.pixels = None;
        self.first_frame = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.pixels.is_some()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Replace the settings of a bridge that is down
    pub fn set_config(&mut self, config: BridgeConfig) -> Result<(), BridgeError> {
        if self.is_initialized() {
            return Err(BridgeError::AlreadyInitialized);
        }
        self.flush = FlushBridge::new(config.byte_swap());
        self.config = config;
        Ok(())
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn first_frame(&self) -> bool {
        self.first_frame
    }

    /// Pixel work buffer; empty before `init`
    pub fn work_buffer(&self) -> &[u16] {
        self.pixels.as_deref().unwrap_or(&[])
    }

    pub fn work_buffer_mut(&mut self) -> &mut [u16] {
        self.pixels.as_deref_mut().unwrap_or(&mut [])
    }

    /// Write an area to the panel and signal the renderer
    pub fn flush<R: Renderer>(&mut self, renderer: &mut R, area: Area, pixels: &[u16]) {
        self.flush.flush(&mut self.panel, renderer, area, pixels);
        self.first_frame = false;
    }

    /// Flush an area the renderer drew into the work buffer
    pub fn flush_work_buffer<R: Renderer>(&mut self, renderer: &mut R, area: Area) {
        let pixels = self.pixels.as_deref().unwrap_or(&[]);
        self.flush.flush(&mut self.panel, renderer, area, pixels);
        self.first_frame = false;
    }

    /// Poll the touch sensor
    ///
    /// `None` when the bridge is down or has no touch hardware.
    pub fn read_input(&mut self) -> Option<TouchSample> {
        if !self.is_initialized() {
            return None;
        }
        self.touch.read(&self.panel)
    }

    /// Forward a renderer log record to the console
    ///
    /// Written once any `init` call with `debug` has enabled forwarding on
    /// the renderer, even if that call later failed; dropped otherwise.
    pub fn log<W: embedded_io::Write>(
        &self,
        console: &mut DebugConsole<W>,
        record: &LogRecord<'_>,
    ) -> Result<(), W::Error> {
        if !self.debug {
            return Ok(());
        }
        console.write_record(record)
    }
}

impl<P, F, A, T: TickTimer> Drop for Bridge<P, F, A, T> {
    fn drop(&mut self) {
        self.timer.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flush::mock::{MockPanel, MockRenderer, PanelOp};
    use pixbridge_hal::RawPoint;

    #[derive(Default)]
    struct MockTimer {
        frequency: Option<u32>,
        delta_ms: Option<u32>,
        starts: u8,
        fail: Option<TimerError>,
    }

    impl TickTimer for MockTimer {
        fn start(&mut self, frequency_hz: u32, tick: Tick) -> Result<(), TimerError> {
            self.starts += 1;
            if let Some(e) = self.fail {
                return Err(e);
            }
            self.frequency = Some(frequency_hz);
            self.delta_ms = Some(tick.delta_ms());
            Ok(())
        }
        fn stop(&mut self) {
            self.frequency = None;
        }
        fn is_running(&self) -> bool {
            self.frequency.is_some()
        }
    }

    struct Pen;

    impl AnalogTouch for Pen {
        fn get_point(&mut self) -> RawPoint {
            RawPoint::new(750, 240, 500)
        }
        fn pressure_threshold(&self) -> u16 {
            100
        }
    }

    fn small_config() -> BridgeConfig {
        BridgeConfig {
            hor_res_max: 20,
            buffer_rows: 20,
            ..BridgeConfig::default()
        }
    }

    #[test]
    fn test_init_registers_display() {
        let mut bridge = Bridge::without_touch(small_config(), MockPanel::new(240, 320), MockTimer::default());
        let mut renderer = MockRenderer::default();

        bridge.init(&mut renderer, false).unwrap();

        assert!(bridge.is_initialized());
        assert_eq!(bridge.work_buffer().len(), 400);
        assert_eq!(bridge.timer().frequency, Some(100));
        assert_eq!(bridge.timer().delta_ms, Some(10));
        assert_eq!(
            renderer.display,
            Some(DisplayRegistration {
                hor_res: 240,
                ver_res: 320,
                buffer_cells: 400
            })
        );
        assert!(!renderer.pointer);
        assert!(!renderer.log_forwarding);
        assert!(bridge.first_frame());
    }

    #[test]
    fn test_double_init_rejected() {
        let mut bridge = Bridge::without_touch(small_config(), MockPanel::new(240, 320), MockTimer::default());
        let mut renderer = MockRenderer::default();

        bridge.init(&mut renderer, false).unwrap();
        assert_eq!(bridge.init(&mut renderer, true), Err(BridgeError::AlreadyInitialized));
        assert_eq!(renderer.inits, 1);
        assert_eq!(bridge.timer().starts, 1);
        assert!(!renderer.log_forwarding);
    }

    #[test]
    fn test_timer_failure_releases_buffer() {
        let timer = MockTimer {
            fail: Some(TimerError::UnsupportedFrequency),
            ..MockTimer::default()
        };
        let mut bridge = Bridge::without_touch(small_config(), MockPanel::new(240, 320), timer);
        let mut renderer = MockRenderer::default();

        assert_eq!(
            bridge.init(&mut renderer, false),
            Err(BridgeError::Timer(TimerError::UnsupportedFrequency))
        );
        assert!(!bridge.is_initialized());
        assert!(bridge.work_buffer().is_empty());
        assert_eq!(renderer.display, None);
    }

    #[test]
    fn test_touch_registers_pointer() {
        let mut bridge = Bridge::new(
            small_config(),
            MockPanel::new(240, 320),
            TouchBackend::analog(Pen),
            MockTimer::default(),
        );
        let mut renderer = MockRenderer::default();

        assert_eq!(bridge.read_input(), None);
        bridge.init(&mut renderer, false).unwrap();
        assert!(renderer.pointer);

        let sample = bridge.read_input().unwrap();
        assert_eq!((sample.x, sample.y), (239, 319));
    }

    #[test]
    fn test_flush_work_buffer() {
        let mut bridge = Bridge::without_touch(small_config(), MockPanel::new(240, 320), MockTimer::default());
        let mut renderer = MockRenderer::default();
        bridge.init(&mut renderer, false).unwrap();

        bridge.work_buffer_mut().fill(0x07E0);
        bridge.flush_work_buffer(&mut renderer, Area::new(10, 20, 29, 39));

        assert!(bridge.panel().ops.contains(&PanelOp::Pixels {
            len: 400,
            blocking: true,
            byte_swap: true
        }));
        assert_eq!(renderer.flush_ready, 1);
        assert!(!bridge.first_frame());
    }

    #[test]
    fn test_deinit() {
        let mut bridge = Bridge::without_touch(small_config(), MockPanel::new(240, 320), MockTimer::default());
        let mut renderer = MockRenderer::default();
        bridge.init(&mut renderer, false).unwrap();

        bridge.deinit();
        assert!(!bridge.is_initialized());
        assert!(!bridge.timer().is_running());

        // Can come back up, with new settings
        let config = BridgeConfig {
            renderer_color_swap: true,
            ..small_config()
        };
        bridge.set_config(config).unwrap();
        bridge.init(&mut renderer, false).unwrap();
        assert_eq!(bridge.timer().starts, 2);
        assert_eq!(bridge.set_config(config), Err(BridgeError::AlreadyInitialized));
    }

    #[test]
    fn test_log_respects_debug() {
        struct Sink(usize);
        impl embedded_io::ErrorType for Sink {
            type Error = core::convert::Infallible;
        }
        impl embedded_io::Write for Sink {
            fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
                self.0 += buf.len();
                Ok(buf.len())
            }
            fn flush(&mut self) -> Result<(), Self::Error> {
                Ok(())
            }
        }

        let record = LogRecord::new("x.c", 1, "hi");
        let mut console = DebugConsole::new(Sink(0));

        let mut quiet = Bridge::without_touch(small_config(), MockPanel::new(240, 320), MockTimer::default());
        quiet.init(&mut MockRenderer::default(), false).unwrap();
        quiet.log(&mut console, &record).unwrap();
        assert_eq!(console.writer().0, 0);

        let mut loud = Bridge::without_touch(small_config(), MockPanel::new(240, 320), MockTimer::default());
        let mut renderer = MockRenderer::default();
        loud.init(&mut renderer, true).unwrap();
        assert!(renderer.log_forwarding);
        loud.log(&mut console, &record).unwrap();
        assert_eq!(console.writer().0, "x.c@1->hi\r\n".len());
    }

    #[test]
    fn test_log_forwarding_survives_failed_init() {
        struct Lines(usize);
        impl embedded_io::ErrorType for Lines {
            type Error = core::convert::Infallible;
        }
        impl embedded_io::Write for Lines {
            fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
                self.0 += buf.iter().filter(|&&b| b == b'\n').count();
                Ok(buf.len())
            }
            fn flush(&mut self) -> Result<(), Self::Error> {
                Ok(())
            }
        }

        let timer = MockTimer {
            fail: Some(TimerError::ZeroFrequency),
            ..MockTimer::default()
        };
        let mut bridge = Bridge::without_touch(small_config(), MockPanel::new(240, 320), timer);
        let mut renderer = MockRenderer::default();
        let mut console = DebugConsole::new(Lines(0));
        let record = LogRecord::new("disp.c", 9, "flush timeout");

        assert!(bridge.init(&mut renderer, true).is_err());
        assert!(renderer.log_forwarding);
        bridge.log(&mut console, &record).unwrap();
        assert_eq!(console.writer().0, 1);

        // Still forwarding after a clean bring-up and teardown
        bridge.timer.fail = None;
        bridge.init(&mut renderer, false).unwrap();
        bridge.deinit();
        bridge.log(&mut console, &record).unwrap();
        assert_eq!(console.writer().0, 2);
    }
}
