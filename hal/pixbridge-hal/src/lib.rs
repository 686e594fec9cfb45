//! pixbridge Hardware Abstraction Layer
//!
//! This crate defines the hardware-facing traits the bridge is written
//! against. Chip-specific crates (SAMD, nRF52, ESP32) implement the timer
//! side; panel and touch drivers implement the display and input side.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  pixbridge-core (bridge, sampler, ...)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pixbridge-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┼───────────┐
//!         ▼           ▼           ▼
//! ┌────────────┐ ┌────────────┐ ┌────────────┐
//! │ hal-samd   │ │ hal-nrf52  │ │ hal-esp32  │
//! └────────────┘ └────────────┘ └────────────┘
//! ```
//!
//! # Traits
//!
//! - [`timer::TickTimer`], [`timer::TickSink`] - Periodic heartbeat
//! - [`panel::PanelDriver`] - Blocking framebuffer writes
//! - [`touch::FifoTouch`], [`touch::AnalogTouch`] - Touch sensors

#![no_std]
#![deny(unsafe_code)]

pub mod panel;
pub mod timer;
pub mod touch;

// Re-export key traits at crate root for convenience
pub use panel::{Area, PanelDriver, PanelEndianness, Rotation};
pub use timer::{Tick, TickSink, TickTimer, TimerError};
pub use touch::{AnalogTouch, FifoTouch, NoTouch, RawPoint};
