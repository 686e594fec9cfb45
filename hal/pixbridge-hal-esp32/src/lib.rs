//! ESP32-specific HAL for pixbridge
//!
//! The ESP32 has a 64-bit microsecond system timer with software alarms,
//! so the heartbeat is a periodic alarm rather than a hand-programmed
//! counter. Any tick rate up to 1 MHz can be produced.

#![no_std]
#![deny(unsafe_code)]

pub mod alarm;

pub use alarm::{Esp32TickTimer, PeriodicAlarm};
pub use pixbridge_hal::PanelEndianness;

/// Wire byte order for SPI TFTs on ESP32 hosts
pub const PANEL_ENDIANNESS: PanelEndianness = PanelEndianness::Inverted;
