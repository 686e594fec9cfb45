//! SAMD-specific HAL for pixbridge
//!
//! Drives the renderer heartbeat from one of the SAMD21/SAMD51 TC
//! (timer/counter) peripherals clocked from the 48 MHz generic clock.
//!
//! The TC register block itself is reached through [`tc::TimerCounter`],
//! implemented by the board's PAC/HAL glue; this crate only decides how
//! to program it.
//!
//! # Features
//!
//! - `defmt` - Enable debug formatting support

#![no_std]
#![deny(unsafe_code)]

pub mod tc;

pub use pixbridge_hal::PanelEndianness;
pub use tc::{SamdTickTimer, TcPrescaler, TimerCounter, DEFAULT_TC};

/// Wire byte order for SPI TFTs on SAMD hosts
pub const PANEL_ENDIANNESS: PanelEndianness = PanelEndianness::Inverted;
