//! nRF52-specific HAL for pixbridge
//!
//! This crate provides the nRF52 pieces of the bridge:
//!
//! - TIMER peripheral tick backend (16 MHz, 16-bit bitmode)
//! - FIFO touch wrapper that papers over unreliable FIFO depth reads
//!
//! Register access goes through [`timer::NrfTimer`], implemented by the
//! board's PAC glue.

#![no_std]
#![deny(unsafe_code)]

pub mod fifo;
pub mod timer;

pub use fifo::{SettlingFifo, FIFO_SETTLE_MS};
pub use pixbridge_hal::PanelEndianness;
pub use timer::{handle_interrupt, Nrf52TickTimer, NrfTimer, IRQ_PRIORITY};

/// Wire byte order for SPI TFTs on nRF52 hosts
pub const PANEL_ENDIANNESS: PanelEndianness = PanelEndianness::FollowRenderer;
