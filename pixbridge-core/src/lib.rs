//! Board-agnostic core of the renderer bridge
//!
//! This crate contains everything between the renderer and the hardware
//! traits of `pixbridge-hal`:
//!
//! - Configuration constants and runtime settings
//! - Rotation-aware touch coordinate mapping
//! - Touch sampling state machine (FIFO and resistive modalities)
//! - Display flush bridge
//! - Bridge lifecycle (buffer allocation, registration, tick start)
//! - Lock-free tick counter and debug log console
//!
//! The renderer itself is an external collaborator reached through
//! [`renderer::Renderer`].

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod bridge;
pub mod config;
pub mod console;
pub mod flush;
pub mod renderer;
pub mod rotation;
pub mod tick;
pub mod touch;

pub use bridge::{Bridge, BridgeError};
pub use config::BridgeConfig;
pub use renderer::{DisplayRegistration, LogRecord, Renderer};
pub use touch::{PointerState, TouchBackend, TouchSample};
