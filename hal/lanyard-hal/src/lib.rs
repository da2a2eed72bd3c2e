//! Lanyard Hardware Abstraction Layer
//!
//! This crate defines the small set of hardware traits the badge needs to
//! talk to its e-paper panel. Chip-specific crates implement them so the
//! panel binding in `lanyard-drivers` stays board-agnostic.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  lanyard-drivers (SpiPanel)             │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lanyard-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lanyard-hal-rp2040                     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - D/C, RST and BUSY lines
//! - [`spi::SpiBus`] - write-only SPI transfers to the panel controller

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, Level, OutputPin};
pub use spi::{SpiBus, SpiConfig, SpiMode};
