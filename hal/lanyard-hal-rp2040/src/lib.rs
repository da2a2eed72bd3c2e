//! RP2040 bindings for the badge
//!
//! This crate implements the shared `lanyard-hal` traits on top of
//! `embassy-rp`, plus the RP2040-specific pieces the firmware needs:
//!
//! - GPIO wrappers for the panel control lines and buttons
//! - Blocking SPI with software chip select for the panel controller
//! - Dynamic pin allocation for config-driven setup

#![no_std]

pub mod gpio;
pub mod pins;
pub mod spi;

// Re-export shared traits from lanyard-hal for convenience
pub use lanyard_hal::{InputPin, Level, OutputPin, SpiBus, SpiConfig};
