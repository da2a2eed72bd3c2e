//! Hardware bindings for the badge
//!
//! This crate connects the board-agnostic engine in `lanyard-core` to real
//! pins and buses through the `lanyard-hal` traits:
//!
//! - [`epd::SpiPanel`] - 4-wire SPI e-paper binding (`PanelInterface`)
//! - [`epd::SharedLevel`] - BUSY level mirrored by an interrupt task

#![no_std]
#![deny(unsafe_code)]

pub(crate) mod fmt;

pub mod epd;
