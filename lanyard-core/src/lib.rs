//! Board-agnostic display engine for the caption badge
//!
//! This crate contains everything between "an event happened" and "these
//! bytes go to the panel", without depending on a specific chip:
//!
//! - 1-bit canvas, fixed-width fonts and bitmaps
//! - Panel interface trait and the 7.5" V2 command sequencer
//! - Refresh request queue and the mode interpreter that drains it
//! - Streaming caption layout (word queue, grid cursor, dirty rectangle)
//! - Named UI layouts and the button/event state machine
//! - The display service that serializes all of the above behind one
//!   timed lock shared by the control task and the display worker

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

// Must come first so the logging macros are visible to every module.
pub(crate) mod fmt;

pub mod canvas;
pub mod caption;
pub mod config;
pub mod display;
pub mod error;
pub mod geometry;
pub mod panel;
pub mod refresh;
pub mod traits;
pub mod ui;

pub use display::Display;
pub use error::DisplayError;
pub use geometry::Rect;
