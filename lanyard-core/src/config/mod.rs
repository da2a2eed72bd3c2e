//! Configuration types
//!
//! Board-agnostic configuration: who the badge belongs to and how the
//! display engine is tuned. The firmware fills these in from its
//! compile-time `badge.toml`.

pub mod types;

pub use types::*;
