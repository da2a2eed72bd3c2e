//! Badge user interface
//!
//! A screen is one [`Layout`]. [`screens::paint`] draws a layout onto the
//! canvas and queues its refresh; [`UiController`] decides which layout
//! comes next for a button press or a connectivity event.

mod controller;
pub mod icons;
mod layout;
pub mod screens;

pub use controller::{ButtonId, Effect, Transition, UiController, UiEvent};
pub use layout::Layout;
