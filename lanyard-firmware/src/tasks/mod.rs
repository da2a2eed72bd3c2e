//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod busy;
pub mod control;
pub mod display;

pub use busy::busy_task;
pub use control::control_task;
pub use display::display_task;
