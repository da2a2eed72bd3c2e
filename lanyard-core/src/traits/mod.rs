//! Hardware abstraction traits
//!
//! These traits define the interface between the display engine and the
//! board-specific panel binding.

pub mod panel;

pub use panel::{PanelError, PanelInterface};
