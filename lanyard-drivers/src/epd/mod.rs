//! E-paper panel bindings

mod busy;
mod spi_panel;

pub use busy::{BusyLine, SharedLevel};
pub use spi_panel::{PanelPins, SpiPanel};
