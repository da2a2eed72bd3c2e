//! E-paper panel command sequencing
//!
//! [`Epd7in5V2`] turns high-level steps (init, transfer, refresh, sleep)
//! into the vendor command stream, on top of any [`PanelInterface`].
//!
//! [`PanelInterface`]: crate::traits::PanelInterface

pub mod commands;
mod epd7in5v2;

#[cfg(test)]
pub(crate) mod mock;

pub use epd7in5v2::{Epd7in5V2, PANEL_HEIGHT, PANEL_WIDTH};
