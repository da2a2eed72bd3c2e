//! Display worker task
//!
//! Runs the caption pass and drains the refresh queue every cadence while
//! the display is up.

use defmt::*;

use crate::BadgeDisplay;

#[embassy_executor::task]
pub async fn display_task(display: &'static BadgeDisplay) {
    info!("Display task started");
    display.run().await
}
