//! Panel BUSY edge task
//!
//! Owns the BUSY input, mirrors its level for the panel binding and raises
//! `BUSY_RELEASED` on every rising edge.

use defmt::*;
use lanyard_drivers::epd::SharedLevel;
use lanyard_hal_rp2040::gpio::GpioInput;
use lanyard_hal_rp2040::InputPin;

use crate::channels::BUSY_RELEASED;

#[embassy_executor::task]
pub async fn busy_task(mut pin: GpioInput<'static>, level: SharedLevel) {
    info!("Busy task started");

    level.store(pin.is_high());
    loop {
        pin.wait_for_any_edge().await;
        let high = pin.is_high();
        level.store(high);
        if high {
            trace!("Panel idle");
            BUSY_RELEASED.signal(());
        }
    }
}
