//! Control task
//!
//! Brings the display up, then turns key presses and connectivity events
//! into UI transitions. Side effects the controller asks for are logged;
//! the audio and radio collaborators that act on them live elsewhere.

use defmt::*;
use embassy_futures::select::{select4, Either4};
use embassy_time::{Duration, Timer};

use lanyard_core::ui::{Effect, Layout};
use lanyard_core::DisplayError;
use lanyard_hal_rp2040::gpio::GpioInput;
use lanyard_hal_rp2040::InputPin;

use crate::channels::UI_EVENTS;
use crate::BadgeDisplay;

/// Contact bounce settles well within this
const DEBOUNCE: Duration = Duration::from_millis(20);

/// Delay before retrying a failed display bring-up
const INIT_RETRY: Duration = Duration::from_secs(1);

#[embassy_executor::task]
pub async fn control_task(display: &'static BadgeDisplay, mut buttons: [GpioInput<'static>; 3]) {
    info!("Control task started");

    bring_up(display).await;

    let [key1, key2, key3] = &mut buttons;
    loop {
        let result = match select4(
            key1.wait_for_falling_edge(),
            key2.wait_for_falling_edge(),
            key3.wait_for_falling_edge(),
            UI_EVENTS.receive(),
        )
        .await
        {
            Either4::First(()) => press(display, key1, 1).await,
            Either4::Second(()) => press(display, key2, 2).await,
            Either4::Third(()) => press(display, key3, 3).await,
            Either4::Fourth(event) => {
                debug!("UI event: {:?}", event);
                display.handle_event(event).await
            }
        };

        match result {
            Ok(Some(effect)) => apply(effect),
            Ok(None) => {}
            Err(DisplayError::LockTimeout) => warn!("Display busy, input ignored"),
            Err(e) => error!("Input handling failed: {:?}", e),
        }
    }
}

/// Initialize the panel and show the badge, retrying until it works
async fn bring_up(display: &BadgeDisplay) {
    loop {
        let result = match display.init().await {
            Ok(()) => display.set_layout(Layout::Badge).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                info!("Display up");
                return;
            }
            Err(e) => {
                error!("Display bring-up failed: {:?}", e);
                Timer::after(INIT_RETRY).await;
            }
        }
    }
}

/// Debounce a key and forward it if it is still held
async fn press(
    display: &BadgeDisplay,
    key: &GpioInput<'static>,
    id: u8,
) -> Result<Option<Effect>, DisplayError> {
    Timer::after(DEBOUNCE).await;
    if key.is_high() {
        trace!("Key {} bounced", id);
        return Ok(None);
    }
    info!("Key {} pressed", id);
    display.handle_button(id).await
}

fn apply(effect: Effect) {
    match effect {
        Effect::StartCapture => info!("Caption capture requested"),
        Effect::StopCapture => info!("Caption capture stopped"),
        Effect::StartPairing => info!("Pairing scan requested"),
        Effect::CancelPairing => info!("Pairing cancelled"),
        Effect::Unpair => info!("Peer forgotten"),
        Effect::RequestPair(peer) => info!("Pairing with {}", peer.as_str()),
    }
}
