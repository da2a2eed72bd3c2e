//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use core::sync::atomic::AtomicBool;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use lanyard_core::ui::UiEvent;

/// Channel capacity for UI events from the connectivity collaborators
const UI_EVENT_CHANNEL_SIZE: usize = 4;

/// Last level seen on the panel BUSY line (high = idle)
pub static BUSY_LEVEL: AtomicBool = AtomicBool::new(true);

/// Raised when the panel releases BUSY
pub static BUSY_RELEASED: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Pairing and network events (peer found, Wi-Fi state, ...)
pub static UI_EVENTS: Channel<CriticalSectionRawMutex, UiEvent, UI_EVENT_CHANNEL_SIZE> =
    Channel::new();
