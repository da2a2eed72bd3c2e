//! Badge configuration
//!
//! Values come from `badge.toml`, validated and turned into constants by
//! `build.rs`.

use lanyard_core::caption::CaptionConfig;
use lanyard_core::config::{BadgeProfile, DisplayConfig};
use lanyard_hal_rp2040::SpiConfig;

mod generated {
    use lanyard_core::caption::WrapPolicy;
    use lanyard_core::canvas::FontSize;
    use lanyard_core::Rect;

    include!(concat!(env!("OUT_DIR"), "/badge_config.rs"));
}

pub use generated::*;

/// Identity shown on the badge screen
pub fn profile() -> BadgeProfile {
    let profile = BadgeProfile::new(NAME, PRONOUNS, AFFILIATION, ROLE);
    match PEER {
        Some(peer) => profile.with_peer(peer),
        None => profile,
    }
}

/// Display engine tuning
pub fn display_config() -> DisplayConfig {
    DisplayConfig {
        lock_timeout_ms: LOCK_TIMEOUT_MS,
        idle_timeout_ms: IDLE_TIMEOUT_MS,
        cadence_ms: CADENCE_MS,
        caption: CaptionConfig::new(CAPTION_RECT, CAPTION_FONT, CAPTION_WRAP),
    }
}

/// Panel bus settings
pub fn spi_config() -> SpiConfig {
    SpiConfig {
        frequency: SPI_FREQUENCY,
        ..SpiConfig::default()
    }
}
