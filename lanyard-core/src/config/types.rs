//! Configuration type definitions

use embassy_time::Duration;
use heapless::String;

use crate::caption::{CaptionConfig, WrapPolicy};
use crate::canvas::FontSize;
use crate::geometry::Rect;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum name length in bytes
pub const MAX_NAME_LEN: usize = 20;
/// Maximum pronouns length in bytes
pub const MAX_PRONOUNS_LEN: usize = 20;
/// Maximum affiliation length in bytes
pub const MAX_AFFILIATION_LEN: usize = 30;
/// Maximum role length in bytes
pub const MAX_ROLE_LEN: usize = 20;

/// Name of a paired badge
pub type PeerName = String<MAX_NAME_LEN>;

/// The wearer's identity as shown on the badge screen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BadgeProfile {
    pub name: String<MAX_NAME_LEN>,
    pub pronouns: String<MAX_PRONOUNS_LEN>,
    pub affiliation: String<MAX_AFFILIATION_LEN>,
    pub role: String<MAX_ROLE_LEN>,
    /// Badge we are paired with, if any
    #[cfg_attr(feature = "serde", serde(default))]
    pub peer: Option<PeerName>,
}

impl BadgeProfile {
    /// Build a profile, cutting over-long fields at a character boundary
    pub fn new(name: &str, pronouns: &str, affiliation: &str, role: &str) -> Self {
        Self {
            name: truncated(name),
            pronouns: truncated(pronouns),
            affiliation: truncated(affiliation),
            role: truncated(role),
            peer: None,
        }
    }

    pub fn with_peer(mut self, peer: &str) -> Self {
        self.peer = Some(truncated(peer));
        self
    }
}

/// Copy as much of `s` as fits into `N` bytes without splitting a char
pub fn truncated<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for ch in s.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

/// Timing and layout settings for the display service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// How long callers wait for the display lock
    pub lock_timeout_ms: u32,
    /// How long a busy wait may take before it is abandoned
    pub idle_timeout_ms: u32,
    /// Worker sleep between cycles
    pub cadence_ms: u32,
    pub caption: CaptionConfig,
}

impl DisplayConfig {
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms as u64)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms as u64)
    }

    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.cadence_ms as u64)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: 5000,
            idle_timeout_ms: 5000,
            cadence_ms: 200,
            // Below the button icon strip, eight rows of large text
            caption: CaptionConfig::new(
                Rect::new(0, 96, 800, 480),
                FontSize::Large,
                WrapPolicy::RollingHalfClear,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_respects_char_boundaries() {
        let s: String<5> = truncated("abcdefg");
        assert_eq!(s.as_str(), "abcde");

        // 'é' is two bytes and would straddle the limit
        let s: String<5> = truncated("abcdé");
        assert_eq!(s.as_str(), "abcd");
    }

    #[test]
    fn test_profile_fields() {
        let profile = BadgeProfile::new("Ada", "she/her", "Analytical Society", "Speaker")
            .with_peer("Charles");
        assert_eq!(profile.name.as_str(), "Ada");
        assert_eq!(profile.peer.as_ref().map(|p| p.as_str()), Some("Charles"));
    }

    #[test]
    fn test_default_caption_area_is_valid() {
        let config = DisplayConfig::default();
        assert_eq!(config.caption.grid(800, 480), Ok((33, 8)));
        assert_eq!(config.lock_timeout(), Duration::from_millis(5000));
    }
}
