//! Named screen layouts

use crate::config::PeerName;

/// Every screen the badge can show
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Layout {
    /// Wearer identity; the resting screen
    #[default]
    Badge,
    /// Looking for nearby badges
    PairSearching,
    /// Ask whether to pair with the badge found, if any
    PairConfirm(Option<PeerName>),
    /// Waiting for the peer to accept
    PairPending(PeerName),
    /// Pairing outcome; `None` means it failed
    PairResult(Option<PeerName>),
    WifiConnecting,
    WifiConnected,
    WifiDisconnected,
    /// Live caption stream
    Caption,
}

impl Layout {
    pub fn is_caption(&self) -> bool {
        matches!(self, Layout::Caption)
    }

    pub fn is_wifi(&self) -> bool {
        matches!(
            self,
            Layout::WifiConnecting | Layout::WifiConnected | Layout::WifiDisconnected
        )
    }
}
