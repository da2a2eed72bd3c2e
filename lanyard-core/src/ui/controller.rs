//! Badge interaction state machine
//!
//! Every button press and connectivity event is a function of the current
//! layout. The controller never draws; it returns the next layout and the
//! side effect the caller should start.

use super::layout::Layout;
use crate::config::PeerName;

/// Physical buttons, numbered as on the key peripheral
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    One,
    Two,
    Three,
}

impl ButtonId {
    /// Map a raw key ID; unknown IDs yield `None`
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(ButtonId::One),
            2 => Some(ButtonId::Two),
            3 => Some(ButtonId::Three),
            _ => None,
        }
    }

    /// Left edge of the icon drawn above this button
    pub const fn icon_x(self) -> u16 {
        match self {
            ButtonId::One => 270,
            ButtonId::Two => 190,
            ButtonId::Three => 110,
        }
    }
}

/// Inputs to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiEvent {
    Button(ButtonId),
    /// Pairing scan finished, with the badge found if any
    PeerDiscovered(Option<PeerName>),
    /// Pairing handshake finished; `None` means it failed
    PairFinished(Option<PeerName>),
    WifiConnecting,
    WifiConnected,
    WifiDisconnected,
    /// Leave a status screen for the badge
    ShowBadge,
}

/// Work for collaborators outside the display
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    StartCapture,
    StopCapture,
    StartPairing,
    Unpair,
    RequestPair(PeerName),
    CancelPairing,
}

/// Result of a handled event
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub layout: Layout,
    pub effect: Option<Effect>,
}

impl Transition {
    fn to(layout: Layout) -> Self {
        Self {
            layout,
            effect: None,
        }
    }

    fn with(layout: Layout, effect: Effect) -> Self {
        Self {
            layout,
            effect: Some(effect),
        }
    }
}

/// Current layout plus pairing status
#[derive(Debug, Clone, Default)]
pub struct UiController {
    layout: Layout,
    peer: Option<PeerName>,
}

impl UiController {
    pub fn new(peer: Option<PeerName>) -> Self {
        Self {
            layout: Layout::Badge,
            peer,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn peer(&self) -> Option<&PeerName> {
        self.peer.as_ref()
    }

    /// Force a layout, bypassing the transition table
    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    /// Apply `event`; `None` means it has no effect in the current layout
    pub fn handle(&mut self, event: UiEvent) -> Option<Transition> {
        use ButtonId::*;
        use UiEvent::*;

        let transition = match (&self.layout, event) {
            (_, WifiConnecting) => Transition::to(Layout::WifiConnecting),
            (_, WifiConnected) => Transition::to(Layout::WifiConnected),
            (_, WifiDisconnected) => Transition::to(Layout::WifiDisconnected),
            (l, ShowBadge) if l.is_wifi() => Transition::to(Layout::Badge),

            (Layout::Badge, Button(One)) => Transition::with(Layout::Caption, Effect::StartCapture),
            (Layout::Caption, Button(One)) => Transition::with(Layout::Badge, Effect::StopCapture),

            (Layout::Badge, Button(Two)) => {
                if self.peer.take().is_some() {
                    Transition::with(Layout::Badge, Effect::Unpair)
                } else {
                    Transition::with(Layout::PairSearching, Effect::StartPairing)
                }
            }

            (Layout::PairSearching, PeerDiscovered(peer)) => {
                Transition::to(Layout::PairConfirm(peer))
            }

            (Layout::PairConfirm(Some(peer)), Button(One)) => {
                let peer = peer.clone();
                Transition::with(Layout::PairPending(peer.clone()), Effect::RequestPair(peer))
            }
            (Layout::PairConfirm(Some(_)), Button(Two)) => {
                Transition::with(Layout::Badge, Effect::CancelPairing)
            }
            (Layout::PairConfirm(None), Button(_)) | (Layout::PairResult(_), Button(_)) => {
                Transition::to(Layout::Badge)
            }

            (Layout::PairPending(_), PairFinished(peer)) => {
                if peer.is_some() {
                    self.peer = peer.clone();
                }
                Transition::to(Layout::PairResult(peer))
            }

            (layout, event) => {
                trace!("ui: {} ignored in {}", event, layout);
                return None;
            }
        };

        debug!("ui: -> {}", transition.layout);
        self.layout = transition.layout.clone();
        Some(transition)
    }
}
