//! Refresh request types

use crate::geometry::Rect;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the panel should be updated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RefreshMode {
    /// Full re-init and whole-frame transfer; best quality, slowest
    Full,
    /// Reduced-timing whole-frame refresh for transient screens
    Fast,
    /// Windowed update of one rectangle
    Partial,
    /// Hardware blank; the canvas is not sent
    Clear,
    /// Same as `Full`, then deep sleep if this ends the batch
    Sleep,
}

/// One unit of work for the display worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshRequest {
    pub mode: RefreshMode,
    /// Only meaningful for `Partial`; `None` means the whole panel
    pub rect: Option<Rect>,
}

impl RefreshRequest {
    pub const fn full() -> Self {
        Self::whole(RefreshMode::Full)
    }

    pub const fn fast() -> Self {
        Self::whole(RefreshMode::Fast)
    }

    pub const fn clear() -> Self {
        Self::whole(RefreshMode::Clear)
    }

    pub const fn sleep() -> Self {
        Self::whole(RefreshMode::Sleep)
    }

    pub const fn partial(rect: Rect) -> Self {
        Self {
            mode: RefreshMode::Partial,
            rect: Some(rect),
        }
    }

    const fn whole(mode: RefreshMode) -> Self {
        Self { mode, rect: None }
    }
}
