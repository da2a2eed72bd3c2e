//! Top-level display error
//!
//! Each module reports its own error enum; they all convert into
//! [`DisplayError`] so the service API has a single error type.

use crate::caption::CaptionError;
use crate::refresh::RefreshError;
use crate::traits::PanelError;

/// Errors surfaced by the display service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Caption rect out of bounds or grid too small
    ConfigInvalid,
    /// Word queue has no room for the whole append; nothing was written
    BufferFull,
    /// A token is longer than the word queue allows; nothing was written
    TokenTooLong,
    /// Refresh queue at capacity
    QueueFull,
    /// Refresh rect unaligned or outside the canvas
    InvalidRect,
    /// A word expected in the queue was missing or incomplete
    ReceiveFailure,
    /// Panel stayed busy past the idle timeout
    HardwareTimeout,
    /// Coordination lock not acquired in time; the operation was dropped
    LockTimeout,
    /// Display is shut down
    NotInitialized,
    /// SPI or GPIO failure
    Bus,
}

impl From<CaptionError> for DisplayError {
    fn from(e: CaptionError) -> Self {
        match e {
            CaptionError::ConfigInvalid => DisplayError::ConfigInvalid,
            CaptionError::BufferFull => DisplayError::BufferFull,
            CaptionError::TokenTooLong => DisplayError::TokenTooLong,
            CaptionError::ReceiveFailure => DisplayError::ReceiveFailure,
            CaptionError::Refresh(r) => r.into(),
        }
    }
}

impl From<RefreshError> for DisplayError {
    fn from(e: RefreshError) -> Self {
        match e {
            RefreshError::QueueFull => DisplayError::QueueFull,
            RefreshError::InvalidRect => DisplayError::InvalidRect,
        }
    }
}

impl From<PanelError> for DisplayError {
    fn from(e: PanelError) -> Self {
        match e {
            PanelError::Timeout => DisplayError::HardwareTimeout,
            PanelError::Bus => DisplayError::Bus,
        }
    }
}
