//! Streaming caption layout
//!
//! Incoming text is split into words and queued by the producer; the
//! display worker later lays the queued words onto a fixed character grid
//! and asks for a partial refresh of whatever changed.

mod config;
mod engine;
mod word_queue;

pub use config::{CaptionConfig, WrapPolicy};
pub use engine::{CaptionEngine, Cursor};
pub use word_queue::{Word, WordQueue, MAX_TOKEN_LEN, WORD_QUEUE_CAPACITY};

use crate::refresh::RefreshError;

/// Caption errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CaptionError {
    /// Caption rect empty, off-canvas, or grid smaller than 8x2
    ConfigInvalid,
    /// Not enough room for the whole append
    BufferFull,
    /// A single word exceeds [`MAX_TOKEN_LEN`]
    TokenTooLong,
    /// Queue ended mid-word or held a malformed word
    ReceiveFailure,
    /// The refresh for the pass could not be queued
    Refresh(RefreshError),
}

impl From<RefreshError> for CaptionError {
    fn from(e: RefreshError) -> Self {
        CaptionError::Refresh(e)
    }
}
