//! Byte-stream word channel
//!
//! Words are stored back to back as NUL-terminated records in a fixed ring.
//! An append is all-or-nothing: either every word of the call is queued or
//! none is.

use heapless::{Deque, String, Vec};

use super::CaptionError;

/// Ring size in bytes
pub const WORD_QUEUE_CAPACITY: usize = 256;
/// Longest word accepted, excluding the terminator
pub const MAX_TOKEN_LEN: usize = 31;

/// A word taken off the queue
pub type Word = String<{ MAX_TOKEN_LEN + 1 }>;

/// Queued caption words
pub struct WordQueue {
    bytes: Deque<u8, WORD_QUEUE_CAPACITY>,
}

impl WordQueue {
    pub const fn new() -> Self {
        Self {
            bytes: Deque::new(),
        }
    }

    /// Split `text` on spaces and queue every non-empty word
    ///
    /// A word ends at its first NUL; whatever follows in the same token is
    /// dropped.
    pub fn append(&mut self, text: &str) -> Result<(), CaptionError> {
        let mut needed = 0;
        for word in words(text) {
            if word.len() > MAX_TOKEN_LEN {
                warn!("caption: word of {} bytes rejected", word.len());
                return Err(CaptionError::TokenTooLong);
            }
            needed += word.len() + 1;
        }
        if needed > self.free() {
            warn!("caption: {} bytes needed, {} free", needed, self.free());
            return Err(CaptionError::BufferFull);
        }

        for word in words(text) {
            for &b in word.as_bytes() {
                // Capacity checked above
                let _ = self.bytes.push_back(b);
            }
            let _ = self.bytes.push_back(0);
        }
        Ok(())
    }

    /// Take the next word
    ///
    /// Returns `None` when the queue is empty and `ReceiveFailure` when the
    /// remaining bytes do not form a complete word.
    pub fn pop_word(&mut self) -> Option<Result<Word, CaptionError>> {
        if self.bytes.is_empty() {
            return None;
        }
        let mut raw: Vec<u8, { MAX_TOKEN_LEN + 1 }> = Vec::new();
        loop {
            match self.bytes.pop_front() {
                Some(0) => break,
                Some(b) => {
                    if raw.push(b).is_err() {
                        return Some(Err(CaptionError::ReceiveFailure));
                    }
                }
                None => return Some(Err(CaptionError::ReceiveFailure)),
            }
        }
        Some(String::from_utf8(raw).map_err(|_| CaptionError::ReceiveFailure))
    }

    pub fn reset(&mut self) {
        self.bytes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bytes in use, terminators included
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn free(&self) -> usize {
        WORD_QUEUE_CAPACITY - self.bytes.len()
    }

    #[cfg(test)]
    pub(crate) fn push_raw(&mut self, bytes: &[u8]) {
        for &b in bytes {
            let _ = self.bytes.push_back(b);
        }
    }
}

impl Default for WordQueue {
    fn default() -> Self {
        Self::new()
    }
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(' ')
        .map(|w| w.split('\0').next().unwrap_or_default())
        .filter(|w| !w.is_empty())
}
