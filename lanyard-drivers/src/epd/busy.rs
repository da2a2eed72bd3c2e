//! BUSY line shared between an edge task and the panel binding
//!
//! The pin itself belongs to the task that waits for edges. It stores every
//! level it sees here so the panel can read the line without owning it.

use core::sync::atomic::{AtomicBool, Ordering};

/// BUSY input as seen by the panel binding
pub trait BusyLine {
    /// The controller has released BUSY
    fn is_idle(&self) -> bool;

    /// Called before every command goes out
    ///
    /// A level sampled before the command says nothing about the work the
    /// command starts.
    fn command_sent(&self) {}
}

/// Read side of a mirrored input level
#[derive(Clone, Copy)]
pub struct SharedLevel(&'static AtomicBool);

impl SharedLevel {
    pub const fn new(level: &'static AtomicBool) -> Self {
        Self(level)
    }

    /// Record a new level (called from the edge task)
    pub fn store(&self, high: bool) {
        self.0.store(high, Ordering::Release);
    }

    pub fn is_high(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl BusyLine for SharedLevel {
    fn is_idle(&self) -> bool {
        self.is_high()
    }

    /// Treat the line as busy until the edge task reports the next release
    fn command_sent(&self) {
        self.store(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_level_tracks_store() {
        static LEVEL: AtomicBool = AtomicBool::new(false);
        let busy = SharedLevel::new(&LEVEL);
        assert!(!busy.is_idle());

        busy.store(true);
        assert!(busy.is_idle());
        assert!(SharedLevel::new(&LEVEL).is_high());
    }

    #[test]
    fn test_command_forgets_idle_level() {
        static LEVEL: AtomicBool = AtomicBool::new(true);
        let busy = SharedLevel::new(&LEVEL);
        assert!(busy.is_idle());

        busy.command_sent();
        assert!(!busy.is_idle());
        assert!(!SharedLevel::new(&LEVEL).is_high());
    }
}
