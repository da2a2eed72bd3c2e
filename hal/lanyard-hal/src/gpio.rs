//! GPIO pin abstractions
//!
//! The panel uses two outputs (data/command select and reset) and one
//! input (BUSY). Chip HALs implement these for their pin types.

/// Logic level of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Digital output pin
pub trait OutputPin {
    /// Drive the pin high
    fn set_high(&mut self);

    /// Drive the pin low
    fn set_low(&mut self);

    /// Drive the pin to `level`
    fn set_level(&mut self, level: Level) {
        match level {
            Level::High => self.set_high(),
            Level::Low => self.set_low(),
        }
    }

    /// Check if the pin is currently driven high
    fn is_set_high(&self) -> bool;
}

/// An absent output; writes are dropped
impl<P: OutputPin> OutputPin for Option<P> {
    fn set_high(&mut self) {
        if let Some(pin) = self {
            pin.set_high();
        }
    }

    fn set_low(&mut self) {
        if let Some(pin) = self {
            pin.set_low();
        }
    }

    fn is_set_high(&self) -> bool {
        self.as_ref().is_some_and(|pin| pin.is_set_high())
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high
    fn is_high(&self) -> bool;

    /// Check if the pin reads low
    fn is_low(&self) -> bool {
        !self.is_high()
    }

    /// Current level of the pin
    fn level(&self) -> Level {
        Level::from(self.is_high())
    }
}
