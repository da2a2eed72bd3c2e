//! Dynamic pin allocation for config-driven hardware setup
//!
//! Control lines and buttons are assigned by number in `badge.toml`, so the
//! firmware takes them from a [`PinBank`] at runtime. The SPI clock and
//! data pins are tied to the SPI1 block and are handed out as typed
//! peripherals instead.

use embassy_rp::gpio::AnyPin;
use embassy_rp::peripherals::{PIN_10, PIN_11, SPI1};
use embassy_rp::{Peri, Peripherals};

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: u8 = 30;

/// SPI1 clock pin on the panel header
pub const PANEL_SCK: u8 = 10;

/// SPI1 MOSI pin on the panel header
pub const PANEL_MOSI: u8 = 11;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
    /// Pin reserved for the panel SPI bus
    Reserved,
}

/// Check a pin number without touching hardware
pub const fn check_pin(pin_num: u8) -> Result<(), PinError> {
    if pin_num >= GPIO_COUNT {
        Err(PinError::InvalidPin)
    } else if pin_num == PANEL_SCK || pin_num == PANEL_MOSI {
        Err(PinError::Reserved)
    } else {
        Ok(())
    }
}

/// Peripherals with a fixed role on the badge
pub struct BoardPeripherals {
    pub spi: Peri<'static, SPI1>,
    pub sck: Peri<'static, PIN_10>,
    pub mosi: Peri<'static, PIN_11>,
}

/// Pin bank that holds the free GPIO pins and allows taking them by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT as usize],
}

impl PinBank {
    /// Split the chip peripherals into the pin bank and the fixed-role set
    pub fn split(p: Peripherals) -> (Self, BoardPeripherals) {
        let bank = Self {
            pins: [
                Some(p.PIN_0.into()),
                Some(p.PIN_1.into()),
                Some(p.PIN_2.into()),
                Some(p.PIN_3.into()),
                Some(p.PIN_4.into()),
                Some(p.PIN_5.into()),
                Some(p.PIN_6.into()),
                Some(p.PIN_7.into()),
                Some(p.PIN_8.into()),
                Some(p.PIN_9.into()),
                None,
                None,
                Some(p.PIN_12.into()),
                Some(p.PIN_13.into()),
                Some(p.PIN_14.into()),
                Some(p.PIN_15.into()),
                Some(p.PIN_16.into()),
                Some(p.PIN_17.into()),
                Some(p.PIN_18.into()),
                Some(p.PIN_19.into()),
                Some(p.PIN_20.into()),
                Some(p.PIN_21.into()),
                Some(p.PIN_22.into()),
                Some(p.PIN_23.into()),
                Some(p.PIN_24.into()),
                Some(p.PIN_25.into()),
                Some(p.PIN_26.into()),
                Some(p.PIN_27.into()),
                Some(p.PIN_28.into()),
                Some(p.PIN_29.into()),
            ],
        };
        let board = BoardPeripherals {
            spi: p.SPI1,
            sck: p.PIN_10,
            mosi: p.PIN_11,
        };
        (bank, board)
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        check_pin(pin_num)?;
        self.pins[pin_num as usize]
            .take()
            .ok_or(PinError::AlreadyTaken)
    }

    /// Check if a pin is available
    pub fn is_available(&self, pin_num: u8) -> bool {
        check_pin(pin_num).is_ok() && self.pins[pin_num as usize].is_some()
    }
}
