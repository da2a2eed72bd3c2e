//! Blocking SPI for the panel controller
//!
//! The RP2040 SPI block has no chip-select handling of its own, so CS is a
//! plain GPIO asserted around each transaction.

use embassy_rp::spi::{self, Blocking, Instance, Phase, Polarity, Spi};
use lanyard_hal::{OutputPin, SpiBus, SpiConfig};

use crate::gpio::GpioOutput;

/// Convert shared bus settings into an embassy-rp SPI config
pub fn rp_config(config: &SpiConfig) -> spi::Config {
    let mut rp = spi::Config::default();
    rp.frequency = config.frequency;
    rp.polarity = if config.mode.idle_high() {
        Polarity::IdleHigh
    } else {
        Polarity::IdleLow
    };
    rp.phase = if config.mode.capture_on_second_edge() {
        Phase::CaptureOnSecondTransition
    } else {
        Phase::CaptureOnFirstTransition
    };
    rp
}

/// Write-only SPI device with a software chip select
pub struct PanelSpi<'d, T: Instance> {
    spi: Spi<'d, T, Blocking>,
    cs: GpioOutput<'d>,
}

impl<'d, T: Instance> PanelSpi<'d, T> {
    /// Wrap a configured bus; `cs` is driven high (deselected)
    pub fn new(spi: Spi<'d, T, Blocking>, mut cs: GpioOutput<'d>) -> Self {
        cs.set_high();
        Self { spi, cs }
    }
}

impl<T: Instance> SpiBus for PanelSpi<'_, T> {
    type Error = spi::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.cs.set_low();
        let result = self.spi.blocking_write(data);
        self.cs.set_high();
        result
    }
}
