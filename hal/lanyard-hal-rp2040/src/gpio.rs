//! GPIO wrappers
//!
//! Thin newtypes so embassy-rp pins satisfy the `lanyard-hal` traits.

use embassy_rp::gpio::{AnyPin, Input, Output, Pull};
use embassy_rp::Peri;
use lanyard_hal::{InputPin, Level, OutputPin};

fn rp_level(level: Level) -> embassy_rp::gpio::Level {
    match level {
        Level::High => embassy_rp::gpio::Level::High,
        Level::Low => embassy_rp::gpio::Level::Low,
    }
}

/// Push-pull output
pub struct GpioOutput<'d>(Output<'d>);

impl<'d> GpioOutput<'d> {
    /// Configure `pin` as an output driven to `initial`
    pub fn new(pin: Peri<'d, AnyPin>, initial: Level) -> Self {
        Self(Output::new(pin, rp_level(initial)))
    }
}

impl OutputPin for GpioOutput<'_> {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Digital input
///
/// The inner pin stays reachable for edge waits, which `lanyard-hal` does
/// not model.
pub struct GpioInput<'d>(Input<'d>);

impl<'d> GpioInput<'d> {
    /// Configure `pin` as an input
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin
    /// - `pull_up`: Enable the internal pull-up (buttons to ground)
    pub fn new(pin: Peri<'d, AnyPin>, pull_up: bool) -> Self {
        let pull = if pull_up { Pull::Up } else { Pull::None };
        Self(Input::new(pin, pull))
    }

    /// Wait for the next rising edge
    pub async fn wait_for_rising_edge(&mut self) {
        self.0.wait_for_rising_edge().await;
    }

    /// Wait for the next falling edge
    pub async fn wait_for_falling_edge(&mut self) {
        self.0.wait_for_falling_edge().await;
    }

    /// Wait for any edge
    pub async fn wait_for_any_edge(&mut self) {
        self.0.wait_for_any_edge().await;
    }
}

impl InputPin for GpioInput<'_> {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}
