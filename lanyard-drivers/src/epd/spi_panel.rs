//! 4-wire SPI binding for the 7.5" panel controller
//!
//! Commands go out with D/C low, parameters and pixel data with D/C high.
//! The controller pulls BUSY low while it works and releases it when done;
//! the release edge is delivered through a [`Signal`] so waiting does not
//! spin on the pin. Neither an edge nor a level seen before a command
//! counts as the end of that command's work.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Duration};
use embedded_hal_async::delay::DelayNs;
use lanyard_core::traits::{PanelError, PanelInterface};
use lanyard_hal::{OutputPin, SpiBus, SpiConfig};

use super::busy::BusyLine;

/// Control lines of the panel
pub struct PanelPins<DC, RST, PWR, BUSY> {
    /// Data/command select
    pub dc: DC,
    /// Hardware reset, active low
    pub rst: RST,
    /// Panel supply enable, active high
    pub pwr: PWR,
    /// BUSY, low while the controller is working
    pub busy: BUSY,
}

/// SPI e-paper binding
///
/// Chip select is owned by the [`SpiBus`] implementation.
pub struct SpiPanel<'a, M: RawMutex, S, DC, RST, PWR, BUSY, D> {
    spi: S,
    pins: PanelPins<DC, RST, PWR, BUSY>,
    delay: D,
    /// Fired on every rising edge of BUSY
    busy_released: &'a Signal<M, ()>,
    max_transfer: usize,
}

impl<'a, M, S, DC, RST, PWR, BUSY, D> SpiPanel<'a, M, S, DC, RST, PWR, BUSY, D>
where
    M: RawMutex,
    S: SpiBus,
    DC: OutputPin,
    RST: OutputPin,
    PWR: OutputPin,
    BUSY: BusyLine,
    D: DelayNs,
{
    /// Create a new panel binding
    ///
    /// # Arguments
    /// - `spi`: Bus with chip select handled per transaction
    /// - `pins`: D/C, RST, PWR and BUSY lines
    /// - `delay`: Async delay provider
    /// - `busy_released`: Signal raised by the BUSY edge task
    /// - `config`: Bus settings; only `max_transfer` is used here
    pub fn new(
        spi: S,
        pins: PanelPins<DC, RST, PWR, BUSY>,
        delay: D,
        busy_released: &'a Signal<M, ()>,
        config: SpiConfig,
    ) -> Self {
        Self {
            spi,
            pins,
            delay,
            busy_released,
            max_transfer: config.max_transfer,
        }
    }

    /// Switch the panel supply on
    ///
    /// The supply is held off for 500 ms first so the controller starts
    /// from a clean power-on reset.
    pub async fn power_up(&mut self) {
        self.pins.pwr.set_low();
        self.delay.delay_ms(500).await;
        self.pins.pwr.set_high();
    }

    /// Release the bus and pins
    pub fn release(self) -> (S, PanelPins<DC, RST, PWR, BUSY>, D) {
        (self.spi, self.pins, self.delay)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), PanelError> {
        self.spi
            .write_chunked(data, self.max_transfer)
            .map_err(|_| {
                warn!("spi write of {} bytes failed", data.len());
                PanelError::Bus
            })
    }
}

impl<'a, M, S, DC, RST, PWR, BUSY, D> PanelInterface for SpiPanel<'a, M, S, DC, RST, PWR, BUSY, D>
where
    M: RawMutex,
    S: SpiBus,
    DC: OutputPin,
    RST: OutputPin,
    PWR: OutputPin,
    BUSY: BusyLine,
    D: DelayNs,
{
    async fn reset(&mut self) -> Result<(), PanelError> {
        self.pins.rst.set_high();
        self.delay.delay_ms(5).await;
        self.pins.rst.set_low();
        self.delay.delay_ms(10).await;
        self.pins.rst.set_high();
        self.delay.delay_ms(5).await;
        Ok(())
    }

    async fn send_command(&mut self, command: u8) -> Result<(), PanelError> {
        // An edge left over from the previous command must not satisfy the
        // next wait.
        self.busy_released.reset();
        self.pins.busy.command_sent();
        self.pins.dc.set_low();
        self.write(&[command])
    }

    async fn send_data(&mut self, data: &[u8]) -> Result<(), PanelError> {
        self.pins.dc.set_high();
        self.write(data)
    }

    async fn wait_idle(&mut self, timeout: Duration) -> Result<(), PanelError> {
        if self.pins.busy.is_idle() {
            return Ok(());
        }
        match with_timeout(timeout, self.busy_released.wait()).await {
            Ok(()) => Ok(()),
            // The edge may have been missed; trust the level.
            Err(_) if self.pins.busy.is_idle() => Ok(()),
            Err(_) => Err(PanelError::Timeout),
        }
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms).await;
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::epd::SharedLevel;
    use core::cell::{Cell, RefCell};
    use core::sync::atomic::AtomicBool;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use std::rc::Rc;
    use std::vec::Vec as StdVec;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Wire {
        Dc(bool),
        Rst(bool),
        Pwr(bool),
        Spi(StdVec<u8>),
        Delay(u32),
    }

    type Log = Rc<RefCell<StdVec<Wire>>>;

    struct MockSpi {
        log: Log,
        fail: bool,
    }

    impl SpiBus for MockSpi {
        type Error = ();

        fn write(&mut self, data: &[u8]) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.log.borrow_mut().push(Wire::Spi(data.to_vec()));
            Ok(())
        }
    }

    struct MockPin {
        log: Log,
        wrap: fn(bool) -> Wire,
        high: bool,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
            self.log.borrow_mut().push((self.wrap)(true));
        }

        fn set_low(&mut self) {
            self.high = false;
            self.log.borrow_mut().push((self.wrap)(false));
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    struct MockBusy(Rc<Cell<bool>>);

    impl BusyLine for MockBusy {
        fn is_idle(&self) -> bool {
            self.0.get()
        }
    }

    struct MockDelay(Log);

    impl DelayNs for MockDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.0.borrow_mut().push(Wire::Delay(ns / 1_000_000));
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.0.borrow_mut().push(Wire::Delay(ms));
        }
    }

    type TestPanel<'a, B> =
        SpiPanel<'a, NoopRawMutex, MockSpi, MockPin, MockPin, MockPin, B, MockDelay>;

    fn panel<'a>(
        signal: &'a Signal<NoopRawMutex, ()>,
        max_transfer: usize,
    ) -> (TestPanel<'a, MockBusy>, Log, Rc<Cell<bool>>) {
        let busy = Rc::new(Cell::new(true));
        let (panel, log) = panel_with(signal, max_transfer, MockBusy(busy.clone()));
        (panel, log, busy)
    }

    fn panel_with<'a, B: BusyLine>(
        signal: &'a Signal<NoopRawMutex, ()>,
        max_transfer: usize,
        busy: B,
    ) -> (TestPanel<'a, B>, Log) {
        let log: Log = Rc::new(RefCell::new(StdVec::new()));
        let pin = |wrap: fn(bool) -> Wire| MockPin {
            log: log.clone(),
            wrap,
            high: false,
        };
        let pins = PanelPins {
            dc: pin(Wire::Dc),
            rst: pin(Wire::Rst),
            pwr: pin(Wire::Pwr),
            busy,
        };
        let config = SpiConfig {
            max_transfer,
            ..SpiConfig::default()
        };
        let spi = MockSpi {
            log: log.clone(),
            fail: false,
        };
        let panel = SpiPanel::new(spi, pins, MockDelay(log.clone()), signal, config);
        (panel, log)
    }

    #[test]
    fn test_reset_pulse_timing() {
        let signal = Signal::new();
        let (mut panel, log, _) = panel(&signal, 4096);
        block_on(panel.reset()).unwrap();
        assert_eq!(
            *log.borrow(),
            [
                Wire::Rst(true),
                Wire::Delay(5),
                Wire::Rst(false),
                Wire::Delay(10),
                Wire::Rst(true),
                Wire::Delay(5),
            ]
        );
    }

    #[test]
    fn test_command_then_data_sets_dc() {
        let signal = Signal::new();
        let (mut panel, log, _) = panel(&signal, 4096);
        block_on(panel.send(0x01, &[0x07, 0x07, 0x3F, 0x3F])).unwrap();
        assert_eq!(
            *log.borrow(),
            [
                Wire::Dc(false),
                Wire::Spi([0x01].to_vec()),
                Wire::Dc(true),
                Wire::Spi([0x07, 0x07, 0x3F, 0x3F].to_vec()),
            ]
        );
    }

    #[test]
    fn test_data_split_at_max_transfer() {
        let signal = Signal::new();
        let (mut panel, log, _) = panel(&signal, 100);
        block_on(panel.send_data(&[0xAA; 250])).unwrap();
        let sizes: StdVec<usize> = log
            .borrow()
            .iter()
            .filter_map(|w| match w {
                Wire::Spi(bytes) => Some(bytes.len()),
                _ => None,
            })
            .collect();
        assert_eq!(sizes, [100, 100, 50]);
    }

    #[test]
    fn test_bus_error_maps_to_panel_error() {
        let signal = Signal::new();
        let (mut panel, _, _) = panel(&signal, 4096);
        panel.spi.fail = true;
        assert_eq!(block_on(panel.send_command(0x12)), Err(PanelError::Bus));
    }

    #[test]
    fn test_wait_idle_returns_when_not_busy() {
        let signal = Signal::new();
        let (mut panel, _, _) = panel(&signal, 4096);
        assert_eq!(
            block_on(panel.wait_idle(Duration::from_millis(5000))),
            Ok(())
        );
    }

    #[test]
    fn test_wait_idle_wakes_on_release_edge() {
        let signal = Signal::new();
        let (mut panel, _, busy) = panel(&signal, 4096);
        busy.set(false);
        signal.signal(());
        assert_eq!(
            block_on(panel.wait_idle(Duration::from_millis(5000))),
            Ok(())
        );
    }

    #[test]
    fn test_wait_idle_times_out_while_busy() {
        let signal = Signal::new();
        let (mut panel, _, busy) = panel(&signal, 4096);
        busy.set(false);
        assert_eq!(
            block_on(panel.wait_idle(Duration::from_millis(0))),
            Err(PanelError::Timeout)
        );
    }

    #[test]
    fn test_command_discards_stale_edge() {
        let signal = Signal::new();
        let (mut panel, _, busy) = panel(&signal, 4096);
        signal.signal(());
        block_on(panel.send_command(0x12)).unwrap();
        assert!(!signal.signaled());

        busy.set(false);
        assert_eq!(
            block_on(panel.wait_idle(Duration::from_millis(0))),
            Err(PanelError::Timeout)
        );
    }

    #[test]
    fn test_command_discards_stale_idle_level() {
        static LEVEL: AtomicBool = AtomicBool::new(true);
        let level = SharedLevel::new(&LEVEL);
        let signal = Signal::new();
        let (mut panel, _) = panel_with(&signal, 4096, level);

        // idle before the command, the edge task has not run since
        block_on(panel.send_command(0x02)).unwrap();
        assert_eq!(
            block_on(panel.wait_idle(Duration::from_millis(0))),
            Err(PanelError::Timeout)
        );

        // release reported by the edge task
        level.store(true);
        signal.signal(());
        assert_eq!(
            block_on(panel.wait_idle(Duration::from_millis(5000))),
            Ok(())
        );
    }

    #[test]
    fn test_power_up_holds_supply_off_first() {
        let signal = Signal::new();
        let (mut panel, log, _) = panel(&signal, 4096);
        block_on(panel.power_up());
        assert_eq!(
            *log.borrow(),
            [Wire::Pwr(false), Wire::Delay(500), Wire::Pwr(true)]
        );
        let (_, pins, _) = panel.release();
        assert!(pins.pwr.is_set_high());
    }
}
