//! Sequencer for the Waveshare 7.5" V2 (800x480) panel

use embassy_time::Duration;

use super::commands::*;
use crate::canvas::Canvas;
use crate::geometry::Rect;
use crate::traits::{PanelError, PanelInterface};

pub const PANEL_WIDTH: u16 = 800;
pub const PANEL_HEIGHT: u16 = 480;

/// Bytes sent per data write when streaming a plane
const CHUNK: usize = 100;

/// Command sequencer over a panel interface
///
/// Busy-wait timeouts are logged and counted, then sequencing continues;
/// only bus errors abort a step.
pub struct Epd7in5V2<P> {
    iface: P,
    idle_timeout: Duration,
    timeouts: u16,
}

impl<P: PanelInterface> Epd7in5V2<P> {
    pub fn new(iface: P, idle_timeout: Duration) -> Self {
        Self {
            iface,
            idle_timeout,
            timeouts: 0,
        }
    }

    pub fn interface(&self) -> &P {
        &self.iface
    }

    /// Number of busy timeouts since the last call
    pub fn take_timeouts(&mut self) -> u16 {
        core::mem::take(&mut self.timeouts)
    }

    async fn wait_idle(&mut self) -> Result<(), PanelError> {
        match self.iface.wait_idle(self.idle_timeout).await {
            Err(PanelError::Timeout) => {
                warn!("panel busy timeout, continuing");
                self.timeouts = self.timeouts.saturating_add(1);
                Ok(())
            }
            other => other,
        }
    }

    /// Power on, wait `settle_ms`, then wait for idle
    pub async fn power_on(&mut self, settle_ms: u32) -> Result<(), PanelError> {
        self.iface.send_command(POWER_ON).await?;
        self.iface.delay_ms(settle_ms).await;
        self.wait_idle().await
    }

    pub async fn power_off(&mut self) -> Result<(), PanelError> {
        self.iface.send_command(POWER_OFF).await?;
        self.wait_idle().await
    }

    /// Full-quality init with the OTP waveform
    pub async fn init_full(&mut self) -> Result<(), PanelError> {
        debug!("epd: init full");
        self.iface.reset().await?;
        self.iface.send(POWER_SETTING, &[0x07, 0x07, 0x3F, 0x3F]).await?;
        self.iface.send(BOOSTER_SOFT_START, &[0x17, 0x17, 0x28, 0x17]).await?;
        self.power_on(10).await?;
        self.iface.send(PANEL_SETTING, &[0x1F]).await?;
        self.iface.send(RESOLUTION, &[0x03, 0x20, 0x01, 0xE0]).await?;
        self.iface.send(DUAL_SPI, &[0x00]).await?;
        self.iface.send(VCOM_DATA_INTERVAL, &[0x10, 0x07]).await?;
        self.iface.send(TCON_SETTING, &[0x22]).await
    }

    /// Reduced-timing init for transient screens
    pub async fn init_fast(&mut self) -> Result<(), PanelError> {
        debug!("epd: init fast");
        self.iface.reset().await?;
        self.iface.send(PANEL_SETTING, &[0x1F]).await?;
        self.iface.send(VCOM_DATA_INTERVAL, &[0x10, 0x07]).await?;
        self.power_on(10).await?;
        self.iface.send(BOOSTER_SOFT_START, &[0x27, 0x27, 0x18, 0x17]).await?;
        self.iface.send(CASCADE_SETTING, &[0x02]).await?;
        self.iface.send(FORCE_TEMPERATURE, &[0x5A]).await
    }

    /// Init for windowed partial refresh
    pub async fn init_partial(&mut self) -> Result<(), PanelError> {
        debug!("epd: init partial");
        self.iface.reset().await?;
        self.iface.send(PANEL_SETTING, &[0x1F]).await?;
        self.power_on(100).await?;
        self.iface.send(CASCADE_SETTING, &[0x02]).await?;
        self.iface.send(FORCE_TEMPERATURE, &[0x6E]).await
    }

    /// Switch the data interval for partial updates and enter partial mode
    pub async fn enter_partial_mode(&mut self) -> Result<(), PanelError> {
        self.iface.send(VCOM_DATA_INTERVAL, &[0xA9, 0x07]).await?;
        self.iface.send_command(PARTIAL_IN).await
    }

    /// Trigger the refresh and wait for it to finish
    pub async fn turn_on_display(&mut self) -> Result<(), PanelError> {
        self.iface.send_command(DISPLAY_REFRESH).await?;
        self.iface.delay_ms(10).await;
        self.wait_idle().await
    }

    /// Send the whole canvas and refresh
    ///
    /// The old plane gets the canvas as stored and the new plane gets it
    /// inverted; the canvas itself is left untouched.
    pub async fn display_full(&mut self, canvas: &Canvas) -> Result<(), PanelError> {
        self.iface.send_command(DATA_START_OLD).await?;
        for chunk in canvas.as_bytes().chunks(CHUNK) {
            self.iface.send_data(chunk).await?;
        }

        self.iface.send_command(DATA_START_NEW).await?;
        let mut inverted = [0u8; CHUNK];
        for chunk in canvas.as_bytes().chunks(CHUNK) {
            for (dst, src) in inverted.iter_mut().zip(chunk) {
                *dst = !*src;
            }
            self.iface.send_data(&inverted[..chunk.len()]).await?;
        }

        self.turn_on_display().await
    }

    /// Send one byte-aligned window of the canvas and refresh it
    ///
    /// Must follow [`init_partial`](Self::init_partial). The window command
    /// carries end-inclusive coordinates as big-endian 16-bit values.
    pub async fn display_window(&mut self, canvas: &Canvas, rect: Rect) -> Result<(), PanelError> {
        self.enter_partial_mode().await?;
        self.iface.send(PARTIAL_WINDOW, &window_bytes(rect)).await?;

        self.iface.send_command(DATA_START_NEW).await?;
        let (byte_start, byte_end) = (rect.x_start as usize / 8, rect.x_end as usize / 8);
        for y in rect.y_start..rect.y_end {
            self.iface
                .send_data(canvas.row_bytes(y, byte_start, byte_end))
                .await?;
        }

        self.turn_on_display().await
    }

    /// Hardware clear to white without touching the canvas
    pub async fn clear_screen(&mut self, width: u16, height: u16) -> Result<(), PanelError> {
        let total = (width as usize).div_ceil(8) * height as usize;
        self.send_fill(DATA_START_OLD, 0xFF, total).await?;
        self.send_fill(DATA_START_NEW, 0x00, total).await?;
        self.turn_on_display().await
    }

    async fn send_fill(&mut self, command: u8, value: u8, total: usize) -> Result<(), PanelError> {
        let block = [value; CHUNK];
        self.iface.send_command(command).await?;
        let mut remaining = total;
        while remaining > 0 {
            let n = remaining.min(CHUNK);
            self.iface.send_data(&block[..n]).await?;
            remaining -= n;
        }
        Ok(())
    }

    /// Power off and enter deep sleep
    ///
    /// The controller ignores everything but a reset afterwards, so every
    /// init sequence starts with one.
    pub async fn deep_sleep(&mut self) -> Result<(), PanelError> {
        info!("epd: deep sleep");
        self.power_off().await?;
        self.iface.send(DEEP_SLEEP, &[DEEP_SLEEP_CHECK]).await
    }
}

/// Payload of the partial window command
fn window_bytes(rect: Rect) -> [u8; 9] {
    let [xs_hi, xs_lo] = rect.x_start.to_be_bytes();
    let [xe_hi, xe_lo] = rect.x_end.saturating_sub(1).to_be_bytes();
    let [ys_hi, ys_lo] = rect.y_start.to_be_bytes();
    let [ye_hi, ye_lo] = rect.y_end.saturating_sub(1).to_be_bytes();
    [xs_hi, xs_lo, xe_hi, xe_lo, ys_hi, ys_lo, ye_hi, ye_lo, 0x01]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Color;
    use crate::panel::mock::{MockPanel, PanelOp};
    use embassy_futures::block_on;

    fn sequencer() -> (Epd7in5V2<MockPanel>, crate::panel::mock::OpLog) {
        let (panel, log) = MockPanel::new();
        (Epd7in5V2::new(panel, Duration::from_millis(5000)), log)
    }

    #[test]
    fn test_window_bytes_big_endian_inclusive() {
        let bytes = window_bytes(Rect::new(0, 0, 264, 48));
        assert_eq!(bytes, [0x00, 0x00, 0x01, 0x07, 0x00, 0x00, 0x00, 0x2F, 0x01]);

        let bytes = window_bytes(Rect::new(520, 300, 800, 480));
        assert_eq!(bytes, [0x02, 0x08, 0x03, 0x1F, 0x01, 0x2C, 0x01, 0xDF, 0x01]);
    }

    #[test]
    fn test_init_full_sequence() {
        let (mut epd, log) = sequencer();
        block_on(epd.init_full()).unwrap();

        let commands = log.commands();
        assert_eq!(
            commands,
            [0x01, 0x06, 0x04, 0x00, 0x61, 0x15, 0x50, 0x60]
        );
        assert_eq!(log.data_after(RESOLUTION), [0x03, 0x20, 0x01, 0xE0]);
        assert_eq!(log.ops()[0], PanelOp::Reset);
        assert_eq!(log.count(|op| matches!(op, PanelOp::WaitIdle)), 1);
    }

    #[test]
    fn test_init_fast_and_partial_luts() {
        let (mut epd, log) = sequencer();
        block_on(epd.init_fast()).unwrap();
        assert_eq!(log.data_after(FORCE_TEMPERATURE), [0x5A]);

        let (mut epd, log) = sequencer();
        block_on(epd.init_partial()).unwrap();
        assert_eq!(log.data_after(FORCE_TEMPERATURE), [0x6E]);
        assert!(log.ops().contains(&PanelOp::Delay(100)));
    }

    #[test]
    fn test_full_transfer_does_not_mutate_canvas() {
        let (mut epd, log) = sequencer();
        let mut canvas = Canvas::new(PANEL_WIDTH, PANEL_HEIGHT);
        canvas.clear_window(Rect::new(0, 0, 8, 1), Color::Black);
        let before = canvas.as_bytes().to_vec();

        block_on(epd.display_full(&canvas)).unwrap();
        assert_eq!(canvas.as_bytes(), &before[..]);

        let old = log.data_after(DATA_START_OLD);
        let new = log.data_after(DATA_START_NEW);
        assert_eq!(old.len(), 100 * 480);
        assert_eq!(old, before);
        assert_eq!(new[0], 0xFF);
        assert!(new[1..].iter().all(|&b| b == 0x00));
        assert_eq!(log.commands().last(), Some(&DISPLAY_REFRESH));
    }

    #[test]
    fn test_window_transfer_sends_only_rect() {
        let (mut epd, log) = sequencer();
        let mut canvas = Canvas::new(PANEL_WIDTH, PANEL_HEIGHT);
        canvas.clear_window(Rect::new(16, 2, 24, 3), Color::Black);

        block_on(epd.display_window(&canvas, Rect::new(8, 0, 32, 4))).unwrap();

        assert_eq!(
            log.commands(),
            [VCOM_DATA_INTERVAL, PARTIAL_IN, PARTIAL_WINDOW, DATA_START_NEW, DISPLAY_REFRESH]
        );
        assert_eq!(log.data_after(VCOM_DATA_INTERVAL), [0xA9, 0x07]);
        let data = log.data_after(DATA_START_NEW);
        // 4 rows x 3 bytes, raw canvas polarity
        assert_eq!(data.len(), 12);
        assert_eq!(&data[6..9], &[0xFF, 0x00, 0xFF]);
    }

    #[test]
    fn test_clear_screen_planes() {
        let (mut epd, log) = sequencer();
        block_on(epd.clear_screen(PANEL_WIDTH, PANEL_HEIGHT)).unwrap();

        let old = log.data_after(DATA_START_OLD);
        let new = log.data_after(DATA_START_NEW);
        assert_eq!(old.len(), 48_000);
        assert!(old.iter().all(|&b| b == 0xFF));
        assert_eq!(new.len(), 48_000);
        assert!(new.iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_deep_sleep_sequence() {
        let (mut epd, log) = sequencer();
        block_on(epd.deep_sleep()).unwrap();
        assert_eq!(log.commands(), [POWER_OFF, DEEP_SLEEP]);
        assert_eq!(log.data_after(DEEP_SLEEP), [DEEP_SLEEP_CHECK]);
    }

    #[test]
    fn test_busy_timeout_is_counted_and_skipped() {
        let (mut epd, log) = sequencer();
        log.set_stuck_busy(true);

        block_on(epd.init_full()).unwrap();
        block_on(epd.turn_on_display()).unwrap();

        assert_eq!(epd.take_timeouts(), 2);
        assert_eq!(epd.take_timeouts(), 0);
        assert_eq!(log.commands().last(), Some(&DISPLAY_REFRESH));
    }

    #[test]
    fn test_bus_error_aborts_step() {
        let (mut epd, log) = sequencer();
        log.fail_bus_after(1);
        assert_eq!(block_on(epd.init_full()), Err(PanelError::Bus));
    }
}
