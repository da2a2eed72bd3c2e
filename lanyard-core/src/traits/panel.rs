//! Panel interface primitives
//!
//! The smallest set of operations the command sequencer needs from the
//! hardware: a reset pulse, command and data writes, a bounded busy wait
//! and a delay. Implementations own the SPI bus and the D/C, RST and BUSY
//! lines; the core never touches them directly.

use embassy_time::Duration;

/// Errors reported by a panel binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    /// BUSY did not release within the allowed time
    Timeout,
    /// SPI or GPIO failure
    Bus,
}

/// Low-level access to an e-paper controller
#[allow(async_fn_in_trait)]
pub trait PanelInterface {
    /// Pulse the hardware reset line
    async fn reset(&mut self) -> Result<(), PanelError>;

    /// Write one command byte (D/C low)
    async fn send_command(&mut self, command: u8) -> Result<(), PanelError>;

    /// Write a block of data bytes (D/C high)
    async fn send_data(&mut self, data: &[u8]) -> Result<(), PanelError>;

    /// Wait until the controller reports idle, at most `timeout`
    async fn wait_idle(&mut self, timeout: Duration) -> Result<(), PanelError>;

    /// Sleep for `ms` milliseconds
    async fn delay_ms(&mut self, ms: u32);

    /// Command followed by its parameter bytes
    async fn send(&mut self, command: u8, data: &[u8]) -> Result<(), PanelError> {
        self.send_command(command).await?;
        if !data.is_empty() {
            self.send_data(data).await?;
        }
        Ok(())
    }
}
