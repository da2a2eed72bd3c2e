//! SPI bus abstractions
//!
//! The panel controller is write-only over SPI; chip select is handled by
//! the implementation.

/// Write-only SPI master
pub trait SpiBus {
    /// Error type for SPI operations
    type Error;

    /// Write a single transaction
    ///
    /// Implementations may reject transfers longer than their DMA limit;
    /// callers that stream large buffers should use [`SpiBus::write_chunked`].
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Write `data` split into transactions of at most `max_chunk` bytes
    fn write_chunked(&mut self, data: &[u8], max_chunk: usize) -> Result<(), Self::Error> {
        for chunk in data.chunks(max_chunk.max(1)) {
            self.write(chunk)?;
        }
        Ok(())
    }
}

/// SPI clock mode (CPOL/CPHA)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiMode {
    /// CPOL=0, CPHA=0
    Mode0,
    /// CPOL=0, CPHA=1
    Mode1,
    /// CPOL=1, CPHA=0
    Mode2,
    /// CPOL=1, CPHA=1
    Mode3,
}

impl SpiMode {
    /// Clock idles high
    pub const fn idle_high(self) -> bool {
        matches!(self, SpiMode::Mode2 | SpiMode::Mode3)
    }

    /// Data captured on the second clock transition
    pub const fn capture_on_second_edge(self) -> bool {
        matches!(self, SpiMode::Mode1 | SpiMode::Mode3)
    }
}

/// SPI configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock mode
    pub mode: SpiMode,
    /// Largest single transaction in bytes
    pub max_transfer: usize,
}

impl Default for SpiConfig {
    /// Settings the 7.5" panel controller is known to accept
    fn default() -> Self {
        Self {
            frequency: 2_000_000,
            mode: SpiMode::Mode0,
            max_transfer: 4096,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        transactions: [usize; 8],
        count: usize,
    }

    impl SpiBus for Recorder {
        type Error = ();

        fn write(&mut self, data: &[u8]) -> Result<(), ()> {
            if self.count == self.transactions.len() {
                return Err(());
            }
            self.transactions[self.count] = data.len();
            self.count += 1;
            Ok(())
        }
    }

    #[test]
    fn test_write_chunked_splits_transactions() {
        let mut spi = Recorder {
            transactions: [0; 8],
            count: 0,
        };
        spi.write_chunked(&[0u8; 250], 100).unwrap();
        assert_eq!(spi.count, 3);
        assert_eq!(&spi.transactions[..3], &[100, 100, 50]);
    }

    #[test]
    fn test_mode_bits() {
        assert!(!SpiMode::Mode0.idle_high());
        assert!(!SpiMode::Mode0.capture_on_second_edge());
        assert!(SpiMode::Mode3.idle_high());
        assert!(SpiMode::Mode3.capture_on_second_edge());
    }
}
