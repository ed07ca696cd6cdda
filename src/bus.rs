//! Synchronous serial bus transport
//!
//! [`BusConfig`] describes which bus device to open and how to clock it;
//! opening it is the job of a [`Platform`](crate::board::Platform). Once open,
//! the drivers talk to the bus through [`Transport`], which is implemented for
//! every embedded-hal [`SpiBus`].
//!
//! Chip-select is not handled here. Both the display and the touch controller
//! drive their own select line as a GPIO output, so the transport is a bare
//! bus rather than an `SpiDevice`.

use core::fmt::Debug;
use embedded_hal::spi::{ErrorType, MODE_0, Mode, SpiBus};

/// Parameters for opening one bus device
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusConfig {
    /// Bus (controller) index
    pub bus: u8,
    /// Device index on that bus
    pub device: u8,
    /// Clock rate in Hz
    pub clock_hz: u32,
    /// Clock polarity and phase
    pub mode: Mode,
    /// Bits per word
    pub word_bits: u8,
}

impl BusConfig {
    /// Display controller: bus 0, device 0, 32 MHz, mode 0, 8-bit words
    pub const fn display() -> Self {
        Self {
            bus: 0,
            device: 0,
            clock_hz: 32_000_000,
            mode: MODE_0,
            word_bits: 8,
        }
    }

    /// Touch controller: bus 0, device 1, 2 MHz, mode 0, 8-bit words
    pub const fn touch() -> Self {
        Self {
            bus: 0,
            device: 1,
            clock_hz: 2_000_000,
            mode: MODE_0,
            word_bits: 8,
        }
    }

    /// Whether two configurations address the same bus device
    pub fn same_device(&self, other: &Self) -> bool {
        self.bus == other.bus && self.device == other.device
    }
}

/// Blocking byte transport
///
/// Each call is one complete bus transaction: it returns only once every
/// byte has been clocked out. There is no partial-write outcome and no retry.
pub trait Transport {
    /// Error type for bus operations
    type Error: Debug;

    /// Send `bytes` in order
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transaction fails.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Full-duplex exchange; `bytes` is sent and overwritten with the reply
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transaction fails.
    fn transfer(&mut self, bytes: &mut [u8]) -> Result<(), Self::Error>;
}

impl<T> Transport for T
where
    T: SpiBus<u8>,
{
    type Error = <T as ErrorType>::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), <T as ErrorType>::Error> {
        SpiBus::write(self, bytes)?;
        SpiBus::flush(self)
    }

    fn transfer(&mut self, bytes: &mut [u8]) -> Result<(), <T as ErrorType>::Error> {
        SpiBus::transfer_in_place(self, bytes)?;
        SpiBus::flush(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use core::convert::Infallible;

    #[derive(Default)]
    struct LoopbackSpi {
        written: Vec<u8>,
        flushes: usize,
    }

    impl ErrorType for LoopbackSpi {
        type Error = Infallible;
    }

    impl SpiBus for LoopbackSpi {
        fn read(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
            words.fill(0);
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
            self.written.extend_from_slice(words);
            Ok(())
        }

        fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
            read.copy_from_slice(write);
            Ok(())
        }

        fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
            self.written.extend_from_slice(words);
            for word in words.iter_mut() {
                *word = !*word;
            }
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Infallible> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_write_sends_in_order_and_flushes() {
        let mut spi = LoopbackSpi::default();
        Transport::write(&mut spi, &[0x2A, 0x00, 0x01]).unwrap();
        assert_eq!(spi.written, [0x2A, 0x00, 0x01]);
        assert_eq!(spi.flushes, 1);
    }

    #[test]
    fn test_transfer_replaces_buffer_with_reply() {
        let mut spi = LoopbackSpi::default();
        let mut buf = [0x90, 0x00, 0x00];
        Transport::transfer(&mut spi, &mut buf).unwrap();
        assert_eq!(buf, [0x6F, 0xFF, 0xFF]);
        assert_eq!(spi.written, [0x90, 0x00, 0x00]);
        assert_eq!(spi.flushes, 1);
    }

    #[test]
    fn test_default_devices_differ() {
        assert!(!BusConfig::display().same_device(&BusConfig::touch()));
        assert!(BusConfig::touch().same_device(&BusConfig {
            clock_hz: 1_000_000,
            ..BusConfig::touch()
        }));
    }
}
