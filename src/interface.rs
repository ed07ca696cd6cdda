//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for communicating with the ILI9486 controller over SPI.
//!
//! ## Hardware Requirements
//!
//! The ILI9486 requires:
//! - SPI bus (MOSI + SCK), driven as a bare [`SpiBus`](embedded_hal::spi::SpiBus)
//! - 4 GPIO outputs:
//!   - **DC**: Data/Command select (low=command, high=data)
//!   - **CS**: Chip select (active low)
//!   - **RST**: Reset (active low)
//!   - **BL**: Backlight enable (active high)
//!
//! ## Framing
//!
//! Every transaction sets DC first, then pulls CS low, writes, and releases CS.
//! CS is released on the error path too.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::{ErrorType, SpiBus};
//! use ili9486::{DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # struct MockSpi;
//! # impl ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiBus for MockSpi {
//! #     fn read(&mut self, _words: &mut [u8]) -> Result<(), Infallible> { Ok(()) }
//! #     fn write(&mut self, _words: &[u8]) -> Result<(), Infallible> { Ok(()) }
//! #     fn transfer(&mut self, _r: &mut [u8], _w: &[u8]) -> Result<(), Infallible> { Ok(()) }
//! #     fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Infallible> { Ok(()) }
//! #     fn flush(&mut self) -> Result<(), Infallible> { Ok(()) }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! // Create interface with SPI bus and DC, CS, RST, BL pins
//! let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin, MockPin);
//!
//! // Memory write, then two red pixels
//! let _ = interface.send_command(0x2C);
//! let _ = interface.send_pixels([0xF8, 0x00], 2);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::bus::Transport;
use crate::config::MAX_PIXEL_CHUNK;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Trait for hardware interface to the ILI9486 controller
///
/// This trait abstracts over different hardware implementations,
/// allowing the [`Display`](crate::display::Display) to work with any
/// bus + GPIO implementation, and to be tested against a recording mock.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Send a command byte to the controller
    ///
    /// The implementation must:
    /// 1. Set DC pin low (command mode)
    /// 2. Assert CS, send the byte, deassert CS
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error>;

    /// Send parameter bytes to the controller in one transaction
    ///
    /// The implementation must:
    /// 1. Set DC pin high (data mode)
    /// 2. Assert CS, send the bytes, deassert CS
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Stream `count` copies of a 2-byte pixel in data mode
    ///
    /// CS stays asserted for the whole run and is released only after the
    /// last pixel.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_pixels(&mut self, pixel: [u8; 2], count: u32) -> InterfaceResult<(), Self::Error>;

    /// Perform hardware reset
    ///
    /// The implementation must:
    /// 1. Set RST pin low
    /// 2. Wait `pulse_ms`
    /// 3. Set RST pin high
    ///
    /// # Errors
    ///
    /// Returns an error if the reset line cannot be driven.
    fn reset<D: DelayNs>(
        &mut self,
        delay: &mut D,
        pulse_ms: u32,
    ) -> InterfaceResult<(), Self::Error>;

    /// Switch the backlight on or off
    ///
    /// # Errors
    ///
    /// Returns an error if the backlight line cannot be driven.
    fn set_backlight(&mut self, on: bool) -> InterfaceResult<(), Self::Error>;

    /// Drive every output to its idle level (CS, RST, DC and BL high)
    ///
    /// # Errors
    ///
    /// Returns an error if a line cannot be driven.
    fn park(&mut self) -> InterfaceResult<(), Self::Error>;

    /// Leave the lines in their released state (CS and RST high, BL off)
    ///
    /// # Errors
    ///
    /// Returns an error if a line cannot be driven.
    fn release(&mut self) -> InterfaceResult<(), Self::Error>;

    /// Set how many pixels go into one bus write while streaming
    ///
    /// Implementations clamp to `1..=MAX_PIXEL_CHUNK`.
    fn set_pixel_chunk(&mut self, pixels: usize);
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug, PartialEq, Eq)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Hardware interface implementation for the ILI9486
///
/// Implements [`DisplayInterface`] for a [`Transport`] and embedded-hal v1.0
/// output pins.
///
/// ## Type Parameters
///
/// * `SPI` - Bus implementing [`Transport`] (any `SpiBus<u8>`)
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `CS` - Chip-select pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
/// * `BL` - Backlight pin implementing [`OutputPin`]
pub struct Interface<SPI, DC, CS, RST, BL> {
    /// SPI bus for communication
    spi: SPI,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Chip select pin (active low)
    cs: CS,
    /// Reset pin (active low)
    rst: RST,
    /// Backlight pin (active high)
    bl: BL,
    /// Pixels per bus write while streaming
    pixel_chunk: usize,
}

impl<SPI, DC, CS, RST, BL> Interface<SPI, DC, CS, RST, BL>
where
    SPI: Transport,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
{
    /// Create a new Interface
    ///
    /// The pins are expected to already sit at their idle levels; see
    /// [`gpio`](crate::gpio). [`DisplayInterface::park`] re-establishes them.
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI bus (must implement [`Transport`])
    /// * `dc` - Data/Command pin (output, low=command, high=data)
    /// * `cs` - Chip-select pin (output, active low)
    /// * `rst` - Reset pin (output, active low)
    /// * `bl` - Backlight pin (output, active high)
    pub fn new(spi: SPI, dc: DC, cs: CS, rst: RST, bl: BL) -> Self {
        Self {
            spi,
            dc,
            cs,
            rst,
            bl,
            pixel_chunk: 1,
        }
    }

    /// Get the current pixels-per-write setting
    pub fn pixel_chunk(&self) -> usize {
        self.pixel_chunk
    }
}

impl<SPI, DC, CS, RST, BL, PinErr> Interface<SPI, DC, CS, RST, BL>
where
    SPI: Transport,
    DC: OutputPin<Error = PinErr>,
    CS: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BL: OutputPin<Error = PinErr>,
    PinErr: Debug,
{
    /// Run `body` with DC at `data` level and CS asserted
    fn framed<F>(
        &mut self,
        data: bool,
        body: F,
    ) -> InterfaceResult<(), InterfaceError<SPI::Error, PinErr>>
    where
        F: FnOnce(&mut SPI) -> Result<(), SPI::Error>,
    {
        if data {
            self.dc.set_high().map_err(InterfaceError::Pin)?;
        } else {
            self.dc.set_low().map_err(InterfaceError::Pin)?;
        }
        self.cs.set_low().map_err(InterfaceError::Pin)?;
        let written = body(&mut self.spi).map_err(InterfaceError::Spi);
        let deselected = self.cs.set_high().map_err(InterfaceError::Pin);
        written.and(deselected)
    }
}

impl<SPI, DC, CS, RST, BL, PinErr> DisplayInterface for Interface<SPI, DC, CS, RST, BL>
where
    SPI: Transport,
    DC: OutputPin<Error = PinErr>,
    CS: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BL: OutputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.framed(false, |spi| spi.write(&[command]))
    }

    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.framed(true, |spi| spi.write(data))
    }

    fn send_pixels(&mut self, pixel: [u8; 2], count: u32) -> InterfaceResult<(), Self::Error> {
        let mut run = [0u8; MAX_PIXEL_CHUNK * 2];
        for slot in run.chunks_exact_mut(2) {
            slot.copy_from_slice(&pixel);
        }
        let chunk = self.pixel_chunk as u32;

        self.framed(true, |spi| {
            let mut remaining = count;
            while remaining > 0 {
                let n = remaining.min(chunk);
                spi.write(&run[..n as usize * 2])?;
                remaining -= n;
            }
            Ok(())
        })
    }

    fn reset<D: DelayNs>(
        &mut self,
        delay: &mut D,
        pulse_ms: u32,
    ) -> InterfaceResult<(), Self::Error> {
        self.rst.set_low().map_err(InterfaceError::Pin)?;
        delay.delay_ms(pulse_ms);
        self.rst.set_high().map_err(InterfaceError::Pin)
    }

    fn set_backlight(&mut self, on: bool) -> InterfaceResult<(), Self::Error> {
        if on {
            self.bl.set_high().map_err(InterfaceError::Pin)
        } else {
            self.bl.set_low().map_err(InterfaceError::Pin)
        }
    }

    fn park(&mut self) -> InterfaceResult<(), Self::Error> {
        self.cs.set_high().map_err(InterfaceError::Pin)?;
        self.dc.set_high().map_err(InterfaceError::Pin)?;
        self.rst.set_high().map_err(InterfaceError::Pin)?;
        self.bl.set_high().map_err(InterfaceError::Pin)
    }

    fn release(&mut self) -> InterfaceResult<(), Self::Error> {
        let deselected = self.cs.set_high().map_err(InterfaceError::Pin);
        let held = self.rst.set_high().map_err(InterfaceError::Pin);
        let dark = self.bl.set_low().map_err(InterfaceError::Pin);
        deselected.and(held).and(dark)
    }

    fn set_pixel_chunk(&mut self, pixels: usize) {
        self.pixel_chunk = pixels.clamp(1, MAX_PIXEL_CHUNK);
    }
}
