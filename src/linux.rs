//! Raspberry Pi backend (requires `linux` feature)
//!
//! Buses are `/dev/spidevB.D` nodes opened through `linux-embedded-hal`;
//! control lines come from the BCM GPIO controller through `rppal`. Line
//! numbers are BCM numbers.
//!
//! ```rust,no_run
//! use ili9486::linux::{Delay, LinuxPlatform};
//! use ili9486::{Board, Color, HardwareConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut board = Board::open(LinuxPlatform::new()?, &HardwareConfig::default())?;
//! board.display.initialize(&mut Delay)?;
//! board.display.fill(Color::BLACK)?;
//! # Ok(())
//! # }
//! ```

use std::format;
use std::io;
use std::string::String;

use embedded_hal::spi::{Mode, Phase, Polarity};
use linux_embedded_hal::SpidevBus;
use linux_embedded_hal::spidev::{SpiModeFlags, Spidev, SpidevOptions};
use log::debug;
use rppal::gpio::{self, Gpio, InputPin, OutputPin};

use crate::board::Platform;
use crate::bus::BusConfig;
use crate::error::PinConfigError;
use crate::gpio::{Level, Pull};

pub use linux_embedded_hal::Delay;

/// Failure of the Linux SPI or GPIO layer
#[derive(Debug)]
pub enum LinuxError {
    /// spidev open or configure failed
    Spi(io::Error),
    /// GPIO controller failure
    Gpio(gpio::Error),
}

impl core::fmt::Display for LinuxError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "spidev error: {e}"),
            Self::Gpio(e) => write!(f, "GPIO error: {e}"),
        }
    }
}

impl std::error::Error for LinuxError {}

/// [`Platform`] over spidev and the BCM GPIO controller
pub struct LinuxPlatform {
    gpio: Gpio,
}

impl LinuxPlatform {
    /// Open the GPIO controller
    ///
    /// # Errors
    ///
    /// Returns `LinuxError::Gpio` if `/dev/gpiomem` cannot be opened.
    pub fn new() -> Result<Self, LinuxError> {
        let gpio = Gpio::new().map_err(LinuxError::Gpio)?;
        Ok(Self { gpio })
    }

    fn line(&self, line: u8) -> Result<gpio::Pin, PinConfigError<LinuxError>> {
        self.gpio.get(line).map_err(|e| pin_error(line, e))
    }
}

impl Platform for LinuxPlatform {
    type Bus = SpidevBus;
    type Output = OutputPin;
    type Input = InputPin;
    type Error = LinuxError;

    fn open_bus(&mut self, config: &BusConfig) -> Result<SpidevBus, LinuxError> {
        let path = device_path(config);
        let mut spidev = Spidev::open(&path).map_err(LinuxError::Spi)?;
        let options = SpidevOptions::new()
            .bits_per_word(config.word_bits)
            .max_speed_hz(config.clock_hz)
            .mode(mode_flags(config.mode))
            .build();
        spidev.configure(&options).map_err(LinuxError::Spi)?;
        debug!("{} configured at {} Hz", path, config.clock_hz);
        Ok(SpidevBus(spidev))
    }

    fn output(
        &mut self,
        line: u8,
        level: Level,
    ) -> Result<OutputPin, PinConfigError<LinuxError>> {
        let pin = self.line(line)?;
        Ok(match level {
            Level::High => pin.into_output_high(),
            Level::Low => pin.into_output_low(),
        })
    }

    fn input(&mut self, line: u8, pull: Pull) -> Result<InputPin, PinConfigError<LinuxError>> {
        let pin = self.line(line)?;
        Ok(match pull {
            Pull::None => pin.into_input(),
            Pull::Up => pin.into_input_pullup(),
            Pull::Down => pin.into_input_pulldown(),
        })
    }
}

fn device_path(config: &BusConfig) -> String {
    format!("/dev/spidev{}.{}", config.bus, config.device)
}

fn mode_flags(mode: Mode) -> SpiModeFlags {
    match (mode.polarity, mode.phase) {
        (Polarity::IdleLow, Phase::CaptureOnFirstTransition) => SpiModeFlags::SPI_MODE_0,
        (Polarity::IdleLow, Phase::CaptureOnSecondTransition) => SpiModeFlags::SPI_MODE_1,
        (Polarity::IdleHigh, Phase::CaptureOnFirstTransition) => SpiModeFlags::SPI_MODE_2,
        (Polarity::IdleHigh, Phase::CaptureOnSecondTransition) => SpiModeFlags::SPI_MODE_3,
    }
}

fn pin_error(line: u8, err: gpio::Error) -> PinConfigError<LinuxError> {
    match err {
        gpio::Error::PinNotAvailable(_) => PinConfigError::InvalidLine { line },
        gpio::Error::PinUsed(_) => PinConfigError::AlreadyClaimed { line },
        other => PinConfigError::Platform {
            line,
            source: LinuxError::Gpio(other),
        },
    }
}
