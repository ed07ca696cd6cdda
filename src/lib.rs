//! ILI9486 TFT Display + XPT2046 Touch Driver
//!
//! A driver for 480x320 ILI9486 SPI panels with an XPT2046 resistive touch
//! controller on a second device of the same bus.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics-core` color and rectangle conversions (with `graphics` feature)
//! - Configurable geometry, reset timing and init table
//! - Solid fills of the whole panel or a rectangle
//! - Calibrated touch polling
//! - Raspberry Pi backend over spidev and rppal (with `linux` feature)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::{ErrorType, SpiBus};
//! use ili9486::{Builder, Color, Display, Geometry, Interface, Region};
//!
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
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let spi = MockSpi;
//! # let (dc, cs, rst, bl) = (MockPin, MockPin, MockPin, MockPin);
//! # let mut delay = MockDelay;
//! let interface = Interface::new(spi, dc, cs, rst, bl);
//! let geometry = match Geometry::new(480, 320) {
//!     Ok(geometry) => geometry,
//!     Err(_) => return,
//! };
//! let config = match Builder::new().geometry(geometry).pixel_chunk(32).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = Display::new(interface, config);
//! let _ = display.initialize(&mut delay);
//! let _ = display.fill(Color::BLACK);
//! if let Ok(region) = Region::new(10, 10, 19, 19, &geometry) {
//!     let _ = display.draw_rect(&region, Color::RED);
//! }
//! ```

#![no_std]

#[cfg(test)]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

/// Board bring-up from a platform
pub mod board;
/// Bus configuration and transport
pub mod bus;
/// RGB565 colors
pub mod color;
/// ILI9486 command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Digital control lines
pub mod gpio;
/// Hardware interface abstraction
pub mod interface;
/// Pixel rectangles
pub mod region;
/// Touch sampling
pub mod touch;

/// Raspberry Pi backend (requires `linux` feature)
#[cfg(feature = "linux")]
pub mod linux;

pub use board::{Board, BoardInterface, BoardTouch, Platform};
pub use bus::{BusConfig, Transport};
pub use color::Color;
pub use command::{INIT_SEQUENCE, Step};
pub use config::{
    Builder, COLOR_DEPTH, Config, Geometry, HardwareConfig, MAX_DIMENSION, MAX_PIXEL_CHUNK, Timing,
};
pub use display::{Display, State};
pub use error::{BuilderError, Error, OpenError, PinConfigError, RegionError, TouchError};
pub use gpio::{Level, PinAssignment, Pull, Role};
pub use interface::{DisplayInterface, Interface, InterfaceError};
pub use region::Region;
pub use touch::{AxisCalibration, Calibration, NOISE_FLOOR, Touch};
