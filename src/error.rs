//! Error types for the driver
//!
//! This module defines error types for configuration building
//! ([`BuilderError`]), display operations ([`Error`]), region construction
//! ([`RegionError`]), line configuration ([`PinConfigError`]) and board
//! bring-up ([`OpenError`]), plus [`TouchError`] for raw touch sampling.
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors during display operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level bus and line errors
//! - [`TouchError`] - Raw touch sampling failed
//! - [`OpenError`] - Claiming the bus or a line failed
//!
//! Polling for touch never fails: any sampling failure is reported as "no
//! touch".
//!
//! ## Example
//!
//! ```
//! use ili9486::{Builder, BuilderError, Geometry};
//!
//! // Missing geometry
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingGeometry)));
//!
//! // Invalid geometry
//! let result = Geometry::new(0, 320);
//! assert!(result.is_err());
//! ```

use crate::config::{MAX_DIMENSION, MAX_PIXEL_CHUNK};
use crate::interface::DisplayInterface;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type.
pub enum Error<I: DisplayInterface> {
    /// A bus or line operation failed after initialization
    Interface(I::Error),
    /// A step of the reset/init sequence failed
    ///
    /// The driver stays uninitialized; `initialize` may be called again.
    InitFailed(I::Error),
    /// The rectangle does not fit the panel
    InvalidRegion(RegionError),
    /// A drawing call was made before `initialize` succeeded
    NotReady,
    /// The driver was released by `cleanup`
    Released,
}

impl<I: DisplayInterface> From<RegionError> for Error<I> {
    fn from(err: RegionError) -> Self {
        Self::InvalidRegion(err)
    }
}

impl<I: DisplayInterface> core::fmt::Debug for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => f.debug_tuple("Interface").field(e).finish(),
            Self::InitFailed(e) => f.debug_tuple("InitFailed").field(e).finish(),
            Self::InvalidRegion(region) => f.debug_tuple("InvalidRegion").field(region).finish(),
            Self::NotReady => f.write_str("NotReady"),
            Self::Released => f.write_str("Released"),
        }
    }
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::InitFailed(e) => write!(f, "Display init failed: {e:?}"),
            Self::InvalidRegion(region) => write!(f, "{region}"),
            Self::NotReady => write!(f, "Display not initialized"),
            Self::Released => write!(f, "Display released"),
        }
    }
}

impl<I: DisplayInterface> core::error::Error for Error<I> {}

/// A rectangle that violates `x0 <= x1 < width`, `y0 <= y1 < height`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionError {
    /// Requested left column
    pub x0: u16,
    /// Requested top row
    pub y0: u16,
    /// Requested right column (inclusive)
    pub x1: u16,
    /// Requested bottom row (inclusive)
    pub y1: u16,
}

impl core::fmt::Display for RegionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let Self { x0, y0, x1, y1 } = self;
        write!(f, "Invalid region: ({x0}, {y0})..=({x1}, {y1})")
    }
}

impl core::error::Error for RegionError {}

/// Errors from the fallible touch sampling calls
///
/// [`Touch::poll_touch`](crate::touch::Touch::poll_touch) never returns these;
/// they surface only from `read_raw`, `is_touched` and `cleanup`.
#[derive(Debug, PartialEq, Eq)]
pub enum TouchError<SpiErr, PinErr> {
    /// SPI exchange failed
    Spi(SpiErr),
    /// Chip-select or interrupt line failed
    Pin(PinErr),
    /// The sampler was released by `cleanup`
    Released,
}

impl<SpiErr: core::fmt::Debug, PinErr: core::fmt::Debug> core::fmt::Display
    for TouchError<SpiErr, PinErr>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "Touch SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Touch pin error: {e:?}"),
            Self::Released => write!(f, "Touch sampler released"),
        }
    }
}

impl<SpiErr: core::fmt::Debug, PinErr: core::fmt::Debug> core::error::Error
    for TouchError<SpiErr, PinErr>
{
}

/// Errors that can occur when building configuration
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Geometry was not specified
    ///
    /// [`Builder::geometry()`](crate::config::Builder::geometry) must be called before building.
    MissingGeometry,
    /// Invalid geometry provided
    ///
    /// See [`Geometry::new()`](crate::config::Geometry::new) for constraints.
    InvalidGeometry {
        /// Width requested
        width: u16,
        /// Height requested
        height: u16,
    },
    /// Pixel chunk outside `1..=MAX_PIXEL_CHUNK`
    InvalidPixelChunk {
        /// Pixels per write requested
        pixels: usize,
    },
    /// Touch calibration with `raw_high <= raw_low` on some axis
    InvalidCalibration {
        /// Lower raw bound
        raw_low: u16,
        /// Upper raw bound
        raw_high: u16,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingGeometry => write!(f, "Geometry must be specified"),
            Self::InvalidGeometry { width, height } => write!(
                f,
                "Invalid geometry {width}x{height} (each edge must be 1..={MAX_DIMENSION})"
            ),
            Self::InvalidPixelChunk { pixels } => write!(
                f,
                "Invalid pixel chunk {pixels} (must be 1..={MAX_PIXEL_CHUNK})"
            ),
            Self::InvalidCalibration { raw_low, raw_high } => write!(
                f,
                "Invalid calibration: raw_high {raw_high} must exceed raw_low {raw_low}"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}

/// Errors that can occur when configuring a control line
#[derive(Debug, PartialEq, Eq)]
pub enum PinConfigError<E> {
    /// The assignment maps two roles to the same line
    DuplicateLine {
        /// Line used twice
        line: u8,
    },
    /// The platform has no such line
    InvalidLine {
        /// Requested line
        line: u8,
    },
    /// The line is held by another user
    AlreadyClaimed {
        /// Requested line
        line: u8,
    },
    /// Any other platform failure while claiming the line
    Platform {
        /// Requested line
        line: u8,
        /// Underlying platform error
        source: E,
    },
}

impl<E: core::fmt::Debug> core::fmt::Display for PinConfigError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DuplicateLine { line } => write!(f, "Line {line} assigned to two roles"),
            Self::InvalidLine { line } => write!(f, "Line {line} does not exist"),
            Self::AlreadyClaimed { line } => write!(f, "Line {line} already claimed"),
            Self::Platform { line, source } => write!(f, "Line {line} unavailable: {source:?}"),
        }
    }
}

impl<E: core::fmt::Debug> core::error::Error for PinConfigError<E> {}

/// Errors that can occur while claiming hardware for a board
#[derive(Debug, PartialEq, Eq)]
pub enum OpenError<E> {
    /// The bus device could not be opened
    BusUnavailable {
        /// Bus index
        bus: u8,
        /// Device index
        device: u8,
        /// Underlying platform error
        source: E,
    },
    /// Display and touch were configured on the same bus device
    SharedBusDevice {
        /// Bus index
        bus: u8,
        /// Device index
        device: u8,
    },
    /// A control line could not be configured
    Pin(PinConfigError<E>),
    /// The display configuration is invalid
    Config(BuilderError),
}

impl<E> From<PinConfigError<E>> for OpenError<E> {
    fn from(err: PinConfigError<E>) -> Self {
        Self::Pin(err)
    }
}

impl<E> From<BuilderError> for OpenError<E> {
    fn from(err: BuilderError) -> Self {
        Self::Config(err)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for OpenError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BusUnavailable {
                bus,
                device,
                source,
            } => write!(f, "Bus {bus}.{device} unavailable: {source:?}"),
            Self::SharedBusDevice { bus, device } => {
                write!(f, "Bus {bus}.{device} configured for both display and touch")
            }
            Self::Pin(e) => write!(f, "{e}"),
            Self::Config(e) => write!(f, "{e}"),
        }
    }
}

impl<E: core::fmt::Debug> core::error::Error for OpenError<E> {}
