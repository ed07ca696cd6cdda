//! Display configuration types and builder

use crate::bus::BusConfig;
use crate::command::{INIT_SEQUENCE, Step};
use crate::gpio::PinAssignment;
use crate::touch::Calibration;

pub use crate::error::BuilderError;

/// Largest panel edge addressable by the ILI9486 frame memory
pub const MAX_DIMENSION: u16 = 480;

/// Largest number of pixels packed into one bus write
///
/// Bounds the stack buffer used while streaming a fill.
pub const MAX_PIXEL_CHUNK: usize = 64;

/// Bits per pixel; the init sequence selects 16-bit RGB565
pub const COLOR_DEPTH: u8 = 16;

/// Panel geometry in pixels
///
/// Both edges are in `1..=MAX_DIMENSION`; the only way to get a `Geometry`
/// is [`Geometry::new`] or the default.
///
/// ```compile_fail
/// let geometry = ili9486::Geometry { width: 0, height: 320 };
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    width: u16,
    height: u16,
}

impl Geometry {
    /// Create a new geometry with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidGeometry` if either edge is zero or larger
    /// than [`MAX_DIMENSION`].
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || width > MAX_DIMENSION || height == 0 || height > MAX_DIMENSION {
            return Err(BuilderError::InvalidGeometry { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width in pixels (column count)
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels (row count)
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Number of pixels on the panel
    pub fn pixel_count(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Color depth in bits per pixel
    pub fn color_depth(&self) -> u8 {
        COLOR_DEPTH
    }
}

impl Default for Geometry {
    /// The 480x320 panel the default init sequence targets
    fn default() -> Self {
        Self {
            width: 480,
            height: 320,
        }
    }
}

/// Delays around reset and power-up, in milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// How long reset is held low
    pub reset_pulse_ms: u32,
    /// Wait after releasing reset before the first command
    pub reset_settle_ms: u32,
    /// Wait after the init table (which ends with sleep out)
    pub sleep_out_ms: u32,
    /// Wait after display on
    pub display_on_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            reset_pulse_ms: 100,
            reset_settle_ms: 100,
            sleep_out_ms: 120,
            display_on_ms: 100,
        }
    }
}

/// Display configuration
///
/// Use [`Builder`] to create a Config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Panel geometry
    pub geometry: Geometry,
    /// Reset and power-up delays
    pub timing: Timing,
    /// Controller init table, issued in order by `initialize`
    pub init_sequence: &'static [Step],
    /// Pixels per bus write while streaming a fill (1..=[`MAX_PIXEL_CHUNK`])
    pub pixel_chunk: usize,
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```
/// use ili9486::{Builder, Geometry};
///
/// let geometry = match Geometry::new(480, 320) {
///     Ok(geometry) => geometry,
///     Err(_) => return,
/// };
/// let config = match Builder::new().geometry(geometry).pixel_chunk(32).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.pixel_chunk, 32);
/// ```
#[must_use]
pub struct Builder {
    geometry: Option<Geometry>,
    timing: Timing,
    init_sequence: &'static [Step],
    pixel_chunk: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            geometry: None,
            timing: Timing::default(),
            init_sequence: INIT_SEQUENCE,
            // One 2-byte write per pixel
            pixel_chunk: 1,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set panel geometry (required)
    pub fn geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Set reset and power-up delays
    pub fn timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Replace the controller init table
    ///
    /// Steps are issued exactly in the given order.
    pub fn init_sequence(mut self, sequence: &'static [Step]) -> Self {
        self.init_sequence = sequence;
        self
    }

    /// Set how many pixels are packed into one bus write during fills
    pub fn pixel_chunk(mut self, pixels: usize) -> Self {
        self.pixel_chunk = pixels;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingGeometry` if no geometry was set and
    /// `BuilderError::InvalidPixelChunk` if the chunk size is zero or larger
    /// than [`MAX_PIXEL_CHUNK`].
    pub fn build(self) -> Result<Config, BuilderError> {
        if self.pixel_chunk == 0 || self.pixel_chunk > MAX_PIXEL_CHUNK {
            return Err(BuilderError::InvalidPixelChunk {
                pixels: self.pixel_chunk,
            });
        }
        Ok(Config {
            geometry: self.geometry.ok_or(BuilderError::MissingGeometry)?,
            timing: self.timing,
            init_sequence: self.init_sequence,
            pixel_chunk: self.pixel_chunk,
        })
    }
}

/// Everything needed to bring up the panel and touch controller
///
/// The default is the reference wiring: display on SPI 0.0 at 32 MHz, touch
/// on SPI 0.1 at 2 MHz, a 480x320 panel and the stock touch calibration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HardwareConfig {
    /// Bus the display controller sits on
    pub display_bus: BusConfig,
    /// Bus the touch controller sits on
    pub touch_bus: BusConfig,
    /// Line numbers of the control signals
    pub pins: PinAssignment,
    /// Panel geometry
    pub geometry: Geometry,
    /// Raw ADC bounds of the touch panel
    pub calibration: Calibration,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            display_bus: BusConfig::display(),
            touch_bus: BusConfig::touch(),
            pins: PinAssignment::default(),
            geometry: Geometry::default(),
            calibration: Calibration::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_rejects_zero_edges() {
        assert!(matches!(
            Geometry::new(0, 320),
            Err(BuilderError::InvalidGeometry { width: 0, .. })
        ));
        assert!(matches!(
            Geometry::new(480, 0),
            Err(BuilderError::InvalidGeometry { height: 0, .. })
        ));
    }

    #[test]
    fn test_geometry_accepts_single_pixel_panel() {
        let geometry = Geometry::new(1, 1).unwrap();
        assert_eq!((geometry.width(), geometry.height()), (1, 1));
        assert_eq!(geometry.pixel_count(), 1);
    }

    #[test]
    fn test_geometry_rejects_oversized_edges() {
        assert!(Geometry::new(MAX_DIMENSION + 1, 320).is_err());
        assert!(Geometry::new(480, MAX_DIMENSION).is_ok());
    }

    #[test]
    fn test_default_geometry_is_reference_panel() {
        let geometry = Geometry::default();
        assert_eq!((geometry.width(), geometry.height()), (480, 320));
        assert_eq!(geometry.pixel_count(), 153_600);
        assert_eq!(geometry.color_depth(), 16);
    }

    #[test]
    fn test_builder_requires_geometry() {
        assert!(matches!(
            Builder::new().build(),
            Err(BuilderError::MissingGeometry)
        ));
    }

    #[test]
    fn test_builder_rejects_bad_pixel_chunk() {
        let geometry = Geometry::default();
        assert!(matches!(
            Builder::new().geometry(geometry).pixel_chunk(0).build(),
            Err(BuilderError::InvalidPixelChunk { pixels: 0 })
        ));
        assert!(
            Builder::new()
                .geometry(geometry)
                .pixel_chunk(MAX_PIXEL_CHUNK + 1)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_builder_defaults() {
        let config = Builder::new().geometry(Geometry::default()).build().unwrap();
        assert_eq!(config.pixel_chunk, 1);
        assert_eq!(config.timing, Timing::default());
        assert_eq!(config.init_sequence, INIT_SEQUENCE);
    }

    #[test]
    fn test_default_hardware_uses_distinct_devices() {
        let hw = HardwareConfig::default();
        assert_eq!((hw.display_bus.bus, hw.display_bus.device), (0, 0));
        assert_eq!((hw.touch_bus.bus, hw.touch_bus.device), (0, 1));
        assert_eq!(hw.display_bus.clock_hz, 32_000_000);
        assert_eq!(hw.touch_bus.clock_hz, 2_000_000);
    }
}
