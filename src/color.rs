//! RGB565 color type for 16 bpp TFT panels
//!
//! The ILI9486 is configured for 16 bits per pixel (pixel format `0x55`), so
//! every pixel is a packed 5-6-5 red/green/blue value sent most significant
//! byte first.
//!
//! | Bits   | Channel |
//! |--------|---------|
//! | 15..11 | Red     |
//! | 10..5  | Green   |
//! | 4..0   | Blue    |
//!
//! ## Example
//!
//! ```
//! use ili9486::Color;
//!
//! assert_eq!(Color::RED.raw(), 0xF800);
//! assert_eq!(Color::RED.to_be_bytes(), [0xF8, 0x00]);
//! assert_eq!(Color::from_rgb(0xFF, 0xFF, 0xFF), Color::WHITE);
//! ```

/// Packed 16-bit RGB565 color
///
/// All 65536 values are valid colors, so construction never fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(u16);

impl Color {
    /// Black (`0x0000`)
    pub const BLACK: Self = Self(0x0000);
    /// White (`0xFFFF`)
    pub const WHITE: Self = Self(0xFFFF);
    /// Red (`0xF800`)
    pub const RED: Self = Self(0xF800);
    /// Green (`0x07E0`)
    pub const GREEN: Self = Self(0x07E0);
    /// Blue (`0x001F`)
    pub const BLUE: Self = Self(0x001F);
    /// Gray (`0x8410`)
    pub const GRAY: Self = Self(0x8410);
    /// Yellow (`0xFFE0`)
    pub const YELLOW: Self = Self(0xFFE0);

    /// Wrap a raw packed RGB565 value
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Pack 8-bit red, green and blue channels
    ///
    /// The low bits of each channel are dropped (3 for red and blue, 2 for
    /// green).
    ///
    /// ```
    /// use ili9486::Color;
    ///
    /// assert_eq!(Color::from_rgb(0xFF, 0x00, 0x00), Color::RED);
    /// assert_eq!(Color::from_rgb(0x00, 0xFF, 0x00), Color::GREEN);
    /// assert_eq!(Color::from_rgb(0x00, 0x00, 0xFF), Color::BLUE);
    /// ```
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let r = (r as u16 >> 3) << 11;
        let g = (g as u16 >> 2) << 5;
        let b = b as u16 >> 3;
        Self(r | g | b)
    }

    /// Raw packed value
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Wire representation: high byte first
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl From<u16> for Color {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<Color> for u16 {
    fn from(color: Color) -> Self {
        color.0
    }
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::Rgb565> for Color {
    fn from(color: embedded_graphics_core::pixelcolor::Rgb565) -> Self {
        use embedded_graphics_core::prelude::IntoStorage;
        Self(color.into_storage())
    }
}

#[cfg(feature = "graphics")]
impl From<Color> for embedded_graphics_core::pixelcolor::Rgb565 {
    fn from(color: Color) -> Self {
        use embedded_graphics_core::pixelcolor::raw::RawU16;
        RawU16::new(color.0).into()
    }
}
