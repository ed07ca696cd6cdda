//! Inclusive pixel rectangles

use crate::config::Geometry;
use crate::error::RegionError;

/// Inclusive rectangle `(x0, y0)..=(x1, y1)` known to fit a panel
///
/// A `Region` can only be built against a [`Geometry`], so holding one means
/// `0 <= x0 <= x1 < width` and `0 <= y0 <= y1 < height` held for that
/// geometry.
///
/// ```
/// use ili9486::{Geometry, Region};
///
/// let panel = Geometry::default();
/// let region = match Region::new(10, 10, 19, 19, &panel) {
///     Ok(region) => region,
///     Err(_) => return,
/// };
/// assert_eq!(region.area(), 100);
/// assert!(Region::new(0, 0, 480, 10, &panel).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    x0: u16,
    y0: u16,
    x1: u16,
    y1: u16,
}

impl Region {
    /// Create a region from inclusive corner coordinates
    ///
    /// # Errors
    ///
    /// Returns [`RegionError`] if a start exceeds its end or an end lies
    /// outside the panel.
    pub fn new(
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        geometry: &Geometry,
    ) -> Result<Self, RegionError> {
        if x0 > x1 || y0 > y1 || x1 >= geometry.width() || y1 >= geometry.height() {
            return Err(RegionError { x0, y0, x1, y1 });
        }
        Ok(Self { x0, y0, x1, y1 })
    }

    /// Create a region from a top-left corner and a size
    ///
    /// # Errors
    ///
    /// Returns [`RegionError`] if the size is zero or the rectangle does not fit.
    pub fn from_origin(
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        geometry: &Geometry,
    ) -> Result<Self, RegionError> {
        let end = |start: u16, len: u16| -> Option<u16> { start.checked_add(len)?.checked_sub(1) };
        match (end(x, width), end(y, height)) {
            (Some(x1), Some(y1)) if width > 0 && height > 0 => Self::new(x, y, x1, y1, geometry),
            _ => Err(RegionError {
                x0: x,
                y0: y,
                x1: x.saturating_add(width).saturating_sub(1),
                y1: y.saturating_add(height).saturating_sub(1),
            }),
        }
    }

    /// The whole panel
    pub fn full(geometry: &Geometry) -> Self {
        // Geometry edges are never zero
        Self {
            x0: 0,
            y0: 0,
            x1: geometry.width() - 1,
            y1: geometry.height() - 1,
        }
    }

    /// Left column
    pub fn x0(&self) -> u16 {
        self.x0
    }

    /// Top row
    pub fn y0(&self) -> u16 {
        self.y0
    }

    /// Right column (inclusive)
    pub fn x1(&self) -> u16 {
        self.x1
    }

    /// Bottom row (inclusive)
    pub fn y1(&self) -> u16 {
        self.y1
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.x1 - self.x0 + 1
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.y1 - self.y0 + 1
    }

    /// Number of pixels covered
    pub fn area(&self) -> u32 {
        self.width() as u32 * self.height() as u32
    }

    /// Convert an embedded-graphics rectangle
    ///
    /// # Errors
    ///
    /// Returns [`RegionError`] for empty rectangles, negative coordinates, or
    /// rectangles that do not fit the panel.
    #[cfg(feature = "graphics")]
    pub fn from_rectangle(
        rectangle: &embedded_graphics_core::primitives::Rectangle,
        geometry: &Geometry,
    ) -> Result<Self, RegionError> {
        let coord = |v: i32| u16::try_from(v).ok();
        let size = |v: u32| u16::try_from(v).ok();
        let origin = rectangle.top_left;
        match (
            coord(origin.x),
            coord(origin.y),
            size(rectangle.size.width),
            size(rectangle.size.height),
        ) {
            (Some(x), Some(y), Some(w), Some(h)) => Self::from_origin(x, y, w, h, geometry),
            _ => Err(RegionError {
                x0: origin.x.clamp(0, u16::MAX as i32) as u16,
                y0: origin.y.clamp(0, u16::MAX as i32) as u16,
                x1: u16::MAX,
                y1: u16::MAX,
            }),
        }
    }
}

#[cfg(feature = "graphics")]
impl From<Region> for embedded_graphics_core::primitives::Rectangle {
    fn from(region: Region) -> Self {
        use embedded_graphics_core::geometry::{Point, Size};
        Self::new(
            Point::new(region.x0 as i32, region.y0 as i32),
            Size::new(region.width() as u32, region.height() as u32),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> Geometry {
        Geometry::new(480, 320).unwrap()
    }

    #[test]
    fn test_single_pixel_region_is_valid() {
        let region = Region::new(479, 319, 479, 319, &panel()).unwrap();
        assert_eq!((region.width(), region.height(), region.area()), (1, 1, 1));
    }

    #[test]
    fn test_inverted_corners_are_rejected() {
        assert!(Region::new(20, 10, 19, 19, &panel()).is_err());
        assert!(Region::new(10, 20, 19, 19, &panel()).is_err());
    }

    #[test]
    fn test_out_of_bounds_end_is_rejected() {
        let err = Region::new(0, 0, 480, 319, &panel()).unwrap_err();
        assert_eq!(
            err,
            RegionError {
                x0: 0,
                y0: 0,
                x1: 480,
                y1: 319
            }
        );
        assert!(Region::new(0, 0, 479, 320, &panel()).is_err());
    }

    #[test]
    fn test_full_region_covers_panel() {
        let region = Region::full(&panel());
        assert_eq!((region.x1(), region.y1()), (479, 319));
        assert_eq!(region.area(), panel().pixel_count());
    }

    #[test]
    fn test_full_region_of_smallest_panel_is_one_pixel() {
        let region = Region::full(&Geometry::new(1, 1).unwrap());
        assert_eq!((region.x0(), region.y0(), region.x1(), region.y1()), (0, 0, 0, 0));
        assert_eq!(region.area(), 1);
    }

    #[test]
    fn test_from_origin_matches_inclusive_corners() {
        let region = Region::from_origin(10, 10, 10, 10, &panel()).unwrap();
        assert_eq!(region, Region::new(10, 10, 19, 19, &panel()).unwrap());
    }

    #[test]
    fn test_from_origin_rejects_empty_and_overflowing_sizes() {
        assert!(Region::from_origin(10, 10, 0, 5, &panel()).is_err());
        assert!(Region::from_origin(10, 10, 5, 0, &panel()).is_err());
        assert!(Region::from_origin(u16::MAX, 0, 2, 1, &panel()).is_err());
        assert!(Region::from_origin(470, 0, 11, 1, &panel()).is_err());
    }

    #[cfg(feature = "graphics")]
    #[test]
    fn test_rectangle_conversion() {
        use embedded_graphics::prelude::{Point, Size};
        use embedded_graphics::primitives::Rectangle;

        let rect = Rectangle::new(Point::new(10, 10), Size::new(10, 10));
        let region = Region::from_rectangle(&rect, &panel()).unwrap();
        assert_eq!((region.x1(), region.y1()), (19, 19));
        assert_eq!(Rectangle::from(region), rect);

        let negative = Rectangle::new(Point::new(-1, 0), Size::new(10, 10));
        assert!(Region::from_rectangle(&negative, &panel()).is_err());
    }
}
