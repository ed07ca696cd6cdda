//! XPT2046 resistive touch sampling
//!
//! The touch controller shares the bus controller with the display but sits
//! on its own device and chip-select. A sample is two 3-byte exchanges, one
//! per axis, bracketed by a single chip-select assertion:
//!
//! ```text
//! send:    0x90 0x00 0x00    (X channel)
//! reply:   ---- b1   b2      raw = ((b1 << 8) | b2) >> 3
//! send:    0xD0 0x00 0x00    (Y channel)
//! ```
//!
//! The pen interrupt is active low. While it is high nothing touches the bus.
//! [`Touch::release`] deselects the controller and hands back the bus and
//! both lines.

use embedded_hal::digital::{InputPin, OutputPin};
use log::{trace, warn};

use crate::bus::Transport;
use crate::config::Geometry;
use crate::error::{BuilderError, TouchError};

/// Control byte selecting the X-position channel
pub const READ_X: u8 = 0x90;

/// Control byte selecting the Y-position channel
pub const READ_Y: u8 = 0xD0;

/// Raw readings at or below this on either axis are treated as no touch
pub const NOISE_FLOOR: u16 = 100;

/// Raw ADC bounds of one axis
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisCalibration {
    raw_low: u16,
    raw_high: u16,
}

impl AxisCalibration {
    /// Create an axis calibration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidCalibration` unless `raw_high > raw_low`.
    pub fn new(raw_low: u16, raw_high: u16) -> Result<Self, BuilderError> {
        if raw_high <= raw_low {
            return Err(BuilderError::InvalidCalibration { raw_low, raw_high });
        }
        Ok(Self { raw_low, raw_high })
    }

    /// Raw reading mapped to pixel 0
    pub fn raw_low(&self) -> u16 {
        self.raw_low
    }

    /// Raw reading mapped to the panel extent
    pub fn raw_high(&self) -> u16 {
        self.raw_high
    }

    /// Map a raw reading to a pixel in `0..extent`
    ///
    /// `(raw - raw_low) * extent / (raw_high - raw_low)`, truncated toward
    /// zero and clamped to `[0, extent - 1]`.
    pub fn map(&self, raw: u16, extent: u16) -> u16 {
        let span = i32::from(self.raw_high) - i32::from(self.raw_low);
        let offset = i32::from(raw) - i32::from(self.raw_low);
        let scaled = offset * i32::from(extent) / span;
        scaled.clamp(0, i32::from(extent.saturating_sub(1))) as u16
    }
}

/// Linear raw-to-screen calibration for both axes
///
/// ```
/// use ili9486::Calibration;
///
/// let calibration = Calibration::default();
/// assert_eq!(calibration.x.map(180, 480), 0);
/// assert_eq!(calibration.x.map(3900, 480), 479);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Calibration {
    /// Horizontal axis, mapped onto the panel width
    pub x: AxisCalibration,
    /// Vertical axis, mapped onto the panel height
    pub y: AxisCalibration,
}

impl Calibration {
    /// Create a calibration from raw bounds per axis
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidCalibration` if either axis has
    /// `raw_high <= raw_low`.
    pub fn new(x_low: u16, x_high: u16, y_low: u16, y_high: u16) -> Result<Self, BuilderError> {
        Ok(Self {
            x: AxisCalibration::new(x_low, x_high)?,
            y: AxisCalibration::new(y_low, y_high)?,
        })
    }
}

impl Default for Calibration {
    /// Stock bounds for the 3.5" 480x320 panel
    fn default() -> Self {
        Self {
            x: AxisCalibration {
                raw_low: 180,
                raw_high: 3900,
            },
            y: AxisCalibration {
                raw_low: 240,
                raw_high: 3900,
            },
        }
    }
}

/// Polled touch sampler
///
/// ## Type Parameters
///
/// * `SPI` - Bus implementing [`Transport`], opened on the touch device
/// * `CS` - Touch chip-select implementing [`OutputPin`]
/// * `IRQ` - Pen interrupt implementing [`InputPin`]
///
/// Dropping the sampler performs [`cleanup`](Self::cleanup).
pub struct Touch<SPI, CS, IRQ>
where
    SPI: Transport,
    CS: OutputPin,
    IRQ: InputPin<Error = CS::Error>,
{
    /// Bus and lines, taken by `release`
    lines: Option<Lines<SPI, CS, IRQ>>,
    calibration: Calibration,
    geometry: Geometry,
    released: bool,
}

impl<SPI, CS, IRQ> Touch<SPI, CS, IRQ>
where
    SPI: Transport,
    CS: OutputPin,
    IRQ: InputPin<Error = CS::Error>,
{
    /// Create a sampler mapping onto `geometry`
    ///
    /// The chip-select is expected to already be high.
    pub fn new(
        spi: SPI,
        cs: CS,
        irq: IRQ,
        calibration: Calibration,
        geometry: Geometry,
    ) -> Self {
        Self {
            lines: Some(Lines { spi, cs, irq }),
            calibration,
            geometry,
            released: false,
        }
    }

    /// Whether the pen interrupt is asserted (low)
    ///
    /// # Errors
    ///
    /// Returns `TouchError::Pin` if the line cannot be read and
    /// `TouchError::Released` after `cleanup`.
    pub fn is_touched(&mut self) -> Result<bool, TouchError<SPI::Error, CS::Error>> {
        self.lines()?.irq.is_low().map_err(TouchError::Pin)
    }

    /// Sample both axes without looking at the interrupt line
    ///
    /// Returns the raw 12-bit readings `(x, y)`. The chip-select is released
    /// even if an exchange fails.
    ///
    /// # Errors
    ///
    /// Returns `TouchError::Spi` or `TouchError::Pin` on bus or line failure
    /// and `TouchError::Released` after `cleanup`.
    pub fn read_raw(&mut self) -> Result<(u16, u16), TouchError<SPI::Error, CS::Error>> {
        let lines = self.lines()?;
        lines.cs.set_low().map_err(TouchError::Pin)?;
        let sampled = lines.sample_axes();
        let deselected = lines.cs.set_high().map_err(TouchError::Pin);
        let raw = sampled?;
        deselected?;
        Ok(raw)
    }

    /// Read one calibrated touch point, if the panel is being touched
    ///
    /// Returns `None` when the interrupt is not asserted (without bus
    /// traffic), when either raw reading is at or below [`NOISE_FLOOR`], or
    /// when sampling fails. Failures are logged, never returned.
    pub fn poll_touch(&mut self) -> Option<(u16, u16)> {
        match self.is_touched() {
            Ok(true) => {}
            Ok(false) => return None,
            Err(TouchError::Released) => return None,
            Err(e) => {
                warn!("touch interrupt read failed: {:?}", e);
                return None;
            }
        }

        let (raw_x, raw_y) = match self.read_raw() {
            Ok(raw) => raw,
            Err(e) => {
                warn!("touch sample failed: {:?}", e);
                return None;
            }
        };
        if raw_x <= NOISE_FLOOR || raw_y <= NOISE_FLOOR {
            trace!("touch below noise floor: raw ({}, {})", raw_x, raw_y);
            return None;
        }

        let x = self.calibration.x.map(raw_x, self.geometry.width());
        let y = self.calibration.y.map(raw_y, self.geometry.height());
        trace!("touch raw ({}, {}) -> ({}, {})", raw_x, raw_y, x, y);
        Some((x, y))
    }

    /// Deselect the touch controller; idempotent
    ///
    /// # Errors
    ///
    /// Returns `TouchError::Pin` if the chip-select cannot be driven.
    pub fn cleanup(&mut self) -> Result<(), TouchError<SPI::Error, CS::Error>> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        match self.lines.as_mut() {
            Some(lines) => lines.cs.set_high().map_err(TouchError::Pin),
            None => Ok(()),
        }
    }

    /// Clean up and hand back the bus, chip-select and interrupt line
    ///
    /// A failed [`cleanup`](Self::cleanup) is logged; the parts are returned
    /// either way.
    ///
    /// # Errors
    ///
    /// Returns `TouchError::Released` if the parts were already taken.
    pub fn release(mut self) -> Result<(SPI, CS, IRQ), TouchError<SPI::Error, CS::Error>> {
        if let Err(e) = self.cleanup() {
            warn!("touch cleanup failed: {:?}", e);
        }
        let Lines { spi, cs, irq } = self.lines.take().ok_or(TouchError::Released)?;
        Ok((spi, cs, irq))
    }

    /// Calibration in use
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    fn lines(&mut self) -> Result<&mut Lines<SPI, CS, IRQ>, TouchError<SPI::Error, CS::Error>> {
        if self.released {
            return Err(TouchError::Released);
        }
        self.lines.as_mut().ok_or(TouchError::Released)
    }
}

struct Lines<SPI, CS, IRQ> {
    spi: SPI,
    cs: CS,
    irq: IRQ,
}

impl<SPI, CS, IRQ> Lines<SPI, CS, IRQ>
where
    SPI: Transport,
    CS: OutputPin,
{
    fn sample_axes(&mut self) -> Result<(u16, u16), TouchError<SPI::Error, CS::Error>> {
        let x = self.sample(READ_X)?;
        let y = self.sample(READ_Y)?;
        Ok((x, y))
    }

    fn sample(&mut self, control: u8) -> Result<u16, TouchError<SPI::Error, CS::Error>> {
        let mut frame = [control, 0x00, 0x00];
        self.spi.transfer(&mut frame).map_err(TouchError::Spi)?;
        Ok(u16::from_be_bytes([frame[1], frame[2]]) >> 3)
    }
}

impl<SPI, CS, IRQ> Drop for Touch<SPI, CS, IRQ>
where
    SPI: Transport,
    CS: OutputPin,
    IRQ: InputPin<Error = CS::Error>,
{
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            warn!("touch cleanup failed: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::VecDeque;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};
    use embedded_hal::digital::ErrorType;
    use embedded_hal::spi::{ErrorType as SpiErrorType, SpiBus};

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Event {
        Select(bool),
        Exchange(u8),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct Fault;

    impl embedded_hal::digital::Error for Fault {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    impl embedded_hal::spi::Error for Fault {
        fn kind(&self) -> embedded_hal::spi::ErrorKind {
            embedded_hal::spi::ErrorKind::Other
        }
    }

    /// Replies with scripted raw readings, one per exchange
    struct ScriptedSpi {
        log: Log,
        replies: VecDeque<u16>,
        fail: bool,
    }

    impl SpiErrorType for ScriptedSpi {
        type Error = Fault;
    }

    impl SpiBus for ScriptedSpi {
        fn read(&mut self, _words: &mut [u8]) -> Result<(), Fault> {
            Ok(())
        }

        fn write(&mut self, _words: &[u8]) -> Result<(), Fault> {
            Ok(())
        }

        fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Fault> {
            Ok(())
        }

        fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Fault> {
            self.log.borrow_mut().push(Event::Exchange(words[0]));
            if self.fail {
                return Err(Fault);
            }
            let [hi, lo] = (self.replies.pop_front().unwrap_or(0) << 3).to_be_bytes();
            words.copy_from_slice(&[0x00, hi, lo]);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Fault> {
            Ok(())
        }
    }

    struct SelectPin(Log);

    impl ErrorType for SelectPin {
        type Error = Fault;
    }

    impl OutputPin for SelectPin {
        fn set_low(&mut self) -> Result<(), Fault> {
            self.0.borrow_mut().push(Event::Select(false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Fault> {
            self.0.borrow_mut().push(Event::Select(true));
            Ok(())
        }
    }

    struct IrqPin(Rc<Cell<bool>>);

    impl ErrorType for IrqPin {
        type Error = Fault;
    }

    impl InputPin for IrqPin {
        fn is_high(&mut self) -> Result<bool, Fault> {
            Ok(!self.0.get())
        }

        fn is_low(&mut self) -> Result<bool, Fault> {
            Ok(self.0.get())
        }
    }

    struct Rig {
        log: Log,
        pressed: Rc<Cell<bool>>,
        touch: Touch<ScriptedSpi, SelectPin, IrqPin>,
    }

    fn rig(replies: &[u16]) -> Rig {
        let log = Log::default();
        let pressed = Rc::new(Cell::new(true));
        let spi = ScriptedSpi {
            log: log.clone(),
            replies: replies.iter().copied().collect(),
            fail: false,
        };
        let touch = Touch::new(
            spi,
            SelectPin(log.clone()),
            IrqPin(pressed.clone()),
            Calibration::default(),
            Geometry::new(480, 320).unwrap(),
        );
        Rig {
            log,
            pressed,
            touch,
        }
    }

    #[test]
    fn test_default_calibration_corners() {
        let mut rig = rig(&[180, 240, 3900, 3900]);
        assert_eq!(rig.touch.poll_touch(), Some((0, 0)));
        assert_eq!(rig.touch.poll_touch(), Some((479, 319)));
    }

    #[test]
    fn test_below_noise_floor_is_no_touch() {
        let mut rig = rig(&[50, 50, 100, 2000, 2000, 100]);
        assert_eq!(rig.touch.poll_touch(), None);
        assert_eq!(rig.touch.poll_touch(), None);
        assert_eq!(rig.touch.poll_touch(), None);
    }

    #[test]
    fn test_mid_panel_sample() {
        // (2040 - 180) * 480 / 3720 = 240, (2070 - 240) * 320 / 3660 = 160
        let mut rig = rig(&[2040, 2070]);
        assert_eq!(rig.touch.poll_touch(), Some((240, 160)));
    }

    #[test]
    fn test_released_pen_issues_no_transactions() {
        let mut rig = rig(&[2000, 2000]);
        rig.pressed.set(false);
        assert_eq!(rig.touch.poll_touch(), None);
        assert!(rig.log.borrow().is_empty());
    }

    #[test]
    fn test_sample_is_one_select_bracket_x_then_y() {
        let mut rig = rig(&[2000, 2000]);
        rig.touch.poll_touch();
        assert_eq!(
            *rig.log.borrow(),
            [
                Event::Select(false),
                Event::Exchange(READ_X),
                Event::Exchange(READ_Y),
                Event::Select(true),
            ]
        );
    }

    #[test]
    fn test_bus_failure_is_no_touch_and_deselects() {
        let mut rig = rig(&[]);
        rig.touch.lines.as_mut().unwrap().spi.fail = true;
        assert_eq!(rig.touch.poll_touch(), None);
        assert_eq!(
            *rig.log.borrow(),
            [
                Event::Select(false),
                Event::Exchange(READ_X),
                Event::Select(true),
            ]
        );
        assert!(matches!(rig.touch.read_raw(), Err(TouchError::Spi(Fault))));
    }

    #[test]
    fn test_read_raw_extracts_twelve_bit_values() {
        let mut rig = rig(&[0x0FFF, 0x0123]);
        assert_eq!(rig.touch.read_raw(), Ok((0x0FFF, 0x0123)));
    }

    #[test]
    fn test_mapping_is_monotonic_and_within_bounds() {
        let calibration = Calibration::default();
        let mut previous = 0;
        for raw in (0..=4095).step_by(7) {
            let x = calibration.x.map(raw, 480);
            assert!(x >= previous);
            assert!(x <= 479);
            previous = x;
        }
    }

    #[test]
    fn test_mapping_is_exact_at_and_clamped_beyond_bounds() {
        let axis = AxisCalibration::new(240, 3900).unwrap();
        assert_eq!(axis.map(240, 320), 0);
        assert_eq!(axis.map(3900, 320), 319);
        assert_eq!(axis.map(0, 320), 0);
        assert_eq!(axis.map(101, 320), 0);
        assert_eq!(axis.map(4095, 320), 319);
    }

    #[test]
    fn test_inverted_calibration_is_rejected() {
        assert_eq!(
            AxisCalibration::new(3900, 180),
            Err(BuilderError::InvalidCalibration {
                raw_low: 3900,
                raw_high: 180
            })
        );
        assert!(Calibration::new(180, 3900, 500, 500).is_err());
        assert!(Calibration::new(180, 3900, 240, 3900).is_ok());
    }

    #[test]
    fn test_cleanup_deselects_once_and_stops_sampling() {
        let mut rig = rig(&[2000, 2000]);
        rig.touch.cleanup().unwrap();
        rig.touch.cleanup().unwrap();
        assert_eq!(*rig.log.borrow(), [Event::Select(true)]);
        assert_eq!(rig.touch.poll_touch(), None);
        assert!(matches!(rig.touch.read_raw(), Err(TouchError::Released)));
        assert_eq!(rig.log.borrow().len(), 1);
    }

    #[test]
    fn test_release_deselects_and_hands_back_lines() {
        let rig = rig(&[0x0400, 0x0400]);
        let (spi, cs, irq) = rig.touch.release().unwrap();
        assert_eq!(*rig.log.borrow(), [Event::Select(true)]);

        let mut touch = Touch::new(spi, cs, irq, Calibration::default(), Geometry::default());
        assert_eq!(touch.read_raw(), Ok((0x0400, 0x0400)));
        assert_eq!(
            rig.log.borrow()[1..],
            [
                Event::Select(false),
                Event::Exchange(READ_X),
                Event::Exchange(READ_Y),
                Event::Select(true),
            ]
        );
    }
}
