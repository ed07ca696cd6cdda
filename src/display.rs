//! Core display operations
//!
//! [`Display`] owns a [`DisplayInterface`] and walks the controller through
//! its lifecycle:
//!
//! ```text
//! Uninitialized --initialize--> Reset --> Configured --> Ready
//!       ^                                                  |
//!       +------------- init step failed                   cleanup
//!                                                          v
//!                                                       Released
//! ```
//!
//! Drawing calls need `Ready`. A failed `initialize` leaves the driver
//! `Uninitialized` and may simply be retried. [`Display::release`] parks the
//! lines and hands the interface back; dropping it closes the bus.

use embedded_hal::delay::DelayNs;
use log::{debug, trace, warn};

use crate::color::Color;
use crate::command::{
    COLUMN_ADDRESS_SET, DISPLAY_OFF, DISPLAY_ON, MEMORY_WRITE, PAGE_ADDRESS_SET, Step,
};
use crate::config::{Config, Geometry};
use crate::error::Error;
use crate::interface::DisplayInterface;
use crate::region::Region;

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Lifecycle state of the controller
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum State {
    /// Not initialized, or the last `initialize` failed
    #[default]
    Uninitialized,
    /// Hardware reset done
    Reset,
    /// Init table sent, still asleep
    Configured,
    /// Display on, accepting pixel data
    Ready,
    /// Lines parked by `cleanup`; no further use
    Released,
}

/// ILI9486 display driver
///
/// Pixel data goes straight to the controller's frame memory; there is no
/// local framebuffer.
///
/// Dropping the driver performs [`cleanup`](Self::cleanup).
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface, taken by `release`
    interface: Option<I>,
    /// Display configuration
    config: Config,
    /// Where the controller is in its lifecycle
    state: State,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    ///
    /// No bus traffic happens until [`initialize`](Self::initialize).
    pub fn new(mut interface: I, config: Config) -> Self {
        interface.set_pixel_chunk(config.pixel_chunk);
        Self {
            interface: Some(interface),
            config,
            state: State::Uninitialized,
        }
    }

    /// Reset the panel, send the init table and switch the display on
    ///
    /// Blocks for roughly `reset_pulse_ms + reset_settle_ms + sleep_out_ms +
    /// display_on_ms` (420 ms with default timing).
    ///
    /// # Errors
    ///
    /// Returns `Error::InitFailed` if any step fails, leaving the driver
    /// uninitialized, and `Error::Released` after `cleanup`.
    pub fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        if self.state == State::Released {
            return Err(Error::Released);
        }
        let Some(interface) = self.interface.as_mut() else {
            return Err(Error::Released);
        };
        let geometry = self.config.geometry;
        debug!(
            "initializing {}x{} panel",
            geometry.width(),
            geometry.height()
        );

        match power_up(interface, &self.config, &mut self.state, delay) {
            Ok(()) => {
                self.state = State::Ready;
                debug!("display ready");
                Ok(())
            }
            Err(e) => {
                debug!("display init failed in state {:?}", self.state);
                self.state = State::Uninitialized;
                Err(Error::InitFailed(e))
            }
        }
    }

    /// Address the frame memory window and open a memory write
    ///
    /// Subsequent pixel data fills the window row by row.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotReady` before `initialize`, `Error::InvalidRegion`
    /// if the region does not fit this panel, or `Error::Interface` on bus failure.
    pub fn set_window(&mut self, region: &Region) -> DisplayResult<I> {
        self.ensure_ready()?;
        let region = self.checked(region)?;
        self.write_window(&region)
    }

    /// Paint the whole panel with one color
    ///
    /// # Errors
    ///
    /// Returns `Error::NotReady` before `initialize` or `Error::Interface`
    /// on bus failure.
    pub fn fill(&mut self, color: Color) -> DisplayResult<I> {
        self.ensure_ready()?;
        let region = Region::full(&self.config.geometry);
        self.paint(&region, color)
    }

    /// Paint a rectangle with one color
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRegion` without touching the bus when the
    /// region does not fit this panel, `Error::NotReady` before `initialize`,
    /// or `Error::Interface` on bus failure.
    pub fn draw_rect(&mut self, region: &Region, color: Color) -> DisplayResult<I> {
        self.ensure_ready()?;
        let region = self.checked(region)?;
        self.paint(&region, color)
    }

    /// Switch the backlight on or off
    ///
    /// Allowed in every state except `Released`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Released` after `cleanup` or `Error::Interface` on
    /// line failure.
    pub fn set_backlight(&mut self, on: bool) -> DisplayResult<I> {
        if self.state == State::Released {
            return Err(Error::Released);
        }
        debug!("backlight {}", if on { "on" } else { "off" });
        self.io()?.set_backlight(on).map_err(Error::Interface)
    }

    /// Switch a running display off, deselect the controller, hold reset
    /// high and switch the backlight off
    ///
    /// The driver is `Released` afterwards, even if a line could not be
    /// driven. Calling it again does nothing. The bus and lines stay owned
    /// until [`release`](Self::release) or drop.
    ///
    /// # Errors
    ///
    /// Returns `Error::Interface` if the bus or a line could not be driven.
    pub fn cleanup(&mut self) -> DisplayResult<I> {
        if self.state == State::Released {
            return Ok(());
        }
        let was_on = self.state == State::Ready;
        self.state = State::Released;
        let Some(interface) = self.interface.as_mut() else {
            return Ok(());
        };
        debug!("releasing display");
        let off = if was_on {
            interface.send_command(DISPLAY_OFF)
        } else {
            Ok(())
        };
        let parked = interface.release();
        off.and(parked).map_err(Error::Interface)
    }

    /// Clean up and hand back the interface
    ///
    /// A failed [`cleanup`](Self::cleanup) is logged; the interface is
    /// returned either way. Dropping it closes the bus and frees the lines.
    ///
    /// # Errors
    ///
    /// Returns `Error::Released` if the interface was already taken.
    pub fn release(mut self) -> Result<I, Error<I>> {
        if let Err(e) = self.cleanup() {
            warn!("display cleanup failed: {}", e);
        }
        self.interface.take().ok_or(Error::Released)
    }

    /// Current lifecycle state
    pub fn state(&self) -> State {
        self.state
    }

    /// Panel geometry
    pub fn geometry(&self) -> &Geometry {
        &self.config.geometry
    }

    /// Display configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn io(&mut self) -> Result<&mut I, Error<I>> {
        self.interface.as_mut().ok_or(Error::Released)
    }

    fn ensure_ready(&self) -> DisplayResult<I> {
        match self.state {
            State::Ready => Ok(()),
            State::Released => Err(Error::Released),
            _ => Err(Error::NotReady),
        }
    }

    /// A region may have been built against another geometry
    fn checked(&self, region: &Region) -> Result<Region, Error<I>> {
        Region::new(
            region.x0(),
            region.y0(),
            region.x1(),
            region.y1(),
            &self.config.geometry,
        )
        .map_err(Error::InvalidRegion)
    }

    fn paint(&mut self, region: &Region, color: Color) -> DisplayResult<I> {
        self.write_window(region)?;
        self.io()?
            .send_pixels(color.to_be_bytes(), region.area())
            .map_err(Error::Interface)
    }

    fn write_window(&mut self, region: &Region) -> DisplayResult<I> {
        trace!(
            "window ({}, {})..=({}, {})",
            region.x0(),
            region.y0(),
            region.x1(),
            region.y1()
        );
        self.send_command(COLUMN_ADDRESS_SET)?;
        self.send_data(&span(region.x0(), region.x1()))?;
        self.send_command(PAGE_ADDRESS_SET)?;
        self.send_data(&span(region.y0(), region.y1()))?;
        self.send_command(MEMORY_WRITE)
    }

    fn send_command(&mut self, command: u8) -> DisplayResult<I> {
        self.io()?.send_command(command).map_err(Error::Interface)
    }

    fn send_data(&mut self, data: &[u8]) -> DisplayResult<I> {
        self.io()?.send_data(data).map_err(Error::Interface)
    }
}

fn power_up<I, D>(
    interface: &mut I,
    config: &Config,
    state: &mut State,
    delay: &mut D,
) -> Result<(), I::Error>
where
    I: DisplayInterface,
    D: DelayNs,
{
    let timing = config.timing;

    interface.park()?;
    interface.reset(delay, timing.reset_pulse_ms)?;
    delay.delay_ms(timing.reset_settle_ms);
    *state = State::Reset;

    let sequence = config.init_sequence;
    debug!("sending {} init steps", sequence.len());
    for step in sequence {
        match *step {
            Step::Command(command) => interface.send_command(command)?,
            Step::Data(data) => interface.send_data(data)?,
        }
    }
    *state = State::Configured;

    // Sleep out must settle before the display is switched on
    delay.delay_ms(timing.sleep_out_ms);
    interface.send_command(DISPLAY_ON)?;
    delay.delay_ms(timing.display_on_ms);
    Ok(())
}

impl<I> Drop for Display<I>
where
    I: DisplayInterface,
{
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            warn!("display cleanup failed: {}", e);
        }
    }
}

/// Start and end address, both big-endian
fn span(start: u16, end: u16) -> [u8; 4] {
    let [s_hi, s_lo] = start.to_be_bytes();
    let [e_hi, e_lo] = end.to_be_bytes();
    [s_hi, s_lo, e_hi, e_lo]
}
