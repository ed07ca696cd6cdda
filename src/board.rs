//! Bring-up of a complete panel + touch board
//!
//! A [`Platform`] knows how to open a bus device and claim digital lines.
//! [`Board::open`] uses it to claim every resource in a [`HardwareConfig`]
//! exactly once and hands back a [`Display`] and a [`Touch`] ready for use.
//!
//! ```rust,ignore
//! let mut board = Board::open(LinuxPlatform::new()?, &HardwareConfig::default())?;
//! board.display.initialize(&mut delay)?;
//! board.display.fill(Color::BLACK)?;
//! if let Some((x, y)) = board.touch.poll_touch() {
//!     // ...
//! }
//! ```

use core::fmt::Debug;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal::spi::SpiBus;
use log::{debug, warn};

use crate::bus::BusConfig;
use crate::config::{Builder, HardwareConfig};
use crate::display::Display;
use crate::error::{OpenError, PinConfigError};
use crate::gpio::{Level, Pull, Role};
use crate::interface::Interface;
use crate::touch::Touch;

/// Source of bus devices and digital lines
pub trait Platform {
    /// Opened bus device
    type Bus: SpiBus<u8>;
    /// Claimed output line
    type Output: OutputPin;
    /// Claimed input line, sharing the output's error type
    type Input: InputPin<Error = <Self::Output as ErrorType>::Error>;
    /// Platform failure
    type Error: Debug;

    /// Open and configure a bus device
    ///
    /// # Errors
    ///
    /// Returns the platform error if the device is missing, busy, or cannot
    /// be configured.
    fn open_bus(&mut self, config: &BusConfig) -> Result<Self::Bus, Self::Error>;

    /// Claim a line as an output already driven to `level`
    ///
    /// # Errors
    ///
    /// Returns `PinConfigError` if the line does not exist or is claimed.
    fn output(
        &mut self,
        line: u8,
        level: Level,
    ) -> Result<Self::Output, PinConfigError<Self::Error>>;

    /// Claim a line as an input with the given bias
    ///
    /// # Errors
    ///
    /// Returns `PinConfigError` if the line does not exist or is claimed.
    fn input(
        &mut self,
        line: u8,
        pull: Pull,
    ) -> Result<Self::Input, PinConfigError<Self::Error>>;
}

/// Display interface built from a platform's resources
pub type BoardInterface<P> = Interface<
    <P as Platform>::Bus,
    <P as Platform>::Output,
    <P as Platform>::Output,
    <P as Platform>::Output,
    <P as Platform>::Output,
>;

/// Touch sampler built from a platform's resources
pub type BoardTouch<P> =
    Touch<<P as Platform>::Bus, <P as Platform>::Output, <P as Platform>::Input>;

/// The display and touch drivers of one board
pub struct Board<P: Platform> {
    /// Display driver, not yet initialized
    pub display: Display<BoardInterface<P>>,
    /// Touch sampler
    pub touch: BoardTouch<P>,
}

impl<P: Platform> Board<P> {
    /// Claim every bus and line named by `config`
    ///
    /// Outputs are claimed at their idle level (high) before either bus is
    /// opened. Nothing is sent to the panel; call
    /// [`Display::initialize`] next.
    ///
    /// # Errors
    ///
    /// - `OpenError::Pin` if the pin assignment has duplicates or a line
    ///   cannot be claimed
    /// - `OpenError::SharedBusDevice` if display and touch name the same device
    /// - `OpenError::BusUnavailable` if a bus device cannot be opened
    pub fn open(mut platform: P, config: &HardwareConfig) -> Result<Self, OpenError<P::Error>> {
        let pins = &config.pins;
        pins.validate()?;
        let (display_bus, touch_bus) = (&config.display_bus, &config.touch_bus);
        if display_bus.same_device(touch_bus) {
            return Err(OpenError::SharedBusDevice {
                bus: display_bus.bus,
                device: display_bus.device,
            });
        }
        let display_config = Builder::new().geometry(config.geometry).build()?;

        let rst = claim_output(&mut platform, Role::Reset, pins.reset)?;
        let dc = claim_output(&mut platform, Role::DataCommand, pins.data_command)?;
        let cs = claim_output(&mut platform, Role::DisplaySelect, pins.display_cs)?;
        let bl = claim_output(&mut platform, Role::Backlight, pins.backlight)?;
        let touch_cs = claim_output(&mut platform, Role::TouchSelect, pins.touch_cs)?;
        let touch_irq = platform.input(pins.touch_irq, Pull::Up)?;
        debug!("claimed control lines {:?}", pins);

        let display_spi = open_bus(&mut platform, display_bus)?;
        let touch_spi = open_bus(&mut platform, touch_bus)?;

        let interface = Interface::new(display_spi, dc, cs, rst, bl);
        Ok(Self {
            display: Display::new(interface, display_config),
            touch: Touch::new(
                touch_spi,
                touch_cs,
                touch_irq,
                config.calibration,
                config.geometry,
            ),
        })
    }

    /// Park the display and touch lines
    ///
    /// Failures are logged; both drivers are released either way.
    pub fn cleanup(&mut self) {
        if let Err(e) = self.display.cleanup() {
            warn!("display cleanup failed: {}", e);
        }
        if let Err(e) = self.touch.cleanup() {
            warn!("touch cleanup failed: {}", e);
        }
    }

    /// Park every line, then close both buses and give the lines back to
    /// the platform
    pub fn close(self) {
        let Self { display, touch } = self;
        if let Err(e) = display.release() {
            warn!("display release failed: {}", e);
        }
        if let Err(e) = touch.release() {
            warn!("touch release failed: {}", e);
        }
        debug!("board closed");
    }
}

fn claim_output<P: Platform>(
    platform: &mut P,
    role: Role,
    line: u8,
) -> Result<P::Output, PinConfigError<P::Error>> {
    let level = role.idle_level().unwrap_or(Level::High);
    platform.output(line, level)
}

fn open_bus<P: Platform>(
    platform: &mut P,
    config: &BusConfig,
) -> Result<P::Bus, OpenError<P::Error>> {
    let bus = platform
        .open_bus(config)
        .map_err(|source| OpenError::BusUnavailable {
            bus: config.bus,
            device: config.device,
            source,
        })?;
    debug!(
        "opened bus {}.{} at {} Hz",
        config.bus, config.device, config.clock_hz
    );
    Ok(bus)
}
