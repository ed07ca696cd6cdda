//! ILI9486 command definitions
//!
//! This module defines the command bytes used to drive the ILI9486 TFT
//! controller and the init table issued by
//! [`Display::initialize`](crate::display::Display::initialize).
//!
//! ## Command Structure
//!
//! Every transaction is framed by the chip-select line:
//! 1. Set DC low (command) or high (data)
//! 2. Assert CS
//! 3. Send the byte(s)
//! 4. Deassert CS
//!
//! A command with parameters is therefore one command transaction followed by
//! one data transaction.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ili9486::{command, DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::OutputPin;
//! # use embedded_hal::spi::{ErrorType, SpiBus};
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
//! # let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin, MockPin);
//! // Memory access control: row/column exchange off, BGR order
//! let _ = interface.send_command(command::MEMORY_ACCESS_CONTROL);
//! let _ = interface.send_data(&[0x48]);
//! ```

/// Sleep out (0x11)
///
/// Leaves sleep mode. The controller needs 120ms before the next command.
pub const SLEEP_OUT: u8 = 0x11;

/// Display on (0x29)
///
/// Starts output from frame memory to the panel.
pub const DISPLAY_ON: u8 = 0x29;

/// Display off (0x28)
pub const DISPLAY_OFF: u8 = 0x28;

// Addressing and memory commands

/// Column address set (0x2A)
///
/// Requires 4 bytes: [start_MSB, start_LSB, end_MSB, end_LSB]
pub const COLUMN_ADDRESS_SET: u8 = 0x2A;

/// Page (row) address set (0x2B)
///
/// Requires 4 bytes: [start_MSB, start_LSB, end_MSB, end_LSB]
pub const PAGE_ADDRESS_SET: u8 = 0x2B;

/// Memory write (0x2C)
///
/// Arms the controller for a stream of pixel data into the current window.
pub const MEMORY_WRITE: u8 = 0x2C;

/// Memory access control (0x36)
///
/// Scan direction and RGB/BGR order. Requires 1 byte.
pub const MEMORY_ACCESS_CONTROL: u8 = 0x36;

/// Interface pixel format (0x3A)
///
/// Requires 1 byte: 0x55 = 16 bits per pixel on both RGB and MCU interfaces.
pub const PIXEL_FORMAT: u8 = 0x3A;

// Panel and power commands

/// Interface mode control (0xB0)
pub const INTERFACE_MODE_CONTROL: u8 = 0xB0;

/// Frame rate control, normal mode (0xB1)
pub const FRAME_RATE_CONTROL: u8 = 0xB1;

/// Display inversion control (0xB4)
pub const INVERSION_CONTROL: u8 = 0xB4;

/// Display function control (0xB6)
pub const DISPLAY_FUNCTION_CONTROL: u8 = 0xB6;

/// Power control 1 (0xC0)
///
/// Requires 2 bytes: VREG1OUT and VREG2OUT levels.
pub const POWER_CONTROL_1: u8 = 0xC0;

/// Power control 2 (0xC1)
///
/// Requires 1 byte: step-up factor.
pub const POWER_CONTROL_2: u8 = 0xC1;

/// VCOM control (0xC5)
///
/// Requires 3 bytes.
pub const VCOM_CONTROL: u8 = 0xC5;

/// Positive gamma correction (0xE0)
///
/// Requires 15 bytes.
pub const POSITIVE_GAMMA: u8 = 0xE0;

/// Negative gamma correction (0xE1)
///
/// Requires 15 bytes.
pub const NEGATIVE_GAMMA: u8 = 0xE1;

/// Set image function (0xE9)
pub const SET_IMAGE_FUNCTION: u8 = 0xE9;

/// Adjust control 3 (0xF7)
///
/// Requires 5 bytes.
pub const ADJUST_CONTROL_3: u8 = 0xF7;

/// One element of a controller command table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// A command byte, sent with DC low
    Command(u8),
    /// Parameter bytes for the preceding command, sent with DC high
    Data(&'static [u8]),
}

/// Init table for the ILI9486 on the reference 480x320 panel
///
/// Power, gamma and orientation registers must be written before the panel
/// leaves sleep mode, so the order here is fixed.
pub const INIT_SEQUENCE: &[Step] = &[
    Step::Command(POSITIVE_GAMMA),
    Step::Data(&[
        0x00, 0x03, 0x09, 0x08, 0x16, 0x0A, 0x3F, 0x78, 0x4C, 0x09, 0x0A, 0x08, 0x16, 0x1A, 0x0F,
    ]),
    Step::Command(NEGATIVE_GAMMA),
    Step::Data(&[
        0x00, 0x16, 0x19, 0x03, 0x0F, 0x05, 0x32, 0x45, 0x46, 0x04, 0x0E, 0x0D, 0x35, 0x37, 0x0F,
    ]),
    Step::Command(POWER_CONTROL_1),
    Step::Data(&[0x17, 0x15]),
    Step::Command(POWER_CONTROL_2),
    Step::Data(&[0x41]),
    Step::Command(VCOM_CONTROL),
    Step::Data(&[0x00, 0x12, 0x80]),
    Step::Command(MEMORY_ACCESS_CONTROL),
    Step::Data(&[0x48]),
    Step::Command(PIXEL_FORMAT),
    Step::Data(&[0x55]),
    Step::Command(INTERFACE_MODE_CONTROL),
    Step::Data(&[0x00]),
    Step::Command(FRAME_RATE_CONTROL),
    Step::Data(&[0xA0]),
    Step::Command(INVERSION_CONTROL),
    Step::Data(&[0x02]),
    Step::Command(DISPLAY_FUNCTION_CONTROL),
    Step::Data(&[0x02, 0x02]),
    Step::Command(SET_IMAGE_FUNCTION),
    Step::Data(&[0x00]),
    Step::Command(ADJUST_CONTROL_3),
    Step::Data(&[0x20, 0x00, 0x00, 0x00, 0x00]),
    Step::Command(SLEEP_OUT),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_sequence_starts_with_gamma_and_ends_with_sleep_out() {
        assert_eq!(INIT_SEQUENCE.first(), Some(&Step::Command(POSITIVE_GAMMA)));
        assert_eq!(INIT_SEQUENCE.last(), Some(&Step::Command(SLEEP_OUT)));
    }

    #[test]
    fn test_init_sequence_data_always_follows_a_command() {
        let mut previous = None;
        for step in INIT_SEQUENCE {
            if let Step::Data(bytes) = step {
                assert!(!bytes.is_empty());
                assert!(matches!(previous, Some(Step::Command(_))));
            }
            previous = Some(*step);
        }
    }

    #[test]
    fn test_init_sequence_selects_16bit_pixels() {
        let position = INIT_SEQUENCE
            .iter()
            .position(|step| *step == Step::Command(PIXEL_FORMAT))
            .unwrap();
        assert_eq!(INIT_SEQUENCE[position + 1], Step::Data(&[0x55]));
    }

    #[test]
    fn test_init_sequence_gamma_tables_are_15_bytes() {
        for (index, step) in INIT_SEQUENCE.iter().enumerate() {
            if matches!(step, Step::Command(POSITIVE_GAMMA | NEGATIVE_GAMMA)) {
                assert!(matches!(INIT_SEQUENCE[index + 1], Step::Data(d) if d.len() == 15));
            }
        }
    }
}
