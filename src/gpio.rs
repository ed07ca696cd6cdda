//! Digital control lines
//!
//! The panel and touch controller need six lines besides the bus:
//!
//! | Role          | Direction | Idle level | Default line |
//! |---------------|-----------|------------|--------------|
//! | Reset         | output    | high       | 25           |
//! | Data/Command  | output    | high       | 24           |
//! | Display CS    | output    | high       | 8            |
//! | Backlight     | output    | high (on)  | 18           |
//! | Touch CS      | output    | high       | 7            |
//! | Touch IRQ     | input     | pull-up    | 17           |
//!
//! Outputs must reach their idle level the moment they are configured: a
//! chip-select left floating low lets the controller clock in bus noise as
//! commands. [`Platform::output`](crate::board::Platform::output) therefore
//! takes the initial level as an argument.

use crate::error::PinConfigError;

/// Logic level of a digital line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// Logic low
    Low,
    /// Logic high
    High,
}

/// Input bias
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pull {
    /// No bias
    #[default]
    None,
    /// Pull-up to logic high
    Up,
    /// Pull-down to logic low
    Down,
}

/// Logical function of a control line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Panel reset, active low
    Reset,
    /// Data/command select: low for command bytes, high for data
    DataCommand,
    /// Display chip-select, active low
    DisplaySelect,
    /// Backlight enable, active high
    Backlight,
    /// Touch controller chip-select, active low
    TouchSelect,
    /// Touch pen interrupt, active low
    TouchIrq,
}

impl Role {
    /// Level an output line is parked at when idle, `None` for inputs
    pub const fn idle_level(self) -> Option<Level> {
        match self {
            Self::TouchIrq => None,
            _ => Some(Level::High),
        }
    }
}

/// Mapping from logical role to physical line number
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinAssignment {
    /// Panel reset line
    pub reset: u8,
    /// Data/command select line
    pub data_command: u8,
    /// Display chip-select line
    pub display_cs: u8,
    /// Backlight enable line
    pub backlight: u8,
    /// Touch chip-select line
    pub touch_cs: u8,
    /// Touch interrupt line
    pub touch_irq: u8,
}

impl Default for PinAssignment {
    fn default() -> Self {
        Self {
            reset: 25,
            data_command: 24,
            display_cs: 8,
            backlight: 18,
            touch_cs: 7,
            touch_irq: 17,
        }
    }
}

impl PinAssignment {
    /// All lines paired with their role, outputs first
    pub fn lines(&self) -> [(Role, u8); 6] {
        [
            (Role::Reset, self.reset),
            (Role::DataCommand, self.data_command),
            (Role::DisplaySelect, self.display_cs),
            (Role::Backlight, self.backlight),
            (Role::TouchSelect, self.touch_cs),
            (Role::TouchIrq, self.touch_irq),
        ]
    }

    /// Check that no physical line is used for two roles
    ///
    /// # Errors
    ///
    /// Returns `PinConfigError::DuplicateLine` naming the first line that
    /// appears twice.
    pub fn validate<E>(&self) -> Result<(), PinConfigError<E>> {
        let lines = self.lines();
        for (index, (_, line)) in lines.iter().enumerate() {
            if lines[index + 1..].iter().any(|(_, other)| other == line) {
                return Err(PinConfigError::DuplicateLine { line: *line });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    #[test]
    fn test_default_assignment_is_valid() {
        assert!(PinAssignment::default().validate::<Infallible>().is_ok());
    }

    #[test]
    fn test_duplicate_line_is_rejected() {
        let pins = PinAssignment {
            touch_cs: 8,
            ..PinAssignment::default()
        };
        assert!(matches!(
            pins.validate::<Infallible>(),
            Err(PinConfigError::DuplicateLine { line: 8 })
        ));
    }

    #[test]
    fn test_outputs_idle_high_and_irq_has_no_idle_level() {
        for (role, _) in PinAssignment::default().lines() {
            match role {
                Role::TouchIrq => assert_eq!(role.idle_level(), None),
                _ => assert_eq!(role.idle_level(), Some(Level::High)),
            }
        }
    }
}
