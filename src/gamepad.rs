//! Gamepad
//!
//! Input latch behind the JOYP register. Key reports from the host are
//! buffered here and become visible to the CPU on the next [`Gamepad::advance`].
//!
//! JOYP Register (0xFF00):
//! - Bit 5: Select button keys (0 = selected)
//! - Bit 4: Select direction keys (0 = selected)
//! - Bit 3: Down or Start (0 = pressed)
//! - Bit 2: Up or Select (0 = pressed)
//! - Bit 1: Left or B (0 = pressed)
//! - Bit 0: Right or A (0 = pressed)

use crate::common::{bit, with_bit, without_bit, Byte};
use crate::interrupts::Interrupt;
use crate::io::IoRegisters;

/// Game Boy buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    Select,
    Start,
    Right,
    Left,
    Up,
    Down,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::A,
        Button::B,
        Button::Select,
        Button::Start,
        Button::Right,
        Button::Left,
        Button::Up,
        Button::Down,
    ];

    /// Whether the key belongs to the direction group
    pub fn is_direction(self) -> bool {
        matches!(self, Button::Right | Button::Left | Button::Up | Button::Down)
    }

    /// JOYP line (0-3) within its group
    pub fn line(self) -> u8 {
        match self {
            Button::A | Button::Right => 0,
            Button::B | Button::Left => 1,
            Button::Select | Button::Up => 2,
            Button::Start | Button::Down => 3,
        }
    }
}

/// Gamepad state
#[derive(Debug, Clone)]
pub struct Gamepad {
    /// Action keys, active low (bits 0-3)
    buttons: Byte,
    /// Direction keys, active low (bits 0-3)
    directions: Byte,
    /// Low nibble of JOYP at the previous advance
    lines: Byte,
}

impl Default for Gamepad {
    fn default() -> Self {
        Self::new()
    }
}

impl Gamepad {
    /// Create a gamepad with every key released
    pub fn new() -> Self {
        Self {
            buttons: 0x0F,
            directions: 0x0F,
            lines: 0x0F,
        }
    }

    /// Record a key transition reported by the host
    pub fn report_key(&mut self, button: Button, pressed: bool) {
        let group = if button.is_direction() {
            &mut self.directions
        } else {
            &mut self.buttons
        };
        // Active low
        *group = if pressed {
            without_bit(*group, button.line())
        } else {
            with_bit(*group, button.line())
        };
    }

    /// Check if button is pressed
    pub fn is_pressed(&self, button: Button) -> bool {
        let group = if button.is_direction() {
            self.directions
        } else {
            self.buttons
        };
        !bit(group, button.line())
    }

    /// Publish the buffered keys into JOYP for the selected groups
    ///
    /// A line going from released to pressed requests the joypad interrupt.
    pub fn advance(&mut self, io: &mut IoRegisters) {
        let select = io.joyp & 0x30;
        let mut lines = 0x0F;
        if !bit(select, 5) {
            lines &= self.buttons;
        }
        if !bit(select, 4) {
            lines &= self.directions;
        }

        io.joyp = 0xC0 | select | lines;

        if self.lines & !lines & 0x0F != 0 {
            log::trace!("Joypad lines {:04b} -> {:04b}", self.lines, lines);
            io.request_interrupt(Interrupt::Joypad);
        }
        self.lines = lines;
    }
}
