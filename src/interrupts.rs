//! Interrupts
//!
//! The five DMG interrupt lines, the IE/IF dispatch scan run after every CPU
//! step, and the delayed master-enable latch CPU implementations use to
//! model `EI`.
//!
//! Interrupt vectors:
//! - VBlank: 0x0040
//! - LCD STAT: 0x0048
//! - Timer: 0x0050
//! - Serial: 0x0058
//! - Joypad: 0x0060

use crate::bus::Bus;
use crate::common::{Byte, Word};
use crate::cpu::Processor;

/// Interrupt lines in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interrupt {
    /// VBlank interrupt (highest priority)
    VBlank = 0,
    /// LCD STAT interrupt
    LcdStat = 1,
    /// Timer interrupt
    Timer = 2,
    /// Serial interrupt (never requested by this core)
    Serial = 3,
    /// Joypad interrupt (lowest priority)
    Joypad = 4,
}

impl Interrupt {
    /// All lines, highest priority first
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    /// Line number (bit position in IE/IF)
    pub fn line(self) -> u8 {
        self as u8
    }

    /// Mask for this interrupt in the IE/IF registers
    pub fn bit(self) -> Byte {
        1 << self.line()
    }

    /// Interrupt vector address
    pub fn vector(self) -> Word {
        0x0040 + 8 * self.line() as Word
    }
}

/// Scan all five lines in priority order and vector the CPU for every line
/// whose enable and request bits are both set, then advance the CPU's
/// deferred interrupt-enable latch.
///
/// Request flags are level-sensitive, so this runs after every step and not
/// only after a line fires. The CPU decides (through its master enable)
/// whether a vectored line is actually serviced.
pub fn dispatch<C: Processor>(cpu: &mut C, bus: &mut Bus) {
    for interrupt in Interrupt::ALL {
        let pending = bus.io.pending_interrupts();
        if pending & interrupt.bit() != 0 {
            cpu.vector_interrupt(interrupt, bus);
        }
    }

    cpu.update_deferred_enable();
}

/// Interrupt master enable with the one-instruction delay of `EI`.
///
/// Two states are tracked: an enable that has been scheduled and the enable
/// that is currently active. `EI` only schedules; the scheduled enable
/// becomes active at the next [`ImeLatch::update`], which the orchestrator
/// triggers after the interrupt scan that follows each step. The
/// instruction following `EI` therefore always runs before any interrupt
/// can be taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImeLatch {
    pending: bool,
    active: bool,
}

impl ImeLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// `EI`: schedule the enable
    pub fn schedule_enable(&mut self) {
        self.pending = true;
    }

    /// `RETI`: enable immediately
    pub fn enable_now(&mut self) {
        self.pending = false;
        self.active = true;
    }

    /// `DI` and interrupt entry: drop both the active and any scheduled enable
    pub fn disable(&mut self) {
        self.pending = false;
        self.active = false;
    }

    /// Promote a scheduled enable to active
    pub fn update(&mut self) {
        if self.pending {
            self.pending = false;
            self.active = true;
        }
    }

    /// Whether interrupts may currently be serviced
    pub fn is_enabled(&self) -> bool {
        self.active
    }

    /// Whether an enable is scheduled but not yet active
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
