//! Timer
//!
//! Drives DIV and TIMA from a free-running 16-bit counter.
//!
//! Timer registers (stored in [`IoRegisters`]):
//! - DIV (0xFF04): upper 8 bits of the internal counter, 16384 Hz
//! - TIMA (0xFF05): timer counter
//! - TMA (0xFF06): timer modulo (reload value)
//! - TAC (0xFF07): timer control (enable and frequency select)

use crate::common::bit;
use crate::interrupts::Interrupt;
use crate::io::IoRegisters;

/// Counter bit whose falling edge clocks TIMA, indexed by TAC bits 0-1
const TIMER_BITS: [u8; 4] = [
    9, // 00: 4096 Hz (CPU Clock / 1024)
    3, // 01: 262144 Hz (CPU Clock / 16)
    5, // 10: 65536 Hz (CPU Clock / 64)
    7, // 11: 16384 Hz (CPU Clock / 256)
];

/// Game Boy Timer
#[derive(Debug, Clone, Default)]
pub struct Timer {
    /// Internal 16-bit divider counter
    counter: u16,
}

impl Timer {
    pub fn new() -> Self {
        Self { counter: 0 }
    }

    /// Internal counter value
    pub fn counter(&self) -> u16 {
        self.counter
    }

    /// Advance by `cycles` T-cycles
    pub fn advance(&mut self, cycles: u32, io: &mut IoRegisters) {
        if io.take_div_reset() {
            self.counter = 0;
        }
        for _ in 0..cycles {
            self.tick(io);
        }
        io.div = (self.counter >> 8) as u8;
    }

    /// Tick the timer by one T-cycle
    fn tick(&mut self, io: &mut IoRegisters) {
        let prev = self.counter;
        self.counter = self.counter.wrapping_add(1);

        if !bit(io.tac, 2) {
            return;
        }

        // Falling edge of the selected counter bit
        let bit_pos = TIMER_BITS[(io.tac & 0x03) as usize];
        let prev_bit = (prev >> bit_pos) & 1;
        let curr_bit = (self.counter >> bit_pos) & 1;

        if prev_bit == 1 && curr_bit == 0 {
            let (tima, overflow) = io.tima.overflowing_add(1);
            if overflow {
                io.tima = io.tma;
                io.request_interrupt(Interrupt::Timer);
            } else {
                io.tima = tima;
            }
        }
    }
}
