//! DMG core
//!
//! Game Boy (DMG) video core, cartridge bank controllers and the lockstep
//! orchestrator that drives an external CPU implementation, the timer, the
//! PPU and the input latch one instruction at a time.

pub mod common;
pub mod emu;
pub mod cpu;
pub mod bus;
pub mod cart;
pub mod ppu;
pub mod io;
pub mod lcd;
pub mod display;
pub mod timer;
pub mod gamepad;
pub mod interrupts;
pub mod logger;
