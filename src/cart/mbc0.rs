//! ROM-only cartridges (type 0x00)
//!
//! 32 KiB mapped straight into both ROM windows, no controller registers and
//! no external RAM.

use super::GamePack;
use crate::common::{Byte, Word};

#[derive(Debug, Clone)]
pub struct RomOnly {
    rom: Vec<Byte>,
}

impl RomOnly {
    pub fn new(rom: Vec<Byte>) -> Self {
        Self { rom }
    }
}

impl GamePack for RomOnly {
    fn read_lo_rom(&self, address: Word) -> Byte {
        self.rom[address as usize & 0x3FFF]
    }

    fn read_hi_rom(&self, address: Word) -> Byte {
        self.rom[0x4000 | (address as usize & 0x3FFF)]
    }

    fn write_rom(&mut self, _address: Word, _value: Byte) {}

    fn read_ram(&self, _address: Word) -> Byte {
        0xFF
    }

    fn write_ram(&mut self, _address: Word, _value: Byte) {}
}
