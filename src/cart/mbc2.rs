//! MBC2 (types 0x05-0x06)
//!
//! 4-bit ROM bank register and 512 half-byte cells of built-in RAM.
//! - 0x0000-0x1FFF: RAM enable; an even low bit enables, an odd one disables
//! - 0x2000-0x3FFF: ROM bank, low 4 bits

use super::{rom_index, GamePack};
use crate::common::{Byte, Word};

/// Built-in RAM cells (4 usable bits each)
const RAM_CELLS: usize = 0x200;

#[derive(Debug, Clone)]
pub struct Mbc2 {
    rom: Vec<Byte>,
    ram: [Byte; RAM_CELLS],
    ram_enabled: bool,
    rom_bank: u8,
}

impl Mbc2 {
    pub fn new(rom: Vec<Byte>) -> Self {
        Self {
            rom,
            ram: [0; RAM_CELLS],
            ram_enabled: false,
            rom_bank: 1,
        }
    }
}

impl GamePack for Mbc2 {
    fn read_lo_rom(&self, address: Word) -> Byte {
        self.rom[address as usize & 0x3FFF]
    }

    fn read_hi_rom(&self, address: Word) -> Byte {
        self.rom[rom_index(&self.rom, self.rom_bank as usize, address)]
    }

    fn write_rom(&mut self, address: Word, value: Byte) {
        match address {
            0x0000..=0x1FFF => self.ram_enabled = (value & 0x01) == 0,
            0x2000..=0x3FFF => {
                self.rom_bank = value & 0x0F;
                log::trace!("MBC2 ROM bank -> {}", self.rom_bank);
            }
            _ => {}
        }
    }

    fn read_ram(&self, address: Word) -> Byte {
        if self.ram_enabled {
            self.ram[address as usize & (RAM_CELLS - 1)]
        } else {
            0xFF
        }
    }

    fn write_ram(&mut self, address: Word, value: Byte) {
        if self.ram_enabled {
            self.ram[address as usize & (RAM_CELLS - 1)] = value & 0x0F;
        }
    }
}
