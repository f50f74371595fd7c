//! MBC3 (types 0x0F-0x13)
//!
//! - 0x0000-0x1FFF: RAM enable, 0x0A in the low nibble enables
//! - 0x2000-0x3FFF: 7-bit ROM bank, 0 reads as 1
//! - 0x4000-0x5FFF: RAM bank 0-3, or 0x08-0x0C to select a clock register
//! - 0x6000-0x7FFF: clock latch
//!
//! The real-time clock is not emulated: while a clock register is selected
//! the RAM window reads 0xFF and ignores writes, and latch writes do nothing.

use super::{ram_index, rom_index, GamePack};
use crate::common::{Byte, Word};

#[derive(Debug, Clone)]
pub struct Mbc3 {
    rom: Vec<Byte>,
    ram: Vec<Byte>,
    ram_enabled: bool,
    rom_bank: u8,
    /// RAM bank or clock register select
    ram_select: u8,
}

impl Mbc3 {
    pub fn new(rom: Vec<Byte>, ram_size: usize) -> Self {
        Self {
            rom,
            ram: vec![0; ram_size],
            ram_enabled: false,
            rom_bank: 1,
            ram_select: 0,
        }
    }

    /// Selected RAM bank, `None` while a clock register is selected
    fn ram_bank(&self) -> Option<usize> {
        match self.ram_select {
            0x00..=0x03 => Some(self.ram_select as usize),
            _ => None,
        }
    }

    fn ram_slot(&self, address: Word) -> Option<usize> {
        if !self.ram_enabled {
            return None;
        }
        ram_index(&self.ram, self.ram_bank()?, address)
    }
}

impl GamePack for Mbc3 {
    fn read_lo_rom(&self, address: Word) -> Byte {
        self.rom[address as usize & 0x3FFF]
    }

    fn read_hi_rom(&self, address: Word) -> Byte {
        self.rom[rom_index(&self.rom, self.rom_bank as usize, address)]
    }

    fn write_rom(&mut self, address: Word, value: Byte) {
        match address {
            0x0000..=0x1FFF => self.ram_enabled = (value & 0x0F) == 0x0A,
            0x2000..=0x3FFF => {
                self.rom_bank = (value & 0x7F).max(1);
                log::trace!("MBC3 ROM bank -> {}", self.rom_bank);
            }
            0x4000..=0x5FFF => self.ram_select = value & 0x0F,
            _ => {}
        }
    }

    fn read_ram(&self, address: Word) -> Byte {
        self.ram_slot(address).map(|i| self.ram[i]).unwrap_or(0xFF)
    }

    fn write_ram(&mut self, address: Word, value: Byte) {
        if let Some(i) = self.ram_slot(address) {
            self.ram[i] = value;
        }
    }
}
