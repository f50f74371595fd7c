//! MBC5 (types 0x19-0x1B)
//!
//! - 0x0000-0x1FFF: RAM enable, 0x0A in the low nibble enables
//! - 0x2000-0x2FFF: ROM bank, low 8 bits
//! - 0x3000-0x3FFF: ROM bank, bit 8
//! - 0x4000-0x5FFF: RAM bank, low 4 bits
//!
//! Unlike the older controllers, bank 0 can be mapped into the switchable
//! window.

use super::{ram_index, rom_index, GamePack};
use crate::common::{Byte, Word};

#[derive(Debug, Clone)]
pub struct Mbc5 {
    rom: Vec<Byte>,
    ram: Vec<Byte>,
    ram_enabled: bool,
    /// 9-bit ROM bank
    rom_bank: u16,
    ram_bank: u8,
}

impl Mbc5 {
    pub fn new(rom: Vec<Byte>, ram_size: usize) -> Self {
        Self {
            rom,
            ram: vec![0; ram_size],
            ram_enabled: false,
            rom_bank: 1,
            ram_bank: 0,
        }
    }
}

impl GamePack for Mbc5 {
    fn read_lo_rom(&self, address: Word) -> Byte {
        self.rom[address as usize & 0x3FFF]
    }

    fn read_hi_rom(&self, address: Word) -> Byte {
        self.rom[rom_index(&self.rom, self.rom_bank as usize, address)]
    }

    fn write_rom(&mut self, address: Word, value: Byte) {
        match address {
            0x0000..=0x1FFF => self.ram_enabled = (value & 0x0F) == 0x0A,
            0x2000..=0x2FFF => self.rom_bank = (self.rom_bank & 0x100) | value as u16,
            0x3000..=0x3FFF => {
                self.rom_bank = (self.rom_bank & 0xFF) | (((value & 0x01) as u16) << 8)
            }
            0x4000..=0x5FFF => self.ram_bank = value & 0x0F,
            _ => {}
        }
        if (0x2000..=0x3FFF).contains(&address) {
            log::trace!("MBC5 ROM bank -> {}", self.rom_bank);
        }
    }

    fn read_ram(&self, address: Word) -> Byte {
        if !self.ram_enabled {
            return 0xFF;
        }
        ram_index(&self.ram, self.ram_bank as usize, address)
            .map(|i| self.ram[i])
            .unwrap_or(0xFF)
    }

    fn write_ram(&mut self, address: Word, value: Byte) {
        if !self.ram_enabled {
            return;
        }
        if let Some(i) = ram_index(&self.ram, self.ram_bank as usize, address) {
            self.ram[i] = value;
        }
    }
}
