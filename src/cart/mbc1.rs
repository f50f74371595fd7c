//! MBC1 (types 0x01-0x03)
//!
//! Register map (writes into the ROM window):
//! - 0x0000-0x1FFF: RAM enable, 0x0A in the low nibble enables
//! - 0x2000-0x3FFF: low 5 bits of the ROM bank, 0 reads as 1
//! - 0x4000-0x5FFF: 2-bit upper ROM bits / RAM bank
//! - 0x6000-0x7FFF: banking mode; mode 1 applies the 2-bit register to the
//!   fixed window and to RAM

use super::{ram_index, rom_index, GamePack};
use crate::common::{Byte, Word};

#[derive(Debug, Clone)]
pub struct Mbc1 {
    rom: Vec<Byte>,
    ram: Vec<Byte>,
    ram_enabled: bool,
    /// 5-bit ROM bank register, never 0
    rom_bank: u8,
    /// 2-bit secondary register
    upper_bank: u8,
    /// Banking mode (0 = ROM, 1 = RAM)
    mode: u8,
}

impl Mbc1 {
    pub fn new(rom: Vec<Byte>, ram_size: usize) -> Self {
        Self {
            rom,
            ram: vec![0; ram_size],
            ram_enabled: false,
            rom_bank: 1,
            upper_bank: 0,
            mode: 0,
        }
    }

    /// Bank mapped at 0x0000-0x3FFF
    fn lo_bank(&self) -> usize {
        if self.mode == 1 {
            (self.upper_bank as usize) << 5
        } else {
            0
        }
    }

    /// Bank mapped at 0x4000-0x7FFF
    fn hi_bank(&self) -> usize {
        ((self.upper_bank as usize) << 5) | self.rom_bank as usize
    }

    fn ram_bank(&self) -> usize {
        if self.mode == 1 {
            self.upper_bank as usize
        } else {
            0
        }
    }
}

impl GamePack for Mbc1 {
    fn read_lo_rom(&self, address: Word) -> Byte {
        self.rom[rom_index(&self.rom, self.lo_bank(), address)]
    }

    fn read_hi_rom(&self, address: Word) -> Byte {
        self.rom[rom_index(&self.rom, self.hi_bank(), address)]
    }

    fn write_rom(&mut self, address: Word, value: Byte) {
        match address {
            0x0000..=0x1FFF => self.ram_enabled = (value & 0x0F) == 0x0A,
            0x2000..=0x3FFF => {
                self.rom_bank = (value & 0x1F).max(1);
                log::trace!("MBC1 ROM bank -> {}", self.hi_bank());
            }
            0x4000..=0x5FFF => self.upper_bank = value & 0x03,
            0x6000..=0x7FFF => self.mode = value & 0x01,
            _ => {}
        }
    }

    fn read_ram(&self, address: Word) -> Byte {
        if !self.ram_enabled {
            return 0xFF;
        }
        ram_index(&self.ram, self.ram_bank(), address)
            .map(|i| self.ram[i])
            .unwrap_or(0xFF)
    }

    fn write_ram(&mut self, address: Word, value: Byte) {
        if !self.ram_enabled {
            return;
        }
        if let Some(i) = ram_index(&self.ram, self.ram_bank(), address) {
            self.ram[i] = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::tests::create_test_rom;

    fn mbc1(banks: usize, ram_size: usize) -> Mbc1 {
        Mbc1::new(create_test_rom(0x03, banks, 0), ram_size)
    }

    #[test]
    fn test_power_on_maps_bank_1() {
        let cart = mbc1(4, 0);
        assert_eq!(cart.read_hi_rom(0x4000), 1);
        assert_eq!(cart.read_lo_rom(0x3FFF), 0);
    }

    #[test]
    fn test_rom_bank_switch() {
        let mut cart = mbc1(8, 0);
        cart.write_rom(0x2000, 0x05);
        assert_eq!(cart.read_hi_rom(0x4000), 5);
        assert_eq!(cart.read_hi_rom(0x7FFF), 5);
    }

    #[test]
    fn test_bank_zero_reads_as_one() {
        let mut cart = mbc1(4, 0);
        cart.write_rom(0x2000, 0x00);
        assert_eq!(cart.read_hi_rom(0x4000), 1);
        cart.write_rom(0x2000, 0x20);
        assert_eq!(cart.read_hi_rom(0x4000), 1);
    }

    #[test]
    fn test_bank_wraps_to_image_size() {
        let mut cart = mbc1(4, 0);
        cart.write_rom(0x2000, 0x06);
        assert_eq!(cart.read_hi_rom(0x4000), 2);
    }

    #[test]
    fn test_upper_bits_select_large_banks() {
        let mut cart = mbc1(128, 0);
        cart.write_rom(0x2000, 0x01);
        cart.write_rom(0x4000, 0x01);
        assert_eq!(cart.read_hi_rom(0x4000), 33);

        // Mode 0 keeps bank 0 in the fixed window, mode 1 remaps it.
        assert_eq!(cart.read_lo_rom(0x1000), 0);
        cart.write_rom(0x6000, 0x01);
        assert_eq!(cart.read_lo_rom(0x1000), 32);
    }

    #[test]
    fn test_ram_enable_and_banking() {
        let mut cart = mbc1(4, 0x8000);
        assert_eq!(cart.read_ram(0xA000), 0xFF);
        cart.write_ram(0xA000, 0x11);

        cart.write_rom(0x0000, 0x0A);
        assert_eq!(cart.read_ram(0xA000), 0x00);
        cart.write_ram(0xA000, 0x11);

        cart.write_rom(0x6000, 0x01);
        cart.write_rom(0x4000, 0x02);
        cart.write_ram(0xA000, 0x22);
        assert_eq!(cart.read_ram(0xA000), 0x22);

        cart.write_rom(0x4000, 0x00);
        assert_eq!(cart.read_ram(0xA000), 0x11);

        cart.write_rom(0x0000, 0x00);
        assert_eq!(cart.read_ram(0xA000), 0xFF);
    }

    #[test]
    fn test_no_ram_reads_ff() {
        let mut cart = mbc1(4, 0);
        cart.write_rom(0x0000, 0x0A);
        cart.write_ram(0xA000, 0x42);
        assert_eq!(cart.read_ram(0xA000), 0xFF);
    }
}
