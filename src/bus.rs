//! Memory Bus
//!
//! Routes CPU memory accesses to the cartridge, video memory, work RAM and
//! the I/O register surface.

use crate::cart::{Cartridge, GamePack};
use crate::common::{Byte, Word};
use crate::io::IoRegisters;
use crate::ppu::memory::{VideoMemory, OAM_SIZE};

/// WRAM size: 8KB (0xC000-0xDFFF)
const WRAM_SIZE: usize = 0x2000;

/// HRAM size: 127 bytes (0xFF80-0xFFFE)
const HRAM_SIZE: usize = 0x7F;

/// Memory bus trait for reading and writing memory
pub trait MemoryBus {
    /// Read a byte from the given address
    fn read(&self, address: Word) -> Byte;

    /// Write a byte to the given address
    fn write(&mut self, address: Word, value: Byte);

    /// Read a 16-bit word from the given address (little-endian)
    fn read16(&self, address: Word) -> Word {
        let lo = self.read(address) as Word;
        let hi = self.read(address.wrapping_add(1)) as Word;
        lo | (hi << 8)
    }

    /// Write a 16-bit word to the given address (little-endian)
    fn write16(&mut self, address: Word, value: Word) {
        self.write(address, (value & 0xFF) as Byte);
        self.write(address.wrapping_add(1), (value >> 8) as Byte);
    }
}

/// Game Boy memory bus
///
/// - 0x0000-0x3FFF: Cartridge ROM, fixed window
/// - 0x4000-0x7FFF: Cartridge ROM, switchable window
/// - 0x8000-0x9FFF: VRAM
/// - 0xA000-0xBFFF: Cartridge RAM
/// - 0xC000-0xDFFF: WRAM
/// - 0xE000-0xFDFF: Echo of WRAM
/// - 0xFE00-0xFE9F: OAM
/// - 0xFEA0-0xFEFF: Unusable (reads 0xFF)
/// - 0xFF00-0xFF7F: I/O registers
/// - 0xFF80-0xFFFE: HRAM
/// - 0xFFFF: IE register
#[derive(Debug, Clone)]
pub struct Bus {
    /// Cartridge (handles banking)
    pub cart: Option<Cartridge>,
    /// VRAM and OAM
    pub video: VideoMemory,
    /// I/O registers
    pub io: IoRegisters,
    wram: [Byte; WRAM_SIZE],
    hram: [Byte; HRAM_SIZE],
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    /// Create a bus with no cartridge inserted
    pub fn new() -> Self {
        Self {
            cart: None,
            video: VideoMemory::new(),
            io: IoRegisters::new(),
            wram: [0; WRAM_SIZE],
            hram: [0; HRAM_SIZE],
        }
    }

    /// Create a bus with a cartridge inserted
    pub fn with_cartridge(cart: Cartridge) -> Self {
        Self {
            cart: Some(cart),
            ..Self::new()
        }
    }

    /// Copy 160 bytes from `page << 8` into OAM
    fn oam_dma(&mut self, page: Byte) {
        let source = (page as Word) << 8;
        for i in 0..OAM_SIZE as Word {
            let value = self.read(source.wrapping_add(i));
            self.video.oam[i as usize] = value;
        }
    }
}

impl MemoryBus for Bus {
    fn read(&self, address: Word) -> Byte {
        match address {
            0x0000..=0x3FFF => self.cart.as_ref().map_or(0xFF, |c| c.read_lo_rom(address)),
            0x4000..=0x7FFF => self.cart.as_ref().map_or(0xFF, |c| c.read_hi_rom(address)),
            0x8000..=0x9FFF => self.video.vram_read(address),
            0xA000..=0xBFFF => self.cart.as_ref().map_or(0xFF, |c| c.read_ram(address)),
            0xC000..=0xDFFF => self.wram[(address - 0xC000) as usize],
            0xE000..=0xFDFF => self.wram[(address - 0xE000) as usize],
            0xFE00..=0xFE9F => self.video.oam_read(address),
            0xFEA0..=0xFEFF => 0xFF,
            0xFF00..=0xFF7F | 0xFFFF => self.io.read(address),
            0xFF80..=0xFFFE => self.hram[(address - 0xFF80) as usize],
        }
    }

    fn write(&mut self, address: Word, value: Byte) {
        match address {
            // Writes into ROM go to the bank controller
            0x0000..=0x7FFF => {
                if let Some(cart) = self.cart.as_mut() {
                    cart.write_rom(address, value);
                }
            }
            0x8000..=0x9FFF => self.video.vram_write(address, value),
            0xA000..=0xBFFF => {
                if let Some(cart) = self.cart.as_mut() {
                    cart.write_ram(address, value);
                }
            }
            0xC000..=0xDFFF => self.wram[(address - 0xC000) as usize] = value,
            0xE000..=0xFDFF => self.wram[(address - 0xE000) as usize] = value,
            0xFE00..=0xFE9F => self.video.oam_write(address, value),
            0xFEA0..=0xFEFF => {}
            0xFF46 => {
                self.io.write(address, value);
                self.oam_dma(value);
            }
            0xFF00..=0xFF7F | 0xFFFF => self.io.write(address, value),
            0xFF80..=0xFFFE => self.hram[(address - 0xFF80) as usize] = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::tests::create_test_rom;

    fn bus_with(cart_type: Byte, banks: usize) -> Bus {
        Bus::with_cartridge(Cartridge::from_bytes(create_test_rom(cart_type, banks, 0)).unwrap())
    }

    #[test]
    fn test_wram_routing() {
        let mut bus = Bus::new();
        bus.write(0xC000, 0x42);
        assert_eq!(bus.read(0xC000), 0x42);
        bus.write(0xDFFF, 0xAB);
        assert_eq!(bus.read(0xDFFF), 0xAB);
    }

    #[test]
    fn test_echo_ram() {
        let mut bus = Bus::new();
        bus.write(0xC000, 0x42);
        assert_eq!(bus.read(0xE000), 0x42);
        bus.write(0xFDFF, 0x24);
        assert_eq!(bus.read(0xDDFF), 0x24);
    }

    #[test]
    fn test_hram_routing() {
        let mut bus = Bus::new();
        bus.write(0xFF80, 0x12);
        assert_eq!(bus.read(0xFF80), 0x12);
        bus.write(0xFFFE, 0x34);
        assert_eq!(bus.read(0xFFFE), 0x34);
    }

    #[test]
    fn test_ie_and_if_registers() {
        let mut bus = Bus::new();
        bus.write(0xFFFF, 0x1F);
        assert_eq!(bus.read(0xFFFF), 0x1F);
        assert_eq!(bus.io.ie_register, 0x1F);

        bus.write(0xFF0F, 0x05);
        assert_eq!(bus.read(0xFF0F) & 0x1F, 0x05);
        assert_eq!(bus.io.int_flags, 0x05);
    }

    #[test]
    fn test_video_routing() {
        let mut bus = Bus::new();
        bus.write(0x8000, 0x55);
        assert_eq!(bus.read(0x8000), 0x55);
        assert_eq!(bus.video.vram[0], 0x55);

        bus.write(0xFE00, 0x11);
        assert_eq!(bus.read(0xFE00), 0x11);
        assert_eq!(bus.video.oam[0], 0x11);
    }

    #[test]
    fn test_unusable_area() {
        let mut bus = Bus::new();
        bus.write(0xFEA0, 0x12);
        assert_eq!(bus.read(0xFEA0), 0xFF);
        assert_eq!(bus.read(0xFEFF), 0xFF);
    }

    #[test]
    fn test_no_cartridge_reads_ff() {
        let bus = Bus::new();
        assert_eq!(bus.read(0x0100), 0xFF);
        assert_eq!(bus.read(0x4000), 0xFF);
        assert_eq!(bus.read(0xA000), 0xFF);
    }

    #[test]
    fn test_cartridge_windows() {
        let mut bus = bus_with(0x01, 4);
        assert_eq!(bus.read(0x4000), 1);
        bus.write(0x2000, 0x03);
        assert_eq!(bus.read(0x4000), 3);
        assert_eq!(bus.read(0x0000), 0);
    }

    #[test]
    fn test_rom_only_ignores_rom_writes() {
        let mut bus = bus_with(0x00, 2);
        let before = bus.read(0x0150);
        bus.write(0x0150, before.wrapping_add(1));
        bus.write(0x2000, 0x05);
        assert_eq!(bus.read(0x0150), before);
        assert_eq!(bus.read(0x4000), 1);
    }

    #[test]
    fn test_oam_dma_copies_page() {
        let mut bus = Bus::new();
        for i in 0..0xA0u16 {
            bus.write(0xC100 + i, i as u8 ^ 0x5A);
        }
        bus.write(0xFF46, 0xC1);
        assert_eq!(bus.read(0xFF46), 0xC1);
        for i in 0..0xA0usize {
            assert_eq!(bus.video.oam[i], i as u8 ^ 0x5A);
        }
    }

    #[test]
    fn test_read16_write16() {
        let mut bus = Bus::new();
        bus.write16(0xC000, 0x1234);
        assert_eq!(bus.read(0xC000), 0x34);
        assert_eq!(bus.read(0xC001), 0x12);
        assert_eq!(bus.read16(0xC000), 0x1234);
    }
}
