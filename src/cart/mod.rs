//! Cartridge
//!
//! ROM header parsing, image validation and the bank-controller family.
//! Every controller presents the same [`GamePack`] contract; the variant is
//! picked once at load from header byte 0x147 and stored as a tagged
//! [`Mbc`] so reads and writes dispatch through a `match`, never a vtable.

pub mod mbc0;
pub mod mbc1;
pub mod mbc2;
pub mod mbc3;
pub mod mbc5;

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::common::{Byte, Word};

pub use mbc0::RomOnly;
pub use mbc1::Mbc1;
pub use mbc2::Mbc2;
pub use mbc3::Mbc3;
pub use mbc5::Mbc5;

/// Size of one switchable ROM bank
pub const ROM_BANK_SIZE: usize = 0x4000;
/// Size of one switchable external RAM bank
pub const RAM_BANK_SIZE: usize = 0x2000;

/// ROM header offsets
const HEADER_TITLE_START: usize = 0x134;
const HEADER_TITLE_END: usize = 0x143;
const HEADER_CART_TYPE: usize = 0x147;
const HEADER_ROM_SIZE: usize = 0x148;
const HEADER_RAM_SIZE: usize = 0x149;
const HEADER_CHECKSUM: usize = 0x14D;
const HEADER_END: usize = 0x150;

/// Smallest image any cartridge can have (two ROM banks)
const MIN_IMAGE_SIZE: usize = 2 * ROM_BANK_SIZE;

/// Memory-controller capability set shared by every cartridge type
pub trait GamePack {
    /// Read from the fixed ROM window (0x0000-0x3FFF)
    fn read_lo_rom(&self, address: Word) -> Byte;

    /// Read from the switchable ROM window (0x4000-0x7FFF)
    fn read_hi_rom(&self, address: Word) -> Byte;

    /// Write into the ROM window (0x0000-0x7FFF): controller registers,
    /// never ROM contents
    fn write_rom(&mut self, address: Word, value: Byte);

    /// Read external RAM (0xA000-0xBFFF)
    fn read_ram(&self, address: Word) -> Byte;

    /// Write external RAM (0xA000-0xBFFF)
    fn write_ram(&mut self, address: Word, value: Byte);
}

/// Fatal cartridge load failures
#[derive(Debug)]
pub enum CartridgeError {
    /// Header byte 0x147 names no supported controller
    Unsupported(Byte),
    /// Image is shorter than its declared, bank-aligned size
    Malformed { declared: usize, actual: usize },
    /// Image file could not be read
    Io(io::Error),
}

impl fmt::Display for CartridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartridgeError::Unsupported(cart_type) => {
                write!(f, "unsupported cartridge type 0x{:02X}", cart_type)
            }
            CartridgeError::Malformed { declared, actual } => write!(
                f,
                "malformed cartridge image: {} bytes, expected {} bytes",
                actual, declared
            ),
            CartridgeError::Io(e) => write!(f, "failed to read cartridge image: {}", e),
        }
    }
}

impl std::error::Error for CartridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CartridgeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CartridgeError {
    fn from(e: io::Error) -> Self {
        CartridgeError::Io(e)
    }
}

/// ROM header information
#[derive(Debug, Clone)]
pub struct RomHeader {
    /// Game title (up to 16 characters)
    pub title: String,
    /// Cartridge type (controller selector)
    pub cart_type: Byte,
    /// ROM size code
    pub rom_size: Byte,
    /// RAM size code
    pub ram_size: Byte,
    /// Header checksum
    pub checksum: Byte,
}

impl RomHeader {
    /// Parse ROM header from ROM data
    pub fn parse(rom_data: &[Byte]) -> Option<Self> {
        if rom_data.len() < HEADER_END {
            return None;
        }

        let title = rom_data[HEADER_TITLE_START..=HEADER_TITLE_END]
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| b as char)
            .collect();

        Some(Self {
            title,
            cart_type: rom_data[HEADER_CART_TYPE],
            rom_size: rom_data[HEADER_ROM_SIZE],
            ram_size: rom_data[HEADER_RAM_SIZE],
            checksum: rom_data[HEADER_CHECKSUM],
        })
    }

    /// Declared ROM size in bytes, for the standard power-of-two codes
    pub fn rom_size_bytes(&self) -> Option<usize> {
        match self.rom_size {
            0..=8 => Some(MIN_IMAGE_SIZE << self.rom_size),
            _ => None,
        }
    }

    /// Declared external RAM size in bytes
    pub fn ram_size_bytes(&self) -> usize {
        match self.ram_size {
            1 => 2048,
            2 => 8192,
            3 => 32768,
            4 => 131072,
            5 => 65536,
            _ => 0,
        }
    }

    /// Cartridge type name
    pub fn cart_type_name(&self) -> &'static str {
        match self.cart_type {
            0x00 => "ROM ONLY",
            0x01 => "MBC1",
            0x02 => "MBC1+RAM",
            0x03 => "MBC1+RAM+BATTERY",
            0x05 => "MBC2",
            0x06 => "MBC2+BATTERY",
            0x0F => "MBC3+TIMER+BATTERY",
            0x10 => "MBC3+TIMER+RAM+BATTERY",
            0x11 => "MBC3",
            0x12 => "MBC3+RAM",
            0x13 => "MBC3+RAM+BATTERY",
            0x19 => "MBC5",
            0x1A => "MBC5+RAM",
            0x1B => "MBC5+RAM+BATTERY",
            _ => "UNKNOWN",
        }
    }

    /// Check if cartridge has battery backup
    pub fn has_battery(&self) -> bool {
        matches!(self.cart_type, 0x03 | 0x06 | 0x0F | 0x10 | 0x13 | 0x1B)
    }
}

/// Header checksum over 0x134-0x14C
pub fn calculate_checksum(rom_data: &[Byte]) -> Byte {
    rom_data[HEADER_TITLE_START..HEADER_CHECKSUM]
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_sub(b).wrapping_sub(1))
}

/// The resolved bank controller
#[derive(Debug, Clone)]
pub enum Mbc {
    RomOnly(RomOnly),
    Mbc1(Mbc1),
    Mbc2(Mbc2),
    Mbc3(Mbc3),
    Mbc5(Mbc5),
}

impl Mbc {
    /// Build the controller named by a header, taking ownership of the image
    fn for_header(header: &RomHeader, rom: Vec<Byte>) -> Result<Self, CartridgeError> {
        let ram_size = header.ram_size_bytes();
        let mbc = match header.cart_type {
            0x00 => Mbc::RomOnly(RomOnly::new(rom)),
            0x01..=0x03 => Mbc::Mbc1(Mbc1::new(rom, ram_size)),
            0x05 | 0x06 => Mbc::Mbc2(Mbc2::new(rom)),
            0x0F..=0x13 => Mbc::Mbc3(Mbc3::new(rom, ram_size)),
            0x19..=0x1B => Mbc::Mbc5(Mbc5::new(rom, ram_size)),
            other => return Err(CartridgeError::Unsupported(other)),
        };
        Ok(mbc)
    }

    /// Short controller name
    pub fn name(&self) -> &'static str {
        match self {
            Mbc::RomOnly(_) => "ROM ONLY",
            Mbc::Mbc1(_) => "MBC1",
            Mbc::Mbc2(_) => "MBC2",
            Mbc::Mbc3(_) => "MBC3",
            Mbc::Mbc5(_) => "MBC5",
        }
    }
}

impl GamePack for Mbc {
    #[inline]
    fn read_lo_rom(&self, address: Word) -> Byte {
        match self {
            Mbc::RomOnly(m) => m.read_lo_rom(address),
            Mbc::Mbc1(m) => m.read_lo_rom(address),
            Mbc::Mbc2(m) => m.read_lo_rom(address),
            Mbc::Mbc3(m) => m.read_lo_rom(address),
            Mbc::Mbc5(m) => m.read_lo_rom(address),
        }
    }

    #[inline]
    fn read_hi_rom(&self, address: Word) -> Byte {
        match self {
            Mbc::RomOnly(m) => m.read_hi_rom(address),
            Mbc::Mbc1(m) => m.read_hi_rom(address),
            Mbc::Mbc2(m) => m.read_hi_rom(address),
            Mbc::Mbc3(m) => m.read_hi_rom(address),
            Mbc::Mbc5(m) => m.read_hi_rom(address),
        }
    }

    fn write_rom(&mut self, address: Word, value: Byte) {
        match self {
            Mbc::RomOnly(m) => m.write_rom(address, value),
            Mbc::Mbc1(m) => m.write_rom(address, value),
            Mbc::Mbc2(m) => m.write_rom(address, value),
            Mbc::Mbc3(m) => m.write_rom(address, value),
            Mbc::Mbc5(m) => m.write_rom(address, value),
        }
    }

    #[inline]
    fn read_ram(&self, address: Word) -> Byte {
        match self {
            Mbc::RomOnly(m) => m.read_ram(address),
            Mbc::Mbc1(m) => m.read_ram(address),
            Mbc::Mbc2(m) => m.read_ram(address),
            Mbc::Mbc3(m) => m.read_ram(address),
            Mbc::Mbc5(m) => m.read_ram(address),
        }
    }

    fn write_ram(&mut self, address: Word, value: Byte) {
        match self {
            Mbc::RomOnly(m) => m.write_ram(address, value),
            Mbc::Mbc1(m) => m.write_ram(address, value),
            Mbc::Mbc2(m) => m.write_ram(address, value),
            Mbc::Mbc3(m) => m.write_ram(address, value),
            Mbc::Mbc5(m) => m.write_ram(address, value),
        }
    }
}

/// A loaded cartridge: parsed header plus its bank controller
#[derive(Debug, Clone)]
pub struct Cartridge {
    /// Parsed ROM header
    pub header: RomHeader,
    mbc: Mbc,
}

impl Cartridge {
    /// Load a cartridge from an image file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CartridgeError> {
        let rom = fs::read(path.as_ref())?;
        Self::from_bytes(rom)
    }

    /// Validate a raw image and build its controller.
    ///
    /// Nothing is constructed unless the image is accepted.
    pub fn from_bytes(rom: Vec<Byte>) -> Result<Self, CartridgeError> {
        let header = RomHeader::parse(&rom).ok_or(CartridgeError::Malformed {
            declared: MIN_IMAGE_SIZE,
            actual: rom.len(),
        })?;

        let declared = header.rom_size_bytes().unwrap_or(MIN_IMAGE_SIZE);
        let aligned = rom.len().div_ceil(ROM_BANK_SIZE) * ROM_BANK_SIZE;
        if rom.len() != aligned || rom.len() < declared {
            return Err(CartridgeError::Malformed {
                declared: declared.max(aligned),
                actual: rom.len(),
            });
        }

        if calculate_checksum(&rom) != header.checksum {
            log::warn!("ROM header checksum invalid");
        }

        let rom_len = rom.len();
        let mbc = Mbc::for_header(&header, rom)?;

        log::info!("Loaded ROM: {}", header.title);
        log::info!("Type: {} (0x{:02X})", header.cart_type_name(), header.cart_type);
        log::info!("ROM Size: {} KB", rom_len / 1024);
        log::info!("RAM Size: {} KB", header.ram_size_bytes() / 1024);

        Ok(Self { header, mbc })
    }

    /// The resolved controller
    pub fn mbc(&self) -> &Mbc {
        &self.mbc
    }
}

impl GamePack for Cartridge {
    #[inline]
    fn read_lo_rom(&self, address: Word) -> Byte {
        self.mbc.read_lo_rom(address)
    }

    #[inline]
    fn read_hi_rom(&self, address: Word) -> Byte {
        self.mbc.read_hi_rom(address)
    }

    fn write_rom(&mut self, address: Word, value: Byte) {
        self.mbc.write_rom(address, value)
    }

    #[inline]
    fn read_ram(&self, address: Word) -> Byte {
        self.mbc.read_ram(address)
    }

    fn write_ram(&mut self, address: Word, value: Byte) {
        self.mbc.write_ram(address, value)
    }
}

/// Index into a banked ROM; the bank number is reduced to the image's bank
/// count so the access is always in range.
#[inline]
pub(crate) fn rom_index(rom: &[Byte], bank: usize, address: Word) -> usize {
    let banks = rom.len() / ROM_BANK_SIZE;
    (bank % banks) * ROM_BANK_SIZE + (address as usize & (ROM_BANK_SIZE - 1))
}

/// Index into banked external RAM, or `None` when the cartridge has none.
/// Cartridges with less than one full bank mirror it across the window.
#[inline]
pub(crate) fn ram_index(ram: &[Byte], bank: usize, address: Word) -> Option<usize> {
    if ram.is_empty() {
        return None;
    }
    let offset = address as usize & (RAM_BANK_SIZE - 1);
    Some((bank * RAM_BANK_SIZE + offset) % ram.len())
}
