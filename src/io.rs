//! I/O Registers
//!
//! The memory-mapped register surface (0xFF00-0xFF7F plus IE at 0xFFFF)
//! shared by the CPU, timer, PPU and input latch. Components receive it
//! explicitly in their `advance` calls; the bus routes CPU reads and writes
//! to it by address.
//!
//! Registers with a dedicated field here:
//! - JOYP (0xFF00), DIV (0xFF04), TIMA (0xFF05), TMA (0xFF06), TAC (0xFF07)
//! - IF (0xFF0F)
//! - LCDC (0xFF40), STAT (0xFF41), SCY (0xFF42), SCX (0xFF43), LY (0xFF44),
//!   LYC (0xFF45), DMA (0xFF46), BGP (0xFF47), OBP0 (0xFF48), OBP1 (0xFF49),
//!   WY (0xFF4A), WX (0xFF4B)
//! - IE (0xFFFF)
//!
//! Everything else in the I/O page (sound, serial) is stored raw so the CPU
//! can read back what it wrote.

use crate::common::{Byte, Word};
use crate::interrupts::Interrupt;

/// Register values after the boot ROM has run
pub const BOOT_LCDC: Byte = 0x91;
pub const BOOT_STAT: Byte = 0x02;
pub const BOOT_BGP: Byte = 0xFC;
pub const BOOT_OBP: Byte = 0xFF;
pub const BOOT_JOYP: Byte = 0xCF;

/// Shared I/O register surface
#[derive(Debug, Clone)]
pub struct IoRegisters {
    /// JOYP - Joypad (0xFF00)
    pub joyp: Byte,
    /// DIV - Divider (0xFF04)
    pub div: Byte,
    /// TIMA - Timer counter (0xFF05)
    pub tima: Byte,
    /// TMA - Timer modulo (0xFF06)
    pub tma: Byte,
    /// TAC - Timer control (0xFF07)
    pub tac: Byte,
    /// IF - Interrupt flags (0xFF0F)
    pub int_flags: Byte,
    /// LCDC - LCD Control (0xFF40)
    pub lcdc: Byte,
    /// STAT - LCD Status (0xFF41)
    pub stat: Byte,
    /// SCY - Scroll Y (0xFF42)
    pub scy: Byte,
    /// SCX - Scroll X (0xFF43)
    pub scx: Byte,
    /// LY - Current scanline (0xFF44)
    pub ly: Byte,
    /// LYC - LY Compare (0xFF45)
    pub lyc: Byte,
    /// DMA - OAM DMA source page (0xFF46)
    pub dma: Byte,
    /// BGP - Background Palette (0xFF47)
    pub bgp: Byte,
    /// OBP0 - Object Palette 0 (0xFF48)
    pub obp0: Byte,
    /// OBP1 - Object Palette 1 (0xFF49)
    pub obp1: Byte,
    /// WY - Window Y Position (0xFF4A)
    pub wy: Byte,
    /// WX - Window X Position (0xFF4B)
    pub wx: Byte,
    /// IE - Interrupt enable (0xFFFF)
    pub ie_register: Byte,
    /// Set by a CPU write to DIV, consumed by the timer
    div_reset: bool,
    /// Registers without a dedicated field
    raw: [Byte; 0x80],
}

impl Default for IoRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl IoRegisters {
    /// Create the register surface in its post-boot state
    pub fn new() -> Self {
        Self {
            joyp: BOOT_JOYP,
            div: 0,
            tima: 0,
            tma: 0,
            tac: 0,
            int_flags: 0,
            lcdc: BOOT_LCDC,
            stat: BOOT_STAT,
            scy: 0,
            scx: 0,
            ly: 0,
            lyc: 0,
            dma: 0,
            bgp: BOOT_BGP,
            obp0: BOOT_OBP,
            obp1: BOOT_OBP,
            wy: 0,
            wx: 0,
            ie_register: 0,
            div_reset: false,
            raw: [0; 0x80],
        }
    }

    /// CPU-visible read
    pub fn read(&self, address: Word) -> Byte {
        match address {
            0xFF00 => self.joyp,
            0xFF04 => self.div,
            0xFF05 => self.tima,
            0xFF06 => self.tma,
            0xFF07 => self.tac | 0xF8,
            0xFF0F => self.int_flags | 0xE0,
            0xFF40 => self.lcdc,
            0xFF41 => self.stat | 0x80,
            0xFF42 => self.scy,
            0xFF43 => self.scx,
            0xFF44 => self.ly,
            0xFF45 => self.lyc,
            0xFF46 => self.dma,
            0xFF47 => self.bgp,
            0xFF48 => self.obp0,
            0xFF49 => self.obp1,
            0xFF4A => self.wy,
            0xFF4B => self.wx,
            0xFFFF => self.ie_register,
            0xFF01..=0xFF7F => self.raw[(address - 0xFF00) as usize],
            _ => 0xFF,
        }
    }

    /// CPU-visible write
    ///
    /// STAT bits 0-2 and LY belong to the PPU and are not writable from
    /// here; only the select bits of JOYP are writable.
    pub fn write(&mut self, address: Word, value: Byte) {
        match address {
            0xFF00 => self.joyp = (self.joyp & 0xCF) | (value & 0x30),
            0xFF04 => {
                self.div = 0;
                self.div_reset = true;
            }
            0xFF05 => self.tima = value,
            0xFF06 => self.tma = value,
            0xFF07 => self.tac = value & 0x07,
            0xFF0F => self.int_flags = value & 0x1F,
            0xFF40 => self.lcdc = value,
            0xFF41 => self.stat = (self.stat & 0x07) | (value & 0x78),
            0xFF42 => self.scy = value,
            0xFF43 => self.scx = value,
            0xFF44 => {}
            0xFF45 => self.lyc = value,
            0xFF46 => self.dma = value,
            0xFF47 => self.bgp = value,
            0xFF48 => self.obp0 = value,
            0xFF49 => self.obp1 = value,
            0xFF4A => self.wy = value,
            0xFF4B => self.wx = value,
            0xFFFF => self.ie_register = value,
            0xFF01..=0xFF7F => self.raw[(address - 0xFF00) as usize] = value,
            _ => {}
        }
    }

    /// Set the request bit for an interrupt line
    pub fn request_interrupt(&mut self, interrupt: Interrupt) {
        self.int_flags |= interrupt.bit();
    }

    /// Lines that are both requested and enabled
    pub fn pending_interrupts(&self) -> Byte {
        self.int_flags & self.ie_register & 0x1F
    }

    /// Consume a pending DIV reset written by the CPU
    pub fn take_div_reset(&mut self) -> bool {
        std::mem::take(&mut self.div_reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boot_values() {
        let io = IoRegisters::new();
        assert_eq!(io.lcdc, 0x91);
        assert_eq!(io.bgp, 0xFC);
        assert_eq!(io.read(0xFF00), 0xCF);
        assert_eq!(io.read(0xFF41) & 0x83, 0x82);
    }

    #[test]
    fn test_ly_read_only() {
        let mut io = IoRegisters::new();
        io.ly = 50;
        io.write(0xFF44, 0x00);
        assert_eq!(io.read(0xFF44), 50);
    }

    #[test]
    fn test_stat_low_bits_protected() {
        let mut io = IoRegisters::new();
        io.stat = 0x06; // mode 2 + coincidence
        io.write(0xFF41, 0xFF);
        assert_eq!(io.stat, 0x7E);
        io.write(0xFF41, 0x00);
        assert_eq!(io.stat, 0x06);
    }

    #[test]
    fn test_if_register_masking() {
        let mut io = IoRegisters::new();
        io.write(0xFF0F, 0xFF);
        assert_eq!(io.int_flags, 0x1F);
        io.write(0xFF0F, 0x05);
        assert_eq!(io.read(0xFF0F), 0xE5);
    }

    #[test]
    fn test_div_write_requests_reset() {
        let mut io = IoRegisters::new();
        io.div = 0xAB;
        io.write(0xFF04, 0x42);
        assert_eq!(io.div, 0);
        assert!(io.take_div_reset());
        assert!(!io.take_div_reset());
    }

    #[test]
    fn test_joyp_only_select_bits_writable() {
        let mut io = IoRegisters::new();
        io.write(0xFF00, 0x00);
        assert_eq!(io.joyp, 0xCF);
        io.write(0xFF00, 0xFF);
        assert_eq!(io.joyp, 0xFF);
    }

    #[test]
    fn test_request_interrupt() {
        let mut io = IoRegisters::new();
        io.request_interrupt(Interrupt::VBlank);
        io.request_interrupt(Interrupt::Timer);
        assert_eq!(io.int_flags, 0x05);
        assert_eq!(io.pending_interrupts(), 0);
        io.ie_register = 0x04;
        assert_eq!(io.pending_interrupts(), 0x04);
    }

    #[test]
    fn test_raw_registers_round_trip() {
        let mut io = IoRegisters::new();
        io.write(0xFF26, 0x80);
        assert_eq!(io.read(0xFF26), 0x80);
    }
}
