//! LCD Control
//!
//! Bit accessors over the packed LCDC (0xFF40) and STAT (0xFF41) bytes.
//! The bytes stay packed in [`IoRegisters`] so CPU reads and writes round
//! trip exactly; these helpers are the only place the field layout lives.

use crate::common::{bit, bit_set, Byte, Word};
use crate::io::IoRegisters;
use crate::ppu::modes::PpuMode;

/// Tile map at 0x9800-0x9BFF
pub const TILE_MAP_LOW: Word = 0x9800;
/// Tile map at 0x9C00-0x9FFF
pub const TILE_MAP_HIGH: Word = 0x9C00;
/// Unsigned tile data base (0x8000-0x8FFF)
pub const TILE_DATA_UNSIGNED: Word = 0x8000;
/// Signed tile data base (0x8800-0x97FF)
pub const TILE_DATA_SIGNED: Word = 0x8800;

impl IoRegisters {
    // ========== LCDC Bit Accessors ==========

    /// LCD Display Enable (bit 7)
    pub fn lcd_enabled(&self) -> bool {
        bit(self.lcdc, 7)
    }

    /// Window Tile Map Select (bit 6)
    pub fn window_tile_map(&self) -> Word {
        if bit(self.lcdc, 6) {
            TILE_MAP_HIGH
        } else {
            TILE_MAP_LOW
        }
    }

    /// Window Enable (bit 5)
    pub fn window_enabled(&self) -> bool {
        bit(self.lcdc, 5)
    }

    /// BG & Window Tile Data Select (bit 4)
    ///
    /// `true` selects unsigned indexing from 0x8000, `false` signed indexing
    /// around 0x9000.
    pub fn unsigned_tile_data(&self) -> bool {
        bit(self.lcdc, 4)
    }

    /// BG Tile Map Select (bit 3)
    pub fn bg_tile_map(&self) -> Word {
        if bit(self.lcdc, 3) {
            TILE_MAP_HIGH
        } else {
            TILE_MAP_LOW
        }
    }

    /// Sprite height from the size bit (bit 2)
    pub fn sprite_height(&self) -> u8 {
        if bit(self.lcdc, 2) {
            16
        } else {
            8
        }
    }

    /// Sprite Enable (bit 1)
    pub fn sprites_enabled(&self) -> bool {
        bit(self.lcdc, 1)
    }

    /// BG & Window Enable (bit 0)
    pub fn bg_window_enabled(&self) -> bool {
        bit(self.lcdc, 0)
    }

    // ========== STAT Bit Accessors ==========

    /// Current PPU mode (bits 0-1)
    pub fn mode(&self) -> PpuMode {
        PpuMode::from(self.stat)
    }

    /// Replace the mode bits (0-1), leaving every other STAT bit alone
    pub fn set_mode(&mut self, mode: PpuMode) {
        self.stat = (self.stat & 0xFC) | (mode as Byte);
    }

    /// LYC=LY Coincidence Flag (bit 2)
    pub fn lyc_flag(&self) -> bool {
        bit(self.stat, 2)
    }

    pub(crate) fn set_lyc_flag(&mut self, value: bool) {
        bit_set(&mut self.stat, 2, value);
    }

    /// Mode 0 HBlank Interrupt Enable (bit 3)
    pub fn hblank_int_enabled(&self) -> bool {
        bit(self.stat, 3)
    }

    /// Mode 1 VBlank Interrupt Enable (bit 4)
    pub fn vblank_int_enabled(&self) -> bool {
        bit(self.stat, 4)
    }

    /// Mode 2 OAM Interrupt Enable (bit 5)
    pub fn oam_int_enabled(&self) -> bool {
        bit(self.stat, 5)
    }

    /// LYC=LY Coincidence Interrupt Enable (bit 6)
    pub fn lyc_int_enabled(&self) -> bool {
        bit(self.stat, 6)
    }

    // ========== Palette Helpers ==========

    /// Background palette entry for a color id
    pub fn bg_color(&self, color_id: u8) -> u8 {
        palette_color(self.bgp, color_id)
    }

    /// Object palette entry; `palette_1` selects OBP1 over OBP0
    pub fn sprite_color(&self, palette_1: bool, color_id: u8) -> u8 {
        let palette = if palette_1 { self.obp1 } else { self.obp0 };
        palette_color(palette, color_id)
    }
}

/// Map a 2-bit color id through a packed palette byte
#[inline]
pub fn palette_color(palette: Byte, color_id: u8) -> u8 {
    (palette >> (color_id * 2)) & 0x03
}
