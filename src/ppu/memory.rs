//! Video memory: VRAM tile data / tile maps and the sprite attribute table

use crate::common::{bit, Byte, Word};

/// VRAM size (0x8000-0x9FFF)
pub const VRAM_SIZE: usize = 0x2000;
/// OAM size (0xFE00-0xFE9F): 40 sprites * 4 bytes
pub const OAM_SIZE: usize = 0xA0;
/// Number of sprite entries in OAM
pub const OAM_ENTRIES: usize = 40;

const VRAM_BASE: Word = 0x8000;
const OAM_BASE: Word = 0xFE00;

/// OAM Entry (sprite attributes)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OamEntry {
    /// Y position (plus 16)
    pub y: Byte,
    /// X position (plus 8)
    pub x: Byte,
    /// Tile index
    pub tile: Byte,
    /// Flags (priority, flip, palette)
    pub flags: Byte,
}

impl OamEntry {
    /// Palette number (bit 4): `true` selects OBP1
    pub fn palette_number(&self) -> bool {
        bit(self.flags, 4)
    }

    /// X flip (bit 5)
    pub fn x_flip(&self) -> bool {
        bit(self.flags, 5)
    }

    /// Y flip (bit 6)
    pub fn y_flip(&self) -> bool {
        bit(self.flags, 6)
    }

    /// Drawn behind background colors 1-3 (bit 7)
    pub fn behind_bg(&self) -> bool {
        bit(self.flags, 7)
    }

    /// Top screen row covered by this sprite
    pub fn screen_y(&self) -> i32 {
        self.y as i32 - 16
    }

    /// Leftmost screen column covered by this sprite
    pub fn screen_x(&self) -> i32 {
        self.x as i32 - 8
    }
}

/// VRAM and OAM
#[derive(Debug, Clone)]
pub struct VideoMemory {
    /// Video RAM (8KB)
    pub vram: [Byte; VRAM_SIZE],
    /// Object Attribute Memory (40 sprites * 4 bytes)
    pub oam: [Byte; OAM_SIZE],
}

impl Default for VideoMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoMemory {
    pub fn new() -> Self {
        Self {
            vram: [0; VRAM_SIZE],
            oam: [0; OAM_SIZE],
        }
    }

    /// Read VRAM by bus address (0x8000-0x9FFF)
    #[inline]
    pub fn vram_read(&self, address: Word) -> Byte {
        self.vram[(address - VRAM_BASE) as usize]
    }

    /// Write VRAM by bus address (0x8000-0x9FFF)
    #[inline]
    pub fn vram_write(&mut self, address: Word, value: Byte) {
        self.vram[(address - VRAM_BASE) as usize] = value;
    }

    /// Read OAM by bus address (0xFE00-0xFE9F)
    #[inline]
    pub fn oam_read(&self, address: Word) -> Byte {
        self.oam[(address - OAM_BASE) as usize]
    }

    /// Write OAM by bus address (0xFE00-0xFE9F)
    #[inline]
    pub fn oam_write(&mut self, address: Word, value: Byte) {
        self.oam[(address - OAM_BASE) as usize] = value;
    }

    /// Sprite entry `index` (0-39)
    pub fn oam_entry(&self, index: usize) -> OamEntry {
        let offset = index * 4;
        OamEntry {
            y: self.oam[offset],
            x: self.oam[offset + 1],
            tile: self.oam[offset + 2],
            flags: self.oam[offset + 3],
        }
    }
}
