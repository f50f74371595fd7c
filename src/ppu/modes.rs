//! PPU Modes
//!
//! Mode numbering as reported in STAT bits 0-1, and the fixed cycle
//! thresholds of each mode.

/// OAM search (mode 2)
pub const OAM_CYCLES: u32 = 80;
/// Pixel transfer (mode 3)
pub const VRAM_CYCLES: u32 = 172;
/// Horizontal blank (mode 0)
pub const HBLANK_CYCLES: u32 = 204;
/// One full scanline, also the length of each VBlank line
pub const SCANLINE_CYCLES: u32 = OAM_CYCLES + VRAM_CYCLES + HBLANK_CYCLES;

/// First scanline of the vertical blank
pub const VBLANK_START_LINE: u8 = 144;
/// Last scanline of the frame
pub const LAST_LINE: u8 = 153;

/// PPU modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PpuMode {
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    Transfer = 3,
}

impl From<u8> for PpuMode {
    fn from(value: u8) -> Self {
        match value & 0x03 {
            0 => PpuMode::HBlank,
            1 => PpuMode::VBlank,
            2 => PpuMode::OamScan,
            _ => PpuMode::Transfer,
        }
    }
}
