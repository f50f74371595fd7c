//! Scanline rasterizer
//!
//! Draws the line at LY in two passes: background/window first, then
//! sprites on top. Only 2-bit palette-mapped indices reach the sink.

use crate::common::{Byte, Word};
use crate::display::{PixelSink, SCREEN_WIDTH};
use crate::io::IoRegisters;
use crate::lcd::{TILE_DATA_SIGNED, TILE_DATA_UNSIGNED};
use crate::ppu::memory::{VideoMemory, OAM_ENTRIES};

/// Bytes per 8x8 tile
const TILE_BYTES: Word = 16;

/// Render the scanline at LY into the sink
pub fn render_scanline<S: PixelSink>(io: &IoRegisters, video: &VideoMemory, sink: &mut S) {
    render_background(io, video, sink);
    if io.sprites_enabled() {
        render_sprites(io, video, sink);
    }
}

/// Address of a BG/window tile's first byte
#[inline]
pub fn tile_data_address(unsigned: bool, tile: Byte) -> Word {
    if unsigned {
        TILE_DATA_UNSIGNED + tile as Word * TILE_BYTES
    } else {
        // Index 0 lands on 0x9000
        TILE_DATA_SIGNED + ((tile as i8 as i16 + 128) as Word) * TILE_BYTES
    }
}

/// 2-bit color id of column `bit` (7 = leftmost) in a tile row
#[inline]
pub fn color_id(lo: Byte, hi: Byte, bit: u8) -> u8 {
    (((hi >> bit) & 1) << 1) | ((lo >> bit) & 1)
}

fn render_background<S: PixelSink>(io: &IoRegisters, video: &VideoMemory, sink: &mut S) {
    let ly = io.ly;
    let row = ly as usize;

    if !io.bg_window_enabled() {
        let blank = io.bg_color(0);
        for x in 0..SCREEN_WIDTH {
            sink.set_pixel(x, row, blank);
        }
        return;
    }

    let window_line = io.window_enabled() && io.wy <= ly;
    let window_left = io.wx as i32 - 7;
    let unsigned = io.unsigned_tile_data();

    // (map address, fine y) of the planes currently held
    let mut fetched: Option<(Word, u8)> = None;
    let mut lo = 0;
    let mut hi = 0;

    for x in 0..SCREEN_WIDTH {
        let in_window = window_line && x as i32 >= window_left;

        let (map, px, py) = if in_window {
            let wx = (x as i32 - window_left) as u8;
            (io.window_tile_map(), wx, ly - io.wy)
        } else {
            (io.bg_tile_map(), (x as u8).wrapping_add(io.scx), ly.wrapping_add(io.scy))
        };

        let map_address = map + (py as Word / 8) * 32 + px as Word / 8;
        let fine_y = py & 7;

        if fetched != Some((map_address, fine_y)) {
            let tile = video.vram_read(map_address);
            let address = tile_data_address(unsigned, tile) + fine_y as Word * 2;
            lo = video.vram_read(address);
            hi = video.vram_read(address + 1);
            fetched = Some((map_address, fine_y));
        }

        let id = color_id(lo, hi, 7 - (px & 7));
        sink.set_pixel(x, row, io.bg_color(id));
    }
}

fn render_sprites<S: PixelSink>(io: &IoRegisters, video: &VideoMemory, sink: &mut S) {
    let ly = io.ly as i32;
    let row = io.ly as usize;
    let height = io.sprite_height() as i32;
    let bg_color_zero = io.bgp & 0x03;

    // Lower OAM indices are drawn last and win overlaps
    for index in (0..OAM_ENTRIES).rev() {
        let sprite = video.oam_entry(index);
        let top = sprite.screen_y();
        if ly < top || ly >= top + height {
            continue;
        }

        let mut line = ly - top;
        if sprite.y_flip() {
            line = height - 1 - line;
        }

        let tile = if height == 16 { sprite.tile & 0xFE } else { sprite.tile };
        let address = TILE_DATA_UNSIGNED + tile as Word * TILE_BYTES + line as Word * 2;
        let lo = video.vram_read(address);
        let hi = video.vram_read(address + 1);

        for col in 0..8 {
            let x = sprite.screen_x() + col;
            if x < 0 || x >= SCREEN_WIDTH as i32 {
                continue;
            }
            let x = x as usize;

            let bit = if sprite.x_flip() { col as u8 } else { 7 - col as u8 };
            let id = color_id(lo, hi, bit);
            if id == 0 {
                continue;
            }
            if sprite.behind_bg() && sink.get_pixel(x, row) != bg_color_zero {
                continue;
            }

            sink.set_pixel(x, row, io.sprite_color(sprite.palette_number(), id));
        }
    }
}
