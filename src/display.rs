//! Display
//!
//! The pixel sink the PPU draws into. The PPU only ever writes 2-bit color
//! indices; turning them into host colors happens once per frame in
//! [`PixelSink::commit_frame`].

/// Screen dimensions
pub const SCREEN_WIDTH: usize = 160;
pub const SCREEN_HEIGHT: usize = 144;

/// Fixed output palette (ARGB): white, light gray, dark gray, black
pub const PALETTE: [u32; 4] = [0xFFFFFFFF, 0xFF808080, 0xFF404040, 0xFF000000];

/// Destination for rasterized color indices
pub trait PixelSink {
    /// Store a color index (0-3) at a screen position
    fn set_pixel(&mut self, x: usize, y: usize, color: u8);

    /// Color index currently stored at a screen position
    fn get_pixel(&self, x: usize, y: usize) -> u8;

    /// Publish the current indices as a finished frame
    fn commit_frame(&mut self);
}

/// In-memory pixel sink: an index plane plus the last committed ARGB frame
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    indices: Vec<u8>,
    output: Vec<u32>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            indices: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT],
            output: vec![PALETTE[0]; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }

    /// Last committed frame, row-major ARGB
    pub fn frame(&self) -> &[u32] {
        &self.output
    }

    /// Current (uncommitted) index plane, row-major
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }
}

impl PixelSink for FrameBuffer {
    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: u8) {
        debug_assert!(x < SCREEN_WIDTH && y < SCREEN_HEIGHT);
        self.indices[y * SCREEN_WIDTH + x] = color & 0x03;
    }

    #[inline]
    fn get_pixel(&self, x: usize, y: usize) -> u8 {
        self.indices[y * SCREEN_WIDTH + x]
    }

    fn commit_frame(&mut self) {
        for (out, &index) in self.output.iter_mut().zip(&self.indices) {
            *out = PALETTE[index as usize];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framebuffer_new() {
        let fb = FrameBuffer::new();
        assert_eq!(fb.indices().len(), SCREEN_WIDTH * SCREEN_HEIGHT);
        assert!(fb.frame().iter().all(|&c| c == 0xFFFFFFFF));
    }

    #[test]
    fn test_set_get_pixel() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(0, 0, 3);
        fb.set_pixel(159, 143, 2);
        assert_eq!(fb.get_pixel(0, 0), 3);
        assert_eq!(fb.get_pixel(159, 143), 2);
        assert_eq!(fb.get_pixel(1, 0), 0);
    }

    #[test]
    fn test_commit_maps_through_palette() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(0, 0, 0);
        fb.set_pixel(1, 0, 1);
        fb.set_pixel(2, 0, 2);
        fb.set_pixel(3, 0, 3);

        // Nothing is visible until the frame is committed.
        assert_eq!(fb.frame()[3], 0xFFFFFFFF);

        fb.commit_frame();
        assert_eq!(&fb.frame()[..4], &[0xFFFFFFFF, 0xFF808080, 0xFF404040, 0xFF000000]);
    }
}
