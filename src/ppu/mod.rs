//! PPU Module
//!
//! Timing state machine of the Pixel Processing Unit. The PPU walks each
//! visible line through OAM scan, pixel transfer and HBlank, then spends ten
//! lines in VBlank. Mode thresholds are fixed; when one is reached its length
//! is subtracted from the counter so surplus cycles carry into the next mode.

pub mod memory;
pub mod modes;
pub mod scanline;

use crate::display::PixelSink;
use crate::interrupts::Interrupt;
use crate::io::IoRegisters;
use memory::VideoMemory;
use modes::{
    PpuMode, HBLANK_CYCLES, LAST_LINE, OAM_CYCLES, SCANLINE_CYCLES, VBLANK_START_LINE,
    VRAM_CYCLES,
};

/// Pixel Processing Unit
#[derive(Debug, Clone)]
pub struct Ppu {
    /// Cycles spent in the current mode
    counter: u32,
    /// LY == LYC as of the previous advance
    coincidence: bool,
    /// Display enable as of the previous advance
    display_on: bool,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    pub fn new() -> Self {
        Self {
            counter: 0,
            coincidence: false,
            display_on: true,
        }
    }

    /// Cycles accumulated in the current mode
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Advance by `cycles` T-cycles
    ///
    /// Returns `true` if a frame was completed (VBlank entered) during this
    /// call.
    pub fn advance<S: PixelSink>(
        &mut self,
        cycles: u32,
        io: &mut IoRegisters,
        video: &VideoMemory,
        sink: &mut S,
    ) -> bool {
        let mut frame_done = false;

        if io.lcd_enabled() {
            if !self.display_on {
                log::debug!("LCD enabled");
                self.display_on = true;
                io.set_mode(PpuMode::OamScan);
            }
            self.counter += cycles;
            while self.step_mode(io, video, sink, &mut frame_done) {}
        } else {
            if self.display_on {
                log::debug!("LCD disabled");
                self.display_on = false;
            }
            self.counter = 0;
            io.ly = 0;
            io.set_mode(PpuMode::HBlank);
        }

        self.compare_ly(io);
        frame_done
    }

    /// Leave the current mode if its threshold has been reached
    ///
    /// Returns `true` if a transition happened.
    fn step_mode<S: PixelSink>(
        &mut self,
        io: &mut IoRegisters,
        video: &VideoMemory,
        sink: &mut S,
        frame_done: &mut bool,
    ) -> bool {
        match io.mode() {
            PpuMode::OamScan => {
                if self.counter < OAM_CYCLES {
                    return false;
                }
                self.counter -= OAM_CYCLES;
                io.set_mode(PpuMode::Transfer);
            }
            PpuMode::Transfer => {
                if self.counter < VRAM_CYCLES {
                    return false;
                }
                self.counter -= VRAM_CYCLES;
                scanline::render_scanline(io, video, sink);
                io.set_mode(PpuMode::HBlank);
                if io.hblank_int_enabled() {
                    io.request_interrupt(Interrupt::LcdStat);
                }
            }
            PpuMode::HBlank => {
                if self.counter < HBLANK_CYCLES {
                    return false;
                }
                self.counter -= HBLANK_CYCLES;
                io.ly += 1;
                if io.ly == VBLANK_START_LINE {
                    io.set_mode(PpuMode::VBlank);
                    io.request_interrupt(Interrupt::VBlank);
                    if io.vblank_int_enabled() {
                        io.request_interrupt(Interrupt::LcdStat);
                    }
                    log::trace!("Frame complete");
                    *frame_done = true;
                } else {
                    self.enter_oam(io);
                }
            }
            PpuMode::VBlank => {
                if self.counter < SCANLINE_CYCLES {
                    return false;
                }
                self.counter -= SCANLINE_CYCLES;
                if io.ly == LAST_LINE {
                    io.ly = 0;
                    self.enter_oam(io);
                } else {
                    io.ly += 1;
                }
            }
        }
        true
    }

    fn enter_oam(&self, io: &mut IoRegisters) {
        io.set_mode(PpuMode::OamScan);
        if io.oam_int_enabled() {
            io.request_interrupt(Interrupt::LcdStat);
        }
    }

    /// Update the coincidence flag; request LCD STAT on its rising edge
    fn compare_ly(&mut self, io: &mut IoRegisters) {
        let coincidence = io.ly == io.lyc;
        io.set_lyc_flag(coincidence);
        if coincidence && !self.coincidence && io.lyc_int_enabled() {
            io.request_interrupt(Interrupt::LcdStat);
        }
        self.coincidence = coincidence;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{FrameBuffer, SCREEN_WIDTH};
    use proptest::prelude::*;

    struct Machine {
        ppu: Ppu,
        io: IoRegisters,
        video: VideoMemory,
        sink: FrameBuffer,
    }

    impl Machine {
        fn new() -> Self {
            let mut io = IoRegisters::new();
            // Keep the coincidence flag out of the way unless a test wants it
            io.lyc = 0xFF;
            Self {
                ppu: Ppu::new(),
                io,
                video: VideoMemory::new(),
                sink: FrameBuffer::new(),
            }
        }

        fn advance(&mut self, cycles: u32) -> bool {
            self.ppu
                .advance(cycles, &mut self.io, &self.video, &mut self.sink)
        }

        fn requested(&self, interrupt: Interrupt) -> bool {
            self.io.int_flags & interrupt.bit() != 0
        }
    }

    #[test]
    fn test_power_on_state() {
        let m = Machine::new();
        assert_eq!(m.io.mode(), PpuMode::OamScan);
        assert_eq!(m.io.ly, 0);
        assert_eq!(m.ppu.counter(), 0);
    }

    #[test]
    fn test_visible_line_modes_sum_to_456() {
        let mut m = Machine::new();
        m.advance(OAM_CYCLES - 1);
        assert_eq!(m.io.mode(), PpuMode::OamScan);
        m.advance(1);
        assert_eq!(m.io.mode(), PpuMode::Transfer);

        m.advance(VRAM_CYCLES);
        assert_eq!(m.io.mode(), PpuMode::HBlank);
        assert_eq!(m.io.ly, 0);

        m.advance(HBLANK_CYCLES - 1);
        assert_eq!(m.io.mode(), PpuMode::HBlank);
        assert_eq!(m.io.ly, 0);
        m.advance(1);
        assert_eq!(m.io.mode(), PpuMode::OamScan);
        assert_eq!(m.io.ly, 1);
    }

    #[test]
    fn test_surplus_cycles_carry() {
        let mut m = Machine::new();
        m.advance(100);
        assert_eq!(m.io.mode(), PpuMode::Transfer);
        assert_eq!(m.ppu.counter(), 20);

        m.advance(152);
        assert_eq!(m.io.mode(), PpuMode::HBlank);
        assert_eq!(m.ppu.counter(), 0);

        // One call may cross several modes
        m.advance(SCANLINE_CYCLES + 10);
        assert_eq!(m.io.ly, 1);
        assert_eq!(m.io.mode(), PpuMode::HBlank);
        assert_eq!(m.ppu.counter(), 10);
    }

    #[test]
    fn test_hblank_expiry_increments_ly() {
        let mut m = Machine::new();
        for line in 0..VBLANK_START_LINE {
            assert_eq!(m.io.ly, line);
            m.advance(SCANLINE_CYCLES);
        }
        assert_eq!(m.io.ly, VBLANK_START_LINE);
    }

    #[test]
    fn test_single_vblank_request_per_frame() {
        let mut m = Machine::new();
        let mut frames = 0;
        let mut requests = 0;
        for _ in 0..154 * 4 {
            m.io.int_flags = 0;
            if m.advance(SCANLINE_CYCLES / 4) {
                frames += 1;
            }
            if m.requested(Interrupt::VBlank) {
                requests += 1;
                assert_eq!(m.io.ly, VBLANK_START_LINE);
                assert_eq!(m.io.mode(), PpuMode::VBlank);
            }
        }
        assert_eq!(frames, 1);
        assert_eq!(requests, 1);
    }

    #[test]
    fn test_vblank_spans_ten_lines() {
        let mut m = Machine::new();
        m.advance(SCANLINE_CYCLES * VBLANK_START_LINE as u32);
        assert_eq!(m.io.mode(), PpuMode::VBlank);
        assert_eq!(m.io.ly, 144);

        m.advance(SCANLINE_CYCLES * 9);
        assert_eq!(m.io.mode(), PpuMode::VBlank);
        assert_eq!(m.io.ly, LAST_LINE);

        m.advance(SCANLINE_CYCLES - 1);
        assert_eq!(m.io.mode(), PpuMode::VBlank);
        m.advance(1);
        assert_eq!(m.io.mode(), PpuMode::OamScan);
        assert_eq!(m.io.ly, 0);
    }

    #[test]
    fn test_full_frame_length() {
        let mut m = Machine::new();
        assert!(m.advance(SCANLINE_CYCLES * 144));
        assert!(!m.advance(SCANLINE_CYCLES * 10 - 1));
        m.advance(1);
        assert_eq!(m.io.ly, 0);
        assert_eq!(m.io.mode(), PpuMode::OamScan);
        assert!(m.advance(SCANLINE_CYCLES * 144));
    }

    #[test]
    fn test_stat_mode_interrupts() {
        let mut m = Machine::new();
        m.io.stat |= 0x08;
        m.advance(OAM_CYCLES + VRAM_CYCLES);
        assert!(m.requested(Interrupt::LcdStat));

        m.io.int_flags = 0;
        m.io.stat = (m.io.stat & !0x08) | 0x20;
        m.advance(HBLANK_CYCLES);
        assert!(m.requested(Interrupt::LcdStat));

        m.io.int_flags = 0;
        m.io.stat &= !0x20;
        m.advance(SCANLINE_CYCLES);
        assert!(!m.requested(Interrupt::LcdStat));
    }

    #[test]
    fn test_vblank_stat_interrupt() {
        let mut m = Machine::new();
        m.io.stat |= 0x10;
        m.advance(SCANLINE_CYCLES * 143);
        assert!(!m.requested(Interrupt::LcdStat));
        m.advance(SCANLINE_CYCLES);
        assert!(m.requested(Interrupt::LcdStat));
        assert!(m.requested(Interrupt::VBlank));
    }

    #[test]
    fn test_coincidence_rising_edge() {
        let mut m = Machine::new();
        m.io.lyc = 3;
        m.io.stat |= 0x40;

        m.advance(SCANLINE_CYCLES * 3);
        assert!(m.io.lyc_flag());
        assert!(m.requested(Interrupt::LcdStat));

        // Still on line 3: no second request
        m.io.int_flags = 0;
        m.advance(10);
        assert!(m.io.lyc_flag());
        assert!(!m.requested(Interrupt::LcdStat));

        m.advance(SCANLINE_CYCLES);
        assert!(!m.io.lyc_flag());
        assert!(!m.requested(Interrupt::LcdStat));
    }

    #[test]
    fn test_coincidence_without_interrupt_enable() {
        let mut m = Machine::new();
        m.io.lyc = 0;
        m.advance(1);
        assert!(m.io.lyc_flag());
        assert!(!m.requested(Interrupt::LcdStat));
    }

    #[test]
    fn test_scanline_drawn_on_hblank_entry() {
        let mut m = Machine::new();
        m.io.bgp = 0xE4;
        for row in 0..8 {
            m.video.vram[row * 2] = 0xFF;
            m.video.vram[row * 2 + 1] = 0xFF;
        }

        m.advance(OAM_CYCLES + VRAM_CYCLES - 1);
        assert_eq!(m.sink.get_pixel(0, 0), 0);
        m.advance(1);
        assert!((0..SCREEN_WIDTH).all(|x| m.sink.get_pixel(x, 0) == 3));
        assert_eq!(m.sink.get_pixel(0, 1), 0);
    }

    #[test]
    fn test_display_off_resets() {
        let mut m = Machine::new();
        m.io.bgp = 0xE4;
        m.video.vram[0] = 0xFF;
        m.advance(SCANLINE_CYCLES * 5 + 100);
        assert_eq!(m.io.ly, 5);

        m.io.lcdc &= !0x80;
        assert!(!m.advance(OAM_CYCLES + VRAM_CYCLES));
        assert_eq!(m.io.ly, 0);
        assert_eq!(m.ppu.counter(), 0);
        assert_eq!(m.io.mode(), PpuMode::HBlank);
        assert_eq!(m.io.stat & 0x03, 0);

        // Nothing is drawn while off
        let before = m.sink.indices().to_vec();
        m.video.vram[0] = 0x00;
        m.advance(SCANLINE_CYCLES * 200);
        assert_eq!(m.io.ly, 0);
        assert_eq!(m.sink.indices(), &before[..]);
    }

    #[test]
    fn test_display_off_tracks_coincidence() {
        let mut m = Machine::new();
        m.io.lcdc &= !0x80;
        m.io.lyc = 0;
        m.io.stat |= 0x40;
        m.advance(4);
        assert!(m.io.lyc_flag());
        assert!(m.requested(Interrupt::LcdStat));
    }

    #[test]
    fn test_display_reenable_starts_line_zero() {
        let mut m = Machine::new();
        m.advance(SCANLINE_CYCLES * 50);
        m.io.lcdc &= !0x80;
        m.advance(4);

        m.io.lcdc |= 0x80;
        m.advance(OAM_CYCLES);
        assert_eq!(m.io.ly, 0);
        assert_eq!(m.io.mode(), PpuMode::Transfer);
    }

    proptest! {
        #[test]
        fn prop_coincidence_flag_tracks_ly(
            lyc in 0u8..160,
            steps in proptest::collection::vec(0u32..1200, 1..200),
        ) {
            let mut m = Machine::new();
            m.io.lyc = lyc;
            for cycles in steps {
                m.advance(cycles);
                prop_assert_eq!(m.io.lyc_flag(), m.io.ly == m.io.lyc);
                prop_assert!(m.io.ly <= LAST_LINE);
            }
        }
    }
}
