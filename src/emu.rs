//! Emulator Core
//!
//! The orchestrator that advances the CPU, timer, PPU and input latch in
//! lockstep and dispatches interrupts after every CPU step.
//!
//! A host calls [`Emulator::tick`] at the display refresh rate, then
//! [`Emulator::commit_frame`] to publish the pixels drawn so far.

use crate::bus::Bus;
use crate::cart::{Cartridge, CartridgeError};
use crate::cpu::Processor;
use crate::display::{FrameBuffer, PixelSink};
use crate::gamepad::{Button, Gamepad};
use crate::interrupts;
use crate::ppu::Ppu;
use crate::timer::Timer;

/// DMG master clock in Hz
pub const CLOCK_HZ: u64 = 4_194_304;

/// DMG display refresh rate in Hz
pub const REFRESH_HZ: f64 = 59.7275;

/// Fixed-point scale applied to the refresh rate
const RATE_SCALE: f64 = 10_000.0;

/// Emulator timing configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmulatorConfig {
    /// CPU clock in Hz
    pub clock_hz: u64,
    /// Host tick rate in Hz
    pub refresh_hz: f64,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            clock_hz: CLOCK_HZ,
            refresh_hz: REFRESH_HZ,
        }
    }
}

impl EmulatorConfig {
    /// T-cycles emulated per tick
    pub fn cycles_per_tick(&self) -> f64 {
        self.clock_hz as f64 / self.refresh_hz
    }

    /// Per-tick budget as an exact fraction `(numerator, denominator)`
    fn budget(&self) -> (i64, i64) {
        let denominator = ((self.refresh_hz * RATE_SCALE).round() as i64).max(1);
        let numerator = self.clock_hz as i64 * RATE_SCALE as i64;
        (numerator, denominator)
    }
}

/// Main Emulator structure
pub struct Emulator<C: Processor, S: PixelSink = FrameBuffer> {
    /// Instruction engine
    cpu: C,
    /// PPU
    ppu: Ppu,
    /// Timer
    timer: Timer,
    /// Gamepad
    gamepad: Gamepad,
    /// Memory bus (includes cartridge and I/O registers)
    bus: Bus,
    /// Pixel destination
    sink: S,
    config: EmulatorConfig,
    /// Cycle credit scaled by the budget denominator
    credit: i64,
    /// Completed frames
    frames: u64,
    /// Total T-cycles executed
    cycles: u64,
}

impl<C: Processor> Emulator<C, FrameBuffer> {
    /// Build an emulator around a cartridge image, drawing into a
    /// [`FrameBuffer`]
    pub fn with_rom(cpu: C, rom: Vec<u8>) -> Result<Self, CartridgeError> {
        Self::from_rom(cpu, rom, FrameBuffer::new(), EmulatorConfig::default())
    }
}

impl<C: Processor, S: PixelSink> Emulator<C, S> {
    /// Assemble an emulator from an already populated bus
    pub fn new(cpu: C, bus: Bus, sink: S, config: EmulatorConfig) -> Self {
        Self {
            cpu,
            ppu: Ppu::new(),
            timer: Timer::new(),
            gamepad: Gamepad::new(),
            bus,
            sink,
            config,
            credit: 0,
            frames: 0,
            cycles: 0,
        }
    }

    /// Load a cartridge image and assemble an emulator around it
    ///
    /// Fails before anything is built if the image is rejected.
    pub fn from_rom(
        cpu: C,
        rom: Vec<u8>,
        sink: S,
        config: EmulatorConfig,
    ) -> Result<Self, CartridgeError> {
        let cart = Cartridge::from_bytes(rom)?;
        Ok(Self::new(cpu, Bus::with_cartridge(cart), sink, config))
    }

    /// Run one host tick worth of cycles
    ///
    /// Surplus or deficit against the budget carries into the next call.
    /// Returns `true` if at least one frame completed.
    pub fn tick(&mut self) -> bool {
        let (numerator, denominator) = self.config.budget();
        let mut frame_done = false;

        self.credit += numerator;
        while self.credit > 0 {
            let (cycles, done) = self.run_step();
            // A zero-cycle step still consumes credit
            self.credit -= cycles.max(1) as i64 * denominator;
            frame_done |= done;
        }
        frame_done
    }

    /// Run a single CPU step and everything that follows it
    ///
    /// Returns the number of T-cycles the step took.
    pub fn step(&mut self) -> u32 {
        self.run_step().0
    }

    fn run_step(&mut self) -> (u32, bool) {
        let cycles = self.cpu.step(&mut self.bus);

        self.timer.advance(cycles, &mut self.bus.io);
        let frame_done = self.ppu.advance(
            cycles,
            &mut self.bus.io,
            &self.bus.video,
            &mut self.sink,
        );
        self.gamepad.advance(&mut self.bus.io);
        interrupts::dispatch(&mut self.cpu, &mut self.bus);

        self.cycles += cycles as u64;
        if frame_done {
            self.frames += 1;
        }
        (cycles, frame_done)
    }

    /// Publish the pixels drawn so far as a finished frame
    pub fn commit_frame(&mut self) {
        self.sink.commit_frame();
    }

    /// Record a key transition; visible to the CPU after the next step
    pub fn report_key(&mut self, button: Button, pressed: bool) {
        self.gamepad.report_key(button, pressed);
    }

    /// Completed frames since power-on
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// T-cycles executed since power-on
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    pub fn cpu(&self) -> &C {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut C {
        &mut self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    pub fn gamepad(&self) -> &Gamepad {
        &self.gamepad
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
