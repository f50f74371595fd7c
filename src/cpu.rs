//! CPU contract
//!
//! The instruction engine is not part of this crate. The orchestrator only
//! needs three things from it, captured by [`Processor`]; any Sharp LR35902
//! core that implements them can be dropped into an
//! [`Emulator`](crate::emu::Emulator).

use crate::bus::Bus;
use crate::interrupts::Interrupt;

/// Instruction engine driven by the orchestrator
pub trait Processor {
    /// Execute one instruction (or one halted idle period) and return the
    /// number of T-cycles it took.
    fn step(&mut self, bus: &mut Bus) -> u32;

    /// Offer an interrupt line whose IE and IF bits are both set.
    ///
    /// The implementation decides, from its master enable, whether to
    /// service it: push PC, clear the IF bit, jump to
    /// [`Interrupt::vector`] and drop the master enable. It is also the
    /// place to leave HALT.
    fn vector_interrupt(&mut self, interrupt: Interrupt, bus: &mut Bus);

    /// Advance the delayed `EI` latch by one instruction boundary; see
    /// [`ImeLatch`](crate::interrupts::ImeLatch).
    fn update_deferred_enable(&mut self);
}
