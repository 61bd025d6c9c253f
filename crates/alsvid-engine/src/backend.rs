//! Backend trait: the terminal sink of a chain.

use alsvid_ir::Instruction;

use crate::error::EngineResult;

/// The terminal stage of an engine chain.
///
/// A backend gives instructions their real effect — execution, simulation,
/// or display. The chain guarantees that every instruction a backend
/// receives is one its `is_available` accepts.
///
/// # Contract
///
/// - `is_available` MUST be a pure function of the instruction's fields:
///   it is called speculatively by upstream stages and must not have
///   observable side effects.
/// - `receive` processes a batch in order. A `Flush` instruction is a hard
///   synchronization point: when `receive` returns, every instruction
///   submitted before the barrier must have had its backend-visible effect
///   (e.g. measurement results are readable).
/// - Classical instructions (`Allocate`, `Deallocate`, `Measure`, `Flush`)
///   MUST be accepted by every backend.
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Report whether this backend natively accepts `instruction`.
    fn is_available(&self, instruction: &Instruction) -> bool;

    /// Consume a batch of instructions, in order.
    fn receive(&mut self, batch: &[Instruction]) -> EngineResult<()>;
}
