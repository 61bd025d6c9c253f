//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors raised when constructing malformed instructions.
///
/// All of these are reported at construction time, before the instruction
/// ever enters a chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Instruction has no target qubits.
    #[error("instruction '{gate}' has no target qubits")]
    EmptyTargets {
        /// Name of the gate.
        gate: String,
    },

    /// Gate requires a different number of target qubits.
    #[error("gate '{gate}' expects {expected} target qubit(s), got {got}")]
    ArityMismatch {
        /// Name of the gate.
        gate: String,
        /// Expected number of target qubits.
        expected: u32,
        /// Actual number of target qubits provided.
        got: u32,
    },

    /// The same qubit handle appears twice in one instruction.
    #[error("duplicate qubit {qubit} in instruction '{gate}'")]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Name of the gate.
        gate: String,
    },

    /// A control qubit overlaps a target qubit.
    #[error("control qubit {qubit} overlaps a target of instruction '{gate}'")]
    ControlTargetOverlap {
        /// The overlapping qubit.
        qubit: QubitId,
        /// Name of the gate.
        gate: String,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
