//! Error types for the engine crate.

use alsvid_ir::{IrError, QubitId};
use std::fmt;
use thiserror::Error;

/// Why a qubit handle reference is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidHandleReason {
    /// The handle was never minted by this pipeline.
    NeverAllocated,
    /// The handle has already been deallocated.
    Deallocated,
}

impl fmt::Display for InvalidHandleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidHandleReason::NeverAllocated => write!(f, "never allocated"),
            InvalidHandleReason::Deallocated => write!(f, "already deallocated"),
        }
    }
}

/// Errors raised while instructions flow through a chain.
///
/// Every error is reported synchronously to the caller of the client-facing
/// operation that triggered it; the chain itself stays usable afterwards.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// A referenced qubit handle is not currently live.
    #[error("invalid use of qubit handle {qubit}: {reason}")]
    InvalidHandle {
        /// The offending handle.
        qubit: QubitId,
        /// Why the handle is invalid.
        reason: InvalidHandleReason,
    },

    /// No decomposition rule matches an unsupported instruction.
    #[error("no decomposition rule matches gate '{gate}' (instruction: {instruction})")]
    DecompositionExhausted {
        /// Name of the gate that blocked.
        gate: String,
        /// Rendered form of the blocking instruction.
        instruction: String,
    },

    /// Rule application exceeded the recursion bound without producing
    /// supported instructions — a rule-set defect, distinct from a missing
    /// rule.
    #[error("decomposition of gate '{gate}' did not converge within depth {depth}")]
    DecompositionNotConverged {
        /// Name of the gate still unsupported at the bound.
        gate: String,
        /// The depth bound that was exceeded.
        depth: usize,
    },

    /// A stage rejected an instruction and no upstream stage intercepted it.
    #[error("stage '{stage}' rejected instruction: {instruction}")]
    Unsupported {
        /// Name of the rejecting stage.
        stage: String,
        /// Rendered form of the rejected instruction.
        instruction: String,
    },

    /// The terminal backend failed to consume an instruction.
    #[error("backend '{backend}' failed: {message}")]
    Backend {
        /// Name of the backend.
        backend: String,
        /// What went wrong.
        message: String,
    },

    /// A malformed instruction was produced during rewriting.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
