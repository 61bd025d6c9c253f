//! Alsvid Instruction-Stream Intermediate Representation
//!
//! This crate provides the value types that flow through an Alsvid engine
//! chain: gates, qubit handles and registers, instructions, and metadata
//! tags. It is the foundation the `alsvid-engine` pipeline is built on.
//!
//! # Overview
//!
//! Programs are streams of [`Instruction`] values. An instruction is one
//! gate application — a [`Gate`] plus its target [`Register`]s, optional
//! control [`QubitId`]s and a set of [`Tag`] markers — or one of the
//! classical lifecycle kinds (`Allocate`, `Deallocate`, `Measure`,
//! `Flush`). Structural invariants are enforced at construction: an
//! instruction with overlapping control and target handles, a missing
//! target, or the wrong operand arity never exists as a value.
//!
//! # Example
//!
//! ```rust
//! use alsvid_ir::{Gate, Instruction, QubitId, Register};
//!
//! // CX: Pauli-X on q1, controlled on q0.
//! let cx = Instruction::controlled(Gate::X, [QubitId(0)], QubitId(1)).unwrap();
//! assert_eq!(cx.control_count(), 1);
//! assert_eq!(format!("{cx}"), "x q1 ctrl[q0]");
//!
//! // Controls may never overlap targets.
//! assert!(Instruction::controlled(Gate::X, [QubitId(1)], QubitId(1)).is_err());
//!
//! // Register-sized gates take a whole register as one operand.
//! let reg = Register::new([QubitId(0), QubitId(1), QubitId(2)]);
//! let qft = Instruction::gate(Gate::Qft, reg).unwrap();
//! assert_eq!(qft.target_qubit_count(), 3);
//! ```
//!
//! # Gate equality
//!
//! Two gates are equal iff kind and parameters match under the kind's own
//! equality rule: axis rotations compare modulo 4π, phase gates modulo 2π,
//! so e.g. `Rx(0)` and `Rx(4π)` are the same gate.

pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;
pub mod tag;

pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, GateClass};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{QubitId, Register};
pub use tag::Tag;
