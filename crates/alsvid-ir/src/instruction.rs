//! Instructions combining gates with operands, controls and tags.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::qubit::{QubitId, Register};
use crate::tag::Tag;

/// The kind of instruction flowing through a chain.
///
/// The classical kinds (`Allocate`, `Deallocate`, `Measure`, `Flush`) are a
/// distinguished subset: they pass every instruction filter and are never
/// subject to decomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A quantum gate application.
    Gate(Gate),
    /// Bind a fresh qubit handle.
    Allocate,
    /// Release a qubit handle.
    Deallocate,
    /// Measurement.
    Measure,
    /// Synchronization barrier.
    Flush,
}

/// An immutable value representing one operation in the instruction stream.
///
/// Construction validates the structural invariants — non-empty targets,
/// arity, no duplicate handles, control/target disjointness — so a malformed
/// instruction is rejected before it enters any chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    kind: InstructionKind,
    targets: Vec<Register>,
    controls: Vec<QubitId>,
    tags: Vec<Tag>,
}

impl Instruction {
    /// Create a gate instruction with a single target register.
    pub fn gate(gate: Gate, target: impl Into<Register>) -> IrResult<Self> {
        Self::gate_multi(gate, vec![target.into()])
    }

    /// Create a gate instruction over multiple target registers.
    pub fn gate_multi(gate: Gate, targets: Vec<Register>) -> IrResult<Self> {
        let name = gate.name().to_string();
        if targets.is_empty() || targets.iter().any(Register::is_empty) {
            return Err(IrError::EmptyTargets { gate: name });
        }
        let total: u32 = targets.iter().map(|r| r.len() as u32).sum();
        if let Some(expected) = gate.fixed_arity() {
            if expected != total {
                return Err(IrError::ArityMismatch {
                    gate: name,
                    expected,
                    got: total,
                });
            }
        }
        let mut seen = FxHashSet::default();
        for q in targets.iter().flat_map(Register::iter) {
            if !seen.insert(q) {
                return Err(IrError::DuplicateQubit { qubit: q, gate: name });
            }
        }
        Ok(Self {
            kind: InstructionKind::Gate(gate),
            targets,
            controls: vec![],
            tags: vec![],
        })
    }

    /// Create a controlled gate instruction.
    pub fn controlled(
        gate: Gate,
        controls: impl IntoIterator<Item = QubitId>,
        target: impl Into<Register>,
    ) -> IrResult<Self> {
        Self::gate(gate, target)?.with_controls(controls)
    }

    /// Create an `Allocate` instruction for a handle.
    pub fn allocate(qubit: QubitId) -> Self {
        Self::classical(InstructionKind::Allocate, qubit)
    }

    /// Create a `Deallocate` instruction for a handle.
    pub fn deallocate(qubit: QubitId) -> Self {
        Self::classical(InstructionKind::Deallocate, qubit)
    }

    /// Create a `Measure` instruction for a handle.
    pub fn measure(qubit: QubitId) -> Self {
        Self::classical(InstructionKind::Measure, qubit)
    }

    /// Create a `Flush` barrier instruction.
    pub fn flush() -> Self {
        Self {
            kind: InstructionKind::Flush,
            targets: vec![],
            controls: vec![],
            tags: vec![],
        }
    }

    fn classical(kind: InstructionKind, qubit: QubitId) -> Self {
        Self {
            kind,
            targets: vec![Register::single(qubit)],
            controls: vec![],
            tags: vec![],
        }
    }

    /// Add control qubits, validating disjointness from the targets.
    pub fn with_controls(
        mut self,
        controls: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<Self> {
        for qubit in controls {
            if self.targets.iter().any(|r| r.contains(qubit)) {
                return Err(IrError::ControlTargetOverlap {
                    qubit,
                    gate: self.name().to_string(),
                });
            }
            if self.controls.contains(&qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate: self.name().to_string(),
                });
            }
            self.controls.push(qubit);
        }
        Ok(self)
    }

    /// Attach a tag. Tags form an unordered set; inserting a tag that is
    /// already present is a no-op.
    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Inherit every tag of `source` that this instruction does not already
    /// carry. Used by decomposition to propagate markers onto replacements.
    #[must_use]
    pub fn with_inherited_tags(mut self, source: &Instruction) -> Self {
        for tag in &source.tags {
            if !self.tags.contains(tag) {
                self.tags.push(tag.clone());
            }
        }
        self
    }

    /// The kind of this instruction.
    pub fn kind(&self) -> &InstructionKind {
        &self.kind
    }

    /// Get the gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Target registers, in operand order.
    pub fn targets(&self) -> &[Register] {
        &self.targets
    }

    /// Control qubits, in the order they were attached.
    pub fn controls(&self) -> &[QubitId] {
        &self.controls
    }

    /// Tags attached to this instruction.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Check whether this instruction carries `tag`.
    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    /// Check if this is one of the classical kinds (`Allocate`,
    /// `Deallocate`, `Measure`, `Flush`).
    pub fn is_classical(&self) -> bool {
        !matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a `Flush` barrier.
    pub fn is_flush(&self) -> bool {
        matches!(self.kind, InstructionKind::Flush)
    }

    /// Check if this is an `Allocate`.
    pub fn is_allocate(&self) -> bool {
        matches!(self.kind, InstructionKind::Allocate)
    }

    /// Check if this is a `Deallocate`.
    pub fn is_deallocate(&self) -> bool {
        matches!(self.kind, InstructionKind::Deallocate)
    }

    /// Check if this is a `Measure`.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Total number of target qubits across all target registers.
    pub fn target_qubit_count(&self) -> usize {
        self.targets.iter().map(Register::len).sum()
    }

    /// Number of control qubits.
    pub fn control_count(&self) -> usize {
        self.controls.len()
    }

    /// Iterate over every qubit handle this instruction references:
    /// target qubits in operand order, then controls.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.targets
            .iter()
            .flat_map(Register::iter)
            .chain(self.controls.iter().copied())
    }

    /// Check whether this instruction references `qubit`.
    pub fn references(&self, qubit: QubitId) -> bool {
        self.qubits().any(|q| q == qubit)
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Allocate => "allocate",
            InstructionKind::Deallocate => "deallocate",
            InstructionKind::Measure => "measure",
            InstructionKind::Flush => "flush",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            InstructionKind::Gate(g) => write!(f, "{g}")?,
            InstructionKind::Allocate => write!(f, "allocate")?,
            InstructionKind::Deallocate => write!(f, "deallocate")?,
            InstructionKind::Measure => write!(f, "measure")?,
            InstructionKind::Flush => write!(f, "flush")?,
        }
        for target in &self.targets {
            write!(f, " {target}")?;
        }
        if !self.controls.is_empty() {
            write!(f, " ctrl[")?;
            for (i, c) in self.controls.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{c}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::CustomGate;
    use std::f64::consts::PI;

    #[test]
    fn test_gate_instruction() {
        let inst = Instruction::gate(Gate::H, QubitId(0)).unwrap();
        assert!(!inst.is_classical());
        assert_eq!(inst.name(), "h");
        assert_eq!(inst.target_qubit_count(), 1);
        assert_eq!(inst.control_count(), 0);
    }

    #[test]
    fn test_empty_targets_rejected() {
        let err = Instruction::gate_multi(Gate::Qft, vec![]).unwrap_err();
        assert_eq!(
            err,
            IrError::EmptyTargets {
                gate: "qft".to_string()
            }
        );

        let err = Instruction::gate_multi(Gate::Qft, vec![Register::new([])]).unwrap_err();
        assert!(matches!(err, IrError::EmptyTargets { .. }));
    }

    #[test]
    fn test_arity_mismatch_rejected() {
        let reg = Register::new([QubitId(0), QubitId(1)]);
        let err = Instruction::gate(Gate::H, reg).unwrap_err();
        assert_eq!(
            err,
            IrError::ArityMismatch {
                gate: "h".to_string(),
                expected: 1,
                got: 2,
            }
        );
    }

    #[test]
    fn test_duplicate_target_rejected() {
        let reg = Register::new([QubitId(3), QubitId(3)]);
        let err = Instruction::gate(Gate::Swap, reg).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { qubit: QubitId(3), .. }));
    }

    #[test]
    fn test_control_target_overlap_rejected() {
        let err = Instruction::controlled(Gate::X, [QubitId(1)], QubitId(1)).unwrap_err();
        assert!(matches!(
            err,
            IrError::ControlTargetOverlap { qubit: QubitId(1), .. }
        ));
    }

    #[test]
    fn test_controlled_instruction() {
        let cx = Instruction::controlled(Gate::X, [QubitId(0)], QubitId(1)).unwrap();
        assert_eq!(cx.control_count(), 1);
        assert_eq!(cx.target_qubit_count(), 1);
        assert_eq!(cx.qubits().collect::<Vec<_>>(), vec![QubitId(1), QubitId(0)]);
    }

    #[test]
    fn test_classical_instructions() {
        assert!(Instruction::allocate(QubitId(0)).is_classical());
        assert!(Instruction::deallocate(QubitId(0)).is_classical());
        assert!(Instruction::measure(QubitId(0)).is_classical());
        assert!(Instruction::flush().is_classical());
        assert!(Instruction::flush().is_flush());
        assert_eq!(Instruction::flush().target_qubit_count(), 0);
    }

    #[test]
    fn test_tags_are_a_set() {
        let inst = Instruction::gate(Gate::H, QubitId(0))
            .unwrap()
            .with_tag(Tag::Compute)
            .with_tag(Tag::Compute)
            .with_tag(Tag::custom("loop-body"));
        assert_eq!(inst.tags().len(), 2);
        assert!(inst.has_tag(&Tag::Compute));
        assert!(inst.has_tag(&Tag::custom("loop-body")));
    }

    #[test]
    fn test_tag_inheritance() {
        let parent = Instruction::gate(Gate::Qft, Register::new([QubitId(0), QubitId(1)]))
            .unwrap()
            .with_tag(Tag::Uncompute);
        let child = Instruction::gate(Gate::H, QubitId(0))
            .unwrap()
            .with_tag(Tag::custom("expanded"))
            .with_inherited_tags(&parent);
        assert!(child.has_tag(&Tag::Uncompute));
        assert!(child.has_tag(&Tag::custom("expanded")));
    }

    #[test]
    fn test_display() {
        let cx = Instruction::controlled(Gate::X, [QubitId(0)], QubitId(2)).unwrap();
        assert_eq!(format!("{cx}"), "x q2 ctrl[q0]");

        let qft =
            Instruction::gate(Gate::Qft, Register::new([QubitId(0), QubitId(1), QubitId(2)]))
                .unwrap();
        assert_eq!(format!("{qft}"), "qft [q0, q1, q2]");

        assert_eq!(format!("{}", Instruction::flush()), "flush");
        assert_eq!(format!("{}", Instruction::allocate(QubitId(4))), "allocate q4");
    }

    #[test]
    fn test_serde_round_trip() {
        let inst = Instruction::controlled(Gate::Rz(PI / 8.0), [QubitId(0)], QubitId(1))
            .unwrap()
            .with_tag(Tag::Compute);
        let json = serde_json::to_string(&inst).unwrap();
        let back: Instruction = serde_json::from_str(&json).unwrap();
        assert_eq!(inst, back);

        let custom = Instruction::gate(
            Gate::Custom(CustomGate::new("oracle").with_params(vec![1.5])),
            Register::new([QubitId(0), QubitId(1)]),
        )
        .unwrap();
        let json = serde_json::to_string(&custom).unwrap();
        let back: Instruction = serde_json::from_str(&json).unwrap();
        assert_eq!(custom, back);
    }
}
