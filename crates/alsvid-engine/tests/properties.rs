//! Stream-level properties checked over randomized programs.

mod common;

use common::{accepts_native, demo_rules};

use proptest::prelude::*;

use alsvid_backend::TraceBackend;
use alsvid_engine::{Pipeline, PipelineBuilder};
use alsvid_ir::{Gate, Instruction, QubitId, Register, Tag};

const QUBITS: u32 = 4;

/// One program operation over a 4-qubit register.
#[derive(Debug, Clone)]
enum Op {
    H(u32),
    X(u32),
    T(u32),
    Cx(u32, u32),
    Swap(u32, u32),
}

fn distinct_pair() -> impl Strategy<Value = (u32, u32)> {
    (0..QUBITS, 0..QUBITS - 1).prop_map(|(a, b)| {
        let b = if b >= a { b + 1 } else { b };
        (a, b)
    })
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..QUBITS).prop_map(Op::H),
        (0..QUBITS).prop_map(Op::X),
        (0..QUBITS).prop_map(Op::T),
        distinct_pair().prop_map(|(a, b)| Op::Cx(a, b)),
        distinct_pair().prop_map(|(a, b)| Op::Swap(a, b)),
    ]
}

/// Build the instruction for `op`, tagged with its issuance index so
/// provenance survives decomposition.
fn build(op: &Op, reg: &Register, index: usize) -> Instruction {
    let q = |i: u32| reg.get(i as usize).unwrap();
    let inst = match op {
        Op::H(i) => Instruction::gate(Gate::H, q(*i)).unwrap(),
        Op::X(i) => Instruction::gate(Gate::X, q(*i)).unwrap(),
        Op::T(i) => Instruction::gate(Gate::T, q(*i)).unwrap(),
        Op::Cx(a, b) => Instruction::controlled(Gate::X, [q(*a)], q(*b)).unwrap(),
        Op::Swap(a, b) => {
            Instruction::gate(Gate::Swap, Register::new([q(*a), q(*b)])).unwrap()
        }
    };
    inst.with_tag(Tag::custom(format!("src:{index}")))
}

/// Recover the issuance index a backend-observed instruction traces to.
fn source_index(instruction: &Instruction) -> Option<usize> {
    instruction.tags().iter().find_map(|tag| match tag {
        Tag::Custom(label) => label.strip_prefix("src:").and_then(|v| v.parse().ok()),
        _ => None,
    })
}

proptest! {
    /// With an accept-everything backend and an empty chain, the observed
    /// stream equals the issued stream, order and content.
    #[test]
    fn pass_through_is_identity(ops in prop::collection::vec(op(), 1..32)) {
        let backend = TraceBackend::new();
        let log = backend.log();
        let mut pipeline = Pipeline::new(backend);

        let reg = pipeline.allocate_register(QUBITS as usize).unwrap();
        let mut issued = Vec::new();
        for (index, op) in ops.iter().enumerate() {
            let inst = build(op, &reg, index);
            issued.push(inst.clone());
            pipeline.issue(inst).unwrap();
        }
        pipeline.flush().unwrap();

        let observed: Vec<Instruction> = log
            .instructions()
            .into_iter()
            .filter(|i| !i.is_classical())
            .collect();
        prop_assert_eq!(observed, issued);
    }

    /// For every qubit, instructions tracing back to earlier issuance
    /// always reach the backend before those tracing back to later
    /// issuance — decomposition never reorders across a shared qubit.
    #[test]
    fn per_qubit_order_is_preserved(ops in prop::collection::vec(op(), 1..32)) {
        let backend = TraceBackend::accepting(accepts_native);
        let log = backend.log();
        let mut pipeline = PipelineBuilder::new()
            .with_decomposer(demo_rules())
            .with_filter(accepts_native)
            .build(backend);

        let reg = pipeline.allocate_register(QUBITS as usize).unwrap();
        for (index, op) in ops.iter().enumerate() {
            pipeline.issue(build(op, &reg, index)).unwrap();
        }
        pipeline.flush().unwrap();

        let stream = log.instructions();
        prop_assert!(
            stream.iter().filter(|i| !i.is_classical()).all(|i| accepts_native(i)),
            "unsupported instruction reached the backend"
        );
        for qubit in reg.iter() {
            let sources: Vec<usize> = stream
                .iter()
                .filter(|i| i.references(qubit))
                .filter_map(source_index)
                .collect();
            prop_assert!(
                sources.windows(2).all(|w| w[0] <= w[1]),
                "qubit {} observed out-of-order sources: {:?}",
                qubit,
                sources
            );
        }
    }
}

/// Non-random spot check: an interleaving whose legalized form famously
/// breaks when replacements are appended instead of spliced.
#[test]
fn test_interleaved_swap_keeps_neighbors_ordered() {
    let backend = TraceBackend::accepting(accepts_native);
    let log = backend.log();
    let mut pipeline = PipelineBuilder::new()
        .with_decomposer(demo_rules())
        .with_filter(accepts_native)
        .build(backend);

    let reg = pipeline.allocate_register(2).unwrap();
    let a = reg.get(0).unwrap();
    let b = reg.get(1).unwrap();

    pipeline
        .issue(Instruction::gate(Gate::H, a).unwrap().with_tag(Tag::custom("src:0")))
        .unwrap();
    pipeline
        .issue(
            Instruction::gate(Gate::Swap, Register::new([a, b]))
                .unwrap()
                .with_tag(Tag::custom("src:1")),
        )
        .unwrap();
    pipeline
        .issue(Instruction::gate(Gate::X, a).unwrap().with_tag(Tag::custom("src:2")))
        .unwrap();
    pipeline.flush().unwrap();

    let sources: Vec<usize> = log
        .instructions()
        .iter()
        .filter(|i| i.references(a))
        .filter_map(source_index)
        .collect();
    assert_eq!(sources, vec![0, 1, 1, 1, 2]);
}
