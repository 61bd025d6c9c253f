//! Shared fixtures: a small demo rule library and the matching target set.
//!
//! The rules mirror the classic Fourier-transform legalization: `qft` over
//! a register expands into Hadamards, controlled phases and swaps; a
//! controlled phase reduces to phases and CX; a swap reduces to three CX.

#![allow(dead_code)]

use std::f64::consts::PI;
use std::sync::Arc;

use alsvid_engine::{DecompositionRule, RuleSet};
use alsvid_ir::{Gate, GateClass, Instruction, QubitId, Register};

/// Target set: single-qubit gates plus single-control X.
pub fn accepts_native(instruction: &Instruction) -> bool {
    let single = instruction.target_qubit_count() == 1;
    match instruction.control_count() {
        0 => single,
        1 => single && instruction.name() == "x",
        _ => false,
    }
}

/// QFT over a register: H + controlled phases, then reverse with swaps.
fn qft_rule() -> DecompositionRule {
    DecompositionRule::new("qft-expand", GateClass::Qft, |inst| {
        let qubits: Vec<QubitId> = inst.qubits().collect();
        let n = qubits.len();
        let mut out = Vec::new();
        for i in 0..n {
            out.push(Instruction::gate(Gate::H, qubits[i])?);
            for j in (i + 1)..n {
                let theta = PI / 2f64.powi((j - i) as i32);
                out.push(Instruction::controlled(
                    Gate::P(theta),
                    [qubits[j]],
                    qubits[i],
                )?);
            }
        }
        for k in 0..n / 2 {
            out.push(Instruction::gate(
                Gate::Swap,
                Register::new([qubits[k], qubits[n - 1 - k]]),
            )?);
        }
        Ok(out)
    })
    .with_control_count(0)
}

/// CP(θ) = P(θ/2) on control · P(θ/2) on target · CX · P(−θ/2) on target · CX.
fn controlled_phase_rule() -> DecompositionRule {
    DecompositionRule::new("cp-to-cx", GateClass::P, |inst| {
        let theta = match inst.as_gate() {
            Some(Gate::P(theta)) => *theta,
            _ => unreachable!("rule registered for phase gates"),
        };
        let control = inst.controls()[0];
        let target = inst.targets()[0].get(0).expect("phase gate arity");
        Ok(vec![
            Instruction::gate(Gate::P(theta / 2.0), control)?,
            Instruction::gate(Gate::P(theta / 2.0), target)?,
            Instruction::controlled(Gate::X, [control], target)?,
            Instruction::gate(Gate::P(-theta / 2.0), target)?,
            Instruction::controlled(Gate::X, [control], target)?,
        ])
    })
    .with_control_count(1)
}

/// SWAP = CX(a,b) · CX(b,a) · CX(a,b).
fn swap_rule() -> DecompositionRule {
    DecompositionRule::new("swap-to-cx", GateClass::Swap, |inst| {
        let a = inst.targets()[0].get(0).expect("swap arity");
        let b = inst.targets()[0].get(1).expect("swap arity");
        Ok(vec![
            Instruction::controlled(Gate::X, [a], b)?,
            Instruction::controlled(Gate::X, [b], a)?,
            Instruction::controlled(Gate::X, [a], b)?,
        ])
    })
    .with_control_count(0)
}

/// The full demo rule set, shared across chains.
pub fn demo_rules() -> Arc<RuleSet> {
    let mut rules = RuleSet::new();
    rules.register(qft_rule());
    rules.register(controlled_phase_rule());
    rules.register(swap_rule());
    Arc::new(rules)
}
