//! Legalize a 3-qubit Fourier transform down to single-qubit gates and
//! CX, printing the backend-observed stream.
//!
//! Run with: cargo run -p alsvid-demos --bin demo-qft

use std::f64::consts::PI;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use alsvid_backend::WriterBackend;
use alsvid_engine::{DecompositionRule, PipelineBuilder, RuleSet};
use alsvid_ir::{Gate, GateClass, Instruction, QubitId, Register};

/// Target set of the pretend device: single-qubit gates plus CX.
fn device_native(instruction: &Instruction) -> bool {
    let single = instruction.target_qubit_count() == 1;
    match instruction.control_count() {
        0 => single,
        1 => single && instruction.name() == "x",
        _ => false,
    }
}

fn demo_rules() -> Arc<RuleSet> {
    let mut rules = RuleSet::new();

    // QFT over a register: H + controlled phases, then reverse with swaps.
    rules.register(
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
        .with_control_count(0),
    );

    // CP(θ) = P(θ/2)·P(θ/2)·CX·P(−θ/2)·CX.
    rules.register(
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
        .with_control_count(1),
    );

    // SWAP = CX·CX·CX.
    rules.register(
        DecompositionRule::new("swap-to-cx", GateClass::Swap, |inst| {
            let a = inst.targets()[0].get(0).expect("swap arity");
            let b = inst.targets()[0].get(1).expect("swap arity");
            Ok(vec![
                Instruction::controlled(Gate::X, [a], b)?,
                Instruction::controlled(Gate::X, [b], a)?,
                Instruction::controlled(Gate::X, [a], b)?,
            ])
        })
        .with_control_count(0),
    );

    Arc::new(rules)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut pipeline = PipelineBuilder::new()
        .with_decomposer(demo_rules())
        .with_filter(device_native)
        .build(WriterBackend::stdout());

    info!("issuing a 3-qubit Fourier transform against a 1q+CX device");

    let reg = pipeline.allocate_register(3)?;
    pipeline.issue(Instruction::gate(Gate::Qft, reg.clone())?)?;
    pipeline.measure_register(&reg)?;
    pipeline.flush()?;
    for qubit in reg.iter() {
        pipeline.deallocate(qubit)?;
    }

    info!("stream fully legalized");
    Ok(())
}
