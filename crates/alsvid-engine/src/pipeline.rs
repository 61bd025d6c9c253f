//! Chain entry point: qubit lifecycle, issuance and the flush barrier.

use std::sync::Arc;

use alsvid_ir::{Instruction, QubitId, Register};
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::decompose::DecompositionEngine;
use crate::error::{EngineError, EngineResult, InvalidHandleReason};
use crate::filter::InstructionFilter;
use crate::rules::RuleSet;
use crate::stage::{Lookahead, Next, Stage};

/// Liveness table for qubit handles.
///
/// A handle is an index into this table; validity is a flag lookup, not a
/// pointer dereference. Handles are never reused, so reverse id order is
/// reverse allocation order.
#[derive(Debug, Default)]
struct QubitTable {
    live: Vec<bool>,
}

impl QubitTable {
    fn allocate(&mut self) -> QubitId {
        self.live.push(true);
        QubitId((self.live.len() - 1) as u32)
    }

    fn check(&self, qubit: QubitId) -> EngineResult<()> {
        match self.live.get(qubit.0 as usize) {
            Some(true) => Ok(()),
            Some(false) => Err(EngineError::InvalidHandle {
                qubit,
                reason: InvalidHandleReason::Deallocated,
            }),
            None => Err(EngineError::InvalidHandle {
                qubit,
                reason: InvalidHandleReason::NeverAllocated,
            }),
        }
    }

    fn release(&mut self, qubit: QubitId) {
        self.live[qubit.0 as usize] = false;
    }

    fn live_count(&self) -> usize {
        self.live.iter().filter(|&&l| l).count()
    }

    /// Live handles in reverse allocation order.
    fn live_handles_rev(&self) -> Vec<QubitId> {
        (0..self.live.len())
            .rev()
            .filter(|&i| self.live[i])
            .map(|i| QubitId(i as u32))
            .collect()
    }
}

/// Assembles a chain before any instruction flows.
///
/// Stages are appended head-first: the first stage added is the first an
/// issued instruction enters. The chain is immutable once built.
pub struct PipelineBuilder {
    stages: Vec<Box<dyn Stage>>,
}

impl PipelineBuilder {
    /// Create a builder with an empty chain.
    pub fn new() -> Self {
        Self { stages: vec![] }
    }

    /// Append a stage to the chain.
    #[must_use]
    pub fn with_stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Append an [`InstructionFilter`] with the given acceptance predicate.
    #[must_use]
    pub fn with_filter(
        self,
        accept: impl Fn(&Instruction) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.with_stage(InstructionFilter::new(accept))
    }

    /// Append a [`DecompositionEngine`] over a shared rule set.
    ///
    /// Place it immediately before the filter whose rejections it should
    /// intercept.
    #[must_use]
    pub fn with_decomposer(self, rules: Arc<RuleSet>) -> Self {
        self.with_stage(DecompositionEngine::new(rules))
    }

    /// Terminate the chain with `backend` and return the pipeline.
    pub fn build<B: Backend>(self, backend: B) -> Pipeline<B> {
        info!(
            stages = self.stages.len(),
            backend = backend.name(),
            "building pipeline"
        );
        Pipeline {
            stages: self.stages,
            backend,
            qubits: QubitTable::default(),
            barrier_pending: false,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The entry point of an engine chain.
///
/// The pipeline mints and retires qubit handles, validates that every
/// issued instruction references only live handles, and exposes the
/// synchronization barrier. A pipeline instance is owned by exactly one
/// logical program thread; all processing is synchronous — `receive` calls
/// are ordinary nested calls that complete before control returns.
///
/// # Garbage-collection duty
///
/// If the pipeline is dropped — normal exit or unwind — while handles are
/// still live, it deallocates them in reverse allocation order and emits a
/// final barrier before relinquishing the chain, so the backend never
/// observes orphaned allocations. Failures on this path are logged, not
/// panicked.
pub struct Pipeline<B: Backend> {
    stages: Vec<Box<dyn Stage>>,
    backend: B,
    qubits: QubitTable,
    barrier_pending: bool,
}

impl<B: Backend> Pipeline<B> {
    /// Create a pipeline with an empty chain (every instruction goes
    /// straight to the backend).
    pub fn new(backend: B) -> Self {
        PipelineBuilder::new().build(backend)
    }

    /// Mint a fresh qubit handle, record it live, and emit its `Allocate`
    /// instruction through the chain.
    pub fn allocate_qubit(&mut self) -> EngineResult<QubitId> {
        let qubit = self.qubits.allocate();
        debug!(%qubit, "allocated qubit handle");
        self.submit(&Instruction::allocate(qubit))?;
        Ok(qubit)
    }

    /// Allocate `n` qubits and return them as a register.
    ///
    /// Each handle's `Allocate` instruction enters the stream before any
    /// instruction referencing that handle.
    pub fn allocate_register(&mut self, n: usize) -> EngineResult<Register> {
        let mut qubits = Vec::with_capacity(n);
        for _ in 0..n {
            qubits.push(self.allocate_qubit()?);
        }
        Ok(Register::new(qubits))
    }

    /// Retire a handle: emit its `Deallocate` instruction, then mark it
    /// invalid. Fails without emitting anything if the handle is not live.
    pub fn deallocate(&mut self, qubit: QubitId) -> EngineResult<()> {
        self.qubits.check(qubit)?;
        self.submit(&Instruction::deallocate(qubit))?;
        self.qubits.release(qubit);
        debug!(%qubit, "deallocated qubit handle");
        Ok(())
    }

    /// Issue a gate or measure instruction into the chain.
    ///
    /// Every referenced handle must be currently live; lifecycle
    /// instructions (`Allocate`, `Deallocate`) must go through
    /// [`allocate_qubit`](Self::allocate_qubit) /
    /// [`deallocate`](Self::deallocate) so the liveness table stays
    /// consistent, and are rejected here.
    pub fn issue(&mut self, instruction: Instruction) -> EngineResult<()> {
        if instruction.is_allocate() || instruction.is_deallocate() {
            return Err(EngineError::Unsupported {
                stage: "pipeline".to_string(),
                instruction: instruction.to_string(),
            });
        }
        for qubit in instruction.qubits() {
            self.qubits.check(qubit)?;
        }
        self.submit(&instruction)
    }

    /// Submit a `Measure` instruction for one qubit. The result is only
    /// guaranteed readable at the backend after a subsequent
    /// [`flush`](Self::flush).
    pub fn measure(&mut self, qubit: QubitId) -> EngineResult<()> {
        self.qubits.check(qubit)?;
        self.submit(&Instruction::measure(qubit))
    }

    /// Measure every qubit of a register, in register order.
    pub fn measure_register(&mut self, register: &Register) -> EngineResult<()> {
        for qubit in register.iter() {
            self.measure(qubit)?;
        }
        Ok(())
    }

    /// Submit a `Flush` barrier and return once every stage, including the
    /// backend, has fully processed everything submitted before it.
    ///
    /// Redundant consecutive barriers coalesce: flushing twice with
    /// nothing in between submits a single `Flush`.
    pub fn flush(&mut self) -> EngineResult<()> {
        if self.barrier_pending {
            debug!("coalescing redundant barrier");
            return Ok(());
        }
        self.submit(&Instruction::flush())
    }

    /// Speculatively ask whether the chain can ultimately accept
    /// `instruction`. Performs no side effects.
    pub fn is_available(&self, instruction: &Instruction) -> bool {
        Lookahead::new(&self.stages, &self.backend).is_available(instruction)
    }

    /// Number of currently live qubit handles.
    pub fn live_qubits(&self) -> usize {
        self.qubits.live_count()
    }

    /// Shared access to the terminal backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the terminal backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn submit(&mut self, instruction: &Instruction) -> EngineResult<()> {
        self.barrier_pending = false;
        Next::new(&self.stages, &mut self.backend)
            .receive(std::slice::from_ref(instruction))?;
        if instruction.is_flush() {
            self.barrier_pending = true;
        }
        Ok(())
    }
}

impl<B: Backend> Drop for Pipeline<B> {
    fn drop(&mut self) {
        let leaked = self.qubits.live_handles_rev();
        if leaked.is_empty() {
            return;
        }
        warn!(
            count = leaked.len(),
            "pipeline dropped with live qubit handles; deallocating"
        );
        for qubit in leaked {
            if let Err(err) = self.submit(&Instruction::deallocate(qubit)) {
                warn!(%qubit, %err, "deallocation failed during pipeline teardown");
            }
            self.qubits.release(qubit);
        }
        if let Err(err) = self.submit(&Instruction::flush()) {
            warn!(%err, "final barrier failed during pipeline teardown");
        }
    }
}
