//! Stage trait and chain cursors.
//!
//! A chain is an immutable, once-built ordered list of [`Stage`]s
//! terminated by a [`Backend`]. Stages never hold a `next` pointer;
//! instead each `receive` call is handed a [`Next`] cursor over the
//! remaining chain, and each availability query a read-only [`Lookahead`].
//! This keeps the chain impossible to rewire while instructions are in
//! flight, and makes speculative availability checks structurally free of
//! side effects (a `Lookahead` only ever hands out shared references).

use alsvid_ir::Instruction;

use crate::backend::Backend;
use crate::error::EngineResult;

/// One link in the transformation chain.
///
/// A stage receives a batch of instructions in order and decides, per
/// instruction, whether to forward it unchanged, substitute a replacement
/// sequence (resubmitted through the cursor, so replacements may decompose
/// further), or reject it with an error. Only redundant consecutive
/// barriers may ever be dropped.
pub trait Stage: Send + Sync {
    /// Get the name of this stage.
    fn name(&self) -> &str;

    /// Process a batch of instructions in order, forwarding downstream
    /// through `next`.
    fn receive(&self, batch: &[Instruction], next: &mut Next<'_>) -> EngineResult<()>;

    /// Report whether this stage — and, transitively, everything
    /// downstream — can ultimately accept `instruction` without a terminal
    /// failure.
    ///
    /// Must be safe to call speculatively: no observable side effects.
    /// Stages with no transformation logic simply forward the query.
    fn is_available(&self, instruction: &Instruction, next: &Lookahead<'_>) -> bool {
        next.is_available(instruction)
    }
}

/// Mutable cursor over the remainder of a chain: the forward path.
pub struct Next<'a> {
    stages: &'a [Box<dyn Stage>],
    backend: &'a mut dyn Backend,
}

impl<'a> Next<'a> {
    /// Create a cursor over `stages` terminated by `backend`.
    pub fn new(stages: &'a [Box<dyn Stage>], backend: &'a mut dyn Backend) -> Self {
        Self { stages, backend }
    }

    /// Submit a batch to the next stage (or the backend, at the end of the
    /// chain).
    pub fn receive(&mut self, batch: &[Instruction]) -> EngineResult<()> {
        match self.stages.split_first() {
            Some((stage, rest)) => {
                let mut next = Next {
                    stages: rest,
                    backend: &mut *self.backend,
                };
                stage.receive(batch, &mut next)
            }
            None => self.backend.receive(batch),
        }
    }

    /// Submit a single instruction downstream.
    pub fn forward(&mut self, instruction: &Instruction) -> EngineResult<()> {
        self.receive(std::slice::from_ref(instruction))
    }

    /// Query downstream availability without forwarding anything.
    pub fn is_available(&self, instruction: &Instruction) -> bool {
        Lookahead {
            stages: self.stages,
            backend: &*self.backend,
        }
        .is_available(instruction)
    }
}

/// Read-only cursor over the remainder of a chain: the availability path.
pub struct Lookahead<'a> {
    stages: &'a [Box<dyn Stage>],
    backend: &'a dyn Backend,
}

impl<'a> Lookahead<'a> {
    /// Create a read-only cursor over `stages` terminated by `backend`.
    pub fn new(stages: &'a [Box<dyn Stage>], backend: &'a dyn Backend) -> Self {
        Self { stages, backend }
    }

    /// Ask whether the next stage (or the backend) can ultimately accept
    /// `instruction`.
    pub fn is_available(&self, instruction: &Instruction) -> bool {
        match self.stages.split_first() {
            Some((stage, rest)) => stage.is_available(
                instruction,
                &Lookahead {
                    stages: rest,
                    backend: self.backend,
                },
            ),
            None => self.backend.is_available(instruction),
        }
    }
}
