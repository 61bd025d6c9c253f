//! Predicate-based instruction filtering.

use alsvid_ir::Instruction;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::stage::{Lookahead, Next, Stage};

/// A stage that accepts or rejects instructions by predicate, without
/// rewriting them.
///
/// The predicate must be a pure function of the instruction's fields — it
/// is consulted speculatively through [`Stage::is_available`] by upstream
/// stages (normally a decomposition engine placed immediately before the
/// filter). Classical instructions always pass.
///
/// A rejected instruction is never silently dropped: if no upstream stage
/// intercepted it, `receive` fails with [`EngineError::Unsupported`].
pub struct InstructionFilter {
    accept: Box<dyn Fn(&Instruction) -> bool + Send + Sync>,
}

impl InstructionFilter {
    /// Create a filter from an acceptance predicate.
    pub fn new(accept: impl Fn(&Instruction) -> bool + Send + Sync + 'static) -> Self {
        Self {
            accept: Box::new(accept),
        }
    }

    fn accepts(&self, instruction: &Instruction) -> bool {
        instruction.is_classical() || (self.accept)(instruction)
    }
}

impl Stage for InstructionFilter {
    fn name(&self) -> &str {
        "instruction_filter"
    }

    fn receive(&self, batch: &[Instruction], next: &mut Next<'_>) -> EngineResult<()> {
        for instruction in batch {
            if self.accepts(instruction) {
                next.forward(instruction)?;
            } else {
                debug!(%instruction, "filter rejected instruction");
                return Err(EngineError::Unsupported {
                    stage: self.name().to_string(),
                    instruction: instruction.to_string(),
                });
            }
        }
        Ok(())
    }

    fn is_available(&self, instruction: &Instruction, _next: &Lookahead<'_>) -> bool {
        self.accepts(instruction)
    }
}
