//! Rule-driven instruction decomposition.

use std::sync::Arc;

use alsvid_ir::Instruction;
use tracing::{debug, trace};

use crate::error::{EngineError, EngineResult};
use crate::rules::RuleSet;
use crate::stage::{Lookahead, Next, Stage};

/// Depth bound for recursive rule application.
///
/// A well-formed rule set converges long before this; hitting the bound
/// means a rule regenerates an unsupported instruction of its own category
/// without progress, and the engine fails fast with
/// [`EngineError::DecompositionNotConverged`] instead of looping.
pub const MAX_DECOMPOSITION_DEPTH: usize = 128;

/// A stage that rewrites instructions the rest of the chain cannot accept.
///
/// For each incoming instruction, the engine first asks the downstream
/// chain whether the instruction is already supported — supported
/// instructions never pay a rule lookup. Otherwise it applies the best
/// matching rule from its [`RuleSet`] and resubmits the replacement
/// sequence, which may itself require further decomposition.
///
/// Rewriting runs on an explicit work list with a per-instruction depth
/// counter rather than call recursion, so the non-convergence failure mode
/// is an explicit error instead of stack exhaustion. Emission order equals
/// issuance order; the engine holds no buffer across calls.
pub struct DecompositionEngine {
    rules: Arc<RuleSet>,
}

impl DecompositionEngine {
    /// Create a decomposition engine over a shared rule set.
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    fn process(&self, instruction: &Instruction, next: &mut Next<'_>) -> EngineResult<()> {
        // Legalize fully before forwarding anything: a failed expansion
        // must leave nothing of this instruction downstream. Replacements
        // are pushed in reverse so the stack pops them in issuance order.
        let mut legal: Vec<Instruction> = Vec::new();
        let mut work: Vec<(Instruction, usize)> = vec![(instruction.clone(), 0)];

        while let Some((inst, depth)) = work.pop() {
            if inst.is_classical() || next.is_available(&inst) {
                legal.push(inst);
                continue;
            }

            if depth >= MAX_DECOMPOSITION_DEPTH {
                return Err(EngineError::DecompositionNotConverged {
                    gate: inst.name().to_string(),
                    depth,
                });
            }

            let Some(rule) = self.rules.best_match(&inst) else {
                return Err(EngineError::DecompositionExhausted {
                    gate: inst.name().to_string(),
                    instruction: inst.to_string(),
                });
            };

            debug!(rule = rule.name(), instruction = %inst, "applying decomposition rule");
            let replacement = rule.apply(&inst)?;
            for r in replacement.into_iter().rev() {
                work.push((r, depth + 1));
            }
        }

        trace!(count = legal.len(), "forwarding legalized sequence");
        next.receive(&legal)
    }
}

impl Stage for DecompositionEngine {
    fn name(&self) -> &str {
        "decomposition_engine"
    }

    fn receive(&self, batch: &[Instruction], next: &mut Next<'_>) -> EngineResult<()> {
        for instruction in batch {
            self.process(instruction, next)?;
        }
        Ok(())
    }

    fn is_available(&self, instruction: &Instruction, next: &Lookahead<'_>) -> bool {
        instruction.is_classical()
            || next.is_available(instruction)
            || self.rules.best_match(instruction).is_some()
    }
}
