//! Decomposition rule registry.

use alsvid_ir::{GateClass, Instruction};
use rustc_hash::FxHashMap;

use crate::error::EngineResult;

type Generator = Box<dyn Fn(&Instruction) -> EngineResult<Vec<Instruction>> + Send + Sync>;

/// A rewriting rule: for one gate category, a generator producing an
/// ordered, logically equivalent replacement sequence.
///
/// A rule may be control-count-specific (`with_control_count`); such rules
/// take precedence over generic rules for the same category.
pub struct DecompositionRule {
    name: String,
    class: GateClass,
    control_count: Option<usize>,
    generator: Generator,
}

impl DecompositionRule {
    /// Create a rule for a gate category.
    pub fn new(
        name: impl Into<String>,
        class: GateClass,
        generator: impl Fn(&Instruction) -> EngineResult<Vec<Instruction>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            class,
            control_count: None,
            generator: Box::new(generator),
        }
    }

    /// Restrict the rule to instructions with exactly `count` control
    /// qubits.
    #[must_use]
    pub fn with_control_count(mut self, count: usize) -> Self {
        self.control_count = Some(count);
        self
    }

    /// Get the name of this rule.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The gate category this rule rewrites.
    pub fn class(&self) -> GateClass {
        self.class
    }

    /// The control-count restriction, if any.
    pub fn control_count(&self) -> Option<usize> {
        self.control_count
    }

    /// Apply the rule. Every generated instruction inherits the tags of
    /// the instruction it replaces.
    pub fn apply(&self, instruction: &Instruction) -> EngineResult<Vec<Instruction>> {
        let replacement = (self.generator)(instruction)?;
        Ok(replacement
            .into_iter()
            .map(|inst| inst.with_inherited_tags(instruction))
            .collect())
    }
}

impl std::fmt::Debug for DecompositionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecompositionRule")
            .field("name", &self.name)
            .field("class", &self.class)
            .field("control_count", &self.control_count)
            .finish_non_exhaustive()
    }
}

/// A registry of decomposition rules keyed by gate category.
///
/// Rules are registered during setup, before any instruction flows; once a
/// chain is built the set is read-only and may be shared across
/// independent chains (wrap it in an `Arc`) without synchronization.
///
/// Lookup precedence is explicit: a control-count-specific rule beats a
/// generic rule for the same category; among rules of equal specificity,
/// the first registered wins.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: FxHashMap<GateClass, Vec<DecompositionRule>>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule. Registration order is the tie-breaker within a
    /// category and specificity.
    pub fn register(&mut self, rule: DecompositionRule) {
        self.rules.entry(rule.class).or_default().push(rule);
    }

    /// Total number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Check if no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Find the rule that decomposes `instruction`, if any.
    pub fn best_match(&self, instruction: &Instruction) -> Option<&DecompositionRule> {
        let gate = instruction.as_gate()?;
        let candidates = self.rules.get(&gate.class())?;
        let controls = instruction.control_count();
        candidates
            .iter()
            .find(|rule| rule.control_count() == Some(controls))
            .or_else(|| candidates.iter().find(|rule| rule.control_count().is_none()))
    }
}
