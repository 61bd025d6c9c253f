//! Recording backend for tests and debugging.

use std::sync::{Arc, Mutex};

use alsvid_engine::{Backend, EngineResult};
use alsvid_ir::Instruction;

type Accept = Box<dyn Fn(&Instruction) -> bool + Send + Sync>;

#[derive(Debug, Default)]
struct TraceInner {
    instructions: Vec<Instruction>,
    flushes: usize,
}

/// Shareable view of a [`TraceBackend`]'s recorded stream.
///
/// Clone the handle before moving the backend into a pipeline; it stays
/// valid after the pipeline (and the backend with it) is dropped, which is
/// what makes teardown behavior observable in tests.
#[derive(Debug, Clone, Default)]
pub struct TraceLog(Arc<Mutex<TraceInner>>);

impl TraceLog {
    /// Snapshot of every instruction received so far, in order.
    pub fn instructions(&self) -> Vec<Instruction> {
        self.0.lock().expect("trace log poisoned").instructions.clone()
    }

    /// Number of `Flush` barriers observed.
    pub fn flushes(&self) -> usize {
        self.0.lock().expect("trace log poisoned").flushes
    }

    /// Number of instructions received so far.
    pub fn len(&self) -> usize {
        self.0.lock().expect("trace log poisoned").instructions.len()
    }

    /// Check if nothing has been received.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A terminal sink that records every instruction it consumes.
///
/// By default it accepts everything; [`TraceBackend::accepting`] restricts
/// the native set with a predicate (classical instructions are always
/// accepted). `Flush` is a no-op beyond being recorded and counted — the
/// whole chain is synchronous, so everything before the barrier has
/// already been consumed when it arrives.
pub struct TraceBackend {
    accept: Option<Accept>,
    log: TraceLog,
}

impl TraceBackend {
    /// Create a trace backend that accepts every instruction.
    pub fn new() -> Self {
        Self {
            accept: None,
            log: TraceLog::default(),
        }
    }

    /// Create a trace backend whose native set is defined by `accept`.
    pub fn accepting(accept: impl Fn(&Instruction) -> bool + Send + Sync + 'static) -> Self {
        Self {
            accept: Some(Box::new(accept)),
            log: TraceLog::default(),
        }
    }

    /// Get a shareable handle to the recorded stream.
    pub fn log(&self) -> TraceLog {
        self.log.clone()
    }
}

impl Default for TraceBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for TraceBackend {
    fn name(&self) -> &str {
        "trace"
    }

    fn is_available(&self, instruction: &Instruction) -> bool {
        instruction.is_classical()
            || self.accept.as_ref().is_none_or(|accept| accept(instruction))
    }

    fn receive(&mut self, batch: &[Instruction]) -> EngineResult<()> {
        let mut inner = self.log.0.lock().expect("trace log poisoned");
        for instruction in batch {
            if instruction.is_flush() {
                inner.flushes += 1;
            }
            inner.instructions.push(instruction.clone());
        }
        Ok(())
    }
}
