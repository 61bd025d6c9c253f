//! Text-writer backend.

use std::io::{self, Write};

use alsvid_engine::{Backend, EngineError, EngineResult};
use alsvid_ir::Instruction;
use tracing::debug;

/// A terminal sink that renders each instruction as one text line.
///
/// This is the "printer" flavor of backend: it accepts every instruction
/// and gives it its effect by writing its display form to the wrapped
/// writer. A `Flush` barrier additionally flushes the writer, so
/// everything issued before the barrier is durably visible when
/// `flush()` returns to the client.
pub struct WriterBackend<W: Write + Send + Sync> {
    writer: W,
}

impl<W: Write + Send + Sync> WriterBackend<W> {
    /// Create a writer backend over any `io::Write` sink.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the backend and return the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterBackend<io::Stdout> {
    /// Create a writer backend printing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + Sync> Backend for WriterBackend<W> {
    fn name(&self) -> &str {
        "writer"
    }

    fn is_available(&self, _instruction: &Instruction) -> bool {
        true
    }

    fn receive(&mut self, batch: &[Instruction]) -> EngineResult<()> {
        for instruction in batch {
            writeln!(self.writer, "{instruction}").map_err(|err| EngineError::Backend {
                backend: "writer".to_string(),
                message: err.to_string(),
            })?;
            if instruction.is_flush() {
                debug!("writer backend flushing output");
                self.writer.flush().map_err(|err| EngineError::Backend {
                    backend: "writer".to_string(),
                    message: err.to_string(),
                })?;
            }
        }
        Ok(())
    }
}
