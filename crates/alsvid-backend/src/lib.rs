//! Alsvid Terminal Sinks
//!
//! Concrete [`Backend`](alsvid_engine::Backend) implementations for the
//! end of an engine chain:
//!
//! - [`TraceBackend`] — records the instruction stream it consumes, with a
//!   shareable [`TraceLog`] handle that outlives the pipeline. The
//!   workhorse of the test suites; its native set defaults to everything
//!   and can be restricted with a predicate.
//! - [`WriterBackend`] — renders each instruction as one text line to any
//!   `io::Write` sink; the "printer" backend.
//!
//! Execution and simulation backends live outside this workspace; they
//! only need to implement the two-method `Backend` contract.

pub mod trace;
pub mod writer;

pub use trace::{TraceBackend, TraceLog};
pub use writer::WriterBackend;
