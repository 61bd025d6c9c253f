//! Alsvid Engine Chain
//!
//! This crate implements the transformation chain that carries an abstract
//! instruction stream down to a restricted target instruction set. Client
//! code issues gates against an unconstrained vocabulary; the terminal
//! [`Backend`] declares what it natively accepts; the stages in between
//! legalize everything else.
//!
//! # Architecture
//!
//! ```text
//! Client program
//!       │  allocate / issue / measure / flush
//!       ▼
//! ┌──────────────┐
//! │   Pipeline   │ ◄── qubit liveness table, barrier coalescing
//! └──────────────┘
//!       │
//!       ├── DecompositionEngine ◄── Arc<RuleSet> (read-only after setup)
//!       ├── InstructionFilter   ◄── acceptance predicate
//!       │
//!       ▼
//! Backend (simulator, hardware interface, or printer)
//! ```
//!
//! The chain is assembled once by a [`PipelineBuilder`] and never rewired
//! while instructions are in flight. Each stage sees the rest of the chain
//! only through a [`Next`] cursor (forwarding) or a [`Lookahead`] cursor
//! (side-effect-free availability queries). A decomposition stage placed
//! immediately before a filter intercepts the filter's rejections by
//! querying its availability and expanding unsupported instructions
//! through registered rules before they ever reach it.
//!
//! Everything is single-threaded and synchronous: `receive` calls are
//! ordinary nested calls, and [`Pipeline::flush`] returns only after the
//! backend has consumed everything submitted before the barrier.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use alsvid_backend::TraceBackend;
//! use alsvid_engine::{DecompositionRule, PipelineBuilder, RuleSet};
//! use alsvid_ir::{Gate, GateClass, Instruction};
//!
//! // Swap is not in the target set; teach the chain to rewrite it.
//! let mut rules = RuleSet::new();
//! rules.register(
//!     DecompositionRule::new("swap-to-cx", GateClass::Swap, |inst| {
//!         let a = inst.targets()[0].get(0).unwrap();
//!         let b = inst.targets()[0].get(1).unwrap();
//!         Ok(vec![
//!             Instruction::controlled(Gate::X, [a], b)?,
//!             Instruction::controlled(Gate::X, [b], a)?,
//!             Instruction::controlled(Gate::X, [a], b)?,
//!         ])
//!     })
//!     .with_control_count(0),
//! );
//!
//! let backend = TraceBackend::new();
//! let log = backend.log();
//! let mut pipeline = PipelineBuilder::new()
//!     .with_decomposer(Arc::new(rules))
//!     .with_filter(|inst| inst.target_qubit_count() == 1 && inst.control_count() <= 1)
//!     .build(backend);
//!
//! let reg = pipeline.allocate_register(2).unwrap();
//! let swap = Instruction::gate(Gate::Swap, reg.clone()).unwrap();
//! pipeline.issue(swap).unwrap();
//! pipeline.flush().unwrap();
//!
//! // The backend saw three controlled-X gates instead of the swap.
//! let xs = log.instructions().iter().filter(|i| i.name() == "x").count();
//! assert_eq!(xs, 3);
//! ```

pub mod backend;
pub mod decompose;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod rules;
pub mod stage;

pub use backend::Backend;
pub use decompose::{DecompositionEngine, MAX_DECOMPOSITION_DEPTH};
pub use error::{EngineError, EngineResult, InvalidHandleReason};
pub use filter::InstructionFilter;
pub use pipeline::{Pipeline, PipelineBuilder};
pub use rules::{DecompositionRule, RuleSet};
pub use stage::{Lookahead, Next, Stage};
