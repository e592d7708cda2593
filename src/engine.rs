//! Command-grammar and dispatch engine.
//!
//! This module is the *public entry point* for declaring diagram syntax and
//! running it over source text. It is split into focused submodules under
//! `src/engine/`.
//!
//! ## How the parts work together
//!
//! ```text
//! Atom lists ──Pattern::new──▶ Pattern        (pattern.rs)
//!                                │
//!      Command::single/with_block│             (command.rs)
//!                                ▼
//!              RegistryBuilder::build ──▶ CommandRegistry<D>   (registry.rs)
//!                                                 │
//! source ──▶ LineBuffer (lines.rs)                │
//!               │                                 │
//!               └────────▶ dispatch_next ◀────────┘            (dispatcher.rs)
//!                              │   ▲
//!                              │   └── PassController          (passes.rs)
//!                              ▼
//!                       action(&mut D, &Invocation)
//!                              │
//!                              ▼
//!                       ExecutionResult                        (result.rs)
//! ```
//!
//! The engine knows nothing about any particular diagram: it is generic over
//! the model type `D` that actions mutate. Concrete command sets live under
//! `src/grammars/**`, and the pass loop that drives `dispatch_next` lives in
//! `src/api.rs`.
//!
//! ## Responsibilities by module
//!
//! - `pattern.rs`: atom algebra, compilation to one anchored regex, captures.
//! - `lines.rs`: the line cursor, block extraction and block cleaning.
//! - `command.rs`: command descriptors and the invocation handed to actions.
//! - `registry.rs`: ordered, validated, shareable command lists.
//! - `passes.rs`: pass applicability and the per-parse pass state.
//! - `dispatcher.rs`: first-match-wins dispatch of one unit of input.
//! - `result.rs`: result/error protocol.
//! - `metrics.rs`: per-pass counters collected by the driver.
//!
//! ## Debugging
//!
//! Everything logs through `tracing`: `trace` for every pattern attempt,
//! `debug` for every dispatch.

#[path = "engine/command.rs"]
mod command;
#[path = "engine/dispatcher.rs"]
mod dispatcher;
#[path = "engine/lines.rs"]
mod lines;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/passes.rs"]
mod passes;
#[path = "engine/pattern.rs"]
mod pattern;
#[path = "engine/registry.rs"]
mod registry;
#[path = "engine/result.rs"]
mod result;

pub use command::{Action, Command, Invocation};
pub use dispatcher::dispatch_next;
pub use lines::{Block, BlockStrategy, LineBuffer, Multiline, Trim};
pub use metrics::{PassMetrics, RunMetrics};
pub use passes::{PassController, Passes};
pub use pattern::{Atom, Captures, Pattern};
pub use registry::{CommandRegistry, RegistryBuilder};
pub use result::{
    CommandError, CommandResult, Dispatched, ErrorKind, ExecutionResult, GrammarError, Outcome, PassError,
};
