//! Bundled grammars.
//!
//! Each diagram grammar exposes `get()`, its own commands in registration
//! order, and `registry()`, a process-wide compiled registry that also carries
//! the [`common`] commands ahead of the diagram-specific ones.

pub mod common;
pub mod gantt;
pub mod timing;
