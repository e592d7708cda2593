//! Gantt chart grammar.
//!
//! Two passes: task durations and notes are recorded on pass 1, so pass 2
//! can link tasks that are declared further down the source.

mod commands;
#[cfg(test)]
mod tests;

use once_cell::sync::OnceCell;

use crate::engine::{CommandRegistry, GrammarError};
use crate::model::GanttDiagram;

pub use commands::get;

pub const PASSES: u32 = 2;

/// Compile a fresh registry: common commands first, then the Gantt ones.
pub fn build() -> Result<CommandRegistry<GanttDiagram>, GrammarError> {
    CommandRegistry::builder("gantt")
        .passes(PASSES)
        .extend(super::common::get()?)
        .extend(get()?)
        .build()
}

/// Shared registry, compiled on first use.
pub fn registry() -> Result<&'static CommandRegistry<GanttDiagram>, GrammarError> {
    static REGISTRY: OnceCell<CommandRegistry<GanttDiagram>> = OnceCell::new();
    REGISTRY.get_or_try_init(build)
}
