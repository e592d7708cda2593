//! Timing diagram grammar.
//!
//! Players are declared on pass 1; time ticks, player selection and state
//! changes run from pass 2 on, so a player may be used above its declaration.

mod commands;
mod helpers;

use once_cell::sync::OnceCell;

use crate::engine::{CommandRegistry, GrammarError};
use crate::model::TimingDiagram;

pub use commands::get;

pub const PASSES: u32 = 2;

/// Compile a fresh registry: common commands first, then the timing ones.
pub fn build() -> Result<CommandRegistry<TimingDiagram>, GrammarError> {
    CommandRegistry::builder("timing")
        .passes(PASSES)
        .extend(super::common::get()?)
        .extend(get()?)
        .build()
}

/// Shared registry, compiled on first use.
pub fn registry() -> Result<&'static CommandRegistry<TimingDiagram>, GrammarError> {
    static REGISTRY: OnceCell<CommandRegistry<TimingDiagram>> = OnceCell::new();
    REGISTRY.get_or_try_init(build)
}
