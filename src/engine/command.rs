//! Command descriptors.
//!
//! A [`Command`] couples an open [`Pattern`] (and, for block commands, an end
//! pattern plus a [`BlockStrategy`]) with a semantic action that mutates the
//! diagram model. Commands are built once, at registry-build time, and reused
//! for every line of every parse.

use super::lines::{Block, BlockStrategy};
use super::passes::Passes;
use super::pattern::{Captures, Pattern};
use super::result::{CommandError, CommandResult};
use crate::LineLocation;
use std::sync::Arc;

/// Semantic action of a command.
pub type Action<D> = Box<dyn Fn(&mut D, &Invocation<'_>) -> CommandResult + Send + Sync>;

/// Everything an action gets to see about the line(s) that triggered it.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Location of the (opening) line.
    pub location: LineLocation,
    /// Captures of the open pattern.
    pub captures: &'a Captures,
    /// Interior lines for block commands.
    pub block: Option<&'a Block>,
    /// Current pass number.
    pub pass: u32,
}

impl<'a> Invocation<'a> {
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.captures.get(name)
    }

    /// A capture the pattern guarantees; reports a semantic error otherwise.
    pub fn require(&self, name: &str) -> Result<&'a str, CommandError> {
        self.get(name).ok_or_else(|| CommandError::semantic(format!("missing {name}")))
    }
}

pub struct Command<D> {
    name: Arc<str>,
    open: Pattern,
    end: Option<Pattern>,
    strategy: BlockStrategy,
    passes: Passes,
    action: Action<D>,
}

impl<D> std::fmt::Debug for Command<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("open", &self.open.as_regex())
            .field("end", &self.end.as_ref().map(Pattern::as_regex))
            .field("strategy", &self.strategy)
            .field("passes", &self.passes)
            .field("action", &"<function>")
            .finish()
    }
}

impl<D> Command<D> {
    /// A single-line command, active on every pass.
    pub fn single<F>(name: &str, open: Pattern, action: F) -> Self
    where
        F: Fn(&mut D, &Invocation<'_>) -> CommandResult + Send + Sync + 'static,
    {
        Command {
            name: Arc::from(name),
            open,
            end: None,
            strategy: BlockStrategy::KEEP,
            passes: Passes::Every,
            action: Box::new(action),
        }
    }

    /// Turn this into a block command closed by `end`.
    pub fn with_block(mut self, end: Pattern, strategy: BlockStrategy) -> Self {
        self.end = Some(end);
        self.strategy = strategy;
        self
    }

    pub fn active_on(mut self, passes: Passes) -> Self {
        self.passes = passes;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        self.name.clone()
    }

    pub fn open(&self) -> &Pattern {
        &self.open
    }

    pub fn end(&self) -> Option<&Pattern> {
        self.end.as_ref()
    }

    pub fn strategy(&self) -> BlockStrategy {
        self.strategy
    }

    pub fn passes(&self) -> Passes {
        self.passes
    }

    pub fn is_block(&self) -> bool {
        self.end.is_some()
    }

    pub(crate) fn execute(&self, diagram: &mut D, invocation: &Invocation<'_>) -> CommandResult {
        (self.action)(diagram, invocation)
    }
}
