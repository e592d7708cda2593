//! Command registries.
//!
//! A [`CommandRegistry`] is the ordered, immutable list of commands for one
//! diagram type plus the number of passes that type needs. Order matters:
//! the dispatcher tries commands in registration order and the first match
//! wins, so specific syntax must be registered before general syntax that
//! could also match.
//!
//! Registries are built once through a [`RegistryBuilder`] and can then be
//! shared (`&CommandRegistry<D>` is `Send + Sync`) by any number of
//! independent parses.
//!
//! ## Invariants
//!
//! - `passes() >= 1`.
//! - Every `Passes::Only(p)` / `Passes::From(p)` satisfies `1 <= p <= passes()`.

use super::command::Command;
use super::result::GrammarError;

pub struct CommandRegistry<D> {
    name: String,
    passes: u32,
    commands: Vec<Command<D>>,
}

impl<D> std::fmt::Debug for CommandRegistry<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("name", &self.name)
            .field("passes", &self.passes)
            .field("commands", &self.commands)
            .finish()
    }
}

impl<D> CommandRegistry<D> {
    pub fn builder(name: &str) -> RegistryBuilder<D> {
        RegistryBuilder { name: name.to_string(), passes: 1, commands: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of passes a parse with this registry runs.
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Commands in registration (= matching) order.
    pub fn commands(&self) -> &[Command<D>] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Command<D>> {
        self.commands.iter().find(|c| c.name() == name)
    }
}

pub struct RegistryBuilder<D> {
    name: String,
    passes: u32,
    commands: Vec<Command<D>>,
}

impl<D> RegistryBuilder<D> {
    /// Number of passes (default 1).
    pub fn passes(mut self, passes: u32) -> Self {
        self.passes = passes;
        self
    }

    /// Append one command after those already registered.
    pub fn command(mut self, command: Command<D>) -> Self {
        self.commands.push(command);
        self
    }

    pub fn extend(mut self, commands: impl IntoIterator<Item = Command<D>>) -> Self {
        self.commands.extend(commands);
        self
    }

    /// Validate pass bindings and freeze the registry.
    pub fn build(self) -> Result<CommandRegistry<D>, GrammarError> {
        if self.passes == 0 {
            return Err(GrammarError::NoPasses { registry: self.name });
        }

        for command in &self.commands {
            if let Some(pass) = command.passes().bound() {
                if pass == 0 || pass > self.passes {
                    return Err(GrammarError::PassOutOfRange {
                        registry: self.name.clone(),
                        command: command.name().to_string(),
                        pass,
                        total: self.passes,
                    });
                }
            }
        }

        tracing::debug!(registry = %self.name, commands = self.commands.len(), passes = self.passes, "registry built");

        Ok(CommandRegistry { name: self.name, passes: self.passes, commands: self.commands })
    }
}
