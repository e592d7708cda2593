//! First-match-wins dispatch.
//!
//! One call to [`dispatch_next`] handles one unit of input:
//!
//! ```text
//! peek line ──▶ try registry[0], registry[1], ...   (registration order)
//!                 │ first open-pattern match wins
//!                 ▼
//!          block command? ──yes──▶ extract_block(end, strategy)
//!                 │ no                 │ (unterminated -> error @ open line)
//!                 ▼                    ▼
//!            consume 1 line     consume open..=close
//!                 └──────┬─────────────┘
//!                        ▼
//!           active on this pass? ──no──▶ Ok(Skipped)
//!                        │ yes
//!                        ▼
//!                 action(diagram, invocation) ──▶ Ok(Executed) / Err(semantic)
//! ```
//!
//! Pass applicability never changes which command wins or how much input is
//! consumed; it only decides whether the action runs. An inactive block
//! command therefore still needs its end line on every pass.

use super::command::Invocation;
use super::lines::LineBuffer;
use super::passes::PassController;
use super::registry::CommandRegistry;
use super::result::{CommandError, Dispatched, ExecutionResult, Outcome};

/// Dispatch the command at the buffer's cursor.
///
/// - No match: `ErrorKind::NoMatch` at the current line; nothing consumed.
/// - Unterminated block: `ErrorKind::UnterminatedBlock` at the opening line;
///   nothing consumed.
/// - Semantic failure: the action's error, located at the opening line unless
///   the action set a location itself. The input is consumed.
pub fn dispatch_next<D>(
    buffer: &mut LineBuffer,
    registry: &CommandRegistry<D>,
    passes: &PassController,
    diagram: &mut D,
) -> ExecutionResult {
    let Some(line) = buffer.peek() else {
        return Err(CommandError::end_of_input());
    };
    let location = line.location;
    let text = line.trimmed();

    let found = registry.commands().iter().find_map(|command| {
        tracing::trace!(command = command.name(), line = location.line, "trying");
        command.open().match_line(text).map(|captures| (command, captures))
    });

    let Some((command, captures)) = found else {
        tracing::debug!(registry = registry.name(), line = location.line, text, "no matching command");
        return Err(CommandError::no_match(location));
    };

    let block = match command.end() {
        Some(end) => Some(buffer.extract_block(end, command.strategy())?),
        None => {
            buffer.consume();
            None
        }
    };
    let consumed = block.as_ref().map_or(1, |b| b.len() + 2);
    let pass = passes.current();

    if !passes.is_active(command.passes()) {
        tracing::trace!(command = command.name(), line = location.line, pass, "inactive on this pass");
        return Ok(Dispatched { command: command.shared_name(), outcome: Outcome::Skipped, location, consumed });
    }

    tracing::debug!(command = command.name(), line = location.line, pass, consumed, "executing");
    let invocation = Invocation { location, captures: &captures, block: block.as_ref(), pass };
    command.execute(diagram, &invocation).map_err(|err| err.or_at(location))?;

    Ok(Dispatched { command: command.shared_name(), outcome: Outcome::Executed, location, consumed })
}
