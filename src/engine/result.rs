//! Execution results and error types.
//!
//! Every dispatch yields exactly one [`ExecutionResult`]. Errors fall into the
//! categories described by [`ErrorKind`]; grammar-configuration problems are a
//! separate type ([`GrammarError`]) because they are raised while a registry is
//! being built and never reach parse time.

use crate::LineLocation;
use std::sync::Arc;

/// Category of a [`CommandError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No registered command matches the current line. The line is left
    /// unconsumed.
    NoMatch,
    /// A block command's end pattern never appeared. Location is the opening
    /// line.
    UnterminatedBlock,
    /// A matched command's action rejected its input.
    Semantic,
    /// Dispatch was called on an exhausted buffer.
    EndOfInput,
}

impl ErrorKind {
    /// Fatal errors leave the diagram structurally broken; the parse driver
    /// stops regardless of its error policy.
    pub const fn is_fatal(self) -> bool {
        matches!(self, ErrorKind::UnterminatedBlock)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NoMatch => "syntax",
            ErrorKind::UnterminatedBlock => "unterminated-block",
            ErrorKind::Semantic => "semantic",
            ErrorKind::EndOfInput => "end-of-input",
        }
    }
}

/// A located, human-readable failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}{message}", .location.map(|l| format!("{l}: ")).unwrap_or_default())]
pub struct CommandError {
    pub kind: ErrorKind,
    pub message: String,
    pub location: Option<LineLocation>,
}

impl CommandError {
    pub fn no_match(location: LineLocation) -> Self {
        CommandError { kind: ErrorKind::NoMatch, message: "no matching command".to_string(), location: Some(location) }
    }

    pub fn unterminated(location: LineLocation) -> Self {
        CommandError {
            kind: ErrorKind::UnterminatedBlock,
            message: "unterminated block".to_string(),
            location: Some(location),
        }
    }

    pub fn end_of_input() -> Self {
        CommandError { kind: ErrorKind::EndOfInput, message: "no more input".to_string(), location: None }
    }

    /// An action-level failure. The dispatcher fills in the command's line
    /// unless the action attaches a finer location with [`CommandError::at`].
    pub fn semantic(message: impl Into<String>) -> Self {
        CommandError { kind: ErrorKind::Semantic, message: message.into(), location: None }
    }

    pub fn at(mut self, location: LineLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Attach `location` only when none is set yet.
    pub fn or_at(mut self, location: LineLocation) -> Self {
        self.location.get_or_insert(location);
        self
    }
}

/// What an action returns.
pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The action ran and succeeded.
    Executed,
    /// The command matched but is inactive on the current pass; its input was
    /// consumed and nothing else happened.
    Skipped,
}

/// Successful dispatch record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub command: Arc<str>,
    pub outcome: Outcome,
    /// Location of the (opening) line.
    pub location: LineLocation,
    /// Lines consumed, including a block's open and close lines.
    pub consumed: usize,
}

/// What a dispatch returns.
pub type ExecutionResult = Result<Dispatched, CommandError>;

/// Registry-build time configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("pattern `{label}` must begin with a start anchor and finish with an end anchor")]
    Unanchored { label: String },
    #[error("pattern `{label}` declares capture `{name}` more than once")]
    DuplicateCapture { label: String, name: String },
    #[error("pattern `{label}` has a capture without a name")]
    EmptyCaptureName { label: String },
    #[error("pattern `{label}` applies `{modifier}` to {atom}, which cannot carry it")]
    InvalidModifier { label: String, modifier: &'static str, atom: String },
    #[error("pattern `{label}` does not compile")]
    InvalidRegex {
        label: String,
        #[source]
        source: regex::Error,
    },
    #[error("command `{command}` is bound to pass {pass}, but registry `{registry}` runs {total} pass(es)")]
    PassOutOfRange { registry: String, command: String, pass: u32, total: u32 },
    #[error("registry `{registry}` must run at least one pass")]
    NoPasses { registry: String },
}

/// Illegal pass transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PassError {
    #[error("pass {pass} left {remaining} line(s) unconsumed")]
    ResidualInput { pass: u32, remaining: usize },
    #[error("pass {pass} was aborted by a fatal error")]
    Aborted { pass: u32 },
    #[error("all {total} pass(es) have already run")]
    Finished { total: u32 },
}
