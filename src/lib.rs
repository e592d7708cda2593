extern crate self as diagrammar;

#[macro_use]
mod macros;
mod api;
pub mod engine;
pub mod grammars;
pub mod model;

pub use api::{Diagnostic, ErrorPolicy, ParseOptions, ParseOutcome, parse_lines, parse_with};
pub use engine::{
    Atom, Block, BlockStrategy, Captures, Command, CommandError, CommandRegistry, CommandResult, Dispatched,
    ErrorKind, ExecutionResult, GrammarError, Invocation, LineBuffer, Multiline, Outcome, PassController,
    PassError, Passes, Pattern, RegistryBuilder, Trim, dispatch_next,
};

// --- Source lines -----------------------------------------------------------

/// Position of a line in the (preprocessed) source text.
///
/// Line numbers are 1-based, matching what an editor shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineLocation {
    pub line: usize,
}

impl LineLocation {
    pub const fn new(line: usize) -> Self {
        LineLocation { line }
    }
}

impl std::fmt::Display for LineLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}", self.line)
    }
}

/// One line of source text together with its stable location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub location: LineLocation,
    pub text: String,
}

impl SourceLine {
    pub fn new(line: usize, text: impl Into<String>) -> Self {
        SourceLine { location: LineLocation::new(line), text: text.into() }
    }

    /// The text with surrounding whitespace removed; this is what patterns
    /// are matched against.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Blank lines and `'` comment lines carry no command.
    pub fn is_ignorable(&self) -> bool {
        let t = self.trimmed();
        t.is_empty() || t.starts_with('\'')
    }
}
