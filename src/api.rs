use crate::engine::{
    CommandError, CommandRegistry, ErrorKind, LineBuffer, Outcome, PassController, PassMetrics, RunMetrics,
    dispatch_next,
};
use std::time::Instant;

/// What the driver does after a non-fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first error of any kind.
    #[default]
    Abort,
    /// Record the error, skip the offending line if it was not consumed, and
    /// keep going. Unterminated blocks still abort.
    Continue,
}

/// Options that affect how the driver walks the source.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub error_policy: ErrorPolicy,
    /// Pass over blank lines and `'` comment lines between commands.
    pub skip_comments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { error_policy: ErrorPolicy::Abort, skip_comments: true }
    }
}

/// An error recorded during a parse, tagged with the pass it happened on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub pass: u32,
    pub error: CommandError,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[pass {}] {}", self.pass, self.error)
    }
}

/// Result of [`parse_with`] / [`parse_lines`].
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// Errors in the order they happened.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether every configured pass ran to the end of the input.
    pub completed: bool,
    pub metrics: RunMetrics,
}

impl ParseOutcome {
    /// All passes completed without a single error.
    pub fn is_ok(&self) -> bool {
        self.completed && self.diagnostics.is_empty()
    }

    pub fn first_error(&self) -> Option<&CommandError> {
        self.diagnostics.first().map(|d| &d.error)
    }
}

/// Parse `source` into `diagram` with every pass `registry` asks for.
///
/// # Example
/// ```
/// use diagrammar::{ParseOptions, grammars, model::TimingDiagram, parse_with};
///
/// let registry = grammars::timing::registry().unwrap();
/// let mut diagram = TimingDiagram::default();
/// let out = parse_with("@WB\nrobust \"Web\" as WB", registry, &mut diagram, &ParseOptions::default());
/// assert!(out.is_ok());
/// ```
pub fn parse_with<D>(
    source: &str,
    registry: &CommandRegistry<D>,
    diagram: &mut D,
    options: &ParseOptions,
) -> ParseOutcome {
    let mut buffer = LineBuffer::from_text(source);
    parse_lines(&mut buffer, registry, diagram, options)
}

/// Like [`parse_with`], for lines that were already numbered upstream.
pub fn parse_lines<D>(
    buffer: &mut LineBuffer,
    registry: &CommandRegistry<D>,
    diagram: &mut D,
    options: &ParseOptions,
) -> ParseOutcome {
    let total_start = Instant::now();
    let mut controller = PassController::for_registry(registry);
    let mut diagnostics = Vec::new();
    let mut metrics = RunMetrics::default();
    buffer.rewind();

    let completed = loop {
        let pass = run_pass(buffer, registry, &mut controller, diagram, options, &mut diagnostics);
        metrics.passes.push(pass);

        if controller.is_aborted() {
            break false;
        }
        if controller.is_last() {
            break true;
        }
        if let Err(err) = controller.advance(buffer) {
            tracing::warn!(registry = registry.name(), %err, "cannot start next pass");
            break false;
        }
    };

    metrics.total = total_start.elapsed();
    ParseOutcome { diagnostics, completed, metrics }
}

/// Dispatch the whole buffer once.
fn run_pass<D>(
    buffer: &mut LineBuffer,
    registry: &CommandRegistry<D>,
    controller: &mut PassController,
    diagram: &mut D,
    options: &ParseOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> PassMetrics {
    let pass_start = Instant::now();
    let pass = controller.current();
    let mut metrics = PassMetrics { pass, ..PassMetrics::default() };

    while let Some(line) = buffer.peek() {
        if options.skip_comments && line.is_ignorable() {
            buffer.consume();
            metrics.ignored += 1;
            continue;
        }

        match dispatch_next(buffer, registry, controller, diagram) {
            Ok(dispatched) => match dispatched.outcome {
                Outcome::Executed => metrics.executed += 1,
                Outcome::Skipped => metrics.skipped += 1,
            },
            Err(error) => {
                metrics.errors += 1;
                let fatal = error.kind.is_fatal() || options.error_policy == ErrorPolicy::Abort;
                let no_match = error.kind == ErrorKind::NoMatch;
                if no_match {
                    buffer.consume();
                }
                // Syntax errors repeat identically on every pass; report them once.
                if !no_match || pass == 1 || fatal {
                    diagnostics.push(Diagnostic { pass, error });
                }
                if fatal {
                    tracing::warn!(registry = registry.name(), pass, "parse aborted");
                    controller.abort();
                    break;
                }
            }
        }
    }

    metrics.duration = pass_start.elapsed();
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Atom, Command, Passes, Pattern};
    use crate::LineLocation;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Names {
        declared: Vec<String>,
        linked: Vec<(String, String)>,
    }

    fn registry() -> CommandRegistry<Names> {
        let declare = Pattern::new(
            "declare",
            vec![Atom::start(), Atom::lit("def"), Atom::spaces1(), Atom::capture("NAME", r"\w+"), Atom::end()],
        )
        .unwrap();
        let link = Pattern::new(
            "link",
            vec![
                Atom::start(),
                Atom::capture("FROM", r"\w+"),
                Atom::spaces0(),
                Atom::lit("->"),
                Atom::spaces0(),
                Atom::capture("TO", r"\w+"),
                Atom::end(),
            ],
        )
        .unwrap();

        CommandRegistry::builder("names")
            .passes(2)
            .command(
                Command::single("declare", declare, |d: &mut Names, inv| {
                    d.declared.push(inv.require("NAME")?.to_string());
                    Ok(())
                })
                .active_on(Passes::Only(1)),
            )
            .command(
                Command::single("link", link, |d: &mut Names, inv| {
                    let from = inv.require("FROM")?;
                    let to = inv.require("TO")?;
                    for name in [from, to] {
                        if !d.declared.iter().any(|n| n == name) {
                            return Err(CommandError::semantic(format!("no such name {name}")));
                        }
                    }
                    d.linked.push((from.to_string(), to.to_string()));
                    Ok(())
                })
                .active_on(Passes::From(2)),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn forward_reference_resolves_on_second_pass() {
        let mut names = Names::default();
        let out = parse_with("a -> b\ndef a\n\n' comment\ndef b", &registry(), &mut names, &ParseOptions::default());

        assert!(out.is_ok(), "{:?}", out.diagnostics);
        assert_eq!(names.declared, vec!["a", "b"]);
        assert_eq!(names.linked, vec![("a".to_string(), "b".to_string())]);

        let passes = &out.metrics.passes;
        assert_eq!(passes.len(), 2);
        assert_eq!((passes[0].executed, passes[0].skipped, passes[0].ignored), (2, 1, 2));
        assert_eq!((passes[1].executed, passes[1].skipped), (1, 2));
    }

    #[test]
    fn unresolved_forward_reference_names_the_identifier() {
        let mut names = Names::default();
        let out = parse_with("def a\na -> zz", &registry(), &mut names, &ParseOptions::default());

        assert!(!out.completed);
        assert_eq!(out.diagnostics.len(), 1);
        let d = &out.diagnostics[0];
        assert_eq!(d.pass, 2);
        assert_eq!(d.error.kind, ErrorKind::Semantic);
        assert_eq!(d.error.location, Some(LineLocation::new(2)));
        assert!(d.error.message.contains("zz"));
    }

    #[test]
    fn abort_policy_stops_at_first_syntax_error() {
        let mut names = Names::default();
        let out = parse_with("def a\n???\ndef b", &registry(), &mut names, &ParseOptions::default());

        assert!(!out.completed);
        assert_eq!(out.metrics.passes.len(), 1);
        assert_eq!(names.declared, vec!["a"]);
        assert_eq!(out.first_error().map(|e| e.kind), Some(ErrorKind::NoMatch));
    }

    #[test]
    fn continue_policy_reports_syntax_errors_once() {
        let options = ParseOptions { error_policy: ErrorPolicy::Continue, ..ParseOptions::default() };
        let mut names = Names::default();
        let out = parse_with("def a\n???\ndef b\nb -> a", &registry(), &mut names, &options);

        assert!(out.completed);
        assert!(!out.is_ok());
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].error.location, Some(LineLocation::new(2)));
        assert_eq!(names.declared, vec!["a", "b"]);
        assert_eq!(names.linked.len(), 1);
        assert_eq!(out.metrics.errors(), 2);
    }

    #[test]
    fn first_pass_state_does_not_depend_on_later_passes() {
        let source = "b -> a\ndef a\ndef b";
        let reg = registry();

        // Pass 1 only, twice over fresh models: identical state.
        let pass_one = |names: &mut Names| {
            let mut buffer = LineBuffer::from_text(source);
            let controller = PassController::new(2);
            while !buffer.is_exhausted() {
                dispatch_next(&mut buffer, &reg, &controller, names).unwrap();
            }
        };
        let mut first = Names::default();
        pass_one(&mut first);
        let mut second = Names::default();
        pass_one(&mut second);
        assert_eq!(first, second);

        // The full parse reaches the same pass-1 state before pass 2 adds links.
        let mut full = Names::default();
        assert!(parse_with(source, &reg, &mut full, &ParseOptions::default()).is_ok());
        assert_eq!(full.declared, first.declared);
        assert!(first.linked.is_empty());
        assert_eq!(full.linked.len(), 1);
    }

    #[test]
    fn comments_are_commands_when_not_skipped() {
        let options = ParseOptions { skip_comments: false, ..ParseOptions::default() };
        let out = parse_with("' hello", &registry(), &mut Names::default(), &options);
        assert_eq!(out.first_error().map(|e| e.kind), Some(ErrorKind::NoMatch));
    }
}
