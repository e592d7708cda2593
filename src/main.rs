mod report;

use diagrammar::grammars::{gantt, timing};
use diagrammar::model::{GanttDiagram, LayoutEngine, TimingDiagram, Titled};
use diagrammar::{CommandRegistry, ErrorPolicy, GrammarError, LineBuffer, ParseOptions, SourceLine, parse_lines};
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter (`debug`, `diagrammar=trace`, ...).
const LOG_ENV: &str = "DIAGRAMMAR_LOG";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };
    init_tracing(config.verbose);

    let (kind, lines) = match prepare(&config.source, config.diagram) {
        Ok(prepared) => prepared,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let options = ParseOptions {
        error_policy: if config.keep_going { ErrorPolicy::Continue } else { ErrorPolicy::Abort },
        ..ParseOptions::default()
    };
    let mut buffer = LineBuffer::new(lines);

    let result = match kind {
        DiagramKind::Gantt => run(gantt::registry(), GanttDiagram::default(), &mut buffer, &options, &config, |d| {
            d.summary()
        }),
        DiagramKind::Timing => run(timing::registry(), TimingDiagram::default(), &mut buffer, &options, &config, |d| {
            d.summary()
        }),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

/// Parse with `registry`, print the report, and tell whether the parse was clean.
fn run<D: Titled>(
    registry: Result<&'static CommandRegistry<D>, GrammarError>,
    mut diagram: D,
    buffer: &mut LineBuffer,
    options: &ParseOptions,
    config: &CliConfig,
    summary: impl Fn(&D) -> Vec<String>,
) -> Result<bool, GrammarError> {
    let registry = registry?;
    let outcome = parse_lines(buffer, registry, &mut diagram, options);
    let layout = diagram.common().layout_engine(config.layout);
    report::print_run(
        &report::Run { name: &config.name, registry: registry.name(), outcome: &outcome, summary: summary(&diagram), layout },
        config.color,
    );
    Ok(outcome.is_ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiagramKind {
    Gantt,
    Timing,
}

impl DiagramKind {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "gantt" => Some(DiagramKind::Gantt),
            "timing" => Some(DiagramKind::Timing),
            _ => None,
        }
    }
}

struct CliConfig {
    source: String,
    /// File name, or `<stdin>`.
    name: String,
    diagram: Option<DiagramKind>,
    layout: Option<LayoutEngine>,
    keep_going: bool,
    color: bool,
    verbose: u8,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut path: Option<String> = None;
    let mut diagram = None;
    let mut layout = None;
    let mut keep_going = false;
    let mut color = io::stdout().is_terminal();
    let mut verbose = 0u8;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("diagrammar {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--keep-going" | "-k" => keep_going = true,
            "-v" | "--verbose" => verbose = verbose.saturating_add(1),
            "--diagram" | "-d" => {
                let value = args.next().ok_or_else(|| "error: --diagram expects a value".to_string())?;
                diagram = Some(parse_diagram(&value)?);
            }
            "--layout" => {
                let value = args.next().ok_or_else(|| "error: --layout expects a value".to_string())?;
                layout = Some(parse_layout(&value)?);
            }
            _ if arg.starts_with("--diagram=") => {
                diagram = Some(parse_diagram(arg.trim_start_matches("--diagram="))?);
            }
            _ if arg.starts_with("--layout=") => {
                layout = Some(parse_layout(arg.trim_start_matches("--layout="))?);
            }
            "-" => {
                if path.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                path = Some(arg);
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                if path.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                path = Some(arg);
            }
        }
    }

    let (source, name) = match path.as_deref() {
        None | Some("-") => (read_stdin_input()?, "<stdin>".to_string()),
        Some(file) => {
            let text =
                std::fs::read_to_string(file).map_err(|err| format!("error: failed to read '{file}': {err}"))?;
            (text, file.to_string())
        }
    };

    if source.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { source, name, diagram, layout, keep_going, color, verbose })
}

fn parse_diagram(value: &str) -> Result<DiagramKind, String> {
    DiagramKind::from_name(value).ok_or_else(|| format!("error: unknown diagram type '{value}' (expected gantt or timing)"))
}

fn parse_layout(value: &str) -> Result<LayoutEngine, String> {
    LayoutEngine::from_name(value)
        .ok_or_else(|| format!("error: unknown layout engine '{value}' (expected graphviz, smetana or elk)"))
}

/// Work out the diagram type and drop the `@start...`/`@end...` markers.
/// Remaining lines keep their original line numbers.
fn prepare(source: &str, forced: Option<DiagramKind>) -> Result<(DiagramKind, Vec<SourceLine>), String> {
    let mut detected = None;
    let mut lines = Vec::new();

    for (idx, text) in source.lines().enumerate() {
        let trimmed = text.trim();
        if let Some(marker) = trimmed.strip_prefix("@start") {
            let word = marker.split_whitespace().next().unwrap_or_default();
            detected = detected.or_else(|| DiagramKind::from_name(word));
            continue;
        }
        if trimmed.starts_with("@end") && trimmed[4..].chars().all(|c| c.is_ascii_alphabetic()) {
            continue;
        }
        lines.push(SourceLine::new(idx + 1, text));
    }

    let kind = forced
        .or(detected)
        .ok_or_else(|| "error: cannot tell the diagram type; use @startgantt, @starttiming or --diagram".to_string())?;
    tracing::debug!(?kind, lines = lines.len(), "source prepared");
    Ok((kind, lines))
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).without_time().try_init();
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "diagrammar {version}

Parse a Gantt or timing diagram and report what each pass did.

Usage:
  diagrammar [OPTIONS] [FILE]

  Reads FILE, or stdin when FILE is omitted or '-'. The diagram type comes
  from the @startgantt / @starttiming marker unless --diagram is given.

Options:
  -d, --diagram <gantt|timing>   Diagram type (overrides the @start marker).
  --layout <engine>              Force the layout engine: graphviz, smetana or elk.
  -k, --keep-going               Record errors and continue instead of stopping
                                 at the first one.
  --color                        Force ANSI color output.
  --no-color                     Disable ANSI color output.
  -v, --verbose                  Debug logging on stderr; twice for trace.
  -h, --help                     Show this help message.
  -V, --version                  Print version information.

Environment:
  {log_env}                 tracing filter; overrides -v.

Exit codes:
  0  Parsed without errors.
  1  Parse errors were reported.
  2  Invalid arguments or unreadable input.
",
        version = env!("CARGO_PKG_VERSION"),
        log_env = LOG_ENV,
    )
}
