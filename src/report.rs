use diagrammar::ParseOutcome;
use diagrammar::model::LayoutEngine;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

/// Everything the report shows about one parse.
pub struct Run<'a> {
    pub name: &'a str,
    pub registry: &'a str,
    pub outcome: &'a ParseOutcome,
    pub summary: Vec<String>,
    pub layout: LayoutEngine,
}

pub fn print_run(run: &Run<'_>, color: bool) {
    let palette = ansi::Palette::new(color);
    println!(
        "\n{}",
        palette.bold(palette.paint(format!("⚙  Parsing {} as {}", run.name, run.registry), ansi::CYAN))
    );

    println!("\n{}", palette.paint("━━━ Passes ━━━", ansi::GRAY));
    print_passes(run.outcome, &palette);

    println!("\n{}", palette.paint("━━━ Diagnostics ━━━", ansi::GRAY));
    print_diagnostics(run.outcome, &palette);

    println!("\n{}", palette.paint("━━━ Diagram ━━━", ansi::GRAY));
    if run.summary.is_empty() {
        println!("{}", palette.dim("  (empty)"));
    }
    for line in &run.summary {
        println!("  {line}");
    }
    println!("  {} {}", palette.dim("layout:"), palette.paint(run.layout.as_str(), ansi::BLUE));

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    let per_pass: Vec<String> = run.outcome.metrics.passes.iter().map(|p| format!("{:?}", p.duration)).collect();
    println!(
        "  Total: {}  │  Passes: {}",
        palette.paint(format!("{:?}", run.outcome.metrics.total), ansi::GREEN),
        palette.dim(per_pass.join(" / ")),
    );
    println!();
}

fn print_passes(outcome: &ParseOutcome, palette: &ansi::Palette) {
    for pass in &outcome.metrics.passes {
        let status = if pass.errors == 0 {
            palette.paint(format!("✓ {} executed", pass.executed), ansi::GREEN)
        } else {
            palette.paint(format!("✗ {} executed, {} error(s)", pass.executed, pass.errors), ansi::RED)
        };
        println!(
            "  {} {}  {}",
            palette.paint(format!("Pass {}:", pass.pass), ansi::BLUE),
            status,
            palette.dim(format!("skipped {} │ ignored {}", pass.skipped, pass.ignored)),
        );
    }
    if !outcome.completed {
        println!("  {}", palette.paint("stopped before the last pass finished", ansi::YELLOW));
    }
}

fn print_diagnostics(outcome: &ParseOutcome, palette: &ansi::Palette) {
    if outcome.diagnostics.is_empty() {
        println!("{}", palette.dim("  none"));
        return;
    }
    for diag in &outcome.diagnostics {
        println!(
            "  {} {} {}",
            palette.paint(format!("[pass {}]", diag.pass), ansi::GRAY),
            palette.paint(diag.error.kind.as_str(), ansi::YELLOW),
            diag.error,
        );
    }
}
