use crate::engine::{ErrorKind, LineBuffer, Outcome, PassController, dispatch_next};
use crate::grammars::gantt;
use crate::model::{GanttDiagram, Titled};
use crate::{ErrorPolicy, LineLocation, ParseOptions, ParseOutcome, parse_with};

fn parse(source: &str) -> (GanttDiagram, ParseOutcome) {
    let mut diagram = GanttDiagram::default();
    let out = parse_with(source, gantt::registry().unwrap(), &mut diagram, &ParseOptions::default());
    (diagram, out)
}

#[test]
fn registry_keeps_common_commands_first() {
    let registry = gantt::registry().unwrap();
    assert_eq!(registry.passes(), 2);
    assert_eq!(registry.commands()[0].name(), "title (block)");
    let names: Vec<&str> = registry.commands().iter().map(|c| c.name()).collect();
    let last = &names[names.len() - 4..];
    assert_eq!(last, ["task duration", "note bottom", "starts after", "colored"]);
}

#[test]
fn durations_in_days_and_weeks() {
    let (d, out) = parse("[Design] lasts 5 days\n[Build] requires 2 weeks\n[Ship] lasts 1 day");
    assert!(out.is_ok(), "{:?}", out.diagnostics);
    assert_eq!(d.task("Design").unwrap().duration_days, 5);
    assert_eq!(d.task("Build").unwrap().duration_days, 14);
    assert_eq!(d.task("Ship").unwrap().duration_days, 1);
}

#[test]
fn note_bottom_block_is_trimmed() {
    let source = "[Design] lasts 5 days\nnote bottom\n  first line  \n  second line\nend note";
    let registry = gantt::registry().unwrap();
    let mut buffer = LineBuffer::from_text(source);
    let passes = PassController::for_registry(registry);
    let mut diagram = GanttDiagram::default();

    dispatch_next(&mut buffer, registry, &passes, &mut diagram).unwrap();
    let note = dispatch_next(&mut buffer, registry, &passes, &mut diagram).unwrap();
    assert_eq!(&*note.command, "note bottom");
    assert_eq!(note.outcome, Outcome::Executed);
    assert_eq!(note.consumed, 4);
    assert!(buffer.is_exhausted());

    let notes = diagram.notes();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].lines, vec!["first line", "second line"]);
    assert_eq!(notes[0].task.as_deref(), Some("Design"));
}

#[test]
fn note_with_quotes_tags_and_stereotype() {
    let (d, out) = parse("note bottom $risk $later <<warning>>\n  'quoted text\n  plain\nend note");
    assert!(out.is_ok(), "{:?}", out.diagnostics);
    let note = &d.notes()[0];
    assert_eq!(note.lines, vec!["quoted text", "plain"]);
    assert_eq!(note.tags, vec!["risk", "later"]);
    assert_eq!(note.stereotype.as_deref(), Some("warning"));
    assert_eq!(note.task, None);
}

#[test]
fn empty_note_is_rejected() {
    let (_, out) = parse("note bottom\nend note");
    let err = out.first_error().unwrap();
    assert_eq!(err.message, "No note defined");
    assert_eq!(err.location, Some(LineLocation::new(1)));
}

#[test]
fn unterminated_note_points_at_opening_line() {
    let (d, out) = parse("[A] lasts 1 day\nnote bottom\n  dangling");
    let err = out.first_error().unwrap();
    assert_eq!(err.kind, ErrorKind::UnterminatedBlock);
    assert_eq!(err.location, Some(LineLocation::new(2)));
    assert!(!out.completed);
    assert!(d.notes().is_empty());
}

#[test]
fn dependencies_resolve_forward_references() {
    let (d, out) = parse("[Build] starts at [Design]'s end\n[Design] lasts 3 days\n[Build] lasts 2 days");
    assert!(out.is_ok(), "{:?}", out.diagnostics);
    assert_eq!(d.task("Build").unwrap().starts_after.as_deref(), Some("Design"));
    assert_eq!(d.start_day("Build"), Some(3));
}

#[test]
fn dependency_on_unknown_task_is_reported_on_pass_two() {
    let options = ParseOptions { error_policy: ErrorPolicy::Continue, ..ParseOptions::default() };
    let mut d = GanttDiagram::default();
    let out = parse_with("[A] lasts 1 day\n[A] starts at [Ghost]'s end", gantt::registry().unwrap(), &mut d, &options);
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].pass, 2);
    assert_eq!(out.diagnostics[0].error.message, "No such task Ghost");
    assert_eq!(out.diagnostics[0].error.location, Some(LineLocation::new(2)));
}

#[test]
fn long_dependency_chain_has_no_start_day() {
    let source = "\
[A] lasts 4294967295 days
[B] lasts 4294967295 days
[C] lasts 1 day
[B] starts at [A]'s end
[C] starts at [B]'s end";
    let (d, out) = parse(source);
    assert!(out.is_ok(), "{:?}", out.diagnostics);
    assert_eq!(d.start_day("B"), Some(u32::MAX));
    assert_eq!(d.start_day("C"), None);
    assert!(d.summary().iter().any(|line| line.starts_with("task [C] day ? ")));
}

#[test]
fn note_lines_lose_their_indentation() {
    let (d, out) = parse("note bottom\n    outer\n      inner\nend note");
    assert!(out.is_ok(), "{:?}", out.diagnostics);
    assert_eq!(d.notes()[0].lines, vec!["outer", "inner"]);
}

#[test]
fn colors_collect_repeatable_captures() {
    let (d, out) = parse("[A] is colored in Red/Blue\n[A] lasts 1 day\n[B] lasts 1 day\n[B] is colored in #ccffcc");
    assert!(out.is_ok(), "{:?}", out.diagnostics);
    let a = d.task("A").unwrap();
    assert_eq!(a.fill_color.as_deref(), Some("Red"));
    assert_eq!(a.line_color.as_deref(), Some("Blue"));
    let b = d.task("B").unwrap();
    assert_eq!(b.fill_color.as_deref(), Some("#ccffcc"));
    assert_eq!(b.line_color, None);
}

#[test]
fn common_commands_apply_once() {
    let (d, out) = parse("title Roadmap\n[A] lasts 1 day\nfooter v1");
    assert!(out.is_ok());
    assert_eq!(d.common().title().lines, vec!["Roadmap"]);
    assert_eq!(d.common().footer().lines, vec!["v1"]);
    assert_eq!(out.metrics.passes.len(), 2);
    assert_eq!(out.metrics.passes[1].skipped, 3);
}

#[test]
fn unknown_line_names_its_location() {
    let (_, out) = parse("[A] lasts 1 day\n[A] happens sometime");
    let err = out.first_error().unwrap();
    assert_eq!(err.kind, ErrorKind::NoMatch);
    assert_eq!(err.location, Some(LineLocation::new(2)));
}
