use crate::engine::{Atom, BlockStrategy, Command, CommandError, GrammarError, Passes, Trim};
use crate::model::GanttDiagram;

/// Anything between the brackets of `[Task name]`.
const TASK: &str = r"[^\[\]]+";
const COLOR: &str = r"#?[\w]+";
/// `$tag1 $tag2`
const TAGS: &str = r"(?:\$[\p{L}\p{N}_]+\s*)+";
const STEREOTYPE: &str = r"<<.+>>";

pub fn get() -> Result<Vec<Command<GanttDiagram>>, GrammarError> {
    Ok(vec![task_duration()?, note_bottom()?, starts_after()?, colored()?])
}

/// `[Task] lasts 5 days`, `[Task] requires 2 weeks`
fn task_duration() -> Result<Command<GanttDiagram>, GrammarError> {
    command! {
        name: "task duration",
        pattern: [
            Atom::start(),
            Atom::lit("["),
            Atom::capture("TASK", TASK),
            Atom::lit("]"),
            Atom::spaces1(),
            Atom::capture("VERB", "lasts|requires"),
            Atom::spaces1(),
            Atom::capture("COUNT", r"\d+"),
            Atom::spaces1(),
            Atom::capture("UNIT", "days?|weeks?"),
            Atom::spaces0(),
            Atom::end(),
        ],
        passes: Passes::Only(1),
        action: |diagram: &mut GanttDiagram, inv| {
            let days = to_days(inv.require("COUNT")?, inv.require("UNIT")?)?;
            diagram.set_duration(inv.require("TASK")?.trim(), days);
            Ok(())
        }
    }
}

/// `note bottom` ... `end note`, attached to the last declared task.
fn note_bottom() -> Result<Command<GanttDiagram>, GrammarError> {
    command! {
        name: "note bottom",
        pattern: [
            Atom::start(),
            Atom::capture("TYPE", "note"),
            Atom::spaces0(),
            Atom::capture("POSITION", "bottom"),
            Atom::spaces0(),
            Atom::capture("TAGS", TAGS).optional(),
            Atom::spaces0(),
            Atom::capture("STEREO", STEREOTYPE).optional(),
            Atom::end(),
        ],
        end: [Atom::start(), Atom::lit("end"), Atom::spaces0(), Atom::lit("note"), Atom::end()],
        strategy: BlockStrategy::strip_quotes().with_trim(Trim::BOTH),
        passes: Passes::Only(1),
        action: |diagram: &mut GanttDiagram, inv| {
            let block = inv.block.ok_or_else(|| CommandError::semantic("No note defined"))?;
            let lines = block.to_display();
            let tags = inv.get("TAGS").map(split_tags).unwrap_or_default();
            let stereotype = inv.get("STEREO").map(|s| s.trim_start_matches("<<").trim_end_matches(">>").trim().to_string());
            diagram.add_note(lines, tags, stereotype)
        }
    }
}

/// `[B] starts at [A]'s end`. Either task may be declared later in the source.
fn starts_after() -> Result<Command<GanttDiagram>, GrammarError> {
    command! {
        name: "starts after",
        pattern: [
            Atom::start(),
            Atom::lit("["),
            Atom::capture("TASK", TASK),
            Atom::lit("]"),
            Atom::spaces1(),
            Atom::lit("starts"),
            Atom::spaces1(),
            Atom::lit("at"),
            Atom::spaces1(),
            Atom::lit("["),
            Atom::capture("OTHER", TASK),
            Atom::lit("]'s"),
            Atom::spaces1(),
            Atom::lit("end"),
            Atom::spaces0(),
            Atom::end(),
        ],
        passes: Passes::From(2),
        action: |diagram: &mut GanttDiagram, inv| {
            diagram.set_starts_after(inv.require("TASK")?.trim(), inv.require("OTHER")?.trim())
        }
    }
}

/// `[Task] is colored in Fill` or `[Task] is colored in Fill/Line`
fn colored() -> Result<Command<GanttDiagram>, GrammarError> {
    command! {
        name: "colored",
        pattern: [
            Atom::start(),
            Atom::lit("["),
            Atom::capture("TASK", TASK),
            Atom::lit("]"),
            Atom::spaces1(),
            Atom::lit("is"),
            Atom::spaces1(),
            Atom::lit("colored"),
            Atom::spaces1(),
            Atom::lit("in"),
            Atom::spaces1(),
            Atom::capture("COLOR", COLOR).repeatable(),
            Atom::capture("COLOR", &format!("/{COLOR}")).repeatable().optional(),
            Atom::spaces0(),
            Atom::end(),
        ],
        passes: Passes::From(2),
        action: |diagram: &mut GanttDiagram, inv| {
            let colors: Vec<&str> = inv.captures.all("COLOR").into_iter().map(|c| c.trim_start_matches('/')).collect();
            let fill = colors.first().copied().ok_or_else(|| CommandError::semantic("missing COLOR"))?;
            diagram.set_colors(inv.require("TASK")?.trim(), fill, colors.get(1).copied())
        }
    }
}

fn to_days(count: &str, unit: &str) -> Result<u32, CommandError> {
    let invalid = || CommandError::semantic(format!("Invalid duration {count} {unit}"));
    let count: u32 = count.parse().map_err(|_| invalid())?;
    if unit.starts_with("week") { count.checked_mul(7).ok_or_else(invalid) } else { Ok(count) }
}

fn split_tags(tags: &str) -> Vec<String> {
    tags.split_whitespace().map(|t| t.trim_start_matches('$').to_string()).collect()
}
