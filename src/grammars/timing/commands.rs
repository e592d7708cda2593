use super::helpers::{display_name, resolve_time};
use crate::engine::{Atom, Command, CommandError, GrammarError, Passes};
use crate::model::{PlayerKind, TimingDiagram};

const PLAYER_CODE: &str = r"[\p{L}\p{N}_.]+";
/// `100`, `-5` or `+50` (relative).
const TIME: &str = r"[-+]?\d+";
const STATE: &str = r"\S.*";

/// Registration order matters: `@42` and `42 is x` are also valid
/// player-code forms, so the time commands come first.
pub fn get() -> Result<Vec<Command<TimingDiagram>>, GrammarError> {
    Ok(vec![declare_player()?, at_time()?, at_player()?, time_is_state()?, player_is_state()?])
}

/// `robust "Web Browser" as WB`, `concise User`
fn declare_player() -> Result<Command<TimingDiagram>, GrammarError> {
    command! {
        name: "declare player",
        pattern: [
            Atom::start(),
            Atom::capture("TYPE", "(?i:robust|concise|binary|clock)"),
            Atom::spaces1(),
            Atom::capture("FULL", r#""[^"]+"\s+as\s+"#).optional(),
            Atom::capture("CODE", PLAYER_CODE),
            Atom::spaces0(),
            Atom::end(),
        ],
        passes: Passes::Only(1),
        action: |diagram: &mut TimingDiagram, inv| {
            let keyword = inv.require("TYPE")?;
            let kind = PlayerKind::from_keyword(keyword)
                .ok_or_else(|| CommandError::semantic(format!("Unknown player type {keyword}")))?;
            let code = inv.require("CODE")?;
            let display = display_name(inv.get("FULL")).unwrap_or_else(|| code.to_string());
            diagram.create_player(kind, &display, code)
        }
    }
}

/// `@100`, `@+50`
fn at_time() -> Result<Command<TimingDiagram>, GrammarError> {
    command! {
        name: "at time",
        pattern: [Atom::start(), Atom::lit("@"), Atom::capture("TIME", TIME), Atom::spaces0(), Atom::end()],
        passes: Passes::From(2),
        action: |diagram: &mut TimingDiagram, inv| {
            let time = resolve_time(inv.require("TIME")?, diagram.now())?;
            diagram.set_now(time);
            Ok(())
        }
    }
}

/// `@WB`: later `<time> is <state>` lines refer to WB.
fn at_player() -> Result<Command<TimingDiagram>, GrammarError> {
    command! {
        name: "at player",
        pattern: [Atom::start(), Atom::lit("@"), Atom::capture("PLAYER", PLAYER_CODE), Atom::spaces0(), Atom::end()],
        passes: Passes::From(2),
        action: |diagram: &mut TimingDiagram, inv| {
            diagram.set_last_player(inv.require("PLAYER")?)
        }
    }
}

/// `100 is Idle`, for the player selected with `@CODE`.
fn time_is_state() -> Result<Command<TimingDiagram>, GrammarError> {
    command! {
        name: "time is state",
        pattern: [
            Atom::start(),
            Atom::capture("TIME", TIME),
            Atom::spaces1(),
            Atom::lit("is"),
            Atom::spaces1(),
            Atom::capture("STATE", STATE),
            Atom::end(),
        ],
        passes: Passes::From(2),
        action: |diagram: &mut TimingDiagram, inv| {
            let time = resolve_time(inv.require("TIME")?, diagram.now())?;
            diagram.add_state_for_last(time, inv.require("STATE")?)
        }
    }
}

/// `WB is Waiting`, at the current time.
fn player_is_state() -> Result<Command<TimingDiagram>, GrammarError> {
    command! {
        name: "player is state",
        pattern: [
            Atom::start(),
            Atom::capture("CODE", PLAYER_CODE),
            Atom::spaces1(),
            Atom::lit("is"),
            Atom::spaces1(),
            Atom::capture("STATE", STATE),
            Atom::end(),
        ],
        passes: Passes::From(2),
        action: |diagram: &mut TimingDiagram, inv| {
            diagram.add_state(inv.require("CODE")?, inv.require("STATE")?)
        }
    }
}
