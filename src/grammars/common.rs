//! Commands shared by every titled diagram: title, caption, header/footer,
//! legend, main frame, skin parameters and the layout pragma.
//!
//! They only take effect on pass 1, so they can sit in registries of any
//! pass count without repeating their effect.

use crate::engine::{Atom, Block, BlockStrategy, Command, CommandError, GrammarError, Passes, Trim};
use crate::model::{HorizontalAlignment, LayoutEngine, Positioned, Titled};

/// Text with at least one visible character.
const TEXT: &str = r".*\S.*";
/// `title: x` or `title x`.
const SEPARATOR: &str = r"\s*:\s*|\s+";
const ALIGN: &str = "(?i:left|right|center)";

pub fn get<D: Titled + 'static>() -> Result<Vec<Command<D>>, GrammarError> {
    Ok(vec![
        title_block()?,
        title()?,
        caption()?,
        header_footer()?,
        legend()?,
        main_frame()?,
        skin_param()?,
        pragma_layout()?,
    ])
}

/// `title` ... `end title`
fn title_block<D: Titled + 'static>() -> Result<Command<D>, GrammarError> {
    command! {
        name: "title (block)",
        pattern: [Atom::start(), Atom::lit_ci("title"), Atom::end()],
        end: [Atom::start(), Atom::lit_ci("end"), Atom::spaces0(), Atom::lit_ci("title"), Atom::end()],
        strategy: BlockStrategy::KEEP.with_trim(Trim::BOTH),
        passes: Passes::Only(1),
        action: |diagram: &mut D, inv| {
            let lines = inv.block.map(Block::to_display).unwrap_or_default();
            diagram.common_mut().set_title(Positioned::new(lines, HorizontalAlignment::Center));
            Ok(())
        }
    }
}

fn title<D: Titled + 'static>() -> Result<Command<D>, GrammarError> {
    command! {
        name: "title",
        pattern: [
            Atom::start(),
            Atom::lit_ci("title"),
            Atom::capture("SEP", SEPARATOR),
            Atom::capture("TITLE", TEXT),
            Atom::end(),
        ],
        passes: Passes::Only(1),
        action: |diagram: &mut D, inv| {
            let text = inv.require("TITLE")?.trim().to_string();
            diagram.common_mut().set_title(Positioned::new(vec![text], HorizontalAlignment::Center));
            Ok(())
        }
    }
}

fn caption<D: Titled + 'static>() -> Result<Command<D>, GrammarError> {
    command! {
        name: "caption",
        pattern: [
            Atom::start(),
            Atom::lit_ci("caption"),
            Atom::capture("SEP", SEPARATOR),
            Atom::capture("CAPTION", TEXT),
            Atom::end(),
        ],
        passes: Passes::Only(1),
        action: |diagram: &mut D, inv| {
            let text = inv.require("CAPTION")?.trim().to_string();
            diagram.common_mut().set_caption(Positioned::new(vec![text], HorizontalAlignment::Center));
            Ok(())
        }
    }
}

/// `[left|right|center] header|footer <text>`
fn header_footer<D: Titled + 'static>() -> Result<Command<D>, GrammarError> {
    command! {
        name: "header/footer",
        pattern: [
            Atom::start(),
            Atom::capture("ALIGN", ALIGN).optional(),
            Atom::spaces0(),
            Atom::capture("KIND", "(?i:header|footer)"),
            Atom::capture("SEP", SEPARATOR),
            Atom::capture("TEXT", TEXT),
            Atom::end(),
        ],
        passes: Passes::Only(1),
        action: |diagram: &mut D, inv| {
            let is_header = inv.require("KIND")?.eq_ignore_ascii_case("header");
            let default = if is_header { HorizontalAlignment::Right } else { HorizontalAlignment::Center };
            let alignment = inv.get("ALIGN").and_then(HorizontalAlignment::from_name).unwrap_or(default);
            let section = Positioned::new(vec![inv.require("TEXT")?.trim().to_string()], alignment);

            let common = diagram.common_mut();
            if is_header { common.set_header(section) } else { common.set_footer(section) }
            Ok(())
        }
    }
}

/// `legend [left|right|center]` ... `end legend`
fn legend<D: Titled + 'static>() -> Result<Command<D>, GrammarError> {
    command! {
        name: "legend",
        pattern: [
            Atom::start(),
            Atom::lit_ci("legend"),
            Atom::spaces0(),
            Atom::capture("ALIGN", ALIGN).optional(),
            Atom::end(),
        ],
        end: [Atom::start(), Atom::lit_ci("end"), Atom::spaces0(), Atom::lit_ci("legend"), Atom::end()],
        strategy: BlockStrategy::KEEP.with_trim(Trim::RIGHT),
        passes: Passes::Only(1),
        action: |diagram: &mut D, inv| {
            let lines = inv.block.cloned().map(Block::remove_empty_columns).map(|b| b.to_display()).unwrap_or_default();
            if lines.iter().all(|l| l.is_empty()) {
                return Err(CommandError::semantic("No legend defined"));
            }
            let alignment = inv.get("ALIGN").and_then(HorizontalAlignment::from_name).unwrap_or_default();
            diagram.common_mut().set_legend(Positioned::new(lines, alignment));
            Ok(())
        }
    }
}

fn main_frame<D: Titled + 'static>() -> Result<Command<D>, GrammarError> {
    command! {
        name: "mainframe",
        pattern: [Atom::start(), Atom::lit_ci("mainframe"), Atom::spaces1(), Atom::capture("LABEL", TEXT), Atom::end()],
        passes: Passes::Only(1),
        action: |diagram: &mut D, inv| {
            diagram.common_mut().set_main_frame(vec![inv.require("LABEL")?.trim().to_string()]);
            Ok(())
        }
    }
}

/// `skinparam <name> <value>`
fn skin_param<D: Titled + 'static>() -> Result<Command<D>, GrammarError> {
    command! {
        name: "skinparam",
        pattern: [
            Atom::start(),
            Atom::lit_ci("skinparam"),
            Atom::spaces1(),
            Atom::capture("NAME", r"[\w.]+"),
            Atom::spaces1(),
            Atom::capture("VALUE", TEXT),
            Atom::end(),
        ],
        passes: Passes::Only(1),
        action: |diagram: &mut D, inv| {
            diagram.common_mut().set_param(inv.require("NAME")?, inv.require("VALUE")?.trim());
            Ok(())
        }
    }
}

/// `!pragma layout <engine>`
fn pragma_layout<D: Titled + 'static>() -> Result<Command<D>, GrammarError> {
    command! {
        name: "pragma layout",
        pattern: [
            Atom::start(),
            Atom::lit("!pragma"),
            Atom::spaces1(),
            Atom::lit_ci("layout"),
            Atom::spaces1(),
            Atom::capture("ENGINE", r"\w+"),
            Atom::spaces0(),
            Atom::end(),
        ],
        passes: Passes::Only(1),
        action: |diagram: &mut D, inv| {
            let name = inv.require("ENGINE")?;
            let engine = LayoutEngine::from_name(name)
                .ok_or_else(|| CommandError::semantic(format!("Unknown layout engine {name}")))?;
            diagram.common_mut().set_layout(engine);
            Ok(())
        }
    }
}
