//! Pattern atoms and the pattern compiler.
//!
//! A command's syntax is declared as an ordered list of [`Atom`]s. The list is
//! compiled once (at registry-build time) into a single `regex::Regex` and the
//! capture groups are remembered by slot, so matching a line hands back a
//! [`Captures`] map keyed by the names the command author chose.
//!
//! ```text
//! [Start, Literal("@"), Capture("PLAYER", "[\p{L}\p{N}_.]+"), Spaces0, End]
//!    │
//!    └─ compile ──▶ ^@(?P<g0>[\p{L}\p{N}_.]+)\s*$      slots: [("PLAYER", #0)]
//!
//! "@WB"  ──match_line──▶ Some({ PLAYER: ["WB"] })
//! "@ WB" ──match_line──▶ None
//! ```
//!
//! ## Invariants
//!
//! - Every pattern starts with [`Atom::Start`] and ends with [`Atom::End`];
//!   anchors anywhere else are rejected. Unanchored substring search is never
//!   used by the engine.
//! - A capture name appears once per pattern unless *every* occurrence is
//!   marked repeatable.
//! - Atoms contribute no implicit whitespace: authors place `spaces0()` /
//!   `spaces1()` where the syntax allows blanks.
//!
//! Internally each capture becomes an anonymous-looking `g<slot>` group, which
//! keeps user-facing names free of regex naming restrictions and lets the same
//! name repeat.

use super::result::GrammarError;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// The smallest grammar unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    /// Literal text, regex-escaped at compile time.
    Literal { text: Arc<str>, case_insensitive: bool, optional: bool },
    /// A named group around a regular sub-pattern.
    Capture { name: Arc<str>, pattern: Arc<str>, optional: bool, repeatable: bool },
    Start,
    End,
    SpaceZeroOrMore,
    SpaceOneOrMore,
    /// `optional()` / `repeatable()` applied to an atom that cannot carry it.
    /// [`Pattern::new`] rejects it.
    Misapplied { modifier: &'static str, atom: Box<Atom> },
}

impl Atom {
    pub fn start() -> Self {
        Atom::Start
    }

    pub fn end() -> Self {
        Atom::End
    }

    /// Case-sensitive literal.
    pub fn lit(text: &str) -> Self {
        Atom::Literal { text: Arc::from(text), case_insensitive: false, optional: false }
    }

    /// Case-insensitive literal.
    pub fn lit_ci(text: &str) -> Self {
        Atom::Literal { text: Arc::from(text), case_insensitive: true, optional: false }
    }

    /// Required capture of `pattern` under `name`.
    pub fn capture(name: &str, pattern: &str) -> Self {
        Atom::Capture { name: Arc::from(name), pattern: Arc::from(pattern), optional: false, repeatable: false }
    }

    pub fn spaces0() -> Self {
        Atom::SpaceZeroOrMore
    }

    pub fn spaces1() -> Self {
        Atom::SpaceOneOrMore
    }

    /// Mark a capture or literal as optional. Optional blanks are
    /// `spaces0()`; anchors cannot be optional.
    pub fn optional(self) -> Self {
        match self {
            Atom::Capture { name, pattern, repeatable, .. } => {
                Atom::Capture { name, pattern, optional: true, repeatable }
            }
            Atom::Literal { text, case_insensitive, .. } => Atom::Literal { text, case_insensitive, optional: true },
            Atom::SpaceZeroOrMore | Atom::SpaceOneOrMore => Atom::SpaceZeroOrMore,
            misapplied @ Atom::Misapplied { .. } => misapplied,
            other => Atom::Misapplied { modifier: "optional", atom: Box::new(other) },
        }
    }

    /// Mark a capture as repeatable. Only captures can repeat.
    pub fn repeatable(self) -> Self {
        match self {
            Atom::Capture { name, pattern, optional, .. } => {
                Atom::Capture { name, pattern, optional, repeatable: true }
            }
            misapplied @ Atom::Misapplied { .. } => misapplied,
            other => Atom::Misapplied { modifier: "repeatable", atom: Box::new(other) },
        }
    }

    fn to_regex(&self, slot: usize) -> String {
        match self {
            Atom::Start => "^".to_string(),
            Atom::End => "$".to_string(),
            Atom::SpaceZeroOrMore => r"\s*".to_string(),
            Atom::SpaceOneOrMore => r"\s+".to_string(),
            Atom::Literal { text, case_insensitive, optional } => {
                let text = regex::escape(text);
                let text = if *case_insensitive { format!("(?i:{text})") } else { text };
                if *optional { format!("(?:{text})?") } else { text }
            }
            Atom::Misapplied { .. } => String::new(),
            Atom::Capture { pattern, optional, .. } => {
                let group = format!("(?P<g{slot}>{pattern})");
                if *optional { format!("(?:{group})?") } else { group }
            }
        }
    }
}

/// A compiled, fully anchored pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    label: Arc<str>,
    atoms: Vec<Atom>,
    regex: Regex,
    /// Capture names by slot (`g<slot>` in the compiled regex).
    slots: Vec<Arc<str>>,
    /// Leading case-sensitive literal, used to reject lines before running the regex.
    prefix: Option<Arc<str>>,
}

impl Pattern {
    /// Validate and compile `atoms`.
    ///
    /// `label` only identifies the pattern in diagnostics and logs.
    pub fn new(label: &str, atoms: Vec<Atom>) -> Result<Self, GrammarError> {
        let label: Arc<str> = Arc::from(label);
        if let Some(Atom::Misapplied { modifier, atom }) = atoms.iter().find(|a| matches!(a, Atom::Misapplied { .. })) {
            return Err(GrammarError::InvalidModifier {
                label: label.to_string(),
                modifier: *modifier,
                atom: format!("{atom:?}"),
            });
        }
        let anchored = matches!(atoms.first(), Some(Atom::Start))
            && matches!(atoms.last(), Some(Atom::End))
            && atoms.len() >= 2
            && atoms[1..atoms.len() - 1].iter().all(|a| !matches!(a, Atom::Start | Atom::End));
        if !anchored {
            return Err(GrammarError::Unanchored { label: label.to_string() });
        }

        // name -> all occurrences repeatable so far
        let mut seen: HashMap<&str, bool> = HashMap::new();
        let mut slots = Vec::new();
        let mut source = String::new();

        for atom in &atoms {
            if let Atom::Capture { name, repeatable, .. } = atom {
                if name.is_empty() {
                    return Err(GrammarError::EmptyCaptureName { label: label.to_string() });
                }
                match seen.get(&**name) {
                    Some(&previous) if !(previous && *repeatable) => {
                        return Err(GrammarError::DuplicateCapture {
                            label: label.to_string(),
                            name: name.to_string(),
                        });
                    }
                    _ => {
                        seen.insert(&**name, *repeatable);
                    }
                }
                source.push_str(&atom.to_regex(slots.len()));
                slots.push(name.clone());
            } else {
                source.push_str(&atom.to_regex(0));
            }
        }

        let regex = Regex::new(&source)
            .map_err(|source| GrammarError::InvalidRegex { label: label.to_string(), source })?;

        let prefix = match atoms.get(1) {
            Some(Atom::Literal { text, case_insensitive: false, optional: false }) if !text.is_empty() => {
                Some(text.clone())
            }
            _ => None,
        };

        Ok(Pattern { label, atoms, regex, slots, prefix })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// The compiled regular expression (useful when debugging a grammar).
    pub fn as_regex(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        if !self.prefix_allows(text) {
            return false;
        }
        self.regex.is_match(text)
    }

    /// Match `text` as a whole line and extract the named captures.
    ///
    /// Returns `None` on no match, never an empty success.
    pub fn match_line(&self, text: &str) -> Option<Captures> {
        if !self.prefix_allows(text) {
            return None;
        }
        let caps = self.regex.captures(text)?;
        let mut entries: BTreeMap<Arc<str>, Vec<String>> = BTreeMap::new();
        for (slot, name) in self.slots.iter().enumerate() {
            if let Some(m) = caps.name(&format!("g{slot}")) {
                entries.entry(name.clone()).or_default().push(m.as_str().to_string());
            }
        }
        tracing::trace!(pattern = %self.label, captures = entries.len(), "pattern matched");
        Some(Captures { entries })
    }

    fn prefix_allows(&self, text: &str) -> bool {
        self.prefix.as_deref().is_none_or(|p| text.starts_with(p))
    }
}

/// Named captures extracted by a successful match.
///
/// An entry exists only if its group took part in the match. Repeatable
/// captures hold one value per matching occurrence, in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    entries: BTreeMap<Arc<str>, Vec<String>>,
}

impl Captures {
    /// First (index 0) value captured under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_at(name, 0)
    }

    pub fn get_at(&self, name: &str, index: usize) -> Option<&str> {
        self.entries.get(name).and_then(|v| v.get(index)).map(String::as_str)
    }

    /// All values captured under `name`, index 0 first.
    pub fn all(&self, name: &str) -> Vec<&str> {
        self.entries.get(name).map(|v| v.iter().map(String::as_str).collect()).unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of `(name, index)` entries.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, index, value)` triples ordered by name then index.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize, &str)> {
        self.entries
            .iter()
            .flat_map(|(name, values)| values.iter().enumerate().map(move |(i, v)| (name.as_ref(), i, v.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_player() -> Pattern {
        Pattern::new(
            "at player",
            vec![Atom::start(), Atom::lit("@"), Atom::capture("PLAYER", r"[\p{L}\p{N}_.]+"), Atom::spaces0(), Atom::end()],
        )
        .unwrap()
    }

    #[test]
    fn compiles_atoms_in_order() {
        let p = at_player();
        assert_eq!(p.as_regex(), r"^@(?P<g0>[\p{L}\p{N}_.]+)\s*$");
        assert_eq!(p.label(), "at player");
    }

    #[test]
    fn extracts_named_capture() {
        let caps = at_player().match_line("@WB  ").unwrap();
        assert_eq!(caps.get("PLAYER"), Some("WB"));
        assert_eq!(caps.len(), 1);
    }

    #[test]
    fn no_implicit_whitespace_between_atoms() {
        assert!(at_player().match_line("@ WB").is_none());
    }

    #[test]
    fn altered_literal_does_not_match() {
        assert!(at_player().match_line("#WB").is_none());
        assert!(!at_player().is_match("#WB"));
    }

    #[test]
    fn matching_is_fully_anchored() {
        assert!(at_player().match_line("x @WB").is_none());
        assert!(at_player().match_line("@WB is").is_none());
    }

    #[test]
    fn literal_case_sensitivity() {
        let strict = Pattern::new("strict", vec![Atom::start(), Atom::lit("note"), Atom::end()]).unwrap();
        let loose = Pattern::new("loose", vec![Atom::start(), Atom::lit_ci("note"), Atom::end()]).unwrap();
        assert!(strict.is_match("note"));
        assert!(!strict.is_match("NOTE"));
        assert!(loose.is_match("NoTe"));
    }

    #[test]
    fn literal_text_is_escaped() {
        let p = Pattern::new("brackets", vec![Atom::start(), Atom::lit("[a.b]"), Atom::end()]).unwrap();
        assert!(p.is_match("[a.b]"));
        assert!(!p.is_match("[axb]"));
    }

    #[test]
    fn optional_capture_is_absent_when_unmatched() {
        let p = Pattern::new(
            "legend",
            vec![
                Atom::start(),
                Atom::lit("legend"),
                Atom::spaces0(),
                Atom::capture("ALIGN", "left|right").optional(),
                Atom::end(),
            ],
        )
        .unwrap();

        let bare = p.match_line("legend").unwrap();
        assert!(!bare.contains("ALIGN"));
        assert_eq!(bare.get("ALIGN"), None);
        assert!(bare.is_empty());

        let aligned = p.match_line("legend right").unwrap();
        assert_eq!(aligned.get("ALIGN"), Some("right"));
    }

    #[test]
    fn repeatable_captures_are_indexed_in_encounter_order() {
        let p = Pattern::new(
            "colors",
            vec![
                Atom::start(),
                Atom::capture("COLOR", r"\w+").repeatable(),
                Atom::lit("/"),
                Atom::capture("COLOR", r"\w+").repeatable(),
                Atom::lit("/"),
                Atom::capture("COLOR", r"\w+").repeatable().optional(),
                Atom::end(),
            ],
        )
        .unwrap();
        let caps = p.match_line("red/blue/green").unwrap();
        assert_eq!(caps.all("COLOR"), vec!["red", "blue", "green"]);
        assert_eq!(caps.get_at("COLOR", 1), Some("blue"));
        assert_eq!(caps.get_at("COLOR", 3), None);

        let two = p.match_line("red/blue/").unwrap();
        assert_eq!(two.all("COLOR"), vec!["red", "blue"]);
    }

    #[test]
    fn duplicate_non_repeatable_capture_is_rejected() {
        let err = Pattern::new(
            "dup",
            vec![Atom::start(), Atom::capture("A", "x"), Atom::capture("A", "y").repeatable(), Atom::end()],
        )
        .unwrap_err();
        assert!(matches!(err, GrammarError::DuplicateCapture { ref name, .. } if name == "A"));
    }

    #[test]
    fn unanchored_pattern_is_rejected() {
        let missing_end = Pattern::new("x", vec![Atom::start(), Atom::lit("a")]);
        assert!(matches!(missing_end, Err(GrammarError::Unanchored { .. })));

        let inner_anchor = Pattern::new("y", vec![Atom::start(), Atom::end(), Atom::lit("a"), Atom::end()]);
        assert!(matches!(inner_anchor, Err(GrammarError::Unanchored { .. })));
    }

    #[test]
    fn invalid_sub_pattern_is_a_grammar_error() {
        let err = Pattern::new("bad", vec![Atom::start(), Atom::capture("X", "(unclosed"), Atom::end()]).unwrap_err();
        assert!(matches!(err, GrammarError::InvalidRegex { .. }));
    }

    #[test]
    fn optional_literal_may_be_left_out() {
        let p = Pattern::new(
            "ends",
            vec![Atom::start(), Atom::lit("end"), Atom::lit(" ").optional(), Atom::lit("note"), Atom::end()],
        )
        .unwrap();
        assert!(p.is_match("end note"));
        assert!(p.is_match("endnote"));
        assert!(!p.is_match("end  note"));

        let leading = Pattern::new("lead", vec![Atom::start(), Atom::lit("!").optional(), Atom::lit("x"), Atom::end()])
            .unwrap();
        assert!(leading.is_match("x"));
        assert!(leading.is_match("!x"));
    }

    #[test]
    fn optional_blanks_become_spaces0() {
        assert_eq!(Atom::spaces1().optional(), Atom::spaces0());
    }

    #[test]
    fn modifiers_on_atoms_that_cannot_carry_them_are_rejected() {
        let repeated_literal = Pattern::new("rep", vec![Atom::start(), Atom::lit("x").repeatable(), Atom::end()]);
        assert!(matches!(
            repeated_literal,
            Err(GrammarError::InvalidModifier { modifier: "repeatable", .. })
        ));

        let optional_anchor = Pattern::new("opt", vec![Atom::start().optional(), Atom::lit("x"), Atom::end()]);
        assert!(matches!(optional_anchor, Err(GrammarError::InvalidModifier { modifier: "optional", .. })));

        let repeated_blank = Pattern::new("blank", vec![Atom::start(), Atom::spaces1().repeatable(), Atom::end()]);
        assert!(matches!(repeated_blank, Err(GrammarError::InvalidModifier { .. })));
    }

    #[test]
    fn empty_capture_name_is_rejected() {
        let err = Pattern::new("anon", vec![Atom::start(), Atom::capture("", "x"), Atom::end()]).unwrap_err();
        assert!(matches!(err, GrammarError::EmptyCaptureName { .. }));
    }
}
