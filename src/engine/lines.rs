//! Line buffer and block extraction.
//!
//! The [`LineBuffer`] is a cursor over numbered source lines. Single-line
//! commands consume one line; block commands consume the opening line, the
//! interior, and the closing line in one step through
//! [`LineBuffer::extract_block`].
//!
//! ```text
//!  3 │ note bottom        ◀─ cursor (open pattern matched)
//!  4 │   'first           ┐
//!  5 │   'second          ┘  interior, cleaned by the BlockStrategy
//!  6 │ end note           ◀─ first line matching the end pattern
//!  7 │ ...                ◀─ cursor afterwards
//! ```
//!
//! A [`BlockStrategy`] decides what the interior looks like when it reaches
//! the action: leading quote markers can be stripped, then each line is trimmed
//! on the configured sides.

use super::pattern::Pattern;
use super::result::CommandError;
use crate::{LineLocation, SourceLine};

bitflags::bitflags! {
    /// Which sides of each block line to trim. The empty set keeps lines as-is.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Trim: u8 {
        const LEFT  = 1 << 0;
        const RIGHT = 1 << 1;
        const BOTH  = Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

/// Treatment of quote markers in block lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Multiline {
    #[default]
    KeepAsIs,
    /// Remove one leading `'` (after any indentation) from every line.
    RemoveStartingQuote,
}

/// Cleaning applied to the interior lines of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockStrategy {
    pub multiline: Multiline,
    pub trim: Trim,
}

impl Default for BlockStrategy {
    fn default() -> Self {
        Self::KEEP
    }
}

impl BlockStrategy {
    /// Lines reach the action untouched.
    pub const KEEP: BlockStrategy = BlockStrategy { multiline: Multiline::KeepAsIs, trim: Trim::empty() };

    pub const fn strip_quotes() -> Self {
        BlockStrategy { multiline: Multiline::RemoveStartingQuote, trim: Trim::empty() }
    }

    pub const fn with_trim(self, trim: Trim) -> Self {
        BlockStrategy { multiline: self.multiline, trim }
    }

    /// Clean one interior line.
    pub fn apply(&self, text: &str) -> String {
        let mut line = text;
        if self.multiline == Multiline::RemoveStartingQuote {
            if let Some(rest) = line.trim_start().strip_prefix('\'') {
                line = rest;
            }
        }
        if self.trim.contains(Trim::LEFT) {
            line = line.trim_start();
        }
        if self.trim.contains(Trim::RIGHT) {
            line = line.trim_end();
        }
        line.to_string()
    }
}

/// A block command's input: the opening and closing lines plus the cleaned
/// interior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    open: SourceLine,
    close: SourceLine,
    lines: Vec<SourceLine>,
}

impl Block {
    pub fn open(&self) -> &SourceLine {
        &self.open
    }

    pub fn close(&self) -> &SourceLine {
        &self.close
    }

    /// Interior lines, exclusive of the open and close lines.
    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Location of the first interior line, or of the opening line for an
    /// empty block.
    pub fn first_location(&self) -> LineLocation {
        self.lines.first().map_or(self.open.location, |l| l.location)
    }

    pub fn to_display(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.text.clone()).collect()
    }

    /// Remove the indentation shared by every non-blank interior line.
    pub fn remove_empty_columns(mut self) -> Self {
        let indent = self
            .lines
            .iter()
            .filter(|l| !l.text.trim().is_empty())
            .map(|l| l.text.chars().take_while(|c| c.is_whitespace()).count())
            .min()
            .unwrap_or(0);
        if indent > 0 {
            for line in &mut self.lines {
                line.text = line.text.chars().skip(indent).collect();
            }
        }
        self
    }
}

/// Ordered, line-numbered view over the source with a consumption cursor.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    lines: Vec<SourceLine>,
    cursor: usize,
}

impl LineBuffer {
    pub fn new(lines: Vec<SourceLine>) -> Self {
        LineBuffer { lines, cursor: 0 }
    }

    /// Split `text` into lines numbered from 1.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines().enumerate().map(|(i, l)| SourceLine::new(i + 1, l)).collect())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index of the next unconsumed line.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.lines.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.lines.len()
    }

    pub fn peek(&self) -> Option<&SourceLine> {
        self.lines.get(self.cursor)
    }

    /// Look `offset` lines past the cursor without consuming.
    pub fn peek_at(&self, offset: usize) -> Option<&SourceLine> {
        self.lines.get(self.cursor + offset)
    }

    /// Consume the current line.
    pub fn consume(&mut self) -> Option<SourceLine> {
        let line = self.lines.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(line)
    }

    /// Move the cursor back to the first line (start of a new pass).
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Consume a block that opens at the cursor and closes at the first later
    /// line whose trimmed text matches `end`.
    ///
    /// On success the cursor moves past the closing line. If input runs out
    /// first, nothing is consumed and the error points at the opening line.
    pub fn extract_block(&mut self, end: &Pattern, strategy: BlockStrategy) -> Result<Block, CommandError> {
        let open = self.peek().cloned().ok_or_else(CommandError::end_of_input)?;

        let close_idx = self.lines[self.cursor + 1..]
            .iter()
            .position(|l| end.is_match(l.trimmed()))
            .map(|offset| self.cursor + 1 + offset)
            .ok_or_else(|| CommandError::unterminated(open.location))?;

        let lines = self.lines[self.cursor + 1..close_idx]
            .iter()
            .map(|l| SourceLine { location: l.location, text: strategy.apply(&l.text) })
            .collect();
        let close = self.lines[close_idx].clone();
        self.cursor = close_idx + 1;

        Ok(Block { open, close, lines })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Atom;

    fn end_note() -> Pattern {
        Pattern::new("end note", vec![Atom::start(), Atom::lit("end"), Atom::spaces0(), Atom::lit("note"), Atom::end()])
            .unwrap()
    }

    #[test]
    fn lines_are_numbered_from_one() {
        let buf = LineBuffer::from_text("a\nb\n");
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.peek().unwrap().location, LineLocation::new(1));
        assert_eq!(buf.peek_at(1).unwrap().text, "b");
        assert!(buf.peek_at(2).is_none());
    }

    #[test]
    fn consume_and_rewind() {
        let mut buf = LineBuffer::from_text("a\nb");
        assert_eq!(buf.consume().unwrap().text, "a");
        assert_eq!(buf.remaining(), 1);
        buf.consume();
        assert!(buf.is_exhausted());
        assert!(buf.consume().is_none());
        buf.rewind();
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.peek().unwrap().text, "a");
    }

    #[test]
    fn extracts_interior_and_consumes_close() {
        let mut buf = LineBuffer::from_text("note bottom\n  one  \n two\nend note\nnext");
        let block = buf.extract_block(&end_note(), BlockStrategy::KEEP.with_trim(Trim::BOTH)).unwrap();

        assert_eq!(block.to_display(), vec!["one", "two"]);
        assert_eq!(block.open().location, LineLocation::new(1));
        assert_eq!(block.close().location, LineLocation::new(4));
        assert_eq!(block.first_location(), LineLocation::new(2));
        assert_eq!(buf.peek().unwrap().text, "next");
    }

    #[test]
    fn close_line_is_matched_trimmed() {
        let mut buf = LineBuffer::from_text("note\nx\n   end   note  ");
        let block = buf.extract_block(&end_note(), BlockStrategy::KEEP).unwrap();
        assert_eq!(block.len(), 1);
        assert!(buf.is_exhausted());
    }

    #[test]
    fn unterminated_block_consumes_nothing() {
        let mut buf = LineBuffer::from_text("x\nnote bottom\nbody");
        buf.consume();
        let err = buf.extract_block(&end_note(), BlockStrategy::KEEP).unwrap_err();

        assert_eq!(err, CommandError::unterminated(LineLocation::new(2)));
        assert_eq!(buf.position(), 1);
    }

    #[test]
    fn strip_quotes_removes_every_marker_and_keeps_line_count() {
        let source = "note bottom\n'alpha\n  'beta\n'\nend note";
        let mut buf = LineBuffer::from_text(source);
        let block = buf.extract_block(&end_note(), BlockStrategy::strip_quotes()).unwrap();

        assert_eq!(block.len(), source.lines().count() - 2);
        assert!(block.lines().iter().all(|l| !l.text.contains('\'')));
        assert_eq!(block.to_display(), vec!["alpha", "beta", ""]);
    }

    #[test]
    fn trim_sides() {
        let left = BlockStrategy::KEEP.with_trim(Trim::LEFT);
        let right = BlockStrategy::KEEP.with_trim(Trim::RIGHT);
        assert_eq!(left.apply("  a  "), "a  ");
        assert_eq!(right.apply("  a  "), "  a");
        assert_eq!(BlockStrategy::KEEP.apply("  a  "), "  a  ");
        assert_eq!(BlockStrategy::strip_quotes().with_trim(Trim::BOTH).apply("  ' a "), "a");
    }

    #[test]
    fn remove_empty_columns_strips_shared_indent() {
        let mut buf = LineBuffer::from_text("note\n    a\n      b\n\nend note");
        let block = buf.extract_block(&end_note(), BlockStrategy::KEEP).unwrap().remove_empty_columns();
        assert_eq!(block.to_display(), vec!["a", "  b", ""]);
    }
}
