use std::fmt;

mod chain;
mod cursor;
mod words;

use chain::{LineChain, NodeId};
pub use words::{LineCursor, WordList};
use words::char_to_byte_idx;

/// A cursor position on one line, in either addressing form. Both forms
/// resolve to the same logical position; `WordList::set_cursor` is the
/// single conversion point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorAddress {
    /// Character count from the start of the line.
    Linear(usize),
    /// Word index plus character offset within that word.
    WordOffset { word: usize, offset: usize },
}

/// What the renderer must repaint after an operation. Boundary moves that
/// change nothing report `NoOp` and leave every flag untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refresh {
    Whole,
    Cursor,
    NoOp,
}

/// Per-line repaint state, reset to `Clean` once the renderer has drawn
/// the line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Freshness {
    Whole,
    Cursor,
    Clean,
}

/// The closed set of operations a front end can drive the field with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    InsertChar(char),
    DeleteForward,
    DeleteBackward,
    PrevChar,
    NextChar,
    PrevWord,
    NextWord,
    LineStart,
    LineEnd,
    PrevLine,
    NextLine,
    DocumentStart,
    DocumentEnd,
}

/// Structural invariant violations. These signal caller errors, not user
/// input: every operation validates its preconditions before mutating, so
/// a failed call leaves both lines exactly as they were.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvariantError {
    /// A paragraph-end marker would migrate onto a non-empty line.
    ParagraphMarkerTarget,
    /// A pull would move content across this line's own paragraph end.
    PullPastParagraphEnd,
    /// Forward delete at the end of a line's last word.
    DeleteAtLineEnd,
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParagraphMarkerTarget => {
                write!(f, "paragraph-end marker pushed onto a non-empty line")
            }
            Self::PullPastParagraphEnd => {
                write!(f, "pull across this line's own paragraph end")
            }
            Self::DeleteAtLineEnd => {
                write!(f, "forward delete at the end of the line's last word")
            }
        }
    }
}

impl std::error::Error for InvariantError {}

/// Construction options for a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    /// Column budget of every display line.
    pub width: usize,
    /// Columns a paragraph's first line gives up to indentation.
    pub indent: usize,
    /// Initial scroll offset: viewport row 0 shows chain row `headshift`.
    pub headshift: isize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            width: 50,
            indent: 4,
            headshift: 0,
        }
    }
}

/// A multi-paragraph, word-wrapped text field.
///
/// The document owns a chain of display lines, each within the column
/// budget, and a cursor that lives on exactly one of them. Every editing
/// operation re-wraps the affected paragraph before returning, so the
/// width bound and the single-focus invariant hold between any two calls.
#[derive(Debug)]
pub struct Document {
    chain: LineChain,
    current: NodeId,
    headshift: isize,
}

impl Document {
    /// Build a field from plain text. Paragraphs are separated by `'\n'`,
    /// words by whitespace runs; runs collapse to single separators (the
    /// same normalization `to_text` emits).
    ///
    /// # Panics
    ///
    /// Panics if `options.width` does not exceed `options.indent`. The
    /// width must also exceed the longest word that will ever be entered,
    /// or that word cannot be made to fit on any line.
    pub fn new(text: &str, options: Options) -> Result<Self, InvariantError> {
        assert!(
            options.width > options.indent,
            "field width must exceed the paragraph indent"
        );
        let mut paragraphs: Vec<&str> = text.split('\n').collect();
        while paragraphs.len() > 1 && paragraphs.last().is_some_and(|p| p.is_empty()) {
            paragraphs.pop();
        }
        let mut chain = LineChain::new(options.width, options.indent, paragraphs[0]);
        for paragraph in &paragraphs[1..] {
            chain.append_paragraph(paragraph);
        }
        chain.mark_all_dirty();
        let head = chain.head();
        let mut document = Self {
            chain,
            current: head,
            headshift: options.headshift,
        };
        document.chain.reflow_from(head)?;
        document.chain.node_mut(head).line.set_focused(true);
        document.chain.node_mut(head).line.to_line_start();
        Ok(document)
    }

    /// Dispatch one operation from the closed set.
    pub fn apply(&mut self, operation: Operation) -> Result<Refresh, InvariantError> {
        match operation {
            Operation::InsertChar(ch) => self.insert_char(ch),
            Operation::DeleteForward => self.delete_forward(),
            Operation::DeleteBackward => self.delete_backward(),
            Operation::PrevChar => Ok(self.prev_char()),
            Operation::NextChar => Ok(self.next_char()),
            Operation::PrevWord => Ok(self.prev_word()),
            Operation::NextWord => Ok(self.next_word()),
            Operation::LineStart => Ok(self.line_start()),
            Operation::LineEnd => Ok(self.line_end()),
            Operation::PrevLine => Ok(self.prev_line()),
            Operation::NextLine => Ok(self.next_line()),
            Operation::DocumentStart => Ok(self.document_start()),
            Operation::DocumentEnd => Ok(self.document_end()),
        }
    }

    /// Insert a character at the cursor. `'\n'` splits the paragraph.
    pub fn insert_char(&mut self, ch: char) -> Result<Refresh, InvariantError> {
        if ch == '\n' {
            return self.split_paragraph();
        }
        self.chain.node_mut(self.current).line.insert_char(ch);
        self.chain.mark_fresh(self.current, Freshness::Cursor);
        self.chain.node_mut(self.current).needs_reflow = true;
        self.settle()?;
        Ok(Refresh::Whole)
    }

    /// Reposition the cursor on the current line, then insert.
    pub fn insert_char_at(
        &mut self,
        ch: char,
        at: CursorAddress,
    ) -> Result<Refresh, InvariantError> {
        self.place_cursor(at);
        self.insert_char(ch)
    }

    /// Remove the character after the cursor.
    ///
    /// At a paragraph end this clears the paragraph marker instead, so the
    /// following paragraph merges into this one; the re-wrap then pulls
    /// its content up as far as the width allows. At the very end of the
    /// field there is nothing to remove and the call is a no-op.
    pub fn delete_forward(&mut self) -> Result<Refresh, InvariantError> {
        let at_line_end = self.chain.node(self.current).line.is_at_line_end();
        if self.chain.node(self.current).line.ends_paragraph() && at_line_end {
            self.chain.node_mut(self.current).line.set_eop(false);
            if let Some(next) = self.chain.next(self.current) {
                self.chain.mark_fresh(next, Freshness::Whole);
                self.chain.node_mut(next).needs_reflow = true;
            }
        } else {
            let mut separator_gone = false;
            if at_line_end {
                if self.chain.next(self.current).is_none() {
                    return Ok(Refresh::NoOp);
                }
                // Bring the character to merge onto this line first. When
                // the line was blank the pulled word replaces the
                // placeholder and the separator is already gone.
                separator_gone = self.chain.node(self.current).line.is_empty();
                self.chain.pull_from_next(self.current)?;
            }
            if !separator_gone {
                self.chain.node_mut(self.current).line.delete_char_forward()?;
            }
        }
        self.chain.mark_fresh(self.current, Freshness::Cursor);
        self.chain.node_mut(self.current).needs_reflow = true;
        self.settle()?;
        Ok(Refresh::Whole)
    }

    /// Reposition the cursor on the current line, then delete forward.
    pub fn delete_forward_at(&mut self, at: CursorAddress) -> Result<Refresh, InvariantError> {
        self.place_cursor(at);
        self.delete_forward()
    }

    /// Remove the character before the cursor: one step back, then a
    /// forward delete. A strict no-op at the start of the field.
    pub fn delete_backward(&mut self) -> Result<Refresh, InvariantError> {
        if self.prev_char() == Refresh::NoOp {
            return Ok(Refresh::NoOp);
        }
        self.delete_forward()
    }

    /// Reposition the cursor on the current line, then delete backward.
    pub fn delete_backward_at(&mut self, at: CursorAddress) -> Result<Refresh, InvariantError> {
        self.place_cursor(at);
        self.delete_backward()
    }

    /// Resolve a cursor address on the current line.
    pub fn place_cursor(&mut self, at: CursorAddress) {
        self.chain.node_mut(self.current).line.set_cursor(at);
    }

    fn split_paragraph(&mut self) -> Result<Refresh, InvariantError> {
        let linear = self.chain.node(self.current).line.cursor().linear;
        let text = self.chain.node(self.current).line.text();
        let (prefix, suffix) = text.split_at(char_to_byte_idx(&text, linear));
        self.chain.node_mut(self.current).line.set_eop(true);
        if !suffix.is_empty() {
            self.chain.node_mut(self.current).line.reinit(prefix, linear);
            self.chain.insert_after(self.current, suffix);
        }
        self.focus_next_line(Some(0));
        self.chain.mark_fresh(self.current, Freshness::Cursor);
        self.chain.node_mut(self.current).needs_reflow = true;
        self.settle()?;
        Ok(Refresh::Whole)
    }

    /// Re-wrap from the predecessor of the edited line forward, then
    /// re-seat focus: a transfer may have carried the cursor onto a
    /// neighboring line.
    fn settle(&mut self) -> Result<(), InvariantError> {
        let start = self.chain.prev(self.current).unwrap_or(self.current);
        self.chain.reflow_from(start)?;
        if self.chain.node(self.current).line.is_at_line_start() {
            if let Some(prev) = self.chain.prev(self.current) {
                self.chain.mark_fresh(prev, Freshness::Whole);
            }
        }
        self.resolve_focus();
        Ok(())
    }

    fn resolve_focus(&mut self) {
        if self.chain.node(self.current).line.focused() {
            return;
        }
        let neighbors = [self.chain.prev(self.current), self.chain.next(self.current)];
        for id in neighbors.into_iter().flatten() {
            if self.chain.node(id).line.focused() {
                self.current = id;
                return;
            }
        }
        // A bulk re-wrap can carry the cursor further than one line.
        if let Some(id) = self.chain.ids().find(|&id| self.chain.node(id).line.focused()) {
            self.current = id;
        }
    }

    /// Change the column budget of every line and re-wrap the whole field.
    ///
    /// # Panics
    ///
    /// Panics if `width` does not exceed the configured indent.
    pub fn set_width(&mut self, width: usize) -> Result<Refresh, InvariantError> {
        assert!(
            width > self.chain.indent(),
            "field width must exceed the paragraph indent"
        );
        self.chain.set_width(width);
        let head = self.chain.head();
        self.chain.reflow_from(head)?;
        self.resolve_focus();
        Ok(Refresh::Whole)
    }

    pub fn width(&self) -> usize {
        self.chain.width()
    }

    pub fn indent(&self) -> usize {
        self.chain.indent()
    }

    /// Adjust the scroll offset; every line then needs a whole repaint.
    pub fn scroll_by(&mut self, rows: isize) {
        self.headshift += rows;
        self.chain.mark_all_whole();
    }

    pub fn headshift(&self) -> isize {
        self.headshift
    }

    /// Cursor row relative to the viewport; negative when scrolled past.
    pub fn cursor_row(&self) -> isize {
        self.chain.row(self.current) as isize - self.headshift
    }

    /// Cursor column on the display line, indent included.
    pub fn cursor_column(&self) -> usize {
        let linear = self.chain.node(self.current).line.cursor().linear;
        if self.chain.is_paragraph_start(self.current) {
            linear + self.chain.indent()
        } else {
            linear
        }
    }

    /// Cursor position on the current line, in all three addressing forms.
    pub fn cursor(&self) -> LineCursor {
        self.chain.node(self.current).line.cursor()
    }

    /// The line shown on a viewport row, if any.
    pub fn line_at(&self, viewport_row: usize) -> Option<LineView<'_>> {
        let steps = viewport_row as isize + self.headshift;
        if steps < 0 {
            return None;
        }
        let id = self.chain.node_at(steps as usize)?;
        Some(LineView {
            chain: &self.chain,
            id,
        })
    }

    /// Every display line in chain order; lazy and restartable.
    pub fn lines(&self) -> impl Iterator<Item = LineView<'_>> {
        self.chain.ids().map(|id| LineView {
            chain: &self.chain,
            id,
        })
    }

    pub fn line_count(&self) -> usize {
        self.chain.len()
    }

    /// Acknowledge a repaint of one viewport row.
    pub fn mark_line_clean(&mut self, viewport_row: usize) {
        let steps = viewport_row as isize + self.headshift;
        if steps < 0 {
            return;
        }
        if let Some(id) = self.chain.node_at(steps as usize) {
            self.chain.node_mut(id).set_clean();
        }
    }

    /// The field as plain text: words rejoined with single spaces, lines
    /// of a paragraph rejoined with single spaces, paragraphs rejoined
    /// with `'\n'`. Whitespace runs in the input are not preserved; this
    /// is the normalization `new` documents.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let mut prev_eop = false;
        let mut first = true;
        for id in self.chain.ids() {
            if !first {
                out.push(if prev_eop { '\n' } else { ' ' });
            }
            let line = &self.chain.node(id).line;
            out.push_str(&line.export_text());
            prev_eop = line.ends_paragraph();
            first = false;
        }
        out
    }

    /// One display string per line, in chain order.
    pub fn line_texts(&self) -> impl Iterator<Item = String> + '_ {
        self.chain.ids().map(|id| self.chain.node(id).line.text())
    }
}

/// Read-only view of one display line, as the renderer consumes it.
#[derive(Clone, Copy)]
pub struct LineView<'a> {
    chain: &'a LineChain,
    id: NodeId,
}

impl LineView<'_> {
    /// 0-based position in the chain.
    pub fn row(&self) -> usize {
        self.chain.row(self.id)
    }

    /// The raw line text, words joined with single spaces.
    pub fn text(&self) -> String {
        self.chain.node(self.id).line.text()
    }

    /// The display string: the raw text behind the paragraph indent on a
    /// paragraph's first line.
    pub fn display_text(&self) -> String {
        let text = self.chain.node(self.id).line.text();
        if self.chain.is_paragraph_start(self.id) {
            let mut padded = " ".repeat(self.chain.indent());
            padded.push_str(&text);
            padded
        } else {
            text
        }
    }

    /// The display string from a column on, for partial repaints.
    pub fn visible_text(&self, from_column: usize) -> String {
        self.display_text().chars().skip(from_column).collect()
    }

    /// Cursor column on this line, indent included. Only meaningful on
    /// the focused line.
    pub fn cursor_column(&self) -> usize {
        let linear = self.chain.node(self.id).line.cursor().linear;
        if self.chain.is_paragraph_start(self.id) {
            linear + self.chain.indent()
        } else {
            linear
        }
    }

    pub fn freshness(&self) -> Freshness {
        self.chain.node(self.id).freshness()
    }

    pub fn is_paragraph_start(&self) -> bool {
        self.chain.is_paragraph_start(self.id)
    }

    pub fn ends_paragraph(&self) -> bool {
        self.chain.node(self.id).line.ends_paragraph()
    }

    pub fn is_focused(&self) -> bool {
        self.chain.node(self.id).line.focused()
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod buffer_tests;
