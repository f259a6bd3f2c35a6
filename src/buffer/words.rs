use super::{CursorAddress, InvariantError};

/// Cursor position within one line, kept in all three addressing forms at
/// once. `linear` is always `sum(len(word) + 1 for words before word) + offset`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineCursor {
    pub word: usize,
    pub offset: usize,
    pub linear: usize,
}

/// One display line's worth of content, stored as words.
///
/// A line always holds at least one word; a single empty word represents a
/// blank line. `size` is the character length of the words joined with
/// single spaces and is maintained incrementally by every edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordList {
    words: Vec<String>,
    size: usize,
    focused: bool,
    eop: bool,
    cursor: LineCursor,
}

impl WordList {
    /// Build a line from raw text. Whitespace runs collapse into single
    /// word separators; this is the input normalization documented on
    /// `Document::to_text`.
    pub fn new(text: &str) -> Self {
        let mut line = Self {
            words: Vec::new(),
            size: 0,
            focused: false,
            eop: false,
            cursor: LineCursor::default(),
        };
        line.reinit(text, 0);
        line
    }

    /// Replace the line's content, keeping the focused/eop flags, and
    /// re-resolve the cursor at `linear` (clamped to the new content).
    pub fn reinit(&mut self, text: &str, linear: usize) {
        self.words = text.split_whitespace().map(String::from).collect();
        if self.words.is_empty() {
            self.words.push(String::new());
        }
        self.refresh_size();
        self.set_linear(linear);
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cursor(&self) -> LineCursor {
        self.cursor
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    pub(crate) fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn ends_paragraph(&self) -> bool {
        self.eop
    }

    pub(crate) fn set_eop(&mut self, eop: bool) {
        self.eop = eop;
    }

    /// The line as displayed: words joined with single spaces. Words that
    /// were emptied by edits still contribute their separators here.
    pub fn text(&self) -> String {
        self.words.join(" ")
    }

    /// The line as exported: emptied words and their separators dropped.
    pub fn export_text(&self) -> String {
        let kept: Vec<&str> = self
            .words
            .iter()
            .filter(|word| !word.is_empty())
            .map(String::as_str)
            .collect();
        kept.join(" ")
    }

    pub fn first_word_len(&self) -> usize {
        char_len(&self.words[0])
    }

    pub fn is_empty(&self) -> bool {
        self.words.len() == 1 && self.words[0].is_empty()
    }

    pub fn is_at_line_start(&self) -> bool {
        self.cursor.linear == 0
    }

    pub fn is_at_line_end(&self) -> bool {
        self.cursor.word >= self.words.len() - 1 && self.is_at_word_end()
    }

    pub fn is_at_word_end(&self) -> bool {
        self.cursor.offset == char_len(&self.words[self.cursor.word])
    }

    fn refresh_size(&mut self) {
        self.size = char_len(&self.text());
    }

    /// Resolve a cursor address into the internal triple, clamping
    /// out-of-range values to the nearest valid position.
    pub fn set_cursor(&mut self, address: CursorAddress) {
        match address {
            CursorAddress::Linear(linear) => self.set_linear(linear),
            CursorAddress::WordOffset { word, offset } => self.set_word_offset(word, offset),
        }
    }

    pub fn set_linear(&mut self, linear: usize) {
        let mut start = 0;
        for (word, text) in self.words.iter().enumerate() {
            let end = start + char_len(text);
            if linear <= end {
                self.cursor = LineCursor {
                    word,
                    offset: linear - start,
                    linear,
                };
                return;
            }
            start = end + 1;
        }
        self.to_line_end();
    }

    pub fn set_word_offset(&mut self, word: usize, offset: usize) {
        let clamped_word = word.min(self.words.len() - 1);
        let max = char_len(&self.words[clamped_word]);
        let clamped_offset = if clamped_word == word { offset.min(max) } else { max };
        let linear = self.words[..clamped_word]
            .iter()
            .map(|text| char_len(text) + 1)
            .sum::<usize>()
            + clamped_offset;
        self.cursor = LineCursor {
            word: clamped_word,
            offset: clamped_offset,
            linear,
        };
    }

    pub fn to_line_start(&mut self) {
        self.cursor = LineCursor::default();
    }

    pub fn to_line_end(&mut self) {
        let last = self.words.len() - 1;
        let offset = char_len(&self.words[last]);
        self.set_word_offset(last, offset);
    }

    /// Step to the previous word's start, clamped at the line start.
    pub fn prev_word(&mut self) {
        let word = self.cursor.word.saturating_sub(1);
        self.set_word_offset(word, 0);
    }

    /// Step to the next word's start, clamped at the line end.
    pub fn next_word(&mut self) {
        if self.cursor.word + 1 < self.words.len() {
            self.set_word_offset(self.cursor.word + 1, 0);
        } else {
            self.set_word_offset(self.cursor.word, 0);
        }
    }

    /// Step one position back, crossing word boundaries. Word ends count
    /// as positions: the boundary between two words is addressed as the
    /// end of the earlier word.
    pub fn prev_char(&mut self) {
        if self.is_at_line_start() {
            return;
        }
        self.cursor.linear -= 1;
        if self.cursor.offset == 0 {
            self.cursor.word -= 1;
            self.cursor.offset = char_len(&self.words[self.cursor.word]);
        } else {
            self.cursor.offset -= 1;
        }
    }

    /// Step one position forward, crossing word boundaries.
    pub fn next_char(&mut self) {
        if self.is_at_line_end() {
            return;
        }
        self.cursor.linear += 1;
        if self.cursor.offset == char_len(&self.words[self.cursor.word]) {
            self.cursor.word += 1;
            self.cursor.offset = 0;
        } else {
            self.cursor.offset += 1;
        }
    }

    /// Insert a character at the cursor and advance one position. A space
    /// splits the current word at the cursor into two words.
    pub fn insert_char(&mut self, ch: char) {
        self.size += 1;
        if ch == ' ' {
            self.split_word_at_cursor();
        } else {
            self.insert_into_word(ch);
        }
    }

    fn insert_into_word(&mut self, ch: char) {
        let word = &mut self.words[self.cursor.word];
        let at = char_to_byte_idx(word, self.cursor.offset);
        word.insert(at, ch);
        self.cursor.offset += 1;
        self.cursor.linear += 1;
    }

    fn split_word_at_cursor(&mut self) {
        let word = &mut self.words[self.cursor.word];
        let at = char_to_byte_idx(word, self.cursor.offset);
        let tail = word.split_off(at);
        self.words.insert(self.cursor.word + 1, tail);
        self.cursor.word += 1;
        self.cursor.offset = 0;
        self.cursor.linear += 1;
    }

    /// Remove the character after the cursor. At a word end this removes
    /// the separator by merging the word with its successor. The caller
    /// must rule out the end of the last word first; that position has no
    /// following character on this line.
    pub fn delete_char_forward(&mut self) -> Result<(), InvariantError> {
        if self.is_at_word_end() {
            if self.cursor.word + 1 >= self.words.len() {
                return Err(InvariantError::DeleteAtLineEnd);
            }
            let tail = self.words.remove(self.cursor.word + 1);
            self.words[self.cursor.word].push_str(&tail);
        } else {
            let word = &mut self.words[self.cursor.word];
            let start = char_to_byte_idx(word, self.cursor.offset);
            let end = char_to_byte_idx(word, self.cursor.offset + 1);
            word.drain(start..end);
        }
        self.size -= 1;
        Ok(())
    }

    /// Move this line's last word to the front of `target`.
    ///
    /// If this line carries the paragraph-end marker, `target` must be
    /// empty: the marker migrates onto it, since this line no longer ends
    /// the paragraph. If the cursor sat inside the moved word of a focused
    /// line, focus and cursor follow the word into `target`.
    pub fn push_last_word_to(&mut self, target: &mut WordList) -> Result<(), InvariantError> {
        if self.eop {
            if !target.is_empty() {
                return Err(InvariantError::ParagraphMarkerTarget);
            }
            target.eop = true;
            self.eop = false;
        }

        let moved_offset = (self.focused && self.cursor.word >= self.words.len() - 1)
            .then_some(self.cursor.offset);

        let word = self.words.pop().unwrap_or_default();
        let word_len = char_len(&word);
        if self.words.is_empty() {
            self.words.push(String::new());
            self.size = 0;
        } else {
            self.size -= word_len + 1;
        }

        if target.is_empty() {
            target.words[0] = word;
            target.size = word_len;
        } else {
            target.words.insert(0, word);
            target.size += word_len + 1;
        }

        if let Some(offset) = moved_offset {
            self.focused = false;
            target.focused = true;
            self.to_line_end();
            target.set_word_offset(0, offset);
        } else {
            let LineCursor { word, offset, .. } = self.cursor;
            self.set_word_offset(word, offset);
            let target_word = if target.words.len() == 1 {
                0
            } else {
                target.cursor.word + 1
            };
            target.set_word_offset(target_word, target.cursor.offset);
        }
        Ok(())
    }

    /// Move `source`'s first word onto the end of this line.
    ///
    /// Fails if this line ends its paragraph: content may never be pulled
    /// across a paragraph boundary. If `source` is emptied it keeps a
    /// single empty word as placeholder, and a paragraph-end marker it
    /// carried moves onto this line. If the cursor sat inside the moved
    /// word of a focused `source`, focus and cursor follow it here.
    pub fn pull_first_word_from(&mut self, source: &mut WordList) -> Result<(), InvariantError> {
        if self.eop {
            return Err(InvariantError::PullPastParagraphEnd);
        }

        let moved_offset =
            (source.focused && source.cursor.word == 0).then_some(source.cursor.offset);

        let word = source.words.remove(0);
        let word_len = char_len(&word);
        if source.words.is_empty() {
            source.words.push(String::new());
            source.size = 0;
            if source.eop {
                self.eop = true;
                source.eop = false;
            }
        } else {
            source.size -= word_len + 1;
        }

        if self.is_empty() {
            self.words[0] = word;
            self.size = word_len;
        } else {
            self.words.push(word);
            self.size += word_len + 1;
        }

        if let Some(offset) = moved_offset {
            source.focused = false;
            self.focused = true;
            source.to_line_start();
            self.set_word_offset(self.words.len() - 1, offset);
        } else {
            let word = source.cursor.word.saturating_sub(1);
            source.set_word_offset(word, source.cursor.offset);
        }
        Ok(())
    }
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

pub(crate) fn char_to_byte_idx(text: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    for (count, (byte_idx, _)) in text.char_indices().enumerate() {
        if count == char_idx {
            return byte_idx;
        }
    }
    text.len()
}
