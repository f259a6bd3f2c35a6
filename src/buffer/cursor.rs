use super::{Document, Refresh};

/// Cursor navigation across the chain. Moves that would leave the field
/// report `Refresh::NoOp` and touch nothing; everything else reports what
/// the renderer must repaint.
impl Document {
    /// One position back, crossing onto the previous line's end at a line
    /// start. A no-op at the start of the field.
    pub fn prev_char(&mut self) -> Refresh {
        if self.chain.node(self.current).line.is_at_line_start() {
            if !self.focus_prev_line(None) {
                return Refresh::NoOp;
            }
            self.chain.node_mut(self.current).line.to_line_end();
        } else {
            let linear = self.chain.node(self.current).line.cursor().linear;
            self.chain.node_mut(self.current).line.set_linear(linear - 1);
        }
        Refresh::Cursor
    }

    /// One position forward, crossing onto the next line's start at a line
    /// end. A no-op at the end of the field.
    pub fn next_char(&mut self) -> Refresh {
        if self.chain.node(self.current).line.is_at_line_end() {
            if !self.focus_next_line(None) {
                return Refresh::NoOp;
            }
            self.chain.node_mut(self.current).line.to_line_start();
        } else {
            let linear = self.chain.node(self.current).line.cursor().linear;
            self.chain.node_mut(self.current).line.set_linear(linear + 1);
        }
        Refresh::Cursor
    }

    /// To the previous word's start, crossing onto the previous line's
    /// last word from a line's first word.
    pub fn prev_word(&mut self) -> Refresh {
        if self.chain.node(self.current).line.cursor().word == 0 {
            if !self.focus_prev_line(None) {
                return Refresh::NoOp;
            }
            let last = self.chain.node(self.current).line.word_count() - 1;
            self.chain.node_mut(self.current).line.set_word_offset(last, 0);
        } else {
            let word = self.chain.node(self.current).line.cursor().word - 1;
            self.chain.node_mut(self.current).line.set_word_offset(word, 0);
        }
        Refresh::Cursor
    }

    /// To the next word's start, crossing onto the next line's first word
    /// from a line's last word.
    pub fn next_word(&mut self) -> Refresh {
        let line = &self.chain.node(self.current).line;
        if line.cursor().word + 1 >= line.word_count() {
            if !self.focus_next_line(None) {
                return Refresh::NoOp;
            }
            self.chain.node_mut(self.current).line.to_line_start();
        } else {
            let word = self.chain.node(self.current).line.cursor().word + 1;
            self.chain.node_mut(self.current).line.set_word_offset(word, 0);
        }
        Refresh::Cursor
    }

    pub fn line_start(&mut self) -> Refresh {
        self.chain.node_mut(self.current).line.to_line_start();
        Refresh::Cursor
    }

    pub fn line_end(&mut self) -> Refresh {
        self.chain.node_mut(self.current).line.to_line_end();
        Refresh::Cursor
    }

    /// One line up, keeping the linear offset as closely as the target
    /// line's length allows.
    pub fn prev_line(&mut self) -> Refresh {
        if self.focus_prev_line(None) {
            Refresh::Cursor
        } else {
            Refresh::NoOp
        }
    }

    /// One line down, keeping the linear offset as closely as the target
    /// line's length allows.
    pub fn next_line(&mut self) -> Refresh {
        if self.focus_next_line(None) {
            Refresh::Cursor
        } else {
            Refresh::NoOp
        }
    }

    /// To the start of the field's first line.
    pub fn document_start(&mut self) -> Refresh {
        self.chain.node_mut(self.current).line.set_focused(false);
        self.current = self.chain.head();
        self.chain.node_mut(self.current).line.set_focused(true);
        self.chain.node_mut(self.current).line.to_line_start();
        Refresh::Whole
    }

    /// To the end of the field's last line.
    pub fn document_end(&mut self) -> Refresh {
        self.chain.node_mut(self.current).line.set_focused(false);
        self.current = self.chain.tail();
        self.chain.node_mut(self.current).line.set_focused(true);
        self.chain.node_mut(self.current).line.to_line_end();
        Refresh::Whole
    }

    /// Focus the line on a viewport row and resolve a linear offset on it.
    pub fn move_to(&mut self, viewport_row: usize, offset: usize) -> Refresh {
        let steps = viewport_row as isize + self.headshift;
        if steps < 0 {
            return Refresh::NoOp;
        }
        let Some(target) = self.chain.node_at(steps as usize) else {
            return Refresh::NoOp;
        };
        self.chain.node_mut(self.current).line.set_focused(false);
        self.current = target;
        self.chain.node_mut(self.current).line.set_focused(true);
        self.chain.node_mut(self.current).line.set_linear(offset);
        Refresh::Cursor
    }

    pub(crate) fn focus_prev_line(&mut self, linear: Option<usize>) -> bool {
        let Some(prev) = self.chain.prev(self.current) else {
            return false;
        };
        let linear = linear.unwrap_or_else(|| self.chain.node(self.current).line.cursor().linear);
        self.chain.node_mut(self.current).line.set_focused(false);
        self.chain.node_mut(prev).line.set_focused(true);
        self.chain.node_mut(prev).line.set_linear(linear);
        self.current = prev;
        true
    }

    pub(crate) fn focus_next_line(&mut self, linear: Option<usize>) -> bool {
        let Some(next) = self.chain.next(self.current) else {
            return false;
        };
        let linear = linear.unwrap_or_else(|| self.chain.node(self.current).line.cursor().linear);
        self.chain.node_mut(self.current).line.set_focused(false);
        self.chain.node_mut(next).line.set_focused(true);
        self.chain.node_mut(next).line.set_linear(linear);
        self.current = next;
        true
    }
}
