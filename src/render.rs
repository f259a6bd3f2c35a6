use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

use crate::buffer::Document;
use crate::theme::Theme;

/// Terminal position of the cursor, relative to the field's top-left cell.
#[derive(Clone, Copy, Debug)]
pub struct CursorVisualPosition {
    pub row: u16,
    pub column: u16,
}

#[derive(Debug)]
pub struct RenderResult {
    pub lines: Vec<Line<'static>>,
    pub cursor: Option<CursorVisualPosition>,
    pub total_lines: usize,
}

/// Build one ratatui line per viewport row from the document's line list.
/// Rows past the end of the chain come out blank.
pub fn render_field(document: &Document, height: usize, theme: &Theme) -> RenderResult {
    let mut lines = Vec::with_capacity(height);
    for row in 0..height {
        let Some(line) = document.line_at(row) else {
            lines.push(Line::default());
            continue;
        };
        let style = if line.is_focused() {
            theme.focused_line
        } else {
            theme.text
        };
        lines.push(Line::from(Span::styled(line.visible_text(0), style)));
    }
    RenderResult {
        lines,
        cursor: cursor_position(document, height),
        total_lines: document.line_count(),
    }
}

/// Where the terminal cursor belongs, if it is inside the viewport. The
/// document counts code points; the terminal wants cells, so the prefix of
/// the display string is re-measured with its display widths.
fn cursor_position(document: &Document, height: usize) -> Option<CursorVisualPosition> {
    let row = document.cursor_row();
    if row < 0 || row as usize >= height {
        return None;
    }
    let line = document.line_at(row as usize)?;
    let column: usize = line
        .display_text()
        .chars()
        .take(document.cursor_column())
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum();
    Some(CursorVisualPosition {
        row: row as u16,
        column: column as u16,
    })
}
