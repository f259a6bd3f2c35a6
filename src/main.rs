use std::{env, fs, io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use linefold::buffer::{Document, Operation, Options, Refresh};
use linefold::render::render_field;
use linefold::theme::Theme;

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let path = env::args().nth(1).map(PathBuf::from);
    let text = match &path {
        Some(p) if p.exists() => fs::read_to_string(p)
            .with_context(|| format!("failed to read {}", p.display()))?,
        _ => String::new(),
    };

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().ok();

    let res = run_app(&mut terminal, &text, path).context("application error");

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    text: &str,
    path: Option<PathBuf>,
) -> Result<()> {
    let size = terminal.size().context("failed to read terminal size")?;
    let field = field_area(Rect::new(0, 0, size.width, size.height));
    let options = Options::default();
    let options = Options {
        width: usize::from(field.width).max(options.indent + 1),
        ..options
    };
    let document = Document::new(text, options).context("failed to build the text field")?;
    let mut app = App::new(document, path);

    while !app.should_quit {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        if event::poll(Duration::from_millis(250)).context("event poll failed")? {
            let evt = event::read().context("failed to read event")?;
            app.handle_event(evt)?;
        }
    }

    Ok(())
}

/// The bordered text area of the screen: everything above the one-row
/// status bar, inside the border.
fn field_area(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    Block::default().borders(Borders::ALL).inner(chunks[0])
}

struct App {
    document: Document,
    path: Option<PathBuf>,
    theme: Theme,
    status: Option<String>,
    view_height: usize,
    should_quit: bool,
}

impl App {
    fn new(document: Document, path: Option<PathBuf>) -> Self {
        Self {
            document,
            path,
            theme: Theme::default(),
            status: None,
            view_height: 1,
            should_quit: false,
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.area());

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border)
            .title(" linefold ");
        let inner = block.inner(chunks[0]);
        self.view_height = usize::from(inner.height);

        let render = render_field(&self.document, self.view_height, &self.theme);
        frame.render_widget(Paragraph::new(render.lines).block(block), chunks[0]);

        if let Some(cursor) = render.cursor {
            frame.set_cursor_position(Position::new(
                inner.x + cursor.column,
                inner.y + cursor.row,
            ));
        }

        let status = self.status.clone().unwrap_or_else(|| {
            format!(
                "{} lines | Ctrl+S save | Ctrl+Q quit",
                render.total_lines
            )
        });
        frame.render_widget(
            Paragraph::new(Line::from(status)).style(self.theme.status_bar),
            chunks[1],
        );

        for row in 0..self.view_height {
            self.document.mark_line_clean(row);
        }
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Resize(width, _) => {
                let field = field_area(Rect::new(0, 0, width, 3));
                let new_width = usize::from(field.width);
                if new_width > self.document.indent() {
                    self.document
                        .set_width(new_width)
                        .context("re-wrap after resize failed")?;
                    self.scroll_into_view();
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        self.status = None;

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return Ok(());
                }
                KeyCode::Char('s') => return self.save(),
                _ => {}
            }
        }

        let Some(operation) = operation_for(&key) else {
            return Ok(());
        };
        let hint = self
            .document
            .apply(operation)
            .context("text field operation failed")?;
        if hint != Refresh::NoOp {
            self.scroll_into_view();
        }
        Ok(())
    }

    /// Keep the cursor inside the viewport, as the original widget's
    /// refresh loop does: scroll just far enough in either direction.
    fn scroll_into_view(&mut self) {
        let row = self.document.cursor_row();
        if row < 0 {
            self.document.scroll_by(row);
        } else if row as usize >= self.view_height {
            self.document.scroll_by(row - self.view_height as isize + 1);
        }
    }

    fn save(&mut self) -> Result<()> {
        let Some(path) = &self.path else {
            self.status = Some("no file to save to (start with a path argument)".to_string());
            return Ok(());
        };
        fs::write(path, self.document.to_text())
            .with_context(|| format!("failed to write {}", path.display()))?;
        self.status = Some(format!("saved {}", path.display()));
        Ok(())
    }
}

fn operation_for(key: &KeyEvent) -> Option<Operation> {
    let word_wise = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Operation::InsertChar(ch))
        }
        KeyCode::Enter => Some(Operation::InsertChar('\n')),
        KeyCode::Backspace => Some(Operation::DeleteBackward),
        KeyCode::Delete => Some(Operation::DeleteForward),
        KeyCode::Left if word_wise => Some(Operation::PrevWord),
        KeyCode::Right if word_wise => Some(Operation::NextWord),
        KeyCode::Left => Some(Operation::PrevChar),
        KeyCode::Right => Some(Operation::NextChar),
        KeyCode::Up => Some(Operation::PrevLine),
        KeyCode::Down => Some(Operation::NextLine),
        KeyCode::Home if word_wise => Some(Operation::DocumentStart),
        KeyCode::End if word_wise => Some(Operation::DocumentEnd),
        KeyCode::Home => Some(Operation::LineStart),
        KeyCode::End => Some(Operation::LineEnd),
        _ => None,
    }
}
