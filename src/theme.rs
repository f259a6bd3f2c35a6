use ratatui::style::{Color, Modifier, Style};

/// Color configuration for the demo front end.
#[derive(Clone, Debug)]
pub struct Theme {
    /// Field text.
    pub text: Style,

    /// The line currently holding the cursor.
    pub focused_line: Style,

    /// Field border.
    pub border: Style,

    /// Status bar at the bottom of the screen.
    pub status_bar: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Style::default().fg(Color::Reset),
            focused_line: Style::default().fg(Color::White),
            border: Style::default().fg(Color::DarkGray),
            status_bar: Style::default()
                .fg(Color::Black)
                .bg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        }
    }
}
