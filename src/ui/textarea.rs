use ratatui::layout::Alignment;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders};
use tui_textarea::TextArea;

use crate::app::InputTarget;

pub fn new_textarea(placeholder: impl Into<String>) -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_placeholder_text(placeholder);
    textarea.set_cursor_line_style(Style::default());
    textarea.set_placeholder_style(Style::default().fg(Color::DarkGray));
    textarea.set_selection_style(Style::new().bg(Color::LightCyan));
    textarea
}

impl InputTarget {
    pub fn label(self) -> &'static str {
        match self {
            InputTarget::Question => "QUESTION",
            InputTarget::Guess => "ACCUSE",
            InputTarget::AudioPath => "VOICE",
        }
    }

    fn color(self) -> Color {
        match self {
            InputTarget::Question => Color::LightCyan,
            InputTarget::Guess => Color::LightYellow,
            InputTarget::AudioPath => Color::LightMagenta,
        }
    }

    pub fn block<'a>(self, title: impl Into<Line<'a>>) -> Block<'a> {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.color()))
            .title(title)
            .title_bottom(Line::from(format!(" {} ", self.label())).left_aligned())
            .title_alignment(Alignment::Center)
    }
}
