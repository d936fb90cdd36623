// src/ui/main_menu.rs

use super::{constants::TITLE, utils::center_rect};
use crate::app::{App, MENU_ITEMS};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::*,
};

// Function to draw the main menu interface.
pub fn draw_main_menu(f: &mut Frame, app: &App) {
    let [header, title, menu, score, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(8),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(f.area());

    render_header(f, header);
    render_title(f, title);
    render_menu(f, app, menu);
    render_score(f, app, score);
    render_status(f, status);
}

pub fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(format!("Detective Ratatui v{}", env!("CARGO_PKG_VERSION")))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(header, area);
}

pub fn render_title(f: &mut Frame, area: Rect) {
    let title_area = center_rect(area, Constraint::Length(44), Constraint::Length(7));
    let title = Paragraph::new(TITLE)
        .alignment(Alignment::Left)
        .style(Style::default().fg(Color::Yellow));
    f.render_widget(title, title_area);
}

pub fn render_menu(f: &mut Frame, app: &App, area: Rect) {
    let selected = app.menu_state.selected().unwrap_or(0);
    let menu_lines: Vec<Line> = MENU_ITEMS
        .iter()
        .enumerate()
        .map(|(i, &item)| {
            let number = format!("{}. ", i + 1);
            if i == selected {
                Line::from(vec![
                    Span::styled(number, Style::default().fg(Color::Yellow)),
                    Span::styled(
                        item,
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(vec![Span::raw(number), Span::raw(item)])
            }
        })
        .collect();

    let max_width = menu_lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
    let centered_area = center_rect(
        area,
        Constraint::Length(max_width + 4),
        Constraint::Length(MENU_ITEMS.len() as u16 + 2),
    );

    let menu = Paragraph::new(menu_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .padding(Padding::horizontal(1)),
        )
        .style(Style::default().fg(Color::White));
    f.render_widget(menu, centered_area);
}

fn render_score(f: &mut Frame, app: &App, area: Rect) {
    let score = app.snapshot.score();
    let line = Paragraph::new(format!(
        "Solved Cases: {}   Wrong Guesses: {}",
        score.solved, score.wrong
    ))
    .style(Style::default().fg(Color::Gray))
    .alignment(Alignment::Center);
    f.render_widget(line, area);
}

pub fn render_status(f: &mut Frame, area: Rect) {
    let status = Paragraph::new("↑/↓ or 1-3 to choose, Enter to open, q to quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(status, area);
}
