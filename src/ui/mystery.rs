// src/ui/mystery.rs

use super::{constants::MYSTERY_KEYS, game::draw_notice};
use crate::app::{App, InputTarget};
use crate::message::Role;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::*,
};

pub fn draw_mystery(f: &mut Frame, app: &mut App) {
    let [title, main, hints] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(10),
        Constraint::Length(1),
    ])
    .areas(f.area());
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(main);
    let [story_area, verdict_area] =
        Layout::vertical([Constraint::Percentage(70), Constraint::Percentage(30)]).areas(left);
    let [suspects_area, replies_area, notice_area, input_area] = Layout::vertical([
        Constraint::Length(7),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(3),
    ])
    .areas(right);

    let heading = Paragraph::new("🕵️ AI Mystery Solver Game")
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    f.render_widget(heading, title);

    draw_story(f, app, story_area);
    draw_verdict(f, app, verdict_area);
    draw_suspects(f, app, suspects_area);
    draw_replies(f, app, replies_area);
    draw_notice(f, app.notice.as_ref(), notice_area);

    let title = match (app.input_target, app.selected_story_suspect()) {
        (InputTarget::Guess, _) => " Final answer (empty: highlighted suspect) ".to_string(),
        (_, Some(suspect)) => format!(" Ask {suspect} "),
        (_, None) => " Ask your question ".to_string(),
    };
    let block = app.input_target.block(title);
    app.input.set_block(block);
    f.render_widget(&app.input, input_area);

    let hints_line = Paragraph::new(MYSTERY_KEYS)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(hints_line, hints);
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title)
}

fn draw_story(f: &mut Frame, app: &App, area: Rect) {
    let story = match app.board_view.mystery() {
        Some(mystery) => Paragraph::new(mystery.story.as_str()),
        None => Paragraph::new("Press Ctrl-G to generate a new mystery and start the game!")
            .style(Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(
        story.block(panel(" 📜 Mystery Story ")).wrap(Wrap { trim: false }),
        area,
    );

    if app.pending {
        let spinner_area = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
        let spinner = Paragraph::new(app.spinner.status("The engine is writing..."))
            .style(Style::default().fg(Color::Green))
            .alignment(Alignment::Center);
        f.render_widget(spinner, spinner_area);
    }
}

fn draw_verdict(f: &mut Frame, app: &App, area: Rect) {
    let verdict = Paragraph::new(app.board_view.verdict().unwrap_or(""))
        .block(panel(" 🧾 Case Result "))
        .wrap(Wrap { trim: false });
    f.render_widget(verdict, area);
}

fn draw_suspects(f: &mut Frame, app: &App, area: Rect) {
    let suspects = app
        .board_view
        .mystery()
        .map(|m| m.suspects.as_slice())
        .unwrap_or_default();
    if suspects.is_empty() {
        let empty = Paragraph::new("Suspects will appear here after generating a mystery.")
            .style(Style::default().fg(Color::DarkGray))
            .block(panel(" 🧑‍🤝‍🧑 Suspects "))
            .wrap(Wrap { trim: true });
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = suspects
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if i == app.story_suspect {
                ListItem::new(Line::from(vec![
                    Span::styled("> ", Style::default().fg(Color::Yellow)),
                    Span::styled(
                        name.as_str(),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                ]))
            } else {
                ListItem::new(format!("  {name}"))
            }
        })
        .collect();
    f.render_widget(List::new(items).block(panel(" 🧑‍🤝‍🧑 Suspects ")), area);
}

fn draw_replies(f: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    for message in app.board_view.interrogations() {
        let speaker = message.suspect.as_deref().unwrap_or("?");
        let (header, style) = match message.role {
            Role::User => (format!("You → {speaker}:"), Style::default().fg(Color::LightCyan)),
            _ => (format!("{speaker}:"), Style::default().fg(Color::Green)),
        };
        lines.push(Line::from(Span::styled(
            header,
            style.add_modifier(Modifier::BOLD),
        )));
        lines.extend(
            message
                .content
                .lines()
                .map(|line| Line::from(Span::styled(line.to_string(), style))),
        );
    }
    let replies = Paragraph::new(lines)
        .block(panel(" 🔍 Interrogations "))
        .wrap(Wrap { trim: false });
    f.render_widget(replies, area);
}
