use super::{
    constants::INTERROGATION_KEYS,
    utils::{bottom_scroll, wrapped_height},
};
use crate::app::{App, Notice, NoticeKind};
use crate::message::{Message, Role};
use crate::session::{Difficulty, SessionState};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::*,
};
use strum::IntoEnumIterator;

pub fn draw_interrogation(f: &mut Frame, app: &mut App) {
    let [main, hints] =
        Layout::vertical([Constraint::Min(10), Constraint::Length(1)]).areas(f.area());
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).areas(main);
    let [transcript_area, notice_area, input_area] = Layout::vertical([
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(3),
    ])
    .areas(left);
    let [case_area, suspects_area, score_area] = Layout::vertical([
        Constraint::Length(10),
        Constraint::Min(5),
        Constraint::Length(4),
    ])
    .areas(right);

    draw_transcript(f, app, transcript_area);
    draw_notice(f, app.notice.as_ref(), notice_area);
    draw_input(f, app, input_area);
    draw_case_file(f, app, case_area);
    draw_suspects(f, app, suspects_area);
    draw_scoreboard(f, app, score_area);

    let hints_line = Paragraph::new(INTERROGATION_KEYS)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(hints_line, hints);
}

fn message_style(message: &Message) -> (Style, String) {
    match message.role {
        Role::User => (
            Style::default().fg(Color::LightCyan),
            match &message.suspect {
                Some(suspect) => format!("You → {suspect}"),
                None => "You".to_string(),
            },
        ),
        Role::Assistant => (
            Style::default().fg(Color::White),
            message.suspect.clone().unwrap_or_else(|| "Suspects".to_string()),
        ),
        Role::System => (Style::default().fg(Color::DarkGray), "System".to_string()),
    }
}

fn draw_transcript(f: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    let mut plain = String::new();
    for message in app.snapshot.visible_transcript() {
        let (style, speaker) = message_style(message);
        lines.push(Line::from(Span::styled(
            format!("{speaker}:"),
            style.add_modifier(Modifier::BOLD),
        )));
        plain.push_str(&speaker);
        plain.push('\n');
        for text_line in message.content.lines() {
            lines.push(Line::from(Span::styled(text_line.to_string(), style)));
            plain.push_str(text_line);
            plain.push('\n');
        }
        lines.push(Line::default());
        plain.push('\n');
    }
    if let Some(question) = &app.pending_question {
        let addressed = app.snapshot.addressed_suspect();
        lines.push(Line::from(Span::styled(
            format!("You → {addressed}:"),
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            question.clone(),
            Style::default().fg(Color::LightCyan),
        )));
        plain.push_str(&format!("{addressed}\n{question}\n"));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" Interrogation ");
    let inner = block.inner(area);
    let scroll = bottom_scroll(
        wrapped_height(&plain, inner.width),
        inner.height,
        app.transcript_scroll,
    );
    let transcript = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(transcript, area);

    if app.pending {
        let spinner_area = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
        let spinner = Paragraph::new(app.spinner.status("Suspect is thinking..."))
            .style(Style::default().fg(Color::Green))
            .alignment(Alignment::Center);
        f.render_widget(spinner, spinner_area);
    }
}

pub fn draw_notice(f: &mut Frame, notice: Option<&Notice>, area: Rect) {
    if let Some(notice) = notice {
        let color = match notice.kind {
            NoticeKind::Info => Color::Yellow,
            NoticeKind::Success => Color::Green,
            NoticeKind::Error => Color::Red,
        };
        let paragraph = Paragraph::new(notice.text.as_str())
            .style(Style::default().fg(color))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
    }
}

fn draw_input(f: &mut Frame, app: &mut App, area: Rect) {
    let title = match app.snapshot.state() {
        SessionState::Active => format!(" Ask {} ", app.snapshot.addressed_suspect()),
        SessionState::Exhausted => " No questions left: make your final guess ".to_string(),
        SessionState::Solved => " Case closed: Ctrl-N for a new case ".to_string(),
    };
    let block = app.input_target.block(title);
    app.input.set_block(block);
    f.render_widget(&app.input, area);
}

fn draw_case_file(f: &mut Frame, app: &App, area: Rect) {
    let session = &app.snapshot;
    let case = session.case();
    let label = Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD);
    let difficulty_spans: Vec<Span> = Difficulty::iter()
        .map(|d| {
            if d == session.difficulty() {
                Span::styled(format!("[{d}] "), Style::default().fg(Color::Yellow))
            } else {
                Span::styled(format!(" {d}  "), Style::default().fg(Color::DarkGray))
            }
        })
        .collect();

    let mut lines = vec![
        Line::from(vec![Span::styled("Victim: ", label), Span::raw(&case.victim)]),
        Line::from(vec![Span::styled("Crime: ", label), Span::raw(&case.crime)]),
        Line::from(vec![Span::styled("Location: ", label), Span::raw(&case.location)]),
        Line::from(vec![Span::styled("Time: ", label), Span::raw(&case.time)]),
        Line::from(vec![
            Span::styled("Questions Left: ", label),
            Span::raw(session.questions_remaining().to_string()),
        ]),
        Line::from([vec![Span::styled("Difficulty: ", label)], difficulty_spans].concat()),
        Line::from(vec![
            Span::styled("Crime Scene: ", label),
            Span::styled(&case.image_ref, Style::default().fg(Color::Blue)),
        ]),
    ];
    if let Some(culprit) = session.reveal_culprit() {
        lines.push(Line::from(vec![
            Span::styled("Culprit: ", label),
            Span::styled(&culprit.name, Style::default().fg(Color::Red)),
        ]));
    }

    let case_file = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" 🗂️ Case File "),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(case_file, area);
}

fn draw_suspects(f: &mut Frame, app: &App, area: Rect) {
    let session = &app.snapshot;
    let items: Vec<ListItem> = session
        .case()
        .suspects
        .iter()
        .map(|suspect| {
            if suspect.name == session.addressed_suspect() {
                ListItem::new(Line::from(vec![
                    Span::styled("> ", Style::default().fg(Color::Yellow)),
                    Span::styled(
                        suspect.name.as_str(),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                ]))
            } else {
                ListItem::new(format!("  {}", suspect.name))
            }
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Suspects "),
    );
    f.render_widget(list, area);
}

fn draw_scoreboard(f: &mut Frame, app: &App, area: Rect) {
    let score = app.snapshot.score();
    let scoreboard = Paragraph::new(vec![
        Line::from(format!("Solved Cases: {}", score.solved)),
        Line::from(format!("Wrong Guesses: {}", score.wrong)),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" 📊 Scoreboard "),
    );
    f.render_widget(scoreboard, area);
}
