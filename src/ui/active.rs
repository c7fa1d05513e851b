use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::announcer::Announcer;
use crate::app::App;
use crate::session::{Decision, DrillSnapshot, Phase};

/// Background colour for the phase being shown
pub fn phase_color(snapshot: &DrillSnapshot) -> Color {
    match (snapshot.phase, snapshot.last_decision) {
        (Phase::Hold, _) => Color::Yellow,
        (Phase::Decision, Some(Decision::Shoot)) => Color::Green,
        (Phase::Decision, Some(Decision::LetDown)) => Color::Red,
        _ => Color::DarkGray,
    }
}

pub fn phase_title(snapshot: &DrillSnapshot) -> &'static str {
    match (snapshot.phase, snapshot.last_decision) {
        (Phase::Preparation, _) => "GET READY",
        (Phase::Hold, _) => "DRAW & HOLD",
        (Phase::Decision, Some(decision)) => decision.headline(),
        _ => "",
    }
}

/// Large central text for the phase: countdown, crosshair or command mark
fn phase_glyph(snapshot: &DrillSnapshot) -> String {
    match (snapshot.phase, snapshot.last_decision) {
        (Phase::Preparation, _) => snapshot.remaining_whole_secs().to_string(),
        (Phase::Hold, _) => "─┼─".to_string(),
        (Phase::Decision, Some(Decision::Shoot)) => "( ● )".to_string(),
        (Phase::Decision, Some(Decision::LetDown)) => "✕".to_string(),
        _ => String::new(),
    }
}

pub fn render<A: Announcer, R: Rng>(app: &App<A, R>, area: Rect, buf: &mut Buffer) {
    let Some(snapshot) = app.snapshot else {
        return;
    };

    let background = phase_color(&snapshot);
    Block::default()
        .style(Style::default().bg(background))
        .render(area, buf);

    let text_style = Style::default().fg(Color::White).bg(background);
    let bold = text_style.add_modifier(Modifier::BOLD);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(2)
        .constraints([
            Constraint::Length(1), // arrow counter + sound
            Constraint::Min(0),
            Constraint::Length(1), // glyph
            Constraint::Length(1),
            Constraint::Length(1), // title
            Constraint::Length(1),
            Constraint::Length(1), // voice indicator
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    Paragraph::new(Span::styled(
        format!("ARROW {}/{}", snapshot.arrow, snapshot.arrows),
        bold,
    ))
    .render(top[0], buf);

    Paragraph::new(Span::styled(
        if app.sound_enabled() { "♪ on" } else { "♪ off" },
        text_style,
    ))
    .alignment(Alignment::Right)
    .render(top[1], buf);

    Paragraph::new(Span::styled(phase_glyph(&snapshot), bold))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    Paragraph::new(Span::styled(phase_title(&snapshot), bold))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

    if app.sound_enabled() {
        Paragraph::new(Line::from(Span::styled(
            "Voice active",
            text_style.add_modifier(Modifier::DIM),
        )))
        .alignment(Alignment::Center)
        .render(chunks[6], buf);
    }

    Paragraph::new(Span::styled(
        "(esc) abort  (m)ute",
        text_style.add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[8], buf);
}
