use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget},
};

use crate::announcer::Announcer;
use crate::app::{App, SessionEnd};
use crate::session::{Decision, DrillResult};

/// Pure presenter for a single result row
pub fn present_row(result: &DrillResult) -> Row<'static> {
    let color = match result.decision {
        Decision::Shoot => Color::Green,
        Decision::LetDown => Color::Red,
    };
    Row::new(vec![
        Cell::from(format!("Arrow {}", result.arrow)).style(Style::default().fg(Color::Gray)),
        Cell::from(result.decision.to_string())
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Cell::from(result.timestamp.format("%H:%M:%S").to_string())
            .style(Style::default().fg(Color::DarkGray)),
    ])
}

fn heading(end: Option<SessionEnd>) -> (&'static str, &'static str) {
    match end {
        Some(SessionEnd::Aborted) => (
            "Session Aborted",
            "Only arrows that reached the command are listed.",
        ),
        _ => ("Session Complete", "Great job! Here is your summary."),
    }
}

fn count_box(count: usize, label: &str, color: Color) -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(Span::styled(
            count.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(label.to_uppercase(), Style::default().fg(color))),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    )
    .alignment(Alignment::Center)
}

pub fn render<A: Announcer, R: Rng>(app: &App<A, R>, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // heading
            Constraint::Length(1),
            Constraint::Length(4), // counts
            Constraint::Min(3),    // table
            Constraint::Length(1), // legend
        ])
        .split(area);

    let (title, subtitle) = heading(app.session_end);
    Paragraph::new(vec![
        Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, Style::default().fg(Color::Gray))),
    ])
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let summary = app.summary();
    let counts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    count_box(summary.shots, "Shots", Color::Green).render(counts[0], buf);
    count_box(summary.let_downs, "Let downs", Color::Red).render(counts[1], buf);

    let header = Row::new(vec![
        Cell::from("Arrow #"),
        Cell::from("Command"),
        Cell::from("Time"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    // borders and header take three lines
    let table_height = chunks[3].height.saturating_sub(3) as usize;
    let rows: Vec<Row> = app.results.iter().map(present_row).collect();

    let total = app.results.len();
    let selected = app.summary_selected.min(total.saturating_sub(1));
    let table_title = if total > table_height {
        format!("Results {}/{total}", selected + 1)
    } else {
        "Results".to_string()
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .block(Block::default().borders(Borders::ALL).title(table_title));

    // the table keeps the highlighted row in view
    let mut state = TableState::default().with_selected((total > 0).then_some(selected));
    StatefulWidget::render(table, chunks[3], buf, &mut state);

    super::legend("↑/↓ scroll  (n)ew session  (esc)ape").render(chunks[4], buf);
}
