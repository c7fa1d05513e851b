use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use webbrowser::Browser;

use crate::announcer::Announcer;
use crate::app::App;
use crate::setup::SetupField;

fn field_color(field: SetupField) -> Color {
    match field {
        SetupField::PrepTime => Color::Blue,
        SetupField::HoldTime => Color::Yellow,
        SetupField::ShootPercent => Color::Green,
        SetupField::Arrows => Color::Gray,
    }
}

pub fn render<A: Announcer, R: Rng>(app: &App<A, R>, area: Rect, buf: &mut Buffer) {
    let mut constraints = vec![Constraint::Length(2)];
    constraints.extend(SetupField::ALL.iter().map(|_| Constraint::Length(4)));
    constraints.extend([
        Constraint::Length(2), // sound / status
        Constraint::Min(0),
        Constraint::Length(1), // legend
    ]);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    Paragraph::new(vec![
        Line::from(Span::styled(
            "Drill Setup",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Customize timing and difficulty.",
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let selected = app.form.selected_field();
    for (i, field) in SetupField::ALL.iter().enumerate() {
        let is_selected = *field == selected;
        let color = field_color(*field);

        let border_style = if is_selected {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let marker = if is_selected { "◀ " } else { "  " };
        let marker_end = if is_selected { " ▶" } else { "  " };

        let lines = vec![
            Line::from(vec![
                Span::raw(marker),
                Span::styled(
                    app.form.display_value(*field),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(marker_end),
            ]),
            Line::from(Span::styled(
                field.hint(),
                Style::default().fg(Color::DarkGray),
            )),
        ];

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(Span::styled(field.to_string(), Style::default().fg(color))),
            )
            .alignment(Alignment::Center)
            .render(chunks[1 + i], buf);
    }

    let status_chunk = chunks[1 + SetupField::ALL.len()];
    let status = match &app.status {
        Some(message) => Span::styled(
            message.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        None if app.sound_enabled() => Span::styled(
            "Sound on",
            Style::default().fg(Color::Blue),
        ),
        None => Span::styled("Sound off", Style::default().fg(Color::DarkGray)),
    };
    Paragraph::new(status)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(status_chunk, buf);

    let legend_chunk = chunks[chunks.len() - 1];
    let legend = if Browser::is_available() {
        "↑/↓ select  ←/→ adjust  (enter) start  (t)est audio  (m)ute  (y)outube  (esc)ape"
    } else {
        "↑/↓ select  ←/→ adjust  (enter) start  (t)est audio  (m)ute  (esc)ape"
    };
    super::legend(legend).render(legend_chunk, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announcer::SilentAnnouncer;
    use crate::config::{Config, MemoryConfigStore};
    use crate::ui::buffer_text;
    use rand::rngs::mock::StepRng;

    fn app() -> App<SilentAnnouncer, StepRng> {
        App::with_parts(
            Config::default(),
            Box::new(MemoryConfigStore::default()),
            SilentAnnouncer,
            StepRng::new(0, 0),
        )
    }

    #[test]
    fn renders_every_field_with_its_value() {
        let app = app();
        let area = Rect::new(0, 0, 90, 30);
        let mut buffer = Buffer::empty(area);
        render(&app, area, &mut buffer);

        let text = buffer_text(&buffer);
        assert!(text.contains("Drill Setup"));
        assert!(text.contains("Prep Time (s)"));
        assert!(text.contains("Hold Time (s)"));
        assert!(text.contains("Shoot Frequency (%)"));
        assert!(text.contains("Number of Arrows"));
        assert!(text.contains("4.0"));
        assert!(text.contains("70"));
    }

    #[test]
    fn shows_status_message() {
        let mut app = app();
        app.status = Some("invalid configuration: arrows must be at least 1".into());
        let area = Rect::new(0, 0, 90, 30);
        let mut buffer = Buffer::empty(area);
        render(&app, area, &mut buffer);
        assert!(buffer_text(&buffer).contains("arrows must be at least 1"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let app = app();
        let area = Rect::new(0, 0, 10, 4);
        let mut buffer = Buffer::empty(area);
        render(&app, area, &mut buffer);
    }
}
