pub mod active;
pub mod setup;
pub mod summary;

use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::announcer::Announcer;
use crate::app::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

impl<A: Announcer, R: Rng> Widget for &App<A, R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        render_header(chunks[0], buf);

        let body = Layout::default()
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([Constraint::Min(0)])
            .split(chunks[1])[0];

        match self.state {
            AppState::Setup => setup::render(self, body, buf),
            AppState::Active => active::render(self, chunks[1], buf),
            AppState::Summary => summary::render(self, body, buf),
        }
    }
}

fn render_header(area: Rect, buf: &mut Buffer) {
    let title = Line::from(vec![
        Span::styled("◎ ", Style::default().fg(Color::Yellow)),
        Span::styled(
            "Archery ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Mind",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " Trainer",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    Paragraph::new(title)
        .block(Block::default().borders(Borders::BOTTOM))
        .alignment(Alignment::Center)
        .render(area, buf);
}

/// Key legend rendered at the bottom of every screen
pub(crate) fn legend(text: &str) -> Paragraph<'_> {
    Paragraph::new(Span::styled(
        text,
        Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
    ))
    .alignment(Alignment::Center)
}

/// Flatten a rendered buffer into plain text, one line per row
#[cfg(test)]
pub(crate) fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell((x, y)) {
                out.push_str(cell.symbol());
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announcer::SilentAnnouncer;
    use crate::config::{Config, MemoryConfigStore};
    use rand::rngs::mock::StepRng;

    #[test]
    fn header_is_drawn_on_every_screen() {
        let mut app = App::with_parts(
            Config::default(),
            Box::new(MemoryConfigStore::default()),
            SilentAnnouncer,
            StepRng::new(0, 0),
        );
        for state in [AppState::Setup, AppState::Summary] {
            app.state = state;
            let area = Rect::new(0, 0, 80, 30);
            let mut buffer = Buffer::empty(area);
            (&app).render(area, &mut buffer);
            assert!(buffer_text(&buffer).contains("Archery Mind Trainer"));
        }
    }
}
