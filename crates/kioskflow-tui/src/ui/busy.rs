//! Busy indicator
//!
//! Replaces the page while the enqueue call is in flight. Nothing on it
//! is interactive.

use kioskflow_core::BusyView;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render the busy view.
pub fn render(frame: &mut Frame, busy: &BusyView, area: Rect) {
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "Processing, please wait...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} → {}", busy.screen_id, busy.target),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph =
        Paragraph::new(lines).alignment(Alignment::Center).block(Block::default().borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}
