//! Fault screen
//!
//! Shown when the session points at a screen the flow does not define.

use kioskflow_core::FaultView;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Render the fault view.
pub fn render(frame: &mut Frame, fault: &FaultView, area: Rect) {
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(fault.message.clone(), Style::default().fg(Color::Red))),
        Line::from(Span::styled(
            format!("missing screen: {}", fault.missing_screen),
            Style::default().fg(Color::DarkGray),
        )),
        Line::default(),
        Line::from("Press Enter or F5 to start over"),
    ];

    let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Red));
    let paragraph =
        Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true }).block(block);

    frame.render_widget(paragraph, area);
}
