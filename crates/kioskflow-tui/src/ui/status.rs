//! Status bar
//!
//! Document errors take precedence over status messages; with neither, key
//! hints for the current view are shown.

use kioskflow_core::ScreenView;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::App;

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, view: &ScreenView, area: Rect) {
    let message = if let Some(error) = app.document_error() {
        Span::styled(
            format!("Document error: {error}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else if let Some(status) = app.status_message() {
        Span::raw(status.to_owned())
    } else {
        Span::styled(hints(view), Style::default().fg(Color::Gray))
    };

    let draft = if app.has_pending_draft() { " (editing…)" } else { "" };
    let status_line = Line::from(vec![Span::raw(" "), message, Span::raw(draft)]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}

fn hints(view: &ScreenView) -> &'static str {
    match view {
        ScreenView::Page(page) if page.can_go_back => {
            "Tab move | Enter select | Esc back | F5 restart | Ctrl-C quit"
        },
        ScreenView::Page(_) => "Tab move | Enter select | F5 restart | Ctrl-C quit",
        ScreenView::Busy(_) => "F5 restart | Ctrl-C quit",
        ScreenView::Fault(_) => "Enter restart | Ctrl-C quit",
    }
}
