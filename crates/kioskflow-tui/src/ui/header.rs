//! Screen header
//!
//! Title and subtitle of the current page, framed with the flow id.

use kioskflow_core::ScreenView;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::App;

/// Render the header.
pub fn render(frame: &mut Frame, app: &App, view: &ScreenView, area: Rect) {
    let title_style = Style::default().add_modifier(Modifier::BOLD);
    let subtitle_style = Style::default().fg(Color::DarkGray);

    let lines = match view {
        ScreenView::Page(page) => {
            let mut title = vec![Span::styled(page.title.clone(), title_style)];
            if page.can_go_back {
                title.insert(0, Span::styled("‹ Esc  ", Style::default().fg(Color::Cyan)));
            }
            if page.has_success_badge() {
                title.push(Span::styled("  ✔", Style::default().fg(Color::Green)));
            }
            let subtitle = page.subtitle.clone().unwrap_or_default();
            vec![Line::from(title), Line::from(Span::styled(subtitle, subtitle_style))]
        },
        ScreenView::Busy(_) => vec![Line::from(Span::styled("Please wait", title_style))],
        ScreenView::Fault(_) => vec![Line::from(Span::styled(
            "Something went wrong",
            title_style.fg(Color::Red),
        ))],
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.session().flow().flow_id));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
