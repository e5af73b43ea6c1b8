//! Page body
//!
//! Components in document order. The focused button or input is
//! highlighted; validation errors sit under their field.

use kioskflow_core::{ComponentView, PageView};
use kioskflow_proto::ComponentId;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Render a regular page.
pub fn render(frame: &mut Frame, page: &PageView, focused: Option<&ComponentId>, area: Rect) {
    let mut lines = Vec::new();

    for component in &page.components {
        let is_focused = component.focus_id().is_some() && component.focus_id() == focused;
        lines.extend(component_lines(component, is_focused));
        lines.push(Line::default());
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn component_lines(component: &ComponentView, focused: bool) -> Vec<Line<'static>> {
    let focus = |style: Style| if focused { style.add_modifier(Modifier::REVERSED) } else { style };

    match component {
        ComponentView::Button { label, primary, .. } => {
            let style = if *primary {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            vec![Line::from(Span::styled(format!("[ {label} ]"), focus(style)))]
        },
        ComponentView::Input { label, placeholder, value, error, numeric, .. } => {
            let shown = if value.is_empty() {
                Span::styled(
                    placeholder.clone().unwrap_or_default(),
                    focus(Style::default().fg(Color::DarkGray)),
                )
            } else {
                Span::styled(value.clone(), focus(Style::default()))
            };
            let keypad = if *numeric { " (0-9)" } else { "" };

            let mut lines = vec![Line::from(vec![
                Span::styled(format!("{label}{keypad}: "), Style::default().add_modifier(Modifier::BOLD)),
                shown,
                Span::raw(if focused { "_" } else { "" }),
            ])];
            if let Some(error) = error {
                lines.push(Line::from(Span::styled(
                    format!("  ! {error}"),
                    Style::default().fg(Color::Red),
                )));
            }
            lines
        },
        ComponentView::Text { value } => vec![Line::from(value.clone())],
        ComponentView::Image { id } => {
            vec![Line::from(Span::styled(format!("[image: {id}]"), Style::default().fg(Color::DarkGray)))]
        },
    }
}
