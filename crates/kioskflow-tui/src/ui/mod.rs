//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O): they draw the
//! [`ScreenView`] projected from the session, never the session itself.

mod busy;
mod fault;
mod header;
mod page;
mod status;

use kioskflow_core::ScreenView;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::App;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    const HEADER_HEIGHT: u16 = 4;
    const BODY_MIN_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(BODY_MIN_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [header_area, body_area, status_area] = chunks.as_ref() else {
        return;
    };

    let view = app.view();
    header::render(frame, app, &view, *header_area);
    match &view {
        ScreenView::Page(page) => page::render(frame, page, app.focused_id().as_ref(), *body_area),
        ScreenView::Busy(busy) => busy::render(frame, busy, *body_area),
        ScreenView::Fault(fault) => fault::render(frame, fault, *body_area),
    }
    status::render(frame, app, &view, *status_area);
}
