//! Application state machine.
//!
//! This module defines the [`App`] state machine, which hosts one kiosk
//! [`Session`] together with everything around it that is not navigation:
//! keyboard focus, document adoption from the authoring surface, and user
//! feedback.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Document adoption
//!
//! - A document that fails to parse never replaces the active flow. The error
//!   text is kept for inline display until a valid document arrives.
//! - A document with a different `flow_id` restarts the session.
//! - A document with the same `flow_id` keeps the traversal; if the current
//!   screen disappeared the session faults.

use std::sync::Arc;

use kioskflow_core::{ComponentView, ScreenView, Session, SessionAction, SessionEvent};
use kioskflow_proto::{ComponentId, Flow, ParseError, ScreenId};

use crate::{AppAction, AppEvent, DraftBuffer, GeneratedFlow, KeyInput};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Kiosk session over the active flow.
    session: Session,
    /// Index into the focusable components of the current page.
    focus: usize,
    /// Why the last document was rejected. `None` once a document is adopted.
    document_error: Option<String>,
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
    /// Uncommitted document text from the authoring surface.
    draft: DraftBuffer,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
}

impl App {
    /// Create an App running `flow`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnknownStartScreen`] if `flow` cannot be entered.
    pub fn new(flow: Flow) -> Result<Self, ParseError> {
        let session = Session::new(Arc::new(flow))?;
        Ok(Self {
            session,
            focus: 0,
            document_error: None,
            status_message: None,
            draft: DraftBuffer::new(),
            terminal_size: (80, 24),
        })
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::DraftEdited { text } => self.edit_draft(text),
            AppEvent::ReparseDue { generation } => match self.draft.commit(generation) {
                Some(text) => self.load_document(&text),
                None => {
                    tracing::debug!(%generation, "superseded draft skipped");
                    vec![]
                },
            },
            AppEvent::EffectCompleted { generation } => {
                self.session_event(SessionEvent::EffectCompleted { generation })
            },
            AppEvent::FlowGenerated(generated) => self.adopt_generated(generated),
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Interrupt => self.quit(),
            KeyInput::Restart => self.session_event(SessionEvent::Restart),
            KeyInput::Esc => self.session_event(SessionEvent::Back),
            KeyInput::Tab | KeyInput::Down => self.move_focus(true),
            KeyInput::BackTab | KeyInput::Up => self.move_focus(false),
            KeyInput::Enter => self.activate(),
            KeyInput::Char(c) => self.edit_focused(|value| value.push(c)),
            KeyInput::Backspace => self.edit_focused(|value| {
                value.pop();
            }),
        }
    }

    /// Enter on the focused component.
    ///
    /// Buttons are pressed, inputs pass focus on, and a faulted session
    /// restarts (its only affordance).
    fn activate(&mut self) -> Vec<AppAction> {
        let page = match self.session.view() {
            ScreenView::Page(page) => page,
            ScreenView::Fault(_) => return self.session_event(SessionEvent::Restart),
            ScreenView::Busy(_) => return vec![],
        };

        match self.focused(&page.components) {
            Some(ComponentView::Button { id, .. }) => {
                let component = id.clone();
                self.session_event(SessionEvent::Press { component })
            },
            Some(ComponentView::Input { .. }) => self.move_focus(true),
            _ => vec![],
        }
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) -> Vec<AppAction> {
        let ScreenView::Page(page) = self.session.view() else {
            return vec![];
        };
        let Some(ComponentView::Input { id, value, .. }) = self.focused(&page.components) else {
            return vec![];
        };

        let component = id.clone();
        let mut value = value.clone();
        edit(&mut value);
        self.session_event(SessionEvent::Input { component, value })
    }

    fn move_focus(&mut self, forward: bool) -> Vec<AppAction> {
        let ScreenView::Page(page) = self.session.view() else {
            return vec![];
        };
        let count = page.focusable().count();
        if count == 0 {
            return vec![];
        }

        let current = self.focus.min(count - 1);
        self.focus = if forward { (current + 1) % count } else { (current + count - 1) % count };
        vec![AppAction::Render]
    }

    fn focused<'a>(&self, components: &'a [ComponentView]) -> Option<&'a ComponentView> {
        components.iter().filter(|c| c.focus_id().is_some()).nth(self.focus)
    }

    /// Feed an event to the session, resetting focus when the screen changes.
    fn session_event(&mut self, event: SessionEvent) -> Vec<AppAction> {
        let before = self.session.state().current_screen_id().clone();
        let actions = self.session.handle(event);
        self.after_session(&before, actions)
    }

    fn after_session(&mut self, before: &ScreenId, actions: Vec<SessionAction>) -> Vec<AppAction> {
        if self.session.state().current_screen_id() != before {
            self.focus = 0;
        }
        actions.into_iter().map(AppAction::from).collect()
    }

    /// Parse `raw` and adopt it if valid.
    ///
    /// On failure the active flow stays in place and the error is kept in
    /// [`App::document_error`].
    pub fn load_document(&mut self, raw: &str) -> Vec<AppAction> {
        match Flow::parse(raw) {
            Ok(flow) => self.adopt(flow),
            Err(err) => self.reject(&err),
        }
    }

    /// Adopt the result of a flow generator.
    pub fn adopt_generated(&mut self, generated: GeneratedFlow) -> Vec<AppAction> {
        let actions = self.adopt(generated.flow);
        if let Some(reason) = generated.fallback_reason {
            self.status_message = Some(format!("Generation failed, using built-in flow: {reason}"));
        }
        actions
    }

    fn adopt(&mut self, flow: Flow) -> Vec<AppAction> {
        let before = self.session.state().current_screen_id().clone();
        let flow_id = flow.flow_id.clone();
        let screens = flow.screen_count();

        match self.session.load(Arc::new(flow)) {
            Ok(actions) => {
                tracing::info!(flow = %flow_id, screens, "flow adopted");
                self.document_error = None;
                self.status_message = Some(format!("Loaded flow '{flow_id}' ({screens} screens)"));
                self.focus = 0;
                self.after_session(&before, actions)
            },
            Err(err) => self.reject(&err),
        }
    }

    fn reject(&mut self, err: &ParseError) -> Vec<AppAction> {
        tracing::warn!("document rejected, keeping current flow: {err}");
        self.document_error = Some(err.to_string());
        vec![AppAction::Render]
    }

    /// Record an edit from the authoring surface and schedule its re-parse.
    pub fn edit_draft(&mut self, text: String) -> Vec<AppAction> {
        let generation = self.draft.edit(text);
        vec![AppAction::ScheduleReparse { generation }]
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// The hosted session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Renderable description of the session.
    pub fn view(&self) -> ScreenView {
        self.session.view()
    }

    /// Id of the focused component on the current page.
    pub fn focused_id(&self) -> Option<ComponentId> {
        let ScreenView::Page(page) = self.session.view() else {
            return None;
        };
        page.focusable().nth(self.focus).cloned()
    }

    /// Why the last document was rejected. `None` if the last one was adopted.
    pub fn document_error(&self) -> Option<&str> {
        self.document_error.as_deref()
    }

    /// Current status message, if any.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Whether a draft edit is waiting to be re-parsed.
    pub fn has_pending_draft(&self) -> bool {
        self.draft.is_dirty()
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Flow::fallback()).unwrap()
    }

    fn keys(app: &mut App, keys: &[KeyInput]) {
        for key in keys {
            app.handle(AppEvent::Key(*key));
        }
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut app = app();
        assert_eq!(app.focused_id().as_ref().map(ComponentId::as_str), Some("btn_checkin"));

        keys(&mut app, &[KeyInput::Tab, KeyInput::Tab]);
        assert_eq!(app.focused_id().as_ref().map(ComponentId::as_str), Some("btn_checkin"));

        keys(&mut app, &[KeyInput::Up]);
        assert_eq!(app.focused_id().as_ref().map(ComponentId::as_str), Some("btn_walkin"));
    }

    #[test]
    fn typing_fills_the_focused_input() {
        let mut app = app();
        keys(&mut app, &[KeyInput::Enter]);
        assert_eq!(app.session().state().current_screen_id().as_str(), "checkin_cpf");
        assert_eq!(app.focused_id().as_ref().map(ComponentId::as_str), Some("inp_cpf"));

        keys(&mut app, &[KeyInput::Char('1'), KeyInput::Char('2'), KeyInput::Char('9')]);
        keys(&mut app, &[KeyInput::Backspace]);

        assert_eq!(app.session().state().inputs().get("inp_cpf").map(String::as_str), Some("12"));
    }

    #[test]
    fn enter_on_fault_restarts() {
        let mut app = app();
        let mut broken = Flow::fallback();
        if let Some(screen) = broken.screens.get_mut("welcome") {
            screen.components.clear();
            screen.components.push(kioskflow_proto::Component::button(
                "btn_broken",
                "Broken",
                kioskflow_proto::ButtonAction::GotoScreen { target: "nowhere".into() },
            ));
        }
        app.adopt(broken);
        keys(&mut app, &[KeyInput::Enter]);
        assert!(matches!(app.view(), ScreenView::Fault(_)));

        keys(&mut app, &[KeyInput::Enter]);
        assert!(matches!(app.view(), ScreenView::Page(_)));
    }

    #[test]
    fn interrupt_quits() {
        assert_eq!(app().handle(AppEvent::Key(KeyInput::Interrupt)), vec![AppAction::Quit]);
    }
}
