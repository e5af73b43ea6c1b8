//! Render projection.
//!
//! A stateless function of the flow and the navigation state. The output
//! names what to show, not how: any front end (terminal, web, test harness)
//! can draw a [`ScreenView`].

use kioskflow_proto::{ComponentId, ComponentKind, Flow, ScreenId, ScreenKind};

use crate::NavigationState;

/// What the kiosk shows right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenView {
    /// A regular screen.
    Page(PageView),
    /// An effect is pending; screen content is hidden behind a progress
    /// indicator.
    Busy(BusyView),
    /// The session is degraded; the only affordance is restart.
    Fault(FaultView),
}

/// A drawable screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    /// Screen being shown.
    pub screen_id: ScreenId,
    /// Heading.
    pub title: String,
    /// Optional line under the heading.
    pub subtitle: Option<String>,
    /// Screen kind.
    pub kind: ScreenKind,
    /// Whether a back affordance is offered.
    pub can_go_back: bool,
    /// Components in document order.
    pub components: Vec<ComponentView>,
}

impl PageView {
    /// Success screens carry a confirmation badge.
    pub fn has_success_badge(&self) -> bool {
        self.kind == ScreenKind::Success
    }

    /// Ids of components that take focus (buttons and inputs), in order.
    pub fn focusable(&self) -> impl Iterator<Item = &ComponentId> {
        self.components.iter().filter_map(ComponentView::focus_id)
    }
}

/// Progress indicator shown while an effect is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusyView {
    /// Screen the effect was started from.
    pub screen_id: ScreenId,
    /// Screen the effect completes on.
    pub target: ScreenId,
}

/// Recovery panel for a degraded session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultView {
    /// Human-readable reason.
    pub message: String,
    /// Screen id that could not be resolved.
    pub missing_screen: ScreenId,
}

/// One drawable component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentView {
    /// A pressable button.
    Button {
        /// Component id, passed back on press.
        id: ComponentId,
        /// Caption.
        label: String,
        /// Styling hint.
        primary: bool,
    },
    /// An editable field.
    Input {
        /// Component id, passed back on edit.
        id: ComponentId,
        /// Field caption.
        label: &'static str,
        /// Hint shown while empty.
        placeholder: Option<String>,
        /// Entered value, empty if unset.
        value: String,
        /// Inline validation failure.
        error: Option<String>,
        /// Digits-only keypad.
        numeric: bool,
    },
    /// Verbatim text.
    Text {
        /// Text to show.
        value: String,
    },
    /// Opaque image asset.
    Image {
        /// Component id.
        id: ComponentId,
    },
}

impl ComponentView {
    /// Id of a focusable component.
    pub fn focus_id(&self) -> Option<&ComponentId> {
        match self {
            Self::Button { id, .. } | Self::Input { id, .. } => Some(id),
            Self::Text { .. } | Self::Image { .. } => None,
        }
    }
}

/// Project the state onto a drawable view.
pub fn project(flow: &Flow, state: &NavigationState) -> ScreenView {
    if let Some(fault) = state.fault() {
        return ScreenView::Fault(FaultView {
            message: fault.to_string(),
            missing_screen: fault.missing_screen().clone(),
        });
    }

    if let Some(effect) = state.pending_effect() {
        return ScreenView::Busy(BusyView {
            screen_id: state.current_screen_id().clone(),
            target: effect.target.clone(),
        });
    }

    let Some(screen) = flow.screen(state.current_screen_id().as_str()) else {
        // Sessions fault before getting here.
        let missing = state.current_screen_id().clone();
        return ScreenView::Fault(FaultView {
            message: format!("screen '{missing}' not found in flow"),
            missing_screen: missing,
        });
    };

    let components = screen
        .components
        .iter()
        .map(|component| {
            let id = component.id.clone();
            match &component.kind {
                ComponentKind::Button(button) => ComponentView::Button {
                    id,
                    label: button.label.clone(),
                    primary: button.primary,
                },
                ComponentKind::InputText(input) | ComponentKind::InputCpf(input) => {
                    let numeric = matches!(component.kind, ComponentKind::InputCpf(_));
                    ComponentView::Input {
                        value: state.inputs().get(&id).cloned().unwrap_or_default(),
                        error: state.validation_errors().get(&id).cloned(),
                        id,
                        label: if numeric { "CPF" } else { "Input" },
                        placeholder: input.placeholder.clone(),
                        numeric,
                    }
                },
                ComponentKind::TextBlock(text) => ComponentView::Text { value: text.value.clone() },
                ComponentKind::Image(_) => ComponentView::Image { id },
            }
        })
        .collect();

    ScreenView::Page(PageView {
        screen_id: screen.id.clone(),
        title: screen.title.clone(),
        subtitle: screen.subtitle.clone(),
        kind: screen.kind,
        can_go_back: state.can_go_back(),
        components,
    })
}
