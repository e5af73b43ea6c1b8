//! Declarative UI components.
//!
//! A [`Component`] is one element of a screen: a shared `id` plus a
//! [`ComponentKind`] tagged by the document's `type` field. Buttons carry a
//! [`ButtonAction`] tagged by the document's `action` field.
//!
//! # Wire format
//!
//! ```json
//! { "id": "btn_next", "type": "button", "label": "Next",
//!   "action": "goto_screen", "target": "form", "primary": true }
//! ```
//!
//! `target` is required for `goto_screen` and `enqueue` and ignored for
//! `restart`. Target existence is NOT checked here; dangling targets are a
//! navigation-time condition.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::{ComponentId, ScreenId};

/// Upper bound on the compiled size of an author-supplied pattern.
///
/// Patterns come from untrusted (possibly generated) documents.
pub const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// One UI element on a screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Identifier, unique within the owning screen.
    pub id: ComponentId,
    /// Variant-specific content.
    #[serde(flatten)]
    pub kind: ComponentKind,
}

/// Component variants, tagged by `type` in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentKind {
    /// Pressable button with an action.
    Button(Button),
    /// Free text input.
    InputText(Input),
    /// Brazilian taxpayer id (CPF) input. Same semantics as `InputText`,
    /// rendered with a numeric affordance.
    InputCpf(Input),
    /// Static text shown verbatim.
    TextBlock(TextBlock),
    /// Opaque image asset.
    Image(Image),
}

/// Button content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    /// Text on the button.
    pub label: String,
    /// What pressing the button does.
    #[serde(flatten)]
    pub action: ButtonAction,
    /// Styling hint, passed through.
    #[serde(default)]
    pub primary: bool,
}

/// Action attached to a button, tagged by `action` in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ButtonAction {
    /// Move to another screen.
    GotoScreen {
        /// Destination screen.
        target: ScreenId,
    },
    /// Issue a ticket (simulated side effect), then move to `target`.
    Enqueue {
        /// Screen shown once the effect completes.
        target: ScreenId,
    },
    /// Return to the start screen and clear everything collected.
    Restart,
}

impl ButtonAction {
    /// Screen this action leads to, if any.
    pub fn target(&self) -> Option<&ScreenId> {
        match self {
            Self::GotoScreen { target } | Self::Enqueue { target } => Some(target),
            Self::Restart => None,
        }
    }
}

/// Input content shared by `input_text` and `input_cpf`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    /// Hint shown while empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Rule checked before leaving a form screen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRule>,
}

/// Per-field validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    /// Pattern the whole value is tested against. Authors anchor it.
    pub regex: String,
    /// Message shown when the value does not match.
    pub message: String,
}

impl ValidationRule {
    /// Compile the pattern with a bounded program size.
    ///
    /// # Errors
    ///
    /// Returns the regex error if the pattern is malformed or too large.
    pub fn compile(&self) -> Result<Regex, regex::Error> {
        RegexBuilder::new(&self.regex)
            .size_limit(PATTERN_SIZE_LIMIT)
            .dfa_size_limit(PATTERN_SIZE_LIMIT)
            .build()
    }
}

/// Text block content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Text displayed verbatim.
    #[serde(default)]
    pub value: String,
}

/// Image placeholder. The asset source is external to the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {}

impl Component {
    /// Create a button component.
    pub fn button(id: impl Into<ComponentId>, label: impl Into<String>, action: ButtonAction) -> Self {
        Self {
            id: id.into(),
            kind: ComponentKind::Button(Button { label: label.into(), action, primary: false }),
        }
    }

    /// Create a text input component.
    pub fn text_input(id: impl Into<ComponentId>, validation: Option<ValidationRule>) -> Self {
        Self {
            id: id.into(),
            kind: ComponentKind::InputText(Input { placeholder: None, validation }),
        }
    }

    /// Create a text block component.
    pub fn text_block(id: impl Into<ComponentId>, value: impl Into<String>) -> Self {
        Self { id: id.into(), kind: ComponentKind::TextBlock(TextBlock { value: value.into() }) }
    }

    /// Input content if this is an input component.
    pub fn as_input(&self) -> Option<&Input> {
        match &self.kind {
            ComponentKind::InputText(input) | ComponentKind::InputCpf(input) => Some(input),
            ComponentKind::Button(_) | ComponentKind::TextBlock(_) | ComponentKind::Image(_) => {
                None
            },
        }
    }

    /// Button content if this is a button.
    pub fn as_button(&self) -> Option<&Button> {
        match &self.kind {
            ComponentKind::Button(button) => Some(button),
            ComponentKind::InputText(_)
            | ComponentKind::InputCpf(_)
            | ComponentKind::TextBlock(_)
            | ComponentKind::Image(_) => None,
        }
    }
}
