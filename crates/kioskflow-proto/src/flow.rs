//! Flow documents and screens.
//!
//! A [`Flow`] is the root aggregate: a map of screens plus the id of the
//! screen a session starts on.
//!
//! # Invariants
//!
//! - Entry Point: `start_screen_id` is a key of `screens`. [`Flow::parse`]
//!   rejects documents that violate this, so every `Flow` obtained from
//!   `parse` can be entered.
//!
//! Everything else (target existence, screen id/key agreement, duplicate
//! component ids) is reported by [`Flow::lint`] and never blocks loading, so a
//! partially-correct document can still be edited live.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Component, ComponentId, FlowId, ParseError, ScreenId};

/// Screen category. Drives validation policy and visual affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenKind {
    /// Choice between buttons.
    Menu,
    /// Data entry. The only kind whose inputs are validated.
    Form,
    /// Terminal confirmation. Conventionally left only via restart.
    Success,
    /// Informational page.
    Info,
}

/// One navigable page of a flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    /// Must equal the screen's key in [`Flow::screens`]. Checked by lint,
    /// never relied upon.
    pub id: ScreenId,
    /// Heading.
    pub title: String,
    /// Secondary heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Screen category, `type` in the document.
    #[serde(rename = "type")]
    pub kind: ScreenKind,
    /// Components in display order.
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Screen {
    /// Create an empty screen.
    pub fn new(id: impl Into<ScreenId>, title: impl Into<String>, kind: ScreenKind) -> Self {
        Self { id: id.into(), title: title.into(), subtitle: None, kind, components: Vec::new() }
    }

    /// Append a component (builder style).
    #[must_use]
    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// Component with the given id. First match wins if ids are duplicated.
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id.as_str() == id)
    }

    /// Whether inputs on this screen gate forward transitions.
    pub fn is_form(&self) -> bool {
        self.kind == ScreenKind::Form
    }
}

/// A complete declarative kiosk interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    /// Identity; a change means "different flow, reset the session".
    pub flow_id: FlowId,
    /// Deployment location, passed through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    /// Screen every session starts on.
    pub start_screen_id: ScreenId,
    /// Opaque styling bag, never examined. An explicit `null` is kept as
    /// `Some(Value::Null)` so it survives a round trip.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub theme: Option<serde_json::Value>,
    /// Screens by id, in document order.
    pub screens: IndexMap<ScreenId, Screen>,
}

impl Flow {
    /// Parse and check a raw JSON document.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Syntax`] if the text is not JSON
    /// - [`ParseError::Shape`] if the JSON does not match the schema (including
    ///   missing `screens` or `start_screen_id`)
    /// - [`ParseError::UnknownStartScreen`] if the entry point is not a screen
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let flow: Self = serde_json::from_str(raw)?;
        flow.check()?;
        Ok(flow)
    }

    /// Check load-time invariants on an already-decoded document.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnknownStartScreen`] if the entry point is
    /// missing from `screens`.
    pub fn check(&self) -> Result<(), ParseError> {
        if !self.screens.contains_key(&self.start_screen_id) {
            return Err(ParseError::UnknownStartScreen {
                start_screen_id: self.start_screen_id.clone(),
            });
        }
        Ok(())
    }

    /// Serialize to the editor's pretty JSON form.
    ///
    /// `Flow::parse(&flow.to_json_pretty()?)` yields an equal flow.
    ///
    /// # Errors
    ///
    /// Only fails if the opaque theme holds values JSON cannot represent.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Number of screens.
    pub fn screen_count(&self) -> usize {
        self.screens.len()
    }

    /// Screen every session starts on.
    pub fn entry_point(&self) -> &ScreenId {
        &self.start_screen_id
    }

    /// Screen by id.
    pub fn screen(&self, id: &str) -> Option<&Screen> {
        self.screens.get(id)
    }

    /// Whether a screen with this id exists.
    pub fn contains_screen(&self, id: &str) -> bool {
        self.screens.contains_key(id)
    }

    /// Insert a screen under its own id (builder style).
    #[must_use]
    pub fn with_screen(mut self, screen: Screen) -> Self {
        self.screens.insert(screen.id.clone(), screen);
        self
    }

    /// Create a flow with no screens.
    ///
    /// The result only passes [`Flow::check`] once the start screen is added.
    pub fn new(flow_id: impl Into<FlowId>, start_screen_id: impl Into<ScreenId>) -> Self {
        Self {
            flow_id: flow_id.into(),
            location_id: None,
            start_screen_id: start_screen_id.into(),
            theme: None,
            screens: IndexMap::new(),
        }
    }

    /// All input component ids in the flow, in document order.
    pub fn input_ids(&self) -> impl Iterator<Item = &ComponentId> {
        self.screens
            .values()
            .flat_map(|screen| screen.components.iter())
            .filter(|c| c.as_input().is_some())
            .map(|c| &c.id)
    }
}

/// Deserialize a field that is present in the document, even if `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}
