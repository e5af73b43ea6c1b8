//! Non-blocking document diagnostics for tooling.
//!
//! [`Flow::lint`] reports problems that do not prevent a flow from being
//! entered. A dangling target, for example, only matters once somebody presses
//! the button; the session handles it as a degraded state at that point.

use std::collections::HashSet;

use thiserror::Error;

use crate::{ComponentId, Flow, ScreenId};

/// A problem found by [`Flow::lint`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowWarning {
    /// A screen's `id` differs from its key in `screens`.
    #[error("screen '{key}' declares id '{id}'")]
    ScreenKeyMismatch {
        /// Key in the `screens` map.
        key: ScreenId,
        /// The `id` field of the screen.
        id: ScreenId,
    },

    /// A button or effect leads to a screen that does not exist.
    #[error("'{component}' on screen '{screen}' targets missing screen '{target}'")]
    DanglingTarget {
        /// Screen holding the button.
        screen: ScreenId,
        /// The button.
        component: ComponentId,
        /// The missing destination.
        target: ScreenId,
    },

    /// Two components on one screen share an id.
    #[error("component id '{component}' is used more than once on screen '{screen}'")]
    DuplicateComponent {
        /// Screen holding the components.
        screen: ScreenId,
        /// The repeated id.
        component: ComponentId,
    },

    /// A validation pattern does not compile. The field will always fail.
    #[error("validation pattern of '{component}' on screen '{screen}' is invalid: {error}")]
    InvalidPattern {
        /// Screen holding the input.
        screen: ScreenId,
        /// The input.
        component: ComponentId,
        /// Compiler message.
        error: String,
    },

    /// A screen has no components, so nothing can leave it.
    #[error("screen '{screen}' has no components")]
    EmptyScreen {
        /// The empty screen.
        screen: ScreenId,
    },
}

impl Flow {
    /// Collect every diagnostic in document order.
    pub fn lint(&self) -> Vec<FlowWarning> {
        let mut warnings = Vec::new();

        for (key, screen) in &self.screens {
            if key != &screen.id {
                warnings.push(FlowWarning::ScreenKeyMismatch {
                    key: key.clone(),
                    id: screen.id.clone(),
                });
            }

            if screen.components.is_empty() {
                warnings.push(FlowWarning::EmptyScreen { screen: key.clone() });
            }

            let mut seen = HashSet::new();
            for component in &screen.components {
                if !seen.insert(&component.id) {
                    warnings.push(FlowWarning::DuplicateComponent {
                        screen: key.clone(),
                        component: component.id.clone(),
                    });
                }

                if let Some(target) = component.as_button().and_then(|b| b.action.target())
                    && !self.contains_screen(target.as_str())
                {
                    warnings.push(FlowWarning::DanglingTarget {
                        screen: key.clone(),
                        component: component.id.clone(),
                        target: target.clone(),
                    });
                }

                if let Some(rule) = component.as_input().and_then(|i| i.validation.as_ref())
                    && let Err(err) = rule.compile()
                {
                    warnings.push(FlowWarning::InvalidPattern {
                        screen: key.clone(),
                        component: component.id.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        warnings
    }
}
