//! Field validation.
//!
//! Validation gates forward progress out of `form` screens only. Inputs on any
//! other kind of screen are never checked, even when they carry a rule.
//!
//! The check is a pure predicate over the current values. It is re-run on
//! every attempted forward transition and never cached.

use std::collections::BTreeMap;

use kioskflow_proto::{ComponentId, Screen};

/// Values entered so far, by input component id. Flow-scoped.
pub type Inputs = BTreeMap<ComponentId, String>;

/// Failure messages by input component id. Screen-scoped.
pub type FieldErrors = BTreeMap<ComponentId, String>;

/// Check every ruled input of a form screen against the collected values.
///
/// An unset value is checked as the empty string; absence only fails if the
/// pattern rejects `""`. Patterns are tested with `is_match`, so authors anchor
/// them. A pattern that does not compile fails its field.
///
/// Returns an empty map when the screen may be left.
pub fn validate(screen: &Screen, inputs: &Inputs) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if !screen.is_form() {
        return errors;
    }

    for component in &screen.components {
        let Some(rule) = component.as_input().and_then(|input| input.validation.as_ref()) else {
            continue;
        };

        let value = inputs.get(&component.id).map_or("", String::as_str);
        let passed = match rule.compile() {
            Ok(pattern) => pattern.is_match(value),
            Err(err) => {
                tracing::warn!(
                    screen = %screen.id,
                    component = %component.id,
                    "validation pattern does not compile: {err}"
                );
                false
            },
        };

        if !passed {
            errors.insert(component.id.clone(), rule.message.clone());
        }
    }

    errors
}
