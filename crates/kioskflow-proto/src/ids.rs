//! Opaque identifiers with referential meaning.
//!
//! Screen and component identifiers are free-form strings in the document, but
//! they act as keys (`screens` map, `inputs` map, button targets). Wrapping them
//! keeps them from being mixed up with display strings such as `label` or
//! `title`.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id! {
    /// Identifies a flow document.
    ///
    /// A change of `FlowId` between two loaded documents means "this is a
    /// different flow" and resets any running session.
    FlowId
}

string_id! {
    /// Key of a screen in the flow's `screens` map.
    ScreenId
}

string_id! {
    /// Identifier of a component, unique within its screen.
    ///
    /// Also the key under which an input component's value is collected.
    ComponentId
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = ScreenId::new("welcome");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"welcome\"");

        let back: ScreenId = serde_json::from_str("\"welcome\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn map_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(ComponentId::new("inp_cpf"), 1);

        assert_eq!(map.get("inp_cpf"), Some(&1));
    }
}
