//! Operations for model-based testing.
//!
//! Operations address components by slot (index on the current screen) rather
//! than by id, so randomly generated sequences hit real components most of
//! the time.

use arbitrary::Arbitrary;
use kioskflow_core::{Session, SessionEvent};
use kioskflow_proto::{ComponentId, Screen};

/// Operations that can be applied to a session.
#[derive(Debug, Clone, Arbitrary)]
pub enum Operation {
    /// Press the component at `slot` (modulo the component count).
    Press {
        /// Component index on the current screen.
        slot: u8,
    },

    /// Replace the value of the input at `slot` (modulo the input count).
    Type {
        /// Input index on the current screen.
        slot: u8,
        /// Value to enter.
        value: SmallValue,
    },

    /// Go back.
    Back,

    /// Restart the flow.
    Restart,

    /// Fire the pending effect's timer, if any.
    CompleteEffect,
}

/// Values that exercise the interesting validation outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum SmallValue {
    /// Nothing typed.
    Empty,
    /// Too few digits.
    Short,
    /// Eleven digits.
    Cpf,
    /// Not digits at all.
    Letters,
}

impl SmallValue {
    /// Text entered for this value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "",
            Self::Short => "123",
            Self::Cpf => "12345678901",
            Self::Letters => "abc",
        }
    }
}

impl Operation {
    /// Resolve slots against `screen` into a concrete session event.
    ///
    /// Returns `None` when the slot addresses nothing (no components, no
    /// inputs, or nothing pending).
    pub fn resolve(&self, screen: Option<&Screen>, session: &Session) -> Option<SessionEvent> {
        match self {
            Self::Press { slot } => {
                let components = &screen?.components;
                let component = components.get(usize::from(*slot) % components.len().max(1))?;
                Some(SessionEvent::Press { component: component.id.clone() })
            },
            Self::Type { slot, value } => {
                let inputs: Vec<&ComponentId> = screen?
                    .components
                    .iter()
                    .filter(|c| c.as_input().is_some())
                    .map(|c| &c.id)
                    .collect();
                let component = inputs.get(usize::from(*slot) % inputs.len().max(1))?;
                Some(SessionEvent::Input {
                    component: (*component).clone(),
                    value: value.as_str().to_owned(),
                })
            },
            Self::Back => Some(SessionEvent::Back),
            Self::Restart => Some(SessionEvent::Restart),
            Self::CompleteEffect => session
                .state()
                .pending_effect()
                .map(|effect| SessionEvent::EffectCompleted { generation: effect.generation }),
        }
    }
}
