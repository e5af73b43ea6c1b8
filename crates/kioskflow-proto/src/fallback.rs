//! Built-in clinic flow.
//!
//! Used when nothing else is available: no document on startup, or a
//! generator that failed. It must always parse and lint clean.

use crate::{
    Button, ButtonAction, Component, ComponentKind, Flow, Input, Screen, ScreenId, ScreenKind,
    ValidationRule,
};

/// Identity of the built-in flow.
pub const FALLBACK_FLOW_ID: &str = "default-clinic-flow";

fn goto(id: &str, label: &str, target: &str, primary: bool) -> Component {
    let action = ButtonAction::GotoScreen { target: ScreenId::new(target) };
    Component {
        id: id.into(),
        kind: ComponentKind::Button(Button { label: label.into(), action, primary }),
    }
}

fn enqueue(id: &str, label: &str, target: &str) -> Component {
    let action = ButtonAction::Enqueue { target: ScreenId::new(target) };
    Component {
        id: id.into(),
        kind: ComponentKind::Button(Button { label: label.into(), action, primary: true }),
    }
}

fn finish(id: &str, label: &str) -> Component {
    Component {
        id: id.into(),
        kind: ComponentKind::Button(Button {
            label: label.into(),
            action: ButtonAction::Restart,
            primary: true,
        }),
    }
}

fn subtitled(mut screen: Screen, subtitle: &str) -> Screen {
    screen.subtitle = Some(subtitle.into());
    screen
}

impl Flow {
    /// The built-in clinic flow: check-in by CPF or take a walk-in ticket.
    pub fn fallback() -> Self {
        let cpf = Component {
            id: "inp_cpf".into(),
            kind: ComponentKind::InputCpf(Input {
                placeholder: Some("000.000.000-00".into()),
                validation: Some(ValidationRule {
                    regex: r"^\d{11}$".into(),
                    message: "Enter the 11 digits of your CPF".into(),
                }),
            }),
        };

        let mut flow = Self::new(FALLBACK_FLOW_ID, "welcome")
            .with_screen(subtitled(
                Screen::new("welcome", "Welcome to the clinic", ScreenKind::Menu)
                    .with_component(goto("btn_checkin", "I have an appointment", "checkin_cpf", true))
                    .with_component(goto(
                        "btn_walkin",
                        "No appointment (take a ticket)",
                        "service_selection",
                        false,
                    )),
                "Please choose an option to start",
            ))
            .with_screen(subtitled(
                Screen::new("checkin_cpf", "Identification", ScreenKind::Form)
                    .with_component(cpf)
                    .with_component(goto(
                        "btn_confirm_cpf",
                        "Find appointment",
                        "success_checkin",
                        true,
                    ))
                    .with_component(goto("btn_back", "Back", "welcome", false)),
                "Type your CPF to find your appointment",
            ))
            .with_screen(
                Screen::new("service_selection", "Choose a service", ScreenKind::Menu)
                    .with_component(enqueue("btn_exams", "Laboratory exams", "queue_lab"))
                    .with_component(enqueue("btn_admin", "Billing / payments", "queue_general"))
                    .with_component(goto("btn_back_home", "Back to start", "welcome", false)),
            )
            .with_screen(subtitled(
                Screen::new("queue_lab", "Please wait for your turn", ScreenKind::Success)
                    .with_component(Component::text_block("txt_ticket", "Your ticket: LAB-042"))
                    .with_component(finish("btn_finish", "Done")),
                "You were added to the laboratory queue.",
            ))
            .with_screen(subtitled(
                Screen::new("queue_general", "All set!", ScreenKind::Success)
                    .with_component(Component::text_block("txt_ticket_g", "Your ticket: GEN-105"))
                    .with_component(finish("btn_finish_g", "Done")),
                "Wait for your number on the main panel.",
            ))
            .with_screen(subtitled(
                Screen::new("success_checkin", "Checked in!", ScreenKind::Success)
                    .with_component(finish("btn_ok", "Finish")),
                "Please go to office 3.",
            ));

        flow.location_id = Some("unit-downtown".into());
        flow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_enterable() {
        let flow = Flow::fallback();

        assert!(flow.check().is_ok());
        assert_eq!(flow.flow_id.as_str(), FALLBACK_FLOW_ID);
        assert_eq!(flow.screen_count(), 6);
    }

    #[test]
    fn fallback_survives_text_round_trip() {
        let flow = Flow::fallback();
        let text = flow.to_json_pretty().unwrap();

        assert_eq!(Flow::parse(&text).unwrap(), flow);
    }
}
