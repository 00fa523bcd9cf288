use winit::keyboard::{Key, NamedKey};

use crate::params::{Param, ParameterStore, RenderParameters};

/// What a key press asks the renderer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Nudge { param: Param, steps: i32 },
    Quit,
}

/// Key bindings: each parameter gets an up key on the top letter row and a
/// down key directly below it.
const BINDINGS: [(char, char, Param); 4] = [
    ('q', 'a', Param::Mu),
    ('w', 's', Param::Sigma),
    ('e', 'd', Param::Frequency),
    ('r', 'f', Param::StressLevel),
];

pub fn action_for_key(key: &Key) -> Option<ControlAction> {
    match key {
        Key::Named(NamedKey::Escape) => Some(ControlAction::Quit),
        Key::Character(value) => {
            let mut chars = value.chars();
            let ch = chars.next()?.to_ascii_lowercase();
            if chars.next().is_some() {
                return None;
            }
            BINDINGS.iter().find_map(|&(up, down, param)| {
                if ch == up {
                    Some(ControlAction::Nudge { param, steps: 1 })
                } else if ch == down {
                    Some(ControlAction::Nudge { param, steps: -1 })
                } else {
                    None
                }
            })
        }
        _ => None,
    }
}

/// Applies a nudge to the store and returns the new parameter set.
pub fn apply(store: &ParameterStore, param: Param, steps: i32) -> RenderParameters {
    let next = store.update(|params| params.nudge(param, steps));
    tracing::debug!(%param, value = next.get(param), "parameter changed");
    next
}

/// One-line usage summary for the log.
pub fn help_text() -> String {
    let mut parts: Vec<String> = BINDINGS
        .iter()
        .map(|(up, down, param)| {
            format!(
                "{}/{} {param}",
                up.to_ascii_uppercase(),
                down.to_ascii_uppercase()
            )
        })
        .collect();
    parts.push("Esc quit".to_string());
    parts.join(", ")
}
