// src/forms/systems/logic/revalidate.rs
use bevy::prelude::*;
use std::collections::HashSet;

use crate::forms::{events::RequestFormRevalidation, resources::FormRegistry};

/// Re-runs the rule set of each requested form once, no matter how many
/// requests arrived for it this frame.
pub fn handle_revalidation_request(
    mut events: EventReader<RequestFormRevalidation>,
    mut registry: ResMut<FormRegistry>,
) {
    let mut seen: HashSet<String> = HashSet::new();

    for event in events.read() {
        if !seen.insert(event.form_id.clone()) {
            continue;
        }
        let Some(session) = registry.session_mut(&event.form_id) else {
            // Closed between the edit and this frame
            trace!(
                "Revalidation skipped for '{}': form is not open.",
                event.form_id
            );
            continue;
        };
        let result = session.validate();
        if result.valid {
            debug!("Form '{}' is valid.", event.form_id);
        } else {
            debug!(
                "Form '{}' has {} validation error(s).",
                event.form_id,
                result.errors.len()
            );
        }
    }
}
