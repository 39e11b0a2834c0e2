//! Detection boundary around an NPC and the greeting it triggers.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::config::AiSettings;
use crate::shared::*;

/// Sphere around the owner in which named bodies are noticed.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct DetectionArea {
    pub radius: f32,
}

/// Bodies inside the area as of the last check.
#[derive(Component, Debug, Clone, Default)]
pub struct DetectionOccupants(pub HashSet<Entity>);

/// System: fire `BodyEnteredEvent` for every named moving body that was outside an
/// area last tick and is inside it now. Leaving and re-entering fires again.
pub fn detect_body_entries(
    mut areas: Query<(Entity, &DetectionArea, &Transform, &mut DetectionOccupants)>,
    bodies: Query<(Entity, &Transform), (With<Name>, With<Velocity>)>,
    mut entered_writer: EventWriter<BodyEnteredEvent>,
) {
    for (area, detection, area_transform, mut occupants) in &mut areas {
        let inside: HashSet<Entity> = bodies
            .iter()
            .filter(|(body, _)| *body != area)
            .filter(|(_, transform)| {
                transform.translation.distance(area_transform.translation) <= detection.radius
            })
            .map(|(body, _)| body)
            .collect();

        for &body in inside.difference(&occupants.0) {
            entered_writer.send(BodyEnteredEvent { area, body });
        }
        occupants.0 = inside;
    }
}

/// System: greet the configured trigger body whenever it walks up to a bear.
/// Every entry sends its own request.
pub fn greet_player_on_entry(
    mut events: EventReader<BodyEnteredEvent>,
    names: Query<&Name>,
    bears: Query<(), With<BearNpc>>,
    settings: Res<AiSettings>,
    mut ask_writer: EventWriter<AskAiEvent>,
) {
    for event in events.read() {
        if !bears.contains(event.area) {
            continue;
        }
        let Ok(name) = names.get(event.body) else {
            continue;
        };
        if name.as_str() != settings.trigger_name {
            continue;
        }

        info!("[NPC] {} entered detection area of {:?}", name, event.area);
        ask_writer.send(AskAiEvent {
            npc: event.area,
            question: settings.greeting_prompt.clone(),
        });
    }
}
