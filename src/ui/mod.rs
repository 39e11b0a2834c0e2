//! UI domain plugin for Forest Bear.
//!
//! Two surfaces: floating speech labels that follow every `DialogueMarker`,
//! and the answer bar at the bottom of the screen that mirrors
//! `ButtonOptions`.

mod option_bar;
mod speech;

use bevy::prelude::*;
use bevy::transform::TransformSystem;
use crate::shared::*;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // ─── ANSWER BAR: always present, empty until a quiz arrives ───
        app.add_systems(Startup, option_bar::spawn_option_bar);
        app.add_systems(
            Update,
            (
                option_bar::rebuild_option_buttons,
                option_bar::handle_option_clicks,
                option_bar::update_option_visuals,
            )
                .run_if(in_state(GameState::Playing)),
        );

        // ─── SPEECH LABELS ───
        app.add_systems(
            Update,
            (
                speech::attach_speech_labels,
                speech::sync_speech_labels,
                speech::remove_orphan_labels,
            )
                .chain(),
        );
        // Positions are only known after transform propagation.
        app.add_systems(
            PostUpdate,
            speech::follow_speakers.after(TransformSystem::TransformPropagate),
        );
    }
}
