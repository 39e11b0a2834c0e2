//! NPC domain plugin for Forest Bear.
//!
//! Manages the forest bear: spawning, waypoint patrol, and the detection
//! boundary that makes it greet the player.
//! Communicates exclusively through shared resources and events.

use bevy::prelude::*;
use crate::shared::*;

pub mod detection;
pub mod patrol;
pub mod spawning;

use detection::{detect_body_entries, greet_player_on_entry};
use patrol::patrol_npcs;
use spawning::spawn_bear;

pub struct NpcPlugin;

impl Plugin for NpcPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BodyEnteredEvent>()
            .add_event::<AskAiEvent>();

        // Spawn the bear when entering Playing
        app.add_systems(OnEnter(GameState::Playing), spawn_bear);

        app.add_systems(
            Update,
            (
                // Patrol: steer toward the current waypoint every frame
                patrol_npcs.in_set(MovementSet::Steer),
                // Detection: compare positions after this frame's movement
                (detect_body_entries, greet_player_on_entry)
                    .chain()
                    .after(MovementSet::Integrate),
            )
                .run_if(in_state(GameState::Playing)),
        );
    }
}
