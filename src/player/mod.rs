pub mod camera;
mod movement;
pub mod spawn;

use bevy::prelude::*;
use crate::shared::*;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        // -- Spawn player when we enter Playing --
        app.add_systems(OnEnter(GameState::Playing), spawn::spawn_player);

        // -- Systems that run every frame while Playing --
        app.add_systems(
            Update,
            (
                movement::steer_player.in_set(MovementSet::Steer),
                camera::camera_follow_player.after(MovementSet::Integrate),
            )
                .run_if(in_state(GameState::Playing)),
        );
    }
}
