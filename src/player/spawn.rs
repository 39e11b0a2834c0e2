use bevy::prelude::*;
use crate::shared::*;
use super::movement::PlayerMovement;

/// Where the player starts: across the clearing from the bear's den.
const SPAWN_POSITION: Vec3 = Vec3::new(0.0, 0.0, 14.0);

/// Logical part of the player body. The name is what detection areas look for.
pub fn player_bundle(position: Vec3) -> impl Bundle {
    (
        Player,
        Name::new("Player"),
        PlayerMovement::default(),
        Velocity::default(),
        Grounded(true),
        Transform::from_translation(position),
    )
}

/// Spawn the player entity with all necessary components.
/// Runs once on `OnEnter(GameState::Playing)`.
pub fn spawn_player(
    mut commands: Commands,
    existing: Query<Entity, With<Player>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Guard: don't double-spawn if returning to Playing state.
    if !existing.is_empty() {
        return;
    }

    commands
        .spawn((player_bundle(SPAWN_POSITION), Visibility::default()))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(meshes.add(Capsule3d::new(0.4, 1.0))),
                MeshMaterial3d(materials.add(Color::srgb(0.2, 0.5, 0.8))),
                Transform::from_xyz(0.0, 0.9, 0.0),
            ));
        });
}
