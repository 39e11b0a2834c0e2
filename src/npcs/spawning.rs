//! Bear spawning: logical components plus a simple blocky body.

use bevy::prelude::*;

use super::detection::{DetectionArea, DetectionOccupants};
use super::patrol::{PatrolConfig, PatrolState};
use crate::config::NpcSettings;
use crate::shared::*;

/// What the speech marker says before the chat client has answered.
pub const OPENING_LINE: &str = "Hi from the forest!";

/// Everything the bear needs to patrol, detect, and talk. No rendering.
pub fn bear_bundle(settings: &NpcSettings) -> impl Bundle {
    (
        BearNpc,
        Name::new("BearNpc"),
        PatrolConfig::from(settings),
        PatrolState::default(),
        Velocity::default(),
        Grounded::default(),
        DialogueMarker::new(OPENING_LINE),
        DetectionArea {
            radius: settings.detection_radius,
        },
        DetectionOccupants::default(),
        Transform::from_translation(Vec3::from_array(settings.spawn)),
    )
}

/// System: on entering Playing, spawn the bear with its body meshes.
pub fn spawn_bear(
    mut commands: Commands,
    settings: Res<NpcSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let fur = materials.add(Color::srgb(0.36, 0.22, 0.12));
    let snout = materials.add(Color::srgb(0.55, 0.4, 0.28));

    commands
        .spawn((bear_bundle(&settings), Visibility::default()))
        .with_children(|parent| {
            // Body
            parent.spawn((
                Mesh3d(meshes.add(Cuboid::new(1.4, 1.2, 2.0))),
                MeshMaterial3d(fur.clone()),
                Transform::from_xyz(0.0, 0.8, 0.0),
            ));
            // Head
            parent.spawn((
                Mesh3d(meshes.add(Cuboid::new(0.9, 0.8, 0.8))),
                MeshMaterial3d(fur),
                Transform::from_xyz(0.0, 1.5, 1.1),
            ));
            // Snout
            parent.spawn((
                Mesh3d(meshes.add(Cuboid::new(0.4, 0.3, 0.3))),
                MeshMaterial3d(snout),
                Transform::from_xyz(0.0, 1.4, 1.6),
            ));
        });

    info!(
        "[NPC] Bear spawned with {} patrol points",
        settings.patrol.len()
    );
}
