//! World domain plugin for Forest Bear.
//!
//! Responsible for:
//! - Building the forest clearing (floor, light, waypoint posts)
//! - Integrating body movement against the floor every tick
//! - Leaving `Loading` once the scene exists

use bevy::prelude::*;

use crate::config::NpcSettings;
use crate::shared::*;

pub mod physics;

use physics::move_and_slide;

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GroundPlane>()
            .configure_sets(Update, (MovementSet::Steer, MovementSet::Integrate).chain())
            .add_systems(OnEnter(GameState::Loading), spawn_clearing)
            .add_systems(
                Update,
                move_and_slide
                    .in_set(MovementSet::Integrate)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SCENE
// ═══════════════════════════════════════════════════════════════════════

/// Logical part of a waypoint post; the patrol looks it up by name.
pub fn waypoint_bundle(name: &str, position: Vec3) -> impl Bundle {
    (Waypoint, Name::new(name.to_string()), Transform::from_translation(position))
}

/// System: lay out the clearing and move on to `Playing`.
fn spawn_clearing(
    mut commands: Commands,
    settings: Res<NpcSettings>,
    ground: Res<GroundPlane>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    commands.spawn((
        Name::new("Floor"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(60.0, 60.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.24, 0.42, 0.2))),
        Transform::from_xyz(0.0, ground.height, 0.0),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 9_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 20.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let post = meshes.add(Cylinder::new(0.25, 1.5));
    let post_material = materials.add(Color::srgb(0.45, 0.3, 0.15));
    for spec in &settings.waypoints {
        let position = Vec3::from_array(spec.position);
        commands
            .spawn((waypoint_bundle(&spec.name, position), Visibility::default()))
            .with_children(|parent| {
                parent.spawn((
                    Mesh3d(post.clone()),
                    MeshMaterial3d(post_material.clone()),
                    Transform::from_xyz(0.0, 0.75, 0.0),
                ));
            });
    }

    info!("[World] Clearing ready with {} waypoints", settings.waypoints.len());
    next_state.set(GameState::Playing);
}
