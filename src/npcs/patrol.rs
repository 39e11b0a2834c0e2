//! Waypoint patrol: walk to a waypoint, pause, move on to the next one.

use bevy::prelude::*;

use crate::config::NpcSettings;
use crate::shared::*;
use crate::world::physics::fall_speed;

/// Horizontal distance at which a waypoint counts as reached.
pub const ARRIVAL_THRESHOLD: f32 = 0.1;

/// Movement tuning and route for one patrolling NPC.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PatrolConfig {
    pub speed: f32,
    pub gravity: f32,
    /// Names of `Waypoint` entities, visited in order and then wrapped.
    pub waypoints: Vec<String>,
    pub wait_time: f32,
}

impl From<&NpcSettings> for PatrolConfig {
    fn from(settings: &NpcSettings) -> Self {
        Self {
            speed: settings.speed,
            gravity: settings.gravity,
            waypoints: settings.patrol.clone(),
            wait_time: settings.wait_time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatrolPhase {
    #[default]
    Waiting,
    Moving,
}

/// Starts out waiting with an expired timer, so the first tick advances from
/// waypoint 0 to waypoint 1 before any movement.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct PatrolState {
    pub current: usize,
    pub phase: PatrolPhase,
    pub wait_timer: f32,
}

/// One tick of patrol steering. Writes `velocity`; does not move the body.
///
/// `resolve` maps a waypoint name to its world position. When it returns
/// `None` the horizontal update is skipped for this tick.
pub fn patrol_step(
    config: &PatrolConfig,
    state: &mut PatrolState,
    position: Vec3,
    velocity: &mut Vec3,
    grounded: bool,
    dt: f32,
    resolve: impl Fn(&str) -> Option<Vec3>,
) {
    velocity.y = fall_speed(velocity.y, grounded, config.gravity, dt);

    let count = config.waypoints.len();
    if count == 0 {
        return;
    }

    match state.phase {
        PatrolPhase::Waiting => {
            state.wait_timer -= dt;
            if state.wait_timer <= 0.0 {
                state.phase = PatrolPhase::Moving;
                state.current = (state.current + 1) % count;
            }
        }
        PatrolPhase::Moving => {
            let Some(target) = config
                .waypoints
                .get(state.current)
                .and_then(|name| resolve(name.as_str()))
            else {
                return;
            };

            let mut direction = target - position;
            direction.y = 0.0;

            if direction.length() > ARRIVAL_THRESHOLD {
                let direction = direction.normalize();
                velocity.x = direction.x * config.speed;
                velocity.z = direction.z * config.speed;
            } else {
                velocity.x = 0.0;
                velocity.z = 0.0;
                state.phase = PatrolPhase::Waiting;
                state.wait_timer = config.wait_time;
            }
        }
    }
}

/// System: steer every patrolling NPC toward its current waypoint.
pub fn patrol_npcs(
    time: Res<Time>,
    waypoints: Query<(&Name, &GlobalTransform), With<Waypoint>>,
    mut npcs: Query<(&PatrolConfig, &mut PatrolState, &GlobalTransform, &mut Velocity, &Grounded)>,
) {
    let dt = time.delta_secs();
    let resolve = |name: &str| {
        waypoints
            .iter()
            .find(|(waypoint_name, _)| waypoint_name.as_str() == name)
            .map(|(_, transform)| transform.translation())
    };

    for (config, mut state, transform, mut velocity, grounded) in &mut npcs {
        patrol_step(
            config,
            &mut state,
            transform.translation(),
            &mut velocity.0,
            grounded.0,
            dt,
            &resolve,
        );
    }
}
