//! Minimal body integration: gravity and a single flat floor.

use bevy::prelude::*;
use crate::shared::*;

/// Vertical speed after one tick: accelerates downward in the air, rests on
/// the ground.
pub fn fall_speed(vertical: f32, grounded: bool, gravity: f32, dt: f32) -> f32 {
    if grounded {
        0.0
    } else {
        vertical - gravity * dt
    }
}

/// Moves `position` by `velocity` and resolves contact with the floor at
/// `floor`. Returns the new position, the new velocity, and whether the body
/// ended up on the floor.
pub fn slide_step(position: Vec3, velocity: Vec3, floor: f32, dt: f32) -> (Vec3, Vec3, bool) {
    let mut position = position + velocity * dt;
    let mut velocity = velocity;

    if position.y <= floor {
        position.y = floor;
        velocity.y = velocity.y.max(0.0);
        (position, velocity, true)
    } else {
        (position, velocity, false)
    }
}

/// System: integrate every body's velocity. Runs every tick for every body,
/// patrolling or not.
pub fn move_and_slide(
    time: Res<Time>,
    ground: Res<GroundPlane>,
    mut bodies: Query<(&mut Transform, &mut Velocity, &mut Grounded)>,
) {
    let dt = time.delta_secs();
    for (mut transform, mut velocity, mut grounded) in &mut bodies {
        let (position, new_velocity, on_floor) =
            slide_step(transform.translation, velocity.0, ground.height, dt);
        transform.translation = position;
        velocity.0 = new_velocity;
        grounded.0 = on_floor;
    }
}
