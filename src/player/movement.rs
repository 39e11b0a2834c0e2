use bevy::prelude::*;
use crate::shared::*;
use crate::world::physics::fall_speed;

/// Walking tuning for the player body.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PlayerMovement {
    pub speed: f32,
    pub gravity: f32,
}

impl Default for PlayerMovement {
    fn default() -> Self {
        Self {
            speed: 8.0,
            gravity: 20.0,
        }
    }
}

/// Unit direction on the floor plane from WASD / arrow keys. Forward (W) is
/// away from the camera, toward -Z.
pub fn walk_direction(keyboard: &ButtonInput<KeyCode>) -> Vec3 {
    let mut dir = Vec3::ZERO;

    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        dir.z -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        dir.z += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        dir.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        dir.x += 1.0;
    }

    // Normalise so diagonal speed equals cardinal speed.
    dir.normalize_or_zero()
}

/// Core movement system: turns input into horizontal velocity and lets
/// gravity handle the rest. Integration happens in `move_and_slide`.
pub fn steer_player(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<(&PlayerMovement, &mut Velocity, &Grounded), With<Player>>,
) {
    let Ok((movement, mut velocity, grounded)) = query.get_single_mut() else {
        return;
    };

    let walk = walk_direction(&keyboard) * movement.speed;
    velocity.0.x = walk.x;
    velocity.0.z = walk.z;
    velocity.0.y = fall_speed(velocity.0.y, grounded.0, movement.gravity, time.delta_secs());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_keys_no_walk() {
        let keyboard = ButtonInput::<KeyCode>::default();
        assert_eq!(walk_direction(&keyboard), Vec3::ZERO);
    }

    #[test]
    fn test_diagonal_is_normalised() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::KeyW);
        keyboard.press(KeyCode::KeyD);

        let dir = walk_direction(&keyboard);
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.x > 0.0 && dir.z < 0.0);
        assert_eq!(dir.y, 0.0);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::KeyA);
        keyboard.press(KeyCode::ArrowRight);
        assert_eq!(walk_direction(&keyboard), Vec3::ZERO);
    }
}
