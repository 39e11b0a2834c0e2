use bevy::prelude::*;
use crate::shared::*;

/// Camera offset from the player: up and behind.
pub const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 14.0, 16.0);

/// Smoothly follow the player with the camera using a lerp.
pub fn camera_follow_player(
    time: Res<Time>,
    player_query: Query<&Transform, (With<Player>, Without<Camera3d>)>,
    mut camera_query: Query<&mut Transform, (With<Camera3d>, Without<Player>)>,
) {
    let Ok(player) = player_query.get_single() else {
        return;
    };
    let Ok(mut cam_tf) = camera_query.get_single_mut() else {
        return;
    };

    let target = player.translation + CAMERA_OFFSET;
    let lerp_speed = 4.0;
    let t = (lerp_speed * time.delta_secs()).min(1.0);
    cam_tf.translation = cam_tf.translation.lerp(target, t);
}
