mod shared;
mod config;
mod player;
mod world;
mod npcs;
mod ai;
mod ui;

use bevy::prelude::*;
use bevy::window::PresentMode;

use ai::client::ApiKey;
use config::{ForestConfig, CONFIG_PATH};
use shared::*;

fn main() {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Forest Bear".into(),
            present_mode: PresentMode::AutoVsync,
            resizable: true,
            ..default()
        }),
        ..default()
    }));

    // Logging is up once DefaultPlugins is added, so config problems are reported.
    let config = ForestConfig::load_or_default(CONFIG_PATH);
    let api_key = ApiKey::from_env(&config.ai.api_key_env);
    if api_key.is_none() {
        warn!("[Config] {} is not set; the bear will not talk", config.ai.api_key_env);
    }

    app
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .insert_resource(config.npc)
        .insert_resource(ClearColor(Color::srgb(0.55, 0.72, 0.85)))
        // Domain plugins
        .add_plugins(world::WorldPlugin)
        .add_plugins(player::PlayerPlugin)
        .add_plugins(npcs::NpcPlugin)
        .add_plugins(ai::AiPlugin::new(config.ai, api_key))
        .add_plugins(ui::UiPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(player::camera::CAMERA_OFFSET).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
