//! Game configuration loaded from a RON file at startup.
//!
//! Every field has a default, so a partial file (or no file at all) still
//! yields a playable setup. The API key is never stored here: the file only
//! names the environment variable the binary reads it from.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_PATH: &str = "assets/config/forest.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config file: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    pub npc: NpcSettings,
    pub ai: AiSettings,
}

impl ForestConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }

    /// Loads `path`, logging and falling back to defaults when it is missing
    /// or malformed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                info!("[Config] Loaded {}", path.display());
                config
            }
            Err(err) => {
                warn!("[Config] {} ({}), using defaults", err, path.display());
                Self::default()
            }
        }
    }
}

/// A named patrol point placed in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointSpec {
    pub name: String,
    pub position: [f32; 3],
}

/// Bear placement, movement tuning, and its patrol route.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcSettings {
    pub spawn: [f32; 3],
    pub speed: f32,
    pub gravity: f32,
    pub wait_time: f32,
    /// Waypoint names, visited in order.
    pub patrol: Vec<String>,
    /// Waypoints to place in the scene. A patrol name with no matching
    /// waypoint is skipped at runtime.
    pub waypoints: Vec<WaypointSpec>,
    pub detection_radius: f32,
}

impl Default for NpcSettings {
    fn default() -> Self {
        let waypoints = vec![
            WaypointSpec { name: "Stump".into(), position: [-8.0, 0.0, -6.0] },
            WaypointSpec { name: "Creek".into(), position: [8.0, 0.0, -6.0] },
            WaypointSpec { name: "Berries".into(), position: [8.0, 0.0, 6.0] },
            WaypointSpec { name: "Den".into(), position: [-8.0, 0.0, 6.0] },
        ];
        Self {
            spawn: [-8.0, 2.0, -6.0],
            speed: 10.0,
            gravity: 20.0,
            wait_time: 0.1,
            patrol: waypoints.iter().map(|w| w.name.clone()).collect(),
            waypoints,
            detection_radius: 4.0,
        }
    }
}

/// Remote chat-completion service and the prompts sent to it.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub request_timeout_secs: u64,
    pub quiz_prompt: String,
    pub quiz_temperature: f32,
    pub retry_prompt: String,
    pub retry_temperature: f32,
    pub ask_temperature: f32,
    pub greeting_prompt: String,
    /// Name of the body whose arrival triggers the greeting.
    pub trigger_name: String,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://openrouter.ai/api/v1".into(),
            model: "meta-llama/llama-4-scout".into(),
            api_key_env: "OPENROUTER_API_KEY".into(),
            request_timeout_secs: 120,
            quiz_prompt: "Elabore uma questão simples de múltipla escolha. Use pouco texto. \
                Use o formato <form><question>[QUESTION HERE]</question><choices><a>[FIRST CHOICE]</a>\
                <b>[SECOND CHOICE]</b>...</choices></form>, give the answer in xml. Dont talk:\n"
                .into(),
            quiz_temperature: 1.8,
            retry_prompt: "ONLY output XML in this exact format, no other text: \
                <form><question>What is 2+2?</question><choices><a>3</a><b>4</b><c>5</c></choices></form>"
                .into(),
            retry_temperature: 1.2,
            ask_temperature: 1.3,
            greeting_prompt: "Greet the player as a friendly forest bear in Portuguese.".into(),
            trigger_name: "Player".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ForestConfig::from_ron_str(
            r#"(
                npc: (speed: 4.5, patrol: ["Creek"]),
                ai: (model: "test/model"),
            )"#,
        )
        .unwrap();

        assert_eq!(config.npc.speed, 4.5);
        assert_eq!(config.npc.patrol, vec!["Creek".to_string()]);
        assert_eq!(config.npc.gravity, 20.0);
        assert_eq!(config.ai.model, "test/model");
        assert_eq!(config.ai.endpoint, "https://openrouter.ai/api/v1");
        assert_eq!(config.ai.trigger_name, "Player");
    }

    #[test]
    fn test_empty_struct_is_default() {
        let config = ForestConfig::from_ron_str("()").unwrap();
        assert_eq!(config, ForestConfig::default());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let err = ForestConfig::from_ron_str("(npc: (speed: \"fast\"))").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = ForestConfig::load_or_default("does/not/exist.ron");
        assert_eq!(config, ForestConfig::default());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let config = ForestConfig::load(CONFIG_PATH).unwrap();
        assert_eq!(config, ForestConfig::default());
    }

    #[test]
    fn test_default_patrol_visits_every_waypoint() {
        let npc = NpcSettings::default();
        assert_eq!(npc.patrol.len(), npc.waypoints.len());
        assert!(npc.wait_time > 0.0);
    }
}
