//! AI dialogue plugin for Forest Bear.
//!
//! The bear asks the player short multiple-choice questions generated by a
//! remote chat model and answers greetings in free form. Requests run in the
//! background; their results reach the UI only through
//! [`dialogue::apply_dialogue_completions`] on the main schedule.

use bevy::prelude::*;

use crate::config::AiSettings;
use crate::shared::*;

pub mod bridge;
pub mod client;
pub mod dialogue;
pub mod error;
pub mod pipeline;
pub mod quiz;
pub mod session;

use bridge::DialogueBridge;
use client::ApiKey;
use dialogue::{
    apply_dialogue_completions, check_quiz_answers, dispatch_ask_requests,
    dispatch_quiz_requests, initialize_npc_dialogue,
};
use session::ChatSession;

pub struct AiPlugin {
    settings: AiSettings,
    api_key: Option<ApiKey>,
}

impl AiPlugin {
    /// The key is passed in by the composing application; the plugin never
    /// reads it from the environment itself.
    pub fn new(settings: AiSettings, api_key: Option<ApiKey>) -> Self {
        Self { settings, api_key }
    }
}

impl Plugin for AiPlugin {
    fn build(&self, app: &mut App) {
        let (bridge, session) = match DialogueBridge::new() {
            Ok(bridge) => (bridge, ChatSession::connect(&self.settings, self.api_key.clone())),
            Err(err) => {
                error!("[AI] Could not start async runtime: {}", err);
                (DialogueBridge::detached(), ChatSession::disabled())
            }
        };

        app.insert_resource(self.settings.clone())
            .insert_resource(session)
            .insert_resource(bridge)
            .init_resource::<ActiveQuiz>()
            .add_event::<AskAiEvent>()
            .add_event::<QuizRequestEvent>()
            .add_event::<ChoiceSelectedEvent>();

        app.add_systems(
            Update,
            (
                // Opening quiz (or error text) for freshly spawned bears
                initialize_npc_dialogue,
                // Start background requests
                dispatch_quiz_requests,
                dispatch_ask_requests,
                // Marshal finished requests onto the UI
                apply_dialogue_completions,
                // Answer buttons
                check_quiz_answers,
            )
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}
