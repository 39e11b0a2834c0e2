//! Dialogue systems: start requests from events, apply finished ones, and
//! check quiz answers.

use bevy::prelude::*;

use super::bridge::DialogueBridge;
use super::pipeline::{ask_ai, present_outcome, request_dialogue, RetryPrompt};
use super::quiz::{judge_choice, Verdict};
use super::session::ChatSession;
use crate::config::AiSettings;
use crate::shared::*;

pub const INIT_FAILED: &str = "AI Error";
pub const CONNECTING: &str = "Connecting to AI...";
pub const THINKING: &str = "Thinking...";
pub const CORRECT: &str = "Correct!";

/// System: when a bear appears, either start its opening quiz or report that
/// the chat client could not be set up.
pub fn initialize_npc_dialogue(
    session: Res<ChatSession>,
    mut npcs: Query<(Entity, &mut DialogueMarker), Added<BearNpc>>,
    mut quiz_writer: EventWriter<QuizRequestEvent>,
) {
    for (entity, mut marker) in &mut npcs {
        if session.is_ready() {
            marker.set_text(CONNECTING);
            quiz_writer.send(QuizRequestEvent { npc: entity });
        } else {
            marker.set_text(INIT_FAILED);
        }
    }
}

/// System: turn `QuizRequestEvent`s into background quiz requests.
pub fn dispatch_quiz_requests(
    mut events: EventReader<QuizRequestEvent>,
    session: Res<ChatSession>,
    settings: Res<AiSettings>,
    bridge: Res<DialogueBridge>,
) {
    for event in events.read() {
        let Some(backend) = session.backend() else {
            error!("[AI] Chat client not initialized");
            continue;
        };

        let prompt = settings.quiz_prompt.clone();
        let temperature = settings.quiz_temperature;
        let retry = RetryPrompt::from(&*settings);
        bridge.submit(event.npc, async move {
            request_dialogue(Some(backend.as_ref()), &prompt, temperature, &retry).await
        });
    }
}

/// System: turn `AskAiEvent`s into background free-form requests. Every
/// event is sent, even if an earlier one for the same NPC is still running.
pub fn dispatch_ask_requests(
    mut events: EventReader<AskAiEvent>,
    session: Res<ChatSession>,
    settings: Res<AiSettings>,
    bridge: Res<DialogueBridge>,
    mut markers: Query<&mut DialogueMarker>,
) {
    for event in events.read() {
        let Some(backend) = session.backend() else {
            error!("[AI] Chat client not initialized");
            continue;
        };

        if let Ok(mut marker) = markers.get_mut(event.npc) {
            marker.set_text(THINKING);
        }

        let question = event.question.clone();
        let temperature = settings.ask_temperature;
        bridge.submit(event.npc, async move {
            ask_ai(Some(backend.as_ref()), &question, temperature).await
        });
    }
}

/// System: apply every completion that arrived since last frame. The last
/// completion to arrive wins the marker text.
pub fn apply_dialogue_completions(
    bridge: Res<DialogueBridge>,
    mut markers: Query<&mut DialogueMarker>,
    mut options: Query<&mut ButtonOptions>,
    mut active_quiz: ResMut<ActiveQuiz>,
) {
    for completion in bridge.drain() {
        let Ok(mut marker) = markers.get_mut(completion.target) else {
            debug!("[AI] Dropping completion for despawned {:?}", completion.target);
            continue;
        };

        let mut list = options.get_single_mut().ok();
        let choices = list.as_mut().map(|l| l as &mut dyn ChoiceList);

        if let Some(quiz) = present_outcome(completion.outcome, &mut *marker, choices) {
            if let Some(answer) = &quiz.answer {
                info!("[AI] Correct answer: {}", answer);
            }
            if quiz.choices.is_empty() {
                // The buttons on screen still belong to the previous quiz.
                active_quiz.answer = quiz.answer;
            } else {
                *active_quiz = ActiveQuiz {
                    asker: Some(completion.target),
                    choices: quiz.choices,
                    answer: quiz.answer,
                };
            }
        }
    }
}

/// System: judge a picked answer against the recorded marker, tell the player
/// through the asking NPC, and clear the buttons.
pub fn check_quiz_answers(
    mut events: EventReader<ChoiceSelectedEvent>,
    mut active_quiz: ResMut<ActiveQuiz>,
    mut markers: Query<&mut DialogueMarker>,
    mut options: Query<&mut ButtonOptions>,
) {
    for event in events.read() {
        let Some(answer) = active_quiz.answer.clone() else {
            info!("[AI] Choice {} picked, no answer recorded", event.index);
            continue;
        };
        let Some(verdict) = judge_choice(&active_quiz.choices, &answer, event.index) else {
            warn!("[AI] Choice {} is not part of the current quiz", event.index);
            continue;
        };

        let text = match verdict {
            Verdict::Correct => CORRECT.to_string(),
            Verdict::Incorrect { expected } => format!("Not quite... the answer was {}", expected),
        };

        if let Some(mut marker) = active_quiz.asker.and_then(|npc| markers.get_mut(npc).ok()) {
            marker.set_text(&text);
        }
        if let Ok(mut list) = options.get_single_mut() {
            list.update_choices(Vec::new());
        }
        active_quiz.clear();
    }
}
