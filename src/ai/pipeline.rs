//! Request, parse, and fall back: the two dialogue entry points.
//!
//! Both functions are plain async code with no Bevy access. They log what
//! went wrong and hand back a [`DialogueOutcome`]; the UI is only touched
//! later, on the main schedule, by [`present_outcome`].

use bevy::prelude::*;

use super::client::{ChatBackend, ChatRequest};
use super::error::DialogueError;
use super::quiz::{extract_form_fragment, parse_quiz, QuizContent};
use crate::config::AiSettings;
use crate::shared::{ChoiceList, TextDisplay};

pub const NO_QUESTION_FOUND: &str = "No valid question found";
pub const INVALID_FORMAT: &str = "AI returned invalid format";
pub const SERVICE_UNAVAILABLE: &str = "AI Unavailable";
pub const REPLY_UNAVAILABLE: &str = "Sorry, I can't respond right now.";

/// What a finished request should do to the UI.
#[derive(Debug)]
pub enum DialogueOutcome {
    /// A decoded quiz: question to the marker, choices to the buttons.
    Quiz(QuizContent),
    /// Raw model text for the marker.
    Reply(String),
    /// Something failed; `message` replaces the marker text.
    Fallback {
        message: &'static str,
        error: DialogueError,
    },
    /// There was no chat session, nothing was sent.
    NotInitialized,
}

impl DialogueOutcome {
    fn fallback(message: &'static str, error: DialogueError) -> Self {
        Self::Fallback { message, error }
    }
}

/// The stricter second attempt used when the first fragment does not parse.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPrompt {
    pub prompt: String,
    pub temperature: f32,
}

impl From<&AiSettings> for RetryPrompt {
    fn from(settings: &AiSettings) -> Self {
        Self {
            prompt: settings.retry_prompt.clone(),
            temperature: settings.retry_temperature,
        }
    }
}

/// Asks for a quiz and decodes its `<form>` fragment.
///
/// A missing fragment or a service failure falls back immediately. A
/// fragment that is present but does not parse gets exactly one retry with
/// `retry`; whatever that retry returns is final.
pub async fn request_dialogue(
    backend: Option<&dyn ChatBackend>,
    prompt: &str,
    temperature: f32,
    retry: &RetryPrompt,
) -> DialogueOutcome {
    let Some(backend) = backend else {
        error!("[AI] Chat client not initialized");
        return DialogueOutcome::NotInitialized;
    };

    match fetch_quiz(backend, prompt, temperature).await {
        Ok(quiz) => DialogueOutcome::Quiz(quiz),
        Err(error @ DialogueError::MissingFragment) => {
            error!("[AI] No valid XML found in response");
            DialogueOutcome::fallback(NO_QUESTION_FOUND, error)
        }
        Err(DialogueError::MalformedFragment(err)) => {
            error!("[AI] XML parsing error: {}", err);
            info!("[AI] Retrying with more explicit XML-only prompt...");
            retry_quiz(backend, retry).await
        }
        Err(error @ DialogueError::Service(_)) => {
            error!("[AI] Chat service error: {}", error);
            DialogueOutcome::fallback(SERVICE_UNAVAILABLE, error)
        }
    }
}

async fn retry_quiz(backend: &dyn ChatBackend, retry: &RetryPrompt) -> DialogueOutcome {
    match fetch_quiz(backend, &retry.prompt, retry.temperature).await {
        Ok(quiz) => DialogueOutcome::Quiz(quiz),
        Err(error @ (DialogueError::MissingFragment | DialogueError::MalformedFragment(_))) => {
            error!("[AI] Retry returned invalid format: {}", error);
            DialogueOutcome::fallback(INVALID_FORMAT, error)
        }
        Err(error @ DialogueError::Service(_)) => {
            error!("[AI] Retry failed: {}", error);
            DialogueOutcome::fallback(SERVICE_UNAVAILABLE, error)
        }
    }
}

async fn fetch_quiz(
    backend: &dyn ChatBackend,
    prompt: &str,
    temperature: f32,
) -> Result<QuizContent, DialogueError> {
    let raw = backend.complete(ChatRequest::new(prompt, temperature)).await?;
    debug!("[AI] Raw assistant response: {}", raw);

    let fragment = extract_form_fragment(&raw).ok_or(DialogueError::MissingFragment)?;
    debug!("[AI] Extracted XML: {}", fragment);

    Ok(parse_quiz(fragment)?)
}

/// Free-form question; the reply is shown verbatim. Never retries.
pub async fn ask_ai(
    backend: Option<&dyn ChatBackend>,
    question: &str,
    temperature: f32,
) -> DialogueOutcome {
    let Some(backend) = backend else {
        error!("[AI] Chat client not initialized");
        return DialogueOutcome::NotInitialized;
    };

    match backend.complete(ChatRequest::new(question, temperature)).await {
        Ok(text) => {
            info!("[AI] Response: {}", text);
            DialogueOutcome::Reply(text)
        }
        Err(err) => {
            error!("[AI] Error: {}", err);
            DialogueOutcome::fallback(REPLY_UNAVAILABLE, err.into())
        }
    }
}

/// Pushes an outcome into the UI. Returns the quiz that was shown so the
/// caller can record its answer marker.
pub fn present_outcome(
    outcome: DialogueOutcome,
    display: &mut dyn TextDisplay,
    choices: Option<&mut dyn ChoiceList>,
) -> Option<QuizContent> {
    match outcome {
        DialogueOutcome::Quiz(quiz) => {
            if let Some(question) = &quiz.question {
                display.set_text(question);
            }
            if !quiz.choices.is_empty() {
                match choices {
                    Some(list) => list.update_choices(quiz.choice_texts()),
                    None => error!("[UI] ButtonOptions node not found!"),
                }
            }
            Some(quiz)
        }
        DialogueOutcome::Reply(text) => {
            display.set_text(&text);
            None
        }
        DialogueOutcome::Fallback { message, .. } => {
            display.set_text(message);
            None
        }
        DialogueOutcome::NotInitialized => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::client::MockChatBackend;
    use crate::ai::error::ChatError;
    use crate::shared::{ButtonOptions, DialogueMarker};
    use mockall::predicate::eq;
    use mockall::Sequence;

    const QUIZ_PROMPT: &str = "quiz please";

    fn retry() -> RetryPrompt {
        RetryPrompt {
            prompt: "strict please".into(),
            temperature: 1.2,
        }
    }

    fn reply(text: &str) -> Result<String, ChatError> {
        Ok(text.to_string())
    }

    /// Expects the quiz prompt first and, when `second` is given, the strict
    /// retry prompt after it. Any other call fails the test.
    fn backend_with(first: Result<String, ChatError>, second: Option<Result<String, ChatError>>) -> MockChatBackend {
        let mut backend = MockChatBackend::new();
        let mut seq = Sequence::new();
        backend
            .expect_complete()
            .with(eq(ChatRequest::new(QUIZ_PROMPT, 1.8)))
            .times(1)
            .in_sequence(&mut seq)
            .return_once(move |_| first);
        if let Some(second) = second {
            backend
                .expect_complete()
                .with(eq(ChatRequest::new("strict please", 1.2)))
                .times(1)
                .in_sequence(&mut seq)
                .return_once(move |_| second);
        }
        backend
    }

    #[tokio::test]
    async fn test_well_formed_quiz() {
        let backend = backend_with(
            reply("<form><question>Q</question><choices><a>1</a><b>2</b></choices></form>"),
            None,
        );

        let outcome = request_dialogue(Some(&backend), QUIZ_PROMPT, 1.8, &retry()).await;
        let DialogueOutcome::Quiz(quiz) = outcome else {
            panic!("expected a quiz");
        };
        assert_eq!(quiz.question.as_deref(), Some("Q"));
        assert_eq!(quiz.choice_texts(), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_missing_fragment_falls_back_without_retry() {
        let backend = backend_with(reply("Olá! Eu sou um urso."), None);

        let outcome = request_dialogue(Some(&backend), QUIZ_PROMPT, 1.8, &retry()).await;
        assert!(matches!(
            outcome,
            DialogueOutcome::Fallback {
                message: NO_QUESTION_FOUND,
                error: DialogueError::MissingFragment
            }
        ));
    }

    #[tokio::test]
    async fn test_unclosed_fragment_falls_back_without_retry() {
        let backend = backend_with(reply("<form><question>Q</question>"), None);

        let outcome = request_dialogue(Some(&backend), QUIZ_PROMPT, 1.8, &retry()).await;
        assert!(matches!(
            outcome,
            DialogueOutcome::Fallback { message: NO_QUESTION_FOUND, .. }
        ));
    }

    #[tokio::test]
    async fn test_malformed_fragment_retries_once_and_succeeds() {
        let backend = backend_with(
            reply("<form><question>broken</choices></form>"),
            Some(reply(
                "<form><question>2+2?</question><choices><a>3</a><b>4</b></choices><answer>b</answer></form>",
            )),
        );

        let outcome = request_dialogue(Some(&backend), QUIZ_PROMPT, 1.8, &retry()).await;
        let DialogueOutcome::Quiz(quiz) = outcome else {
            panic!("expected the retry quiz");
        };
        assert_eq!(quiz.question.as_deref(), Some("2+2?"));
        assert_eq!(quiz.answer.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_malformed_retry_is_invalid_format_without_third_call() {
        let backend = backend_with(
            reply("<form><question>broken</choices></form>"),
            Some(reply("<form><a></form>")),
        );

        let outcome = request_dialogue(Some(&backend), QUIZ_PROMPT, 1.8, &retry()).await;
        assert!(matches!(
            outcome,
            DialogueOutcome::Fallback {
                message: INVALID_FORMAT,
                error: DialogueError::MalformedFragment(_)
            }
        ));
    }

    #[tokio::test]
    async fn test_retry_without_fragment_is_invalid_format() {
        let backend = backend_with(
            reply("<form><question>broken</choices></form>"),
            Some(reply("I only speak bear.")),
        );

        let outcome = request_dialogue(Some(&backend), QUIZ_PROMPT, 1.8, &retry()).await;
        assert!(matches!(
            outcome,
            DialogueOutcome::Fallback { message: INVALID_FORMAT, .. }
        ));
    }

    #[tokio::test]
    async fn test_retry_service_failure_is_unavailable() {
        let backend = backend_with(
            reply("<form><question>broken</choices></form>"),
            Some(Err(ChatError::RequestFailed("timeout".into()))),
        );

        let outcome = request_dialogue(Some(&backend), QUIZ_PROMPT, 1.8, &retry()).await;
        assert!(matches!(
            outcome,
            DialogueOutcome::Fallback {
                message: SERVICE_UNAVAILABLE,
                error: DialogueError::Service(_)
            }
        ));
    }

    #[tokio::test]
    async fn test_service_failure_falls_back_without_retry() {
        let backend = backend_with(Err(ChatError::EmptyResponse), None);

        let outcome = request_dialogue(Some(&backend), QUIZ_PROMPT, 1.8, &retry()).await;
        assert!(matches!(
            outcome,
            DialogueOutcome::Fallback {
                message: SERVICE_UNAVAILABLE,
                error: DialogueError::Service(ChatError::EmptyResponse)
            }
        ));
    }

    #[tokio::test]
    async fn test_no_session_sends_nothing() {
        let outcome = request_dialogue(None, QUIZ_PROMPT, 1.8, &retry()).await;
        assert!(matches!(outcome, DialogueOutcome::NotInitialized));

        let outcome = ask_ai(None, "oi", 1.3).await;
        assert!(matches!(outcome, DialogueOutcome::NotInitialized));
    }

    #[tokio::test]
    async fn test_ask_returns_raw_text_even_with_markup() {
        let mut backend = MockChatBackend::new();
        backend
            .expect_complete()
            .with(eq(ChatRequest::new("Greet me", 1.3)))
            .times(1)
            .returning(|_| Ok("Olá, <b>amigo</b>!".to_string()));

        let outcome = ask_ai(Some(&backend), "Greet me", 1.3).await;
        assert!(matches!(outcome, DialogueOutcome::Reply(ref t) if t == "Olá, <b>amigo</b>!"));
    }

    #[tokio::test]
    async fn test_ask_failure_does_not_retry() {
        let mut backend = MockChatBackend::new();
        backend
            .expect_complete()
            .times(1)
            .returning(|_| Err(ChatError::RequestFailed("401".into())));

        let outcome = ask_ai(Some(&backend), "Greet me", 1.3).await;
        assert!(matches!(
            outcome,
            DialogueOutcome::Fallback { message: REPLY_UNAVAILABLE, .. }
        ));
    }

    #[test]
    fn test_present_quiz_sets_question_and_choices() {
        let mut marker = DialogueMarker::new("Connecting to AI...");
        let mut options = ButtonOptions::default();
        let quiz = QuizContent {
            question: Some("Q".into()),
            choices: vec![
                crate::shared::QuizChoice { key: "a".into(), text: "1".into() },
                crate::shared::QuizChoice { key: "b".into(), text: "2".into() },
            ],
            answer: Some("a".into()),
        };

        let shown = present_outcome(DialogueOutcome::Quiz(quiz.clone()), &mut marker, Some(&mut options));

        assert_eq!(marker.text, "Q");
        assert_eq!(options.choices, vec!["1", "2"]);
        assert_eq!(shown, Some(quiz));
    }

    #[test]
    fn test_present_quiz_without_question_or_choices_leaves_ui() {
        let mut marker = DialogueMarker::new("before");
        let mut options = ButtonOptions {
            choices: vec!["old".into()],
        };

        present_outcome(DialogueOutcome::Quiz(QuizContent::default()), &mut marker, Some(&mut options));

        assert_eq!(marker.text, "before");
        assert_eq!(options.choices, vec!["old"]);
    }

    #[test]
    fn test_present_fallback_and_not_initialized() {
        let mut marker = DialogueMarker::new("before");
        let mut options = ButtonOptions {
            choices: vec!["old".into()],
        };

        present_outcome(DialogueOutcome::NotInitialized, &mut marker, Some(&mut options));
        assert_eq!(marker.text, "before");

        present_outcome(
            DialogueOutcome::fallback(NO_QUESTION_FOUND, DialogueError::MissingFragment),
            &mut marker,
            Some(&mut options),
        );
        assert_eq!(marker.text, NO_QUESTION_FOUND);
        assert_eq!(options.choices, vec!["old"]);
    }
}
