//! Error types for the chat client and the dialogue pipeline.

use reqwest::StatusCode;

/// Failures talking to the chat-completion service, including building the
/// client in the first place.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("chat request failed: {0}")]
    RequestFailed(String),
    #[error("chat service returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid chat response: {0}")]
    InvalidResponse(String),
    #[error("chat response contained no text")]
    EmptyResponse,
}

/// Why a dialogue request ended without showing model content.
#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    #[error("no valid structured content found")]
    MissingFragment,
    #[error("malformed structured content: {0}")]
    MalformedFragment(#[from] roxmltree::Error),
    #[error(transparent)]
    Service(#[from] ChatError),
}
