//! The chat session handle shared by every dialogue request.

use bevy::prelude::*;
use std::sync::Arc;

use super::client::{ApiKey, ChatBackend, OpenRouterClient};
use super::error::ChatError;
use crate::config::AiSettings;

/// Created once when the AI plugin is built and never changed afterwards.
/// Without a backend every dialogue feature is disabled.
#[derive(Resource, Clone, Default)]
pub struct ChatSession {
    backend: Option<Arc<dyn ChatBackend>>,
}

impl ChatSession {
    /// Builds the OpenRouter client, logging why the session is disabled if
    /// the key or endpoint is unusable.
    pub fn connect(settings: &AiSettings, api_key: Option<ApiKey>) -> Self {
        let client = api_key
            .ok_or(ChatError::MissingApiKey)
            .and_then(|key| OpenRouterClient::new(settings, key));

        match client {
            Ok(client) => {
                info!("[AI] Chat client ready ({} via {})", client.model(), settings.endpoint);
                Self::with_backend(Arc::new(client))
            }
            Err(err) => {
                error!("[AI] Error initializing chat client: {}", err);
                Self::disabled()
            }
        }
    }

    pub fn with_backend(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn disabled() -> Self {
        Self { backend: None }
    }

    pub fn is_ready(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend(&self) -> Option<Arc<dyn ChatBackend>> {
        self.backend.clone()
    }
}
