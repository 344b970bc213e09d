//! Mapping from model roles to configured providers.

use super::openai::{ApiKeySource, OpenAIProvider};
use super::provider::{LlmError, LlmProvider};
use crate::config::LlmSettings;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// What a model is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelRole {
    /// General chat model, used for song suggestions.
    Chat,
    /// Model instructed to answer with JSON only, used for chord analysis.
    Json,
}

impl ModelRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelRole::Chat => "chat-model",
            ModelRole::Json => "chat-model-json",
        }
    }
}

impl fmt::Display for ModelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Providers keyed by role. Built once at startup and shared read-only.
#[derive(Default, Clone)]
pub struct ModelRegistry {
    providers: HashMap<ModelRole, Arc<dyn LlmProvider>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry with one OpenAI-compatible provider per role.
    pub fn from_settings(settings: &LlmSettings) -> Self {
        let key_source = match (&settings.api_key_command, &settings.api_key) {
            (Some(cmd), _) => ApiKeySource::Command(cmd.clone()),
            (None, Some(key)) => ApiKeySource::Static(key.clone()),
            (None, None) => ApiKeySource::None,
        };

        let chat = OpenAIProvider::new(
            settings.base_url.clone(),
            settings.chat_model.clone(),
            key_source.clone(),
        );
        let json = OpenAIProvider::new(
            settings.base_url.clone(),
            settings.json_model.clone(),
            key_source,
        );

        Self::new()
            .with_provider(ModelRole::Chat, Arc::new(chat))
            .with_provider(ModelRole::Json, Arc::new(json))
    }

    pub fn with_provider(mut self, role: ModelRole, provider: Arc<dyn LlmProvider>) -> Self {
        self.providers.insert(role, provider);
        self
    }

    pub fn get(&self, role: ModelRole) -> Result<Arc<dyn LlmProvider>, LlmError> {
        self.providers
            .get(&role)
            .cloned()
            .ok_or_else(|| LlmError::UnknownModel(role.to_string()))
    }

    /// Registered roles with their provider, in a stable order.
    pub fn entries(&self) -> Vec<(ModelRole, Arc<dyn LlmProvider>)> {
        [ModelRole::Json, ModelRole::Chat]
            .into_iter()
            .filter_map(|role| self.providers.get(&role).map(|p| (role, p.clone())))
            .collect()
    }
}
