use anyhow::Context as _;
use serde_json::{Value, json};

use crate::domain::repository::AssistantPort;
use crate::error::ApiError;

const SYSTEM_PROMPT: &str = "You are a friendly support assistant for TeamSync, a team collaboration platform.\n\
Your role is to help users with general questions about the platform.\n\
Some key points:\n\
- Be concise but helpful\n\
- If users mention account access issues, those are handled separately\n\
- Focus on helping with navigation, features, and general usage\n\
- If unsure, guide users to contact admin";

/// Client for an OpenAI-compatible chat-completion endpoint.
///
/// Without an API key the client is disabled and `complete` reports
/// `AssistantUnavailable`; the support handler turns that into its
/// user-facing fallback reply.
#[derive(Clone)]
pub struct OpenAiAssistant {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAiAssistant {
    pub fn new(api_key: Option<String>, base_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model,
        }
    }

    pub fn from_config(config: &crate::config::ApiConfig) -> Self {
        Self::new(
            config.openai_api_key.clone(),
            config.openai_base_url.clone(),
            config.openai_model.clone(),
        )
    }

    /// A keyless client, for setups (and tests) that run without a model.
    pub fn disabled() -> Self {
        Self::new(
            None,
            "https://api.openai.com/v1".to_owned(),
            "gpt-3.5-turbo".to_owned(),
        )
    }
}

impl AssistantPort for OpenAiAssistant {
    async fn complete(&self, message: &str) -> Result<String, ApiError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ApiError::AssistantUnavailable);
        };

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": message },
            ],
            "temperature": 0.7,
            "max_tokens": 150,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .context("call chat completions")?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Internal(anyhow::anyhow!(
                "chat completions returned {status}"
            )));
        }

        let payload: Value = response
            .json()
            .await
            .context("decode chat completions response")?;
        let reply = payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("empty completion in response"))?
            .to_owned();
        Ok(reply)
    }
}
