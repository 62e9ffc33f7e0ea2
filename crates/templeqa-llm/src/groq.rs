use anyhow::Result;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Instant;

use templeqa_core::config::LlmSettings;
use templeqa_core::error::Error;
use templeqa_core::traits::LanguageModel;

/// Groq chat-completions client. One user message per call, no streaming.
pub struct GroqClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl GroqClient {
    /// Read the credential from the environment variable named in `settings`.
    ///
    /// # Errors
    ///
    /// `Error::MissingApiKey` if the variable is unset or empty.
    pub fn from_env(settings: &LlmSettings) -> templeqa_core::error::Result<Self> {
        let api_key = env::var(&settings.api_key_env).unwrap_or_default();
        Self::with_api_key(settings, api_key)
    }

    pub fn with_api_key(settings: &LlmSettings, api_key: String) -> templeqa_core::error::Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::MissingApiKey(settings.api_key_env.clone()));
        }
        Ok(Self {
            client: Client::new(),
            api_url: settings.api_url.clone(),
            api_key,
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl LanguageModel for GroqClient {
    fn name(&self) -> &str {
        &self.model
    }

    fn complete(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            temperature: self.temperature,
        };
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| Error::Llm(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_else(|_| "Unknown error".to_owned());
            return Err(Error::Llm(format!("API error {status}: {body}")).into());
        }
        let parsed: ChatResponse = response
            .json()
            .map_err(|e| Error::Llm(format!("failed to parse response: {e}")))?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::Llm("response contained no choices".to_owned()))?;
        tracing::info!(model = %self.model, latency_ms = start.elapsed().as_millis() as u64, "completion received");
        Ok(text)
    }
}
