use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex};

use templeqa_core::traits::LanguageModel;

/// Deterministic stand-in for a hosted model.
///
/// Replies with a fixed text (or fails with a fixed message) and records
/// every prompt it receives. Clones share the same history.
#[derive(Clone)]
pub struct ScriptedModel {
    reply: std::result::Result<String, String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedModel {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self { reply: Ok(reply.into()), prompts: Arc::default() }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self { reply: Err(message.into()), prompts: Arc::default() }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.prompts().len()
    }
}

impl LanguageModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    fn complete(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.reply.clone().map_err(|e| anyhow!(e))
    }
}
