//! Hosted text completion, used only for optional abstractive summaries.

use crate::core::config::LlmConfig;
use crate::core::text::{char_len, truncate_chars};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Main text is cut to this many characters before summarising.
pub const SUMMARY_INPUT_CHARS: usize = 4000;
/// Shorter main text is not worth a summary call.
pub const MIN_SUMMARY_INPUT_CHARS: usize = 100;

const SUMMARY_SYSTEM_PROMPT: &str =
    "You summarize web pages for a research assistant. Answer with the summary only.";

/// An opaque `(system prompt, user prompt) -> text` capability.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

/// Any endpoint speaking the OpenAI `chat/completions` protocol, including
/// key-less local servers (Ollama / LM Studio).
pub struct OpenAiCompatible {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompatible {
    pub fn new(client: reqwest::Client, base_url: String, api_key: String, model: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
            model,
        }
    }

    /// `None` when disabled or when no key is configured anywhere.
    /// An explicit empty key in the config file still enables key-less use.
    pub fn from_config(client: reqwest::Client, config: &LlmConfig) -> Option<Self> {
        if !config.resolve_enabled() {
            return None;
        }
        let api_key = config.resolve_api_key()?;
        Some(Self::new(
            client,
            config.resolve_base_url(),
            api_key,
            config.resolve_model(),
        ))
    }
}

#[async_trait]
impl TextCompletion for OpenAiCompatible {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let body = serde_json::json!({
            "model": self.model,
            "temperature": 0.2,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt}
            ]
        });

        let builder = self.client.post(url).json(&body);
        // Only send Authorization header when a key is provided.
        let builder = if self.api_key.is_empty() {
            builder
        } else {
            builder.bearer_auth(self.api_key.trim())
        };
        let response = builder
            .send()
            .await
            .context("chat.completions request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "chat.completions failed: status={} body={}",
                status,
                text
            ));
        }

        let value: serde_json::Value = response
            .json()
            .await
            .context("chat.completions response json parse failed")?;

        value
            .get("choices")
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .context("chat.completions returned no content")
    }
}

pub fn summary_prompt(main_text: &str) -> String {
    format!(
        "Summarize the following web page content in a concise, fluent, and readable way. \
         Capture the main points and key facts, using your own words. Limit to 3-5 sentences.\n\n---\n{}",
        truncate_chars(main_text, SUMMARY_INPUT_CHARS)
    )
}

/// A 3-5 sentence summary of `main_text`, or `None` when the text is too
/// short or the call fails. Failures are logged, never returned.
pub async fn abstract_summary(llm: &Arc<dyn TextCompletion>, main_text: &str) -> Option<String> {
    if char_len(main_text) <= MIN_SUMMARY_INPUT_CHARS {
        debug!("Main text too short for an abstractive summary");
        return None;
    }
    match llm.complete(SUMMARY_SYSTEM_PROMPT, &summary_prompt(main_text)).await {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("Abstractive summary failed: {:#}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl TextCompletion for Echo {
        async fn complete(&self, _system: &str, user: &str) -> Result<String> {
            Ok(format!("{} chars", user.chars().count()))
        }
    }

    struct Broken;

    #[async_trait]
    impl TextCompletion for Broken {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            Err(anyhow::anyhow!("upstream down"))
        }
    }

    #[test]
    fn prompt_caps_input() {
        let prompt = summary_prompt(&"a".repeat(10_000));
        assert!(prompt.ends_with(&"a".repeat(SUMMARY_INPUT_CHARS)));
        assert!(!prompt.ends_with(&"a".repeat(SUMMARY_INPUT_CHARS + 1)));
    }

    #[tokio::test]
    async fn summary_only_for_long_text_and_errors_swallowed() {
        let echo: Arc<dyn TextCompletion> = Arc::new(Echo);
        assert!(abstract_summary(&echo, "short").await.is_none());
        assert!(abstract_summary(&echo, &"word ".repeat(50)).await.is_some());

        let broken: Arc<dyn TextCompletion> = Arc::new(Broken);
        assert!(abstract_summary(&broken, &"word ".repeat(50)).await.is_none());
    }

    #[test]
    fn disabled_or_keyless_config_yields_none() {
        let client = reqwest::Client::new();
        let disabled = LlmConfig {
            enabled: Some(false),
            api_key: Some("k".into()),
            ..Default::default()
        };
        assert!(OpenAiCompatible::from_config(client.clone(), &disabled).is_none());

        let local = LlmConfig {
            api_key: Some(String::new()),
            base_url: Some("http://localhost:11434/v1".into()),
            ..Default::default()
        };
        assert!(OpenAiCompatible::from_config(client, &local).is_some());
    }
}
