//! Completion provider seam.
//!
//! The extractor only ever sees [`CompletionProvider`]. [`RigCompletionProvider`]
//! is the production implementation; tests script their own.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::gemini::completion::gemini_api_types::{
    AdditionalParameters, GenerationConfig,
};
use rig::providers::{anthropic, gemini, ollama, openai};
use tracing::debug;

use crate::config::{LlmProvider, ProviderConfig, ProviderSettings};
use crate::prompt::SYSTEM_PREAMBLE;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f64,
    pub max_tokens: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
}

impl Completion {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short provider name used in error messages
    fn name(&self) -> &str;

    async fn complete(&self, prompt: &str, options: CompletionOptions) -> Result<Completion>;
}

/// Completion over OpenAI, Anthropic, Gemini or Ollama through `rig`.
#[derive(Clone, Debug)]
pub struct RigCompletionProvider {
    provider: LlmProvider,
    name: String,
    config: ProviderConfig,
    timeout: Duration,
}

impl RigCompletionProvider {
    /// Build from settings, using `provider` or the configured default and an
    /// optional model override.
    pub fn from_settings(
        settings: &ProviderSettings,
        provider: Option<LlmProvider>,
        model: Option<String>,
    ) -> Result<Self> {
        let provider = provider.unwrap_or(settings.default_provider);
        let mut config = settings
            .provider(provider)
            .cloned()
            .ok_or_else(|| anyhow!("No configuration for provider {}", provider))?;

        if let Some(model) = model.filter(|m| !m.is_empty()) {
            config.model = model;
        }

        if provider.requires_api_key() && config.api_key.is_none() {
            let env_var = provider.api_key_env_var().unwrap_or("API key");
            return Err(anyhow!(
                "Missing API key for {}. Set {} environment variable.",
                provider.display_name(),
                env_var
            ));
        }

        Ok(Self {
            provider,
            name: provider.to_string(),
            config,
            timeout: settings.request_timeout,
        })
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("{} requires API key", self.provider.display_name()))
    }

    async fn call_rig_agent(&self, prompt: &str, options: CompletionOptions) -> Result<String> {
        let model = self.config.model.as_str();
        let base_url = self.config.base_url.as_deref();

        match self.provider {
            LlmProvider::OpenAi => {
                let api_key = self.api_key()?;
                let client = if let Some(url) = base_url {
                    openai::Client::builder(api_key).base_url(url).build()
                } else {
                    openai::Client::new(api_key)
                };

                let agent = client
                    .agent(model)
                    .preamble(SYSTEM_PREAMBLE)
                    .temperature(options.temperature)
                    .max_tokens(options.max_tokens)
                    .build();
                agent.prompt(prompt).await.context("OpenAI API call failed")
            }

            LlmProvider::Claude => {
                let client = anthropic::Client::new(self.api_key()?);

                let agent = client
                    .agent(model)
                    .preamble(SYSTEM_PREAMBLE)
                    .temperature(options.temperature)
                    .max_tokens(options.max_tokens)
                    .build();
                agent.prompt(prompt).await.context("Anthropic API call failed")
            }

            LlmProvider::Gemini => {
                let client = gemini::Client::new(self.api_key()?);

                // Gemini rejects requests without a generation config
                let gen_cfg = GenerationConfig::default();
                let additional_params = AdditionalParameters::default().with_config(gen_cfg);

                let agent = client
                    .agent(model)
                    .preamble(SYSTEM_PREAMBLE)
                    .temperature(options.temperature)
                    .max_tokens(options.max_tokens)
                    .additional_params(serde_json::to_value(additional_params)?)
                    .build();
                agent.prompt(prompt).await.context("Gemini API call failed")
            }

            LlmProvider::Ollama => {
                let client = if let Some(url) = base_url {
                    ollama::Client::builder().base_url(url).build()
                } else {
                    ollama::Client::new()
                };

                let agent = client
                    .agent(model)
                    .preamble(SYSTEM_PREAMBLE)
                    .temperature(options.temperature)
                    .max_tokens(options.max_tokens)
                    .build();
                agent.prompt(prompt).await.context("Ollama API call failed")
            }
        }
    }
}

#[async_trait]
impl CompletionProvider for RigCompletionProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, prompt: &str, options: CompletionOptions) -> Result<Completion> {
        debug!(
            provider = %self.provider,
            model = %self.config.model,
            prompt_chars = prompt.len(),
            "Sending completion request"
        );

        let content = tokio::time::timeout(self.timeout, self.call_rig_agent(prompt, options))
            .await
            .map_err(|_| anyhow!("request timed out after {}s", self.timeout.as_secs()))??;

        Ok(Completion { content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> ProviderSettings {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ProviderSettings::from_map(&values)
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        let err = RigCompletionProvider::from_settings(
            &settings(&[]),
            Some(LlmProvider::OpenAi),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let provider = RigCompletionProvider::from_settings(&settings(&[]), None, None).unwrap();
        assert_eq!(provider.provider(), LlmProvider::Ollama);
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.model(), "llama3.2");
    }

    #[test]
    fn test_model_override() {
        let provider = RigCompletionProvider::from_settings(
            &settings(&[("OPENAI_API_KEY", "sk-test")]),
            Some(LlmProvider::OpenAi),
            Some("gpt-4o".to_string()),
        )
        .unwrap();
        assert_eq!(provider.model(), "gpt-4o");
        assert_eq!(provider.name(), "openai");
    }
}
