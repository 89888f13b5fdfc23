use std::{collections::HashMap, fmt, str::FromStr, time::Duration};

use anyhow::anyhow;
use clap::ValueEnum;

/// Supported completion providers.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, ValueEnum)]
pub enum LlmProvider {
    #[default]
    Ollama,
    OpenAi,
    Gemini,
    Claude,
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                LlmProvider::Ollama => "ollama",
                LlmProvider::OpenAi => "openai",
                LlmProvider::Gemini => "gemini",
                LlmProvider::Claude => "claude",
            }
        )
    }
}

impl FromStr for LlmProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(LlmProvider::Ollama),
            "openai" | "open_ai" | "open-ai" => Ok(LlmProvider::OpenAi),
            "gemini" | "google" => Ok(LlmProvider::Gemini),
            "claude" | "anthropic" => Ok(LlmProvider::Claude),
            _ => Err(anyhow!("unknown provider '{s}'")),
        }
    }
}

impl LlmProvider {
    pub fn display_name(&self) -> &'static str {
        match self {
            LlmProvider::Ollama => "Ollama",
            LlmProvider::OpenAi => "OpenAI",
            LlmProvider::Gemini => "Google Gemini",
            LlmProvider::Claude => "Anthropic Claude",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LlmProvider::Ollama)
    }

    pub fn api_key_env_var(&self) -> Option<&'static str> {
        match self {
            LlmProvider::Ollama => None,
            LlmProvider::OpenAi => Some("OPENAI_API_KEY"),
            LlmProvider::Gemini => Some("GOOGLE_API_KEY"),
            LlmProvider::Claude => Some("ANTHROPIC_API_KEY"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

/// Provider configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct ProviderSettings {
    pub default_provider: LlmProvider,
    pub request_timeout: Duration,
    pub providers: HashMap<LlmProvider, ProviderConfig>,
}

impl ProviderSettings {
    pub fn from_env() -> Self {
        let mut values = HashMap::new();
        for (key, default) in Self::tracked_keys() {
            let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
            values.insert(key.to_string(), value);
        }
        Self::from_map(&values)
    }

    pub fn from_map(values: &HashMap<String, String>) -> Self {
        fn parse_provider(input: Option<&String>) -> LlmProvider {
            input
                .and_then(|value| value.parse().ok())
                .unwrap_or_default()
        }

        fn read(values: &HashMap<String, String>, key: &str, default: &str) -> String {
            values
                .get(key)
                .cloned()
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        }

        fn optional(values: &HashMap<String, String>, key: &str) -> Option<String> {
            values.get(key).cloned().filter(|value| !value.is_empty())
        }

        let provider = parse_provider(values.get("SYNAPTIC_LLM_PROVIDER"));
        let timeout_secs = values
            .get("SYNAPTIC_TIMEOUT_SECS")
            .and_then(|value| value.parse().ok())
            .unwrap_or(120);

        let mut providers = HashMap::new();
        providers.insert(
            LlmProvider::OpenAi,
            ProviderConfig {
                model: read(values, "SYNAPTIC_OPENAI_MODEL", "gpt-4o-mini"),
                base_url: optional(values, "OPENAI_BASE_URL"),
                api_key: optional(values, "OPENAI_API_KEY"),
            },
        );
        providers.insert(
            LlmProvider::Claude,
            ProviderConfig {
                model: read(values, "SYNAPTIC_CLAUDE_MODEL", "claude-3-5-sonnet-latest"),
                base_url: None,
                api_key: optional(values, "ANTHROPIC_API_KEY"),
            },
        );
        providers.insert(
            LlmProvider::Gemini,
            ProviderConfig {
                model: read(values, "SYNAPTIC_GEMINI_MODEL", "gemini-2.0-flash"),
                base_url: None,
                api_key: optional(values, "GOOGLE_API_KEY"),
            },
        );
        providers.insert(
            LlmProvider::Ollama,
            ProviderConfig {
                model: read(values, "SYNAPTIC_OLLAMA_MODEL", "llama3.2"),
                base_url: Some(read(values, "OLLAMA_BASE_URL", "http://127.0.0.1:11434")),
                api_key: None,
            },
        );

        Self {
            default_provider: provider,
            request_timeout: Duration::from_secs(timeout_secs),
            providers,
        }
    }

    fn tracked_keys() -> Vec<(&'static str, &'static str)> {
        vec![
            ("SYNAPTIC_LLM_PROVIDER", "ollama"),
            ("SYNAPTIC_TIMEOUT_SECS", "120"),
            ("SYNAPTIC_OPENAI_MODEL", "gpt-4o-mini"),
            ("OPENAI_API_KEY", ""),
            ("OPENAI_BASE_URL", ""),
            ("SYNAPTIC_CLAUDE_MODEL", "claude-3-5-sonnet-latest"),
            ("ANTHROPIC_API_KEY", ""),
            ("SYNAPTIC_GEMINI_MODEL", "gemini-2.0-flash"),
            ("GOOGLE_API_KEY", ""),
            ("SYNAPTIC_OLLAMA_MODEL", "llama3.2"),
            ("OLLAMA_BASE_URL", "http://127.0.0.1:11434"),
        ]
    }

    pub fn provider(&self, provider: LlmProvider) -> Option<&ProviderConfig> {
        self.providers.get(&provider)
    }
}

/// Limits for a single extraction call.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractionConfig {
    pub max_nodes: usize,
    pub max_depth: u32,
    /// Input beyond this many characters is truncated at a sentence boundary
    pub max_input_chars: usize,
    pub temperature: f64,
    pub max_tokens: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_nodes: 36,
            max_depth: 4,
            max_input_chars: 12_000,
            temperature: 0.3,
            max_tokens: 4_096,
        }
    }
}

/// Chunking configuration for long documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkOptions {
    pub max_chunk_chars: usize,
    /// Trailing context from the previous chunk carried into the next
    pub overlap_chars: usize,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            max_chunk_chars: 6_000,
            overlap_chars: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parsing() {
        assert_eq!("OpenAI".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAi);
        assert_eq!("anthropic".parse::<LlmProvider>().unwrap(), LlmProvider::Claude);
        assert!("mistral".parse::<LlmProvider>().is_err());
        assert_eq!(LlmProvider::Gemini.to_string(), "gemini");
    }

    #[test]
    fn test_from_map_defaults() {
        let settings = ProviderSettings::from_map(&HashMap::new());
        assert_eq!(settings.default_provider, LlmProvider::Ollama);
        assert_eq!(settings.request_timeout, Duration::from_secs(120));
        let ollama = settings.provider(LlmProvider::Ollama).unwrap();
        assert_eq!(ollama.model, "llama3.2");
        assert_eq!(ollama.base_url.as_deref(), Some("http://127.0.0.1:11434"));
        assert_eq!(settings.provider(LlmProvider::OpenAi).unwrap().api_key, None);
    }

    #[test]
    fn test_from_map_overrides() {
        let values: HashMap<String, String> = [
            ("SYNAPTIC_LLM_PROVIDER", "claude"),
            ("SYNAPTIC_TIMEOUT_SECS", "30"),
            ("SYNAPTIC_CLAUDE_MODEL", "claude-3-haiku"),
            ("ANTHROPIC_API_KEY", "sk-ant-test"),
            ("OPENAI_BASE_URL", ""),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let settings = ProviderSettings::from_map(&values);
        assert_eq!(settings.default_provider, LlmProvider::Claude);
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        let claude = settings.provider(LlmProvider::Claude).unwrap();
        assert_eq!(claude.model, "claude-3-haiku");
        assert_eq!(claude.api_key.as_deref(), Some("sk-ant-test"));
        assert_eq!(settings.provider(LlmProvider::OpenAi).unwrap().base_url, None);
    }

    #[test]
    fn test_extraction_defaults() {
        let config = ExtractionConfig::default();
        assert_eq!((config.max_nodes, config.max_depth), (36, 4));
        assert_eq!(ChunkOptions::default().max_chunk_chars, 6_000);
    }
}
