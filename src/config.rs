use serde::Deserialize;
use std::env;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the summarization pipeline.
///
/// The configuration is loaded once near process start and passed explicitly
/// into the completion client and pipeline constructors; nothing reads the
/// environment after this point.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Completion provider used to generate summaries.
    pub completion_provider: CompletionProvider,
    /// Model identifier passed to the provider.
    pub completion_model: String,
    /// Optional base URL override for the local Ollama runtime.
    pub ollama_url: Option<String>,
    /// Window size in characters for the map phase.
    pub window_size: usize,
    /// Overlap in characters between consecutive windows.
    pub overlap_size: usize,
    /// Sampling temperature forwarded with every completion request.
    pub temperature: f32,
    /// Optional override for the default system instruction.
    pub system_instruction: Option<String>,
    /// Per-request timeout in seconds applied to completion calls.
    pub request_timeout_secs: u64,
}

/// Supported completion backends for the summarization pipeline.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionProvider {
    /// Local Ollama runtime.
    Ollama,
}

const DEFAULT_WINDOW_SIZE: usize = 10_000;
const DEFAULT_OVERLAP_SIZE: usize = 2_000;
const DEFAULT_TEMPERATURE: f32 = 0.2;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(Self {
            completion_provider: load_env("SUMMARIZER_PROVIDER")?.parse().map_err(|()| {
                ConfigError::InvalidValue("SUMMARIZER_PROVIDER".to_string())
            })?,
            completion_model: load_env("SUMMARIZER_MODEL")?,
            ollama_url: load_env_optional("OLLAMA_URL"),
            window_size: parse_optional("SUMMARIZER_WINDOW_SIZE")?.unwrap_or(DEFAULT_WINDOW_SIZE),
            overlap_size: parse_optional("SUMMARIZER_OVERLAP_SIZE")?
                .unwrap_or(DEFAULT_OVERLAP_SIZE),
            temperature: parse_optional("SUMMARIZER_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE),
            system_instruction: load_env_optional("SUMMARIZER_SYSTEM_INSTRUCTION"),
            request_timeout_secs: parse_optional("SUMMARIZER_REQUEST_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

impl std::str::FromStr for CompletionProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parses_case_insensitively() {
        assert!(matches!(
            "Ollama".parse::<CompletionProvider>(),
            Ok(CompletionProvider::Ollama)
        ));
        assert!("vertex".parse::<CompletionProvider>().is_err());
    }
}
