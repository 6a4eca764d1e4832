use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gemma3:1b";
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_TRANSCRIPT_PATH: &str = "logging.txt";

/// Settings resolved once at startup and passed down read-only.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub model: String,
    pub base_url: String,
    pub transcript_path: PathBuf,
    pub tracing: TracingConfig,
}

/// Per-turn tracing switches (`LANGCHAIN_TRACING_V2` / `LANGCHAIN_API_KEY`).
#[derive(Clone, Default)]
pub struct TracingConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
}

impl fmt::Debug for TracingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracingConfig")
            .field("enabled", &self.enabled)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Values given on the command line; each one wins over the environment.
#[derive(Debug, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub transcript_path: Option<PathBuf>,
}

impl ChatConfig {
    /// Resolve from the process environment. Call after `.env` is loaded.
    pub fn from_env(overrides: Overrides) -> Self {
        Self::from_lookup(overrides, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(overrides: Overrides, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let model = overrides
            .model
            .or_else(|| env("OLLAMA_MODEL"))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = overrides
            .base_url
            .or_else(|| env("OLLAMA_HOST"))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let transcript_path = overrides
            .transcript_path
            .or_else(|| env("CHAT_TRANSCRIPT").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TRANSCRIPT_PATH));

        let tracing = TracingConfig {
            enabled: env("LANGCHAIN_TRACING_V2")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            api_key: env("LANGCHAIN_API_KEY"),
        };

        Self {
            model,
            base_url,
            transcript_path,
            tracing,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
