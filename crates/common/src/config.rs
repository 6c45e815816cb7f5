use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_HN_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";
pub const DEFAULT_LLM_BASE_URL: &str = "http://localhost:11434/v1";
pub const DEFAULT_LLM_MODEL: &str = "llama3.2";
/// The top-stories listing never holds more than this many ids.
pub const MAX_STORY_LIMIT: usize = 500;
/// Topic filtering scans a wider slice of the listing unless a limit is given.
pub const TOPIC_STORY_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub struct HackerNewsConfig {
    pub base_url: String,
    pub story_limit: usize,
    pub request_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for HackerNewsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_HN_BASE_URL.to_string(),
            story_limit: 20,
            request_delay: Duration::from_millis(1000),
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub request_timeout: Duration,
    /// Titles longer than this are cut before they go into a prompt.
    pub max_title_chars: usize,
    /// Cap for the self-post excerpt included in the summary prompt.
    pub max_description_chars: usize,
    /// How many leading stories the sentiment and summary prompts see.
    pub context_stories: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            temperature: 0.3,
            request_timeout: Duration::from_secs(120),
            max_title_chars: 200,
            max_description_chars: 300,
            context_stories: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub data_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub hacker_news: HackerNewsConfig,
    pub llm: LlmConfig,
    pub output: OutputConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Missing or unparseable
    /// numeric values keep their defaults. Nothing is validated here; call
    /// [`Config::validate`] once every override has been applied.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let hn_defaults = HackerNewsConfig::default();
        let llm_defaults = LlmConfig::default();

        let hacker_news = HackerNewsConfig {
            base_url: lookup("HN_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(hn_defaults.base_url),
            story_limit: parse_or(&lookup, "HN_STORY_LIMIT", hn_defaults.story_limit),
            request_delay: lookup("HN_REQUEST_DELAY_MS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(hn_defaults.request_delay),
            request_timeout: lookup("HN_REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(hn_defaults.request_timeout),
        };

        let llm = LlmConfig {
            base_url: lookup("OLLAMA_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(llm_defaults.base_url),
            model: lookup("OLLAMA_MODEL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(llm_defaults.model),
            temperature: parse_or(&lookup, "LLM_TEMPERATURE", llm_defaults.temperature),
            request_timeout: lookup("LLM_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(llm_defaults.request_timeout),
            max_title_chars: parse_or(&lookup, "LLM_MAX_TITLE_CHARS", llm_defaults.max_title_chars),
            max_description_chars: parse_or(
                &lookup,
                "LLM_MAX_DESCRIPTION_CHARS",
                llm_defaults.max_description_chars,
            ),
            context_stories: parse_or(&lookup, "LLM_CONTEXT_STORIES", llm_defaults.context_stories),
        };

        let output = OutputConfig {
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| OutputConfig::default().data_dir),
        };

        Ok(Config {
            hacker_news,
            llm,
            output,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.hacker_news.story_limit == 0 {
            anyhow::bail!("HN_STORY_LIMIT must be at least 1");
        }
        if self.hacker_news.story_limit > MAX_STORY_LIMIT {
            anyhow::bail!(
                "HN_STORY_LIMIT must be at most {}, got {}",
                MAX_STORY_LIMIT,
                self.hacker_news.story_limit
            );
        }
        reqwest::Url::parse(&self.hacker_news.base_url)
            .with_context(|| format!("HN_BASE_URL is not a valid URL: {}", self.hacker_news.base_url))?;
        reqwest::Url::parse(&self.llm.base_url)
            .with_context(|| format!("OLLAMA_BASE_URL is not a valid URL: {}", self.llm.base_url))?;
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
