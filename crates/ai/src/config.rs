//! AI layer configuration.

use std::str::FromStr;
use std::time::Duration;

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 800;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_PRESENCE_PENALTY: f64 = 0.1;
pub const DEFAULT_FREQUENCY_PENALTY: f64 = 0.1;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
pub const DEFAULT_CACHE_MAX_SIZE: usize = 100;

pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: usize = 20;
pub const DEFAULT_RATE_LIMIT_WINDOW_MS: u64 = 60_000;

/// Connection settings for the completion provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    /// Base URL of an OpenAI-compatible API, without trailing slash.
    pub base_url: String,
    /// Upper bound on a single provider call; exceeding it is a failure.
    pub timeout: Duration,
}

/// Model parameters used when a caller does not override them.
#[derive(Debug, Clone)]
pub struct ModelDefaults {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub presence_penalty: f64,
    pub frequency_penalty: f64,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl: Duration,
    pub max_size: usize,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub max_requests: usize,
    pub window: Duration,
}

/// Full AI layer configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub provider: ProviderConfig,
    pub defaults: ModelDefaults,
    pub cache: CacheConfig,
    pub rate_limit: RateLimitConfig,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig {
                api_key: String::new(),
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
            },
            defaults: ModelDefaults {
                model: DEFAULT_MODEL.to_string(),
                max_tokens: DEFAULT_MAX_TOKENS,
                temperature: DEFAULT_TEMPERATURE,
                presence_penalty: DEFAULT_PRESENCE_PENALTY,
                frequency_penalty: DEFAULT_FREQUENCY_PENALTY,
            },
            cache: CacheConfig {
                enabled: true,
                ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
                max_size: DEFAULT_CACHE_MAX_SIZE,
            },
            rate_limit: RateLimitConfig {
                enabled: true,
                max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
                window: Duration::from_millis(DEFAULT_RATE_LIMIT_WINDOW_MS),
            },
        }
    }
}

impl AiConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                      |
    /// |---------------------------|------------------------------|
    /// | `OPENAI_API_KEY`          | empty (every call falls back)|
    /// | `OPENAI_BASE_URL`         | `https://api.openai.com/v1`  |
    /// | `OPENAI_MODEL`            | `gpt-3.5-turbo`              |
    /// | `AI_MAX_TOKENS`           | `800`                        |
    /// | `AI_TEMPERATURE`          | `0.7`                        |
    /// | `AI_REQUEST_TIMEOUT_SECS` | `30`                         |
    /// | `AI_CACHE_ENABLED`        | `true`                       |
    /// | `AI_CACHE_TTL`            | `3600` (seconds)             |
    /// | `AI_CACHE_MAX_SIZE`       | `100`                        |
    /// | `AI_RATE_LIMIT_ENABLED`   | `true`                       |
    /// | `AI_RATE_LIMIT`           | `20` (requests per window)   |
    /// | `AI_RATE_LIMIT_WINDOW_MS` | `60000`                      |
    ///
    /// Values that fail to parse are logged and replaced by the default.
    pub fn from_env() -> Self {
        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        Self {
            provider: ProviderConfig {
                api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
                base_url,
                timeout: Duration::from_secs(env_or(
                    "AI_REQUEST_TIMEOUT_SECS",
                    DEFAULT_PROVIDER_TIMEOUT_SECS,
                )),
            },
            defaults: ModelDefaults {
                model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into()),
                max_tokens: env_or("AI_MAX_TOKENS", DEFAULT_MAX_TOKENS),
                temperature: env_or("AI_TEMPERATURE", DEFAULT_TEMPERATURE),
                presence_penalty: DEFAULT_PRESENCE_PENALTY,
                frequency_penalty: DEFAULT_FREQUENCY_PENALTY,
            },
            cache: CacheConfig {
                enabled: env_or("AI_CACHE_ENABLED", true),
                ttl: Duration::from_secs(env_or("AI_CACHE_TTL", DEFAULT_CACHE_TTL_SECS)),
                max_size: env_or("AI_CACHE_MAX_SIZE", DEFAULT_CACHE_MAX_SIZE),
            },
            rate_limit: RateLimitConfig {
                enabled: env_or("AI_RATE_LIMIT_ENABLED", true),
                max_requests: env_or("AI_RATE_LIMIT", DEFAULT_RATE_LIMIT_MAX_REQUESTS),
                window: Duration::from_millis(env_or(
                    "AI_RATE_LIMIT_WINDOW_MS",
                    DEFAULT_RATE_LIMIT_WINDOW_MS,
                )),
            },
        }
    }
}

/// Read and parse an environment variable, falling back to `default` when
/// it is unset or malformed.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, %default, "Invalid value, using default");
            default
        }),
        Err(_) => default,
    }
}
