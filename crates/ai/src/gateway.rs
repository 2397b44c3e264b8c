//! The AI gateway: rate limit, cache, provider call, fallback.
//!
//! Every request runs the same sequence:
//!
//! 1. A rate-limited user gets the rate-limit message. Nothing else runs.
//! 2. A cache hit is returned as is. The request is not tracked.
//! 3. Otherwise the request is tracked and sent to the provider.
//! 4. A successful completion is cached and returned.
//! 5. A failed or timed-out call returns the fallback text, which is never
//!    cached.
//!
//! The public `generate_*` methods cannot fail; provider errors only reach
//! the log.

use std::sync::Arc;
use std::time::Duration;

use nova_core::types::DbId;
use serde_json::Value;

use crate::cache::{cache_key, AiCache};
use crate::config::{AiConfig, ModelDefaults};
use crate::error::AiError;
use crate::extract::parse_json;
use crate::prompts::{
    apply_space_theme, default_fallback_object, DEFAULT_SYSTEM_PROMPT, FALLBACK_TEXT,
    JSON_INSTRUCTION, RATE_LIMIT_MESSAGE,
};
use crate::provider::{ChatMessage, ChatRequest, CompletionProvider, OpenAiProvider};
use crate::rate_limit::RateLimiter;

/// Per-request overrides. `None` means "use the configured default".
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub presence_penalty: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub system_prompt: Option<String>,
    pub cache_ttl: Option<Duration>,
    /// Frame the prompt in the NEBULA ODYSSEY universe (default `true`).
    pub space_themed: bool,
    pub rate_limit_response: Option<String>,
    pub fallback_response: Option<String>,
    /// Returned by structured requests that produce no usable JSON.
    pub fallback_object: Option<Value>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            model: None,
            temperature: None,
            max_tokens: None,
            presence_penalty: None,
            frequency_penalty: None,
            system_prompt: None,
            cache_ttl: None,
            space_themed: true,
            rate_limit_response: None,
            fallback_response: None,
            fallback_object: None,
        }
    }
}

/// How a completion request was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    RateLimited(String),
    CacheHit(String),
    Live(String),
    Fallback(String),
}

impl CompletionOutcome {
    pub fn text(&self) -> &str {
        match self {
            Self::RateLimited(t) | Self::CacheHit(t) | Self::Live(t) | Self::Fallback(t) => t,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::RateLimited(t) | Self::CacheHit(t) | Self::Live(t) | Self::Fallback(t) => t,
        }
    }

    /// Whether the text came from the model (now or earlier).
    pub fn is_model_output(&self) -> bool {
        matches!(self, Self::CacheHit(_) | Self::Live(_))
    }
}

pub struct AiGateway {
    defaults: ModelDefaults,
    timeout: Duration,
    cache: AiCache,
    limiter: RateLimiter,
    provider: Arc<dyn CompletionProvider>,
}

impl AiGateway {
    pub fn new(config: &AiConfig, provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            defaults: config.defaults.clone(),
            timeout: config.provider.timeout,
            cache: AiCache::new(&config.cache),
            limiter: RateLimiter::new(&config.rate_limit),
            provider,
        }
    }

    /// Build a gateway backed by the OpenAI-compatible HTTP provider.
    pub fn from_config(config: &AiConfig) -> Self {
        Self::new(config, Arc::new(OpenAiProvider::new(&config.provider)))
    }

    pub fn cache(&self) -> &AiCache {
        &self.cache
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Run one request through the gateway and report how it was answered.
    pub async fn complete(
        &self,
        user_id: DbId,
        prompt: &str,
        options: &CompletionOptions,
    ) -> CompletionOutcome {
        if self.limiter.is_limited(user_id).await {
            tracing::info!(user_id, "AI request rate limited");
            let message = options
                .rate_limit_response
                .clone()
                .unwrap_or_else(|| RATE_LIMIT_MESSAGE.to_string());
            return CompletionOutcome::RateLimited(message);
        }

        let request = self.build_request(prompt, options);
        let key = cache_key(
            prompt,
            &request.model,
            request.temperature,
            request.max_tokens,
        );

        if let Some(cached) = self.cache.get(&key).await {
            tracing::debug!(user_id, "AI cache hit");
            return CompletionOutcome::CacheHit(cached);
        }

        self.limiter.track(user_id).await;

        match self.call_provider(&request).await {
            Ok(text) => {
                let ttl = options.cache_ttl.unwrap_or_else(|| self.cache.default_ttl());
                self.cache.set(key, text.clone(), ttl).await;
                CompletionOutcome::Live(text)
            }
            Err(e) => {
                tracing::error!(user_id, error = %e, "AI provider call failed");
                let fallback = options
                    .fallback_response
                    .clone()
                    .unwrap_or_else(|| FALLBACK_TEXT.to_string());
                CompletionOutcome::Fallback(fallback)
            }
        }
    }

    /// Completion text for `prompt`, or a fallback text. Never fails.
    pub async fn generate_completion(
        &self,
        user_id: DbId,
        prompt: &str,
        options: &CompletionOptions,
    ) -> String {
        self.complete(user_id, prompt, options).await.into_text()
    }

    /// JSON answer for `prompt`, or the fallback object. Never fails.
    ///
    /// A rate-limited or failed request yields the fallback object directly;
    /// its message text is not parsed.
    pub async fn generate_structured_response(
        &self,
        user_id: DbId,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Value {
        let json_prompt = format!("{prompt}{JSON_INSTRUCTION}");
        let outcome = self.complete(user_id, &json_prompt, options).await;

        let fallback = || {
            options
                .fallback_object
                .clone()
                .unwrap_or_else(default_fallback_object)
        };

        if !outcome.is_model_output() {
            return fallback();
        }

        match parse_json(outcome.text()) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Could not parse structured AI response");
                fallback()
            }
        }
    }

    fn build_request(&self, prompt: &str, options: &CompletionOptions) -> ChatRequest {
        let system_prompt = options
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());
        let user_prompt = if options.space_themed {
            apply_space_theme(prompt)
        } else {
            prompt.to_string()
        };

        ChatRequest {
            model: options
                .model
                .clone()
                .unwrap_or_else(|| self.defaults.model.clone()),
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(user_prompt),
            ],
            max_tokens: options.max_tokens.unwrap_or(self.defaults.max_tokens),
            temperature: options.temperature.unwrap_or(self.defaults.temperature),
            presence_penalty: options
                .presence_penalty
                .unwrap_or(self.defaults.presence_penalty),
            frequency_penalty: options
                .frequency_penalty
                .unwrap_or(self.defaults.frequency_penalty),
        }
    }

    async fn call_provider(&self, request: &ChatRequest) -> Result<String, AiError> {
        match tokio::time::timeout(self.timeout, self.provider.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(AiError::Timeout(self.timeout.as_secs())),
        }
    }
}
