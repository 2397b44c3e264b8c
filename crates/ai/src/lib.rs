//! AI request layer.
//!
//! - [`cache`] -- bounded TTL cache of completions with FIFO eviction.
//! - [`rate_limit`] -- per-user sliding-window request limiter.
//! - [`provider`] -- the chat-completion provider seam and its HTTP client.
//! - [`gateway`] -- orchestrates rate limiting, caching, the provider call,
//!   and fallbacks. Never surfaces an error to its caller.
//! - [`reflection`] -- reflection questions, analyses, and summaries built
//!   on the gateway.

pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod prompts;
pub mod provider;
pub mod rate_limit;
pub mod reflection;

pub use gateway::{AiGateway, CompletionOptions, CompletionOutcome};
