/// Errors raised inside the AI layer.
///
/// These never leave [`crate::gateway::AiGateway`]'s public `generate_*`
/// methods; they are logged and replaced with fallback values.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The provider did not answer within the configured timeout.
    #[error("Provider did not respond within {0} seconds")]
    Timeout(u64),

    /// No API key is configured, so no call was attempted.
    #[error("No API key configured for the completion provider")]
    MissingApiKey,

    /// The provider answered but without any completion text.
    #[error("Provider returned no completion")]
    EmptyCompletion,

    /// The completion text did not contain parseable JSON.
    #[error("Could not parse structured response: {0}")]
    Parse(String),
}
