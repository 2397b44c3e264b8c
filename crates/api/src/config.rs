use crate::auth::jwt::JwtConfig;

/// NOVA API server configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`). Kept above the AI
    /// provider timeout so a slow completion still reaches its fallback.
    pub request_timeout_secs: u64,
    /// How long to wait for background tasks after the listener closes
    /// (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Interval between expired AI cache sweeps in seconds (default: `300`,
    /// must be positive).
    pub ai_cache_sweep_interval_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                 |
    /// |--------------------------------|-------------------------|
    /// | `HOST`                         | `0.0.0.0`               |
    /// | `PORT`                         | `3000`                  |
    /// | `CORS_ORIGINS`                 | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`         | `60`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`        | `30`                    |
    /// | `AI_CACHE_SWEEP_INTERVAL_SECS` | `300`                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let ai_cache_sweep_interval_secs = parse_positive_secs(
            &std::env::var("AI_CACHE_SWEEP_INTERVAL_SECS").unwrap_or_else(|_| "300".into()),
        )
        .expect("AI_CACHE_SWEEP_INTERVAL_SECS must be a positive integer");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            ai_cache_sweep_interval_secs,
            jwt,
        }
    }
}

/// Parse a number of seconds that is used as a timer period.
fn parse_positive_secs(value: &str) -> Option<u64> {
    value.trim().parse().ok().filter(|secs| *secs > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_interval_must_be_positive() {
        assert_eq!(parse_positive_secs("300"), Some(300));
        assert_eq!(parse_positive_secs(" 15 "), Some(15));
        assert_eq!(parse_positive_secs("0"), None);
        assert_eq!(parse_positive_secs("-5"), None);
        assert_eq!(parse_positive_secs("soon"), None);
    }
}
