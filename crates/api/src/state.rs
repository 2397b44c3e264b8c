use std::sync::Arc;

use nova_ai::AiGateway;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: nova_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// AI gateway: owns the response cache, the per-user rate limiter, and
    /// the completion provider.
    pub ai: Arc<AiGateway>,
}
