use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// XP amounts must lie in `1..=MAX_XP_AWARD`.
    #[error(
        "Invalid XP amount: {0} (must be between 1 and {max})",
        max = crate::skill::MAX_XP_AWARD
    )]
    InvalidAmount(i64),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
