//! Route definitions for the `/skills` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::skills;
use crate::state::AppState;

/// Routes mounted at `/skills`.
///
/// ```text
/// GET    /          -> list_skills
/// POST   /          -> create_skill
/// GET    /{id}      -> get_skill
/// PUT    /{id}      -> update_skill
/// DELETE /{id}      -> delete_skill
/// POST   /{id}/xp   -> add_xp
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(skills::list_skills).post(skills::create_skill))
        .route(
            "/{id}",
            get(skills::get_skill)
                .put(skills::update_skill)
                .delete(skills::delete_skill),
        )
        .route("/{id}/xp", post(skills::add_xp))
}
