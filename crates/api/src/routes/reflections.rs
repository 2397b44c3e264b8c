//! Route definitions for the `/reflections` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reflections;
use crate::state::AppState;

/// Routes mounted at `/reflections`.
///
/// ```text
/// GET    /                 -> list_reflections
/// POST   /                 -> create_reflection
/// GET    /questions        -> generate_questions
/// GET    /summary          -> summarize_reflections
/// GET    /{id}             -> get_reflection
/// PUT    /{id}             -> update_reflection
/// DELETE /{id}             -> delete_reflection
/// POST   /{id}/analysis    -> analyze_reflection
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(reflections::list_reflections).post(reflections::create_reflection),
        )
        .route("/questions", get(reflections::generate_questions))
        .route("/summary", get(reflections::summarize_reflections))
        .route(
            "/{id}",
            get(reflections::get_reflection)
                .put(reflections::update_reflection)
                .delete(reflections::delete_reflection),
        )
        .route("/{id}/analysis", post(reflections::analyze_reflection))
}
