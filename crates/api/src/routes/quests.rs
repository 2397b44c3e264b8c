//! Route definitions for the `/quests` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::quests;
use crate::state::AppState;

/// Routes mounted at `/quests`.
///
/// ```text
/// GET    /                -> list_quests
/// POST   /                -> create_quest
/// GET    /{id}            -> get_quest
/// PUT    /{id}            -> update_quest
/// DELETE /{id}            -> delete_quest
/// PUT    /{id}/progress   -> update_progress
/// POST   /{id}/complete   -> complete_quest
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(quests::list_quests).post(quests::create_quest))
        .route(
            "/{id}",
            get(quests::get_quest)
                .put(quests::update_quest)
                .delete(quests::delete_quest),
        )
        .route("/{id}/progress", put(quests::update_progress))
        .route("/{id}/complete", post(quests::complete_quest))
}
