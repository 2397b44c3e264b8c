//! Route definitions for the `/city` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::city;
use crate::state::AppState;

/// Routes mounted at `/city`.
///
/// ```text
/// GET  /                 -> get_city
/// PUT  /                 -> update_city
/// GET  /buildings        -> list_buildings
/// POST /buildings        -> add_building
/// PUT  /buildings/{id}   -> update_building
/// GET  /npcs             -> list_npcs
/// POST /npcs             -> add_npc
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(city::get_city).put(city::update_city))
        .route(
            "/buildings",
            get(city::list_buildings).post(city::add_building),
        )
        .route("/buildings/{id}", put(city::update_building))
        .route("/npcs", get(city::list_npcs).post(city::add_npc))
}
