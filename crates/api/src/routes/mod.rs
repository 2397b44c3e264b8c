pub mod auth;
pub mod city;
pub mod health;
pub mod quests;
pub mod reflections;
pub mod skills;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                   register (public)
/// /auth/login                      login (public)
/// /auth/profile                    get, update own profile
///
/// /users                           list public user views
/// /users/{id}                      get public user view
///
/// /skills                          list, create
/// /skills/{id}                     get, update, delete
/// /skills/{id}/xp                  award XP (POST)
///
/// /quests                          list (?type=&status=), create
/// /quests/{id}                     get, update, delete
/// /quests/{id}/progress            progress update (PUT)
/// /quests/{id}/complete            complete and pay rewards (POST)
///
/// /reflections                     list (?type=&limit=), create
/// /reflections/questions           AI reflection questions (?type=)
/// /reflections/summary             AI period summary (?period=)
/// /reflections/{id}                get, update, delete
/// /reflections/{id}/analysis       AI answer analysis (POST)
///
/// /city                            get (creates default), update level
/// /city/buildings                  list, add
/// /city/buildings/{id}             update
/// /city/npcs                       list, add
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/skills", skills::router())
        .nest("/quests", quests::router())
        .nest("/reflections", reflections::router())
        .nest("/city", city::router())
}
