//! Handlers for the `/city` resource.
//!
//! Every user has one city. The first request that touches it creates the
//! default layout.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use nova_core::error::CoreError;
use nova_core::types::DbId;
use nova_db::models::city::{
    Building, City, CityResponse, CreateBuilding, CreateNpc, Npc, UpdateBuilding, UpdateCity,
};
use nova_db::repositories::CityRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// City
// ---------------------------------------------------------------------------

/// GET /api/v1/city
pub async fn get_city(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CityResponse>>> {
    let city = CityRepo::get_or_create(&state.pool, auth.user_id).await?;
    let buildings = CityRepo::list_buildings(&state.pool, city.id).await?;
    let npcs = CityRepo::list_npcs(&state.pool, city.id).await?;

    Ok(Json(DataResponse {
        data: CityResponse {
            city,
            buildings,
            npcs,
        },
    }))
}

/// PUT /api/v1/city
pub async fn update_city(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateCity>,
) -> AppResult<Json<DataResponse<City>>> {
    input.validate()?;
    let city = CityRepo::get_or_create(&state.pool, auth.user_id).await?;
    let city = CityRepo::update_level(&state.pool, city.id, input.level).await?;

    tracing::info!(user_id = auth.user_id, level = city.level, "City level updated");

    Ok(Json(DataResponse { data: city }))
}

// ---------------------------------------------------------------------------
// Buildings
// ---------------------------------------------------------------------------

/// GET /api/v1/city/buildings
pub async fn list_buildings(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Building>>>> {
    let city = CityRepo::get_or_create(&state.pool, auth.user_id).await?;
    let buildings = CityRepo::list_buildings(&state.pool, city.id).await?;
    Ok(Json(DataResponse { data: buildings }))
}

/// POST /api/v1/city/buildings
pub async fn add_building(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateBuilding>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let city = CityRepo::get_or_create(&state.pool, auth.user_id).await?;
    let building = CityRepo::add_building(&state.pool, city.id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        building_id = building.id,
        building_type = %building.building_type,
        "Building added",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: building })))
}

/// PUT /api/v1/city/buildings/{id}
pub async fn update_building(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(building_id): Path<DbId>,
    Json(input): Json<UpdateBuilding>,
) -> AppResult<Json<DataResponse<Building>>> {
    input.validate()?;
    let city = CityRepo::get_or_create(&state.pool, auth.user_id).await?;
    let building = CityRepo::update_building(&state.pool, city.id, building_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Building",
            id: building_id,
        }))?;
    Ok(Json(DataResponse { data: building }))
}

// ---------------------------------------------------------------------------
// NPCs
// ---------------------------------------------------------------------------

/// GET /api/v1/city/npcs
pub async fn list_npcs(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Npc>>>> {
    let city = CityRepo::get_or_create(&state.pool, auth.user_id).await?;
    let npcs = CityRepo::list_npcs(&state.pool, city.id).await?;
    Ok(Json(DataResponse { data: npcs }))
}

/// POST /api/v1/city/npcs
pub async fn add_npc(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateNpc>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let city = CityRepo::get_or_create(&state.pool, auth.user_id).await?;
    let npc = CityRepo::add_npc(&state.pool, city.id, &input).await?;

    tracing::info!(user_id = auth.user_id, npc_id = npc.id, "NPC added");

    Ok((StatusCode::CREATED, Json(DataResponse { data: npc })))
}
