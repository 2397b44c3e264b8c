//! Handlers for the `/skills` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use nova_core::error::CoreError;
use nova_core::types::DbId;
use nova_db::models::skill::{AddXp, CreateSkill, Skill, UpdateSkill};
use nova_db::repositories::SkillRepo;
use validator::Validate;

use crate::engine::rewards::{award_skill_xp, SkillXpOutcome};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Skill", id })
}

/// GET /api/v1/skills
pub async fn list_skills(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Skill>>>> {
    let skills = SkillRepo::list_for_owner(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: skills }))
}

/// POST /api/v1/skills
///
/// New skills start at level 1 with 0 / 100 XP.
pub async fn create_skill(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSkill>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let skill = SkillRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        skill_id = skill.id,
        category = %skill.category,
        "Skill created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: skill })))
}

/// GET /api/v1/skills/{id}
pub async fn get_skill(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Skill>>> {
    let skill = SkillRepo::find_for_owner(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: skill }))
}

/// PUT /api/v1/skills/{id}
///
/// Edits name, category, and description. Level and XP are untouched.
pub async fn update_skill(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSkill>,
) -> AppResult<Json<DataResponse<Skill>>> {
    input.validate()?;
    let skill = SkillRepo::update(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: skill }))
}

/// DELETE /api/v1/skills/{id}
pub async fn delete_skill(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !SkillRepo::delete(&state.pool, id, auth.user_id).await? {
        return Err(not_found(id));
    }
    tracing::info!(user_id = auth.user_id, skill_id = id, "Skill deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/skills/{id}/xp
///
/// Award XP directly. Amounts outside `1..=MAX_XP_AWARD` are rejected
/// with 400.
pub async fn add_xp(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddXp>,
) -> AppResult<Json<DataResponse<SkillXpOutcome>>> {
    input.validate()?;
    let outcome = award_skill_xp(&state.pool, auth.user_id, id, input.amount).await?;
    Ok(Json(DataResponse { data: outcome }))
}
