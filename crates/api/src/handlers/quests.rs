//! Handlers for the `/quests` resource.
//!
//! Plain CRUD goes straight to [`QuestRepo`]; updates, progress and
//! completion go through [`crate::engine::rewards`] so rewards are paid
//! exactly once.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use nova_core::error::CoreError;
use nova_core::quest::{validate_skill_rewards, ProgressUpdate, QuestStatus, QuestType};
use nova_core::types::DbId;
use nova_db::models::quest::{CreateQuest, Quest, UpdateQuest};
use nova_db::repositories::QuestRepo;
use serde::Deserialize;
use validator::Validate;

use crate::engine::rewards::{self, QuestOutcome};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /quests`.
#[derive(Debug, Deserialize)]
pub struct QuestListQuery {
    #[serde(rename = "type")]
    pub quest_type: Option<String>,
    pub status: Option<String>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Quest", id })
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/quests?type=&status=
pub async fn list_quests(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<QuestListQuery>,
) -> AppResult<Json<DataResponse<Vec<Quest>>>> {
    let quest_type = query
        .quest_type
        .as_deref()
        .map(QuestType::from_str)
        .transpose()?;
    let status = query
        .status
        .as_deref()
        .map(QuestStatus::from_str)
        .transpose()?;

    let quests = QuestRepo::list_for_owner(
        &state.pool,
        auth.user_id,
        quest_type.map(|t| t.as_str()),
        status.map(|s| s.as_str()),
    )
    .await?;

    Ok(Json(DataResponse { data: quests }))
}

/// POST /api/v1/quests
///
/// Quests start active with zero progress.
pub async fn create_quest(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateQuest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_skill_rewards(&input.skill_rewards)?;

    let quest = QuestRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        quest_id = quest.id,
        quest_type = %quest.quest_type,
        xp_reward = quest.xp_reward,
        "Quest created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: quest })))
}

/// GET /api/v1/quests/{id}
pub async fn get_quest(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Quest>>> {
    let quest = QuestRepo::find_for_owner(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: quest }))
}

/// PUT /api/v1/quests/{id}
///
/// Edits descriptive fields, rewards and step descriptions. Steps keep
/// their checked state when their description is unchanged and can only be
/// edited on an active quest (409 otherwise). Status and progress only move
/// through the progress and complete endpoints, except that an edit leaving
/// every step done completes the quest.
pub async fn update_quest(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateQuest>,
) -> AppResult<Json<DataResponse<QuestOutcome>>> {
    input.validate()?;
    if let Some(skill_rewards) = &input.skill_rewards {
        validate_skill_rewards(skill_rewards)?;
    }

    let outcome = rewards::update_quest(&state.pool, auth.user_id, id, &input).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// DELETE /api/v1/quests/{id}
pub async fn delete_quest(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !QuestRepo::delete(&state.pool, id, auth.user_id).await? {
        return Err(not_found(id));
    }
    tracing::info!(user_id = auth.user_id, quest_id = id, "Quest deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// PUT /api/v1/quests/{id}/progress
///
/// Body `{ "progress": 0..=100, "step_index": n }`, either or both.
/// Progress on a quest that is no longer active is 409.
pub async fn update_progress(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(update): Json<ProgressUpdate>,
) -> AppResult<Json<DataResponse<QuestOutcome>>> {
    let outcome = rewards::update_quest_progress(&state.pool, auth.user_id, id, &update).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/quests/{id}/complete
///
/// Completing an already completed quest succeeds with
/// `completed_now: false` and pays nothing.
pub async fn complete_quest(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<QuestOutcome>>> {
    let outcome = rewards::complete_quest(&state.pool, auth.user_id, id).await?;
    Ok(Json(DataResponse { data: outcome }))
}
