//! Handlers for the `/reflections` resource, including the AI-backed
//! questions, analysis, and summary endpoints.
//!
//! The AI endpoints always answer 200: when the model is unavailable or
//! rate limited they return the fixed fallback content.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use nova_ai::reflection::{
    ReflectionAi, ReflectionAnalysis, ReflectionDigest, ReflectionSummary, SkillSnapshot,
    UserContext,
};
use nova_core::error::CoreError;
use nova_core::reflection::{ReflectionType, SummaryPeriod};
use nova_core::skill::SkillCategory;
use nova_core::types::DbId;
use nova_db::models::reflection::{CreateReflection, Reflection, UpdateReflection};
use nova_db::repositories::{ReflectionRepo, SkillRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LIST_LIMIT: i64 = 20;
const MAX_LIST_LIMIT: i64 = 100;

/// Skills and moods fed into question generation.
const CONTEXT_SKILLS: i64 = 5;
const CONTEXT_MOODS: i64 = 5;

#[derive(Debug, Deserialize)]
pub struct ReflectionListQuery {
    #[serde(rename = "type")]
    pub reflection_type: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionsQuery {
    #[serde(rename = "type")]
    pub reflection_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub period: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    #[serde(rename = "type")]
    pub reflection_type: Option<ReflectionType>,
    pub questions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub period: SummaryPeriod,
    pub reflection_count: usize,
    #[serde(flatten)]
    pub summary: ReflectionSummary,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Reflection",
        id,
    })
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/reflections?type=&limit=
pub async fn list_reflections(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ReflectionListQuery>,
) -> AppResult<Json<DataResponse<Vec<Reflection>>>> {
    let reflection_type = query
        .reflection_type
        .as_deref()
        .map(ReflectionType::from_str)
        .transpose()?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);

    let reflections = ReflectionRepo::list_for_owner(
        &state.pool,
        auth.user_id,
        reflection_type.map(|t| t.as_str()),
        limit,
    )
    .await?;

    Ok(Json(DataResponse { data: reflections }))
}

/// POST /api/v1/reflections
pub async fn create_reflection(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateReflection>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let reflection = ReflectionRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        reflection_id = reflection.id,
        reflection_type = %reflection.reflection_type,
        "Reflection created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: reflection })))
}

/// GET /api/v1/reflections/{id}
pub async fn get_reflection(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Reflection>>> {
    let reflection = ReflectionRepo::find_for_owner(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: reflection }))
}

/// PUT /api/v1/reflections/{id}
pub async fn update_reflection(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReflection>,
) -> AppResult<Json<DataResponse<Reflection>>> {
    input.validate()?;
    let reflection = ReflectionRepo::update(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: reflection }))
}

/// DELETE /api/v1/reflections/{id}
pub async fn delete_reflection(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ReflectionRepo::delete(&state.pool, id, auth.user_id).await? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// AI-backed endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/reflections/questions?type=
///
/// Personalised reflection questions. Without a `type`, a general set.
pub async fn generate_questions(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<QuestionsQuery>,
) -> AppResult<Json<DataResponse<QuestionsResponse>>> {
    let reflection_type = query
        .reflection_type
        .as_deref()
        .map(ReflectionType::from_str)
        .transpose()?;

    let context = load_user_context(&state, auth.user_id).await?;
    let questions = ReflectionAi::new(&state.ai)
        .generate_questions(auth.user_id, reflection_type, &context)
        .await;

    Ok(Json(DataResponse {
        data: QuestionsResponse {
            reflection_type,
            questions,
        },
    }))
}

/// POST /api/v1/reflections/{id}/analysis
///
/// Analyse the reflection's answered questions and store the result on it.
pub async fn analyze_reflection(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ReflectionAnalysis>>> {
    let reflection = ReflectionRepo::find_for_owner(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let reflection_type = ReflectionType::from_str(&reflection.reflection_type)?;

    let analysis = ReflectionAi::new(&state.ai)
        .analyze_responses(auth.user_id, reflection_type, &reflection.questions.0)
        .await;

    let stored = serde_json::to_value(&analysis)
        .map_err(|e| AppError::InternalError(format!("Failed to serialize analysis: {e}")))?;
    ReflectionRepo::save_analysis(&state.pool, reflection.id, &stored).await?;

    Ok(Json(DataResponse { data: analysis }))
}

/// GET /api/v1/reflections/summary?period=week|month|year
///
/// Unknown or missing periods mean a week.
pub async fn summarize_reflections(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<DataResponse<SummaryResponse>>> {
    let period = SummaryPeriod::parse_or_default(query.period.as_deref());
    let since = period.start(Utc::now());

    let digests = ReflectionRepo::list_since(&state.pool, auth.user_id, since)
        .await?
        .into_iter()
        .map(digest)
        .collect::<AppResult<Vec<_>>>()?;

    let summary = ReflectionAi::new(&state.ai)
        .generate_summary(auth.user_id, period, &digests)
        .await;

    Ok(Json(DataResponse {
        data: SummaryResponse {
            period,
            reflection_count: digests.len(),
            summary,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_user_context(state: &AppState, user_id: DbId) -> AppResult<UserContext> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    let top_skills = SkillRepo::top_for_owner(&state.pool, user_id, CONTEXT_SKILLS)
        .await?
        .into_iter()
        .map(|skill| -> AppResult<SkillSnapshot> {
            Ok(SkillSnapshot {
                category: SkillCategory::from_str(&skill.category)?,
                name: skill.name,
                level: skill.level,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let recent_moods = ReflectionRepo::recent_moods(&state.pool, user_id, CONTEXT_MOODS).await?;

    Ok(UserContext {
        username: user.username,
        level: user.level,
        total_xp: user.total_xp,
        streak_days: user.streak_days,
        top_skills,
        recent_moods,
    })
}

fn digest(reflection: Reflection) -> AppResult<ReflectionDigest> {
    Ok(ReflectionDigest {
        date: reflection.reflection_date.date_naive(),
        reflection_type: ReflectionType::from_str(&reflection.reflection_type)?,
        mood: reflection.mood,
        energy_level: reflection.energy_level,
        content: ReflectionDigest::excerpt(&reflection.content),
        achievements: reflection.achievements,
        challenges: reflection.challenges,
        insights: reflection.insights,
    })
}
