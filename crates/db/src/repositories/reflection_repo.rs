//! Repository for the `reflections` table.

use nova_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::reflection::{CreateReflection, Reflection, UpdateReflection};

const COLUMNS: &str = "id, user_id, reflection_type, reflection_date, content, mood, energy_level, \
                       questions, achievements, challenges, insights, goals, ai_analysis, \
                       created_at, updated_at";

/// Reflection persistence. Every query is scoped to the owning user.
pub struct ReflectionRepo;

impl ReflectionRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateReflection,
    ) -> Result<Reflection, sqlx::Error> {
        let query = format!(
            "INSERT INTO reflections (user_id, reflection_type, reflection_date, content, mood,
                                      energy_level, questions, achievements, challenges,
                                      insights, goals)
             VALUES ($1, $2, COALESCE($3, NOW()), $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reflection>(&query)
            .bind(user_id)
            .bind(input.reflection_type.as_str())
            .bind(input.reflection_date)
            .bind(&input.content)
            .bind(&input.mood)
            .bind(input.energy_level)
            .bind(Json(&input.questions))
            .bind(&input.achievements)
            .bind(&input.challenges)
            .bind(&input.insights)
            .bind(Json(&input.goals))
            .fetch_one(pool)
            .await
    }

    pub async fn find_for_owner(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Reflection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reflections WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Reflection>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// A user's reflections, newest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        user_id: DbId,
        reflection_type: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Reflection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reflections
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR reflection_type = $2)
             ORDER BY reflection_date DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, Reflection>(&query)
            .bind(user_id)
            .bind(reflection_type)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Reflections dated at or after `since`, oldest first.
    pub async fn list_since(
        pool: &PgPool,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<Reflection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reflections
             WHERE user_id = $1 AND reflection_date >= $2
             ORDER BY reflection_date ASC"
        );
        sqlx::query_as::<_, Reflection>(&query)
            .bind(user_id)
            .bind(since)
            .fetch_all(pool)
            .await
    }

    /// Moods of the user's latest reflections, newest first. Reflections
    /// without a mood are skipped.
    pub async fn recent_moods(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT mood FROM reflections
             WHERE user_id = $1 AND mood IS NOT NULL
             ORDER BY reflection_date DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateReflection,
    ) -> Result<Option<Reflection>, sqlx::Error> {
        let query = format!(
            "UPDATE reflections SET
                reflection_type = COALESCE($3, reflection_type),
                content = COALESCE($4, content),
                mood = COALESCE($5, mood),
                energy_level = COALESCE($6, energy_level),
                questions = COALESCE($7, questions),
                achievements = COALESCE($8, achievements),
                challenges = COALESCE($9, challenges),
                insights = COALESCE($10, insights),
                goals = COALESCE($11, goals)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reflection>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.reflection_type.map(|t| t.as_str()))
            .bind(&input.content)
            .bind(&input.mood)
            .bind(input.energy_level)
            .bind(input.questions.as_ref().map(Json))
            .bind(&input.achievements)
            .bind(&input.challenges)
            .bind(&input.insights)
            .bind(input.goals.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Store the latest AI analysis of a reflection.
    pub async fn save_analysis(
        pool: &PgPool,
        id: DbId,
        analysis: &serde_json::Value,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE reflections SET ai_analysis = $2 WHERE id = $1")
            .bind(id)
            .bind(analysis)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete a reflection. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reflections WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
