//! Repository for the `skills` table.

use nova_core::skill::SkillProgress;
use nova_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::skill::{CreateSkill, Skill, UpdateSkill};

const COLUMNS: &str = "id, user_id, category, name, description, level, current_xp, required_xp, \
                       created_at, updated_at";

/// Skill persistence. Every query is scoped to the owning user.
pub struct SkillRepo;

impl SkillRepo {
    /// Insert a new skill at the starting level.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateSkill,
    ) -> Result<Skill, sqlx::Error> {
        let start = SkillProgress::new();
        let query = format!(
            "INSERT INTO skills (user_id, category, name, description, level, current_xp, required_xp)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(user_id)
            .bind(input.category.as_str())
            .bind(&input.name)
            .bind(&input.description)
            .bind(start.level)
            .bind(start.current_xp)
            .bind(start.required_xp)
            .fetch_one(pool)
            .await
    }

    pub async fn find_for_owner(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Skill>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM skills WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Skill>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// All of a user's skills, grouped by category.
    pub async fn list_for_owner(pool: &PgPool, user_id: DbId) -> Result<Vec<Skill>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM skills WHERE user_id = $1 ORDER BY category, name"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// The user's highest-level skills.
    pub async fn top_for_owner(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<Skill>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM skills WHERE user_id = $1
             ORDER BY level DESC, current_xp DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Update the editable fields. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateSkill,
    ) -> Result<Option<Skill>, sqlx::Error> {
        let query = format!(
            "UPDATE skills SET
                name = COALESCE($3, name),
                category = COALESCE($4, category),
                description = COALESCE($5, description)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(input.category.map(|c| c.as_str()))
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a skill. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load and row-lock one of the user's skills inside a transaction.
    pub async fn lock_for_owner(
        conn: &mut PgConnection,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Skill>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM skills WHERE id = $1 AND user_id = $2 FOR UPDATE"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(conn)
            .await
    }

    /// Load and row-lock every listed skill the user owns.
    ///
    /// Ids the user does not own are silently absent from the result. Rows
    /// are locked in id order.
    pub async fn lock_many(
        conn: &mut PgConnection,
        user_id: DbId,
        ids: &[DbId],
    ) -> Result<Vec<Skill>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM skills WHERE user_id = $1 AND id = ANY($2)
             ORDER BY id
             FOR UPDATE"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(user_id)
            .bind(ids)
            .fetch_all(conn)
            .await
    }

    /// Persist new level state computed by the XP engine.
    pub async fn save_progress(
        conn: &mut PgConnection,
        id: DbId,
        progress: &SkillProgress,
    ) -> Result<Skill, sqlx::Error> {
        let query = format!(
            "UPDATE skills SET level = $2, current_xp = $3, required_xp = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(id)
            .bind(progress.level)
            .bind(progress.current_xp)
            .bind(progress.required_xp)
            .fetch_one(conn)
            .await
    }
}
