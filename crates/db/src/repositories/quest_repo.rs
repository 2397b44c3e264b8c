//! Repository for the `quests` table.

use nova_core::quest::{QuestLifecycle, QuestStep};
use nova_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::models::quest::{CreateQuest, Quest, QuestStepEdit, UpdateQuest};

const COLUMNS: &str = "id, user_id, title, description, quest_type, category, difficulty, status, \
                       progress, xp_reward, skill_rewards, steps, start_date, due_date, \
                       linked_npc, completed_at, created_at, updated_at";

/// Quest persistence. Every query is scoped to the owning user.
pub struct QuestRepo;

impl QuestRepo {
    /// Insert a new active quest with zero progress and open steps.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateQuest,
    ) -> Result<Quest, sqlx::Error> {
        let steps: Vec<QuestStep> = input.steps.iter().map(QuestStepEdit::open_step).collect();
        let query = format!(
            "INSERT INTO quests (user_id, title, description, quest_type, category, difficulty,
                                 xp_reward, skill_rewards, steps, due_date, linked_npc)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 1), $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quest>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.quest_type.as_str())
            .bind(input.category.map(|c| c.as_str()))
            .bind(input.difficulty)
            .bind(input.xp_reward)
            .bind(Json(&input.skill_rewards))
            .bind(Json(&steps))
            .bind(input.due_date)
            .bind(&input.linked_npc)
            .fetch_one(pool)
            .await
    }

    pub async fn find_for_owner(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Quest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quests WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Quest>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// A user's quests, newest first, optionally filtered by type and status.
    pub async fn list_for_owner(
        pool: &PgPool,
        user_id: DbId,
        quest_type: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<Quest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quests
             WHERE user_id = $1
               AND ($2::TEXT IS NULL OR quest_type = $2)
               AND ($3::TEXT IS NULL OR status = $3)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Quest>(&query)
            .bind(user_id)
            .bind(quest_type)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Update the descriptive fields. Only non-`None` fields are applied.
    ///
    /// `steps` is not written here; step edits go through
    /// [`QuestRepo::save_lifecycle`] so completion rules apply.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        user_id: DbId,
        input: &UpdateQuest,
    ) -> Result<Option<Quest>, sqlx::Error> {
        let query = format!(
            "UPDATE quests SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                quest_type = COALESCE($5, quest_type),
                category = COALESCE($6, category),
                difficulty = COALESCE($7, difficulty),
                xp_reward = COALESCE($8, xp_reward),
                skill_rewards = COALESCE($9, skill_rewards),
                due_date = COALESCE($10, due_date),
                linked_npc = COALESCE($11, linked_npc)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quest>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.quest_type.map(|t| t.as_str()))
            .bind(input.category.map(|c| c.as_str()))
            .bind(input.difficulty)
            .bind(input.xp_reward)
            .bind(input.skill_rewards.as_ref().map(Json))
            .bind(input.due_date)
            .bind(&input.linked_npc)
            .fetch_optional(conn)
            .await
    }

    /// Delete a quest. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quests WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load and row-lock one of the user's quests inside a transaction.
    ///
    /// Holding this lock is what makes completion one-shot: a concurrent
    /// caller blocks here until the first transaction commits, then sees
    /// the completed status.
    pub async fn lock_for_owner(
        conn: &mut PgConnection,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Quest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quests WHERE id = $1 AND user_id = $2 FOR UPDATE"
        );
        sqlx::query_as::<_, Quest>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(conn)
            .await
    }

    /// Persist the completion state produced by the lifecycle rules.
    pub async fn save_lifecycle(
        conn: &mut PgConnection,
        id: DbId,
        lifecycle: &QuestLifecycle,
    ) -> Result<Quest, sqlx::Error> {
        let query = format!(
            "UPDATE quests SET status = $2, progress = $3, completed_at = $4, steps = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quest>(&query)
            .bind(id)
            .bind(lifecycle.status.as_str())
            .bind(lifecycle.progress)
            .bind(lifecycle.completed_at)
            .bind(Json(&lifecycle.steps))
            .fetch_one(conn)
            .await
    }
}
