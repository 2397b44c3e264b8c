//! Quest entity model and DTOs.

use nova_core::error::CoreError;
use nova_core::quest::{
    QuestLifecycle, QuestStatus, QuestStep, QuestType, SkillReward, MAX_DIFFICULTY,
    MIN_DIFFICULTY,
};
use nova_core::skill::{SkillCategory, MAX_XP_AWARD};
use nova_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A row from the `quests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quest {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    /// Wire name of a [`QuestType`].
    #[serde(rename = "type")]
    pub quest_type: String,
    pub category: Option<String>,
    pub difficulty: i16,
    /// Wire name of a [`QuestStatus`].
    pub status: String,
    pub progress: i16,
    pub xp_reward: i64,
    pub skill_rewards: Json<Vec<SkillReward>>,
    pub steps: Json<Vec<QuestStep>>,
    pub start_date: Timestamp,
    pub due_date: Option<Timestamp>,
    pub linked_npc: Option<String>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Quest {
    pub fn status(&self) -> Result<QuestStatus, CoreError> {
        QuestStatus::from_str(&self.status)
    }

    /// The completion state the lifecycle rules operate on.
    pub fn lifecycle(&self) -> Result<QuestLifecycle, CoreError> {
        Ok(QuestLifecycle {
            status: self.status()?,
            progress: self.progress,
            completed_at: self.completed_at,
            steps: self.steps.0.clone(),
        })
    }
}

/// DTO for creating a new quest. Quests start active with zero progress.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub quest_type: QuestType,
    pub category: Option<SkillCategory>,
    /// Defaults to 1 if omitted.
    #[validate(range(min = MIN_DIFFICULTY, max = MAX_DIFFICULTY))]
    pub difficulty: Option<i16>,
    #[validate(range(min = 1, max = MAX_XP_AWARD))]
    pub xp_reward: i64,
    #[serde(default)]
    pub skill_rewards: Vec<SkillReward>,
    /// Every step starts open.
    #[serde(default)]
    pub steps: Vec<QuestStepEdit>,
    pub due_date: Option<Timestamp>,
    pub linked_npc: Option<String>,
}

/// A step as sent by the owner. Only the description is accepted; whether
/// a step is done moves through the progress operation.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestStepEdit {
    pub description: String,
}

impl QuestStepEdit {
    pub fn open_step(&self) -> QuestStep {
        QuestStep {
            description: self.description.clone(),
            completed: false,
        }
    }
}

/// DTO for updating an existing quest. All fields are optional.
///
/// Status and progress are not editable here; they move through the
/// progress and complete operations only. `steps` replaces the step list
/// and is only accepted while the quest is active.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub quest_type: Option<QuestType>,
    pub category: Option<SkillCategory>,
    #[validate(range(min = MIN_DIFFICULTY, max = MAX_DIFFICULTY))]
    pub difficulty: Option<i16>,
    #[validate(range(min = 1, max = MAX_XP_AWARD))]
    pub xp_reward: Option<i64>,
    pub skill_rewards: Option<Vec<SkillReward>>,
    pub steps: Option<Vec<QuestStepEdit>>,
    pub due_date: Option<Timestamp>,
    pub linked_npc: Option<String>,
}
