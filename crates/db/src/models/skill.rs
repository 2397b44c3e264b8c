//! Skill entity model and DTOs.

use nova_core::skill::{SkillCategory, SkillProgress, MAX_XP_AWARD};
use nova_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `skills` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Skill {
    pub id: DbId,
    pub user_id: DbId,
    /// Wire name of a [`SkillCategory`].
    pub category: String,
    pub name: String,
    pub description: Option<String>,
    pub level: i32,
    pub current_xp: i64,
    pub required_xp: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Skill {
    /// The level state the XP engine operates on.
    pub fn progress(&self) -> SkillProgress {
        SkillProgress {
            level: self.level,
            current_xp: self.current_xp,
            required_xp: self.required_xp,
        }
    }
}

/// DTO for creating a new skill. New skills start at level 1 with no XP.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSkill {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub category: SkillCategory,
    pub description: Option<String>,
}

/// DTO for updating an existing skill. Level and XP only change through
/// XP awards.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSkill {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub category: Option<SkillCategory>,
    pub description: Option<String>,
}

/// Request body for a direct XP award.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddXp {
    #[validate(range(min = 1, max = MAX_XP_AWARD))]
    pub amount: i64,
}
