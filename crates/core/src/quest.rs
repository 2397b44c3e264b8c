//! Quest types and the completion lifecycle.
//!
//! A quest moves from `active` to `completed` exactly once. Completion is
//! reached either by setting progress to 100, by completing the last open
//! step, or by an explicit complete call; whichever fires first wins and
//! the others become no-ops.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::skill::MAX_XP_AWARD;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MIN_DIFFICULTY: i16 = 1;
pub const MAX_DIFFICULTY: i16 = 5;

/// Progress value of a finished quest.
pub const COMPLETE_PROGRESS: i16 = 100;

// ---------------------------------------------------------------------------
// Quest type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestType {
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "long-term")]
    LongTerm,
}

const VALID_QUEST_TYPES: &[&str] = &["daily", "weekly", "long-term"];

impl QuestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::LongTerm => "long-term",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "long-term" => Ok(Self::LongTerm),
            _ => Err(CoreError::Validation(format!(
                "Invalid quest type '{s}'. Must be one of: {}",
                VALID_QUEST_TYPES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Quest status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    Active,
    Completed,
    Failed,
}

const VALID_QUEST_STATUSES: &[&str] = &["active", "completed", "failed"];

impl QuestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(CoreError::Validation(format!(
                "Invalid quest status '{s}'. Must be one of: {}",
                VALID_QUEST_STATUSES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Rewards and steps
// ---------------------------------------------------------------------------

/// XP granted to one of the owner's skills when the quest completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillReward {
    pub skill_id: DbId,
    pub xp_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestStep {
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

/// Reject skill rewards whose XP amount is outside `1..=MAX_XP_AWARD`.
pub fn validate_skill_rewards(rewards: &[SkillReward]) -> Result<(), CoreError> {
    match rewards
        .iter()
        .find(|r| !(1..=MAX_XP_AWARD).contains(&r.xp_amount))
    {
        Some(bad) => Err(CoreError::Validation(format!(
            "Skill reward for skill {} must grant between 1 and {MAX_XP_AWARD} XP, got {}",
            bad.skill_id, bad.xp_amount
        ))),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// A progress change requested by the owner.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressUpdate {
    pub progress: Option<i16>,
    pub step_index: Option<usize>,
}

/// The mutable completion state of a quest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestLifecycle {
    pub status: QuestStatus,
    pub progress: i16,
    pub completed_at: Option<Timestamp>,
    pub steps: Vec<QuestStep>,
}

impl QuestLifecycle {
    /// Move an active quest to `completed`.
    ///
    /// Returns `true` only for the call that performs the transition. A
    /// quest that is not active is left untouched and `false` is returned,
    /// so callers can hang reward distribution off the return value.
    pub fn complete(&mut self, now: Timestamp) -> bool {
        if self.status != QuestStatus::Active {
            return false;
        }
        self.status = QuestStatus::Completed;
        self.progress = COMPLETE_PROGRESS;
        self.completed_at = Some(now);
        true
    }

    /// Apply a progress update, completing the quest when it reaches 100
    /// or when its last open step is checked off.
    ///
    /// Returns whether this update completed the quest. Updates on a quest
    /// that is no longer active are rejected with [`CoreError::Conflict`].
    pub fn apply(&mut self, update: &ProgressUpdate, now: Timestamp) -> Result<bool, CoreError> {
        if self.status != QuestStatus::Active {
            return Err(CoreError::Conflict(format!(
                "Quest is {} and can no longer be progressed",
                self.status.as_str()
            )));
        }
        if update.progress.is_none() && update.step_index.is_none() {
            return Err(CoreError::Validation(
                "Provide progress or step_index".to_string(),
            ));
        }
        if let Some(p) = update.progress {
            if !(0..=COMPLETE_PROGRESS).contains(&p) {
                return Err(CoreError::Validation(format!(
                    "progress must be between 0 and {COMPLETE_PROGRESS}, got {p}"
                )));
            }
        }
        if let Some(i) = update.step_index {
            if i >= self.steps.len() {
                return Err(CoreError::Validation(format!(
                    "step_index {i} is out of range (quest has {} steps)",
                    self.steps.len()
                )));
            }
        }

        let mut completed = false;

        if let Some(p) = update.progress {
            self.progress = p;
            if p == COMPLETE_PROGRESS {
                completed |= self.complete(now);
            }
        }

        if let Some(i) = update.step_index {
            self.steps[i].completed = true;
            if self.steps.iter().all(|s| s.completed) {
                completed |= self.complete(now);
            }
        }

        Ok(completed)
    }

    /// Replace the step list with `descriptions`.
    ///
    /// A new step keeps its checkmark when a completed step with the same
    /// description existed before; every other step starts open. If the
    /// edit leaves a non-empty list with every step done, the quest
    /// completes and `true` is returned. Edits on a quest that is no
    /// longer active are rejected with [`CoreError::Conflict`].
    pub fn edit_steps(
        &mut self,
        descriptions: Vec<String>,
        now: Timestamp,
    ) -> Result<bool, CoreError> {
        if self.status != QuestStatus::Active {
            return Err(CoreError::Conflict(format!(
                "Quest is {} and its steps can no longer be edited",
                self.status.as_str()
            )));
        }
        if let Some(i) = descriptions.iter().position(|d| d.trim().is_empty()) {
            return Err(CoreError::Validation(format!(
                "Step {i} needs a description"
            )));
        }

        let mut done: Vec<String> = self
            .steps
            .iter()
            .filter(|s| s.completed)
            .map(|s| s.description.clone())
            .collect();

        self.steps = descriptions
            .into_iter()
            .map(|description| {
                let completed = match done.iter().position(|d| *d == description) {
                    Some(i) => {
                        done.swap_remove(i);
                        true
                    }
                    None => false,
                };
                QuestStep {
                    description,
                    completed,
                }
            })
            .collect();

        let all_done = !self.steps.is_empty() && self.steps.iter().all(|s| s.completed);
        Ok(all_done && self.complete(now))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
