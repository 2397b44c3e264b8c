//! Skill XP awards and quest completion.
//!
//! A quest's rewards are paid by whichever call moves it from `active` to
//! `completed`. The quest row is locked with `FOR UPDATE` before its status
//! is read, so two concurrent completions serialize and the second one
//! sees `completed` and pays nothing.

use std::collections::HashMap;

use chrono::Utc;
use nova_core::error::CoreError;
use nova_core::quest::{ProgressUpdate, QuestLifecycle};
use nova_core::rewards::{distribute_rewards, RewardReport, SkippedReward};
use nova_core::skill::MAX_XP_AWARD;
use nova_core::types::DbId;
use nova_db::models::quest::{Quest, UpdateQuest};
use nova_db::models::skill::Skill;
use nova_db::repositories::{QuestRepo, SkillRepo, UserRepo};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use crate::error::AppResult;

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Result of a direct XP award to one skill.
#[derive(Debug, Serialize)]
pub struct SkillXpOutcome {
    pub skill: Skill,
    pub level_up: bool,
    pub old_level: i32,
    pub new_level: i32,
}

/// One skill reward that was paid out.
#[derive(Debug, Serialize)]
pub struct AwardedSkill {
    pub skill_id: DbId,
    pub xp_amount: i64,
    pub old_level: i32,
    pub new_level: i32,
    pub level_up: bool,
}

/// What a completing quest paid out.
#[derive(Debug, Serialize)]
pub struct RewardSummary {
    pub user_xp: i64,
    pub skills: Vec<AwardedSkill>,
    pub skipped: Vec<SkippedReward>,
}

impl From<&RewardReport> for RewardSummary {
    fn from(report: &RewardReport) -> Self {
        Self {
            user_xp: report.user_xp,
            skills: report
                .awarded
                .iter()
                .map(|award| AwardedSkill {
                    skill_id: award.skill_id,
                    xp_amount: award.xp_amount,
                    old_level: award.gain.previous_level,
                    new_level: award.gain.progress.level,
                    level_up: award.gain.leveled_up(),
                })
                .collect(),
            skipped: report.skipped.clone(),
        }
    }
}

/// Result of a progress update or completion request.
#[derive(Debug, Serialize)]
pub struct QuestOutcome {
    pub quest: Quest,
    /// `true` only for the request that moved the quest to `completed`.
    pub completed_now: bool,
    /// Present exactly when `completed_now` is.
    pub rewards: Option<RewardSummary>,
}

// ---------------------------------------------------------------------------
// Skill XP
// ---------------------------------------------------------------------------

/// Add `amount` XP to one of the user's skills.
///
/// When the award levels the skill up, the same amount is also added to the
/// user's total XP.
pub async fn award_skill_xp(
    pool: &PgPool,
    user_id: DbId,
    skill_id: DbId,
    amount: i64,
) -> AppResult<SkillXpOutcome> {
    if !(1..=MAX_XP_AWARD).contains(&amount) {
        return Err(CoreError::InvalidAmount(amount).into());
    }

    let mut tx = pool.begin().await?;

    let skill = SkillRepo::lock_for_owner(&mut *tx, skill_id, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Skill",
            id: skill_id,
        })?;

    let gain = skill.progress().add_xp(amount)?;
    let saved = SkillRepo::save_progress(&mut *tx, skill.id, &gain.progress).await?;

    if gain.leveled_up() {
        UserRepo::add_total_xp(&mut *tx, user_id, amount).await?;
    }

    tx.commit().await?;

    tracing::info!(
        user_id,
        skill_id,
        amount,
        old_level = gain.previous_level,
        new_level = saved.level,
        "Skill XP awarded",
    );

    Ok(SkillXpOutcome {
        skill: saved,
        level_up: gain.leveled_up(),
        old_level: gain.previous_level,
        new_level: gain.progress.level,
    })
}

// ---------------------------------------------------------------------------
// Quests
// ---------------------------------------------------------------------------

/// Complete one of the user's quests and pay its rewards.
///
/// Completing a quest that is no longer active changes nothing and pays
/// nothing; the response then has `completed_now == false`.
pub async fn complete_quest(
    pool: &PgPool,
    user_id: DbId,
    quest_id: DbId,
) -> AppResult<QuestOutcome> {
    let mut tx = pool.begin().await?;
    let quest = lock_quest(&mut *tx, user_id, quest_id).await?;

    let mut lifecycle = quest.lifecycle()?;
    if !lifecycle.complete(Utc::now()) {
        tx.commit().await?;
        tracing::debug!(user_id, quest_id, status = %quest.status, "Quest already closed");
        return Ok(QuestOutcome {
            quest,
            completed_now: false,
            rewards: None,
        });
    }

    let outcome = persist(&mut *tx, user_id, &quest, &lifecycle, true).await?;
    tx.commit().await?;
    Ok(outcome)
}

/// Apply a progress update to one of the user's quests.
///
/// Reaching 100 % or checking off the last open step completes the quest
/// and pays its rewards.
pub async fn update_quest_progress(
    pool: &PgPool,
    user_id: DbId,
    quest_id: DbId,
    update: &ProgressUpdate,
) -> AppResult<QuestOutcome> {
    let mut tx = pool.begin().await?;
    let quest = lock_quest(&mut *tx, user_id, quest_id).await?;

    let mut lifecycle = quest.lifecycle()?;
    let completed_now = lifecycle.apply(update, Utc::now())?;

    let outcome = persist(&mut *tx, user_id, &quest, &lifecycle, completed_now).await?;
    tx.commit().await?;
    Ok(outcome)
}

/// Update the owner-editable fields of a quest.
///
/// A new step list replaces the old one; steps whose description is kept
/// stay checked off. Steps can only be edited while the quest is active,
/// and an edit that leaves every step done completes the quest and pays
/// its rewards.
pub async fn update_quest(
    pool: &PgPool,
    user_id: DbId,
    quest_id: DbId,
    input: &UpdateQuest,
) -> AppResult<QuestOutcome> {
    let mut tx = pool.begin().await?;
    lock_quest(&mut *tx, user_id, quest_id).await?;

    let quest = QuestRepo::update(&mut *tx, quest_id, user_id, input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Quest",
            id: quest_id,
        })?;

    let Some(steps) = &input.steps else {
        tx.commit().await?;
        return Ok(QuestOutcome {
            quest,
            completed_now: false,
            rewards: None,
        });
    };

    let mut lifecycle = quest.lifecycle()?;
    let descriptions = steps.iter().map(|step| step.description.clone()).collect();
    let completed_now = lifecycle.edit_steps(descriptions, Utc::now())?;

    let outcome = persist(&mut *tx, user_id, &quest, &lifecycle, completed_now).await?;
    tx.commit().await?;
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn lock_quest(conn: &mut PgConnection, user_id: DbId, quest_id: DbId) -> AppResult<Quest> {
    let quest = QuestRepo::lock_for_owner(conn, quest_id, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Quest",
            id: quest_id,
        })?;
    Ok(quest)
}

/// Save the new lifecycle state and, when the quest just completed, pay out.
async fn persist(
    conn: &mut PgConnection,
    user_id: DbId,
    quest: &Quest,
    lifecycle: &QuestLifecycle,
    completed_now: bool,
) -> AppResult<QuestOutcome> {
    let saved = QuestRepo::save_lifecycle(&mut *conn, quest.id, lifecycle).await?;

    let rewards = if completed_now {
        let report = pay_rewards(&mut *conn, user_id, quest).await?;
        tracing::info!(
            user_id,
            quest_id = quest.id,
            user_xp = report.user_xp,
            skills_awarded = report.awarded.len(),
            skills_skipped = report.skipped.len(),
            "Quest completed",
        );
        Some(RewardSummary::from(&report))
    } else {
        None
    };

    Ok(QuestOutcome {
        quest: saved,
        completed_now,
        rewards,
    })
}

/// Lock the rewarded skills, distribute XP over them, and persist the result.
async fn pay_rewards(
    conn: &mut PgConnection,
    user_id: DbId,
    quest: &Quest,
) -> AppResult<RewardReport> {
    let rewards = &quest.skill_rewards.0;
    let ids: Vec<DbId> = rewards.iter().map(|r| r.skill_id).collect();

    let mut skills: HashMap<DbId, _> = SkillRepo::lock_many(&mut *conn, user_id, &ids)
        .await?
        .into_iter()
        .map(|skill| (skill.id, skill.progress()))
        .collect();

    let report = distribute_rewards(quest.xp_reward, rewards, &mut skills);

    for skipped in &report.skipped {
        tracing::warn!(
            user_id,
            quest_id = quest.id,
            skill_id = skipped.skill_id,
            reason = ?skipped.reason,
            "Skipping skill reward",
        );
    }

    for skill_id in report.touched_skills() {
        if let Some(progress) = skills.get(&skill_id) {
            SkillRepo::save_progress(&mut *conn, skill_id, progress).await?;
        }
    }

    UserRepo::add_total_xp(&mut *conn, user_id, report.user_xp).await?;

    Ok(report)
}
