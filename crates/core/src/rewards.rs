//! Reward distribution for completed quests.
//!
//! Distribution is best-effort per skill: a reward pointing at a skill the
//! owner no longer has is skipped and reported, and the remaining rewards
//! are still applied.

use std::collections::HashMap;

use serde::Serialize;

use crate::quest::SkillReward;
use crate::skill::{SkillProgress, XpGain};
use crate::types::DbId;

/// A skill reward that was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillAward {
    pub skill_id: DbId,
    pub xp_amount: i64,
    pub gain: XpGain,
}

/// Why a skill reward was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    SkillNotFound,
    InvalidAmount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkippedReward {
    pub skill_id: DbId,
    pub reason: SkipReason,
}

/// Outcome of distributing a quest's rewards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardReport {
    /// XP to add to the owner's total.
    pub user_xp: i64,
    pub awarded: Vec<SkillAward>,
    pub skipped: Vec<SkippedReward>,
}

impl RewardReport {
    /// Ids of skills whose progress changed, in award order, without repeats.
    pub fn touched_skills(&self) -> Vec<DbId> {
        let mut ids: Vec<DbId> = Vec::with_capacity(self.awarded.len());
        for award in &self.awarded {
            if !ids.contains(&award.skill_id) {
                ids.push(award.skill_id);
            }
        }
        ids
    }
}

/// Apply `rewards` to the owner's `skills` in order.
///
/// `skills` holds the current progress of every skill the owner has among
/// the referenced ids; entries are updated in place, so two rewards for the
/// same skill stack. The quest's flat `xp_reward` is reported back for the
/// caller to add to the owner's total.
pub fn distribute_rewards(
    xp_reward: i64,
    rewards: &[SkillReward],
    skills: &mut HashMap<DbId, SkillProgress>,
) -> RewardReport {
    let mut report = RewardReport {
        user_xp: xp_reward,
        ..RewardReport::default()
    };

    for reward in rewards {
        let Some(progress) = skills.get_mut(&reward.skill_id) else {
            report.skipped.push(SkippedReward {
                skill_id: reward.skill_id,
                reason: SkipReason::SkillNotFound,
            });
            continue;
        };

        match progress.add_xp(reward.xp_amount) {
            Ok(gain) => {
                *progress = gain.progress;
                report.awarded.push(SkillAward {
                    skill_id: reward.skill_id,
                    xp_amount: reward.xp_amount,
                    gain,
                });
            }
            Err(_) => report.skipped.push(SkippedReward {
                skill_id: reward.skill_id,
                reason: SkipReason::InvalidAmount,
            }),
        }
    }

    report
}
