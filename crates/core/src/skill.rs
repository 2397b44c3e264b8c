//! Skill categories and the XP/level engine.
//!
//! A skill levels up by accumulating XP. Each level `n` needs
//! `100 * n` XP to clear, so the step grows with the level and a large
//! award has to be rolled over one level at a time.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// XP needed per level; level `n` requires `XP_PER_LEVEL * n`.
pub const XP_PER_LEVEL: i64 = 100;

/// Level every new skill starts at.
pub const STARTING_LEVEL: i32 = 1;

/// Largest XP amount a single award may grant.
pub const MAX_XP_AWARD: i64 = 1_000_000;

/// Return the XP required to clear `level`.
pub fn required_xp_for_level(level: i32) -> i64 {
    XP_PER_LEVEL * i64::from(level)
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// The seven fixed development areas a skill can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    MentalStrength,
    Learning,
    PhysicalEnergy,
    SocialSkills,
    Creativity,
    Discipline,
    Wealth,
}

/// All valid category strings, in display order.
pub const VALID_CATEGORIES: &[&str] = &[
    "mental_strength",
    "learning",
    "physical_energy",
    "social_skills",
    "creativity",
    "discipline",
    "wealth",
];

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MentalStrength => "mental_strength",
            Self::Learning => "learning",
            Self::PhysicalEnergy => "physical_energy",
            Self::SocialSkills => "social_skills",
            Self::Creativity => "creativity",
            Self::Discipline => "discipline",
            Self::Wealth => "wealth",
        }
    }

    /// Parse a category from its wire name.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "mental_strength" => Ok(Self::MentalStrength),
            "learning" => Ok(Self::Learning),
            "physical_energy" => Ok(Self::PhysicalEnergy),
            "social_skills" => Ok(Self::SocialSkills),
            "creativity" => Ok(Self::Creativity),
            "discipline" => Ok(Self::Discipline),
            "wealth" => Ok(Self::Wealth),
            _ => Err(CoreError::Validation(format!(
                "Invalid skill category '{s}'. Must be one of: {}",
                VALID_CATEGORIES.join(", ")
            ))),
        }
    }

    /// Human-readable label shown in prompts and the city.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MentalStrength => "Mental Strength",
            Self::Learning => "Learning & Knowledge",
            Self::PhysicalEnergy => "Physical Energy",
            Self::SocialSkills => "Social Skills",
            Self::Creativity => "Creativity",
            Self::Discipline => "Discipline",
            Self::Wealth => "Wealth",
        }
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// The level-related state of a skill.
///
/// Invariant after any mutation through [`SkillProgress::add_xp`]:
/// `current_xp < required_xp` and `required_xp == 100 * level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillProgress {
    pub level: i32,
    pub current_xp: i64,
    pub required_xp: i64,
}

impl Default for SkillProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of adding XP to a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpGain {
    pub progress: SkillProgress,
    pub previous_level: i32,
    pub levels_gained: i32,
}

impl XpGain {
    /// Whether at least one level-up happened.
    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}

impl SkillProgress {
    /// A freshly created skill: level 1, no XP, 100 XP to the next level.
    pub fn new() -> Self {
        Self {
            level: STARTING_LEVEL,
            current_xp: 0,
            required_xp: required_xp_for_level(STARTING_LEVEL),
        }
    }

    /// Add `amount` XP and roll over as many levels as it covers.
    ///
    /// Returns the new progress without mutating `self`. Fails with
    /// [`CoreError::InvalidAmount`] when `amount` is outside
    /// `1..=MAX_XP_AWARD` or the new XP total would overflow.
    pub fn add_xp(&self, amount: i64) -> Result<XpGain, CoreError> {
        if !(1..=MAX_XP_AWARD).contains(&amount) {
            return Err(CoreError::InvalidAmount(amount));
        }

        let mut next = *self;
        next.current_xp = next
            .current_xp
            .checked_add(amount)
            .ok_or(CoreError::InvalidAmount(amount))?;

        // The requirement grows with each level, so this has to loop.
        while next.current_xp >= next.required_xp {
            next.current_xp -= next.required_xp;
            next.level += 1;
            next.required_xp = required_xp_for_level(next.level);
        }

        Ok(XpGain {
            progress: next,
            previous_level: self.level,
            levels_gained: next.level - self.level,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
