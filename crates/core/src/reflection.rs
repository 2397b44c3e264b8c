//! Reflection types, summary periods, and the static question sets used
//! whenever generated questions are unavailable.

use chrono::{Duration, Months};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Reflection type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflectionType {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

const VALID_REFLECTION_TYPES: &[&str] = &["daily", "weekly", "monthly", "yearly"];

impl ReflectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(CoreError::Validation(format!(
                "Invalid reflection type '{s}'. Must be one of: {}",
                VALID_REFLECTION_TYPES.join(", ")
            ))),
        }
    }

    /// How many questions a generated question set should contain.
    pub fn question_count(&self) -> usize {
        match self {
            Self::Daily => 5,
            Self::Weekly => 7,
            Self::Monthly | Self::Yearly => 4,
        }
    }
}

// ---------------------------------------------------------------------------
// Static question sets
// ---------------------------------------------------------------------------

pub const DAILY_QUESTIONS: &[&str] = &[
    "What was your biggest win today?",
    "Which challenges did you overcome today?",
    "What did you learn today?",
    "How were your energy and mood today?",
    "What do you want to accomplish tomorrow?",
];

pub const WEEKLY_QUESTIONS: &[&str] = &[
    "What were your most important wins this week?",
    "What progress did you make toward your goals?",
    "Which challenges came up and how did you handle them?",
    "What did you learn about yourself this week?",
    "How was your work-life balance this week?",
    "What would you like to do differently next week?",
];

pub const MONTHLY_QUESTIONS: &[&str] = &[
    "Which milestones did you reach this month?",
    "How did your skills develop this month?",
    "Which patterns or habits did you notice in yourself?",
    "What motivated you most this month?",
    "Which goals are you setting for the coming month?",
];

pub const GENERAL_QUESTIONS: &[&str] = &[
    "What is on your mind the most right now?",
    "What progress do you notice in your development?",
    "Which challenges lie ahead of you?",
    "What gives you energy and motivation?",
];

/// The static question set for a reflection type.
///
/// Types without a dedicated set get the general questions.
pub fn fallback_questions(reflection_type: Option<ReflectionType>) -> Vec<String> {
    let set = match reflection_type {
        Some(ReflectionType::Daily) => DAILY_QUESTIONS,
        Some(ReflectionType::Weekly) => WEEKLY_QUESTIONS,
        Some(ReflectionType::Monthly) => MONTHLY_QUESTIONS,
        Some(ReflectionType::Yearly) | None => GENERAL_QUESTIONS,
    };
    set.iter().map(|q| q.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Summary period
// ---------------------------------------------------------------------------

/// Time span covered by a reflection summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryPeriod {
    #[default]
    Week,
    Month,
    Year,
}

impl SummaryPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Parse a period name; anything unrecognised means a week.
    pub fn parse_or_default(s: Option<&str>) -> Self {
        match s {
            Some("month") => Self::Month,
            Some("year") => Self::Year,
            _ => Self::Week,
        }
    }

    /// First instant included in the period ending at `now`.
    pub fn start(&self, now: Timestamp) -> Timestamp {
        match self {
            Self::Week => now - Duration::days(7),
            Self::Month => now.checked_sub_months(Months::new(1)).unwrap_or(now),
            Self::Year => now.checked_sub_months(Months::new(12)).unwrap_or(now),
        }
    }

    /// "the last week", "the last month", "the last year".
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Week => "the last week",
            Self::Month => "the last month",
            Self::Year => "the last year",
        }
    }
}

// ---------------------------------------------------------------------------
// Structured parts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionGoal {
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn fallback_sets_match_type() {
        assert_eq!(fallback_questions(Some(ReflectionType::Daily)).len(), 5);
        assert_eq!(fallback_questions(Some(ReflectionType::Weekly)).len(), 6);
        assert_eq!(fallback_questions(Some(ReflectionType::Monthly)).len(), 5);
        assert_eq!(
            fallback_questions(Some(ReflectionType::Yearly)),
            fallback_questions(None)
        );
    }

    #[test]
    fn question_counts_per_type() {
        assert_eq!(ReflectionType::Daily.question_count(), 5);
        assert_eq!(ReflectionType::Weekly.question_count(), 7);
        assert_eq!(ReflectionType::Monthly.question_count(), 4);
    }

    #[test]
    fn unknown_period_defaults_to_week() {
        assert_eq!(SummaryPeriod::parse_or_default(Some("decade")), SummaryPeriod::Week);
        assert_eq!(SummaryPeriod::parse_or_default(None), SummaryPeriod::Week);
        assert_eq!(SummaryPeriod::parse_or_default(Some("year")), SummaryPeriod::Year);
    }

    #[test]
    fn period_start_dates() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        assert_eq!(
            SummaryPeriod::Week.start(now),
            Utc.with_ymd_and_hms(2024, 3, 24, 12, 0, 0).unwrap()
        );
        // Clamped to the end of February.
        assert_eq!(
            SummaryPeriod::Month.start(now),
            Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap()
        );
        assert_eq!(
            SummaryPeriod::Year.start(now),
            Utc.with_ymd_and_hms(2023, 3, 31, 12, 0, 0).unwrap()
        );
    }
}
