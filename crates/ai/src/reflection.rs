//! Reflection questions, answer analysis, and period summaries.
//!
//! Every operation resolves to a usable value: when the gateway falls back
//! or the model answers with something unusable, a fixed English fallback
//! is returned instead.

use chrono::NaiveDate;
use nova_core::reflection::{fallback_questions, QuestionAnswer, ReflectionType, SummaryPeriod};
use nova_core::skill::SkillCategory;
use nova_core::types::DbId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gateway::{AiGateway, CompletionOptions};
use crate::prompts::REFLECTION_SYSTEM_PROMPT;

/// Longest reflection excerpt sent to the model, in characters.
const DIGEST_CONTENT_CHARS: usize = 200;

const SPACE_THEME: &str = "In the NEBULA ODYSSEY universe the user is a spaceship captain \
    travelling between planets that stand for areas of life. The user earns XP by completing \
    quests and challenges. Planets in the system include the Planet of Mental Mastery, the \
    Productivity Planet, the Shadow Arena and the Wealth Galaxy.";

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SkillSnapshot {
    pub name: String,
    pub level: i32,
    pub category: SkillCategory,
}

/// What the model is told about the user when generating questions.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub username: String,
    pub level: i32,
    pub total_xp: i64,
    pub streak_days: i32,
    /// Highest-level skills first, at most five.
    pub top_skills: Vec<SkillSnapshot>,
    /// Moods of the most recent reflections, newest first.
    pub recent_moods: Vec<String>,
}

/// A reflection reduced to what a period summary needs.
#[derive(Debug, Clone, Serialize)]
pub struct ReflectionDigest {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub reflection_type: ReflectionType,
    pub mood: Option<String>,
    pub energy_level: Option<i16>,
    pub content: String,
    pub achievements: Vec<String>,
    pub challenges: Vec<String>,
    pub insights: Vec<String>,
}

impl ReflectionDigest {
    /// Shorten `content` to the excerpt length, marking a cut with `...`.
    pub fn excerpt(content: &str) -> String {
        let mut chars = content.chars();
        let head: String = chars.by_ref().take(DIGEST_CONTENT_CHARS).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

fn no_summary() -> String {
    "No summary available.".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionAnalysis {
    #[serde(default = "no_summary")]
    pub summary: String,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default, alias = "suggestedQuests")]
    pub suggested_quests: Vec<String>,
}

impl ReflectionAnalysis {
    pub fn fallback() -> Self {
        Self {
            summary: "Based on your answers you are actively working on your personal \
                      development."
                .into(),
            achievements: vec!["Progress in self-reflection".into()],
            challenges: vec!["Identifying challenges".into()],
            insights: vec!["Regular reflection is important for personal growth".into()],
            recommendations: vec!["Set yourself concrete goals for the coming week".into()],
            suggested_quests: vec![
                "Daily reflection quest: write down three good moments every evening".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionSummary {
    #[serde(default = "no_summary")]
    pub summary: String,
    #[serde(default)]
    pub trends: Vec<String>,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl ReflectionSummary {
    pub fn fallback(period: SummaryPeriod) -> Self {
        Self {
            summary: format!("Summary of your reflections for {}.", period.describe()),
            trends: vec!["Continuous self-reflection".into()],
            insights: vec!["Regular reflection supports your personal development".into()],
            recommendations: vec!["Keep up your regular reflections".into()],
        }
    }

    /// Summary for a period without any reflections.
    pub fn empty(period: SummaryPeriod) -> Self {
        Self {
            summary: format!("No reflections found for {}.", period.describe()),
            trends: Vec::new(),
            insights: Vec::new(),
            recommendations: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Reflection features on top of an [`AiGateway`].
pub struct ReflectionAi<'a> {
    gateway: &'a AiGateway,
}

impl<'a> ReflectionAi<'a> {
    pub fn new(gateway: &'a AiGateway) -> Self {
        Self { gateway }
    }

    /// Personalised questions for a reflection of `reflection_type`.
    ///
    /// Falls back to the static set for the type.
    pub async fn generate_questions(
        &self,
        user_id: DbId,
        reflection_type: Option<ReflectionType>,
        context: &UserContext,
    ) -> Vec<String> {
        let count = reflection_type.map_or(4, |t| t.question_count());
        let kind = reflection_type.map_or("general", |t| t.as_str());
        let skills = context
            .top_skills
            .iter()
            .map(|s| format!("{} (Level {}, {})", s.name, s.level, s.category.label()))
            .collect::<Vec<_>>()
            .join(", ");

        let prompt = format!(
            "Generate {count} personalised reflection questions for a {kind} reflection.\n\n\
             {SPACE_THEME}\n\n\
             User context:\n\
             - Name: {name}\n\
             - Level: {level}\n\
             - Total XP: {xp}\n\
             - Streak days: {streak}\n\
             - Top skills: {skills}\n\n\
             Recent moods: {moods}\n\n\
             The questions should:\n\
             1. Be deep and focused on personal growth\n\
             2. Weave in the space theme of the NEBULA ODYSSEY universe\n\
             3. Build on the user's context and earlier reflections\n\
             4. Encourage self-knowledge and development\n\n\
             Format the answer as a JSON object with a \"questions\" array of strings.",
            name = context.username,
            level = context.level,
            xp = context.total_xp,
            streak = context.streak_days,
            moods = context.recent_moods.join(", "),
        );

        let fallback = fallback_questions(reflection_type);
        let options = CompletionOptions {
            system_prompt: Some(REFLECTION_SYSTEM_PROMPT.into()),
            temperature: Some(0.8),
            max_tokens: Some(800),
            fallback_object: Some(serde_json::json!({ "questions": fallback })),
            ..CompletionOptions::default()
        };

        let value = self
            .gateway
            .generate_structured_response(user_id, &prompt, &options)
            .await;

        match questions_from(&value) {
            Some(questions) => questions,
            None => {
                tracing::warn!(user_id, "AI returned no usable reflection questions");
                fallback
            }
        }
    }

    /// Analyse the answers to a reflection's questions.
    pub async fn analyze_responses(
        &self,
        user_id: DbId,
        reflection_type: ReflectionType,
        answers: &[QuestionAnswer],
    ) -> ReflectionAnalysis {
        let transcript = answers
            .iter()
            .map(|qa| {
                let answer = if qa.answer.trim().is_empty() {
                    "No answer"
                } else {
                    qa.answer.as_str()
                };
                format!("Question: {}\nAnswer: {answer}", qa.question)
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = format!(
            "Analyse the following reflection answers of a user in the NEBULA ODYSSEY universe:\n\n\
             Reflection type: {kind}\n\n\
             {transcript}\n\n\
             Please provide an in-depth analysis with:\n\
             1. A summary of the main points\n\
             2. Achievements and progress\n\
             3. Challenges and obstacles\n\
             4. Key insights\n\
             5. Recommendations for next steps\n\
             6. Suggested quests or missions in the NEBULA ODYSSEY universe\n\n\
             Format the answer as a JSON object with the fields: summary, achievements, \
             challenges, insights, recommendations, suggested_quests.",
            kind = reflection_type.as_str(),
        );

        let fallback = ReflectionAnalysis::fallback();
        let options = CompletionOptions {
            system_prompt: Some(REFLECTION_SYSTEM_PROMPT.into()),
            temperature: Some(0.7),
            max_tokens: Some(1000),
            fallback_object: serde_json::to_value(&fallback).ok(),
            ..CompletionOptions::default()
        };

        let value = self
            .gateway
            .generate_structured_response(user_id, &prompt, &options)
            .await;

        serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::warn!(user_id, error = %e, "AI reflection analysis had an unexpected shape");
            fallback
        })
    }

    /// Summarise the reflections written during `period`.
    ///
    /// An empty period is answered without calling the model.
    pub async fn generate_summary(
        &self,
        user_id: DbId,
        period: SummaryPeriod,
        reflections: &[ReflectionDigest],
    ) -> ReflectionSummary {
        if reflections.is_empty() {
            return ReflectionSummary::empty(period);
        }

        let data = serde_json::to_string_pretty(reflections).unwrap_or_default();
        let prompt = format!(
            "Summarise the following reflections of a user in the NEBULA ODYSSEY universe for \
             {span}:\n\n\
             {data}\n\n\
             Please provide an in-depth analysis with:\n\
             1. A summary of the main developments\n\
             2. Trends and patterns\n\
             3. Key insights\n\
             4. Recommendations for the journey ahead in the NEBULA ODYSSEY universe\n\n\
             Format the answer as a JSON object with the fields: summary, trends, insights, \
             recommendations.",
            span = period.describe(),
        );

        let fallback = ReflectionSummary::fallback(period);
        let options = CompletionOptions {
            system_prompt: Some(REFLECTION_SYSTEM_PROMPT.into()),
            temperature: Some(0.7),
            max_tokens: Some(1200),
            fallback_object: serde_json::to_value(&fallback).ok(),
            ..CompletionOptions::default()
        };

        let value = self
            .gateway
            .generate_structured_response(user_id, &prompt, &options)
            .await;

        serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::warn!(user_id, error = %e, "AI reflection summary had an unexpected shape");
            fallback
        })
    }
}

/// Accept `{"questions": [...]}` or a bare array of strings.
fn questions_from(value: &Value) -> Option<Vec<String>> {
    let list = match value {
        Value::Array(items) => items,
        Value::Object(map) => map.get("questions")?.as_array()?,
        _ => return None,
    };
    let questions: Vec<String> = list
        .iter()
        .filter_map(|q| q.as_str())
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(String::from)
        .collect();
    (!questions.is_empty()).then_some(questions)
}
