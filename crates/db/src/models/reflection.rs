//! Reflection entity model and DTOs.

use nova_core::reflection::{QuestionAnswer, ReflectionGoal, ReflectionType};
use nova_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A row from the `reflections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reflection {
    pub id: DbId,
    pub user_id: DbId,
    #[serde(rename = "type")]
    pub reflection_type: String,
    pub reflection_date: Timestamp,
    pub content: String,
    pub mood: Option<String>,
    pub energy_level: Option<i16>,
    pub questions: Json<Vec<QuestionAnswer>>,
    pub achievements: Vec<String>,
    pub challenges: Vec<String>,
    pub insights: Vec<String>,
    pub goals: Json<Vec<ReflectionGoal>>,
    /// Last AI analysis of the answers, if one was requested.
    pub ai_analysis: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new reflection.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReflection {
    #[serde(rename = "type")]
    pub reflection_type: ReflectionType,
    /// Defaults to now.
    pub reflection_date: Option<Timestamp>,
    #[serde(default)]
    pub content: String,
    pub mood: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub energy_level: Option<i16>,
    #[serde(default)]
    pub questions: Vec<QuestionAnswer>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub goals: Vec<ReflectionGoal>,
}

/// DTO for updating an existing reflection. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateReflection {
    #[serde(rename = "type")]
    pub reflection_type: Option<ReflectionType>,
    pub content: Option<String>,
    pub mood: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub energy_level: Option<i16>,
    pub questions: Option<Vec<QuestionAnswer>>,
    pub achievements: Option<Vec<String>>,
    pub challenges: Option<Vec<String>>,
    pub insights: Option<Vec<String>>,
    pub goals: Option<Vec<ReflectionGoal>>,
}
