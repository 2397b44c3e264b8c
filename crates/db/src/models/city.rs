//! City, building, and NPC models and DTOs.

use nova_core::city::{Dialogue, Position};
use nova_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A row from the `cities` table. Each user has at most one.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct City {
    pub id: DbId,
    pub user_id: DbId,
    pub level: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `city_buildings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Building {
    pub id: DbId,
    pub city_id: DbId,
    #[serde(rename = "type")]
    pub building_type: String,
    pub name: String,
    pub level: i32,
    pub position_x: i32,
    pub position_y: i32,
    pub unlocked: bool,
    pub linked_skill_id: Option<DbId>,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `city_npcs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Npc {
    pub id: DbId,
    pub city_id: DbId,
    pub name: String,
    pub role: String,
    pub position_x: i32,
    pub position_y: i32,
    pub unlocked: bool,
    pub dialogues: Json<Vec<Dialogue>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A city with everything in it.
#[derive(Debug, Clone, Serialize)]
pub struct CityResponse {
    #[serde(flatten)]
    pub city: City,
    pub buildings: Vec<Building>,
    pub npcs: Vec<Npc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCity {
    #[validate(range(min = 1))]
    pub level: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBuilding {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub building_type: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 1))]
    pub level: Option<i32>,
    pub position: Position,
    #[serde(default)]
    pub unlocked: bool,
    pub linked_skill_id: Option<DbId>,
    pub description: Option<String>,
}

/// DTO for updating a building. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBuilding {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 1))]
    pub level: Option<i32>,
    pub position: Option<Position>,
    pub unlocked: Option<bool>,
    pub linked_skill_id: Option<DbId>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNpc {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub role: String,
    pub position: Position,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default)]
    pub dialogues: Vec<Dialogue>,
}
