//! User entity model and DTOs.

use nova_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub goals: Vec<String>,
    pub theme: String,
    pub notifications: bool,
    pub privacy_settings: serde_json::Value,
    pub level: i32,
    pub total_xp: i64,
    pub streak_days: i32,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub goals: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSettings {
    pub theme: String,
    pub notifications: bool,
    pub privacy_settings: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserStats {
    pub level: i32,
    pub total_xp: i64,
    pub streak_days: i32,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub profile: UserProfile,
    pub settings: UserSettings,
    pub stats: UserStats,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            profile: UserProfile {
                display_name: user.display_name,
                avatar: user.avatar,
                bio: user.bio,
                goals: user.goals,
            },
            settings: UserSettings {
                theme: user.theme,
                notifications: user.notifications,
                privacy_settings: user.privacy_settings,
            },
            stats: UserStats {
                level: user.level,
                total_xp: user.total_xp,
                streak_days: user.streak_days,
            },
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. The email is stored lower-cased.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 50))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    pub goals: Option<Vec<String>>,
    pub theme: Option<String>,
    pub notifications: Option<bool>,
    pub privacy_settings: Option<serde_json::Value>,
}
