//! Repository for the `cities`, `city_buildings`, and `city_npcs` tables.

use nova_core::city::{DEFAULT_BUILDINGS, DEFAULT_NPCS, STARTING_CITY_LEVEL};
use nova_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::models::city::{Building, City, CreateBuilding, CreateNpc, Npc, UpdateBuilding};

const CITY_COLUMNS: &str = "id, user_id, level, created_at, updated_at";

const BUILDING_COLUMNS: &str = "id, city_id, building_type, name, level, position_x, position_y, \
                                unlocked, linked_skill_id, description, created_at, updated_at";

const NPC_COLUMNS: &str = "id, city_id, name, role, position_x, position_y, unlocked, dialogues, \
                           created_at, updated_at";

/// City persistence. A user owns at most one city.
pub struct CityRepo;

impl CityRepo {
    pub async fn find_by_user(pool: &PgPool, user_id: DbId) -> Result<Option<City>, sqlx::Error> {
        let query = format!("SELECT {CITY_COLUMNS} FROM cities WHERE user_id = $1");
        sqlx::query_as::<_, City>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Return the user's city, creating the default layout on first access.
    ///
    /// Concurrent first accesses are safe: only the transaction that
    /// inserts the city row seeds buildings and NPCs.
    pub async fn get_or_create(pool: &PgPool, user_id: DbId) -> Result<City, sqlx::Error> {
        if let Some(city) = Self::find_by_user(pool, user_id).await? {
            return Ok(city);
        }

        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO cities (user_id, level) VALUES ($1, $2)
             ON CONFLICT (user_id) DO NOTHING
             RETURNING {CITY_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, City>(&query)
            .bind(user_id)
            .bind(STARTING_CITY_LEVEL)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(city) = inserted else {
            tx.rollback().await?;
            let query = format!("SELECT {CITY_COLUMNS} FROM cities WHERE user_id = $1");
            return sqlx::query_as::<_, City>(&query)
                .bind(user_id)
                .fetch_one(pool)
                .await;
        };

        Self::seed_defaults(&mut *tx, city.id).await?;
        tx.commit().await?;

        tracing::info!(user_id, city_id = city.id, "Created default city");
        Ok(city)
    }

    async fn seed_defaults(conn: &mut PgConnection, city_id: DbId) -> Result<(), sqlx::Error> {
        for building in DEFAULT_BUILDINGS {
            sqlx::query(
                "INSERT INTO city_buildings
                    (city_id, building_type, name, position_x, position_y, unlocked, description)
                 VALUES ($1, $2, $3, $4, $5, TRUE, $6)",
            )
            .bind(city_id)
            .bind(building.building_type)
            .bind(building.name)
            .bind(building.position.x)
            .bind(building.position.y)
            .bind(building.description)
            .execute(&mut *conn)
            .await?;
        }

        for npc in DEFAULT_NPCS {
            sqlx::query(
                "INSERT INTO city_npcs (city_id, name, role, position_x, position_y, unlocked, dialogues)
                 VALUES ($1, $2, $3, $4, $5, TRUE, $6)",
            )
            .bind(city_id)
            .bind(npc.name)
            .bind(npc.role)
            .bind(npc.position.x)
            .bind(npc.position.y)
            .bind(Json(npc.dialogues()))
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    pub async fn update_level(
        pool: &PgPool,
        city_id: DbId,
        level: i32,
    ) -> Result<City, sqlx::Error> {
        let query = format!("UPDATE cities SET level = $2 WHERE id = $1 RETURNING {CITY_COLUMNS}");
        sqlx::query_as::<_, City>(&query)
            .bind(city_id)
            .bind(level)
            .fetch_one(pool)
            .await
    }

    // ---- buildings ----

    pub async fn list_buildings(pool: &PgPool, city_id: DbId) -> Result<Vec<Building>, sqlx::Error> {
        let query = format!(
            "SELECT {BUILDING_COLUMNS} FROM city_buildings WHERE city_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, Building>(&query)
            .bind(city_id)
            .fetch_all(pool)
            .await
    }

    pub async fn add_building(
        pool: &PgPool,
        city_id: DbId,
        input: &CreateBuilding,
    ) -> Result<Building, sqlx::Error> {
        let query = format!(
            "INSERT INTO city_buildings (city_id, building_type, name, level, position_x,
                                         position_y, unlocked, linked_skill_id, description)
             VALUES ($1, $2, $3, COALESCE($4, 1), $5, $6, $7, $8, $9)
             RETURNING {BUILDING_COLUMNS}"
        );
        sqlx::query_as::<_, Building>(&query)
            .bind(city_id)
            .bind(&input.building_type)
            .bind(&input.name)
            .bind(input.level)
            .bind(input.position.x)
            .bind(input.position.y)
            .bind(input.unlocked)
            .bind(input.linked_skill_id)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Update a building in the given city. Only non-`None` fields are applied.
    pub async fn update_building(
        pool: &PgPool,
        city_id: DbId,
        building_id: DbId,
        input: &UpdateBuilding,
    ) -> Result<Option<Building>, sqlx::Error> {
        let query = format!(
            "UPDATE city_buildings SET
                name = COALESCE($3, name),
                level = COALESCE($4, level),
                position_x = COALESCE($5, position_x),
                position_y = COALESCE($6, position_y),
                unlocked = COALESCE($7, unlocked),
                linked_skill_id = COALESCE($8, linked_skill_id),
                description = COALESCE($9, description)
             WHERE id = $1 AND city_id = $2
             RETURNING {BUILDING_COLUMNS}"
        );
        sqlx::query_as::<_, Building>(&query)
            .bind(building_id)
            .bind(city_id)
            .bind(&input.name)
            .bind(input.level)
            .bind(input.position.map(|p| p.x))
            .bind(input.position.map(|p| p.y))
            .bind(input.unlocked)
            .bind(input.linked_skill_id)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    // ---- npcs ----

    pub async fn list_npcs(pool: &PgPool, city_id: DbId) -> Result<Vec<Npc>, sqlx::Error> {
        let query = format!("SELECT {NPC_COLUMNS} FROM city_npcs WHERE city_id = $1 ORDER BY id");
        sqlx::query_as::<_, Npc>(&query)
            .bind(city_id)
            .fetch_all(pool)
            .await
    }

    pub async fn add_npc(
        pool: &PgPool,
        city_id: DbId,
        input: &CreateNpc,
    ) -> Result<Npc, sqlx::Error> {
        let query = format!(
            "INSERT INTO city_npcs (city_id, name, role, position_x, position_y, unlocked, dialogues)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {NPC_COLUMNS}"
        );
        sqlx::query_as::<_, Npc>(&query)
            .bind(city_id)
            .bind(&input.name)
            .bind(&input.role)
            .bind(input.position.x)
            .bind(input.position.y)
            .bind(input.unlocked)
            .bind(Json(&input.dialogues))
            .fetch_one(pool)
            .await
    }
}
