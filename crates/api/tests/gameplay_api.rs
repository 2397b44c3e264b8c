//! HTTP-level tests for skills, quests, reflections, and the city.
//!
//! Requests rejected before they reach the database run against a lazy
//! pool. Everything else needs PostgreSQL and is ignored by default.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json, post_json_auth, put_json_auth};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Register a fresh user and return its bearer token.
async fn signup(pool: &PgPool, username: &str) -> String {
    let body = json!({
        "username": username,
        "email": format!("{username}@nova.test"),
        "password": "to-the-stars",
    });
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/register",
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_skill(pool: &PgPool, token: &str, name: &str) -> i64 {
    let body = json!({ "name": name, "category": "discipline" });
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/skills",
        body,
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn create_quest(pool: &PgPool, token: &str, body: Value) -> Value {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/quests",
        body,
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn profile_total_xp(pool: &PgPool, token: &str) -> i64 {
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/profile",
        token,
    )
    .await;
    body_json(response).await["data"]["stats"]["total_xp"]
        .as_i64()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Input rejection (no database)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn zero_xp_award_is_rejected() {
    let app = common::build_test_app(common::lazy_pool());
    let token = common::token_for(1);
    let response = post_json_auth(app, "/api/v1/skills/7/xp", json!({ "amount": 0 }), &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn oversized_xp_award_is_rejected() {
    let app = common::build_test_app(common::lazy_pool());
    let token = common::token_for(1);
    let body = json!({ "amount": i64::MAX });
    let response = post_json_auth(app, "/api/v1/skills/7/xp", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn quest_with_oversized_skill_reward_is_rejected() {
    let app = common::build_test_app(common::lazy_pool());
    let token = common::token_for(1);
    let body = json!({
        "title": "Lift the moon",
        "type": "daily",
        "xp_reward": 20,
        "skill_rewards": [{ "skill_id": 3, "xp_amount": i64::MAX }],
    });
    let response = post_json_auth(app, "/api/v1/quests", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_quest_type_filter_is_rejected() {
    let app = common::build_test_app(common::lazy_pool());
    let token = common::token_for(1);
    let response = get_auth(app, "/api/v1/quests?type=monthly", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn quest_with_non_positive_skill_reward_is_rejected() {
    let app = common::build_test_app(common::lazy_pool());
    let token = common::token_for(1);
    let body = json!({
        "title": "Meditate",
        "type": "daily",
        "xp_reward": 20,
        "skill_rewards": [{ "skill_id": 3, "xp_amount": -5 }],
    });
    let response = post_json_auth(app, "/api/v1/quests", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn quest_difficulty_above_five_is_rejected() {
    let app = common::build_test_app(common::lazy_pool());
    let token = common::token_for(1);
    let body = json!({ "title": "Solo the sun", "type": "daily", "xp_reward": 20, "difficulty": 6 });
    let response = post_json_auth(app, "/api/v1/quests", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("difficulty"));
}

#[tokio::test]
async fn reflection_energy_level_out_of_range_is_rejected() {
    let app = common::build_test_app(common::lazy_pool());
    let token = common::token_for(1);
    let body = json!({ "type": "daily", "content": "Long day", "energy_level": 11 });
    let response = post_json_auth(app, "/api/v1/reflections", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Skills (database)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn skill_xp_award_levels_up(pool: PgPool) {
    let token = signup(&pool, "trainer").await;
    let skill_id = create_skill(&pool, &token, "Focus").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/skills/{skill_id}/xp"),
        json!({ "amount": 250 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["level_up"], true);
    assert_eq!(json["data"]["old_level"], 1);
    assert_eq!(json["data"]["new_level"], 2);
    assert_eq!(json["data"]["skill"]["current_xp"], 150);
    assert_eq!(json["data"]["skill"]["required_xp"], 200);

    assert_eq!(profile_total_xp(&pool, &token).await, 250);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn small_xp_award_does_not_touch_total_xp(pool: PgPool) {
    let token = signup(&pool, "sprinter").await;
    let skill_id = create_skill(&pool, &token, "Speed").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/skills/{skill_id}/xp"),
        json!({ "amount": 40 }),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["level_up"], false);
    assert_eq!(json["data"]["skill"]["current_xp"], 40);

    assert_eq!(profile_total_xp(&pool, &token).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn foreign_skill_is_not_found(pool: PgPool) {
    let owner = signup(&pool, "owner").await;
    let stranger = signup(&pool, "stranger").await;
    let skill_id = create_skill(&pool, &owner, "Focus").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/skills/{skill_id}/xp"),
        json!({ "amount": 10 }),
        &stranger,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(
        common::build_test_app(pool),
        &format!("/api/v1/skills/{skill_id}"),
        &stranger,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Quests (database)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn quest_rewards_are_paid_once(pool: PgPool) {
    let token = signup(&pool, "hero").await;
    let skill_id = create_skill(&pool, &token, "Stamina").await;
    let quest = create_quest(
        &pool,
        &token,
        json!({
            "title": "Morning run",
            "type": "daily",
            "xp_reward": 50,
            "skill_rewards": [{ "skill_id": skill_id, "xp_amount": 30 }],
        }),
    )
    .await;
    let uri = format!("/api/v1/quests/{}/complete", quest["id"]);

    let first = post_json_auth(common::build_test_app(pool.clone()), &uri, json!({}), &token).await;
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_json(first).await;
    assert_eq!(first["data"]["completed_now"], true);
    assert_eq!(first["data"]["quest"]["status"], "completed");
    assert_eq!(first["data"]["quest"]["progress"], 100);
    assert_eq!(first["data"]["rewards"]["user_xp"], 50);
    assert_eq!(first["data"]["rewards"]["skills"][0]["xp_amount"], 30);

    let second = post_json_auth(common::build_test_app(pool.clone()), &uri, json!({}), &token).await;
    assert_eq!(second.status(), StatusCode::OK);
    let second = body_json(second).await;
    assert_eq!(second["data"]["completed_now"], false);
    assert!(second["data"]["rewards"].is_null());

    assert_eq!(profile_total_xp(&pool, &token).await, 50);
    let skill = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/skills/{skill_id}"),
        &token,
    )
    .await;
    assert_eq!(body_json(skill).await["data"]["current_xp"], 30);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn reward_for_deleted_skill_is_skipped(pool: PgPool) {
    let token = signup(&pool, "forgetful").await;
    let skill_id = create_skill(&pool, &token, "Temporary").await;
    let quest = create_quest(
        &pool,
        &token,
        json!({
            "title": "Read a chapter",
            "type": "weekly",
            "xp_reward": 20,
            "skill_rewards": [{ "skill_id": skill_id, "xp_amount": 15 }],
        }),
    )
    .await;

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/skills/{skill_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/quests/{}/complete", quest["id"]),
        json!({}),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["completed_now"], true);
    assert_eq!(json["data"]["rewards"]["skills"], json!([]));
    assert_eq!(json["data"]["rewards"]["skipped"][0]["skill_id"], skill_id);
    assert_eq!(json["data"]["rewards"]["skipped"][0]["reason"], "skill_not_found");

    assert_eq!(profile_total_xp(&pool, &token).await, 20);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn checking_off_the_last_step_completes_the_quest(pool: PgPool) {
    let token = signup(&pool, "stepper").await;
    let quest = create_quest(
        &pool,
        &token,
        json!({
            "title": "Clean the ship",
            "type": "long-term",
            "xp_reward": 80,
            "steps": [
                { "description": "Bridge", "completed": false },
                { "description": "Engine room", "completed": false },
            ],
        }),
    )
    .await;
    let uri = format!("/api/v1/quests/{}/progress", quest["id"]);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        json!({ "step_index": 0 }),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["completed_now"], false);
    assert_eq!(json["data"]["quest"]["steps"][0]["completed"], true);
    assert_eq!(json["data"]["quest"]["status"], "active");

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        json!({ "step_index": 1 }),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["completed_now"], true);
    assert_eq!(json["data"]["quest"]["status"], "completed");
    assert_eq!(json["data"]["rewards"]["user_xp"], 80);

    let response = put_json_auth(
        common::build_test_app(pool),
        &uri,
        json!({ "progress": 10 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn dropping_the_last_open_step_completes_the_quest(pool: PgPool) {
    let token = signup(&pool, "trimmer").await;
    let quest = create_quest(
        &pool,
        &token,
        json!({
            "title": "Refit the hull",
            "type": "long-term",
            "xp_reward": 60,
            "steps": [
                { "description": "Strip panels", "completed": true },
                { "description": "Weld seams", "completed": false },
            ],
        }),
    )
    .await;
    assert_eq!(quest["steps"][0]["completed"], false);

    put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/quests/{}/progress", quest["id"]),
        json!({ "step_index": 0 }),
        &token,
    )
    .await;

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/quests/{}", quest["id"]),
        json!({ "steps": [{ "description": "Strip panels", "completed": false }] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["completed_now"], true);
    assert_eq!(json["data"]["quest"]["status"], "completed");
    assert_eq!(json["data"]["quest"]["steps"][0]["completed"], true);
    assert_eq!(json["data"]["rewards"]["user_xp"], 60);
    assert_eq!(profile_total_xp(&pool, &token).await, 60);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn steps_of_a_completed_quest_cannot_be_edited(pool: PgPool) {
    let token = signup(&pool, "archivist").await;
    let quest = create_quest(
        &pool,
        &token,
        json!({
            "title": "Chart the nebula",
            "type": "daily",
            "xp_reward": 15,
            "steps": [{ "description": "Launch survey drone" }],
        }),
    )
    .await;
    let uri = format!("/api/v1/quests/{}", quest["id"]);

    post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("{uri}/complete"),
        json!({}),
        &token,
    )
    .await;

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        json!({ "steps": [{ "description": "Launch survey drone", "completed": false }] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        json!({ "title": "Chart the outer nebula" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["completed_now"], false);
    assert_eq!(json["data"]["quest"]["status"], "completed");
    assert_eq!(json["data"]["quest"]["steps"][0]["completed"], true);
    assert_eq!(profile_total_xp(&pool, &token).await, 15);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn step_index_out_of_range_is_rejected(pool: PgPool) {
    let token = signup(&pool, "overreach").await;
    let quest = create_quest(
        &pool,
        &token,
        json!({
            "title": "One step",
            "type": "daily",
            "xp_reward": 10,
            "steps": [{ "description": "Only step", "completed": false }],
        }),
    )
    .await;

    let response = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/quests/{}/progress", quest["id"]),
        json!({ "step_index": 3 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Reflections (database)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn generated_questions_come_from_the_model(pool: PgPool) {
    let token = signup(&pool, "thinker").await;
    let provider = common::CannedProvider(
        "Here you go:\n```json\n{\"questions\": [\"Which planet did you visit today?\", \
         \"What fuelled your engines?\"]}\n```"
            .to_string(),
    );
    let app = common::build_test_app_with_provider(pool, Arc::new(provider));

    let response = get_auth(app, "/api/v1/reflections/questions?type=daily", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["type"], "daily");
    assert_eq!(
        json["data"]["questions"],
        json!(["Which planet did you visit today?", "What fuelled your engines?"])
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn offline_provider_yields_fallback_questions(pool: PgPool) {
    let token = signup(&pool, "offline").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/reflections/questions?type=daily", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let expected = nova_core::reflection::fallback_questions(Some(
        nova_core::reflection::ReflectionType::Daily,
    ));
    assert_eq!(json["data"]["questions"], json!(expected));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn analysis_is_stored_on_the_reflection(pool: PgPool) {
    let token = signup(&pool, "analyst").await;
    let body = json!({
        "type": "daily",
        "content": "Finished the report",
        "mood": "proud",
        "energy_level": 7,
        "questions": [{ "question": "What went well?", "answer": "The report" }],
    });
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/reflections",
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/reflections/{id}/analysis"),
        json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let analysis = body_json(response).await["data"].clone();
    assert!(!analysis["summary"].as_str().unwrap().is_empty());

    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/reflections/{id}"),
        &token,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["ai_analysis"], analysis);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn empty_period_summary_skips_the_model(pool: PgPool) {
    let token = signup(&pool, "quiet").await;
    let provider = common::CannedProvider("{\"summary\": \"should not be used\"}".to_string());
    let app = common::build_test_app_with_provider(pool, Arc::new(provider));

    let response = get_auth(app, "/api/v1/reflections/summary?period=month", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["period"], "month");
    assert_eq!(json["data"]["reflection_count"], 0);
    assert_eq!(json["data"]["summary"], "No reflections found for the last month.");
}

// ---------------------------------------------------------------------------
// City (database)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn city_is_created_on_first_visit(pool: PgPool) {
    let token = signup(&pool, "mayor").await;

    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/city", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["level"], 1);
    assert_eq!(json["data"]["buildings"].as_array().unwrap().len(), 3);
    assert_eq!(json["data"]["npcs"].as_array().unwrap().len(), 1);

    let response = put_json_auth(
        common::build_test_app(pool),
        "/api/v1/city",
        json!({ "level": 4 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["level"], 4);
}
