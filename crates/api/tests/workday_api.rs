//! HTTP-level tests for workdays: creation under both harvests and employees,
//! compatibility checks, crew link upserts, and patching.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, patch_json_auth, post_json_auth, seed_user};
use sqlx::PgPool;

/// Seed a season with one harvest and one employee whose employment window
/// covers the harvest date. Returns (harvest_id, employee_id).
async fn seed_scenario(pool: &PgPool, token: &str) -> (i64, i64) {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/seasons",
        token,
        serde_json::json!({"start_date": "2777-05-22", "end_date": "2777-09-22"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool.clone());
    let harvest = body_json(
        post_json_auth(
            app,
            "/seasons/2777/harvests",
            token,
            serde_json::json!({"fruit": "raspberry", "date": "2777-06-18", "harvested": 666, "price": 6}),
        )
        .await,
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let employee = body_json(
        post_json_auth(
            app,
            "/seasons/2777/employees",
            token,
            serde_json::json!({"name": "Ala", "start_date": "2777-05-27"}),
        )
        .await,
    )
    .await;

    (
        harvest["id"].as_i64().unwrap(),
        employee["id"].as_i64().unwrap(),
    )
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_workday_under_harvest(pool: PgPool) {
    let (_, token) = seed_user(&pool, "grower").await;
    let (harvest_id, employee_id) = seed_scenario(&pool, &token).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/harvests/{harvest_id}/workdays"),
        &token,
        serde_json::json!({"employee_id": employee_id, "harvested": 120, "pay_per_kg": 3}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["employee_id"].as_i64().unwrap(), employee_id);
    // Fruit is denormalized from the harvest.
    assert_eq!(json["fruit"], "raspberry");

    // Creating a workday also links the employee to the harvest crew.
    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/harvests/{harvest_id}/employees"), &token).await;
    let crew = body_json(response).await;
    assert_eq!(crew.as_array().unwrap().len(), 1);
    assert_eq!(crew[0]["id"].as_i64().unwrap(), employee_id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_workday_under_employee(pool: PgPool) {
    let (_, token) = seed_user(&pool, "grower").await;
    let (harvest_id, employee_id) = seed_scenario(&pool, &token).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/employees/{employee_id}/workdays"),
        &token,
        serde_json::json!({"harvest_id": harvest_id, "harvested": 80, "pay_per_kg": 2.5}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["harvest_id"].as_i64().unwrap(), harvest_id);

    // Visible through the harvest's workday listing too.
    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/harvests/{harvest_id}/workdays"), &token).await;
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_workday_requires_counterpart_id(pool: PgPool) {
    let (_, token) = seed_user(&pool, "grower").await;
    let (harvest_id, employee_id) = seed_scenario(&pool, &token).await;

    // No employee_id under a harvest.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/harvests/{harvest_id}/workdays"),
        &token,
        serde_json::json!({"harvested": 120, "pay_per_kg": 3}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // No harvest_id under an employee.
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/employees/{employee_id}/workdays"),
        &token,
        serde_json::json!({"harvested": 120, "pay_per_kg": 3}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_workday_outside_employment_window_is_422(pool: PgPool) {
    let (_, token) = seed_user(&pool, "grower").await;

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        "/seasons",
        &token,
        serde_json::json!({"start_date": "2777-05-22", "end_date": "2777-09-22"}),
    )
    .await;

    // Harvest after the employment window closes.
    let app = common::build_test_app(pool.clone());
    let harvest = body_json(
        post_json_auth(
            app,
            "/seasons/2777/harvests",
            &token,
            serde_json::json!({"fruit": "apple", "date": "2777-08-12", "harvested": 100, "price": 2}),
        )
        .await,
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let employee = body_json(
        post_json_auth(
            app,
            "/seasons/2777/employees",
            &token,
            serde_json::json!({"name": "Ala", "start_date": "2777-05-27", "end_date": "2777-07-17"}),
        )
        .await,
    )
    .await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/harvests/{}/workdays", harvest["id"]),
        &token,
        serde_json::json!({"employee_id": employee["id"], "harvested": 10, "pay_per_kg": 2}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Incompatible"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_workday_across_seasons_is_422(pool: PgPool) {
    let (_, token) = seed_user(&pool, "grower").await;
    let (harvest_id, _) = seed_scenario(&pool, &token).await;

    // Employee hired in a different season.
    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        "/seasons",
        &token,
        serde_json::json!({"start_date": "2778-05-22", "end_date": "2778-09-22"}),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let other = body_json(
        post_json_auth(
            app,
            "/seasons/2778/employees",
            &token,
            serde_json::json!({"name": "Ola", "start_date": "2778-06-01"}),
        )
        .await,
    )
    .await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/harvests/{harvest_id}/workdays"),
        &token,
        serde_json::json!({"employee_id": other["id"], "harvested": 10, "pay_per_kg": 2}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Incompatible"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_patch_workday_ranges(pool: PgPool) {
    let (_, token) = seed_user(&pool, "grower").await;
    let (harvest_id, employee_id) = seed_scenario(&pool, &token).await;

    let app = common::build_test_app(pool.clone());
    let workday = body_json(
        post_json_auth(
            app,
            &format!("/harvests/{harvest_id}/workdays"),
            &token,
            serde_json::json!({"employee_id": employee_id, "harvested": 120, "pay_per_kg": 3}),
        )
        .await,
    )
    .await;
    let id = workday["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &format!("/workdays/{id}"),
        &token,
        serde_json::json!({"pay_per_kg": 4}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let pay: f64 = json["pay_per_kg"].as_str().unwrap().parse().unwrap();
    assert_eq!(pay, 4.0);

    // Per-day haul above 1000 kg is out of range.
    let app = common::build_test_app(pool);
    let response = patch_json_auth(
        app,
        &format!("/workdays/{id}"),
        &token,
        serde_json::json!({"harvested": 1001}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_workday(pool: PgPool) {
    let (_, token) = seed_user(&pool, "grower").await;
    let (harvest_id, employee_id) = seed_scenario(&pool, &token).await;

    let app = common::build_test_app(pool.clone());
    let workday = body_json(
        post_json_auth(
            app,
            &format!("/harvests/{harvest_id}/workdays"),
            &token,
            serde_json::json!({"employee_id": employee_id, "harvested": 120, "pay_per_kg": 3}),
        )
        .await,
    )
    .await;
    let id = workday["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/workdays/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/workdays/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
