//! HTTP-level tests for `/seasons` and the admin surface.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, patch_json_auth, post_json_auth, promote_admin, seed_user,
};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_season_derives_year(pool: PgPool) {
    let (_, token) = seed_user(&pool, "grower").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/seasons",
        &token,
        serde_json::json!({"start_date": "2777-05-22", "end_date": "2777-09-22"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["year"], 2777);
    assert_eq!(json["start_date"], "2777-05-22");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_second_season_same_year_is_400(pool: PgPool) {
    let (_, token) = seed_user(&pool, "grower").await;
    let body = serde_json::json!({"start_date": "2777-05-22"});

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/seasons", &token, body.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/seasons", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_season_by_year(pool: PgPool) {
    let (_, token) = seed_user(&pool, "grower").await;

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        "/seasons",
        &token,
        serde_json::json!({"start_date": "2777-05-22"}),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/seasons/2777", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/seasons/2778", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_other_owners_season_is_invisible(pool: PgPool) {
    let (_, token_a) = seed_user(&pool, "grower-a").await;
    let (_, token_b) = seed_user(&pool, "grower-b").await;

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        "/seasons",
        &token_a,
        serde_json::json!({"start_date": "2777-05-22"}),
    )
    .await;

    // Same 404 as a season that does not exist at all.
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/seasons/2777", &token_b).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_patch_season_rederives_year(pool: PgPool) {
    let (_, token) = seed_user(&pool, "grower").await;

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        "/seasons",
        &token,
        serde_json::json!({"start_date": "2777-05-22", "end_date": "2777-09-22"}),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        "/seasons/2777",
        &token,
        serde_json::json!({"start_date": "2778-03-01", "end_date": "2778-10-01"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["year"], 2778);

    // The old year no longer resolves.
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/seasons/2777", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_patch_season_rejects_orphaned_records(pool: PgPool) {
    let (_, token) = seed_user(&pool, "grower").await;

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        "/seasons",
        &token,
        serde_json::json!({"start_date": "2777-05-22", "end_date": "2777-09-22"}),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/seasons/2777/harvests",
        &token,
        serde_json::json!({"fruit": "raspberry", "date": "2777-06-18", "harvested": 666, "price": 6}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Narrowing the season past the harvest date must fail.
    let app = common::build_test_app(pool);
    let response = patch_json_auth(
        app,
        "/seasons/2777",
        &token,
        serde_json::json!({"start_date": "2777-07-01"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_season_cascades(pool: PgPool) {
    let (_, token) = seed_user(&pool, "grower").await;

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        "/seasons",
        &token,
        serde_json::json!({"start_date": "2777-05-22", "end_date": "2777-09-22"}),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json_auth(
            app,
            "/seasons/2777/harvests",
            &token,
            serde_json::json!({"fruit": "cherry", "date": "2777-06-01", "harvested": 100, "price": 4}),
        )
        .await,
    )
    .await;
    let harvest_id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, "/seasons/2777", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/harvests/{harvest_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_season_list_ordering_and_params(pool: PgPool) {
    let (_, token) = seed_user(&pool, "grower").await;

    for start in ["2776-05-01", "2777-05-01", "2778-05-01"] {
        let app = common::build_test_app(pool.clone());
        post_json_auth(
            app,
            "/seasons",
            &token,
            serde_json::json!({"start_date": start}),
        )
        .await;
    }

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/seasons?order_by=year&order=desc&limit=2", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let years: Vec<i64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["year"].as_i64().unwrap())
        .collect();
    assert_eq!(years, vec![2778, 2777]);

    // Unknown order keyword is a 400; malformed date filter is a 422.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/seasons?order=sideways", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/seasons?after=yesterday", &token).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ---------------------------------------------------------------------------
// Admin surface
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_sees_all_seasons(pool: PgPool) {
    let (admin_id, admin_token) = seed_user(&pool, "boss").await;
    promote_admin(&pool, admin_id).await;
    let (_, token_a) = seed_user(&pool, "grower-a").await;
    let (_, token_b) = seed_user(&pool, "grower-b").await;

    for (token, start) in [(&token_a, "2777-05-01"), (&token_b, "2777-06-01")] {
        let app = common::build_test_app(pool.clone());
        post_json_auth(
            app,
            "/seasons",
            token,
            serde_json::json!({"start_date": start}),
        )
        .await;
    }

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/admin/seasons", &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_surface_is_forbidden_for_regular_users(pool: PgPool) {
    let (_, token) = seed_user(&pool, "grower").await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/admin/seasons", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_delete_all_seasons(pool: PgPool) {
    let (admin_id, admin_token) = seed_user(&pool, "boss").await;
    promote_admin(&pool, admin_id).await;
    let (_, token) = seed_user(&pool, "grower").await;

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        "/seasons",
        &token,
        serde_json::json!({"start_date": "2777-05-22"}),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, "/admin/seasons", &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/seasons/2777", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
