//! Public routes: the service banner, login, and account creation.

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::handlers::{auth, user};
use crate::state::AppState;

/// Routes mounted at the root path.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/token", post(auth::token))
        .route("/user", post(user::create_user))
}

/// GET /
///
/// Liveness banner; carries no data and requires no auth.
async fn banner() -> Json<serde_json::Value> {
    Json(json!({
        "service": "farmlog",
        "status": "ok",
    }))
}
