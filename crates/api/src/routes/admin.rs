//! Route definitions for the admin surface.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/seasons",
            get(admin::list_all_seasons).delete(admin::delete_all_seasons),
        )
        .route("/seasons/{id}", delete(admin::delete_season_by_id))
}
