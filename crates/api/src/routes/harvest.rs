//! Route definitions for `/harvests`.

use axum::routing::get;
use axum::Router;

use crate::handlers::harvest;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(harvest::list_harvests))
        .route(
            "/{id}",
            get(harvest::get_harvest)
                .patch(harvest::update_harvest)
                .delete(harvest::delete_harvest),
        )
        .route("/{id}/employees", get(harvest::list_harvest_employees))
        .route(
            "/{id}/workdays",
            get(harvest::list_harvest_workdays).post(harvest::create_harvest_workday),
        )
        .route("/{id}/summary", get(harvest::harvest_summary))
}
