//! Route definitions for `/workdays`.
//!
//! Creation lives under `/harvests/{id}/workdays` and
//! `/employees/{id}/workdays`; a workday never exists without both links.

use axum::routing::get;
use axum::Router;

use crate::handlers::workday;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(workday::list_workdays))
        .route(
            "/{id}",
            get(workday::get_workday)
                .patch(workday::update_workday)
                .delete(workday::delete_workday),
        )
}
