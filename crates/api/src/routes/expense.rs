//! Route definitions for `/expenses`.
//!
//! Creation lives under `/seasons/{year}/expenses`.

use axum::routing::get;
use axum::Router;

use crate::handlers::expense;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(expense::list_expenses))
        .route(
            "/{id}",
            get(expense::get_expense)
                .patch(expense::update_expense)
                .delete(expense::delete_expense),
        )
}
