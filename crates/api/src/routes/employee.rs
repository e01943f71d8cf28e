//! Route definitions for `/employees`.

use axum::routing::get;
use axum::Router;

use crate::handlers::employee;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(employee::list_employees))
        .route(
            "/{id}",
            get(employee::get_employee)
                .patch(employee::update_employee)
                .delete(employee::delete_employee),
        )
        .route("/{id}/harvests", get(employee::list_employee_harvests))
        .route(
            "/{id}/workdays",
            get(employee::list_employee_workdays).post(employee::create_employee_workday),
        )
        .route("/{id}/summary", get(employee::employee_summary))
}
