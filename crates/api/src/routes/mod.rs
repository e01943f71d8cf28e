pub mod admin;
pub mod employee;
pub mod expense;
pub mod harvest;
pub mod root;
pub mod season;
pub mod workday;

use axum::Router;

use crate::state::AppState;

/// Build the full route tree (everything except the middleware stack).
///
/// Route hierarchy:
///
/// ```text
/// /                                     service banner (public)
/// /token                                login (public, form-encoded)
/// /user                                 create account (HTTP Basic)
///
/// /seasons                              list, create
/// /seasons/{year}                       get, patch, delete
/// /seasons/{year}/summary               aggregated report (json|csv)
/// /seasons/{year}/harvests              list, create
/// /seasons/{year}/employees             list, create
/// /seasons/{year}/expenses              list, create
///
/// /harvests                             list
/// /harvests/{id}                        get (with crew + workdays), patch, delete
/// /harvests/{id}/employees              linked crew
/// /harvests/{id}/workdays               list, create
/// /harvests/{id}/summary                aggregated report (json|csv)
///
/// /employees                            list
/// /employees/{id}                       get, patch, delete
/// /employees/{id}/harvests              linked harvests
/// /employees/{id}/workdays              list, create
/// /employees/{id}/summary               aggregated report (json|csv)
///
/// /workdays                             list
/// /workdays/{id}                        get, patch, delete
///
/// /expenses                             list
/// /expenses/{id}                        get, patch, delete
///
/// /admin/seasons                        list all, delete all (admin only)
/// /admin/seasons/{id}                   delete any (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(root::router())
        .nest("/seasons", season::router())
        .nest("/harvests", harvest::router())
        .nest("/employees", employee::router())
        .nest("/workdays", workday::router())
        .nest("/expenses", expense::router())
        .nest("/admin", admin::router())
}
