//! Route definitions for `/seasons`.

use axum::routing::get;
use axum::Router;

use crate::handlers::season;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(season::list_seasons).post(season::create_season))
        .route(
            "/{year}",
            get(season::get_season)
                .patch(season::update_season)
                .delete(season::delete_season),
        )
        .route("/{year}/summary", get(season::season_summary))
        .route(
            "/{year}/harvests",
            get(season::list_season_harvests).post(season::create_season_harvest),
        )
        .route(
            "/{year}/employees",
            get(season::list_season_employees).post(season::create_season_employee),
        )
        .route(
            "/{year}/expenses",
            get(season::list_season_expenses).post(season::create_season_expense),
        )
}
