//! Handlers for the `/workdays` resource.
//!
//! Workdays are created under a harvest or an employee (see the harvest and
//! employee handler modules); this module owns the top-level listing, single
//! record access, and the compatibility rule every creation path shares.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use farmlog_core::bounds::in_bounds;
use farmlog_core::error::CoreError;
use farmlog_core::types::{Date, DbId};
use farmlog_core::validate;
use farmlog_db::models::workday::{UpdateWorkday, Workday, WorkdayFilter};
use farmlog_db::repositories::WorkdayRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{parse_fruit_param, WorkdayListParams};
use crate::state::AppState;

/// A harvest and an employee may be linked only when they belong to the same
/// season and the harvest date falls inside the employment window. Both
/// failures carry "Incompatible" in the detail.
pub(crate) fn check_compatible(
    harvest_season_id: DbId,
    harvest_date: Date,
    employee_season_id: DbId,
    employment_start: Date,
    employment_end: Option<Date>,
) -> AppResult<()> {
    if harvest_season_id != employee_season_id {
        return Err(AppError::Core(CoreError::Validation(
            "Incompatible: harvest and employee belong to different seasons".into(),
        )));
    }
    if !in_bounds(harvest_date, employment_start, None, employment_end) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Incompatible: harvest date {harvest_date} is outside the employment period"
        ))));
    }
    Ok(())
}

pub(crate) async fn load_workday(
    state: &AppState,
    employer_id: DbId,
    id: DbId,
) -> AppResult<Workday> {
    WorkdayRepo::find_by_id(&state.pool, employer_id, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Workday",
                id,
            })
        })
}

/// GET /workdays
pub async fn list_workdays(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<WorkdayListParams>,
) -> AppResult<Json<Vec<Workday>>> {
    let filter = WorkdayFilter {
        employer_id: Some(user.user_id),
        fruit: parse_fruit_param(params.fruit.as_deref())?,
        pay_more: params.p_more,
        pay_less: params.p_less,
        harvested_more: params.h_more,
        harvested_less: params.h_less,
        limit: params.limit,
        offset: params.offset,
        ..Default::default()
    };

    let workdays = WorkdayRepo::list(&state.pool, &filter).await?;
    Ok(Json(workdays))
}

/// GET /workdays/{id}
pub async fn get_workday(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Workday>> {
    let workday = load_workday(&state, user.user_id, id).await?;
    Ok(Json(workday))
}

/// PATCH /workdays/{id}
pub async fn update_workday(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkday>,
) -> AppResult<Json<Workday>> {
    let workday = load_workday(&state, user.user_id, id).await?;

    let harvested = input.harvested.unwrap_or(workday.harvested);
    let pay_per_kg = input.pay_per_kg.unwrap_or(workday.pay_per_kg);

    validate::workday_quantity(&harvested).map_err(AppError::Core)?;
    validate::workday_pay(&pay_per_kg).map_err(AppError::Core)?;

    let updated = WorkdayRepo::update(&state.pool, id, &harvested, &pay_per_kg)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Workday",
                id,
            })
        })?;

    Ok(Json(updated))
}

/// DELETE /workdays/{id}
pub async fn delete_workday(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = WorkdayRepo::delete(&state.pool, user.user_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Workday",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
