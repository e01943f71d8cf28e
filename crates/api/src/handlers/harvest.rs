//! Handlers for the `/harvests` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use farmlog_core::bounds::check_in_season;
use farmlog_core::error::CoreError;
use farmlog_core::report;
use farmlog_core::types::DbId;
use farmlog_core::validate;
use farmlog_db::models::employee::Employee;
use farmlog_db::models::harvest::{Harvest, HarvestFilter, UpdateHarvest};
use farmlog_db::models::workday::{CreateWorkday, Workday};
use farmlog_db::repositories::{EmployeeRepo, HarvestRepo, SeasonRepo, WorkdayRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::export::{csv_zip_response, ExportFormat};
use crate::handlers::{employee as employee_handlers, workday as workday_handlers};
use crate::middleware::auth::AuthUser;
use crate::query::{parse_date_param, parse_fruit_param, HarvestListParams, SummaryParams};
use crate::state::AppState;

/// Load a harvest by id, scoped to the caller; not-owned yields the same
/// 404 as missing.
pub(crate) async fn load_harvest(
    state: &AppState,
    owner_id: DbId,
    id: DbId,
) -> AppResult<Harvest> {
    HarvestRepo::find_by_id(&state.pool, owner_id, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Harvest",
                id,
            })
        })
}

/// `GET /harvests/{id}` response: the harvest row with its linked crew and
/// recorded workdays inline.
#[derive(Debug, Serialize)]
pub struct HarvestDetail {
    #[serde(flatten)]
    pub harvest: Harvest,
    pub employees: Vec<Employee>,
    pub workdays: Vec<Workday>,
}

/// GET /harvests
pub async fn list_harvests(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<HarvestListParams>,
) -> AppResult<Json<Vec<Harvest>>> {
    let filter = HarvestFilter {
        owner_id: Some(user.user_id),
        season_id: params.season_id,
        year: params.year,
        employee_id: params.employee_id,
        fruit: parse_fruit_param(params.fruit.as_deref())?,
        after: parse_date_param("after", params.after.as_deref())?,
        before: parse_date_param("before", params.before.as_deref())?,
        price_more: params.p_more,
        price_less: params.p_less,
        harvested_more: params.h_more,
        harvested_less: params.h_less,
        limit: params.limit,
        offset: params.offset,
    };

    let harvests = HarvestRepo::list(&state.pool, &filter).await?;
    Ok(Json(harvests))
}

/// GET /harvests/{id}
pub async fn get_harvest(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<HarvestDetail>> {
    let harvest = load_harvest(&state, user.user_id, id).await?;
    let employees = EmployeeRepo::for_harvest(&state.pool, harvest.id).await?;
    let workdays = WorkdayRepo::for_harvest(&state.pool, harvest.id).await?;

    Ok(Json(HarvestDetail {
        harvest,
        employees,
        workdays,
    }))
}

/// PATCH /harvests/{id}
///
/// A new date is re-validated against the season bounds; `employee_ids`,
/// when present, replaces the linked crew after compatibility checks.
pub async fn update_harvest(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateHarvest>,
) -> AppResult<Json<Harvest>> {
    let harvest = load_harvest(&state, user.user_id, id).await?;

    let fruit = input.fruit.unwrap_or(harvest.fruit);
    let date = input.date.unwrap_or(harvest.date);
    let harvested = input.harvested.unwrap_or(harvest.harvested);
    let price = input.price.unwrap_or(harvest.price);

    validate::harvest_price(&price).map_err(AppError::Core)?;
    validate::harvest_quantity(&harvested).map_err(AppError::Core)?;

    let season = SeasonRepo::find_by_id(&state.pool, harvest.season_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Season",
                id: harvest.season_id,
            })
        })?;
    check_in_season("Harvest", date, None, season.start_date, season.end_date)
        .map_err(AppError::Core)?;

    // Re-check the replacement crew against the (possibly moved) date.
    if let Some(ref employee_ids) = input.employee_ids {
        for &employee_id in employee_ids {
            let employee =
                employee_handlers::load_employee(&state, user.user_id, employee_id).await?;
            workday_handlers::check_compatible(
                harvest.season_id,
                date,
                employee.season_id,
                employee.start_date,
                employee.end_date,
            )?;
        }
    }

    let updated = HarvestRepo::update(&state.pool, id, fruit, date, &harvested, &price)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Harvest",
                id,
            })
        })?;

    if let Some(ref employee_ids) = input.employee_ids {
        HarvestRepo::replace_employee_links(&state.pool, id, employee_ids).await?;
    }

    Ok(Json(updated))
}

/// DELETE /harvests/{id}
pub async fn delete_harvest(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = HarvestRepo::delete(&state.pool, user.user_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Harvest",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /harvests/{id}/employees
pub async fn list_harvest_employees(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Employee>>> {
    let harvest = load_harvest(&state, user.user_id, id).await?;
    let employees = EmployeeRepo::for_harvest(&state.pool, harvest.id).await?;
    Ok(Json(employees))
}

/// GET /harvests/{id}/workdays
pub async fn list_harvest_workdays(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Workday>>> {
    let harvest = load_harvest(&state, user.user_id, id).await?;
    let workdays = WorkdayRepo::for_harvest(&state.pool, harvest.id).await?;
    Ok(Json(workdays))
}

/// POST /harvests/{id}/workdays
///
/// The body must carry `employee_id`; the harvest comes from the path.
/// Creation also upserts the harvest-employee link so the crew list stays
/// consistent with recorded work.
pub async fn create_harvest_workday(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreateWorkday>,
) -> AppResult<(StatusCode, Json<Workday>)> {
    let harvest = load_harvest(&state, user.user_id, id).await?;

    let employee_id = input.employee_id.ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "employee_id is required when creating a workday under a harvest".into(),
        ))
    })?;
    let employee = employee_handlers::load_employee(&state, user.user_id, employee_id).await?;

    create_workday_for(&state, user.user_id, &harvest, &employee, &input).await
}

/// Shared workday creation path for both nesting directions.
pub(crate) async fn create_workday_for(
    state: &AppState,
    employer_id: DbId,
    harvest: &Harvest,
    employee: &Employee,
    input: &CreateWorkday,
) -> AppResult<(StatusCode, Json<Workday>)> {
    validate::workday_quantity(&input.harvested).map_err(AppError::Core)?;
    validate::workday_pay(&input.pay_per_kg).map_err(AppError::Core)?;
    workday_handlers::check_compatible(
        harvest.season_id,
        harvest.date,
        employee.season_id,
        employee.start_date,
        employee.end_date,
    )?;

    let workday = WorkdayRepo::create(
        &state.pool,
        employee.id,
        harvest.id,
        employer_id,
        harvest.fruit,
        &input.harvested,
        &input.pay_per_kg,
    )
    .await?;

    HarvestRepo::link_employee(&state.pool, harvest.id, employee.id).await?;

    tracing::info!(
        workday_id = workday.id,
        harvest_id = harvest.id,
        employee_id = employee.id,
        "Workday recorded"
    );

    Ok((StatusCode::CREATED, Json(workday)))
}

/// GET /harvests/{id}/summary?format=json|csv
pub async fn harvest_summary(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Query(params): Query<SummaryParams>,
) -> AppResult<Response> {
    use axum::response::IntoResponse;

    let format = ExportFormat::parse(params.format.as_deref())?;
    let harvest = load_harvest(&state, user.user_id, id).await?;

    let crew: Vec<report::CrewWorkday> =
        WorkdayRepo::with_employees_for_harvest(&state.pool, harvest.id)
            .await?
            .into_iter()
            .map(|w| report::CrewWorkday {
                employee_id: w.employee_id,
                employee_name: w.employee_name,
                harvested: w.harvested,
                pay_per_kg: w.pay_per_kg,
            })
            .collect();

    let record = report::HarvestRecord {
        id: harvest.id,
        fruit: harvest.fruit,
        date: harvest.date,
        harvested: harvest.harvested,
        price: harvest.price,
    };
    let summary = report::harvest_summary(&record, &crew);

    match format {
        ExportFormat::Json => Ok(Json(summary).into_response()),
        ExportFormat::Csv => {
            let value = serde_json::to_value(&summary)
                .map_err(|e| AppError::InternalError(format!("Serialization error: {e}")))?;
            csv_zip_response(&format!("harvest_{id}_summary"), &value)
        }
    }
}
