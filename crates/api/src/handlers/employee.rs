//! Handlers for the `/employees` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use farmlog_core::bounds::check_in_season;
use farmlog_core::error::CoreError;
use farmlog_core::report;
use farmlog_core::types::DbId;
use farmlog_core::validate;
use farmlog_db::models::employee::{Employee, EmployeeFilter, UpdateEmployee};
use farmlog_db::models::harvest::Harvest;
use farmlog_db::models::workday::{CreateWorkday, Workday};
use farmlog_db::repositories::{EmployeeRepo, HarvestRepo, SeasonRepo, WorkdayRepo};

use crate::error::{AppError, AppResult};
use crate::export::{csv_zip_response, ExportFormat};
use crate::handlers::{harvest as harvest_handlers, workday as workday_handlers};
use crate::middleware::auth::AuthUser;
use crate::query::{parse_date_param, EmployeeListParams, SummaryParams};
use crate::state::AppState;

/// Load an employee by id, scoped to the caller.
pub(crate) async fn load_employee(
    state: &AppState,
    employer_id: DbId,
    id: DbId,
) -> AppResult<Employee> {
    EmployeeRepo::find_by_id(&state.pool, employer_id, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Employee",
                id,
            })
        })
}

/// GET /employees
pub async fn list_employees(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<EmployeeListParams>,
) -> AppResult<Json<Vec<Employee>>> {
    let filter = EmployeeFilter {
        employer_id: Some(user.user_id),
        season_id: params.season_id,
        harvest_id: params.harvest_id,
        name: params.name,
        after: parse_date_param("after", params.after.as_deref())?,
        before: parse_date_param("before", params.before.as_deref())?,
        limit: params.limit,
        offset: params.offset,
    };

    let employees = EmployeeRepo::list(&state.pool, &filter).await?;
    Ok(Json(employees))
}

/// GET /employees/{id}
pub async fn get_employee(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Employee>> {
    let employee = load_employee(&state, user.user_id, id).await?;
    Ok(Json(employee))
}

/// PATCH /employees/{id}
///
/// New dates are re-validated against the season bounds; `harvest_ids`,
/// when present, relinks the harvests after compatibility checks.
pub async fn update_employee(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEmployee>,
) -> AppResult<Json<Employee>> {
    let employee = load_employee(&state, user.user_id, id).await?;

    let name = input.name.unwrap_or(employee.name);
    let start_date = input.start_date.unwrap_or(employee.start_date);
    let end_date = input.end_date.or(employee.end_date);

    validate::employee_name(&name).map_err(AppError::Core)?;

    let season = SeasonRepo::find_by_id(&state.pool, employee.season_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Season",
                id: employee.season_id,
            })
        })?;
    check_in_season(
        "Employee",
        start_date,
        end_date,
        season.start_date,
        season.end_date,
    )
    .map_err(AppError::Core)?;

    if let Some(ref harvest_ids) = input.harvest_ids {
        for &harvest_id in harvest_ids {
            let harvest = harvest_handlers::load_harvest(&state, user.user_id, harvest_id).await?;
            workday_handlers::check_compatible(
                harvest.season_id,
                harvest.date,
                employee.season_id,
                start_date,
                end_date,
            )?;
        }
    }

    let updated = EmployeeRepo::update(&state.pool, id, &name, start_date, end_date)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Employee",
                id,
            })
        })?;

    if let Some(ref harvest_ids) = input.harvest_ids {
        for &harvest_id in harvest_ids {
            HarvestRepo::link_employee(&state.pool, harvest_id, id).await?;
        }
    }

    Ok(Json(updated))
}

/// DELETE /employees/{id}
pub async fn delete_employee(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = EmployeeRepo::delete(&state.pool, user.user_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Employee",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /employees/{id}/harvests
pub async fn list_employee_harvests(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Harvest>>> {
    let employee = load_employee(&state, user.user_id, id).await?;
    let harvests = HarvestRepo::for_employee(&state.pool, employee.id).await?;
    Ok(Json(harvests))
}

/// GET /employees/{id}/workdays
pub async fn list_employee_workdays(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Workday>>> {
    let employee = load_employee(&state, user.user_id, id).await?;
    let workdays = WorkdayRepo::for_employee(&state.pool, employee.id).await?;
    Ok(Json(workdays))
}

/// POST /employees/{id}/workdays
///
/// The body must carry `harvest_id`; the employee comes from the path.
pub async fn create_employee_workday(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreateWorkday>,
) -> AppResult<(StatusCode, Json<Workday>)> {
    let employee = load_employee(&state, user.user_id, id).await?;

    let harvest_id = input.harvest_id.ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "harvest_id is required when creating a workday under an employee".into(),
        ))
    })?;
    let harvest = harvest_handlers::load_harvest(&state, user.user_id, harvest_id).await?;

    harvest_handlers::create_workday_for(&state, user.user_id, &harvest, &employee, &input).await
}

/// GET /employees/{id}/summary?format=json|csv
pub async fn employee_summary(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Query(params): Query<SummaryParams>,
) -> AppResult<Response> {
    use axum::response::IntoResponse;

    let format = ExportFormat::parse(params.format.as_deref())?;
    let employee = load_employee(&state, user.user_id, id).await?;

    let workdays: Vec<report::WorkdayRecord> =
        WorkdayRepo::with_harvests_for_employee(&state.pool, employee.id)
            .await?
            .into_iter()
            .map(|w| report::WorkdayRecord {
                harvest_id: w.harvest_id,
                harvest_date: w.harvest_date,
                fruit: w.fruit,
                harvested: w.harvested,
                pay_per_kg: w.pay_per_kg,
            })
            .collect();

    let record = report::EmployeeRecord {
        id: employee.id,
        name: employee.name,
        workdays,
    };
    let summary = report::employee_summary(&record);

    match format {
        ExportFormat::Json => Ok(Json(summary).into_response()),
        ExportFormat::Csv => {
            let value = serde_json::to_value(&summary)
                .map_err(|e| AppError::InternalError(format!("Serialization error: {e}")))?;
            csv_zip_response(&format!("employee_{id}_summary"), &value)
        }
    }
}
