//! Handlers for the `/seasons` resource and its nested collections.
//!
//! Seasons are addressed by year: each owner has at most one season per
//! calendar year, and `year` is always derived from `start_date` by the
//! write path.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use farmlog_core::bounds::check_in_season;
use farmlog_core::error::CoreError;
use farmlog_core::report;
use farmlog_core::types::DbId;
use farmlog_core::validate;
use farmlog_db::models::employee::{CreateEmployee, Employee, EmployeeFilter};
use farmlog_db::models::expense::{CreateExpense, Expense, ExpenseFilter};
use farmlog_db::models::harvest::{CreateHarvest, Harvest, HarvestFilter};
use farmlog_db::models::season::{CreateSeason, Season, SeasonFilter, UpdateSeason};
use farmlog_db::repositories::{
    EmployeeRepo, ExpenseRepo, HarvestRepo, SeasonRepo, WorkdayRepo,
};

use crate::error::{AppError, AppResult};
use crate::export::{csv_zip_response, ExportFormat};
use crate::handlers::{employee as employee_handlers, workday as workday_handlers};
use crate::middleware::auth::AuthUser;
use crate::query::{
    parse_date_param, parse_fruit_param, parse_order_param, parse_season_order_by,
    EmployeeListParams, ExpenseListParams, HarvestListParams, SeasonListParams, SummaryParams,
};
use crate::state::AppState;

use chrono::Datelike;

/// Load an owner's season by year, conflating "missing" and "not yours"
/// into the same 404.
pub(crate) async fn load_season(
    state: &AppState,
    owner_id: DbId,
    year: i32,
) -> AppResult<Season> {
    SeasonRepo::find_by_year(&state.pool, owner_id, year)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Season",
                id: year as DbId,
            })
        })
}

// ---------------------------------------------------------------------------
// Season CRUD
// ---------------------------------------------------------------------------

/// POST /seasons
///
/// A missing `start_date` defaults to today; `year` is derived from it.
/// A second season for the same year is a conflict.
pub async fn create_season(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateSeason>,
) -> AppResult<(StatusCode, Json<Season>)> {
    let start_date = input
        .start_date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    if let Some(end_date) = input.end_date {
        if end_date < start_date {
            return Err(AppError::Core(CoreError::Validation(
                "end_date must not precede start_date".into(),
            )));
        }
    }

    let season = SeasonRepo::create(
        &state.pool,
        user.user_id,
        start_date.year(),
        start_date,
        input.end_date,
    )
    .await?;

    tracing::info!(season_id = season.id, year = season.year, "Season created");

    Ok((StatusCode::CREATED, Json(season)))
}

/// GET /seasons
pub async fn list_seasons(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<SeasonListParams>,
) -> AppResult<Json<Vec<Season>>> {
    let filter = SeasonFilter {
        owner_id: Some(user.user_id),
        after: parse_date_param("after", params.after.as_deref())?,
        before: parse_date_param("before", params.before.as_deref())?,
        order_by: parse_season_order_by(params.order_by.as_deref())?,
        descending: parse_order_param(params.order.as_deref())?,
        limit: params.limit,
        offset: params.offset,
    };

    let seasons = SeasonRepo::list(&state.pool, &filter).await?;
    Ok(Json(seasons))
}

/// GET /seasons/{year}
pub async fn get_season(
    State(state): State<AppState>,
    user: AuthUser,
    Path(year): Path<i32>,
) -> AppResult<Json<Season>> {
    let season = load_season(&state, user.user_id, year).await?;
    Ok(Json(season))
}

/// PATCH /seasons/{year}
///
/// Dates are re-validated, `year` is re-derived from the new start date,
/// and every contained record is re-checked against the new bounds.
pub async fn update_season(
    State(state): State<AppState>,
    user: AuthUser,
    Path(year): Path<i32>,
    Json(input): Json<UpdateSeason>,
) -> AppResult<Json<Season>> {
    let season = load_season(&state, user.user_id, year).await?;

    let new_start = input.start_date.unwrap_or(season.start_date);
    let new_end = input.end_date.or(season.end_date);

    if let Some(end) = new_end {
        if end < new_start {
            return Err(AppError::Core(CoreError::Validation(
                "end_date must not precede start_date".into(),
            )));
        }
    }

    // Contained records must still fit inside the narrowed bounds.
    for harvest in HarvestRepo::for_season(&state.pool, season.id).await? {
        check_in_season("Harvest", harvest.date, None, new_start, new_end)
            .map_err(AppError::Core)?;
    }
    for employee in EmployeeRepo::for_season(&state.pool, season.id).await? {
        check_in_season(
            "Employee",
            employee.start_date,
            employee.end_date,
            new_start,
            new_end,
        )
        .map_err(AppError::Core)?;
    }
    for expense in ExpenseRepo::for_season(&state.pool, season.id).await? {
        check_in_season("Expense", expense.date, None, new_start, new_end)
            .map_err(AppError::Core)?;
    }

    let updated = SeasonRepo::update_dates(
        &state.pool,
        season.id,
        new_start.year(),
        new_start,
        new_end,
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Season",
            id: year as DbId,
        })
    })?;

    Ok(Json(updated))
}

/// DELETE /seasons/{year}
///
/// All harvests, employees, workdays and expenses cascade with it.
pub async fn delete_season(
    State(state): State<AppState>,
    user: AuthUser,
    Path(year): Path<i32>,
) -> AppResult<StatusCode> {
    let season = load_season(&state, user.user_id, year).await?;
    SeasonRepo::delete(&state.pool, season.id).await?;

    tracing::info!(season_id = season.id, year, "Season deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /seasons/{year}/summary?format=json|csv
pub async fn season_summary(
    State(state): State<AppState>,
    user: AuthUser,
    Path(year): Path<i32>,
    Query(params): Query<SummaryParams>,
) -> AppResult<Response> {
    use axum::response::IntoResponse;

    let format = ExportFormat::parse(params.format.as_deref())?;
    let season = load_season(&state, user.user_id, year).await?;

    let harvests = HarvestRepo::for_season(&state.pool, season.id).await?;
    let employees = EmployeeRepo::for_season(&state.pool, season.id).await?;
    let workday_rows = WorkdayRepo::for_season(&state.pool, season.id).await?;
    let expenses = ExpenseRepo::for_season(&state.pool, season.id).await?;

    let harvest_records: Vec<report::HarvestRecord> = harvests
        .into_iter()
        .map(|h| report::HarvestRecord {
            id: h.id,
            fruit: h.fruit,
            date: h.date,
            harvested: h.harvested,
            price: h.price,
        })
        .collect();

    // Group the season's workdays per employee, keeping insertion order.
    let mut by_employee: std::collections::HashMap<DbId, Vec<report::WorkdayRecord>> =
        std::collections::HashMap::new();
    for row in workday_rows {
        by_employee
            .entry(row.employee_id)
            .or_default()
            .push(report::WorkdayRecord {
                harvest_id: row.harvest_id,
                harvest_date: row.harvest_date,
                fruit: row.fruit,
                harvested: row.harvested,
                pay_per_kg: row.pay_per_kg,
            });
    }
    let employee_records: Vec<report::EmployeeRecord> = employees
        .into_iter()
        .map(|e| report::EmployeeRecord {
            workdays: by_employee.remove(&e.id).unwrap_or_default(),
            id: e.id,
            name: e.name,
        })
        .collect();

    let expense_amounts: Vec<_> = expenses.into_iter().map(|x| x.amount).collect();

    let summary = report::season_summary(&harvest_records, &employee_records, &expense_amounts);

    match format {
        ExportFormat::Json => Ok(Json(summary).into_response()),
        ExportFormat::Csv => {
            let value = serde_json::to_value(&summary)
                .map_err(|e| AppError::InternalError(format!("Serialization error: {e}")))?;
            csv_zip_response(&format!("season_{year}_summary"), &value)
        }
    }
}

// ---------------------------------------------------------------------------
// Nested: harvests
// ---------------------------------------------------------------------------

/// POST /seasons/{year}/harvests
pub async fn create_season_harvest(
    State(state): State<AppState>,
    user: AuthUser,
    Path(year): Path<i32>,
    Json(input): Json<CreateHarvest>,
) -> AppResult<(StatusCode, Json<Harvest>)> {
    let season = load_season(&state, user.user_id, year).await?;

    validate::harvest_price(&input.price).map_err(AppError::Core)?;
    validate::harvest_quantity(&input.harvested).map_err(AppError::Core)?;
    check_in_season(
        "Harvest",
        input.date,
        None,
        season.start_date,
        season.end_date,
    )
    .map_err(AppError::Core)?;

    // Resolve the crew before inserting, so an incompatible employee
    // leaves nothing behind.
    let mut crew = Vec::new();
    if let Some(ref employee_ids) = input.employee_ids {
        for &employee_id in employee_ids {
            let employee = employee_handlers::load_employee(&state, user.user_id, employee_id)
                .await?;
            workday_handlers::check_compatible(
                season.id,
                input.date,
                employee.season_id,
                employee.start_date,
                employee.end_date,
            )?;
            crew.push(employee.id);
        }
    }

    let harvest = HarvestRepo::create(
        &state.pool,
        season.id,
        user.user_id,
        input.fruit,
        input.date,
        &input.harvested,
        &input.price,
    )
    .await?;

    for employee_id in crew {
        HarvestRepo::link_employee(&state.pool, harvest.id, employee_id).await?;
    }

    tracing::info!(harvest_id = harvest.id, season_id = season.id, "Harvest created");

    Ok((StatusCode::CREATED, Json(harvest)))
}

/// GET /seasons/{year}/harvests
pub async fn list_season_harvests(
    State(state): State<AppState>,
    user: AuthUser,
    Path(year): Path<i32>,
    Query(params): Query<HarvestListParams>,
) -> AppResult<Json<Vec<Harvest>>> {
    let season = load_season(&state, user.user_id, year).await?;

    let filter = HarvestFilter {
        owner_id: Some(user.user_id),
        season_id: Some(season.id),
        fruit: parse_fruit_param(params.fruit.as_deref())?,
        after: parse_date_param("after", params.after.as_deref())?,
        before: parse_date_param("before", params.before.as_deref())?,
        price_more: params.p_more,
        price_less: params.p_less,
        harvested_more: params.h_more,
        harvested_less: params.h_less,
        limit: params.limit,
        offset: params.offset,
        ..Default::default()
    };

    let harvests = HarvestRepo::list(&state.pool, &filter).await?;
    Ok(Json(harvests))
}

// ---------------------------------------------------------------------------
// Nested: employees
// ---------------------------------------------------------------------------

/// POST /seasons/{year}/employees
pub async fn create_season_employee(
    State(state): State<AppState>,
    user: AuthUser,
    Path(year): Path<i32>,
    Json(input): Json<CreateEmployee>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    let season = load_season(&state, user.user_id, year).await?;

    validate::employee_name(&input.name).map_err(AppError::Core)?;
    check_in_season(
        "Employee",
        input.start_date,
        input.end_date,
        season.start_date,
        season.end_date,
    )
    .map_err(AppError::Core)?;

    // Check the optional harvest links up front.
    let mut links = Vec::new();
    if let Some(ref harvest_ids) = input.harvest_ids {
        for &harvest_id in harvest_ids {
            let harvest =
                crate::handlers::harvest::load_harvest(&state, user.user_id, harvest_id).await?;
            workday_handlers::check_compatible(
                harvest.season_id,
                harvest.date,
                season.id,
                input.start_date,
                input.end_date,
            )?;
            links.push(harvest.id);
        }
    }

    let employee = EmployeeRepo::create(
        &state.pool,
        season.id,
        user.user_id,
        &input.name,
        input.start_date,
        input.end_date,
    )
    .await?;

    for harvest_id in links {
        HarvestRepo::link_employee(&state.pool, harvest_id, employee.id).await?;
    }

    tracing::info!(employee_id = employee.id, season_id = season.id, "Employee created");

    Ok((StatusCode::CREATED, Json(employee)))
}

/// GET /seasons/{year}/employees
pub async fn list_season_employees(
    State(state): State<AppState>,
    user: AuthUser,
    Path(year): Path<i32>,
    Query(params): Query<EmployeeListParams>,
) -> AppResult<Json<Vec<Employee>>> {
    let season = load_season(&state, user.user_id, year).await?;

    let filter = EmployeeFilter {
        employer_id: Some(user.user_id),
        season_id: Some(season.id),
        name: params.name,
        after: parse_date_param("after", params.after.as_deref())?,
        before: parse_date_param("before", params.before.as_deref())?,
        limit: params.limit,
        offset: params.offset,
        ..Default::default()
    };

    let employees = EmployeeRepo::list(&state.pool, &filter).await?;
    Ok(Json(employees))
}

// ---------------------------------------------------------------------------
// Nested: expenses
// ---------------------------------------------------------------------------

/// POST /seasons/{year}/expenses
pub async fn create_season_expense(
    State(state): State<AppState>,
    user: AuthUser,
    Path(year): Path<i32>,
    Json(input): Json<CreateExpense>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    let season = load_season(&state, user.user_id, year).await?;

    validate::expense_type(&input.kind).map_err(AppError::Core)?;
    validate::expense_amount(&input.amount).map_err(AppError::Core)?;
    check_in_season(
        "Expense",
        input.date,
        None,
        season.start_date,
        season.end_date,
    )
    .map_err(AppError::Core)?;

    let expense = ExpenseRepo::create(
        &state.pool,
        season.id,
        user.user_id,
        &input.kind,
        input.date,
        &input.amount,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// GET /seasons/{year}/expenses
pub async fn list_season_expenses(
    State(state): State<AppState>,
    user: AuthUser,
    Path(year): Path<i32>,
    Query(params): Query<ExpenseListParams>,
) -> AppResult<Json<Vec<Expense>>> {
    let season = load_season(&state, user.user_id, year).await?;

    let filter = ExpenseFilter {
        owner_id: Some(user.user_id),
        season_id: Some(season.id),
        kind: params.kind,
        after: parse_date_param("after", params.after.as_deref())?,
        before: parse_date_param("before", params.before.as_deref())?,
        more: params.more,
        less: params.less,
        limit: params.limit,
        offset: params.offset,
    };

    let expenses = ExpenseRepo::list(&state.pool, &filter).await?;
    Ok(Json(expenses))
}
