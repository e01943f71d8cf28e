//! Handlers for the `/expenses` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use farmlog_core::bounds::check_in_season;
use farmlog_core::error::CoreError;
use farmlog_core::types::DbId;
use farmlog_core::validate;
use farmlog_db::models::expense::{Expense, ExpenseFilter, UpdateExpense};
use farmlog_db::repositories::{ExpenseRepo, SeasonRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{parse_date_param, ExpenseListParams};
use crate::state::AppState;

pub(crate) async fn load_expense(
    state: &AppState,
    owner_id: DbId,
    id: DbId,
) -> AppResult<Expense> {
    ExpenseRepo::find_by_id(&state.pool, owner_id, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Expense",
                id,
            })
        })
}

/// GET /expenses
pub async fn list_expenses(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ExpenseListParams>,
) -> AppResult<Json<Vec<Expense>>> {
    let filter = ExpenseFilter {
        owner_id: Some(user.user_id),
        season_id: params.season_id,
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

/// GET /expenses/{id}
pub async fn get_expense(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Expense>> {
    let expense = load_expense(&state, user.user_id, id).await?;
    Ok(Json(expense))
}

/// PATCH /expenses/{id}
///
/// A new date is re-checked against the season bounds.
pub async fn update_expense(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateExpense>,
) -> AppResult<Json<Expense>> {
    let expense = load_expense(&state, user.user_id, id).await?;

    let kind = input.kind.unwrap_or(expense.kind);
    let date = input.date.unwrap_or(expense.date);
    let amount = input.amount.unwrap_or(expense.amount);

    validate::expense_type(&kind).map_err(AppError::Core)?;
    validate::expense_amount(&amount).map_err(AppError::Core)?;

    let season = SeasonRepo::find_by_id(&state.pool, expense.season_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Season",
                id: expense.season_id,
            })
        })?;
    check_in_season("Expense", date, None, season.start_date, season.end_date)
        .map_err(AppError::Core)?;

    let updated = ExpenseRepo::update(&state.pool, id, &kind, date, &amount)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Expense",
                id,
            })
        })?;

    Ok(Json(updated))
}

/// DELETE /expenses/{id}
pub async fn delete_expense(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ExpenseRepo::delete(&state.pool, user.user_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Expense",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
