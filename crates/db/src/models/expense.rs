//! Expense entity model, DTOs and list filter.

use farmlog_core::types::{Date, DbId, Quantity};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An expense row from the `expenses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Expense {
    pub id: DbId,
    pub season_id: DbId,
    pub owner_id: DbId,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub date: Date,
    pub amount: Quantity,
}

/// DTO for creating an expense under a season.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExpense {
    #[serde(rename = "type")]
    pub kind: String,
    pub date: Date,
    pub amount: Quantity,
}

/// DTO for patching an expense. All fields optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateExpense {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub date: Option<Date>,
    pub amount: Option<Quantity>,
}

/// Filter for expense list queries.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub owner_id: Option<DbId>,
    pub season_id: Option<DbId>,
    pub kind: Option<String>,
    pub after: Option<Date>,
    pub before: Option<Date>,
    pub more: Option<Quantity>,
    pub less: Option<Quantity>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
