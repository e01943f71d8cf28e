//! Employee entity model, DTOs and list filter.

use farmlog_core::types::{Date, DbId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An employee row from the `employees` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Employee {
    pub id: DbId,
    pub season_id: DbId,
    pub employer_id: DbId,
    pub name: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
}

/// DTO for creating an employee under a season.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEmployee {
    pub name: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub harvest_ids: Option<Vec<DbId>>,
}

/// DTO for patching an employee. All fields optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub harvest_ids: Option<Vec<DbId>>,
}

/// Filter for employee list queries.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub employer_id: Option<DbId>,
    pub season_id: Option<DbId>,
    pub harvest_id: Option<DbId>,
    pub name: Option<String>,
    pub after: Option<Date>,
    pub before: Option<Date>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
