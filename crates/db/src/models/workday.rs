//! Workday entity model, DTOs and list filter.

use farmlog_core::fruit::Fruit;
use farmlog_core::types::{Date, DbId, Quantity};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A workday row from the `workdays` table.
///
/// `fruit` is denormalized from the linked harvest at creation time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Workday {
    pub id: DbId,
    pub employee_id: DbId,
    pub harvest_id: DbId,
    pub employer_id: DbId,
    pub fruit: Fruit,
    pub harvested: Quantity,
    pub pay_per_kg: Quantity,
}

/// DTO for creating a workday.
///
/// Exactly one of `employee_id`/`harvest_id` comes from the request body;
/// the other is supplied by the path the workday is created under.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkday {
    pub employee_id: Option<DbId>,
    pub harvest_id: Option<DbId>,
    pub harvested: Quantity,
    pub pay_per_kg: Quantity,
}

/// DTO for patching a workday's quantity or pay rate.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateWorkday {
    pub harvested: Option<Quantity>,
    pub pay_per_kg: Option<Quantity>,
}

/// Filter for workday list queries.
#[derive(Debug, Clone, Default)]
pub struct WorkdayFilter {
    pub employer_id: Option<DbId>,
    pub harvest_id: Option<DbId>,
    pub employee_id: Option<DbId>,
    pub fruit: Option<Fruit>,
    pub pay_more: Option<Quantity>,
    pub pay_less: Option<Quantity>,
    pub harvested_more: Option<Quantity>,
    pub harvested_less: Option<Quantity>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A workday joined with the linked employee's name, for harvest reports.
#[derive(Debug, Clone, FromRow)]
pub struct WorkdayWithEmployee {
    pub employee_id: DbId,
    pub employee_name: String,
    pub harvested: Quantity,
    pub pay_per_kg: Quantity,
}

/// A workday joined with harvest date and employee identity, for season
/// reports (grouped per employee by the caller).
#[derive(Debug, Clone, FromRow)]
pub struct SeasonWorkdayRow {
    pub employee_id: DbId,
    pub harvest_id: DbId,
    pub harvest_date: Date,
    pub fruit: Fruit,
    pub harvested: Quantity,
    pub pay_per_kg: Quantity,
}

/// A workday joined with the linked harvest's date, for employee reports.
#[derive(Debug, Clone, FromRow)]
pub struct WorkdayWithHarvest {
    pub harvest_id: DbId,
    pub harvest_date: Date,
    pub fruit: Fruit,
    pub harvested: Quantity,
    pub pay_per_kg: Quantity,
}
