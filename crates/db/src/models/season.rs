//! Season entity model and DTOs.

use farmlog_core::types::{Date, DbId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A season row from the `seasons` table.
///
/// `year` is always derived from `start_date` by the write path, never
/// supplied by the client.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Season {
    pub id: DbId,
    pub owner_id: DbId,
    pub year: i32,
    pub start_date: Date,
    pub end_date: Option<Date>,
}

/// DTO for creating a season. A missing `start_date` defaults to today.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSeason {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

/// DTO for patching a season's date range.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSeason {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

/// Columns a season listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeasonOrder {
    #[default]
    Year,
    StartDate,
}

impl SeasonOrder {
    pub fn column(self) -> &'static str {
        match self {
            SeasonOrder::Year => "year",
            SeasonOrder::StartDate => "start_date",
        }
    }
}

/// Filter for season list queries.
#[derive(Debug, Clone, Default)]
pub struct SeasonFilter {
    pub owner_id: Option<DbId>,
    pub after: Option<Date>,
    pub before: Option<Date>,
    pub order_by: SeasonOrder,
    pub descending: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
