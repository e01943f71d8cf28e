//! Harvest entity model, DTOs and list filter.

use farmlog_core::fruit::Fruit;
use farmlog_core::types::{Date, DbId, Quantity};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A harvest row from the `harvests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Harvest {
    pub id: DbId,
    pub season_id: DbId,
    pub owner_id: DbId,
    pub fruit: Fruit,
    pub date: Date,
    pub harvested: Quantity,
    pub price: Quantity,
}

/// DTO for creating a harvest under a season.
///
/// `employee_ids`, when present, are linked after a compatibility check
/// against each employee's employment window.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHarvest {
    pub fruit: Fruit,
    pub date: Date,
    pub harvested: Quantity,
    pub price: Quantity,
    pub employee_ids: Option<Vec<DbId>>,
}

/// DTO for patching a harvest. All fields optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateHarvest {
    pub fruit: Option<Fruit>,
    pub date: Option<Date>,
    pub harvested: Option<Quantity>,
    pub price: Option<Quantity>,
    pub employee_ids: Option<Vec<DbId>>,
}

/// Filter for harvest list queries. `owner_id` is always set by the
/// handler from the authenticated user; everything else is optional.
#[derive(Debug, Clone, Default)]
pub struct HarvestFilter {
    pub owner_id: Option<DbId>,
    pub season_id: Option<DbId>,
    pub year: Option<i32>,
    pub employee_id: Option<DbId>,
    pub fruit: Option<Fruit>,
    pub after: Option<Date>,
    pub before: Option<Date>,
    pub price_more: Option<Quantity>,
    pub price_less: Option<Quantity>,
    pub harvested_more: Option<Quantity>,
    pub harvested_less: Option<Quantity>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
