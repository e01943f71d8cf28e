//! Shared query-parameter types and parsing helpers.
//!
//! Dates, fruits and ordering arrive as raw strings and are parsed here so a
//! malformed value gets the status the surface promises: unparseable dates
//! and unknown fruits are 422, an unknown `order`/`order_by` is 400.

use std::str::FromStr;

use farmlog_core::error::CoreError;
use farmlog_core::fruit::Fruit;
use farmlog_core::types::{Date, Quantity};
use farmlog_db::models::season::SeasonOrder;
use serde::Deserialize;

use crate::error::AppError;

/// Parse an optional `after`/`before` style date parameter.
pub fn parse_date_param(name: &str, value: Option<&str>) -> Result<Option<Date>, AppError> {
    match value {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| {
            AppError::Core(CoreError::Validation(format!(
                "{name} must be an ISO 8601 date, got '{raw}'"
            )))
        }),
    }
}

/// Parse an optional fruit filter value.
pub fn parse_fruit_param(value: Option<&str>) -> Result<Option<Fruit>, AppError> {
    match value {
        None => Ok(None),
        Some(raw) => Fruit::from_str(raw).map(Some).map_err(AppError::Core),
    }
}

/// Parse `order` (`asc`/`desc`) into a descending flag. Defaults to ascending.
pub fn parse_order_param(value: Option<&str>) -> Result<bool, AppError> {
    match value {
        None => Ok(false),
        Some("asc") => Ok(false),
        Some("desc") => Ok(true),
        Some(other) => Err(AppError::BadRequest(format!(
            "order must be 'asc' or 'desc', got '{other}'"
        ))),
    }
}

/// Parse `order_by` for season listings. Defaults to ordering by year.
pub fn parse_season_order_by(value: Option<&str>) -> Result<SeasonOrder, AppError> {
    match value {
        None | Some("year") => Ok(SeasonOrder::Year),
        Some("start_date") => Ok(SeasonOrder::StartDate),
        Some(other) => Err(AppError::BadRequest(format!(
            "order_by must be 'year' or 'start_date', got '{other}'"
        ))),
    }
}

/// Query parameters for `GET /seasons`.
#[derive(Debug, Deserialize)]
pub struct SeasonListParams {
    pub after: Option<String>,
    pub before: Option<String>,
    pub order_by: Option<String>,
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for harvest listings (top-level and per-season).
#[derive(Debug, Deserialize)]
pub struct HarvestListParams {
    pub year: Option<i32>,
    pub season_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub fruit: Option<String>,
    pub after: Option<String>,
    pub before: Option<String>,
    /// price strictly greater than
    pub p_more: Option<Quantity>,
    /// price strictly less than
    pub p_less: Option<Quantity>,
    /// harvested strictly greater than
    pub h_more: Option<Quantity>,
    /// harvested strictly less than
    pub h_less: Option<Quantity>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for employee listings.
#[derive(Debug, Deserialize)]
pub struct EmployeeListParams {
    pub season_id: Option<i64>,
    pub harvest_id: Option<i64>,
    pub name: Option<String>,
    pub after: Option<String>,
    pub before: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /workdays`.
#[derive(Debug, Deserialize)]
pub struct WorkdayListParams {
    pub fruit: Option<String>,
    pub p_more: Option<Quantity>,
    pub p_less: Option<Quantity>,
    pub h_more: Option<Quantity>,
    pub h_less: Option<Quantity>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for expense listings.
#[derive(Debug, Deserialize)]
pub struct ExpenseListParams {
    pub season_id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub more: Option<Quantity>,
    pub less: Option<Quantity>,
    pub after: Option<String>,
    pub before: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET .../summary`.
#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub format: Option<String>,
}
