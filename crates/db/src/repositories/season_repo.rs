//! Repository for the `seasons` table.

use farmlog_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::season::{Season, SeasonFilter};
use crate::repositories::{clamp_limit, clamp_offset, BindValue, FilterBuilder};

const COLUMNS: &str = "id, owner_id, year, start_date, end_date";

/// Provides CRUD operations for seasons.
pub struct SeasonRepo;

impl SeasonRepo {
    /// Insert a new season. The caller derives `year` from `start_date`.
    ///
    /// A second season for the same `(owner_id, year)` violates
    /// `uq_seasons_owner_year` and surfaces as a conflict.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        year: i32,
        start_date: Date,
        end_date: Option<Date>,
    ) -> Result<Season, sqlx::Error> {
        let query = format!(
            "INSERT INTO seasons (owner_id, year, start_date, end_date)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Season>(&query)
            .bind(owner_id)
            .bind(year)
            .bind(start_date)
            .bind(end_date)
            .fetch_one(pool)
            .await
    }

    /// Find an owner's season by year.
    pub async fn find_by_year(
        pool: &PgPool,
        owner_id: DbId,
        year: i32,
    ) -> Result<Option<Season>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM seasons WHERE owner_id = $1 AND year = $2");
        sqlx::query_as::<_, Season>(&query)
            .bind(owner_id)
            .bind(year)
            .fetch_optional(pool)
            .await
    }

    /// Find a season by id regardless of owner (admin surface).
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Season>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM seasons WHERE id = $1");
        sqlx::query_as::<_, Season>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List seasons matching the filter, ordered and paginated.
    pub async fn list(pool: &PgPool, filter: &SeasonFilter) -> Result<Vec<Season>, sqlx::Error> {
        let mut f = FilterBuilder::new();
        if let Some(owner_id) = filter.owner_id {
            f.push("owner_id = {}", BindValue::BigInt(owner_id));
        }
        if let Some(after) = filter.after {
            f.push("start_date >= {}", BindValue::Date(after));
        }
        if let Some(before) = filter.before {
            f.push("start_date <= {}", BindValue::Date(before));
        }

        let direction = if filter.descending { "DESC" } else { "ASC" };
        let order_col = filter.order_by.column();
        let limit_idx = f.next_idx();
        let query = format!(
            "SELECT {COLUMNS} FROM seasons {} ORDER BY {order_col} {direction} \
             LIMIT ${limit_idx} OFFSET ${}",
            f.where_clause(),
            limit_idx + 1
        );

        f.bind_onto(sqlx::query_as::<_, Season>(&query))
            .bind(clamp_limit(filter.limit))
            .bind(clamp_offset(filter.offset))
            .fetch_all(pool)
            .await
    }

    /// List every season of every owner (admin surface).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Season>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM seasons ORDER BY owner_id, year");
        sqlx::query_as::<_, Season>(&query).fetch_all(pool).await
    }

    /// Overwrite a season's dates and derived year, returning the new row.
    pub async fn update_dates(
        pool: &PgPool,
        id: DbId,
        year: i32,
        start_date: Date,
        end_date: Option<Date>,
    ) -> Result<Option<Season>, sqlx::Error> {
        let query = format!(
            "UPDATE seasons SET year = $2, start_date = $3, end_date = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Season>(&query)
            .bind(id)
            .bind(year)
            .bind(start_date)
            .bind(end_date)
            .fetch_optional(pool)
            .await
    }

    /// Delete a season; dependent records go with it via FK cascades.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM seasons WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every season (admin surface). Returns the number removed.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM seasons").execute(pool).await?;
        Ok(result.rows_affected())
    }
}
