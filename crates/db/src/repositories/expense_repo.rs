//! Repository for the `expenses` table.

use farmlog_core::types::{Date, DbId, Quantity};
use sqlx::PgPool;

use crate::models::expense::{Expense, ExpenseFilter};
use crate::repositories::{clamp_limit, clamp_offset, BindValue, FilterBuilder};

const COLUMNS: &str = "id, season_id, owner_id, type, date, amount";

/// Provides CRUD operations for expenses.
pub struct ExpenseRepo;

impl ExpenseRepo {
    /// Insert a new expense under a season.
    pub async fn create(
        pool: &PgPool,
        season_id: DbId,
        owner_id: DbId,
        kind: &str,
        date: Date,
        amount: &Quantity,
    ) -> Result<Expense, sqlx::Error> {
        let query = format!(
            "INSERT INTO expenses (season_id, owner_id, type, date, amount)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(season_id)
            .bind(owner_id)
            .bind(kind)
            .bind(date)
            .bind(amount)
            .fetch_one(pool)
            .await
    }

    /// Find an expense by id, scoped to its owner.
    pub async fn find_by_id(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
    ) -> Result<Option<Expense>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM expenses WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// List expenses matching the filter, newest date first.
    pub async fn list(pool: &PgPool, filter: &ExpenseFilter) -> Result<Vec<Expense>, sqlx::Error> {
        let mut f = FilterBuilder::new();
        if let Some(owner_id) = filter.owner_id {
            f.push("owner_id = {}", BindValue::BigInt(owner_id));
        }
        if let Some(season_id) = filter.season_id {
            f.push("season_id = {}", BindValue::BigInt(season_id));
        }
        if let Some(ref kind) = filter.kind {
            f.push("type ILIKE {}", BindValue::Text(format!("%{kind}%")));
        }
        if let Some(after) = filter.after {
            f.push("date >= {}", BindValue::Date(after));
        }
        if let Some(before) = filter.before {
            f.push("date <= {}", BindValue::Date(before));
        }
        if let Some(ref more) = filter.more {
            f.push("amount > {}", BindValue::Decimal(more.clone()));
        }
        if let Some(ref less) = filter.less {
            f.push("amount < {}", BindValue::Decimal(less.clone()));
        }

        let limit_idx = f.next_idx();
        let query = format!(
            "SELECT {COLUMNS} FROM expenses {} ORDER BY date DESC, id \
             LIMIT ${limit_idx} OFFSET ${}",
            f.where_clause(),
            limit_idx + 1
        );

        f.bind_onto(sqlx::query_as::<_, Expense>(&query))
            .bind(clamp_limit(filter.limit))
            .bind(clamp_offset(filter.offset))
            .fetch_all(pool)
            .await
    }

    /// All expenses of one season in insertion order, for reports.
    pub async fn for_season(pool: &PgPool, season_id: DbId) -> Result<Vec<Expense>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM expenses WHERE season_id = $1 ORDER BY id");
        sqlx::query_as::<_, Expense>(&query)
            .bind(season_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite an expense's mutable fields, returning the new row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        kind: &str,
        date: Date,
        amount: &Quantity,
    ) -> Result<Option<Expense>, sqlx::Error> {
        let query = format!(
            "UPDATE expenses SET type = $2, date = $3, amount = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .bind(kind)
            .bind(date)
            .bind(amount)
            .fetch_optional(pool)
            .await
    }

    /// Delete an expense.
    pub async fn delete(pool: &PgPool, owner_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
