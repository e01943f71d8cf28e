//! Repository for the `harvests` table and the harvest-employee join table.

use farmlog_core::fruit::Fruit;
use farmlog_core::types::{Date, DbId, Quantity};
use sqlx::PgPool;

use crate::models::harvest::{Harvest, HarvestFilter};
use crate::repositories::{clamp_limit, clamp_offset, BindValue, FilterBuilder};

const COLUMNS: &str = "id, season_id, owner_id, fruit, date, harvested, price";

/// Provides CRUD operations for harvests and their employee links.
pub struct HarvestRepo;

impl HarvestRepo {
    /// Insert a new harvest under a season.
    ///
    /// A duplicate `(season_id, date, fruit)` violates
    /// `uq_harvests_season_date_fruit` and surfaces as a conflict.
    pub async fn create(
        pool: &PgPool,
        season_id: DbId,
        owner_id: DbId,
        fruit: Fruit,
        date: Date,
        harvested: &Quantity,
        price: &Quantity,
    ) -> Result<Harvest, sqlx::Error> {
        let query = format!(
            "INSERT INTO harvests (season_id, owner_id, fruit, date, harvested, price)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Harvest>(&query)
            .bind(season_id)
            .bind(owner_id)
            .bind(fruit)
            .bind(date)
            .bind(harvested)
            .bind(price)
            .fetch_one(pool)
            .await
    }

    /// Find a harvest by id, scoped to its owner.
    pub async fn find_by_id(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
    ) -> Result<Option<Harvest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM harvests WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Harvest>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// List harvests matching the filter, newest date first.
    pub async fn list(pool: &PgPool, filter: &HarvestFilter) -> Result<Vec<Harvest>, sqlx::Error> {
        let mut f = FilterBuilder::new();
        if let Some(owner_id) = filter.owner_id {
            f.push("owner_id = {}", BindValue::BigInt(owner_id));
        }
        if let Some(season_id) = filter.season_id {
            f.push("season_id = {}", BindValue::BigInt(season_id));
        }
        if let Some(year) = filter.year {
            f.push(
                "season_id IN (SELECT id FROM seasons WHERE year = {})",
                BindValue::Int(year),
            );
        }
        if let Some(employee_id) = filter.employee_id {
            f.push(
                "id IN (SELECT harvest_id FROM harvest_employees WHERE employee_id = {})",
                BindValue::BigInt(employee_id),
            );
        }
        if let Some(fruit) = filter.fruit {
            f.push("fruit = {}", BindValue::Text(fruit.as_str().to_string()));
        }
        if let Some(after) = filter.after {
            f.push("date >= {}", BindValue::Date(after));
        }
        if let Some(before) = filter.before {
            f.push("date <= {}", BindValue::Date(before));
        }
        if let Some(ref more) = filter.price_more {
            f.push("price > {}", BindValue::Decimal(more.clone()));
        }
        if let Some(ref less) = filter.price_less {
            f.push("price < {}", BindValue::Decimal(less.clone()));
        }
        if let Some(ref more) = filter.harvested_more {
            f.push("harvested > {}", BindValue::Decimal(more.clone()));
        }
        if let Some(ref less) = filter.harvested_less {
            f.push("harvested < {}", BindValue::Decimal(less.clone()));
        }

        let limit_idx = f.next_idx();
        let query = format!(
            "SELECT {COLUMNS} FROM harvests {} ORDER BY date DESC, id \
             LIMIT ${limit_idx} OFFSET ${}",
            f.where_clause(),
            limit_idx + 1
        );

        f.bind_onto(sqlx::query_as::<_, Harvest>(&query))
            .bind(clamp_limit(filter.limit))
            .bind(clamp_offset(filter.offset))
            .fetch_all(pool)
            .await
    }

    /// Harvests linked to one employee through the join table.
    pub async fn for_employee(
        pool: &PgPool,
        employee_id: DbId,
    ) -> Result<Vec<Harvest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM harvests
             WHERE id IN (SELECT harvest_id FROM harvest_employees WHERE employee_id = $1)
             ORDER BY id"
        );
        sqlx::query_as::<_, Harvest>(&query)
            .bind(employee_id)
            .fetch_all(pool)
            .await
    }

    /// All harvests of one season in insertion order, for reports.
    pub async fn for_season(pool: &PgPool, season_id: DbId) -> Result<Vec<Harvest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM harvests WHERE season_id = $1 ORDER BY id");
        sqlx::query_as::<_, Harvest>(&query)
            .bind(season_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite a harvest's mutable fields, returning the new row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        fruit: Fruit,
        date: Date,
        harvested: &Quantity,
        price: &Quantity,
    ) -> Result<Option<Harvest>, sqlx::Error> {
        let query = format!(
            "UPDATE harvests SET fruit = $2, date = $3, harvested = $4, price = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Harvest>(&query)
            .bind(id)
            .bind(fruit)
            .bind(date)
            .bind(harvested)
            .bind(price)
            .fetch_optional(pool)
            .await
    }

    /// Delete a harvest; its workdays and join rows cascade.
    pub async fn delete(pool: &PgPool, owner_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM harvests WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Link an employee to a harvest; linking twice is a no-op.
    pub async fn link_employee(
        pool: &PgPool,
        harvest_id: DbId,
        employee_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO harvest_employees (harvest_id, employee_id)
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(harvest_id)
        .bind(employee_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Replace a harvest's employee links with the given set.
    pub async fn replace_employee_links(
        pool: &PgPool,
        harvest_id: DbId,
        employee_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM harvest_employees WHERE harvest_id = $1")
            .bind(harvest_id)
            .execute(&mut *tx)
            .await?;
        for employee_id in employee_ids {
            sqlx::query(
                "INSERT INTO harvest_employees (harvest_id, employee_id)
                 VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(harvest_id)
            .bind(employee_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await
    }
}
