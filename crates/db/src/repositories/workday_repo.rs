//! Repository for the `workdays` table, including the joined projections
//! the report endpoints load.

use farmlog_core::fruit::Fruit;
use farmlog_core::types::{DbId, Quantity};
use sqlx::PgPool;

use crate::models::workday::{
    SeasonWorkdayRow, Workday, WorkdayFilter, WorkdayWithEmployee, WorkdayWithHarvest,
};
use crate::repositories::{clamp_limit, clamp_offset, BindValue, FilterBuilder};

const COLUMNS: &str = "id, employee_id, harvest_id, employer_id, fruit, harvested, pay_per_kg";

/// Provides CRUD operations for workdays.
pub struct WorkdayRepo;

impl WorkdayRepo {
    /// Insert a workday linking one employee to one harvest.
    ///
    /// `fruit` is denormalized from the harvest by the caller.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        pool: &PgPool,
        employee_id: DbId,
        harvest_id: DbId,
        employer_id: DbId,
        fruit: Fruit,
        harvested: &Quantity,
        pay_per_kg: &Quantity,
    ) -> Result<Workday, sqlx::Error> {
        let query = format!(
            "INSERT INTO workdays (employee_id, harvest_id, employer_id, fruit, harvested, pay_per_kg)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workday>(&query)
            .bind(employee_id)
            .bind(harvest_id)
            .bind(employer_id)
            .bind(fruit)
            .bind(harvested)
            .bind(pay_per_kg)
            .fetch_one(pool)
            .await
    }

    /// Find a workday by id, scoped to its employer.
    pub async fn find_by_id(
        pool: &PgPool,
        employer_id: DbId,
        id: DbId,
    ) -> Result<Option<Workday>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workdays WHERE id = $1 AND employer_id = $2");
        sqlx::query_as::<_, Workday>(&query)
            .bind(id)
            .bind(employer_id)
            .fetch_optional(pool)
            .await
    }

    /// List workdays matching the filter.
    pub async fn list(pool: &PgPool, filter: &WorkdayFilter) -> Result<Vec<Workday>, sqlx::Error> {
        let mut f = FilterBuilder::new();
        if let Some(employer_id) = filter.employer_id {
            f.push("employer_id = {}", BindValue::BigInt(employer_id));
        }
        if let Some(harvest_id) = filter.harvest_id {
            f.push("harvest_id = {}", BindValue::BigInt(harvest_id));
        }
        if let Some(employee_id) = filter.employee_id {
            f.push("employee_id = {}", BindValue::BigInt(employee_id));
        }
        if let Some(fruit) = filter.fruit {
            f.push("fruit = {}", BindValue::Text(fruit.as_str().to_string()));
        }
        if let Some(ref more) = filter.pay_more {
            f.push("pay_per_kg > {}", BindValue::Decimal(more.clone()));
        }
        if let Some(ref less) = filter.pay_less {
            f.push("pay_per_kg < {}", BindValue::Decimal(less.clone()));
        }
        if let Some(ref more) = filter.harvested_more {
            f.push("harvested > {}", BindValue::Decimal(more.clone()));
        }
        if let Some(ref less) = filter.harvested_less {
            f.push("harvested < {}", BindValue::Decimal(less.clone()));
        }

        let limit_idx = f.next_idx();
        let query = format!(
            "SELECT {COLUMNS} FROM workdays {} ORDER BY id \
             LIMIT ${limit_idx} OFFSET ${}",
            f.where_clause(),
            limit_idx + 1
        );

        f.bind_onto(sqlx::query_as::<_, Workday>(&query))
            .bind(clamp_limit(filter.limit))
            .bind(clamp_offset(filter.offset))
            .fetch_all(pool)
            .await
    }

    /// Plain workday rows of one harvest.
    pub async fn for_harvest(pool: &PgPool, harvest_id: DbId) -> Result<Vec<Workday>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workdays WHERE harvest_id = $1 ORDER BY id");
        sqlx::query_as::<_, Workday>(&query)
            .bind(harvest_id)
            .fetch_all(pool)
            .await
    }

    /// Plain workday rows of one employee.
    pub async fn for_employee(
        pool: &PgPool,
        employee_id: DbId,
    ) -> Result<Vec<Workday>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workdays WHERE employee_id = $1 ORDER BY id");
        sqlx::query_as::<_, Workday>(&query)
            .bind(employee_id)
            .fetch_all(pool)
            .await
    }

    /// Workdays of one harvest with employee names, for the harvest report.
    pub async fn with_employees_for_harvest(
        pool: &PgPool,
        harvest_id: DbId,
    ) -> Result<Vec<WorkdayWithEmployee>, sqlx::Error> {
        sqlx::query_as::<_, WorkdayWithEmployee>(
            "SELECT w.employee_id, e.name AS employee_name, w.harvested, w.pay_per_kg
             FROM workdays w
             JOIN employees e ON e.id = w.employee_id
             WHERE w.harvest_id = $1
             ORDER BY w.id",
        )
        .bind(harvest_id)
        .fetch_all(pool)
        .await
    }

    /// Workdays of one employee with harvest dates, for the employee report.
    pub async fn with_harvests_for_employee(
        pool: &PgPool,
        employee_id: DbId,
    ) -> Result<Vec<WorkdayWithHarvest>, sqlx::Error> {
        sqlx::query_as::<_, WorkdayWithHarvest>(
            "SELECT w.harvest_id, h.date AS harvest_date, w.fruit, w.harvested, w.pay_per_kg
             FROM workdays w
             JOIN harvests h ON h.id = w.harvest_id
             WHERE w.employee_id = $1
             ORDER BY w.id",
        )
        .bind(employee_id)
        .fetch_all(pool)
        .await
    }

    /// Every workday of a season's employees, for the season report.
    pub async fn for_season(
        pool: &PgPool,
        season_id: DbId,
    ) -> Result<Vec<SeasonWorkdayRow>, sqlx::Error> {
        sqlx::query_as::<_, SeasonWorkdayRow>(
            "SELECT w.employee_id, w.harvest_id, h.date AS harvest_date,
                    w.fruit, w.harvested, w.pay_per_kg
             FROM workdays w
             JOIN employees e ON e.id = w.employee_id
             JOIN harvests h ON h.id = w.harvest_id
             WHERE e.season_id = $1
             ORDER BY w.id",
        )
        .bind(season_id)
        .fetch_all(pool)
        .await
    }

    /// Overwrite a workday's quantity and pay rate, returning the new row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        harvested: &Quantity,
        pay_per_kg: &Quantity,
    ) -> Result<Option<Workday>, sqlx::Error> {
        let query = format!(
            "UPDATE workdays SET harvested = $2, pay_per_kg = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workday>(&query)
            .bind(id)
            .bind(harvested)
            .bind(pay_per_kg)
            .fetch_optional(pool)
            .await
    }

    /// Delete a workday.
    pub async fn delete(pool: &PgPool, employer_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workdays WHERE id = $1 AND employer_id = $2")
            .bind(id)
            .bind(employer_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
