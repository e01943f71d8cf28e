//! Repository for the `employees` table.

use farmlog_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::employee::{Employee, EmployeeFilter};
use crate::repositories::{clamp_limit, clamp_offset, BindValue, FilterBuilder};

const COLUMNS: &str = "id, season_id, employer_id, name, start_date, end_date";

/// Provides CRUD operations for employees.
pub struct EmployeeRepo;

impl EmployeeRepo {
    /// Insert a new employee under a season.
    pub async fn create(
        pool: &PgPool,
        season_id: DbId,
        employer_id: DbId,
        name: &str,
        start_date: Date,
        end_date: Option<Date>,
    ) -> Result<Employee, sqlx::Error> {
        let query = format!(
            "INSERT INTO employees (season_id, employer_id, name, start_date, end_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(season_id)
            .bind(employer_id)
            .bind(name)
            .bind(start_date)
            .bind(end_date)
            .fetch_one(pool)
            .await
    }

    /// Find an employee by id, scoped to their employer.
    pub async fn find_by_id(
        pool: &PgPool,
        employer_id: DbId,
        id: DbId,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE id = $1 AND employer_id = $2");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(employer_id)
            .fetch_optional(pool)
            .await
    }

    /// List employees matching the filter.
    pub async fn list(
        pool: &PgPool,
        filter: &EmployeeFilter,
    ) -> Result<Vec<Employee>, sqlx::Error> {
        let mut f = FilterBuilder::new();
        if let Some(employer_id) = filter.employer_id {
            f.push("employer_id = {}", BindValue::BigInt(employer_id));
        }
        if let Some(season_id) = filter.season_id {
            f.push("season_id = {}", BindValue::BigInt(season_id));
        }
        if let Some(harvest_id) = filter.harvest_id {
            f.push(
                "id IN (SELECT employee_id FROM harvest_employees WHERE harvest_id = {})",
                BindValue::BigInt(harvest_id),
            );
        }
        if let Some(ref name) = filter.name {
            f.push("name ILIKE {}", BindValue::Text(format!("%{name}%")));
        }
        if let Some(after) = filter.after {
            f.push("start_date >= {}", BindValue::Date(after));
        }
        if let Some(before) = filter.before {
            f.push("start_date <= {}", BindValue::Date(before));
        }

        let limit_idx = f.next_idx();
        let query = format!(
            "SELECT {COLUMNS} FROM employees {} ORDER BY id \
             LIMIT ${limit_idx} OFFSET ${}",
            f.where_clause(),
            limit_idx + 1
        );

        f.bind_onto(sqlx::query_as::<_, Employee>(&query))
            .bind(clamp_limit(filter.limit))
            .bind(clamp_offset(filter.offset))
            .fetch_all(pool)
            .await
    }

    /// Employees linked to one harvest through the join table.
    pub async fn for_harvest(
        pool: &PgPool,
        harvest_id: DbId,
    ) -> Result<Vec<Employee>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM employees
             WHERE id IN (SELECT employee_id FROM harvest_employees WHERE harvest_id = $1)
             ORDER BY id"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(harvest_id)
            .fetch_all(pool)
            .await
    }

    /// All employees of one season in insertion order, for reports.
    pub async fn for_season(pool: &PgPool, season_id: DbId) -> Result<Vec<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE season_id = $1 ORDER BY id");
        sqlx::query_as::<_, Employee>(&query)
            .bind(season_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite an employee's mutable fields, returning the new row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        name: &str,
        start_date: Date,
        end_date: Option<Date>,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!(
            "UPDATE employees SET name = $2, start_date = $3, end_date = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(name)
            .bind(start_date)
            .bind(end_date)
            .fetch_optional(pool)
            .await
    }

    /// Delete an employee; their workdays and join rows cascade.
    pub async fn delete(pool: &PgPool, employer_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1 AND employer_id = $2")
            .bind(id)
            .bind(employer_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
