//! Dynamic WHERE-clause assembly for list queries.
//!
//! Conditions are collected as `column <op> $n` fragments with their values
//! side by side, then joined into a single clause. Values are always bound,
//! never interpolated.

use farmlog_core::types::{Date, Quantity};
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::Postgres;

/// Default page size when the client sends no `limit`.
const DEFAULT_LIMIT: i64 = 10;
/// Hard ceiling on page size.
const MAX_LIMIT: i64 = 100;

pub(crate) fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

pub(crate) fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// A value awaiting its bind slot.
#[derive(Debug, Clone)]
pub(crate) enum BindValue {
    BigInt(i64),
    Int(i32),
    Text(String),
    Date(Date),
    Decimal(Quantity),
}

/// Collects `column <op> $n` fragments and their bind values.
#[derive(Debug, Default)]
pub(crate) struct FilterBuilder {
    conditions: Vec<String>,
    values: Vec<BindValue>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `fragment` with one bind slot; `{}` marks where `$n` goes.
    pub fn push(&mut self, fragment: &str, value: BindValue) {
        let idx = self.values.len() + 1;
        self.conditions.push(fragment.replace("{}", &format!("${idx}")));
        self.values.push(value);
    }

    /// Next free placeholder index (for LIMIT/OFFSET appended by the caller).
    pub fn next_idx(&self) -> usize {
        self.values.len() + 1
    }

    /// Render the WHERE clause; empty string when no condition was added.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Bind the collected values onto a `query_as`, in insertion order.
    pub fn bind_onto<'q, T>(
        &self,
        mut query: QueryAs<'q, Postgres, T, PgArguments>,
    ) -> QueryAs<'q, Postgres, T, PgArguments> {
        for value in &self.values {
            query = match value {
                BindValue::BigInt(v) => query.bind(*v),
                BindValue::Int(v) => query.bind(*v),
                BindValue::Text(v) => query.bind(v.clone()),
                BindValue::Date(v) => query.bind(*v),
                BindValue::Decimal(v) => query.bind(v.clone()),
            };
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builder_has_no_where_clause() {
        let f = FilterBuilder::new();
        assert_eq!(f.where_clause(), "");
        assert_eq!(f.next_idx(), 1);
    }

    #[test]
    fn placeholders_number_sequentially() {
        let mut f = FilterBuilder::new();
        f.push("owner_id = {}", BindValue::BigInt(7));
        f.push("date >= {}", BindValue::Date("2777-05-22".parse().unwrap()));
        assert_eq!(f.where_clause(), "WHERE owner_id = $1 AND date >= $2");
        assert_eq!(f.next_idx(), 3);
    }

    #[test]
    fn limits_are_clamped() {
        assert_eq!(clamp_limit(None), 10);
        assert_eq!(clamp_limit(Some(1000)), 100);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_offset(Some(-5)), 0);
    }
}
