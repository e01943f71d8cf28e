/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Calendar dates (season bounds, harvest dates) carry no time component.
pub type Date = chrono::NaiveDate;

/// Quantities, prices and money amounts map to NUMERIC columns.
pub type Quantity = bigdecimal::BigDecimal;
