//! Repository structs, one per table.
//!
//! Repositories are stateless unit structs with associated async functions
//! taking `&PgPool`. List queries build their WHERE clause from a filter
//! struct via the `conditions` + [`BindValue`] pattern, so every placeholder
//! stays a bound parameter.

mod employee_repo;
mod expense_repo;
mod filter;
mod harvest_repo;
mod season_repo;
mod user_repo;
mod workday_repo;

pub use employee_repo::EmployeeRepo;
pub use expense_repo::ExpenseRepo;
pub use harvest_repo::HarvestRepo;
pub use season_repo::SeasonRepo;
pub use user_repo::UserRepo;
pub use workday_repo::WorkdayRepo;

pub(crate) use filter::{clamp_limit, clamp_offset, BindValue, FilterBuilder};
