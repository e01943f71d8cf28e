//! Field-range checks applied to write payloads.
//!
//! The limits mirror the original API contract: harvest prices in
//! [0.5, 100], harvest quantities in [1, 5000], workday quantities in
//! [3, 500], pay rates in [1.5, 10], expense amounts in [10, 100000].

use bigdecimal::{BigDecimal, FromPrimitive};

use crate::error::CoreError;
use crate::types::Quantity;

fn dec(value: f64) -> BigDecimal {
    // Limits are exact one-decimal values, so f64 conversion is lossless.
    BigDecimal::from_f64(value).unwrap_or_default()
}

fn check_range(field: &str, value: &Quantity, min: f64, max: f64) -> Result<(), CoreError> {
    if *value < dec(min) || *value > dec(max) {
        return Err(CoreError::Validation(format!(
            "{field} must be between {min} and {max}"
        )));
    }
    Ok(())
}

pub fn harvest_price(price: &Quantity) -> Result<(), CoreError> {
    check_range("price", price, 0.5, 100.0)
}

pub fn harvest_quantity(harvested: &Quantity) -> Result<(), CoreError> {
    check_range("harvested", harvested, 1.0, 5000.0)
}

pub fn workday_quantity(harvested: &Quantity) -> Result<(), CoreError> {
    check_range("harvested", harvested, 3.0, 500.0)
}

pub fn workday_pay(pay_per_kg: &Quantity) -> Result<(), CoreError> {
    check_range("pay_per_kg", pay_per_kg, 1.5, 10.0)
}

pub fn expense_amount(amount: &Quantity) -> Result<(), CoreError> {
    check_range("amount", amount, 10.0, 100_000.0)
}

pub fn employee_name(name: &str) -> Result<(), CoreError> {
    let len = name.chars().count();
    if !(2..=100).contains(&len) {
        return Err(CoreError::Validation(
            "name must be between 2 and 100 characters".into(),
        ));
    }
    Ok(())
}

pub fn username(name: &str) -> Result<(), CoreError> {
    let len = name.chars().count();
    if !(2..=100).contains(&len) {
        return Err(CoreError::Validation(
            "username must be between 2 and 100 characters".into(),
        ));
    }
    Ok(())
}

pub fn expense_type(kind: &str) -> Result<(), CoreError> {
    let len = kind.chars().count();
    if !(2..=30).contains(&len) {
        return Err(CoreError::Validation(
            "type must be between 2 and 30 characters".into(),
        ));
    }
    Ok(())
}
