//! Derived-metric computation behind the `/summary` endpoints.
//!
//! Handlers load an aggregate subgraph (season + harvests + employees +
//! expenses, or a single harvest/employee with its workdays) and hand plain
//! record structs to the pure functions here; nothing in this module touches
//! the database. Every "best X" selection is a linear max-scan that keeps the
//! first maximum encountered, so ties resolve in query order.
//!
//! A quantity-weighted average over zero workdays is defined as zero rather
//! than an error; the corresponding `best_*` fields are `None`.

use std::collections::{BTreeMap, BTreeSet};

use bigdecimal::Zero;
use serde::Serialize;

use crate::fruit::Fruit;
use crate::types::{Date, DbId, Quantity};

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

/// One harvest row, as loaded for a season report.
#[derive(Debug, Clone)]
pub struct HarvestRecord {
    pub id: DbId,
    pub fruit: Fruit,
    pub date: Date,
    pub harvested: Quantity,
    pub price: Quantity,
}

/// One workday row attached to an employee.
#[derive(Debug, Clone)]
pub struct WorkdayRecord {
    pub harvest_id: DbId,
    pub harvest_date: Date,
    pub fruit: Fruit,
    pub harvested: Quantity,
    pub pay_per_kg: Quantity,
}

/// An employee together with their loaded workdays.
#[derive(Debug, Clone)]
pub struct EmployeeRecord {
    pub id: DbId,
    pub name: String,
    pub workdays: Vec<WorkdayRecord>,
}

/// One workday row attached to a harvest, with the employee resolved.
#[derive(Debug, Clone)]
pub struct CrewWorkday {
    pub employee_id: DbId,
    pub employee_name: String,
    pub harvested: Quantity,
    pub pay_per_kg: Quantity,
}

// ---------------------------------------------------------------------------
// Season summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct BestHarvest {
    pub id: DbId,
    pub date: Date,
    pub fruit: Fruit,
    pub harvested_value: Quantity,
}

#[derive(Debug, Clone, Serialize)]
pub struct BestEmployee {
    pub id: DbId,
    pub name: String,
    pub harvested: Quantity,
}

#[derive(Debug, Serialize)]
pub struct SeasonSummary {
    pub fruits: Vec<Fruit>,
    pub harvested_per_fruit: BTreeMap<Fruit, Quantity>,
    pub value_per_fruit: BTreeMap<Fruit, Quantity>,
    pub total_harvested_value: Quantity,
    pub total_expenses_value: Quantity,
    pub total_employee_payments: Quantity,
    pub best_harvest: Option<BestHarvest>,
    pub best_employee: Option<BestEmployee>,
    pub best_employee_per_fruit: BTreeMap<Fruit, BestEmployee>,
}

/// Aggregate a season's loaded harvests, employees and expense amounts.
pub fn season_summary(
    harvests: &[HarvestRecord],
    employees: &[EmployeeRecord],
    expense_amounts: &[Quantity],
) -> SeasonSummary {
    let fruits: BTreeSet<Fruit> = harvests.iter().map(|h| h.fruit).collect();

    let mut harvested_per_fruit: BTreeMap<Fruit, Quantity> = BTreeMap::new();
    let mut value_per_fruit: BTreeMap<Fruit, Quantity> = BTreeMap::new();
    let mut total_harvested_value = Quantity::zero();
    for h in harvests {
        let value = &h.harvested * &h.price;
        *harvested_per_fruit.entry(h.fruit).or_insert_with(Quantity::zero) += &h.harvested;
        *value_per_fruit.entry(h.fruit).or_insert_with(Quantity::zero) += &value;
        total_harvested_value += value;
    }

    let total_expenses_value = expense_amounts.iter().sum();

    let total_employee_payments = employees
        .iter()
        .map(employee_earnings)
        .sum();

    let best_harvest = max_by_first(harvests, |h| &h.harvested * &h.price).map(|(h, value)| {
        BestHarvest {
            id: h.id,
            date: h.date,
            fruit: h.fruit,
            harvested_value: value,
        }
    });

    let best_employee =
        max_by_first(employees, employee_harvested).map(|(e, harvested)| BestEmployee {
            id: e.id,
            name: e.name.clone(),
            harvested,
        });

    let mut best_employee_per_fruit = BTreeMap::new();
    for fruit in &fruits {
        let best = max_by_first(employees, |e| employee_harvested_of(e, *fruit));
        if let Some((e, harvested)) = best {
            best_employee_per_fruit.insert(
                *fruit,
                BestEmployee {
                    id: e.id,
                    name: e.name.clone(),
                    harvested,
                },
            );
        }
    }

    SeasonSummary {
        fruits: fruits.into_iter().collect(),
        harvested_per_fruit,
        value_per_fruit,
        total_harvested_value,
        total_expenses_value,
        total_employee_payments,
        best_harvest,
        best_employee,
        best_employee_per_fruit,
    }
}

// ---------------------------------------------------------------------------
// Harvest summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CrewShare {
    pub id: DbId,
    pub name: String,
    pub harvested: Quantity,
    pub pay_per_kg: Quantity,
    pub earned: Quantity,
}

#[derive(Debug, Serialize)]
pub struct HarvestSummary {
    pub date: Date,
    pub fruit: Fruit,
    pub harvested_all: Quantity,
    pub harvested_by_employees: Quantity,
    pub self_harvested: Quantity,
    pub price_per_kg: Quantity,
    pub avg_pay_per_kg: Quantity,
    pub total_profits: Quantity,
    pub harvested_by_emp_profits: Quantity,
    pub self_harvested_profits: Quantity,
    pub total_paid: Quantity,
    pub net_profit: Quantity,
    pub best_employee: Option<CrewShare>,
    pub harvested_per_employee: Vec<CrewShare>,
}

/// Aggregate one harvest and its workday links.
pub fn harvest_summary(harvest: &HarvestRecord, crew: &[CrewWorkday]) -> HarvestSummary {
    let harvested_by_employees: Quantity = crew.iter().map(|w| &w.harvested).sum();
    let total_paid: Quantity = crew.iter().map(|w| &w.harvested * &w.pay_per_kg).sum();

    // Quantity-weighted average; zero when nobody worked this harvest.
    let avg_pay_per_kg = if harvested_by_employees.is_zero() {
        Quantity::zero()
    } else {
        &total_paid / &harvested_by_employees
    };

    let harvested_per_employee: Vec<CrewShare> = crew
        .iter()
        .map(|w| CrewShare {
            id: w.employee_id,
            name: w.employee_name.clone(),
            harvested: w.harvested.clone(),
            pay_per_kg: w.pay_per_kg.clone(),
            earned: &w.harvested * &w.pay_per_kg,
        })
        .collect();

    let best_employee = max_by_first(&harvested_per_employee, |s| s.harvested.clone())
        .map(|(share, _)| share.clone());

    let total_profits = &harvest.harvested * &harvest.price;
    let self_harvested = &harvest.harvested - &harvested_by_employees;

    HarvestSummary {
        date: harvest.date,
        fruit: harvest.fruit,
        harvested_all: harvest.harvested.clone(),
        harvested_by_employees: harvested_by_employees.clone(),
        self_harvested: self_harvested.clone(),
        price_per_kg: harvest.price.clone(),
        avg_pay_per_kg,
        harvested_by_emp_profits: &harvested_by_employees * &harvest.price,
        self_harvested_profits: &self_harvested * &harvest.price,
        net_profit: &total_profits - &total_paid,
        total_profits,
        total_paid,
        best_employee,
        harvested_per_employee,
    }
}

// ---------------------------------------------------------------------------
// Employee summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct HistoryRow {
    pub harvest_id: DbId,
    pub date: Date,
    pub fruit: Fruit,
    pub harvested: Quantity,
    pub pay_per_kg: Quantity,
    pub earned: Quantity,
}

#[derive(Debug, Serialize)]
pub struct EmployeeSummary {
    pub id: DbId,
    pub name: String,
    pub fruits: Vec<Fruit>,
    pub harvested_per_fruit: BTreeMap<Fruit, Quantity>,
    pub earned_per_fruit: BTreeMap<Fruit, Quantity>,
    pub total_harvested: Quantity,
    pub total_earnings: Quantity,
    pub harvests_history: Vec<HistoryRow>,
    pub best_workday: Option<HistoryRow>,
}

/// Aggregate one employee's workday history.
pub fn employee_summary(employee: &EmployeeRecord) -> EmployeeSummary {
    let fruits: BTreeSet<Fruit> = employee.workdays.iter().map(|w| w.fruit).collect();

    let mut harvested_per_fruit: BTreeMap<Fruit, Quantity> = BTreeMap::new();
    let mut earned_per_fruit: BTreeMap<Fruit, Quantity> = BTreeMap::new();
    for w in &employee.workdays {
        *harvested_per_fruit.entry(w.fruit).or_insert_with(Quantity::zero) += &w.harvested;
        *earned_per_fruit.entry(w.fruit).or_insert_with(Quantity::zero) +=
            &w.harvested * &w.pay_per_kg;
    }

    let harvests_history: Vec<HistoryRow> = employee
        .workdays
        .iter()
        .map(|w| HistoryRow {
            harvest_id: w.harvest_id,
            date: w.harvest_date,
            fruit: w.fruit,
            harvested: w.harvested.clone(),
            pay_per_kg: w.pay_per_kg.clone(),
            earned: &w.harvested * &w.pay_per_kg,
        })
        .collect();

    let best_workday =
        max_by_first(&harvests_history, |r| r.harvested.clone()).map(|(row, _)| row.clone());

    EmployeeSummary {
        id: employee.id,
        name: employee.name.clone(),
        fruits: fruits.into_iter().collect(),
        total_harvested: employee_harvested(employee),
        total_earnings: employee_earnings(employee),
        harvested_per_fruit,
        earned_per_fruit,
        harvests_history,
        best_workday,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn employee_harvested(e: &EmployeeRecord) -> Quantity {
    e.workdays.iter().map(|w| &w.harvested).sum()
}

fn employee_harvested_of(e: &EmployeeRecord, fruit: Fruit) -> Quantity {
    e.workdays
        .iter()
        .filter(|w| w.fruit == fruit)
        .map(|w| &w.harvested)
        .sum()
}

fn employee_earnings(e: &EmployeeRecord) -> Quantity {
    e.workdays
        .iter()
        .map(|w| &w.harvested * &w.pay_per_kg)
        .sum()
}

/// Linear max-scan keeping the first maximum; `None` on an empty slice.
fn max_by_first<T, F>(items: &[T], mut key: F) -> Option<(&T, Quantity)>
where
    F: FnMut(&T) -> Quantity,
{
    let mut best: Option<(&T, Quantity)> = None;
    for item in items {
        let k = key(item);
        match &best {
            Some((_, current)) if k <= *current => {}
            _ => best = Some((item, k)),
        }
    }
    best
}
