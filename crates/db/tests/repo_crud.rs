//! Integration tests for the repository layer against a real database:
//! the full entity hierarchy, cascade deletes, unique constraints, and the
//! harvest-employee link table.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use sqlx::PgPool;

use farmlog_core::fruit::Fruit;
use farmlog_core::types::{Date, Quantity};
use farmlog_db::models::harvest::HarvestFilter;
use farmlog_db::repositories::{
    EmployeeRepo, ExpenseRepo, HarvestRepo, SeasonRepo, UserRepo, WorkdayRepo,
};

fn q(s: &str) -> Quantity {
    BigDecimal::from_str(s).unwrap()
}

fn d(s: &str) -> Date {
    s.parse().unwrap()
}

async fn seed_owner(pool: &PgPool) -> i64 {
    UserRepo::create(pool, "grower", "not-a-real-hash")
        .await
        .unwrap()
        .id
}

#[sqlx::test(migrations = "./migrations")]
async fn test_full_hierarchy(pool: PgPool) {
    let owner = seed_owner(&pool).await;

    let season = SeasonRepo::create(&pool, owner, 2777, d("2777-05-22"), Some(d("2777-09-22")))
        .await
        .unwrap();
    assert_eq!(season.year, 2777);

    let harvest = HarvestRepo::create(
        &pool,
        season.id,
        owner,
        Fruit::Raspberry,
        d("2777-06-18"),
        &q("666"),
        &q("6"),
    )
    .await
    .unwrap();
    assert_eq!(harvest.fruit, Fruit::Raspberry);

    let employee = EmployeeRepo::create(&pool, season.id, owner, "Ala", d("2777-05-27"), None)
        .await
        .unwrap();

    let workday = WorkdayRepo::create(
        &pool,
        employee.id,
        harvest.id,
        owner,
        harvest.fruit,
        &q("120"),
        &q("3"),
    )
    .await
    .unwrap();
    assert_eq!(workday.fruit, Fruit::Raspberry);

    let expense = ExpenseRepo::create(&pool, season.id, owner, "fuel", d("2777-06-01"), &q("120"))
        .await
        .unwrap();
    assert_eq!(expense.kind, "fuel");

    // Round-trip through the owner-scoped finders.
    assert!(SeasonRepo::find_by_year(&pool, owner, 2777).await.unwrap().is_some());
    assert!(HarvestRepo::find_by_id(&pool, owner, harvest.id).await.unwrap().is_some());
    assert!(EmployeeRepo::find_by_id(&pool, owner, employee.id).await.unwrap().is_some());
    assert!(WorkdayRepo::find_by_id(&pool, owner, workday.id).await.unwrap().is_some());
    assert!(ExpenseRepo::find_by_id(&pool, owner, expense.id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_owner_scoping(pool: PgPool) {
    let owner = seed_owner(&pool).await;
    let other = UserRepo::create(&pool, "other", "not-a-real-hash")
        .await
        .unwrap()
        .id;

    let season = SeasonRepo::create(&pool, owner, 2777, d("2777-05-22"), None)
        .await
        .unwrap();
    let harvest = HarvestRepo::create(
        &pool,
        season.id,
        owner,
        Fruit::Apple,
        d("2777-06-01"),
        &q("100"),
        &q("2"),
    )
    .await
    .unwrap();

    // Another owner's id does not resolve the row.
    assert!(SeasonRepo::find_by_year(&pool, other, 2777).await.unwrap().is_none());
    assert!(HarvestRepo::find_by_id(&pool, other, harvest.id).await.unwrap().is_none());
    assert!(!HarvestRepo::delete(&pool, other, harvest.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unique_constraints(pool: PgPool) {
    let owner = seed_owner(&pool).await;

    // Duplicate username.
    let err = UserRepo::create(&pool, "grower", "hash").await.unwrap_err();
    assert_constraint(&err, "uq_users_username");

    // Second season for the same owner and year.
    SeasonRepo::create(&pool, owner, 2777, d("2777-05-22"), None)
        .await
        .unwrap();
    let err = SeasonRepo::create(&pool, owner, 2777, d("2777-06-01"), None)
        .await
        .unwrap_err();
    assert_constraint(&err, "uq_seasons_owner_year");

    // Same fruit twice on the same date in one season.
    let season = SeasonRepo::find_by_year(&pool, owner, 2777)
        .await
        .unwrap()
        .unwrap();
    HarvestRepo::create(&pool, season.id, owner, Fruit::Cherry, d("2777-06-01"), &q("10"), &q("4"))
        .await
        .unwrap();
    let err =
        HarvestRepo::create(&pool, season.id, owner, Fruit::Cherry, d("2777-06-01"), &q("20"), &q("5"))
            .await
            .unwrap_err();
    assert_constraint(&err, "uq_harvests_season_date_fruit");
}

fn assert_constraint(err: &sqlx::Error, expected: &str) {
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some(expected));
        }
        other => panic!("expected a unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_season_delete_cascades(pool: PgPool) {
    let owner = seed_owner(&pool).await;
    let season = SeasonRepo::create(&pool, owner, 2777, d("2777-05-22"), None)
        .await
        .unwrap();
    let harvest = HarvestRepo::create(
        &pool,
        season.id,
        owner,
        Fruit::Apple,
        d("2777-06-01"),
        &q("100"),
        &q("2"),
    )
    .await
    .unwrap();
    let employee = EmployeeRepo::create(&pool, season.id, owner, "Ala", d("2777-05-27"), None)
        .await
        .unwrap();
    let workday = WorkdayRepo::create(
        &pool,
        employee.id,
        harvest.id,
        owner,
        harvest.fruit,
        &q("50"),
        &q("2"),
    )
    .await
    .unwrap();
    HarvestRepo::link_employee(&pool, harvest.id, employee.id)
        .await
        .unwrap();

    assert!(SeasonRepo::delete(&pool, season.id).await.unwrap());

    assert!(HarvestRepo::find_by_id(&pool, owner, harvest.id).await.unwrap().is_none());
    assert!(EmployeeRepo::find_by_id(&pool, owner, employee.id).await.unwrap().is_none());
    assert!(WorkdayRepo::find_by_id(&pool, owner, workday.id).await.unwrap().is_none());

    let links: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM harvest_employees")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(links.0, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_link_employee_is_idempotent(pool: PgPool) {
    let owner = seed_owner(&pool).await;
    let season = SeasonRepo::create(&pool, owner, 2777, d("2777-05-22"), None)
        .await
        .unwrap();
    let harvest = HarvestRepo::create(
        &pool,
        season.id,
        owner,
        Fruit::Apple,
        d("2777-06-01"),
        &q("100"),
        &q("2"),
    )
    .await
    .unwrap();
    let employee = EmployeeRepo::create(&pool, season.id, owner, "Ala", d("2777-05-27"), None)
        .await
        .unwrap();

    HarvestRepo::link_employee(&pool, harvest.id, employee.id)
        .await
        .unwrap();
    HarvestRepo::link_employee(&pool, harvest.id, employee.id)
        .await
        .unwrap();

    let crew = EmployeeRepo::for_harvest(&pool, harvest.id).await.unwrap();
    assert_eq!(crew.len(), 1);

    // Replacement with an empty set clears the crew.
    HarvestRepo::replace_employee_links(&pool, harvest.id, &[])
        .await
        .unwrap();
    assert!(EmployeeRepo::for_harvest(&pool, harvest.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_harvest_list_filters_and_pagination(pool: PgPool) {
    let owner = seed_owner(&pool).await;
    let season = SeasonRepo::create(&pool, owner, 2777, d("2777-05-22"), None)
        .await
        .unwrap();

    for (fruit, date, harvested, price) in [
        (Fruit::Raspberry, "2777-06-18", "666", "6"),
        (Fruit::Raspberry, "2777-06-20", "100", "5"),
        (Fruit::Apple, "2777-07-01", "50", "2"),
    ] {
        HarvestRepo::create(&pool, season.id, owner, fruit, d(date), &q(harvested), &q(price))
            .await
            .unwrap();
    }

    let by_fruit = HarvestRepo::list(
        &pool,
        &HarvestFilter {
            owner_id: Some(owner),
            fruit: Some(Fruit::Raspberry),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_fruit.len(), 2);

    let expensive = HarvestRepo::list(
        &pool,
        &HarvestFilter {
            owner_id: Some(owner),
            price_more: Some(q("4")),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(expensive.len(), 2);

    // Newest date first, page size 1.
    let page = HarvestRepo::list(
        &pool,
        &HarvestFilter {
            owner_id: Some(owner),
            limit: Some(1),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].date, d("2777-07-01"));

    let by_year = HarvestRepo::list(
        &pool,
        &HarvestFilter {
            owner_id: Some(owner),
            year: Some(2778),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(by_year.is_empty());
}
