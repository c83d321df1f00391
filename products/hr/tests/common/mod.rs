#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use entity::employee::{self, Attrition, Gender};
use migration::{Migrator, MigratorTrait};
use platform_db::{DatabaseSettings, DbPool};
use products_hr::employees;
use products_hr::validation::{EmployeeInput, today};

pub async fn setup_db() -> DbPool {
    let pool = platform_db::connect(&DatabaseSettings::in_memory())
        .await
        .unwrap();
    Migrator::up(&pool, None).await.unwrap();
    pool
}

pub fn days_ago(days: i64) -> NaiveDate {
    today() - Duration::days(days)
}

pub fn input(emp_code: &str, department: &str) -> EmployeeInput {
    EmployeeInput {
        emp_code: emp_code.to_string(),
        name: format!("Staff {emp_code}"),
        department: department.to_string(),
        gender: Gender::Female,
        age: 31,
        salary: 70_000.0,
        attrition: Attrition::No,
        join_date: days_ago(700),
    }
}

pub async fn hire(db: &DbPool, emp_code: &str, department: &str) -> employee::Model {
    employees::create_employee(db, input(emp_code, department))
        .await
        .unwrap()
}
