//! Sample data generator for local development and demos.
//!
//! All randomness flows through the caller's [`Rng`], so a seeded generator
//! reproduces the same dataset.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use entity::attendance::{self, Status};
use entity::attrition_record::{self, ExitReason};
use entity::employee::{self, Attrition, Gender};
use entity::leave_record::{self, LeaveType};
use rand::Rng;
use rand::seq::SliceRandom;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{Instrument, info, info_span};

use crate::error::HrResult;

pub const DEPARTMENTS: [&str; 8] = [
    "Engineering",
    "Sales",
    "Marketing",
    "HR",
    "Finance",
    "Operations",
    "Product",
    "Support",
];

const FIRST_NAMES: [&str; 24] = [
    "Aisha", "Bruno", "Chen", "Dara", "Elif", "Farid", "Greta", "Hiro", "Ines", "Jonas", "Kemi",
    "Luca", "Maya", "Nikhil", "Olga", "Pablo", "Quinn", "Rosa", "Sven", "Tara", "Umar", "Vera",
    "Wen", "Yusuf",
];

const LAST_NAMES: [&str; 20] = [
    "Abara", "Berg", "Castillo", "Dubois", "Eriksen", "Fontaine", "Gupta", "Haddad", "Ivanova",
    "Jensen", "Kowalski", "Lindqvist", "Moreau", "Nakamura", "Okoye", "Petrov", "Rossi", "Silva",
    "Tanaka", "Weber",
];

const ATTENDANCE_DAYS: i64 = 90;
const INSERT_CHUNK: usize = 500;

#[derive(Clone, Copy, Debug)]
pub struct SeedOptions {
    /// Remove every existing record first.
    pub clear: bool,
    pub today: NaiveDate,
}

impl SeedOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            clear: false,
            today,
        }
    }

    pub fn clear(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub departments: usize,
    pub employees: usize,
    pub attendance: usize,
    pub leaves: usize,
    pub exits: usize,
}

/// Generate a full sample dataset inside one transaction.
pub async fn generate_sample_data<R>(
    db: &DatabaseConnection,
    rng: &mut R,
    options: SeedOptions,
) -> HrResult<SeedReport>
where
    R: Rng + Send,
{
    let span = info_span!("hr.seed", clear = options.clear);
    async move {
        let txn = db.begin().await?;
        if options.clear {
            clear_all(&txn).await?;
        }

        let mut taken: HashSet<String> = employee::Entity::find()
            .select_only()
            .column(employee::Column::EmpCode)
            .into_tuple::<String>()
            .all(&txn)
            .await?
            .into_iter()
            .collect();

        let mut report = SeedReport {
            departments: DEPARTMENTS.len(),
            ..SeedReport::default()
        };
        let mut created = Vec::new();
        let mut attendance_rows = Vec::new();
        let mut leave_rows = Vec::new();
        let now = Utc::now();

        for department in DEPARTMENTS {
            let headcount = rng.gen_range(5..=10);
            for _ in 0..headcount {
                let emp_code = next_code(department, &mut taken);
                let join_date = options.today - Duration::days(rng.gen_range(120..=3650));
                let model = employee::ActiveModel {
                    id: NotSet,
                    emp_code: Set(emp_code),
                    name: Set(random_name(rng)),
                    department: Set(department.to_string()),
                    gender: Set(random_gender(rng)),
                    age: Set(rng.gen_range(22..=60)),
                    salary: Set(random_salary(rng, department)),
                    attrition: Set(Attrition::No),
                    join_date: Set(join_date),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&txn)
                .await?;

                attendance_rows.extend(attendance_for(rng, &model, options.today));
                leave_rows.extend(leaves_for(rng, &model, options.today));
                created.push(model);
            }
        }

        report.employees = created.len();
        report.attendance = attendance_rows.len();
        report.leaves = leave_rows.len();
        for chunk in attendance_rows.chunks(INSERT_CHUNK) {
            attendance::Entity::insert_many(chunk.to_vec())
                .exec(&txn)
                .await?;
        }
        for chunk in leave_rows.chunks(INSERT_CHUNK) {
            leave_record::Entity::insert_many(chunk.to_vec())
                .exec(&txn)
                .await?;
        }
        report.exits = record_exits(&txn, rng, created, options.today).await?;

        txn.commit().await?;
        info!(
            employees = report.employees,
            attendance = report.attendance,
            leaves = report.leaves,
            exits = report.exits,
            "sample data generated"
        );
        Ok(report)
    }
    .instrument(span)
    .await
}

async fn clear_all(txn: &DatabaseTransaction) -> HrResult<()> {
    attendance::Entity::delete_many().exec(txn).await?;
    leave_record::Entity::delete_many().exec(txn).await?;
    attrition_record::Entity::delete_many().exec(txn).await?;
    let removed = employee::Entity::delete_many().exec(txn).await?;
    info!(employees = removed.rows_affected, "existing data cleared");
    Ok(())
}

/// Department prefix plus a running number, skipping codes already in use.
fn next_code(department: &str, taken: &mut HashSet<String>) -> String {
    let prefix: String = department
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(3)
        .collect::<String>()
        .to_ascii_uppercase();
    let mut number = 1000 + taken.len();
    loop {
        let code = format!("{prefix}-{number}");
        if taken.insert(code.clone()) {
            return code;
        }
        number += 1;
    }
}

fn random_name<R: Rng>(rng: &mut R) -> String {
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
    format!("{first} {last}")
}

fn random_gender<R: Rng>(rng: &mut R) -> Gender {
    match rng.gen_range(0..100) {
        0..48 => Gender::Male,
        48..96 => Gender::Female,
        _ => Gender::Other,
    }
}

fn base_salary(department: &str) -> f64 {
    match department {
        "Engineering" | "Product" => 95_000.0,
        "Finance" => 80_000.0,
        "Sales" | "Marketing" => 65_000.0,
        "HR" | "Operations" => 58_000.0,
        _ => 50_000.0,
    }
}

/// Base pay scaled by 0.8..1.4, rounded to the nearest hundred.
fn random_salary<R: Rng>(rng: &mut R, department: &str) -> f64 {
    let scaled = base_salary(department) * rng.gen_range(0.8..1.4);
    (scaled / 100.0).round() * 100.0
}

/// One entry per weekday over the last 90 days, from the join date on.
fn attendance_for<R: Rng>(
    rng: &mut R,
    employee: &employee::Model,
    today: NaiveDate,
) -> Vec<attendance::ActiveModel> {
    let first = (today - Duration::days(ATTENDANCE_DAYS)).max(employee.join_date);
    let now = Utc::now();
    first
        .iter_days()
        .take_while(|date| *date <= today)
        .filter(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
        .map(|date| {
            let roll: f64 = rng.gen_range(0.0..1.0);
            let status = if roll < 0.85 {
                Status::Present
            } else if roll < 0.95 {
                Status::Absent
            } else {
                Status::HalfDay
            };
            attendance::ActiveModel {
                id: NotSet,
                employee_id: Set(employee.id),
                date: Set(date),
                status: Set(status),
                created_at: Set(now),
            }
        })
        .collect()
}

const LEAVE_TYPES: [LeaveType; 5] = [
    LeaveType::Sick,
    LeaveType::Annual,
    LeaveType::Casual,
    LeaveType::Unpaid,
    LeaveType::Maternity,
];

/// One to three short leaves within the last six months, none before joining.
fn leaves_for<R: Rng>(
    rng: &mut R,
    employee: &employee::Model,
    today: NaiveDate,
) -> Vec<leave_record::ActiveModel> {
    let now = Utc::now();
    (0..rng.gen_range(1..=3))
        .map(|_| {
            let leave_type = LEAVE_TYPES[rng.gen_range(0..LEAVE_TYPES.len())];
            let start = (today - Duration::days(rng.gen_range(5..=180))).max(employee.join_date);
            let requested: i64 = rng.gen_range(1..=5);
            let end = (start + Duration::days(requested - 1)).min(today);
            let duration = (end - start).num_days() as i32 + 1;
            leave_record::ActiveModel {
                id: NotSet,
                employee_id: Set(employee.id),
                leave_type: Set(leave_type),
                start_date: Set(start),
                end_date: Set(end),
                duration: Set(duration),
                reason: Set(Some(format!("{} request", leave_type.label()))),
                approved: Set(rng.gen_bool(0.9)),
                created_at: Set(now),
            }
        })
        .collect()
}

const EXIT_REASONS: [ExitReason; 5] = [
    ExitReason::Voluntary,
    ExitReason::Terminated,
    ExitReason::Retired,
    ExitReason::LaidOff,
    ExitReason::Other,
];

/// Mark 5-10 % of the new employees (at least one) as exited.
async fn record_exits<R: Rng>(
    txn: &DatabaseTransaction,
    rng: &mut R,
    created: Vec<employee::Model>,
    today: NaiveDate,
) -> HrResult<usize> {
    if created.is_empty() {
        return Ok(0);
    }
    let share = rng.gen_range(0.05..0.10);
    let count = ((created.len() as f64 * share).floor() as usize).max(1);
    let leavers: Vec<employee::Model> = created
        .choose_multiple(rng, count)
        .cloned()
        .collect();
    let now = Utc::now();
    for leaver in &leavers {
        let exit_date = (today - Duration::days(rng.gen_range(1..=180))).max(leaver.join_date);
        attrition_record::ActiveModel {
            id: NotSet,
            employee_id: Set(leaver.id),
            exit_date: Set(exit_date),
            reason: Set(EXIT_REASONS[rng.gen_range(0..EXIT_REASONS.len())]),
            details: Set(None),
            created_at: Set(now),
        }
        .insert(txn)
        .await?;

        let mut active: employee::ActiveModel = leaver.clone().into();
        active.attrition = Set(Attrition::Yes);
        active.updated_at = Set(now);
        active.update(txn).await?;
    }
    Ok(leavers.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn codes_skip_existing_entries() {
        let mut taken: HashSet<String> = HashSet::new();
        taken.insert("ENG-1001".to_string());
        let first = next_code("Engineering", &mut taken);
        assert_eq!(first, "ENG-1002");
        assert_eq!(next_code("HR", &mut taken), "HR-1002");
    }

    #[test]
    fn generated_fields_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for department in DEPARTMENTS {
            let salary = random_salary(&mut rng, department);
            assert!(salary >= base_salary(department) * 0.8 - 100.0);
            assert_eq!(salary % 100.0, 0.0);
        }
        let name = random_name(&mut rng);
        assert_eq!(name.split(' ').count(), 2);
    }
}
