//! Workforce aggregates.
//!
//! Everything here except [`department_summary`] is a pure function over
//! already-loaded rows. Percentages and averages are rounded to two decimals
//! and are `0` when there is nothing to divide by.

use std::collections::{BTreeMap, HashMap, HashSet};

use entity::attendance;
use entity::attrition_record::{self, ExitReason};
use entity::employee::{self, Gender};
use entity::leave_record::{self, LeaveType};
use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult, Statement};
use serde::Serialize;
use tracing::{Instrument, info_span};

use crate::error::HrResult;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole * 100`, rounded; `0` for an empty whole.
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round2(part as f64 / whole as f64 * 100.0)
    }
}

fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0u64), |(sum, count), value| (sum + value, count + 1));
    if count == 0 { 0.0 } else { round2(sum / count as f64) }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct WorkforceSummary {
    pub total: u64,
    pub active: u64,
    pub attrited: u64,
    pub attrition_rate: f64,
    pub average_salary: f64,
}

pub fn workforce_summary(employees: &[employee::Model]) -> WorkforceSummary {
    let total = employees.len() as u64;
    let attrited = employees.iter().filter(|e| !e.is_active()).count() as u64;
    WorkforceSummary {
        total,
        active: total - attrited,
        attrited,
        attrition_rate: percentage(attrited, total),
        average_salary: mean(employees.iter().map(|e| e.salary)),
    }
}

pub fn attrition_rate(employees: &[employee::Model]) -> f64 {
    workforce_summary(employees).attrition_rate
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CountBucket {
    pub label: String,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AverageBucket {
    pub label: String,
    pub count: u64,
    pub average: f64,
}

/// Headcount per gender in Male, Female, Other order; absent genders are skipped.
pub fn gender_distribution(employees: &[employee::Model]) -> Vec<CountBucket> {
    [Gender::Male, Gender::Female, Gender::Other]
        .into_iter()
        .filter_map(|gender| {
            let count = employees.iter().filter(|e| e.gender == gender).count() as u64;
            (count > 0).then(|| CountBucket {
                label: gender.as_str().to_string(),
                count,
            })
        })
        .collect()
}

pub fn salary_by_gender(employees: &[employee::Model]) -> Vec<AverageBucket> {
    [Gender::Male, Gender::Female, Gender::Other]
        .into_iter()
        .filter_map(|gender| {
            let salaries: Vec<f64> = employees
                .iter()
                .filter(|e| e.gender == gender)
                .map(|e| e.salary)
                .collect();
            (!salaries.is_empty()).then(|| AverageBucket {
                label: gender.as_str().to_string(),
                count: salaries.len() as u64,
                average: mean(salaries),
            })
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AgeBand {
    Under25,
    From25To34,
    From35To44,
    From45To54,
    Over55,
}

impl AgeBand {
    pub fn of(age: i32) -> Self {
        match age {
            ..=24 => AgeBand::Under25,
            25..=34 => AgeBand::From25To34,
            35..=44 => AgeBand::From35To44,
            45..=54 => AgeBand::From45To54,
            _ => AgeBand::Over55,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBand::Under25 => "<25",
            AgeBand::From25To34 => "25-34",
            AgeBand::From35To44 => "35-44",
            AgeBand::From45To54 => "45-54",
            AgeBand::Over55 => "55+",
        }
    }
}

/// Average salary per age band, youngest first; empty bands are skipped.
pub fn salary_by_age_band(employees: &[employee::Model]) -> Vec<AverageBucket> {
    let mut bands: BTreeMap<AgeBand, Vec<f64>> = BTreeMap::new();
    for employee in employees {
        bands
            .entry(AgeBand::of(employee.age))
            .or_default()
            .push(employee.salary);
    }
    bands
        .into_iter()
        .map(|(band, salaries)| AverageBucket {
            label: band.label().to_string(),
            count: salaries.len() as u64,
            average: mean(salaries),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, FromQueryResult)]
pub struct DepartmentSummary {
    pub department: String,
    pub headcount: i64,
    pub attrited: i64,
    pub attrition_rate: f64,
    pub average_salary: f64,
}

/// Per-department rollup computed in memory, for already-filtered rows.
///
/// Ordered by headcount descending, then department name.
pub fn department_breakdown(employees: &[employee::Model]) -> Vec<DepartmentSummary> {
    let mut groups: BTreeMap<&str, Vec<&employee::Model>> = BTreeMap::new();
    for employee in employees {
        groups
            .entry(employee.department.as_str())
            .or_default()
            .push(employee);
    }
    let mut rows: Vec<DepartmentSummary> = groups
        .into_iter()
        .map(|(department, members)| {
            let headcount = members.len() as u64;
            let attrited = members.iter().filter(|e| !e.is_active()).count() as u64;
            DepartmentSummary {
                department: department.to_string(),
                headcount: headcount as i64,
                attrited: attrited as i64,
                attrition_rate: percentage(attrited, headcount),
                average_salary: mean(members.iter().map(|e| e.salary)),
            }
        })
        .collect();
    sort_departments(&mut rows);
    rows
}

fn sort_departments(rows: &mut [DepartmentSummary]) {
    rows.sort_by(|a, b| {
        b.headcount
            .cmp(&a.headcount)
            .then_with(|| a.department.cmp(&b.department))
    });
}

const DEPARTMENT_SUMMARY_SQL: &str = r#"
SELECT
    department,
    COUNT(*) AS headcount,
    SUM(CASE WHEN attrition = 'Yes' THEN 1 ELSE 0 END) AS attrited,
    CAST(ROUND(SUM(CASE WHEN attrition = 'Yes' THEN 1 ELSE 0 END) * 100.0 / COUNT(*), 2) AS REAL)
        AS attrition_rate,
    CAST(ROUND(AVG(salary), 2) AS REAL) AS average_salary
FROM employee
GROUP BY department
ORDER BY headcount DESC, department ASC
"#;

/// Per-department headcount, attrition and average salary, grouped in SQL.
pub async fn department_summary(db: &DatabaseConnection) -> HrResult<Vec<DepartmentSummary>> {
    let span = info_span!("hr.analytics.departments");
    let rows = DepartmentSummary::find_by_statement(Statement::from_string(
        db.get_database_backend(),
        DEPARTMENT_SUMMARY_SQL.to_string(),
    ))
    .all(db)
    .instrument(span)
    .await?;
    Ok(rows)
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AttendanceSummary {
    pub total_days: u64,
    pub present_days: u64,
    pub absent_days: u64,
    pub percentage: f64,
}

/// Present and half-day entries count as attended.
pub fn attendance_summary<'a>(
    records: impl IntoIterator<Item = &'a attendance::Model>,
) -> AttendanceSummary {
    let mut summary = AttendanceSummary::default();
    for record in records {
        summary.total_days += 1;
        if record.status.counts_as_present() {
            summary.present_days += 1;
        } else {
            summary.absent_days += 1;
        }
    }
    summary.percentage = percentage(summary.present_days, summary.total_days);
    summary
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DepartmentAttendance {
    pub department: String,
    pub records: u64,
    pub percentage: f64,
}

/// Attendance percentage per department for active employees,
/// alphabetically; departments without records in the window are skipped.
pub fn departmental_attendance(
    employees: &[employee::Model],
    records: &[attendance::Model],
) -> Vec<DepartmentAttendance> {
    let department_of: HashMap<i32, &str> = employees
        .iter()
        .filter(|e| e.is_active())
        .map(|e| (e.id, e.department.as_str()))
        .collect();
    let mut groups: BTreeMap<&str, Vec<&attendance::Model>> = BTreeMap::new();
    for record in records {
        if let Some(department) = department_of.get(&record.employee_id) {
            groups.entry(*department).or_default().push(record);
        }
    }
    groups
        .into_iter()
        .map(|(department, rows)| {
            let summary = attendance_summary(rows);
            DepartmentAttendance {
                department: department.to_string(),
                records: summary.total_days,
                percentage: summary.percentage,
            }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeaveBucket {
    pub leave_type: LeaveType,
    pub label: &'static str,
    pub count: u64,
    pub days: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LeaveTotals {
    pub total_leaves: u64,
    pub total_days: i64,
    pub average_duration: f64,
}

fn approved(leaves: &[leave_record::Model]) -> impl Iterator<Item = &leave_record::Model> {
    leaves.iter().filter(|leave| leave.approved)
}

/// Approved leaves per type, most frequent first.
pub fn leave_distribution(leaves: &[leave_record::Model]) -> Vec<LeaveBucket> {
    let mut buckets: HashMap<LeaveType, LeaveBucket> = HashMap::new();
    for leave in approved(leaves) {
        let bucket = buckets.entry(leave.leave_type).or_insert(LeaveBucket {
            leave_type: leave.leave_type,
            label: leave.leave_type.label(),
            count: 0,
            days: 0,
        });
        bucket.count += 1;
        bucket.days += i64::from(leave.duration);
    }
    let mut rows: Vec<LeaveBucket> = buckets.into_values().collect();
    rows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.leave_type.as_str().cmp(b.leave_type.as_str()))
    });
    rows
}

pub fn leave_totals(leaves: &[leave_record::Model]) -> LeaveTotals {
    let durations: Vec<i64> = approved(leaves).map(|l| i64::from(l.duration)).collect();
    LeaveTotals {
        total_leaves: durations.len() as u64,
        total_days: durations.iter().sum(),
        average_duration: mean(durations.iter().map(|d| *d as f64)),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExitBucket {
    pub reason: ExitReason,
    pub label: &'static str,
    pub count: u64,
}

/// Exits per reason, most frequent first.
pub fn exit_breakdown(exits: &[attrition_record::Model]) -> Vec<ExitBucket> {
    let mut counts: HashMap<ExitReason, u64> = HashMap::new();
    for exit in exits {
        *counts.entry(exit.reason).or_default() += 1;
    }
    let mut rows: Vec<ExitBucket> = counts
        .into_iter()
        .map(|(reason, count)| ExitBucket {
            reason,
            label: reason.label(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.reason.as_str().cmp(b.reason.as_str()))
    });
    rows
}

/// Exits in the period relative to the currently active headcount.
pub fn period_exit_rate(exits: &[attrition_record::Model], active_headcount: u64) -> f64 {
    percentage(exits.len() as u64, active_headcount)
}

/// Keep only rows belonging to `employees`.
pub fn restrict_to<T, F>(rows: Vec<T>, employees: &[employee::Model], key: F) -> Vec<T>
where
    F: Fn(&T) -> i32,
{
    let ids: HashSet<i32> = employees.iter().map(|e| e.id).collect();
    rows.into_iter().filter(|row| ids.contains(&key(row))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use entity::attendance::Status;
    use entity::employee::Attrition;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn employee(
        id: i32,
        department: &str,
        gender: Gender,
        age: i32,
        salary: f64,
        left: bool,
    ) -> employee::Model {
        let stamp = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        employee::Model {
            id,
            emp_code: format!("E{id:03}"),
            name: format!("Person {id}"),
            department: department.to_string(),
            gender,
            age,
            salary,
            attrition: if left { Attrition::Yes } else { Attrition::No },
            join_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn mark(id: i32, employee_id: i32, date: NaiveDate, status: Status) -> attendance::Model {
        attendance::Model {
            id,
            employee_id,
            date,
            status,
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
        }
    }

    fn leave(
        id: i32,
        leave_type: LeaveType,
        duration: i32,
        is_approved: bool,
    ) -> leave_record::Model {
        leave_record::Model {
            id,
            employee_id: 1,
            leave_type,
            start_date: day(1),
            end_date: day(1),
            duration,
            reason: None,
            approved: is_approved,
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
        }
    }

    fn staff() -> Vec<employee::Model> {
        vec![
            employee(1, "Engineering", Gender::Female, 29, 90_000.0, false),
            employee(2, "Engineering", Gender::Male, 41, 110_000.0, true),
            employee(3, "Sales", Gender::Male, 23, 50_000.0, false),
            employee(4, "Sales", Gender::Other, 57, 70_000.0, false),
            employee(5, "Engineering", Gender::Female, 33, 100_000.0, false),
        ]
    }

    #[test]
    fn empty_inputs_produce_zeroes() {
        assert_eq!(workforce_summary(&[]), WorkforceSummary::default());
        assert_eq!(attrition_rate(&[]), 0.0);
        assert_eq!(attendance_summary(&Vec::new()).percentage, 0.0);
        assert_eq!(leave_totals(&[]), LeaveTotals::default());
        assert_eq!(period_exit_rate(&[], 0), 0.0);
        assert!(department_breakdown(&[]).is_empty());
    }

    #[test]
    fn attrition_rate_is_a_rounded_percentage() {
        let mut people = staff();
        people.push(employee(6, "Sales", Gender::Male, 30, 60_000.0, false));
        // 1 of 6
        assert_eq!(attrition_rate(&people), 16.67);
        let summary = workforce_summary(&people);
        assert_eq!(summary.active, 5);
        assert_eq!(summary.average_salary, 80_000.0);
    }

    #[test]
    fn gender_buckets_follow_fixed_order() {
        let buckets = gender_distribution(&staff());
        let labels: Vec<_> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Male", "Female", "Other"]);
        assert_eq!(buckets[1].count, 2);
        let salaries = salary_by_gender(&staff());
        assert_eq!(salaries[1].average, 95_000.0);
    }

    #[test]
    fn age_band_boundaries() {
        assert_eq!(AgeBand::of(16), AgeBand::Under25);
        assert_eq!(AgeBand::of(24), AgeBand::Under25);
        assert_eq!(AgeBand::of(25), AgeBand::From25To34);
        assert_eq!(AgeBand::of(44), AgeBand::From35To44);
        assert_eq!(AgeBand::of(54), AgeBand::From45To54);
        assert_eq!(AgeBand::of(55), AgeBand::Over55);
        let labels: Vec<_> = salary_by_age_band(&staff())
            .into_iter()
            .map(|b| b.label)
            .collect();
        assert_eq!(labels, vec!["<25", "25-34", "35-44", "55+"]);
    }

    #[test]
    fn departments_sort_by_headcount_then_name() {
        let rows = department_breakdown(&staff());
        assert_eq!(rows[0].department, "Engineering");
        assert_eq!(rows[0].headcount, 3);
        assert_eq!(rows[0].attrited, 1);
        assert_eq!(rows[0].attrition_rate, 33.33);
        assert_eq!(rows[0].average_salary, 100_000.0);
        assert_eq!(rows[1].department, "Sales");
    }

    #[test]
    fn half_days_count_as_attended() {
        let records = vec![
            mark(1, 1, day(3), Status::Present),
            mark(2, 1, day(4), Status::HalfDay),
            mark(3, 3, day(3), Status::Absent),
        ];
        let summary = attendance_summary(&records);
        assert_eq!(summary.present_days, 2);
        assert_eq!(summary.absent_days, 1);
        assert_eq!(summary.percentage, 66.67);

        let by_department = departmental_attendance(&staff(), &records);
        assert_eq!(by_department.len(), 2);
        assert_eq!(by_department[0].department, "Engineering");
        assert_eq!(by_department[0].percentage, 100.0);
        assert_eq!(by_department[1].percentage, 0.0);
    }

    #[test]
    fn departmental_attendance_skips_leavers() {
        // Employee 2 has left Engineering.
        let records = vec![
            mark(1, 1, day(3), Status::Present),
            mark(2, 2, day(3), Status::Absent),
            mark(3, 2, day(4), Status::Absent),
        ];
        let by_department = departmental_attendance(&staff(), &records);
        assert_eq!(by_department.len(), 1);
        assert_eq!(by_department[0].records, 1);
        assert_eq!(by_department[0].percentage, 100.0);
    }

    #[test]
    fn leave_stats_ignore_unapproved() {
        let leaves = vec![
            leave(1, LeaveType::Sick, 2, true),
            leave(2, LeaveType::Annual, 5, true),
            leave(3, LeaveType::Sick, 1, true),
            leave(4, LeaveType::Casual, 3, false),
        ];
        let buckets = leave_distribution(&leaves);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].leave_type, LeaveType::Sick);
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[0].days, 3);
        let totals = leave_totals(&leaves);
        assert_eq!(totals.total_leaves, 3);
        assert_eq!(totals.total_days, 8);
        assert_eq!(totals.average_duration, 2.67);
    }

    #[test]
    fn exit_breakdown_counts_reasons() {
        let stamp = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let exit = |id, reason| attrition_record::Model {
            id,
            employee_id: id,
            exit_date: day(2),
            reason,
            details: None,
            created_at: stamp,
        };
        let exits = vec![
            exit(1, ExitReason::Voluntary),
            exit(2, ExitReason::Retired),
            exit(3, ExitReason::Voluntary),
        ];
        let rows = exit_breakdown(&exits);
        assert_eq!(rows[0].reason, ExitReason::Voluntary);
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].label, "Voluntary Resignation");
        assert_eq!(period_exit_rate(&exits, 40), 7.5);
    }

    #[test]
    fn restrict_to_filters_by_employee() {
        let people = staff();
        let sales: Vec<_> = people
            .iter()
            .filter(|e| e.department == "Sales")
            .cloned()
            .collect();
        let records = vec![
            mark(1, 1, day(3), Status::Present),
            mark(2, 3, day(3), Status::Present),
        ];
        let kept = restrict_to(records, &sales, |r| r.employee_id);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].employee_id, 3);
    }
}
