//! Dashboard filters and the aggregate bundle behind the landing page.

use chrono::NaiveDate;
use entity::{attendance, attrition_record, employee, leave_record};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, info_span};

use crate::analytics::{
    self, AttendanceSummary, AverageBucket, CountBucket, DepartmentAttendance, DepartmentSummary,
    ExitBucket, LeaveBucket, LeaveTotals, WorkforceSummary,
};
use crate::employees;
use crate::error::HrResult;
use crate::validation::{DateRange, ValidationErrors, normalize_optional};

/// Default look-back windows when no explicit dates are given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportWindows {
    pub attendance_days: i64,
    pub history_days: i64,
}

impl Default for ReportWindows {
    fn default() -> Self {
        Self {
            attendance_days: 30,
            history_days: 365,
        }
    }
}

/// Raw dashboard query string.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardQuery {
    pub department: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DashboardFilter {
    pub department: Option<String>,
    /// Window for attendance figures.
    pub attendance: DateRange,
    /// Window for leave and exit figures.
    pub history: DateRange,
    pub explicit_range: bool,
}

impl DashboardFilter {
    /// Unfiltered view using the default windows.
    pub fn unfiltered(windows: ReportWindows, today: NaiveDate) -> Self {
        Self {
            department: None,
            attendance: DateRange::trailing(windows.attendance_days, today),
            history: DateRange::trailing(windows.history_days, today),
            explicit_range: false,
        }
    }

    /// Validate `query` against the known departments.
    ///
    /// An explicit date range replaces both default windows.
    pub fn resolve(
        query: &DashboardQuery,
        known_departments: &[String],
        windows: ReportWindows,
        today: NaiveDate,
    ) -> Result<Self, ValidationErrors> {
        let mut filter = Self::unfiltered(windows, today);

        if let Some(department) = normalize_optional(query.department.as_deref()) {
            if !known_departments.iter().any(|known| *known == department) {
                return Err(ValidationErrors::single(
                    "department",
                    format!("Invalid department: {department}"),
                ));
            }
            filter.department = Some(department);
        }

        let start = normalize_optional(query.start_date.as_deref());
        let end = normalize_optional(query.end_date.as_deref());
        if start.is_some() || end.is_some() {
            let range = DateRange::resolve(start.as_deref(), end.as_deref(), filter.history)?;
            filter.attendance = range;
            filter.history = range;
            filter.explicit_range = true;
        }
        Ok(filter)
    }
}

/// Every figure shown on the dashboard for one filter.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardData {
    pub filter: DashboardFilter,
    pub summary: WorkforceSummary,
    pub departments: Vec<DepartmentSummary>,
    pub gender: Vec<CountBucket>,
    pub salary_by_gender: Vec<AverageBucket>,
    pub salary_by_age: Vec<AverageBucket>,
    pub attendance: AttendanceSummary,
    pub department_attendance: Vec<DepartmentAttendance>,
    pub leaves: Vec<LeaveBucket>,
    pub leave_totals: LeaveTotals,
    pub exits: Vec<ExitBucket>,
    pub period_exit_rate: f64,
}

impl DashboardData {
    pub fn is_empty(&self) -> bool {
        self.summary.total == 0
    }
}

/// Rows in scope for one filter, before aggregation.
#[derive(Clone, Debug, Default)]
pub struct DashboardRows {
    pub employees: Vec<employee::Model>,
    pub attendance: Vec<attendance::Model>,
    pub leaves: Vec<leave_record::Model>,
    pub exits: Vec<attrition_record::Model>,
}

impl DashboardRows {
    pub async fn load(db: &DatabaseConnection, filter: &DashboardFilter) -> HrResult<Self> {
        let span = info_span!(
            "hr.dashboard.load",
            department = filter.department.as_deref().unwrap_or(""),
            explicit_range = filter.explicit_range
        );
        async move {
            let mut query = employee::Entity::find().order_by_asc(employee::Column::Id);
            if let Some(department) = &filter.department {
                query = query.filter(employee::Column::Department.eq(department.as_str()));
            }
            let employees = query.all(db).await?;

            let attendance = attendance::Entity::find()
                .filter(
                    attendance::Column::Date.between(filter.attendance.start, filter.attendance.end),
                )
                .all(db)
                .await?;
            let leaves = leave_record::Entity::find()
                .filter(leave_record::Column::Approved.eq(true))
                .filter(
                    leave_record::Column::StartDate
                        .between(filter.history.start, filter.history.end),
                )
                .all(db)
                .await?;
            let exits = attrition_record::Entity::find()
                .filter(
                    attrition_record::Column::ExitDate
                        .between(filter.history.start, filter.history.end),
                )
                .all(db)
                .await?;

            let (attendance, leaves, exits) = if filter.department.is_some() {
                (
                    analytics::restrict_to(attendance, &employees, |r| r.employee_id),
                    analytics::restrict_to(leaves, &employees, |r| r.employee_id),
                    analytics::restrict_to(exits, &employees, |r| r.employee_id),
                )
            } else {
                (attendance, leaves, exits)
            };
            Ok(Self {
                employees,
                attendance,
                leaves,
                exits,
            })
        }
        .instrument(span)
        .await
    }

    pub fn aggregate(&self, filter: DashboardFilter) -> DashboardData {
        let summary = analytics::workforce_summary(&self.employees);
        let period_exit_rate = analytics::period_exit_rate(&self.exits, summary.active);
        DashboardData {
            filter,
            departments: analytics::department_breakdown(&self.employees),
            gender: analytics::gender_distribution(&self.employees),
            salary_by_gender: analytics::salary_by_gender(&self.employees),
            salary_by_age: analytics::salary_by_age_band(&self.employees),
            attendance: analytics::attendance_summary(&self.attendance),
            department_attendance: analytics::departmental_attendance(
                &self.employees,
                &self.attendance,
            ),
            leaves: analytics::leave_distribution(&self.leaves),
            leave_totals: analytics::leave_totals(&self.leaves),
            exits: analytics::exit_breakdown(&self.exits),
            period_exit_rate,
            summary,
        }
    }
}

pub async fn load_dashboard(
    db: &DatabaseConnection,
    filter: DashboardFilter,
) -> HrResult<DashboardData> {
    let rows = DashboardRows::load(db, &filter).await?;
    Ok(rows.aggregate(filter))
}

/// Resolve `query` against the stored departments and load the dashboard.
pub async fn dashboard_for_query(
    db: &DatabaseConnection,
    query: &DashboardQuery,
    windows: ReportWindows,
    today: NaiveDate,
) -> HrResult<DashboardData> {
    let known = employees::departments(db).await?;
    let filter = DashboardFilter::resolve(query, &known, windows, today)?;
    load_dashboard(db, filter).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn known() -> Vec<String> {
        vec!["Engineering".to_string(), "Sales".to_string()]
    }

    #[test]
    fn empty_query_uses_default_windows() {
        let today = day(2025, 6, 30);
        let query = DashboardQuery::default();
        let filter =
            DashboardFilter::resolve(&query, &known(), ReportWindows::default(), today).unwrap();
        assert_eq!(filter.department, None);
        assert_eq!(filter.attendance.start, day(2025, 5, 31));
        assert_eq!(filter.history.start, day(2024, 6, 30));
        assert!(!filter.explicit_range);
    }

    #[test]
    fn unknown_department_is_rejected() {
        let query = DashboardQuery {
            department: Some("Legal".into()),
            ..DashboardQuery::default()
        };
        let errors =
            DashboardFilter::resolve(&query, &known(), ReportWindows::default(), day(2025, 6, 30))
                .unwrap_err();
        assert_eq!(errors.first("department"), "Invalid department: Legal");
    }

    #[test]
    fn explicit_range_overrides_both_windows() {
        let query = DashboardQuery {
            department: Some("Sales".into()),
            start_date: Some("2025-01-01".into()),
            end_date: Some("2025-03-31".into()),
        };
        let filter =
            DashboardFilter::resolve(&query, &known(), ReportWindows::default(), day(2025, 6, 30))
                .unwrap();
        assert_eq!(filter.department.as_deref(), Some("Sales"));
        assert_eq!(filter.attendance, filter.history);
        assert_eq!(filter.history.end, day(2025, 3, 31));
        assert!(filter.explicit_range);
    }

    #[test]
    fn reversed_range_is_rejected() {
        let query = DashboardQuery {
            start_date: Some("2025-04-01".into()),
            end_date: Some("2025-03-01".into()),
            ..DashboardQuery::default()
        };
        assert!(
            DashboardFilter::resolve(&query, &known(), ReportWindows::default(), day(2025, 6, 30))
                .is_err()
        );
    }
}
