//! Askama templates and the display rows they render.
//!
//! Numbers are formatted here so templates only print strings.

use askama::Template;
use entity::attendance::{self, Status};
use entity::attrition_record::{self, ExitReason};
use entity::employee;
use entity::leave_record;
use products_hr::ValidationErrors;
use products_hr::analytics::DepartmentSummary;
use products_hr::charts::attrition_color;
use products_hr::dashboard::{DashboardData, DashboardQuery};
use products_hr::validation::{DATE_FORMAT, EmployeeForm};

use crate::config::DEFAULT_SITE_TITLE;

/// Layout data shared by every page.
#[derive(Clone, Debug)]
pub struct PageContext {
    pub site_title: String,
    pub active: &'static str,
}

impl PageContext {
    pub fn new(site_title: &str, active: &'static str) -> Self {
        Self {
            site_title: site_title.to_string(),
            active,
        }
    }

    pub fn fallback() -> Self {
        Self::new(DEFAULT_SITE_TITLE, "")
    }

    pub fn nav_class(&self, section: &str) -> &'static str {
        if self.active == section { "active" } else { "" }
    }
}

#[derive(Clone, Debug)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn list(values: &[String], selected: Option<&str>) -> Vec<Self> {
        values
            .iter()
            .map(|value| Self {
                value: value.clone(),
                label: value.clone(),
                selected: selected == Some(value.as_str()),
            })
            .collect()
    }

    pub fn pairs(pairs: &[(&str, &str)], selected: Option<&str>) -> Vec<Self> {
        pairs
            .iter()
            .map(|(value, label)| Self {
                value: value.to_string(),
                label: label.to_string(),
                selected: selected == Some(*value),
            })
            .collect()
    }
}

fn money(value: f64) -> String {
    let whole = format!("{:.2}", value);
    let (int_part, frac) = whole.split_once('.').unwrap_or((whole.as_str(), "00"));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };
    let mut grouped = String::new();
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}.{frac}")
}

fn percent(value: f64) -> String {
    format!("{value:.2}%")
}

#[derive(Clone, Debug)]
pub struct EmployeeRow {
    pub id: i32,
    pub emp_code: String,
    pub name: String,
    pub department: String,
    pub gender: &'static str,
    pub age: i32,
    pub salary: String,
    pub attrition: &'static str,
    pub active: bool,
    pub join_date: String,
}

impl From<&employee::Model> for EmployeeRow {
    fn from(model: &employee::Model) -> Self {
        Self {
            id: model.id,
            emp_code: model.emp_code.clone(),
            name: model.name.clone(),
            department: model.department.clone(),
            gender: model.gender.as_str(),
            age: model.age,
            salary: money(model.salary),
            attrition: model.attrition.as_str(),
            active: model.is_active(),
            join_date: model.join_date.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DepartmentRow {
    pub department: String,
    pub headcount: i64,
    pub attrited: i64,
    pub rate: String,
    pub average_salary: String,
    pub color: &'static str,
}

impl From<&DepartmentSummary> for DepartmentRow {
    fn from(row: &DepartmentSummary) -> Self {
        Self {
            department: row.department.clone(),
            headcount: row.headcount,
            attrited: row.attrited,
            rate: percent(row.attrition_rate),
            average_salary: money(row.average_salary),
            color: attrition_color(row.attrition_rate),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AttendanceRow {
    pub date: String,
    pub status: &'static str,
    pub badge: &'static str,
}

impl From<&attendance::Model> for AttendanceRow {
    fn from(model: &attendance::Model) -> Self {
        Self {
            date: model.date.format(DATE_FORMAT).to_string(),
            status: model.status.as_str(),
            badge: match model.status {
                Status::Present => "success",
                Status::HalfDay => "warning",
                Status::Absent => "danger",
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct LeaveRow {
    pub leave_type: &'static str,
    pub start_date: String,
    pub end_date: String,
    pub duration: i32,
    pub approved: bool,
    pub reason: String,
}

impl From<&leave_record::Model> for LeaveRow {
    fn from(model: &leave_record::Model) -> Self {
        Self {
            leave_type: model.leave_type.label(),
            start_date: model.start_date.format(DATE_FORMAT).to_string(),
            end_date: model.end_date.format(DATE_FORMAT).to_string(),
            duration: model.duration,
            approved: model.approved,
            reason: model.reason.clone().unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ExitRow {
    pub exit_date: String,
    pub reason: String,
    pub details: String,
}

impl ExitRow {
    pub fn reason_options(selected: &str) -> Vec<SelectOption> {
        [
            ExitReason::Voluntary,
            ExitReason::Terminated,
            ExitReason::Retired,
            ExitReason::LaidOff,
            ExitReason::Other,
        ]
        .into_iter()
        .map(|reason| SelectOption {
            value: reason.as_str().to_string(),
            label: reason.label().to_string(),
            selected: reason.as_str() == selected,
        })
        .collect()
    }
}

impl From<&attrition_record::Model> for ExitRow {
    fn from(model: &attrition_record::Model) -> Self {
        Self {
            exit_date: model.exit_date.format(DATE_FORMAT).to_string(),
            reason: model.reason.label().to_string(),
            details: model.details.clone().unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub departments: Vec<SelectOption>,
    pub start_date: String,
    pub end_date: String,
    pub filter_error: String,
    pub is_empty: bool,
    pub total: u64,
    pub active: u64,
    pub attrited: u64,
    pub attrition_rate: String,
    pub average_salary: String,
    pub attendance_percentage: String,
    pub attendance_records: u64,
    pub attendance_window: String,
    pub history_window: String,
    pub leave_count: u64,
    pub leave_days: i64,
    pub leave_average: String,
    pub exit_count: u64,
    pub period_exit_rate: String,
    pub department_rows: Vec<DepartmentRow>,
    pub charts_json: String,
}

impl DashboardTemplate {
    pub fn new(
        ctx: PageContext,
        data: &DashboardData,
        known_departments: &[String],
        query: &DashboardQuery,
        charts_json: String,
        filter_error: String,
    ) -> Self {
        let filter = &data.filter;
        let window = |range: &products_hr::validation::DateRange| {
            format!(
                "{} to {}",
                range.start.format(DATE_FORMAT),
                range.end.format(DATE_FORMAT)
            )
        };
        Self {
            ctx,
            departments: SelectOption::list(known_departments, filter.department.as_deref()),
            start_date: query.start_date.clone().unwrap_or_default(),
            end_date: query.end_date.clone().unwrap_or_default(),
            filter_error,
            is_empty: data.is_empty(),
            total: data.summary.total,
            active: data.summary.active,
            attrited: data.summary.attrited,
            attrition_rate: percent(data.summary.attrition_rate),
            average_salary: money(data.summary.average_salary),
            attendance_percentage: percent(data.attendance.percentage),
            attendance_records: data.attendance.total_days,
            attendance_window: window(&filter.attendance),
            history_window: window(&filter.history),
            leave_count: data.leave_totals.total_leaves,
            leave_days: data.leave_totals.total_days,
            leave_average: format!("{:.2}", data.leave_totals.average_duration),
            exit_count: data.exits.iter().map(|bucket| bucket.count).sum(),
            period_exit_rate: percent(data.period_exit_rate),
            department_rows: data.departments.iter().map(DepartmentRow::from).collect(),
            charts_json,
        }
    }
}

#[derive(Template)]
#[template(path = "employees.html")]
pub struct EmployeesTemplate {
    pub ctx: PageContext,
    pub count: usize,
    pub employees: Vec<EmployeeRow>,
    pub departments: Vec<SelectOption>,
    pub statuses: Vec<SelectOption>,
    pub q: String,
}

#[derive(Template)]
#[template(path = "employee_form.html")]
pub struct EmployeeFormTemplate {
    pub ctx: PageContext,
    pub heading: String,
    pub action: String,
    pub cancel_url: String,
    pub submit_label: &'static str,
    pub form: EmployeeForm,
    pub errors: ValidationErrors,
    pub genders: Vec<SelectOption>,
    pub attritions: Vec<SelectOption>,
}

impl EmployeeFormTemplate {
    pub fn new(
        ctx: PageContext,
        id: Option<i32>,
        form: EmployeeForm,
        errors: ValidationErrors,
    ) -> Self {
        let (heading, action, cancel_url, submit_label) = match id {
            Some(id) => (
                format!("Edit {}", form.name.trim()),
                format!("/employees/{id}/edit"),
                format!("/employees/{id}"),
                "Save changes",
            ),
            None => (
                "Add employee".to_string(),
                "/employees".to_string(),
                "/employees".to_string(),
                "Create employee",
            ),
        };
        let genders = SelectOption::pairs(
            &[("Male", "Male"), ("Female", "Female"), ("Other", "Other")],
            Some(form.gender.trim()),
        );
        let attritions = SelectOption::pairs(
            &[("No", "No"), ("Yes", "Yes")],
            Some(form.attrition.trim()),
        );
        Self {
            ctx,
            heading,
            action,
            cancel_url,
            submit_label,
            form,
            errors,
            genders,
            attritions,
        }
    }
}

#[derive(Template)]
#[template(path = "employee_detail.html")]
pub struct EmployeeDetailTemplate {
    pub ctx: PageContext,
    pub employee: EmployeeRow,
    pub attendance_percentage: String,
    pub attendance_days: u64,
    pub attendance: Vec<AttendanceRow>,
    pub leaves: Vec<LeaveRow>,
    pub has_exit: bool,
    pub exit: ExitRow,
    pub exit_reasons: Vec<SelectOption>,
    pub exit_date: String,
    pub exit_details: String,
    pub exit_errors: ValidationErrors,
    pub today: String,
}

#[derive(Template)]
#[template(path = "departments.html")]
pub struct DepartmentsTemplate {
    pub ctx: PageContext,
    pub total: i64,
    pub departments: Vec<DepartmentRow>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub ctx: PageContext,
    pub status: u16,
    pub title: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_groups_thousands() {
        assert_eq!(money(0.0), "0.00");
        assert_eq!(money(950.5), "950.50");
        assert_eq!(money(1_234_567.891), "1,234,567.89");
        assert_eq!(money(-12_000.0), "-12,000.00");
    }

    #[test]
    fn select_options_mark_the_selection() {
        let options = SelectOption::list(&["HR".to_string(), "Sales".to_string()], Some("Sales"));
        assert!(!options[0].selected);
        assert!(options[1].selected);
    }

    #[test]
    fn nav_class_highlights_current_section() {
        let ctx = PageContext::new("HR", "employees");
        assert_eq!(ctx.nav_class("employees"), "active");
        assert_eq!(ctx.nav_class("dashboard"), "");
    }

    #[test]
    fn error_page_renders_status_and_message() {
        let page = ErrorTemplate {
            ctx: PageContext::fallback(),
            status: 404,
            title: "Not Found".into(),
            message: "No such employee".into(),
        };
        let html = page.render().unwrap();
        assert!(html.contains("404"));
        assert!(html.contains("No such employee"));
        assert!(html.contains(DEFAULT_SITE_TITLE));
    }
}
