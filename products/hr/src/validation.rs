//! Boundary checks for everything that enters the store.
//!
//! Forms arrive as raw strings. Each `*Form` parses and checks every field in
//! one pass and returns all failures at once, keyed by field name, so the UI
//! can show inline messages next to each input.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Local, NaiveDate};
use entity::attendance::Status as AttendanceStatus;
use entity::attrition_record::ExitReason;
use entity::employee::{self, Attrition, Gender};
use entity::leave_record::LeaveType;
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const MAX_EMP_CODE_LEN: usize = 20;
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DEPARTMENT_LEN: usize = 50;
pub const MIN_AGE: i32 = 16;
pub const MAX_AGE: i32 = 100;
pub const MAX_LEAVE_DAYS: i32 = 365;
pub const MAX_RANGE_DAYS: i64 = 1825;

/// Current local date; the reference point for "not in the future" checks.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Field-keyed validation failures.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// First message for `field`, or an empty string.
    pub fn first(&self, field: &str) -> &str {
        self.get(field).first().map(String::as_str).unwrap_or("")
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Flattened `field: message` lines.
    pub fn messages(&self) -> Vec<String> {
        self.fields
            .iter()
            .flat_map(|(field, messages)| {
                messages
                    .iter()
                    .map(move |message| format!("{field}: {message}"))
            })
            .collect()
    }

    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: {}", self.messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw employee form as submitted by the browser.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EmployeeForm {
    pub emp_code: String,
    pub name: String,
    pub department: String,
    pub gender: String,
    pub age: String,
    pub salary: String,
    pub attrition: String,
    pub join_date: String,
}

impl From<&employee::Model> for EmployeeForm {
    fn from(model: &employee::Model) -> Self {
        Self {
            emp_code: model.emp_code.clone(),
            name: model.name.clone(),
            department: model.department.clone(),
            gender: model.gender.as_str().to_string(),
            age: model.age.to_string(),
            salary: format!("{:.2}", model.salary),
            attrition: model.attrition.as_str().to_string(),
            join_date: model.join_date.format(DATE_FORMAT).to_string(),
        }
    }
}

impl EmployeeForm {
    /// Parse every field, then apply the typed checks of [`EmployeeInput`].
    pub fn parse(&self, today: NaiveDate) -> Result<EmployeeInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let gender = match self.gender.trim() {
            "" => {
                errors.add("gender", "Gender is required");
                None
            }
            raw => Gender::parse(raw).or_else(|| {
                errors.add("gender", "Gender must be one of: Male, Female, Other");
                None
            }),
        };

        let age = match self.age.trim() {
            "" => {
                errors.add("age", "Age is required");
                None
            }
            raw => raw.parse::<i32>().ok().or_else(|| {
                errors.add("age", "Age must be a whole number");
                None
            }),
        };

        let salary = match self.salary.trim() {
            "" => {
                errors.add("salary", "Salary is required");
                None
            }
            raw => parse_amount(raw).or_else(|| {
                errors.add("salary", "Salary must be a number");
                None
            }),
        };

        let attrition = match self.attrition.trim() {
            "" => Some(Attrition::No),
            raw => Attrition::parse(raw).or_else(|| {
                errors.add("attrition", "Attrition must be Yes or No");
                None
            }),
        };

        let join_date = match self.join_date.trim() {
            "" => {
                errors.add("join_date", "Join date is required");
                None
            }
            raw => parse_date(raw).or_else(|| {
                errors.add("join_date", "Invalid join date format. Use YYYY-MM-DD");
                None
            }),
        };

        let (Some(gender), Some(age), Some(salary), Some(attrition), Some(join_date)) =
            (gender, age, salary, attrition, join_date)
        else {
            // Still report text-field problems alongside the parse failures.
            EmployeeInput::check_text(&self.emp_code, &self.name, &self.department, &mut errors);
            return Err(errors);
        };

        let input = EmployeeInput {
            emp_code: self.emp_code.trim().to_string(),
            name: self.name.trim().to_string(),
            department: self.department.trim().to_string(),
            gender,
            age,
            salary,
            attrition,
            join_date,
        };
        input.collect_errors(today, &mut errors);
        errors.into_result(input)
    }
}

/// Typed employee fields, ready for the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmployeeInput {
    pub emp_code: String,
    pub name: String,
    pub department: String,
    pub gender: Gender,
    pub age: i32,
    pub salary: f64,
    pub attrition: Attrition,
    pub join_date: NaiveDate,
}

impl EmployeeInput {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.collect_errors(today, &mut errors);
        errors.into_result(())
    }

    fn collect_errors(&self, today: NaiveDate, errors: &mut ValidationErrors) {
        Self::check_text(&self.emp_code, &self.name, &self.department, errors);
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            errors.add(
                "age",
                format!("Age must be between {MIN_AGE} and {MAX_AGE}"),
            );
        }
        if !self.salary.is_finite() {
            errors.add("salary", "Salary must be a number");
        } else if self.salary < 0.0 {
            errors.add("salary", "Salary cannot be negative");
        }
        if self.join_date > today {
            errors.add("join_date", "Join date cannot be in the future");
        }
    }

    fn check_text(emp_code: &str, name: &str, department: &str, errors: &mut ValidationErrors) {
        let emp_code = emp_code.trim();
        if emp_code.is_empty() {
            errors.add("emp_code", "Employee code is required");
        } else if !emp_code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
        {
            errors.add(
                "emp_code",
                "Employee code must contain only uppercase letters, numbers, and hyphens",
            );
        } else if emp_code.len() > MAX_EMP_CODE_LEN {
            errors.add(
                "emp_code",
                format!("Employee code must be at most {MAX_EMP_CODE_LEN} characters"),
            );
        }

        let name = name.trim();
        if name.is_empty() {
            errors.add("name", "Employee name is required");
        } else if name.chars().count() > MAX_NAME_LEN {
            errors.add(
                "name",
                format!("Employee name must be at most {MAX_NAME_LEN} characters"),
            );
        } else if name.chars().any(char::is_control) {
            errors.add("name", "Employee name contains invalid characters");
        }

        let department = department.trim();
        if department.is_empty() {
            errors.add("department", "Department is required");
        } else if department.chars().count() > MAX_DEPARTMENT_LEN {
            errors.add(
                "department",
                format!("Department must be at most {MAX_DEPARTMENT_LEN} characters"),
            );
        } else if department.chars().any(char::is_control) {
            errors.add("department", "Department contains invalid characters");
        }
    }
}

/// Attendance entry as posted to the JSON API.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AttendanceForm {
    pub employee_id: i32,
    pub date: String,
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttendanceInput {
    pub employee_id: i32,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl AttendanceForm {
    pub fn parse(&self, today: NaiveDate) -> Result<AttendanceInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.employee_id <= 0 {
            errors.add("employee_id", "Employee ID is required");
        }
        let date = match parse_date(&self.date) {
            Some(date) if date > today => {
                errors.add("date", "Attendance date cannot be in the future");
                None
            }
            Some(date) => Some(date),
            None => {
                errors.add("date", "Invalid attendance date format");
                None
            }
        };
        let status = AttendanceStatus::parse(&self.status);
        if status.is_none() {
            errors.add("status", "Status must be one of: present, absent, half-day");
        }
        match (date, status) {
            (Some(date), Some(status)) if errors.is_empty() => Ok(AttendanceInput {
                employee_id: self.employee_id,
                date,
                status,
            }),
            _ => Err(errors),
        }
    }
}

/// Leave request as posted to the JSON API.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LeaveForm {
    pub employee_id: i32,
    pub leave_type: String,
    pub start_date: String,
    pub end_date: String,
    /// Defaults to the inclusive length of the date range.
    #[serde(default)]
    pub duration: Option<i32>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub approved: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaveInput {
    pub employee_id: i32,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration: i32,
    pub reason: Option<String>,
    pub approved: bool,
}

impl LeaveForm {
    pub fn parse(&self, today: NaiveDate) -> Result<LeaveInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.employee_id <= 0 {
            errors.add("employee_id", "Employee ID is required");
        }
        let leave_type = LeaveType::parse(&self.leave_type);
        if leave_type.is_none() {
            errors.add(
                "leave_type",
                "Leave type must be one of: sick, annual, casual, unpaid, maternity",
            );
        }
        let dates = match (parse_date(&self.start_date), parse_date(&self.end_date)) {
            (Some(start), Some(end)) => {
                if start > end {
                    errors.add("start_date", "Start date must be before end date");
                }
                if start > today {
                    errors.add("start_date", "Leave start date cannot be in the future");
                }
                Some((start, end))
            }
            _ => {
                errors.add("start_date", "Invalid date format for leave dates");
                None
            }
        };
        let duration = self.duration.or_else(|| {
            dates.map(|(start, end)| ((end - start).num_days() + 1) as i32)
        });
        match duration {
            Some(days) if days <= 0 => {
                errors.add("duration", "Duration must be a positive integer")
            }
            Some(days) if days > MAX_LEAVE_DAYS => errors.add(
                "duration",
                format!("Leave duration cannot exceed {MAX_LEAVE_DAYS} days"),
            ),
            Some(_) => {}
            None => errors.add("duration", "Duration must be a valid integer"),
        }
        match (leave_type, dates, duration) {
            (Some(leave_type), Some((start_date, end_date)), Some(duration))
                if errors.is_empty() =>
            {
                Ok(LeaveInput {
                    employee_id: self.employee_id,
                    leave_type,
                    start_date,
                    end_date,
                    duration,
                    reason: normalize_optional(self.reason.as_deref()),
                    approved: self.approved,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Exit form posted from the employee detail page.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ExitForm {
    pub exit_date: String,
    pub reason: String,
    pub details: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExitInput {
    pub exit_date: NaiveDate,
    pub reason: ExitReason,
    pub details: Option<String>,
}

impl ExitForm {
    pub fn parse(&self, today: NaiveDate) -> Result<ExitInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let exit_date = match parse_date(&self.exit_date) {
            Some(date) if date > today => {
                errors.add("exit_date", "Exit date cannot be in the future");
                None
            }
            Some(date) => Some(date),
            None => {
                errors.add("exit_date", "Invalid exit date format");
                None
            }
        };
        let reason = ExitReason::parse(&self.reason);
        if reason.is_none() {
            errors.add(
                "reason",
                "Reason must be one of: voluntary, terminated, retired, laid_off, other",
            );
        }
        match (exit_date, reason) {
            (Some(exit_date), Some(reason)) => Ok(ExitInput {
                exit_date,
                reason,
                details: normalize_optional(Some(&self.details)),
            }),
            _ => Err(errors),
        }
    }
}

/// Inclusive date window used by the dashboard filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// From `days` days before `today` through `today`, both inclusive.
    pub fn trailing(days: i64, today: NaiveDate) -> Self {
        Self {
            start: today - chrono::Duration::days(days),
            end: today,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Resolve optional `start`/`end` strings against a default window.
    ///
    /// A missing start sits the default window's length before the supplied
    /// end; a missing end falls back to the default end.
    /// The result must be ordered and span at most [`MAX_RANGE_DAYS`].
    pub fn resolve(
        start: Option<&str>,
        end: Option<&str>,
        default: DateRange,
    ) -> Result<DateRange, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut bound = |raw: Option<&str>, field: &str| match normalize_optional(raw) {
            Some(raw) => match parse_date(&raw) {
                Some(date) => Ok(Some(date)),
                None => {
                    errors.add(field, "Invalid date format. Use YYYY-MM-DD");
                    Err(())
                }
            },
            None => Ok(None),
        };
        let start = bound(start, "start_date");
        let end = bound(end, "end_date");
        let span = chrono::Duration::days(default.days());
        let (start, end) = match (start, end) {
            (Ok(Some(start)), Ok(Some(end))) => (start, end),
            (Ok(Some(start)), Ok(None)) => (start, default.end),
            (Ok(None), Ok(Some(end))) => (end - span, end),
            (Ok(None), Ok(None)) => (default.start, default.end),
            _ => return Err(errors),
        };
        if start > end {
            return Err(ValidationErrors::single(
                "start_date",
                "Start date must be before end date",
            ));
        }
        let range = DateRange { start, end };
        if range.days() > MAX_RANGE_DAYS {
            return Err(ValidationErrors::single(
                "end_date",
                "Date range cannot exceed 5 years",
            ));
        }
        Ok(range)
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Accepts plain decimals with optional thousands separators.
fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != '_').collect();
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn valid_form() -> EmployeeForm {
        EmployeeForm {
            emp_code: "ENG-1001".into(),
            name: "Mira Okafor".into(),
            department: "Engineering".into(),
            gender: "Female".into(),
            age: "34".into(),
            salary: "92,500.50".into(),
            attrition: "No".into(),
            join_date: "2021-03-15".into(),
        }
    }

    #[test]
    fn valid_form_parses_into_typed_input() {
        let input = valid_form().parse(day(2025, 1, 1)).unwrap();
        assert_eq!(input.emp_code, "ENG-1001");
        assert_eq!(input.gender, Gender::Female);
        assert_eq!(input.age, 34);
        assert_eq!(input.salary, 92_500.50);
        assert_eq!(input.attrition, Attrition::No);
        assert_eq!(input.join_date, day(2021, 3, 15));
    }

    #[test]
    fn blank_attrition_defaults_to_no() {
        let mut form = valid_form();
        form.attrition = "  ".into();
        let input = form.parse(day(2025, 1, 1)).unwrap();
        assert_eq!(input.attrition, Attrition::No);
    }

    #[test]
    fn non_numeric_salary_names_the_field() {
        let mut form = valid_form();
        form.salary = "a lot".into();
        let errors = form.parse(day(2025, 1, 1)).unwrap_err();
        assert_eq!(errors.first("salary"), "Salary must be a number");
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["salary"]);
    }

    #[test]
    fn negative_salary_is_rejected() {
        let mut form = valid_form();
        form.salary = "-10".into();
        let errors = form.parse(day(2025, 1, 1)).unwrap_err();
        assert_eq!(errors.first("salary"), "Salary cannot be negative");
    }

    #[test]
    fn every_bad_field_is_reported_at_once() {
        let form = EmployeeForm {
            emp_code: "eng 1".into(),
            name: String::new(),
            department: String::new(),
            gender: "robot".into(),
            age: "old".into(),
            salary: String::new(),
            attrition: "maybe".into(),
            join_date: "15/03/2021".into(),
        };
        let errors = form.parse(day(2025, 1, 1)).unwrap_err();
        for field in [
            "emp_code",
            "name",
            "department",
            "gender",
            "age",
            "salary",
            "attrition",
            "join_date",
        ] {
            assert!(errors.has(field), "expected error for {field}");
        }
    }

    #[test]
    fn future_join_date_and_age_bounds_are_checked() {
        let mut form = valid_form();
        form.join_date = "2030-01-01".into();
        form.age = "12".into();
        let errors = form.parse(day(2025, 1, 1)).unwrap_err();
        assert_eq!(errors.first("join_date"), "Join date cannot be in the future");
        assert_eq!(errors.first("age"), "Age must be between 16 and 100");
    }

    #[test]
    fn typed_input_rejects_nan_salary() {
        let mut input = valid_form().parse(day(2025, 1, 1)).unwrap();
        input.salary = f64::NAN;
        let errors = input.validate(day(2025, 1, 1)).unwrap_err();
        assert!(errors.has("salary"));
    }

    #[test]
    fn messages_are_prefixed_with_field() {
        let errors = ValidationErrors::single("age", "Age is required");
        assert_eq!(errors.messages(), vec!["age: Age is required".to_string()]);
        assert_eq!(errors.to_string(), "validation failed: age: Age is required");
    }

    #[test]
    fn date_range_defaults_and_limits() {
        let today = day(2025, 6, 30);
        let default = DateRange::trailing(30, today);
        assert_eq!(DateRange::resolve(None, Some(""), default).unwrap(), default);

        let explicit = DateRange::resolve(Some("2025-01-01"), Some("2025-02-01"), default).unwrap();
        assert_eq!(explicit.start, day(2025, 1, 1));
        assert_eq!(explicit.days(), 31);

        let reversed = DateRange::resolve(Some("2025-03-01"), Some("2025-02-01"), default);
        assert_eq!(
            reversed.unwrap_err().first("start_date"),
            "Start date must be before end date"
        );

        let too_long = DateRange::resolve(Some("2015-01-01"), Some("2025-01-01"), default);
        assert_eq!(
            too_long.unwrap_err().first("end_date"),
            "Date range cannot exceed 5 years"
        );

        let garbage = DateRange::resolve(Some("yesterday"), None, default);
        assert!(garbage.unwrap_err().has("start_date"));
    }

    #[test]
    fn lone_end_date_keeps_the_default_span() {
        let today = day(2025, 6, 30);
        let default = DateRange::trailing(365, today);
        let range = DateRange::resolve(None, Some("2020-01-01"), default).unwrap();
        assert_eq!(range.end, day(2020, 1, 1));
        assert_eq!(range.days(), default.days());

        let from = DateRange::resolve(Some("2025-06-01"), None, default).unwrap();
        assert_eq!(from.start, day(2025, 6, 1));
        assert_eq!(from.end, today);

        let bad_end = DateRange::resolve(None, Some("soon"), default).unwrap_err();
        assert!(bad_end.has("end_date"));
        assert!(!bad_end.has("start_date"));
    }

    #[test]
    fn leave_duration_defaults_to_inclusive_span() {
        let form = LeaveForm {
            employee_id: 3,
            leave_type: "annual".into(),
            start_date: "2025-02-03".into(),
            end_date: "2025-02-07".into(),
            duration: None,
            reason: Some("  ".into()),
            approved: true,
        };
        let input = form.parse(day(2025, 6, 1)).unwrap();
        assert_eq!(input.duration, 5);
        assert_eq!(input.reason, None);
    }

    #[test]
    fn leave_checks_order_type_and_length() {
        let form = LeaveForm {
            employee_id: 3,
            leave_type: "sabbatical".into(),
            start_date: "2025-02-07".into(),
            end_date: "2025-02-03".into(),
            duration: Some(400),
            reason: None,
            approved: false,
        };
        let errors = form.parse(day(2025, 6, 1)).unwrap_err();
        assert!(errors.has("leave_type"));
        assert_eq!(errors.first("start_date"), "Start date must be before end date");
        assert_eq!(errors.first("duration"), "Leave duration cannot exceed 365 days");
    }

    #[test]
    fn attendance_rejects_future_and_unknown_status() {
        let form = AttendanceForm {
            employee_id: 1,
            date: "2026-01-01".into(),
            status: "late".into(),
        };
        let errors = form.parse(day(2025, 6, 1)).unwrap_err();
        assert!(errors.has("date"));
        assert!(errors.has("status"));

        let ok = AttendanceForm {
            employee_id: 1,
            date: "2025-05-30".into(),
            status: "half-day".into(),
        }
        .parse(day(2025, 6, 1))
        .unwrap();
        assert_eq!(ok.status, AttendanceStatus::HalfDay);
    }

    #[test]
    fn exit_form_normalizes_blank_details() {
        let form = ExitForm {
            exit_date: "2025-04-01".into(),
            reason: "laid_off".into(),
            details: "   ".into(),
        };
        let input = form.parse(day(2025, 6, 1)).unwrap();
        assert_eq!(input.reason, ExitReason::LaidOff);
        assert_eq!(input.details, None);
    }
}
