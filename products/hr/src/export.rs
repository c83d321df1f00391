//! CSV export of employee records.

use std::io::Write;

use entity::employee;
use sea_orm::DatabaseConnection;
use tracing::{Instrument, info, info_span};

use crate::employees;
use crate::error::{HrError, HrResult};
use crate::validation::DATE_FORMAT;

pub const CSV_HEADER: [&str; 9] = [
    "id",
    "emp_code",
    "name",
    "department",
    "gender",
    "age",
    "salary",
    "attrition",
    "join_date",
];

/// Write `employees` as CSV, header first, one row per employee.
pub fn write_employees_csv<W: Write>(employees: &[employee::Model], writer: W) -> HrResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for employee in employees {
        wtr.write_record([
            employee.id.to_string(),
            employee.emp_code.clone(),
            employee.name.clone(),
            employee.department.clone(),
            employee.gender.as_str().to_string(),
            employee.age.to_string(),
            format!("{:.2}", employee.salary),
            employee.attrition.as_str().to_string(),
            employee.join_date.format(DATE_FORMAT).to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Every employee as a CSV document, ordered by id.
pub async fn export_employees_csv(db: &DatabaseConnection) -> HrResult<Vec<u8>> {
    let span = info_span!("hr.export.csv");
    async move {
        let employees = employees::all_employees(db).await?;
        let mut buffer = Vec::new();
        write_employees_csv(&employees, &mut buffer)?;
        info!(rows = employees.len(), bytes = buffer.len(), "employee export built");
        Ok(buffer)
    }
    .instrument(span)
    .await
}

/// Export every employee to `path`, or to stdout when `path` is `-`.
pub async fn export_employees_to(db: &DatabaseConnection, path: &str) -> HrResult<usize> {
    let employees = employees::all_employees(db).await?;
    if path == "-" {
        let stdout = std::io::stdout();
        write_employees_csv(&employees, stdout.lock())?;
    } else {
        let file = std::fs::File::create(path).map_err(HrError::Io)?;
        write_employees_csv(&employees, file)?;
    }
    info!(rows = employees.len(), path, "employee export written");
    Ok(employees.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use entity::employee::{Attrition, Gender};

    fn model(id: i32, name: &str) -> employee::Model {
        let stamp = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        employee::Model {
            id,
            emp_code: format!("OPS-{id}"),
            name: name.to_string(),
            department: "Operations".into(),
            gender: Gender::Other,
            age: 40,
            salary: 61_250.5,
            attrition: Attrition::No,
            join_date: NaiveDate::from_ymd_opt(2019, 7, 1).unwrap(),
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn empty_export_still_has_header() {
        let mut buffer = Vec::new();
        write_employees_csv(&[], &mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "id,emp_code,name,department,gender,age,salary,attrition,join_date\n"
        );
    }

    #[test]
    fn rows_are_quoted_when_needed() {
        let mut buffer = Vec::new();
        write_employees_csv(&[model(1, "Lee, Jordan"), model(2, "Sam Ortiz")], &mut buffer)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "1,OPS-1,\"Lee, Jordan\",Operations,Other,40,61250.50,No,2019-07-01"
        );
    }
}
