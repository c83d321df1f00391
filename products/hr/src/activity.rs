//! Attendance, leave and exit records attached to an employee.

use chrono::Utc;
use entity::employee::{self, Attrition};
use entity::{attendance, attrition_record, leave_record};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{Instrument, info, info_span};

use crate::error::{HrError, HrResult};
use crate::validation::{AttendanceInput, ExitInput, LeaveInput};

/// Everything recorded against one employee, newest first.
#[derive(Clone, Debug, Default, Serialize)]
pub struct EmployeeActivity {
    pub attendance: Vec<attendance::Model>,
    pub leaves: Vec<leave_record::Model>,
    pub exit: Option<attrition_record::Model>,
}

pub async fn record_attendance(
    db: &DatabaseConnection,
    input: AttendanceInput,
) -> HrResult<attendance::Model> {
    let span = info_span!(
        "hr.attendance.record",
        employee_id = input.employee_id,
        status = input.status.as_str()
    );
    async move {
        require_employee(db, input.employee_id).await?;
        let active = attendance::ActiveModel {
            id: NotSet,
            employee_id: Set(input.employee_id),
            date: Set(input.date),
            status: Set(input.status),
            created_at: Set(Utc::now()),
        };
        let model = active.insert(db).await.map_err(|err| {
            HrError::from_unique(err, "date", "Attendance already recorded for this date")
        })?;
        info!(attendance_id = model.id, date = %model.date, "attendance recorded");
        Ok(model)
    }
    .instrument(span)
    .await
}

pub async fn record_leave(
    db: &DatabaseConnection,
    input: LeaveInput,
) -> HrResult<leave_record::Model> {
    let span = info_span!(
        "hr.leaves.record",
        employee_id = input.employee_id,
        leave_type = input.leave_type.as_str(),
        approved = input.approved
    );
    async move {
        require_employee(db, input.employee_id).await?;
        let active = leave_record::ActiveModel {
            id: NotSet,
            employee_id: Set(input.employee_id),
            leave_type: Set(input.leave_type),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            duration: Set(input.duration),
            reason: Set(input.reason),
            approved: Set(input.approved),
            created_at: Set(Utc::now()),
        };
        let model = active.insert(db).await?;
        info!(leave_id = model.id, duration = model.duration, "leave recorded");
        Ok(model)
    }
    .instrument(span)
    .await
}

/// Record that employee `employee_id` left and flip their attrition flag.
///
/// An employee can only exit once; the exit may not predate their join date.
pub async fn record_exit(
    db: &DatabaseConnection,
    employee_id: i32,
    input: ExitInput,
) -> HrResult<attrition_record::Model> {
    let span = info_span!(
        "hr.exits.record",
        employee_id,
        reason = input.reason.as_str()
    );
    async move {
        let txn = db.begin().await?;
        let employee = require_employee(&txn, employee_id).await?;
        let existing = attrition_record::Entity::find()
            .filter(attrition_record::Column::EmployeeId.eq(employee_id))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(HrError::invalid(
                "exit_date",
                "Exit already recorded for this employee",
            ));
        }
        if input.exit_date < employee.join_date {
            return Err(HrError::invalid(
                "exit_date",
                "Exit date cannot be before the join date",
            ));
        }

        let now = Utc::now();
        let record = attrition_record::ActiveModel {
            id: NotSet,
            employee_id: Set(employee_id),
            exit_date: Set(input.exit_date),
            reason: Set(input.reason),
            details: Set(input.details),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let mut active: employee::ActiveModel = employee.into();
        active.attrition = Set(Attrition::Yes);
        active.updated_at = Set(now);
        active.update(&txn).await?;
        txn.commit().await?;
        info!(exit_date = %record.exit_date, "exit recorded");
        Ok(record)
    }
    .instrument(span)
    .await
}

pub async fn employee_activity(
    db: &DatabaseConnection,
    employee_id: i32,
) -> HrResult<EmployeeActivity> {
    let attendance = attendance::Entity::find()
        .filter(attendance::Column::EmployeeId.eq(employee_id))
        .order_by_desc(attendance::Column::Date)
        .all(db)
        .await?;
    let leaves = leave_record::Entity::find()
        .filter(leave_record::Column::EmployeeId.eq(employee_id))
        .order_by_desc(leave_record::Column::StartDate)
        .all(db)
        .await?;
    let exit = attrition_record::Entity::find()
        .filter(attrition_record::Column::EmployeeId.eq(employee_id))
        .one(db)
        .await?;
    Ok(EmployeeActivity {
        attendance,
        leaves,
        exit,
    })
}

async fn require_employee<C: ConnectionTrait>(db: &C, id: i32) -> HrResult<employee::Model> {
    employee::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrError::not_found("employee", id))
}
