//! Employee records: create, read, update, delete and listing.

use chrono::Utc;
use entity::employee::{self, Attrition};
use entity::{attendance, attrition_record, leave_record};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, info, info_span};

use crate::error::{HrError, HrResult};
use crate::validation::{EmployeeInput, normalize_optional, today};

const DUPLICATE_CODE: &str = "Employee code already exists";

/// Which side of the attrition flag to list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmploymentStatus {
    Active,
    Attrited,
}

impl EmploymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EmploymentStatus::Active => "active",
            EmploymentStatus::Attrited => "attrited",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(EmploymentStatus::Active),
            "attrited" | "exited" => Some(EmploymentStatus::Attrited),
            _ => None,
        }
    }
}

/// Query-string shape of the employee list filters.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EmployeeQuery {
    pub department: Option<String>,
    pub status: Option<String>,
    pub q: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub department: Option<String>,
    pub status: Option<EmploymentStatus>,
    pub q: Option<String>,
}

impl From<&EmployeeQuery> for EmployeeFilter {
    /// Unknown status values are ignored rather than rejected.
    fn from(query: &EmployeeQuery) -> Self {
        Self {
            department: normalize_optional(query.department.as_deref()),
            status: query.status.as_deref().and_then(EmploymentStatus::parse),
            q: normalize_optional(query.q.as_deref()),
        }
    }
}

pub async fn create_employee(
    db: &DatabaseConnection,
    input: EmployeeInput,
) -> HrResult<employee::Model> {
    input.validate(today())?;
    let span = info_span!(
        "hr.employees.create",
        department = input.department.as_str(),
        attrition = input.attrition.as_str()
    );
    async move {
        ensure_code_available(db, &input.emp_code, None).await?;
        let now = Utc::now();
        let active = employee::ActiveModel {
            id: NotSet,
            emp_code: Set(input.emp_code),
            name: Set(input.name),
            department: Set(input.department),
            gender: Set(input.gender),
            age: Set(input.age),
            salary: Set(input.salary),
            attrition: Set(input.attrition),
            join_date: Set(input.join_date),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = active
            .insert(db)
            .await
            .map_err(|err| HrError::from_unique(err, "emp_code", DUPLICATE_CODE))?;
        info!(employee_id = model.id, emp_code = %model.emp_code, "employee created");
        Ok(model)
    }
    .instrument(span)
    .await
}

pub async fn get_employee(db: &DatabaseConnection, id: i32) -> HrResult<employee::Model> {
    employee::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrError::not_found("employee", id))
}

/// Replace every editable field of employee `id`.
///
/// Moving an attrited employee back to `No` removes their exit record.
pub async fn update_employee(
    db: &DatabaseConnection,
    id: i32,
    input: EmployeeInput,
) -> HrResult<employee::Model> {
    input.validate(today())?;
    let span = info_span!("hr.employees.update", employee_id = id);
    async move {
        let txn = db.begin().await?;
        let existing = employee::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| HrError::not_found("employee", id))?;
        if existing.emp_code != input.emp_code {
            ensure_code_available(&txn, &input.emp_code, Some(id)).await?;
        }

        let rehired = existing.attrition == Attrition::Yes && input.attrition == Attrition::No;
        let mut active: employee::ActiveModel = existing.into();
        active.emp_code = Set(input.emp_code);
        active.name = Set(input.name);
        active.department = Set(input.department);
        active.gender = Set(input.gender);
        active.age = Set(input.age);
        active.salary = Set(input.salary);
        active.attrition = Set(input.attrition);
        active.join_date = Set(input.join_date);
        active.updated_at = Set(Utc::now());
        let updated = active
            .update(&txn)
            .await
            .map_err(|err| HrError::from_unique(err, "emp_code", DUPLICATE_CODE))?;

        if rehired {
            attrition_record::Entity::delete_many()
                .filter(attrition_record::Column::EmployeeId.eq(id))
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;
        info!(employee_id = id, rehired, "employee updated");
        Ok(updated)
    }
    .instrument(span)
    .await
}

/// Delete employee `id` together with their attendance, leave and exit rows.
pub async fn delete_employee(db: &DatabaseConnection, id: i32) -> HrResult<()> {
    let span = info_span!("hr.employees.delete", employee_id = id);
    async move {
        let txn = db.begin().await?;
        attendance::Entity::delete_many()
            .filter(attendance::Column::EmployeeId.eq(id))
            .exec(&txn)
            .await?;
        leave_record::Entity::delete_many()
            .filter(leave_record::Column::EmployeeId.eq(id))
            .exec(&txn)
            .await?;
        attrition_record::Entity::delete_many()
            .filter(attrition_record::Column::EmployeeId.eq(id))
            .exec(&txn)
            .await?;
        let result = employee::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(HrError::not_found("employee", id));
        }
        txn.commit().await?;
        info!(employee_id = id, "employee deleted");
        Ok(())
    }
    .instrument(span)
    .await
}

/// Employees matching `filter`, ordered by employee code.
pub async fn list_employees(
    db: &DatabaseConnection,
    filter: &EmployeeFilter,
) -> HrResult<Vec<employee::Model>> {
    let span = info_span!(
        "hr.employees.list",
        department = filter.department.as_deref().unwrap_or(""),
        status = filter.status.map(EmploymentStatus::as_str).unwrap_or(""),
        has_q = filter.q.is_some()
    );
    let mut query = employee::Entity::find();
    if let Some(department) = &filter.department {
        query = query.filter(employee::Column::Department.eq(department.as_str()));
    }
    match filter.status {
        Some(EmploymentStatus::Active) => {
            query = query.filter(employee::Column::Attrition.eq(Attrition::No));
        }
        Some(EmploymentStatus::Attrited) => {
            query = query.filter(employee::Column::Attrition.eq(Attrition::Yes));
        }
        None => {}
    }
    if let Some(q) = &filter.q {
        let pattern = format!("%{}%", q.to_lowercase());
        let name_expr = Expr::expr(Func::lower(Expr::col(employee::Column::Name)));
        let code_expr = Expr::expr(Func::lower(Expr::col(employee::Column::EmpCode)));
        query = query.filter(
            Condition::any()
                .add(name_expr.like(pattern.clone()))
                .add(code_expr.like(pattern)),
        );
    }
    let rows = query
        .order_by_asc(employee::Column::EmpCode)
        .all(db)
        .instrument(span)
        .await?;
    Ok(rows)
}

/// Every employee ordered by id.
pub async fn all_employees(db: &DatabaseConnection) -> HrResult<Vec<employee::Model>> {
    Ok(employee::Entity::find()
        .order_by_asc(employee::Column::Id)
        .all(db)
        .await?)
}

/// Distinct department names, alphabetically.
pub async fn departments(db: &DatabaseConnection) -> HrResult<Vec<String>> {
    Ok(employee::Entity::find()
        .select_only()
        .column(employee::Column::Department)
        .distinct()
        .order_by_asc(employee::Column::Department)
        .into_tuple::<String>()
        .all(db)
        .await?)
}

pub async fn count_employees(db: &DatabaseConnection) -> HrResult<u64> {
    Ok(employee::Entity::find().count(db).await?)
}

async fn ensure_code_available<C: ConnectionTrait>(
    db: &C,
    emp_code: &str,
    exclude: Option<i32>,
) -> HrResult<()> {
    let mut query = employee::Entity::find().filter(employee::Column::EmpCode.eq(emp_code));
    if let Some(id) = exclude {
        query = query.filter(employee::Column::Id.ne(id));
    }
    if query.count(db).await? > 0 {
        return Err(HrError::invalid("emp_code", DUPLICATE_CODE));
    }
    Ok(())
}
