mod common;

use common::{days_ago, hire, input, setup_db};
use entity::attendance::Status;
use entity::attrition_record::ExitReason;
use entity::employee::Attrition;
use entity::leave_record::LeaveType;
use products_hr::HrError;
use products_hr::activity;
use products_hr::employees::{self, EmployeeFilter, EmploymentStatus};
use products_hr::validation::{AttendanceInput, ExitInput, LeaveInput};

#[tokio::test]
async fn create_then_read_returns_the_same_fields() {
    let db = setup_db().await;
    let created = hire(&db, "ENG-1", "Engineering").await;
    let loaded = employees::get_employee(&db, created.id).await.unwrap();
    assert_eq!(loaded.emp_code, "ENG-1");
    assert_eq!(loaded.department, "Engineering");
    assert_eq!(loaded.salary, 70_000.0);
    assert_eq!(loaded.join_date, days_ago(700));
    assert!(loaded.is_active());
}

#[tokio::test]
async fn duplicate_code_is_a_field_error() {
    let db = setup_db().await;
    hire(&db, "ENG-1", "Engineering").await;
    let err = employees::create_employee(&db, input("ENG-1", "Sales"))
        .await
        .unwrap_err();
    let errors = err.validation_errors().expect("validation error");
    assert_eq!(errors.first("emp_code"), "Employee code already exists");
    assert_eq!(employees::count_employees(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn invalid_update_leaves_record_untouched() {
    let db = setup_db().await;
    let created = hire(&db, "FIN-1", "Finance").await;
    let mut change = input("FIN-1", "Finance");
    change.salary = -5.0;
    let err = employees::update_employee(&db, created.id, change)
        .await
        .unwrap_err();
    assert!(err.validation_errors().unwrap().has("salary"));
    let loaded = employees::get_employee(&db, created.id).await.unwrap();
    assert_eq!(loaded.salary, created.salary);
    assert_eq!(loaded.name, created.name);
}

#[tokio::test]
async fn update_cannot_steal_another_code() {
    let db = setup_db().await;
    hire(&db, "OPS-1", "Operations").await;
    let second = hire(&db, "OPS-2", "Operations").await;
    let err = employees::update_employee(&db, second.id, input("OPS-1", "Operations"))
        .await
        .unwrap_err();
    assert!(err.validation_errors().unwrap().has("emp_code"));
}

#[tokio::test]
async fn missing_employee_is_not_found() {
    let db = setup_db().await;
    assert!(employees::get_employee(&db, 42).await.unwrap_err().is_not_found());
    assert!(employees::delete_employee(&db, 42).await.unwrap_err().is_not_found());
    assert!(
        employees::update_employee(&db, 42, input("X-1", "Sales"))
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn delete_removes_dependent_records() {
    let db = setup_db().await;
    let keep = hire(&db, "SUP-1", "Support").await;
    let gone = hire(&db, "SUP-2", "Support").await;
    for employee_id in [keep.id, gone.id] {
        activity::record_attendance(
            &db,
            AttendanceInput {
                employee_id,
                date: days_ago(3),
                status: Status::Present,
            },
        )
        .await
        .unwrap();
        activity::record_leave(
            &db,
            LeaveInput {
                employee_id,
                leave_type: LeaveType::Casual,
                start_date: days_ago(20),
                end_date: days_ago(19),
                duration: 2,
                reason: None,
                approved: true,
            },
        )
        .await
        .unwrap();
    }

    employees::delete_employee(&db, gone.id).await.unwrap();
    assert!(employees::get_employee(&db, gone.id).await.unwrap_err().is_not_found());
    let orphaned = activity::employee_activity(&db, gone.id).await.unwrap();
    assert!(orphaned.attendance.is_empty());
    assert!(orphaned.leaves.is_empty());
    let kept = activity::employee_activity(&db, keep.id).await.unwrap();
    assert_eq!(kept.attendance.len(), 1);
    assert_eq!(kept.leaves.len(), 1);
}

#[tokio::test]
async fn list_filters_by_department_status_and_text() {
    let db = setup_db().await;
    let a = hire(&db, "ENG-2", "Engineering").await;
    hire(&db, "ENG-1", "Engineering").await;
    hire(&db, "SAL-1", "Sales").await;
    activity::record_exit(
        &db,
        a.id,
        ExitInput {
            exit_date: days_ago(10),
            reason: ExitReason::Voluntary,
            details: None,
        },
    )
    .await
    .unwrap();

    let engineering = employees::list_employees(
        &db,
        &EmployeeFilter {
            department: Some("Engineering".into()),
            ..EmployeeFilter::default()
        },
    )
    .await
    .unwrap();
    let codes: Vec<_> = engineering.iter().map(|e| e.emp_code.as_str()).collect();
    assert_eq!(codes, vec!["ENG-1", "ENG-2"]);

    let attrited = employees::list_employees(
        &db,
        &EmployeeFilter {
            status: Some(EmploymentStatus::Attrited),
            ..EmployeeFilter::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(attrited.len(), 1);
    assert_eq!(attrited[0].id, a.id);

    let search = employees::list_employees(
        &db,
        &EmployeeFilter {
            q: Some("sal".into()),
            ..EmployeeFilter::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(search.len(), 1);
    assert_eq!(search[0].emp_code, "SAL-1");

    assert_eq!(
        employees::departments(&db).await.unwrap(),
        vec!["Engineering".to_string(), "Sales".to_string()]
    );
}

#[tokio::test]
async fn exit_flips_attrition_and_rehire_clears_it() {
    let db = setup_db().await;
    let person = hire(&db, "MKT-1", "Marketing").await;
    let exit = ExitInput {
        exit_date: days_ago(5),
        reason: ExitReason::Retired,
        details: Some("Farewell lunch held".into()),
    };
    activity::record_exit(&db, person.id, exit.clone()).await.unwrap();
    let after_exit = employees::get_employee(&db, person.id).await.unwrap();
    assert_eq!(after_exit.attrition, Attrition::Yes);

    let again = activity::record_exit(&db, person.id, exit).await.unwrap_err();
    assert!(matches!(again, HrError::Validation(_)));

    employees::update_employee(&db, person.id, input("MKT-1", "Marketing"))
        .await
        .unwrap();
    let history = activity::employee_activity(&db, person.id).await.unwrap();
    assert!(history.exit.is_none());
    assert!(employees::get_employee(&db, person.id).await.unwrap().is_active());
}

#[tokio::test]
async fn exit_before_join_date_is_rejected() {
    let db = setup_db().await;
    let person = hire(&db, "HR-1", "HR").await;
    let err = activity::record_exit(
        &db,
        person.id,
        ExitInput {
            exit_date: days_ago(900),
            reason: ExitReason::Other,
            details: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(
        err.validation_errors().unwrap().first("exit_date"),
        "Exit date cannot be before the join date"
    );
    assert!(employees::get_employee(&db, person.id).await.unwrap().is_active());
}

#[tokio::test]
async fn attendance_is_unique_per_day() {
    let db = setup_db().await;
    let person = hire(&db, "PRD-1", "Product").await;
    let mark = AttendanceInput {
        employee_id: person.id,
        date: days_ago(1),
        status: Status::HalfDay,
    };
    activity::record_attendance(&db, mark.clone()).await.unwrap();
    let err = activity::record_attendance(&db, mark).await.unwrap_err();
    assert!(err.validation_errors().unwrap().has("date"));

    let unknown = activity::record_attendance(
        &db,
        AttendanceInput {
            employee_id: 999,
            date: days_ago(1),
            status: Status::Present,
        },
    )
    .await
    .unwrap_err();
    assert!(unknown.is_not_found());
}
