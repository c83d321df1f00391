use sea_orm_migration::prelude::*;

use crate::m20251118_000001_employee::Employee;

#[derive(DeriveIden)]
enum Attendance {
    Table,
    Id,
    EmployeeId,
    Date,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum LeaveRecord {
    Table,
    Id,
    EmployeeId,
    LeaveType,
    StartDate,
    EndDate,
    Duration,
    Reason,
    Approved,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AttritionRecord {
    Table,
    Id,
    EmployeeId,
    ExitDate,
    Reason,
    Details,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendance::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendance::EmployeeId).integer().not_null())
                    .col(ColumnDef::new(Attendance::Date).date().not_null())
                    .col(ColumnDef::new(Attendance::Status).string_len(10).not_null())
                    .col(
                        ColumnDef::new(Attendance::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_employee")
                            .from(Attendance::Table, Attendance::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_attendance_employee_date")
                    .table(Attendance::Table)
                    .col(Attendance::EmployeeId)
                    .col(Attendance::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendance_date")
                    .table(Attendance::Table)
                    .col(Attendance::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LeaveRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LeaveRecord::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LeaveRecord::EmployeeId).integer().not_null())
                    .col(
                        ColumnDef::new(LeaveRecord::LeaveType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(LeaveRecord::StartDate).date().not_null())
                    .col(ColumnDef::new(LeaveRecord::EndDate).date().not_null())
                    .col(ColumnDef::new(LeaveRecord::Duration).integer().not_null())
                    .col(ColumnDef::new(LeaveRecord::Reason).text())
                    .col(
                        ColumnDef::new(LeaveRecord::Approved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(LeaveRecord::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_record_employee")
                            .from(LeaveRecord::Table, LeaveRecord::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_leave_record_employee_start")
                    .table(LeaveRecord::Table)
                    .col(LeaveRecord::EmployeeId)
                    .col(LeaveRecord::StartDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_leave_record_type")
                    .table(LeaveRecord::Table)
                    .col(LeaveRecord::LeaveType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AttritionRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttritionRecord::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AttritionRecord::EmployeeId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AttritionRecord::ExitDate).date().not_null())
                    .col(
                        ColumnDef::new(AttritionRecord::Reason)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AttritionRecord::Details).text())
                    .col(
                        ColumnDef::new(AttritionRecord::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attrition_record_employee")
                            .from(AttritionRecord::Table, AttritionRecord::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attrition_record_exit_date")
                    .table(AttritionRecord::Table)
                    .col(AttritionRecord::ExitDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(AttritionRecord::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(LeaveRecord::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attendance::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
