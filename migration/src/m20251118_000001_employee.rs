use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub(crate) enum Employee {
    Table,
    Id,
    EmpCode,
    Name,
    Department,
    Gender,
    Age,
    Salary,
    Attrition,
    JoinDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employee::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employee::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Employee::EmpCode)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Employee::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Employee::Department)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Employee::Gender).string_len(16).not_null())
                    .col(ColumnDef::new(Employee::Age).integer().not_null())
                    .col(ColumnDef::new(Employee::Salary).double().not_null())
                    .col(
                        ColumnDef::new(Employee::Attrition)
                            .string_len(8)
                            .not_null()
                            .default("No"),
                    )
                    .col(ColumnDef::new(Employee::JoinDate).date().not_null())
                    .col(
                        ColumnDef::new(Employee::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employee::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employee_department")
                    .table(Employee::Table)
                    .col(Employee::Department)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employee_attrition")
                    .table(Employee::Table)
                    .col(Employee::Attrition)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employee::Table).if_exists().to_owned())
            .await
    }
}
