use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The exit of one employee. At most one per employee.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attrition_record")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub employee_id: i32,
    #[sea_orm(indexed)]
    pub exit_date: Date,
    #[sea_orm(indexed)]
    pub reason: ExitReason,
    pub details: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id",
        on_delete = "Cascade"
    )]
    Employee,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(
    Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    #[sea_orm(string_value = "voluntary")]
    Voluntary,
    #[sea_orm(string_value = "terminated")]
    Terminated,
    #[sea_orm(string_value = "retired")]
    Retired,
    #[sea_orm(string_value = "laid_off")]
    LaidOff,
    #[sea_orm(string_value = "other")]
    Other,
}

impl ExitReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ExitReason::Voluntary => "voluntary",
            ExitReason::Terminated => "terminated",
            ExitReason::Retired => "retired",
            ExitReason::LaidOff => "laid_off",
            ExitReason::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExitReason::Voluntary => "Voluntary Resignation",
            ExitReason::Terminated => "Termination",
            ExitReason::Retired => "Retirement",
            ExitReason::LaidOff => "Lay Off",
            ExitReason::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "voluntary" => Some(ExitReason::Voluntary),
            "terminated" => Some(ExitReason::Terminated),
            "retired" => Some(ExitReason::Retired),
            "laid_off" => Some(ExitReason::LaidOff),
            "other" => Some(ExitReason::Other),
            _ => None,
        }
    }
}
