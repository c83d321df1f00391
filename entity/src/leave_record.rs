use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "leave_record")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub employee_id: i32,
    #[sea_orm(indexed)]
    pub leave_type: LeaveType,
    pub start_date: Date,
    pub end_date: Date,
    /// Length of the leave in days.
    pub duration: i32,
    pub reason: Option<String>,
    pub approved: bool,
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
pub enum LeaveType {
    #[sea_orm(string_value = "sick")]
    Sick,
    #[sea_orm(string_value = "annual")]
    Annual,
    #[sea_orm(string_value = "casual")]
    Casual,
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    #[sea_orm(string_value = "maternity")]
    Maternity,
}

impl LeaveType {
    pub fn as_str(self) -> &'static str {
        match self {
            LeaveType::Sick => "sick",
            LeaveType::Annual => "annual",
            LeaveType::Casual => "casual",
            LeaveType::Unpaid => "unpaid",
            LeaveType::Maternity => "maternity",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LeaveType::Sick => "Sick Leave",
            LeaveType::Annual => "Annual Leave",
            LeaveType::Casual => "Casual Leave",
            LeaveType::Unpaid => "Unpaid Leave",
            LeaveType::Maternity => "Maternity Leave",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "sick" => Some(LeaveType::Sick),
            "annual" => Some(LeaveType::Annual),
            "casual" => Some(LeaveType::Casual),
            "unpaid" => Some(LeaveType::Unpaid),
            "maternity" => Some(LeaveType::Maternity),
            _ => None,
        }
    }
}
