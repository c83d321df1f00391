use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "employee")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub emp_code: String,
    pub name: String,
    #[sea_orm(indexed)]
    pub department: String,
    pub gender: Gender,
    pub age: i32,
    #[sea_orm(column_type = "Double")]
    pub salary: f64,
    #[sea_orm(indexed)]
    pub attrition: Attrition,
    pub join_date: Date,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    pub fn is_active(&self) -> bool {
        self.attrition == Attrition::No
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
    #[sea_orm(has_many = "super::leave_record::Entity")]
    LeaveRecord,
    #[sea_orm(has_one = "super::attrition_record::Entity")]
    AttritionRecord,
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl Related<super::leave_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveRecord.def()
    }
}

impl Related<super::attrition_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttritionRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(
    Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
pub enum Gender {
    #[sea_orm(string_value = "Male")]
    Male,
    #[sea_orm(string_value = "Female")]
    Female,
    #[sea_orm(string_value = "Other")]
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

/// Whether the employee has left the organization.
#[derive(
    Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(8))")]
pub enum Attrition {
    #[sea_orm(string_value = "Yes")]
    Yes,
    #[sea_orm(string_value = "No")]
    No,
}

impl Attrition {
    pub fn as_str(self) -> &'static str {
        match self {
            Attrition::Yes => "Yes",
            Attrition::No => "No",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" | "1" => Some(Attrition::Yes),
            "no" | "false" | "0" => Some(Attrition::No),
            _ => None,
        }
    }
}
