//! Leave entity - An employee's absence from engagement work (training, vacation,
//! working from home) over an inclusive date range.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of absence
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum LeaveType {
    /// Course, certification or conference
    #[sea_orm(string_value = "Training")]
    Training,
    /// Paid time off
    #[sea_orm(string_value = "Vacation")]
    Vacation,
    /// Remote day, still counts as committed time
    #[sea_orm(string_value = "WorkFromHome")]
    WorkFromHome,
}

impl LeaveType {
    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Training => "Training",
            Self::Vacation => "Vacation",
            Self::WorkFromHome => "Work from home",
        }
    }
}

/// Leave database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leaves")]
pub struct Model {
    /// Unique identifier for the leave
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the employee on leave
    pub employee_id: i64,
    /// Kind of absence
    pub leave_type: LeaveType,
    /// First day of the leave (inclusive)
    pub start_date: Date,
    /// Last day of the leave (inclusive)
    pub end_date: Date,
    /// Short description (e.g., "OSCP exam")
    pub note: String,
    /// When the leave was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Leave and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each leave belongs to one employee
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
