//! Employee entity - A consultant or manager whose time is scheduled.
//!
//! Employees are linked to engagements through the `engagement_employees` junction table
//! and own their leaves. Inactive employees are kept for history but excluded from
//! availability searches and team statistics.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of an employee inside the team
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum UserType {
    /// Receives engagement and leave notifications
    #[sea_orm(string_value = "Manager")]
    Manager,
    /// Regular team member
    #[sea_orm(string_value = "Employee")]
    Employee,
}

/// Employee database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    /// Unique identifier for the employee
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name, unique across the team
    #[sea_orm(unique)]
    pub username: String,
    /// Display name (e.g., "Sara Ali")
    pub full_name: String,
    /// Contact address
    pub email: String,
    /// Manager or regular employee
    pub user_type: UserType,
    /// Whether the employee is still part of the team
    pub is_active: bool,
    /// Discord user ID, if the employee uses the bot
    pub discord_user_id: Option<String>,
    /// First day the employee counts towards team utilization
    pub date_joined: Date,
}

/// Defines relationships between Employee and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One employee has many leaves
    #[sea_orm(has_many = "super::leave::Entity")]
    Leaves,
    /// One employee has many engagement assignments
    #[sea_orm(has_many = "super::engagement_employee::Entity")]
    EngagementEmployees,
}

impl Related<super::leave::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Leaves.def()
    }
}

impl Related<super::engagement_employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EngagementEmployees.def()
    }
}

impl Related<super::engagement::Entity> for Entity {
    fn to() -> RelationDef {
        super::engagement_employee::Relation::Engagement.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::engagement_employee::Relation::Employee.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
