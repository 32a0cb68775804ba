//! Engagement assignment entity - Junction table for the many-to-many link between
//! engagements and the employees staffed on them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Assignment database model, keyed by `(engagement_id, employee_id)`
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "engagement_employees")]
pub struct Model {
    /// Engagement side of the link
    #[sea_orm(primary_key, auto_increment = false)]
    pub engagement_id: i64,
    /// Employee side of the link
    #[sea_orm(primary_key, auto_increment = false)]
    pub employee_id: i64,
}

/// Defines relationships between the junction and both linked entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each assignment points at one engagement
    #[sea_orm(
        belongs_to = "super::engagement::Entity",
        from = "Column::EngagementId",
        to = "super::engagement::Column::Id",
        on_delete = "Cascade"
    )]
    Engagement,
    /// Each assignment points at one employee
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id",
        on_delete = "Cascade"
    )]
    Employee,
}

impl Related<super::engagement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Engagement.def()
    }
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
