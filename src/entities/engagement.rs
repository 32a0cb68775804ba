//! Engagement entity - A scheduled client project with an inclusive date range.
//!
//! Each engagement belongs to one client and one service type, and is staffed by any
//! number of employees through the `engagement_employees` junction table.
//! `start_date <= end_date` is enforced when the engagement is created, not by the table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Engagement database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "engagements")]
pub struct Model {
    /// Unique identifier for the engagement
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Engagement name
    pub name: String,
    /// ID of the owning client
    pub client_id: i64,
    /// ID of the service type delivered
    pub service_id: i64,
    /// First working day (inclusive)
    pub start_date: Date,
    /// Last working day (inclusive)
    pub end_date: Date,
    /// Free-form scope description
    pub scope: Option<String>,
    /// When the engagement was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Engagement and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each engagement belongs to one client
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    /// Each engagement delivers one service
    #[sea_orm(
        belongs_to = "super::service::Entity",
        from = "Column::ServiceId",
        to = "super::service::Column::Id"
    )]
    Service,
    /// One engagement has many assignments
    #[sea_orm(has_many = "super::engagement_employee::Entity")]
    EngagementEmployees,
    /// One engagement has many vulnerabilities
    #[sea_orm(has_many = "super::vulnerability::Entity")]
    Vulnerabilities,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl Related<super::engagement_employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EngagementEmployees.def()
    }
}

impl Related<super::vulnerability::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vulnerabilities.def()
    }
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        super::engagement_employee::Relation::Employee.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::engagement_employee::Relation::Engagement.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
