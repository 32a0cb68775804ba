//! Vulnerability entity - A finding reported during an engagement.
//!
//! Open findings feed the client risk score and the engagement priority score;
//! each severity has an SLA window after which an open finding is overdue.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Finding severity, ordered from least to most severe
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Severity {
    /// Informational or hardening issue
    #[sea_orm(string_value = "Low")]
    Low,
    /// Limited impact
    #[sea_orm(string_value = "Medium")]
    Medium,
    /// Significant impact
    #[sea_orm(string_value = "High")]
    High,
    /// Immediate exploitation risk
    #[sea_orm(string_value = "Critical")]
    Critical,
}

/// Remediation state of a finding
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum VulnerabilityStatus {
    /// Not yet remediated
    #[sea_orm(string_value = "Open")]
    Open,
    /// Remediated
    #[sea_orm(string_value = "Fixed")]
    Fixed,
}

/// Vulnerability database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vulnerabilities")]
pub struct Model {
    /// Unique identifier for the vulnerability
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the engagement that reported it
    pub engagement_id: i64,
    /// Short title
    pub title: String,
    /// Severity rating
    pub severity: Severity,
    /// Open or fixed
    pub status: VulnerabilityStatus,
    /// When the finding was recorded
    pub created_at: DateTimeUtc,
    /// When the finding was marked fixed
    pub fixed_at: Option<DateTimeUtc>,
    /// Employee who reported it
    pub created_by: Option<i64>,
    /// Employee who marked it fixed
    pub fixed_by: Option<i64>,
}

/// Defines relationships between Vulnerability and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each vulnerability belongs to one engagement
    #[sea_orm(
        belongs_to = "super::engagement::Entity",
        from = "Column::EngagementId",
        to = "super::engagement::Column::Id",
        on_delete = "Cascade"
    )]
    Engagement,
}

impl Related<super::engagement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Engagement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
