//! Service entity - The catalogue of service types an engagement can deliver
//! (penetration test, code review, ...). Seeded from `config.toml`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Service database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    /// Unique identifier for the service
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Service name (e.g., "Penetration Test")
    #[sea_orm(unique)]
    pub name: String,
    /// Abbreviation (e.g., "PT")
    pub short_name: String,
}

/// Defines relationships between Service and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One service is delivered by many engagements
    #[sea_orm(has_many = "super::engagement::Entity")]
    Engagements,
}

impl Related<super::engagement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Engagements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
