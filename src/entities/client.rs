//! Client entity - An organisation that owns engagements.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Client database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    /// Unique identifier for the client
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full client name
    #[sea_orm(unique)]
    pub name: String,
    /// Short name shown in compact views (e.g., "ACME")
    pub acronym: String,
    /// Four character billing code
    pub code: String,
}

/// Defines relationships between Client and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One client has many engagements
    #[sea_orm(has_many = "super::engagement::Entity")]
    Engagements,
}

impl Related<super::engagement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Engagements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
