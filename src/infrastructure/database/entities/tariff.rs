//! Versioned freight tariff

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum TransportMode {
    #[sea_orm(string_value = "air")]
    Air,
    #[sea_orm(string_value = "sea")]
    Sea,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tariffs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Entry point code
    pub origin: String,

    pub mode: TransportMode,

    /// USD per kg (air) or per m³ (sea)
    #[sea_orm(column_type = "Decimal(Some((14, 4)))")]
    pub rate_usd: Decimal,

    pub valid_from: DateTime<Utc>,

    /// NULL while the tariff is the current one for its key
    pub valid_until: Option<DateTime<Utc>>,

    pub created_by: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::quotation::Entity")]
    Quotations,
}

impl Related<super::quotation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
