//! Stored quotation

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::tariff::TransportMode;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quotations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_id: String,
    pub origin: String,
    pub destination: String,
    pub mode: TransportMode,
    pub pieces_count: i32,
    #[sea_orm(column_type = "Decimal(Some((14, 3)))")]
    pub weight_kg: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 6)))")]
    pub volume_m3: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 3)))")]
    pub volumetric_weight_kg: Decimal,
    pub tariff_id: i32,
    #[sea_orm(column_type = "Decimal(Some((14, 4)))")]
    pub rate_usd: Decimal,
    /// WEIGHT or VOLUME
    pub chargeable_basis: String,
    #[sea_orm(column_type = "Decimal(Some((14, 6)))")]
    pub chargeable_value: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount_usd: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
    #[sea_orm(
        belongs_to = "super::tariff::Entity",
        from = "Column::TariffId",
        to = "super::tariff::Column::Id"
    )]
    Tariff,
    #[sea_orm(has_many = "super::quotation_item::Entity")]
    Items,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::tariff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tariff.def()
    }
}

impl Related<super::quotation_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
