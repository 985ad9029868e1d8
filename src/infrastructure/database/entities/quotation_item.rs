//! One package of a quotation

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quotation_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub quotation_id: i32,
    /// 1-based order as entered
    pub position: i32,
    #[sea_orm(column_type = "Decimal(Some((14, 3)))")]
    pub weight_kg: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub length_cm: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub width_cm: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub height_cm: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 6)))")]
    pub volume_m3: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 3)))")]
    pub volumetric_weight_kg: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quotation::Entity",
        from = "Column::QuotationId",
        to = "super::quotation::Column::Id"
    )]
    Quotation,
}

impl Related<super::quotation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
