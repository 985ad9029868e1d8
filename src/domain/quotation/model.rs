use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::charge::{ChargeBasis, PieceMeasure};
use crate::domain::shipping::TransportMode;

#[derive(Debug, Clone, PartialEq)]
pub struct QuotationItem {
    pub weight_kg: Decimal,
    pub length_cm: Decimal,
    pub width_cm: Decimal,
    pub height_cm: Decimal,
    pub volume_m3: Decimal,
    pub volumetric_weight_kg: Decimal,
}

impl From<PieceMeasure> for QuotationItem {
    fn from(m: PieceMeasure) -> Self {
        Self {
            weight_kg: m.piece.weight_kg,
            length_cm: m.piece.length_cm,
            width_cm: m.piece.width_cm,
            height_cm: m.piece.height_cm,
            volume_m3: m.volume_m3,
            volumetric_weight_kg: m.volumetric_weight_kg,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Quotation {
    pub id: i32,
    pub owner_id: String,
    /// Filled by list/detail queries that join users
    pub owner_username: Option<String>,
    pub origin: String,
    pub destination: String,
    pub mode: TransportMode,
    pub pieces_count: i32,
    pub weight_kg: Decimal,
    pub volume_m3: Decimal,
    pub volumetric_weight_kg: Decimal,
    pub tariff_id: i32,
    pub rate_usd: Decimal,
    pub basis: ChargeBasis,
    pub chargeable_value: Decimal,
    pub amount_usd: Decimal,
    pub items: Vec<QuotationItem>,
    pub created_at: DateTime<Utc>,
}

impl Quotation {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewQuotation {
    pub owner_id: String,
    pub origin: String,
    pub destination: String,
    pub mode: TransportMode,
    pub weight_kg: Decimal,
    pub volume_m3: Decimal,
    pub volumetric_weight_kg: Decimal,
    pub tariff_id: i32,
    pub rate_usd: Decimal,
    pub basis: ChargeBasis,
    pub chargeable_value: Decimal,
    pub amount_usd: Decimal,
    pub items: Vec<QuotationItem>,
    pub created_at: DateTime<Utc>,
}

/// History query. `owner_id = None` means every owner (admin view).
#[derive(Debug, Clone, Default)]
pub struct QuotationFilter {
    pub owner_id: Option<String>,
    pub mode: Option<TransportMode>,
    /// Matched against owner username, origin and destination
    pub search: Option<String>,
    pub page: u64,
    pub limit: u64,
}
