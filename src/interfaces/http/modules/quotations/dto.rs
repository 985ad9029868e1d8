//! Quotation DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::{QuotationPreview, QuotationRequest, Shipment};
use crate::domain::charge::Piece;
use crate::domain::quotation::{QuotationFilter, QuotationItem};
use crate::domain::{DomainError, Quotation};
use crate::interfaces::http::common::{origin_spec, parse_mode};
use crate::interfaces::http::modules::tariffs::TariffResponse;
use crate::shared::validate_pagination;

/// One package, dimensions in centimetres
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PieceRequest {
    #[schema(value_type = String, example = "12.5")]
    pub weight_kg: Decimal,
    #[schema(value_type = String, example = "40")]
    pub length_cm: Decimal,
    #[schema(value_type = String, example = "30")]
    pub width_cm: Decimal,
    #[schema(value_type = String, example = "20")]
    pub height_cm: Decimal,
}

impl From<PieceRequest> for Piece {
    fn from(p: PieceRequest) -> Self {
        Self {
            weight_kg: p.weight_kg,
            length_cm: p.length_cm,
            width_cm: p.width_cm,
            height_cm: p.height_cm,
        }
    }
}

/// Shipment to quote. Give either `pieces` or the totals
/// `weight_kg` + `volume_m3`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQuotationRequest {
    /// Entry point code, e.g. `BOG`
    #[validate(length(max = 20, message = "origin must be at most 20 characters"))]
    pub origin: Option<String>,
    /// Country resolved through the entry point mapping
    #[validate(length(max = 80, message = "origin_country must be at most 80 characters"))]
    pub origin_country: Option<String>,
    #[validate(length(min = 1, max = 120, message = "destination must be 1-120 characters"))]
    pub destination: String,
    /// `air` or `sea`
    pub mode: String,
    #[schema(value_type = Option<String>, example = "100")]
    pub weight_kg: Option<Decimal>,
    #[schema(value_type = Option<String>, example = "0.1")]
    pub volume_m3: Option<Decimal>,
    #[validate(length(min = 1, max = 200, message = "between 1 and 200 pieces"))]
    pub pieces: Option<Vec<PieceRequest>>,
}

impl TryFrom<CreateQuotationRequest> for QuotationRequest {
    type Error = DomainError;

    fn try_from(req: CreateQuotationRequest) -> Result<Self, Self::Error> {
        let shipment = match (req.pieces, req.weight_kg, req.volume_m3) {
            (Some(pieces), None, None) => {
                Shipment::Pieces(pieces.into_iter().map(Piece::from).collect())
            }
            (None, Some(weight_kg), Some(volume_m3)) => Shipment::Totals {
                weight_kg,
                volume_m3,
            },
            (Some(_), _, _) => {
                return Err(DomainError::Validation(
                    "give either pieces or weight_kg/volume_m3, not both".into(),
                ))
            }
            (None, _, _) => {
                return Err(DomainError::Validation(
                    "weight_kg and volume_m3 are required when no pieces are given".into(),
                ))
            }
        };

        Ok(Self {
            origin: origin_spec(req.origin, req.origin_country)?,
            destination: req.destination,
            mode: parse_mode(&req.mode)?,
            shipment,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuotationItemDto {
    #[schema(value_type = String)]
    pub weight_kg: Decimal,
    #[schema(value_type = String)]
    pub length_cm: Decimal,
    #[schema(value_type = String)]
    pub width_cm: Decimal,
    #[schema(value_type = String)]
    pub height_cm: Decimal,
    #[schema(value_type = String)]
    pub volume_m3: Decimal,
    #[schema(value_type = String)]
    pub volumetric_weight_kg: Decimal,
}

impl From<QuotationItem> for QuotationItemDto {
    fn from(i: QuotationItem) -> Self {
        Self {
            weight_kg: i.weight_kg,
            length_cm: i.length_cm,
            width_cm: i.width_cm,
            height_cm: i.height_cm,
            volume_m3: i.volume_m3,
            volumetric_weight_kg: i.volumetric_weight_kg,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuotationDto {
    pub id: i32,
    pub owner_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_username: Option<String>,
    pub origin: String,
    pub destination: String,
    pub mode: String,
    pub pieces: i32,
    #[schema(value_type = String)]
    pub weight_kg: Decimal,
    #[schema(value_type = String)]
    pub volume_m3: Decimal,
    #[schema(value_type = String)]
    pub volumetric_weight_kg: Decimal,
    pub tariff_id: i32,
    #[schema(value_type = String)]
    pub rate_usd: Decimal,
    pub rate_unit: String,
    /// `WEIGHT` or `VOLUME`
    pub chargeable_basis: String,
    #[schema(value_type = String)]
    pub chargeable_value: Decimal,
    #[schema(value_type = String, example = "500.00")]
    pub amount_usd: Decimal,
    pub items: Vec<QuotationItemDto>,
    pub created_at: DateTime<Utc>,
}

impl From<Quotation> for QuotationDto {
    fn from(q: Quotation) -> Self {
        Self {
            id: q.id,
            owner_id: q.owner_id,
            owner_username: q.owner_username,
            origin: q.origin,
            destination: q.destination,
            mode: q.mode.to_string(),
            pieces: q.pieces_count,
            weight_kg: q.weight_kg,
            volume_m3: q.volume_m3,
            volumetric_weight_kg: q.volumetric_weight_kg,
            tariff_id: q.tariff_id,
            rate_usd: q.rate_usd,
            rate_unit: q.mode.rate_unit().to_string(),
            chargeable_basis: q.basis.to_string(),
            chargeable_value: q.chargeable_value,
            amount_usd: q.amount_usd,
            items: q.items.into_iter().map(QuotationItemDto::from).collect(),
            created_at: q.created_at,
        }
    }
}

/// A priced request that was not stored
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuotationPreviewDto {
    pub origin: String,
    pub destination: String,
    pub mode: String,
    pub tariff: TariffResponse,
    #[schema(value_type = String)]
    pub weight_kg: Decimal,
    #[schema(value_type = String)]
    pub volume_m3: Decimal,
    #[schema(value_type = String)]
    pub volumetric_weight_kg: Decimal,
    pub chargeable_basis: String,
    #[schema(value_type = String)]
    pub chargeable_value: Decimal,
    #[schema(value_type = String)]
    pub amount_usd: Decimal,
    pub items: Vec<QuotationItemDto>,
}

impl From<QuotationPreview> for QuotationPreviewDto {
    fn from(p: QuotationPreview) -> Self {
        Self {
            origin: p.origin,
            destination: p.destination,
            mode: p.mode.to_string(),
            tariff: p.tariff.into(),
            weight_kg: p.weight_kg,
            volume_m3: p.volume_m3,
            volumetric_weight_kg: p.breakdown.volumetric_weight_kg,
            chargeable_basis: p.breakdown.basis.to_string(),
            chargeable_value: p.breakdown.chargeable_value,
            amount_usd: p.breakdown.amount_usd,
            items: p.items.into_iter().map(QuotationItemDto::from).collect(),
        }
    }
}

/// History filters. Admin endpoints see every owner.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuotationListParams {
    /// `air` or `sea`
    pub mode: Option<String>,
    /// Matches username, origin or destination
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl TryFrom<QuotationListParams> for QuotationFilter {
    type Error = DomainError;

    fn try_from(params: QuotationListParams) -> Result<Self, Self::Error> {
        let (page, limit) = validate_pagination(params.page, params.limit);
        Ok(Self {
            owner_id: None,
            mode: params.mode.as_deref().map(parse_mode).transpose()?,
            search: params
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            page,
            limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::OriginSpec;
    use crate::domain::TransportMode;

    fn request() -> CreateQuotationRequest {
        CreateQuotationRequest {
            origin: Some("BOG".into()),
            origin_country: None,
            destination: "Miami".into(),
            mode: "air".into(),
            weight_kg: None,
            volume_m3: None,
            pieces: None,
        }
    }

    #[test]
    fn totals_request_converts() {
        let req = CreateQuotationRequest {
            weight_kg: Some(Decimal::new(100, 0)),
            volume_m3: Some(Decimal::new(1, 1)),
            ..request()
        };
        let converted = QuotationRequest::try_from(req).unwrap();
        assert_eq!(converted.origin, OriginSpec::Code("BOG".into()));
        assert_eq!(converted.mode, TransportMode::Air);
        assert!(matches!(converted.shipment, Shipment::Totals { .. }));
    }

    #[test]
    fn pieces_and_totals_are_exclusive() {
        let piece = PieceRequest {
            weight_kg: Decimal::ONE,
            length_cm: Decimal::TEN,
            width_cm: Decimal::TEN,
            height_cm: Decimal::TEN,
        };
        let both = CreateQuotationRequest {
            weight_kg: Some(Decimal::ONE),
            pieces: Some(vec![piece.clone()]),
            ..request()
        };
        assert!(QuotationRequest::try_from(both).is_err());

        let only_pieces = CreateQuotationRequest {
            pieces: Some(vec![piece]),
            ..request()
        };
        assert!(matches!(
            QuotationRequest::try_from(only_pieces).unwrap().shipment,
            Shipment::Pieces(ref p) if p.len() == 1
        ));
    }

    #[test]
    fn totals_need_weight_and_volume() {
        let req = CreateQuotationRequest {
            weight_kg: Some(Decimal::ONE),
            ..request()
        };
        assert!(matches!(
            QuotationRequest::try_from(req),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn piece_count_is_validated() {
        let piece = PieceRequest {
            weight_kg: Decimal::ONE,
            length_cm: Decimal::TEN,
            width_cm: Decimal::TEN,
            height_cm: Decimal::TEN,
        };
        let ok = CreateQuotationRequest {
            pieces: Some(vec![piece.clone(); 200]),
            ..request()
        };
        assert!(ok.validate().is_ok());

        let too_many = CreateQuotationRequest {
            pieces: Some(vec![piece; 201]),
            ..request()
        };
        let errors = too_many.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("pieces"));

        let empty = CreateQuotationRequest {
            pieces: Some(vec![]),
            ..request()
        };
        assert!(empty.validate().is_err());
    }
}
