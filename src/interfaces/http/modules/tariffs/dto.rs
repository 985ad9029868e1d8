//! Tariff DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::services::CreateTariffInput;
use crate::domain::tariff::TariffFilter;
use crate::domain::{DomainError, Tariff};
use crate::interfaces::http::common::{origin_spec, parse_mode};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TariffResponse {
    pub id: i32,
    /// Entry point code
    pub origin: String,
    /// `air` or `sea`
    pub mode: String,
    #[schema(value_type = String, example = "5.00")]
    pub rate_usd: Decimal,
    /// `USD/kg` for air, `USD/m3` for sea
    pub rate_unit: String,
    pub valid_from: DateTime<Utc>,
    /// `null` while this is the current tariff
    pub valid_until: Option<DateTime<Utc>>,
    pub is_open: bool,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Tariff> for TariffResponse {
    fn from(t: Tariff) -> Self {
        Self {
            is_open: t.is_open(),
            id: t.id,
            origin: t.origin,
            mode: t.mode.to_string(),
            rate_usd: t.rate_usd,
            rate_unit: t.mode.rate_unit().to_string(),
            valid_from: t.valid_from,
            valid_until: t.valid_until,
            created_by: t.created_by,
            created_at: t.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTariffRequest {
    /// Entry point code, e.g. `BOG`
    #[validate(length(max = 20, message = "origin must be at most 20 characters"))]
    pub origin: Option<String>,
    /// Country resolved through the entry point mapping
    #[validate(length(max = 80, message = "origin_country must be at most 80 characters"))]
    pub origin_country: Option<String>,
    #[validate(length(min = 1, message = "mode is required"))]
    pub mode: String,
    #[schema(value_type = String, example = "5.00")]
    pub rate_usd: Decimal,
    /// Defaults to now; must be after the start of the current tariff
    pub effective_from: Option<DateTime<Utc>>,
}

impl TryFrom<CreateTariffRequest> for CreateTariffInput {
    type Error = DomainError;

    fn try_from(req: CreateTariffRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            mode: parse_mode(&req.mode)?,
            origin: origin_spec(req.origin, req.origin_country)?,
            rate_usd: req.rate_usd,
            effective_from: req.effective_from,
        })
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTariffsParams {
    pub origin: Option<String>,
    /// `air` or `sea`
    pub mode: Option<String>,
    /// Include closed versions (default: current tariffs only)
    #[serde(default)]
    pub history: bool,
}

impl TryFrom<ListTariffsParams> for TariffFilter {
    type Error = DomainError;

    fn try_from(params: ListTariffsParams) -> Result<Self, Self::Error> {
        Ok(Self {
            origin: params
                .origin
                .map(|o| o.trim().to_uppercase())
                .filter(|o| !o.is_empty()),
            mode: params.mode.as_deref().map(parse_mode).transpose()?,
            open_only: !params.history,
        })
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CurrentTariffParams {
    /// Entry point code
    pub origin: Option<String>,
    /// Country resolved through the entry point mapping
    pub origin_country: Option<String>,
    pub mode: String,
    /// RFC 3339 instant (default: now)
    pub as_of: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TariffHistoryParams {
    pub origin: String,
    pub mode: String,
}
