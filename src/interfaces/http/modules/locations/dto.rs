use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::location::NewLocation;
use crate::domain::{DomainError, OriginLocation};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LocationDto {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub country: String,
    /// `AIRPORT` or `SEAPORT`
    pub kind: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<OriginLocation> for LocationDto {
    fn from(l: OriginLocation) -> Self {
        Self {
            id: l.id,
            code: l.code,
            name: l.name,
            country: l.country,
            kind: l.kind.to_string(),
            is_active: l.is_active,
            created_at: l.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLocationRequest {
    #[validate(length(min = 2, max = 20, message = "code must be 2-20 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 120, message = "name must be 1-120 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 80, message = "country must be 1-80 characters"))]
    pub country: String,
    /// `AIRPORT` or `SEAPORT`
    pub kind: String,
}

impl TryFrom<CreateLocationRequest> for NewLocation {
    type Error = DomainError;

    fn try_from(req: CreateLocationRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            kind: req.kind.parse()?,
            code: req.code,
            name: req.name,
            country: req.country,
        })
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListLocationsParams {
    /// `AIRPORT` or `SEAPORT`
    pub kind: Option<String>,
    /// Country name or alias
    pub country: Option<String>,
}
