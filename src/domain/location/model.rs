use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::shipping::TransportMode;
use crate::shared::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationKind {
    Airport,
    Seaport,
}

impl LocationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Airport => "AIRPORT",
            Self::Seaport => "SEAPORT",
        }
    }

    /// Kind of entry point that serves a transport mode
    pub fn for_mode(mode: TransportMode) -> Self {
        match mode {
            TransportMode::Air => Self::Airport,
            TransportMode::Sea => Self::Seaport,
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AIRPORT" => Ok(Self::Airport),
            "SEAPORT" => Ok(Self::Seaport),
            other => Err(DomainError::Validation(format!(
                "Unknown location kind '{}', expected AIRPORT or SEAPORT",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OriginLocation {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub country: String,
    pub kind: LocationKind,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLocation {
    pub code: String,
    pub name: String,
    pub country: String,
    pub kind: LocationKind,
}

#[derive(Debug, Clone, Default)]
pub struct LocationFilter {
    pub kind: Option<LocationKind>,
    pub country: Option<String>,
    pub include_inactive: bool,
}
