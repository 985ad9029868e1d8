use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::errors::DomainError;

/// How a shipment travels. Decides which dimension a tariff rate is
/// expressed in and which kind of entry point serves as origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Air,
    Sea,
}

impl TransportMode {
    pub const ALL: [TransportMode; 2] = [TransportMode::Air, TransportMode::Sea];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Air => "air",
            Self::Sea => "sea",
        }
    }

    /// Unit the tariff rate is quoted in
    pub fn rate_unit(&self) -> &'static str {
        match self {
            Self::Air => "USD/kg",
            Self::Sea => "USD/m3",
        }
    }

    pub fn code_prefix(&self) -> &'static str {
        match self {
            Self::Air => "AIR",
            Self::Sea => "SEA",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "air" => Ok(Self::Air),
            "sea" => Ok(Self::Sea),
            other => Err(DomainError::Validation(format!(
                "Unknown transport mode '{}', expected 'air' or 'sea'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("AIR".parse::<TransportMode>().unwrap(), TransportMode::Air);
        assert_eq!(" sea ".parse::<TransportMode>().unwrap(), TransportMode::Sea);
        assert!("rail".parse::<TransportMode>().is_err());
    }

    #[test]
    fn rate_unit_follows_mode() {
        assert_eq!(TransportMode::Air.rate_unit(), "USD/kg");
        assert_eq!(TransportMode::Sea.rate_unit(), "USD/m3");
    }
}
