//! Tariff domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::shipping::TransportMode;

/// Rate applicable to shipments leaving `origin` by `mode` during
/// `[valid_from, valid_until)`. An open tariff has no `valid_until`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tariff {
    pub id: i32,
    /// Entry point code (airport or seaport)
    pub origin: String,
    pub mode: TransportMode,
    /// USD per kg for air, USD per m³ for sea
    pub rate_usd: Decimal,
    pub valid_from: DateTime<Utc>,
    pub valid_until: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Tariff {
    pub fn is_open(&self) -> bool {
        self.valid_until.is_none()
    }

    /// `valid_from <= ts < valid_until` (upper bound absent when open)
    pub fn is_valid_at(&self, ts: DateTime<Utc>) -> bool {
        if ts < self.valid_from {
            return false;
        }
        match self.valid_until {
            Some(until) => ts < until,
            None => true,
        }
    }
}

/// Input for the catalog write path
#[derive(Debug, Clone)]
pub struct NewTariff {
    pub origin: String,
    pub mode: TransportMode,
    pub rate_usd: Decimal,
    pub effective_from: DateTime<Utc>,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TariffFilter {
    pub origin: Option<String>,
    pub mode: Option<TransportMode>,
    /// Only tariffs without a validity end
    pub open_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn tariff(valid_from: DateTime<Utc>, valid_until: Option<DateTime<Utc>>) -> Tariff {
        Tariff {
            id: 1,
            origin: "BOG".into(),
            mode: TransportMode::Air,
            rate_usd: Decimal::new(5, 0),
            valid_from,
            valid_until,
            created_by: None,
            created_at: valid_from,
        }
    }

    #[test]
    fn window_is_half_open() {
        let t0 = Utc::now();
        let t1 = t0 + Duration::hours(1);
        let t = tariff(t0, Some(t1));
        assert!(t.is_valid_at(t0));
        assert!(t.is_valid_at(t0 + Duration::minutes(30)));
        assert!(!t.is_valid_at(t1));
        assert!(!t.is_valid_at(t0 - Duration::seconds(1)));
        assert!(!t.is_open());
    }

    #[test]
    fn open_tariff_valid_forever_after_start() {
        let t0 = Utc::now();
        let t = tariff(t0, None);
        assert!(t.is_open());
        assert!(t.is_valid_at(t0 + Duration::days(3650)));
    }
}
