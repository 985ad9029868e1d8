//! Tariff catalog: the admin write path and the resolver
//!
//! Tariffs are versioned per (origin, mode). Creating one closes the
//! current tariff for the key at the new start instant in the same
//! database transaction, so history has no gaps and no overlaps.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;

use super::locations::{LocationService, OriginSpec};
use crate::application::Actor;
use crate::domain::audit::{AuditAction, NewAuditEntry};
use crate::domain::tariff::TariffFilter;
use crate::domain::{DomainError, DomainResult, NewTariff, RepositoryProvider, Tariff, TransportMode};

/// Largest rate the catalog accepts: 12 digits, 4 of them decimals
pub const MAX_RATE_USD: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 4);

#[derive(Debug, Clone)]
pub struct CreateTariffInput {
    pub origin: OriginSpec,
    pub mode: TransportMode,
    pub rate_usd: Decimal,
    /// Defaults to now; never in the past
    pub effective_from: Option<DateTime<Utc>>,
}

pub struct TariffCatalogService {
    repos: Arc<dyn RepositoryProvider>,
    locations: Arc<LocationService>,
}

impl TariffCatalogService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, locations: Arc<LocationService>) -> Self {
        Self { repos, locations }
    }

    /// The tariff valid for (origin, mode) at `as_of` (default: now).
    pub async fn resolve(
        &self,
        origin: &str,
        mode: TransportMode,
        as_of: Option<DateTime<Utc>>,
    ) -> DomainResult<Tariff> {
        let as_of = as_of.unwrap_or_else(Utc::now);
        self.repos
            .tariffs()
            .find_valid_at(origin, mode, as_of)
            .await?
            .ok_or_else(|| DomainError::NoActiveTariff {
                origin: origin.to_string(),
                mode: mode.to_string(),
            })
    }

    pub async fn create_tariff(&self, actor: &Actor, input: CreateTariffInput) -> DomainResult<Tariff> {
        if input.rate_usd <= Decimal::ZERO {
            return Err(DomainError::Validation("rate_usd must be greater than 0".into()));
        }
        if input.rate_usd > MAX_RATE_USD {
            return Err(DomainError::Validation(format!(
                "rate_usd must be <= {}",
                MAX_RATE_USD
            )));
        }

        // A start in the past would move the predecessor's end under
        // quotations already priced with it
        let now = Utc::now();
        let effective_from = input.effective_from.unwrap_or(now);
        if effective_from < now {
            return Err(DomainError::Validation(
                "effective_from must not be in the past".into(),
            ));
        }

        let origin = match input.origin {
            OriginSpec::Country(_) => {
                self.locations
                    .resolve_origin(&input.origin, input.mode, true)
                    .await?
            }
            OriginSpec::Code(_) => {
                let code = self
                    .locations
                    .resolve_origin(&input.origin, input.mode, false)
                    .await?;
                self.locations
                    .require_origin_location(&code, input.mode)
                    .await?
                    .code
            }
        };

        let tariff = self
            .repos
            .tariffs()
            .supersede(NewTariff {
                origin,
                mode: input.mode,
                rate_usd: input.rate_usd,
                effective_from,
                created_by: Some(actor.user_id.clone()),
            })
            .await?;

        self.repos
            .audit()
            .record(NewAuditEntry {
                actor_id: Some(actor.user_id.clone()),
                action: AuditAction::CreateTariff,
                model_name: "Tariff",
                object_id: tariff.id.to_string(),
                metadata: json!({
                    "origin": tariff.origin,
                    "mode": tariff.mode.as_str(),
                    "rate_usd": tariff.rate_usd.to_string(),
                    "valid_from": tariff.valid_from.to_rfc3339(),
                }),
            })
            .await?;

        metrics::counter!("tariffs_created_total", "mode" => tariff.mode.as_str()).increment(1);
        info!(
            tariff_id = tariff.id,
            origin = %tariff.origin,
            mode = %tariff.mode,
            rate_usd = %tariff.rate_usd,
            by = %actor.username,
            "Tariff published"
        );
        Ok(tariff)
    }

    pub async fn list_tariffs(&self, filter: TariffFilter) -> DomainResult<Vec<Tariff>> {
        self.repos.tariffs().list(filter).await
    }

    pub async fn tariff_history(&self, origin: &str, mode: TransportMode) -> DomainResult<Vec<Tariff>> {
        self.repos.tariffs().history(origin, mode).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{entry_table, seed_location, seed_user, test_repos};
    use crate::domain::audit::AuditFilter;
    use crate::domain::location::LocationKind;
    use crate::domain::UserRole;
    use chrono::Duration;

    async fn setup() -> (Arc<dyn RepositoryProvider>, TariffCatalogService, Actor) {
        let repos = test_repos().await;
        let locations = Arc::new(LocationService::new(repos.clone(), entry_table()));
        let svc = TariffCatalogService::new(repos.clone(), locations);
        let admin = seed_user(repos.as_ref(), "admin", UserRole::Admin).await;
        seed_location(repos.as_ref(), "X", "Testland", LocationKind::Airport).await;
        (repos, svc, admin)
    }

    fn input(rate: i64, at: DateTime<Utc>) -> CreateTariffInput {
        CreateTariffInput {
            origin: OriginSpec::Code("X".into()),
            mode: TransportMode::Air,
            rate_usd: Decimal::from(rate),
            effective_from: Some(at),
        }
    }

    #[tokio::test]
    async fn scenario_a_then_b() {
        let (_, svc, admin) = setup().await;
        let t0 = Utc::now() + Duration::hours(1);
        let t1 = t0 + Duration::hours(10);

        let a = svc.create_tariff(&admin, input(5, t0)).await.unwrap();
        let b = svc.create_tariff(&admin, input(6, t1)).await.unwrap();

        let at_half = t0 + Duration::hours(5);
        let at_one_and_half = t1 + Duration::hours(5);
        assert_eq!(svc.resolve("X", TransportMode::Air, Some(at_half)).await.unwrap().id, a.id);
        assert_eq!(
            svc.resolve("X", TransportMode::Air, Some(at_one_and_half)).await.unwrap().id,
            b.id
        );
        // neither version has started yet
        assert!(matches!(
            svc.resolve("X", TransportMode::Air, None).await,
            Err(DomainError::NoActiveTariff { .. })
        ));

        let history = svc.tariff_history("X", TransportMode::Air).await.unwrap();
        let a = history.iter().find(|t| t.id == a.id).unwrap();
        assert_eq!(a.valid_until, Some(t1));
    }

    #[test]
    fn max_rate_has_twelve_digits() {
        assert_eq!(MAX_RATE_USD, Decimal::new(999_999_999_999, 4));
    }

    #[tokio::test]
    async fn no_tariff_is_reported_per_key() {
        let (_, svc, _) = setup().await;
        let err = svc.resolve("X", TransportMode::Air, None).await.unwrap_err();
        assert!(matches!(err, DomainError::NoActiveTariff { .. }));
    }

    #[tokio::test]
    async fn validates_rate_and_origin() {
        let (_, svc, admin) = setup().await;
        let soon = Utc::now() + Duration::minutes(5);
        assert!(matches!(
            svc.create_tariff(&admin, input(0, soon)).await,
            Err(DomainError::Validation(_))
        ));
        let mut too_high = input(1, soon);
        too_high.rate_usd = MAX_RATE_USD + Decimal::new(1, 4);
        assert!(matches!(
            svc.create_tariff(&admin, too_high).await,
            Err(DomainError::Validation(_))
        ));

        let mut unknown = input(5, soon);
        unknown.origin = OriginSpec::Code("NOPE".into());
        assert!(matches!(
            svc.create_tariff(&admin, unknown).await,
            Err(DomainError::NotFound { .. })
        ));

        let mut wrong_kind = input(5, soon);
        wrong_kind.mode = TransportMode::Sea;
        assert!(matches!(
            svc.create_tariff(&admin, wrong_kind).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn country_origin_creates_entry_point_and_audits() {
        let (repos, svc, admin) = setup().await;
        let tariff = svc
            .create_tariff(
                &admin,
                CreateTariffInput {
                    origin: OriginSpec::Country("Peru".into()),
                    mode: TransportMode::Sea,
                    rate_usd: Decimal::new(4550, 2),
                    effective_from: None,
                },
            )
            .await
            .unwrap();
        assert!(tariff.origin.starts_with("SEA-"));
        assert_eq!(tariff.rate_usd, Decimal::new(4550, 2));
        assert!(repos.locations().find_by_code(&tariff.origin).await.unwrap().is_some());

        let log = repos
            .audit()
            .list(AuditFilter {
                action: Some("CREATE_TARIFF".into()),
                page: 1,
                limit: 10,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(log.total, 1);
        assert_eq!(log.items[0].metadata["origin"], tariff.origin.as_str());
    }

    #[tokio::test]
    async fn start_in_the_past_is_rejected() {
        let (repos, svc, admin) = setup().await;
        svc.create_tariff(&admin, input(5, Utc::now() + Duration::minutes(1)))
            .await
            .unwrap();

        let err = svc
            .create_tariff(&admin, input(6, Utc::now() - Duration::days(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let history = svc.tariff_history("X", TransportMode::Air).await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].is_open());
        assert!(repos.tariffs().find_open("X", TransportMode::Air).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn misspelled_country_creates_nothing() {
        let (repos, svc, admin) = setup().await;
        let err = svc
            .create_tariff(
                &admin,
                CreateTariffInput {
                    origin: OriginSpec::Country("Colmbia".into()),
                    mode: TransportMode::Air,
                    rate_usd: Decimal::from(5),
                    effective_from: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(svc
            .list_tariffs(TariffFilter::default())
            .await
            .unwrap()
            .is_empty());
        assert!(repos
            .locations()
            .find_first_in_country("Colmbia", LocationKind::Airport)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn open_tariff_stays_unique_over_many_versions() {
        let (_, svc, admin) = setup().await;
        let start = Utc::now() + Duration::days(1);
        for i in 0..6 {
            svc.create_tariff(&admin, input(5 + i, start + Duration::days(i * 7)))
                .await
                .unwrap();
        }
        let open = svc
            .list_tariffs(TariffFilter {
                origin: Some("X".into()),
                mode: Some(TransportMode::Air),
                open_only: true,
            })
            .await
            .unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].rate_usd, Decimal::from(10));

        let history = svc.tariff_history("X", TransportMode::Air).await.unwrap();
        for pair in history.windows(2) {
            assert_eq!(pair[1].valid_until, Some(pair[0].valid_from));
        }
    }
}
