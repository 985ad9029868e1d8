//! Origin location catalog and origin resolution for country-based input

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use crate::application::Actor;
use crate::domain::audit::{AuditAction, NewAuditEntry};
use crate::domain::location::{
    normalize_country, resolve_entry_point, EntryPointTable, LocationFilter, LocationKind,
    NewLocation, OriginLocation,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider, TransportMode};

/// How a caller identified the origin of a shipment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginSpec {
    /// Entry point code, used as-is (upper-cased)
    Code(String),
    /// Country name or alias, mapped to an entry point
    Country(String),
}

pub struct LocationService {
    repos: Arc<dyn RepositoryProvider>,
    entry_points: EntryPointTable,
}

impl LocationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, entry_points: EntryPointTable) -> Self {
        Self {
            repos,
            entry_points,
        }
    }

    /// Entry point code for `origin` under `mode`.
    ///
    /// Countries resolve to the configured code, then to the first active
    /// catalog location of the right kind in that country, then to the
    /// generated technical code. With `create_missing` the generated
    /// location is stored in the catalog.
    pub async fn resolve_origin(
        &self,
        origin: &OriginSpec,
        mode: TransportMode,
        create_missing: bool,
    ) -> DomainResult<String> {
        match origin {
            OriginSpec::Code(code) => {
                let code = code.trim().to_uppercase();
                if code.is_empty() {
                    return Err(DomainError::Validation("origin must not be empty".into()));
                }
                Ok(code)
            }
            OriginSpec::Country(raw) => {
                let country = normalize_country(raw, &self.entry_points);
                if country.is_empty() {
                    return Err(DomainError::Validation("origin country must not be empty".into()));
                }
                if !self.entry_points.is_known_country(&country) {
                    return Err(DomainError::Validation(format!("unknown country '{}'", country)));
                }

                let entry = resolve_entry_point(&country, mode, &self.entry_points);
                if !entry.generated {
                    return Ok(entry.code);
                }

                if let Some(existing) = self
                    .repos
                    .locations()
                    .find_first_in_country(&entry.country, entry.kind)
                    .await?
                {
                    debug!(country = %entry.country, code = %existing.code, "Origin resolved from catalog");
                    return Ok(existing.code);
                }

                if create_missing {
                    let stored = self
                        .repos
                        .locations()
                        .get_or_create(NewLocation {
                            code: entry.code,
                            name: entry.name,
                            country: entry.country,
                            kind: entry.kind,
                        })
                        .await?;
                    return Ok(stored.code);
                }

                Ok(entry.code)
            }
        }
    }

    pub async fn create_location(&self, actor: &Actor, location: NewLocation) -> DomainResult<OriginLocation> {
        let code = location.code.trim().to_uppercase();
        if code.is_empty() || code.len() > 32 {
            return Err(DomainError::Validation("code must be 1-32 characters".into()));
        }
        let country = normalize_country(&location.country, &self.entry_points);
        if country.is_empty() || location.name.trim().is_empty() {
            return Err(DomainError::Validation("name and country are required".into()));
        }
        if !self.entry_points.is_known_country(&country) {
            return Err(DomainError::Validation(format!("unknown country '{}'", country)));
        }

        let created = self
            .repos
            .locations()
            .create(NewLocation {
                code,
                name: location.name.trim().to_string(),
                country,
                kind: location.kind,
            })
            .await?;

        self.repos
            .audit()
            .record(NewAuditEntry {
                actor_id: Some(actor.user_id.clone()),
                action: AuditAction::CreateLocation,
                model_name: "OriginLocation",
                object_id: created.id.to_string(),
                metadata: json!({
                    "code": created.code,
                    "country": created.country,
                    "kind": created.kind.as_str(),
                }),
            })
            .await?;

        info!(code = %created.code, kind = %created.kind, "Origin location created");
        Ok(created)
    }

    pub async fn list_locations(
        &self,
        kind: Option<LocationKind>,
        country: Option<&str>,
    ) -> DomainResult<Vec<OriginLocation>> {
        let country = country
            .map(|c| normalize_country(c, &self.entry_points))
            .filter(|c| !c.is_empty());
        self.repos
            .locations()
            .list(LocationFilter {
                kind,
                country,
                include_inactive: false,
            })
            .await
    }

    /// Active location for a code, checked against the kind the mode needs
    pub async fn require_origin_location(&self, code: &str, mode: TransportMode) -> DomainResult<OriginLocation> {
        let location = self
            .repos
            .locations()
            .find_by_code(code)
            .await?
            .filter(|l| l.is_active)
            .ok_or_else(|| DomainError::not_found("OriginLocation", "code", code))?;
        let expected = LocationKind::for_mode(mode);
        if location.kind != expected {
            return Err(DomainError::Validation(format!(
                "origin {} is a {}, {} tariffs need a {}",
                code, location.kind, mode, expected
            )));
        }
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{entry_table, seed_location, seed_user, test_repos};
    use crate::domain::location::entry_point::generated_code;
    use crate::domain::UserRole;

    #[tokio::test]
    async fn country_resolution_order() {
        let repos = test_repos().await;
        let svc = LocationService::new(repos.clone(), entry_table());

        // configured mapping, via alias
        let code = svc
            .resolve_origin(&OriginSpec::Country("co".into()), TransportMode::Air, false)
            .await
            .unwrap();
        assert_eq!(code, "BOG");

        // catalog location in an unmapped country
        seed_location(repos.as_ref(), "LIM", "Peru", LocationKind::Airport).await;
        let code = svc
            .resolve_origin(&OriginSpec::Country("Peru".into()), TransportMode::Air, false)
            .await
            .unwrap();
        assert_eq!(code, "LIM");

        // nothing known: generated code, not stored unless asked
        let code = svc
            .resolve_origin(&OriginSpec::Country("Peru".into()), TransportMode::Sea, false)
            .await
            .unwrap();
        assert_eq!(code, generated_code("Peru", TransportMode::Sea));
        assert!(repos.locations().find_by_code(&code).await.unwrap().is_none());

        let stored = svc
            .resolve_origin(&OriginSpec::Country("Peru".into()), TransportMode::Sea, true)
            .await
            .unwrap();
        assert_eq!(stored, code);
        let location = repos.locations().find_by_code(&code).await.unwrap().unwrap();
        assert_eq!(location.name, "Main port Peru");
        assert_eq!(location.kind, LocationKind::Seaport);
    }

    #[tokio::test]
    async fn unknown_country_is_rejected() {
        let repos = test_repos().await;
        let svc = LocationService::new(repos.clone(), entry_table());

        let err = svc
            .resolve_origin(&OriginSpec::Country("Colmbia".into()), TransportMode::Air, true)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref msg) if msg.contains("Colmbia")));
        let generated = generated_code("Colmbia", TransportMode::Air);
        assert!(repos.locations().find_by_code(&generated).await.unwrap().is_none());

        let admin = seed_user(repos.as_ref(), "admin", UserRole::Admin).await;
        let err = svc
            .create_location(
                &admin,
                NewLocation {
                    code: "XXX".into(),
                    name: "Nowhere".into(),
                    country: "Narnia".into(),
                    kind: LocationKind::Airport,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn code_origin_is_upper_cased() {
        let svc = LocationService::new(test_repos().await, entry_table());
        let code = svc
            .resolve_origin(&OriginSpec::Code(" bog ".into()), TransportMode::Air, false)
            .await
            .unwrap();
        assert_eq!(code, "BOG");
        assert!(svc
            .resolve_origin(&OriginSpec::Code("  ".into()), TransportMode::Air, false)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn create_location_normalizes_and_audits() {
        let repos = test_repos().await;
        let svc = LocationService::new(repos.clone(), entry_table());
        let admin = seed_user(repos.as_ref(), "admin", UserRole::Admin).await;

        let created = svc
            .create_location(
                &admin,
                NewLocation {
                    code: "ctg".into(),
                    name: " Cartagena ".into(),
                    country: "CO".into(),
                    kind: LocationKind::Seaport,
                },
            )
            .await
            .unwrap();
        assert_eq!(created.code, "CTG");
        assert_eq!(created.country, "Colombia");
        assert_eq!(created.name, "Cartagena");

        let listed = svc.list_locations(Some(LocationKind::Seaport), Some("co")).await.unwrap();
        assert_eq!(listed.len(), 1);

        assert!(svc.require_origin_location("CTG", TransportMode::Sea).await.is_ok());
        assert!(matches!(
            svc.require_origin_location("CTG", TransportMode::Air).await,
            Err(DomainError::Validation(_))
        ));
    }
}
