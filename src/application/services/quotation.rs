//! Quotation orchestration: resolve the tariff, price the shipment, store
//! the result.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::locations::{LocationService, OriginSpec};
use super::tariff_catalog::TariffCatalogService;
use crate::application::Actor;
use crate::domain::charge::{aggregate_pieces, compute_breakdown, ChargeBreakdown, Piece};
use crate::domain::location::LocationKind;
use crate::domain::quotation::{NewQuotation, QuotationFilter, QuotationItem};
use crate::domain::{DomainError, DomainResult, Quotation, RepositoryProvider, Tariff, TransportMode, UserRole};
use crate::shared::PaginatedResult;

/// What is being shipped: either totals or individual pieces
#[derive(Debug, Clone)]
pub enum Shipment {
    Totals { weight_kg: Decimal, volume_m3: Decimal },
    Pieces(Vec<Piece>),
}

#[derive(Debug, Clone)]
pub struct QuotationRequest {
    pub origin: OriginSpec,
    pub destination: String,
    pub mode: TransportMode,
    pub shipment: Shipment,
}

/// Priced but not stored
#[derive(Debug, Clone)]
pub struct QuotationPreview {
    pub origin: String,
    pub destination: String,
    pub mode: TransportMode,
    pub tariff: Tariff,
    pub weight_kg: Decimal,
    pub volume_m3: Decimal,
    pub items: Vec<QuotationItem>,
    pub breakdown: ChargeBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub active_users: u64,
    pub admin_users: u64,
    pub quotations: u64,
    pub active_airports: u64,
    pub active_seaports: u64,
}

pub struct QuotationService {
    repos: Arc<dyn RepositoryProvider>,
    catalog: Arc<TariffCatalogService>,
    locations: Arc<LocationService>,
    volumetric_factor: Decimal,
}

impl QuotationService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        catalog: Arc<TariffCatalogService>,
        locations: Arc<LocationService>,
        volumetric_factor: Decimal,
    ) -> Self {
        Self {
            repos,
            catalog,
            locations,
            volumetric_factor,
        }
    }

    /// Resolve and price a request at the current instant without writing.
    pub async fn preview(&self, request: QuotationRequest) -> DomainResult<QuotationPreview> {
        let destination = request.destination.trim().to_string();
        if destination.is_empty() {
            return Err(DomainError::Validation("destination must not be empty".into()));
        }

        let (weight_kg, volume_m3, items) = match request.shipment {
            Shipment::Totals { weight_kg, volume_m3 } => (weight_kg, volume_m3, Vec::new()),
            Shipment::Pieces(pieces) => {
                let totals = aggregate_pieces(&pieces, self.volumetric_factor)?;
                let items = totals.items.into_iter().map(QuotationItem::from).collect();
                (totals.weight_kg, totals.volume_m3, items)
            }
        };

        let origin = self
            .locations
            .resolve_origin(&request.origin, request.mode, false)
            .await?;

        let tariff = match self.catalog.resolve(&origin, request.mode, None).await {
            Ok(tariff) => tariff,
            Err(e @ DomainError::NoActiveTariff { .. }) => {
                metrics::counter!("quotations_rejected_total", "reason" => "no_active_tariff")
                    .increment(1);
                warn!(origin = %origin, mode = %request.mode, "No tariff configured for origin");
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let breakdown = compute_breakdown(weight_kg, volume_m3, self.volumetric_factor, &tariff)?;

        Ok(QuotationPreview {
            origin,
            destination,
            mode: request.mode,
            tariff,
            weight_kg,
            volume_m3,
            items,
            breakdown,
        })
    }

    /// Price and persist a quotation owned by `owner`.
    ///
    /// Nothing is stored when no tariff is valid for the origin.
    pub async fn create_quotation(&self, owner: &Actor, request: QuotationRequest) -> DomainResult<Quotation> {
        let created_at = Utc::now();
        let preview = self.preview(request).await?;

        // The tariff was resolved at or before `created_at`; re-check the
        // window in case a newer version was published in between.
        let tariff = if preview.tariff.is_valid_at(created_at) {
            preview.tariff
        } else {
            self.catalog
                .resolve(&preview.origin, preview.mode, Some(created_at))
                .await?
        };
        let breakdown = compute_breakdown(
            preview.weight_kg,
            preview.volume_m3,
            self.volumetric_factor,
            &tariff,
        )?;

        let quotation = self
            .repos
            .quotations()
            .create(NewQuotation {
                owner_id: owner.user_id.clone(),
                origin: preview.origin,
                destination: preview.destination,
                mode: preview.mode,
                weight_kg: preview.weight_kg,
                volume_m3: preview.volume_m3,
                volumetric_weight_kg: breakdown.volumetric_weight_kg,
                tariff_id: tariff.id,
                rate_usd: tariff.rate_usd,
                basis: breakdown.basis,
                chargeable_value: breakdown.chargeable_value,
                amount_usd: breakdown.amount_usd,
                items: preview.items,
                created_at,
            })
            .await?;

        metrics::counter!("quotations_created_total", "mode" => quotation.mode.as_str()).increment(1);
        info!(
            quotation_id = quotation.id,
            owner = %owner.username,
            origin = %quotation.origin,
            mode = %quotation.mode,
            amount_usd = %quotation.amount_usd,
            "Quotation created"
        );
        Ok(Quotation {
            owner_username: Some(owner.username.clone()),
            ..quotation
        })
    }

    /// A quotation is visible to its owner and to admins. Others get
    /// `NotFound` so ids of foreign quotations are not disclosed.
    pub async fn get_quotation(&self, viewer: &Actor, id: i32) -> DomainResult<Quotation> {
        let quotation = self
            .repos
            .quotations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Quotation", "id", id))?;

        if !viewer.is_admin() && !quotation.is_owned_by(&viewer.user_id) {
            return Err(DomainError::not_found("Quotation", "id", id));
        }
        Ok(quotation)
    }

    /// History. Non-admins always see only their own quotations.
    pub async fn list_quotations(
        &self,
        viewer: &Actor,
        mut filter: QuotationFilter,
    ) -> DomainResult<PaginatedResult<Quotation>> {
        if !viewer.is_admin() {
            filter.owner_id = Some(viewer.user_id.clone());
        }
        self.repos.quotations().list(filter).await
    }

    /// Filtered admin history as CSV
    pub async fn export_csv(&self, filter: QuotationFilter) -> DomainResult<String> {
        let rows = self.repos.quotations().list_all(filter).await?;

        let mut out = String::from(
            "id,created_at,username,mode,origin,destination,pieces,weight_kg,volume_m3,\
             chargeable_basis,chargeable_value,rate_usd,amount_usd\n",
        );
        for q in &rows {
            // Writing into a String cannot fail
            let _ = writeln!(
                out,
                "{},{},{},{},{},{},{},{},{},{},{},{},{}",
                q.id,
                q.created_at.to_rfc3339(),
                csv_field(q.owner_username.as_deref().unwrap_or("")),
                q.mode,
                csv_field(&q.origin),
                csv_field(&q.destination),
                q.pieces_count,
                q.weight_kg,
                q.volume_m3,
                q.basis,
                q.chargeable_value,
                q.rate_usd,
                q.amount_usd,
            );
        }
        info!(rows = rows.len(), "Quotation history exported");
        Ok(out)
    }

    pub async fn dashboard(&self) -> DomainResult<DashboardStats> {
        let users = self.repos.users();
        let locations = self.repos.locations();
        Ok(DashboardStats {
            active_users: users.count_users(None, true).await?,
            admin_users: users.count_users(Some(UserRole::Admin), true).await?,
            quotations: self.repos.quotations().count().await?,
            active_airports: locations.count_active(LocationKind::Airport).await?,
            active_seaports: locations.count_active(LocationKind::Seaport).await?,
        })
    }
}

/// Quote a CSV field when it contains a separator, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
