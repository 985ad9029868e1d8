//! SeaORM implementation of QuotationRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, SelectTwo, Set, TransactionTrait,
};

use super::{db_err, mode_to_domain, mode_to_entity, scaled};
use crate::domain::charge::ChargeBasis;
use crate::domain::quotation::{
    NewQuotation, Quotation, QuotationFilter, QuotationItem, QuotationRepository,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{quotation, quotation_item, user};
use crate::shared::PaginatedResult;

fn item_to_domain(m: quotation_item::Model) -> QuotationItem {
    QuotationItem {
        weight_kg: scaled(m.weight_kg, 3),
        length_cm: scaled(m.length_cm, 2),
        width_cm: scaled(m.width_cm, 2),
        height_cm: scaled(m.height_cm, 2),
        volume_m3: scaled(m.volume_m3, 6),
        volumetric_weight_kg: scaled(m.volumetric_weight_kg, 3),
    }
}

fn entity_to_domain(
    m: quotation::Model,
    owner: Option<user::Model>,
    items: Vec<QuotationItem>,
) -> DomainResult<Quotation> {
    let basis: ChargeBasis = m.chargeable_basis.parse().map_err(|_| {
        DomainError::Storage(format!(
            "Quotation {} has unknown chargeable basis '{}'",
            m.id, m.chargeable_basis
        ))
    })?;

    Ok(Quotation {
        id: m.id,
        owner_id: m.owner_id,
        owner_username: owner.map(|u| u.username),
        origin: m.origin,
        destination: m.destination,
        mode: mode_to_domain(m.mode),
        pieces_count: m.pieces_count,
        weight_kg: scaled(m.weight_kg, 3),
        volume_m3: scaled(m.volume_m3, 6),
        volumetric_weight_kg: scaled(m.volumetric_weight_kg, 3),
        tariff_id: m.tariff_id,
        rate_usd: scaled(m.rate_usd, 4),
        basis,
        chargeable_value: scaled(m.chargeable_value, 6),
        amount_usd: scaled(m.amount_usd, 2),
        items,
        created_at: m.created_at,
    })
}

/// Quotations joined with their owner, narrowed by the filter
fn filtered(filter: &QuotationFilter) -> SelectTwo<quotation::Entity, user::Entity> {
    let mut query: Select<quotation::Entity> = quotation::Entity::find();

    if let Some(ref owner_id) = filter.owner_id {
        query = query.filter(quotation::Column::OwnerId.eq(owner_id.as_str()));
    }
    if let Some(mode) = filter.mode {
        query = query.filter(quotation::Column::Mode.eq(mode_to_entity(mode)));
    }

    let mut joined = query.find_also_related(user::Entity);

    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        joined = joined.filter(
            Condition::any()
                .add(user::Column::Username.contains(search))
                .add(quotation::Column::Origin.contains(search))
                .add(quotation::Column::Destination.contains(search)),
        );
    }

    joined
        .order_by_desc(quotation::Column::CreatedAt)
        .order_by_desc(quotation::Column::Id)
}

pub struct SeaOrmQuotationRepository {
    db: DatabaseConnection,
}

impl SeaOrmQuotationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load_items(&self, quotation_id: i32) -> DomainResult<Vec<QuotationItem>> {
        let items = quotation_item::Entity::find()
            .filter(quotation_item::Column::QuotationId.eq(quotation_id))
            .order_by_asc(quotation_item::Column::Position)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(items.into_iter().map(item_to_domain).collect())
    }
}

#[async_trait]
impl QuotationRepository for SeaOrmQuotationRepository {
    async fn create(&self, q: NewQuotation) -> DomainResult<Quotation> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let header = quotation::ActiveModel {
            owner_id: Set(q.owner_id),
            origin: Set(q.origin),
            destination: Set(q.destination),
            mode: Set(mode_to_entity(q.mode)),
            pieces_count: Set(q.items.len() as i32),
            weight_kg: Set(q.weight_kg),
            volume_m3: Set(q.volume_m3),
            volumetric_weight_kg: Set(q.volumetric_weight_kg),
            tariff_id: Set(q.tariff_id),
            rate_usd: Set(q.rate_usd),
            chargeable_basis: Set(q.basis.as_str().to_string()),
            chargeable_value: Set(q.chargeable_value),
            amount_usd: Set(q.amount_usd),
            created_at: Set(q.created_at),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        let mut items = Vec::with_capacity(q.items.len());
        for (idx, item) in q.items.into_iter().enumerate() {
            let stored = quotation_item::ActiveModel {
                quotation_id: Set(header.id),
                position: Set(idx as i32 + 1),
                weight_kg: Set(item.weight_kg),
                length_cm: Set(item.length_cm),
                width_cm: Set(item.width_cm),
                height_cm: Set(item.height_cm),
                volume_m3: Set(item.volume_m3),
                volumetric_weight_kg: Set(item.volumetric_weight_kg),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_err)?;
            items.push(item_to_domain(stored));
        }

        txn.commit().await.map_err(db_err)?;

        entity_to_domain(header, None, items)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Quotation>> {
        let row = quotation::Entity::find_by_id(id)
            .find_also_related(user::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some((model, owner)) = row else {
            return Ok(None);
        };

        let items = self.load_items(model.id).await?;
        entity_to_domain(model, owner, items).map(Some)
    }

    async fn list(&self, filter: QuotationFilter) -> DomainResult<PaginatedResult<Quotation>> {
        let page = filter.page.max(1);
        let limit = filter.limit.clamp(1, 100);
        let query = filtered(&filter);

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let rows = query
            .offset((page - 1) * limit)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items = rows
            .into_iter()
            .map(|(q, owner)| entity_to_domain(q, owner, Vec::new()))
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(PaginatedResult::new(items, total, page, limit))
    }

    async fn list_all(&self, filter: QuotationFilter) -> DomainResult<Vec<Quotation>> {
        let rows = filtered(&filter).all(&self.db).await.map_err(db_err)?;
        rows.into_iter()
            .map(|(q, owner)| entity_to_domain(q, owner, Vec::new()))
            .collect()
    }

    async fn count(&self) -> DomainResult<u64> {
        quotation::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
