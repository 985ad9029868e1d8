//! SeaORM implementation of AuditRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::db_err;
use crate::domain::audit::{AuditEntry, AuditFilter, AuditRepository, NewAuditEntry};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::audit_log;
use crate::shared::PaginatedResult;

fn entity_to_domain(m: audit_log::Model) -> AuditEntry {
    AuditEntry {
        id: m.id,
        actor_id: m.actor_id,
        action: m.action,
        model_name: m.model_name,
        object_id: m.object_id,
        metadata: m.metadata,
        created_at: m.created_at,
    }
}

pub struct SeaOrmAuditRepository {
    db: DatabaseConnection,
}

impl SeaOrmAuditRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditRepository for SeaOrmAuditRepository {
    async fn record(&self, entry: NewAuditEntry) -> DomainResult<AuditEntry> {
        let model = audit_log::ActiveModel {
            actor_id: Set(entry.actor_id),
            action: Set(entry.action.as_str().to_string()),
            model_name: Set(entry.model_name.to_string()),
            object_id: Set(entry.object_id),
            metadata: Set(entry.metadata),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(entity_to_domain(model))
    }

    async fn list(&self, filter: AuditFilter) -> DomainResult<PaginatedResult<AuditEntry>> {
        let page = filter.page.max(1);
        let limit = filter.limit.clamp(1, 100);

        let mut query = audit_log::Entity::find();
        if let Some(action) = filter.action {
            query = query.filter(audit_log::Column::Action.eq(action));
        }
        if let Some(actor_id) = filter.actor_id {
            query = query.filter(audit_log::Column::ActorId.eq(actor_id));
        }
        query = query
            .order_by_desc(audit_log::Column::CreatedAt)
            .order_by_desc(audit_log::Column::Id);

        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let models = query
            .offset((page - 1) * limit)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(PaginatedResult::new(
            models.into_iter().map(entity_to_domain).collect(),
            total,
            page,
            limit,
        ))
    }
}
