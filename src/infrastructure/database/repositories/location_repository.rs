//! SeaORM implementation of LocationRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{db_err, write_err};
use crate::domain::location::{
    LocationFilter, LocationKind, LocationRepository, NewLocation, OriginLocation,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::origin_location;

fn kind_to_entity(kind: LocationKind) -> origin_location::LocationKind {
    match kind {
        LocationKind::Airport => origin_location::LocationKind::Airport,
        LocationKind::Seaport => origin_location::LocationKind::Seaport,
    }
}

fn entity_to_domain(m: origin_location::Model) -> OriginLocation {
    OriginLocation {
        id: m.id,
        code: m.code,
        name: m.name,
        country: m.country,
        kind: match m.kind {
            origin_location::LocationKind::Airport => LocationKind::Airport,
            origin_location::LocationKind::Seaport => LocationKind::Seaport,
        },
        is_active: m.is_active,
        created_at: m.created_at,
    }
}

fn to_active_model(location: NewLocation) -> origin_location::ActiveModel {
    origin_location::ActiveModel {
        code: Set(location.code),
        name: Set(location.name),
        country: Set(location.country),
        kind: Set(kind_to_entity(location.kind)),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
}

pub struct SeaOrmLocationRepository {
    db: DatabaseConnection,
}

impl SeaOrmLocationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LocationRepository for SeaOrmLocationRepository {
    async fn find_by_code(&self, code: &str) -> DomainResult<Option<OriginLocation>> {
        let model = origin_location::Entity::find()
            .filter(origin_location::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_first_in_country(
        &self,
        country: &str,
        kind: LocationKind,
    ) -> DomainResult<Option<OriginLocation>> {
        let model = origin_location::Entity::find()
            .filter(origin_location::Column::Country.eq(country))
            .filter(origin_location::Column::Kind.eq(kind_to_entity(kind)))
            .filter(origin_location::Column::IsActive.eq(true))
            .order_by_asc(origin_location::Column::Name)
            .order_by_asc(origin_location::Column::Code)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn list(&self, filter: LocationFilter) -> DomainResult<Vec<OriginLocation>> {
        let mut query = origin_location::Entity::find();
        if let Some(kind) = filter.kind {
            query = query.filter(origin_location::Column::Kind.eq(kind_to_entity(kind)));
        }
        if let Some(country) = filter.country {
            query = query.filter(origin_location::Column::Country.eq(country));
        }
        if !filter.include_inactive {
            query = query.filter(origin_location::Column::IsActive.eq(true));
        }
        let models = query
            .order_by_asc(origin_location::Column::Country)
            .order_by_asc(origin_location::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn create(&self, location: NewLocation) -> DomainResult<OriginLocation> {
        let code = location.code.clone();
        let model = to_active_model(location)
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, &format!("Location code '{}' already exists", code)))?;
        Ok(entity_to_domain(model))
    }

    async fn get_or_create(&self, location: NewLocation) -> DomainResult<OriginLocation> {
        if let Some(existing) = self.find_by_code(&location.code).await? {
            return Ok(existing);
        }
        let code = location.code.clone();
        match self.create(location).await {
            Ok(created) => Ok(created),
            // Lost a race with another request creating the same code
            Err(DomainError::Conflict(_)) => self
                .find_by_code(&code)
                .await?
                .ok_or_else(|| DomainError::not_found("OriginLocation", "code", code)),
            Err(e) => Err(e),
        }
    }

    async fn count_active(&self, kind: LocationKind) -> DomainResult<u64> {
        origin_location::Entity::find()
            .filter(origin_location::Column::Kind.eq(kind_to_entity(kind)))
            .filter(origin_location::Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
