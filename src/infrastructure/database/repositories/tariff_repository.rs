//! SeaORM implementation of TariffRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use super::{db_err, mode_to_domain, mode_to_entity, scaled, write_err};
use crate::domain::shipping::TransportMode;
use crate::domain::tariff::{NewTariff, Tariff, TariffFilter, TariffRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{origin_location, quotation, tariff};

const OPEN_TARIFF_CONFLICT: &str =
    "Another tariff for this origin and mode was created concurrently; retry";

fn entity_to_domain(t: tariff::Model) -> Tariff {
    Tariff {
        id: t.id,
        origin: t.origin,
        mode: mode_to_domain(t.mode),
        rate_usd: scaled(t.rate_usd, 4),
        valid_from: t.valid_from,
        valid_until: t.valid_until,
        created_by: t.created_by,
        created_at: t.created_at,
    }
}

fn key_condition(origin: &str, mode: TransportMode) -> Condition {
    Condition::all()
        .add(tariff::Column::Origin.eq(origin))
        .add(tariff::Column::Mode.eq(mode_to_entity(mode)))
}

pub struct SeaOrmTariffRepository {
    db: DatabaseConnection,
}

impl SeaOrmTariffRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TariffRepository for SeaOrmTariffRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Tariff>> {
        let model = tariff::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_valid_at(
        &self,
        origin: &str,
        mode: TransportMode,
        as_of: DateTime<Utc>,
    ) -> DomainResult<Option<Tariff>> {
        let model = tariff::Entity::find()
            .filter(key_condition(origin, mode))
            .filter(tariff::Column::ValidFrom.lte(as_of))
            .filter(
                Condition::any()
                    .add(tariff::Column::ValidUntil.is_null())
                    .add(tariff::Column::ValidUntil.gt(as_of)),
            )
            .order_by_desc(tariff::Column::ValidFrom)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_open(&self, origin: &str, mode: TransportMode) -> DomainResult<Option<Tariff>> {
        let model = tariff::Entity::find()
            .filter(key_condition(origin, mode))
            .filter(tariff::Column::ValidUntil.is_null())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn history(&self, origin: &str, mode: TransportMode) -> DomainResult<Vec<Tariff>> {
        let models = tariff::Entity::find()
            .filter(key_condition(origin, mode))
            .order_by_desc(tariff::Column::ValidFrom)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn list(&self, filter: TariffFilter) -> DomainResult<Vec<Tariff>> {
        let mut query = tariff::Entity::find();
        if let Some(origin) = filter.origin {
            query = query.filter(tariff::Column::Origin.eq(origin));
        }
        if let Some(mode) = filter.mode {
            query = query.filter(tariff::Column::Mode.eq(mode_to_entity(mode)));
        }
        if filter.open_only {
            query = query.filter(tariff::Column::ValidUntil.is_null());
        }
        let models = query
            .order_by_asc(tariff::Column::Origin)
            .order_by_asc(tariff::Column::Mode)
            .order_by_desc(tariff::Column::ValidFrom)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn supersede(&self, new: NewTariff) -> DomainResult<Tariff> {
        let conflict = |e| write_err(e, OPEN_TARIFF_CONFLICT);
        let txn = self.db.begin().await.map_err(conflict)?;

        // Take the write lock before reading the open row so same-key
        // writers queue up instead of racing. A deferred SQLite transaction
        // only upgrades on its first write, so issue an empty one.
        if txn.get_database_backend() == DbBackend::Sqlite {
            txn.execute_unprepared("UPDATE tariffs SET origin = origin WHERE 1 = 0")
                .await
                .map_err(conflict)?;
        } else {
            origin_location::Entity::find()
                .filter(origin_location::Column::Code.eq(new.origin.as_str()))
                .lock_exclusive()
                .one(&txn)
                .await
                .map_err(conflict)?;
        }

        let open = tariff::Entity::find()
            .filter(key_condition(&new.origin, new.mode))
            .filter(tariff::Column::ValidUntil.is_null())
            .one(&txn)
            .await
            .map_err(conflict)?;

        let mut closed_id = None;
        if let Some(open) = open {
            if new.effective_from <= open.valid_from {
                return Err(DomainError::Validation(format!(
                    "effective_from must be after the current tariff start ({})",
                    open.valid_from.to_rfc3339()
                )));
            }

            // Quotations priced with the open tariff must stay inside its window
            let last_priced = quotation::Entity::find()
                .filter(quotation::Column::TariffId.eq(open.id))
                .order_by_desc(quotation::Column::CreatedAt)
                .one(&txn)
                .await
                .map_err(conflict)?;
            if let Some(q) = last_priced {
                if new.effective_from <= q.created_at {
                    return Err(DomainError::Validation(format!(
                        "effective_from must be after the last quotation priced with the current tariff ({})",
                        q.created_at.to_rfc3339()
                    )));
                }
            }

            closed_id = Some(open.id);
            let mut active: tariff::ActiveModel = open.into();
            active.valid_until = Set(Some(new.effective_from));
            active.update(&txn).await.map_err(conflict)?;
        }

        let inserted = tariff::ActiveModel {
            origin: Set(new.origin),
            mode: Set(mode_to_entity(new.mode)),
            rate_usd: Set(new.rate_usd),
            valid_from: Set(new.effective_from),
            valid_until: Set(None),
            created_by: Set(new.created_by),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(conflict)?;

        txn.commit().await.map_err(conflict)?;

        info!(
            tariff_id = inserted.id,
            origin = %inserted.origin,
            closed_tariff_id = ?closed_id,
            "Tariff created"
        );
        Ok(entity_to_domain(inserted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_database;
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn new_tariff(origin: &str, mode: TransportMode, rate: i64, at: DateTime<Utc>) -> NewTariff {
        NewTariff {
            origin: origin.into(),
            mode,
            rate_usd: Decimal::from(rate),
            effective_from: at,
            created_by: None,
        }
    }

    async fn open_count(db: &DatabaseConnection, origin: &str, mode: TransportMode) -> usize {
        tariff::Entity::find()
            .filter(key_condition(origin, mode))
            .filter(tariff::Column::ValidUntil.is_null())
            .all(db)
            .await
            .unwrap()
            .len()
    }

    #[tokio::test]
    async fn supersede_closes_predecessor_at_new_start() {
        let db = test_database().await;
        let repo = SeaOrmTariffRepository::new(db.clone());
        let t0 = Utc::now() - Duration::days(10);
        let t1 = t0 + Duration::days(5);

        let a = repo.supersede(new_tariff("X", TransportMode::Air, 5, t0)).await.unwrap();
        let b = repo.supersede(new_tariff("X", TransportMode::Air, 6, t1)).await.unwrap();

        let a = repo.find_by_id(a.id).await.unwrap().unwrap();
        assert_eq!(a.valid_until, Some(b.valid_from));
        assert!(b.is_open());
        assert_eq!(open_count(&db, "X", TransportMode::Air).await, 1);
    }

    #[tokio::test]
    async fn resolves_by_window() {
        let db = test_database().await;
        let repo = SeaOrmTariffRepository::new(db);
        let t0 = Utc::now() - Duration::days(10);
        let t1 = t0 + Duration::days(5);

        let a = repo.supersede(new_tariff("X", TransportMode::Air, 5, t0)).await.unwrap();
        let b = repo.supersede(new_tariff("X", TransportMode::Air, 6, t1)).await.unwrap();

        let mid_a = t0 + Duration::days(2);
        let mid_b = t1 + Duration::days(2);
        let found = repo.find_valid_at("X", TransportMode::Air, mid_a).await.unwrap().unwrap();
        assert_eq!(found.id, a.id);
        assert_eq!(found.rate_usd, Decimal::from(5));
        let found = repo.find_valid_at("X", TransportMode::Air, mid_b).await.unwrap().unwrap();
        assert_eq!(found.id, b.id);
        // boundary belongs to the newer tariff
        let found = repo.find_valid_at("X", TransportMode::Air, t1).await.unwrap().unwrap();
        assert_eq!(found.id, b.id);

        assert!(repo
            .find_valid_at("X", TransportMode::Air, t0 - Duration::seconds(1))
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .find_valid_at("X", TransportMode::Sea, mid_b)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let db = test_database().await;
        let repo = SeaOrmTariffRepository::new(db.clone());
        let t0 = Utc::now() - Duration::days(1);

        repo.supersede(new_tariff("X", TransportMode::Air, 5, t0)).await.unwrap();
        repo.supersede(new_tariff("X", TransportMode::Sea, 40, t0)).await.unwrap();
        repo.supersede(new_tariff("Y", TransportMode::Air, 7, t0)).await.unwrap();

        assert_eq!(open_count(&db, "X", TransportMode::Air).await, 1);
        assert_eq!(open_count(&db, "X", TransportMode::Sea).await, 1);
        assert_eq!(repo.list(TariffFilter { open_only: true, ..Default::default() }).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn rejects_start_not_after_open_tariff() {
        let db = test_database().await;
        let repo = SeaOrmTariffRepository::new(db.clone());
        let t0 = Utc::now();

        repo.supersede(new_tariff("X", TransportMode::Air, 5, t0)).await.unwrap();
        let err = repo
            .supersede(new_tariff("X", TransportMode::Air, 6, t0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let history = repo.history("X", TransportMode::Air).await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].is_open());
    }

    #[tokio::test]
    async fn second_open_row_violates_unique_index() {
        let db = test_database().await;
        let repo = SeaOrmTariffRepository::new(db.clone());
        repo.supersede(new_tariff("X", TransportMode::Air, 5, Utc::now())).await.unwrap();

        // A writer that skipped the close step must be refused by the index
        let err = tariff::ActiveModel {
            origin: Set("X".into()),
            mode: Set(tariff::TransportMode::Air),
            rate_usd: Set(Decimal::from(9)),
            valid_from: Set(Utc::now() + Duration::days(1)),
            valid_until: Set(None),
            created_by: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .map_err(|e| write_err(e, OPEN_TARIFF_CONFLICT))
        .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_queue_or_conflict() {
        use crate::infrastructure::database::migrator::Migrator;
        use crate::infrastructure::{init_database, DatabaseConfig};
        use sea_orm_migration::MigratorTrait;
        use std::sync::Arc;

        let path = std::env::temp_dir().join(format!("freight-quote-{}.db", uuid::Uuid::new_v4()));
        let db = init_database(&DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", path.display()),
            max_connections: 8,
        })
        .await
        .unwrap();
        Migrator::up(&db, None).await.unwrap();

        let repo = Arc::new(SeaOrmTariffRepository::new(db.clone()));
        let base = Utc::now() + Duration::days(1);
        let writers: Vec<_> = (0..16)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.supersede(new_tariff("X", TransportMode::Air, 5 + i, base + Duration::minutes(i)))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for writer in writers {
            match writer.await.unwrap() {
                Ok(_) => created += 1,
                // later start already published, or lost the lock race
                Err(DomainError::Validation(_)) | Err(DomainError::Conflict(_)) => {}
                Err(other) => panic!("unexpected error: {}", other),
            }
        }

        assert!(created >= 1);
        assert_eq!(open_count(&db, "X", TransportMode::Air).await, 1);
        let history = repo.history("X", TransportMode::Air).await.unwrap();
        assert_eq!(history.len(), created);
        for pair in history.windows(2) {
            assert_eq!(pair[1].valid_until, Some(pair[0].valid_from));
        }

        db.close().await.unwrap();
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let db = test_database().await;
        let repo = SeaOrmTariffRepository::new(db);
        let t0 = Utc::now() - Duration::days(30);
        for (i, rate) in [5, 6, 7].into_iter().enumerate() {
            repo.supersede(new_tariff("X", TransportMode::Sea, rate, t0 + Duration::days(i as i64 * 10)))
                .await
                .unwrap();
        }
        let history = repo.history("X", TransportMode::Sea).await.unwrap();
        let rates: Vec<Decimal> = history.iter().map(|t| t.rate_usd).collect();
        assert_eq!(rates, vec![Decimal::from(7), Decimal::from(6), Decimal::from(5)]);
        assert_eq!(history[1].valid_until, Some(history[0].valid_from));
        assert_eq!(history[2].valid_until, Some(history[1].valid_from));
    }
}
