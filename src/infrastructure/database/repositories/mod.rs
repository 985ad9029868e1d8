//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod audit_repository;
pub mod location_repository;
pub mod quotation_repository;
pub mod repository_provider;
pub mod tariff_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use rust_decimal::Decimal;
use sea_orm::{DbErr, RuntimeErr, SqlErr};

use crate::domain::shipping::TransportMode;
use crate::domain::DomainError;
use crate::infrastructure::database::entities::tariff;
use crate::shared::InfraError;

pub(crate) fn db_err(e: DbErr) -> DomainError {
    DomainError::Storage(InfraError::from(e).to_string())
}

/// Like [`db_err`], but unique-constraint violations and lock contention
/// become `Conflict`
pub(crate) fn write_err(e: DbErr, conflict: &str) -> DomainError {
    if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) || is_lock_contention(&e) {
        return DomainError::Conflict(conflict.to_string());
    }
    db_err(e)
}

/// SQLITE_BUSY / SQLITE_LOCKED and their extended codes
fn is_lock_contention(e: &DbErr) -> bool {
    let runtime = match e {
        DbErr::Conn(r) | DbErr::Exec(r) | DbErr::Query(r) => r,
        _ => return false,
    };
    let RuntimeErr::SqlxError(err) = runtime else {
        return false;
    };
    err.as_database_error()
        .and_then(|db| db.code())
        .and_then(|code| code.parse::<i32>().ok())
        .is_some_and(|code| matches!(code & 0xff, 5 | 6))
}

pub(crate) fn mode_to_entity(mode: TransportMode) -> tariff::TransportMode {
    match mode {
        TransportMode::Air => tariff::TransportMode::Air,
        TransportMode::Sea => tariff::TransportMode::Sea,
    }
}

pub(crate) fn mode_to_domain(mode: tariff::TransportMode) -> TransportMode {
    match mode {
        tariff::TransportMode::Air => TransportMode::Air,
        tariff::TransportMode::Sea => TransportMode::Sea,
    }
}

/// Restore column scale on values read back. SQLite keeps decimals as
/// REAL, which can leave binary noise in the last digits.
pub(crate) fn scaled(value: Decimal, dp: u32) -> Decimal {
    value.round_dp(dp).normalize()
}
