//! Fixtures shared by service and handler tests

use std::sync::Arc;

use crate::application::Actor;
use crate::domain::location::{EntryPointTable, LocationKind, NewLocation};
use crate::domain::user::CreateUserDto;
use crate::domain::{RepositoryProvider, User, UserRole};
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::infrastructure::database::test_database;

pub async fn test_repos() -> Arc<dyn RepositoryProvider> {
    Arc::new(SeaOrmRepositoryProvider::new(test_database().await))
}

pub fn admin_actor(user: &User) -> Actor {
    Actor {
        user_id: user.id.clone(),
        username: user.username.clone(),
        role: user.role,
    }
}

pub async fn seed_user(repos: &dyn RepositoryProvider, username: &str, role: UserRole) -> Actor {
    let user = repos
        .users()
        .create_user(CreateUserDto {
            username: username.into(),
            email: format!("{}@example.com", username),
            role: Some(role),
            password: "password123".into(),
        })
        .await
        .unwrap();
    admin_actor(&user)
}

pub async fn seed_location(repos: &dyn RepositoryProvider, code: &str, country: &str, kind: LocationKind) {
    repos
        .locations()
        .create(NewLocation {
            code: code.into(),
            name: format!("{} terminal", code),
            country: country.into(),
            kind,
        })
        .await
        .unwrap();
}

/// Colombia maps to BOG (air) and CTG (sea); "CO" is an alias
pub fn entry_table() -> EntryPointTable {
    let mut table = EntryPointTable::default();
    table.air.insert("Colombia".into(), "BOG".into());
    table.sea.insert("Colombia".into(), "CTG".into());
    table.aliases.insert("CO".into(), "Colombia".into());
    table
}
