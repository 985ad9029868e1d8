use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::{db_err, write_err};
use crate::domain::{
    user::{CreateUserDto, GetUserDto, UpdateUserDto, UserRepositoryInterface},
    DomainError, DomainResult, User, UserRole,
};
use crate::infrastructure::crypto::password::hash_password;
use crate::infrastructure::database::entities::user;
use crate::shared::PaginatedResult;

const USER_CONFLICT: &str = "Username or email already exists";

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: &str) -> DomainResult<user::Model> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("User", "id", id))
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::User => UserRole::User,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Admin => user::UserRole::Admin,
        UserRole::User => user::UserRole::User,
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        role: entity_role_to_domain(model.role),
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
        last_login_at: model.last_login_at,
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string();

        let password_hash = hash_password(&dto.password)
            .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))?;

        let new_user = user::ActiveModel {
            id: Set(id),
            username: Set(dto.username),
            email: Set(dto.email),
            password_hash: Set(password_hash),
            role: Set(domain_role_to_entity(dto.role.unwrap_or_default())),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            last_login_at: Set(None),
        };

        let model = new_user
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, USER_CONFLICT))?;

        Ok(user_model_to_domain(model))
    }

    async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>> {
        let page = dto.page.max(1);
        let limit = dto.limit.clamp(1, 100);

        let mut query = user::Entity::find();

        if let Some(ref search) = dto.search {
            query = query.filter(
                Condition::any()
                    .add(user::Column::Username.contains(search))
                    .add(user::Column::Email.contains(search)),
            );
        }
        if let Some(role) = dto.role {
            query = query.filter(user::Column::Role.eq(domain_role_to_entity(role)));
        }
        if let Some(active) = dto.is_active {
            query = query.filter(user::Column::IsActive.eq(active));
        }

        query = query.order_by_asc(user::Column::Username);

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let models = query
            .offset((page - 1) * limit)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items: Vec<User> = models.into_iter().map(user_model_to_domain).collect();

        Ok(PaginatedResult::new(items, total, page, limit))
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn update_user(&self, id: &str, dto: UpdateUserDto) -> DomainResult<Option<User>> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();

        if let Some(username) = dto.username {
            active.username = Set(username);
        }
        if let Some(email) = dto.email {
            active.email = Set(email);
        }
        if let Some(role) = dto.role {
            active.role = Set(domain_role_to_entity(role));
        }
        if let Some(is_active) = dto.is_active {
            active.is_active = Set(is_active);
        }

        active.updated_at = Set(Utc::now());

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| write_err(e, USER_CONFLICT))?;

        Ok(Some(user_model_to_domain(updated)))
    }

    async fn update_user_password(&self, id: &str, new_password_hash: &str) -> DomainResult<()> {
        let mut active: user::ActiveModel = self.find_model(id).await?.into();
        active.password_hash = Set(new_password_hash.to_string());
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn touch_last_login(&self, id: &str) -> DomainResult<()> {
        let mut active: user::ActiveModel = self.find_model(id).await?.into();
        active.last_login_at = Set(Some(Utc::now()));
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn count_users(&self, role: Option<UserRole>, active_only: bool) -> DomainResult<u64> {
        let mut query = user::Entity::find();
        if let Some(role) = role {
            query = query.filter(user::Column::Role.eq(domain_role_to_entity(role)));
        }
        if active_only {
            query = query.filter(user::Column::IsActive.eq(true));
        }
        query.count(&self.db).await.map_err(db_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_database;

    fn dto(username: &str, role: Option<UserRole>) -> CreateUserDto {
        CreateUserDto {
            username: username.into(),
            email: format!("{}@example.com", username),
            role,
            password: "password123".into(),
        }
    }

    #[tokio::test]
    async fn create_hashes_password_and_defaults_role() {
        let repo = UserRepository::new(test_database().await);
        let user = repo.create_user(dto("alice", None)).await.unwrap();
        assert_eq!(user.role, UserRole::User);
        assert_ne!(user.password_hash, "password123");
        assert!(user.is_active);
    }

    #[tokio::test]
    async fn duplicate_username_is_conflict() {
        let repo = UserRepository::new(test_database().await);
        repo.create_user(dto("alice", None)).await.unwrap();
        let mut again = dto("alice", None);
        again.email = "other@example.com".into();
        assert!(matches!(
            repo.create_user(again).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn list_filters_and_counts() {
        let repo = UserRepository::new(test_database().await);
        repo.create_user(dto("alice", Some(UserRole::Admin))).await.unwrap();
        let bob = repo.create_user(dto("bob", None)).await.unwrap();
        repo.create_user(dto("carol", None)).await.unwrap();
        repo.update_user(
            &bob.id,
            UpdateUserDto {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let page = repo
            .list_users(GetUserDto {
                role: Some(UserRole::User),
                page: 1,
                limit: 20,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 2);

        let page = repo
            .list_users(GetUserDto {
                search: Some("car".into()),
                page: 1,
                limit: 20,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].username, "carol");

        assert_eq!(repo.count_users(None, true).await.unwrap(), 2);
        assert_eq!(repo.count_users(Some(UserRole::Admin), true).await.unwrap(), 1);
    }
}
