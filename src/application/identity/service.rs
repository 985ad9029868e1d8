//! User management service: application-layer orchestration
//!
//! HTTP handlers are thin wrappers that delegate here.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::application::Actor;
use crate::domain::audit::{AuditAction, NewAuditEntry};
use crate::domain::user::{CreateUserDto, GetUserDto, UpdateUserDto};
use crate::domain::{DomainError, DomainResult, RepositoryProvider, User, UserRole};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use crate::shared::PaginatedResult;

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
}

fn validate_username(username: &str) -> DomainResult<()> {
    if username.len() < 3 || username.len() > 50 {
        return Err(DomainError::Validation(
            "Username must be 3-50 characters".into(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> DomainResult<()> {
    if !email.contains('@') {
        return Err(DomainError::Validation("Invalid email address".into()));
    }
    Ok(())
}

fn validate_password(password: &str) -> DomainResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self { repos, jwt_config }
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate user by username/email + password and return a JWT.
    pub async fn login(&self, username_or_email: &str, password: &str) -> DomainResult<AuthResult> {
        let users = self.repos.users();
        let user = match users.get_user_by_username(username_or_email).await? {
            Some(user) => Some(user),
            None => users.get_user_by_email(username_or_email).await?,
        };

        let Some(user) = user else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            warn!(username = %user.username, "Failed login attempt");
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        let token = create_token(&user.id, &user.username, user.role.as_str(), &self.jwt_config)
            .map_err(|e| DomainError::Storage(format!("Failed to create token: {}", e)))?;

        users.touch_last_login(&user.id).await?;
        info!(user_id = %user.id, username = %user.username, "User logged in");

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    /// Current user behind a token; disabled or deleted accounts are refused
    pub async fn current_user(&self, user_id: &str) -> DomainResult<User> {
        let user = self
            .repos
            .users()
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("User no longer exists".into()))?;
        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }
        Ok(user)
    }

    /// Change a user's password. Verifies the current password first.
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        validate_password(new_password)?;

        let user = self
            .repos
            .users()
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", user_id))?;

        let valid = verify_password(current_password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid current password".into()));
        }

        let new_hash = hash_password(new_password)
            .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))?;

        self.repos
            .users()
            .update_user_password(user_id, &new_hash)
            .await?;

        info!(user_id, "Password changed");
        Ok(())
    }

    // ── Admin user management ───────────────────────────────────

    pub async fn create_user(&self, actor: &Actor, dto: CreateUserDto) -> DomainResult<User> {
        validate_username(&dto.username)?;
        validate_email(&dto.email)?;
        validate_password(&dto.password)?;

        let user = self.repos.users().create_user(dto).await?;

        self.repos
            .audit()
            .record(NewAuditEntry {
                actor_id: Some(actor.user_id.clone()),
                action: AuditAction::CreateUser,
                model_name: "User",
                object_id: user.id.clone(),
                metadata: json!({
                    "username": user.username,
                    "role": user.role.as_str(),
                }),
            })
            .await?;

        info!(
            user_id = %user.id,
            username = %user.username,
            created_by = %actor.username,
            "User created"
        );
        Ok(user)
    }

    pub async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>> {
        self.repos.users().list_users(dto).await
    }

    pub async fn get_user(&self, id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", id))
    }

    pub async fn update_user(&self, actor: &Actor, id: &str, dto: UpdateUserDto) -> DomainResult<User> {
        if let Some(ref username) = dto.username {
            validate_username(username)?;
        }
        if let Some(ref email) = dto.email {
            validate_email(email)?;
        }
        if actor.user_id == id {
            if dto.is_active == Some(false) {
                return Err(DomainError::Validation("You cannot deactivate yourself".into()));
            }
            if dto.role == Some(UserRole::User) {
                return Err(DomainError::Validation("You cannot remove your own admin role".into()));
            }
        }

        self.repos
            .users()
            .update_user(id, dto)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", id))
    }

    /// Users own quotations, so they are deactivated rather than deleted
    pub async fn deactivate_user(&self, actor: &Actor, id: &str) -> DomainResult<User> {
        let user = self
            .update_user(
                actor,
                id,
                UpdateUserDto {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await?;
        info!(user_id = %id, by = %actor.username, "User deactivated");
        Ok(user)
    }

    /// Create the bootstrap admin when the user table is empty.
    /// Returns `true` when an account was created.
    pub async fn ensure_default_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<bool> {
        if self.repos.users().count_users(None, false).await? > 0 {
            return Ok(false);
        }

        self.repos
            .users()
            .create_user(CreateUserDto {
                username: username.to_string(),
                email: email.to_string(),
                role: Some(UserRole::Admin),
                password: password.to_string(),
            })
            .await?;

        info!(username, "Default admin account created");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{admin_actor, test_repos};
    use crate::domain::audit::AuditFilter;

    async fn service() -> UserService {
        UserService::new(test_repos().await, JwtConfig::default())
    }

    #[tokio::test]
    async fn default_admin_created_once_and_can_login() {
        let svc = service().await;
        assert!(svc.ensure_default_admin("admin", "admin@localhost", "admin12345").await.unwrap());
        assert!(!svc.ensure_default_admin("admin", "admin@localhost", "admin12345").await.unwrap());

        let auth = svc.login("admin", "admin12345").await.unwrap();
        assert_eq!(auth.user.role, UserRole::Admin);
        assert_eq!(auth.token_type, "Bearer");

        // email works as login too
        assert!(svc.login("admin@localhost", "admin12345").await.is_ok());
        assert!(matches!(
            svc.login("admin", "wrong-password").await,
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn create_user_validates_and_audits() {
        let svc = service().await;
        svc.ensure_default_admin("admin", "admin@localhost", "admin12345").await.unwrap();
        let admin = svc.repos.users().get_user_by_username("admin").await.unwrap().unwrap();
        let actor = admin_actor(&admin);

        let short = CreateUserDto {
            username: "bob".into(),
            email: "bob@example.com".into(),
            role: None,
            password: "short".into(),
        };
        assert!(matches!(
            svc.create_user(&actor, short).await,
            Err(DomainError::Validation(_))
        ));

        let bob = svc
            .create_user(
                &actor,
                CreateUserDto {
                    username: "bob".into(),
                    email: "bob@example.com".into(),
                    role: None,
                    password: "bobpassword".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(bob.role, UserRole::User);

        let log = svc
            .repos
            .audit()
            .list(AuditFilter {
                page: 1,
                limit: 10,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(log.total, 1);
        assert_eq!(log.items[0].action, "CREATE_USER");
        assert_eq!(log.items[0].object_id, bob.id);
    }

    #[tokio::test]
    async fn deactivated_user_cannot_login() {
        let svc = service().await;
        svc.ensure_default_admin("admin", "admin@localhost", "admin12345").await.unwrap();
        let admin = svc.repos.users().get_user_by_username("admin").await.unwrap().unwrap();
        let actor = admin_actor(&admin);
        let bob = svc
            .create_user(
                &actor,
                CreateUserDto {
                    username: "bob".into(),
                    email: "bob@example.com".into(),
                    role: None,
                    password: "bobpassword".into(),
                },
            )
            .await
            .unwrap();

        svc.deactivate_user(&actor, &bob.id).await.unwrap();
        assert!(matches!(
            svc.login("bob", "bobpassword").await,
            Err(DomainError::Unauthorized(_))
        ));
        assert!(svc.deactivate_user(&actor, &admin.id).await.is_err());
    }

    #[tokio::test]
    async fn change_password_requires_current() {
        let svc = service().await;
        svc.ensure_default_admin("admin", "admin@localhost", "admin12345").await.unwrap();
        let admin = svc.repos.users().get_user_by_username("admin").await.unwrap().unwrap();

        assert!(matches!(
            svc.change_password(&admin.id, "nope-nope", "newpassword1").await,
            Err(DomainError::Unauthorized(_))
        ));
        svc.change_password(&admin.id, "admin12345", "newpassword1").await.unwrap();
        assert!(svc.login("admin", "newpassword1").await.is_ok());
    }
}
