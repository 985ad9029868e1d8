//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::user::{CreateUserDto, GetUserDto, UpdateUserDto};
use crate::domain::{DomainError, User, UserRole};
use crate::shared::validate_pagination;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    /// `admin` or `user`
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            role: u.role.to_string(),
            is_active: u.is_active,
            created_at: u.created_at,
            updated_at: u.updated_at,
            last_login_at: u.last_login_at,
        }
    }
}

fn parse_role(role: Option<&str>) -> Result<Option<UserRole>, DomainError> {
    role.map(str::parse).transpose()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub password: String,
    /// `admin` or `user` (default)
    pub role: Option<String>,
}

impl TryFrom<CreateUserRequest> for CreateUserDto {
    type Error = DomainError;

    fn try_from(req: CreateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            role: parse_role(req.role.as_deref())?,
            username: req.username,
            email: req.email,
            password: req.password,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

impl TryFrom<UpdateUserRequest> for UpdateUserDto {
    type Error = DomainError;

    fn try_from(req: UpdateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            role: parse_role(req.role.as_deref())?,
            username: req.username,
            email: req.email,
            is_active: req.is_active,
        })
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersParams {
    /// Matches username or email
    pub search: Option<String>,
    /// `admin` or `user`
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl TryFrom<ListUsersParams> for GetUserDto {
    type Error = DomainError;

    fn try_from(params: ListUsersParams) -> Result<Self, Self::Error> {
        let (page, limit) = validate_pagination(params.page, params.limit);
        Ok(Self {
            search: params.search.filter(|s| !s.trim().is_empty()),
            role: parse_role(params.role.as_deref())?,
            is_active: params.is_active,
            page,
            limit,
        })
    }
}
