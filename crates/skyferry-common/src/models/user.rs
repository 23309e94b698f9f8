//! User accounts and profiles.
//!
//! A `User` is the login identity; its `Profile` carries the display name and
//! the organization membership that scopes every other query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::FerryError;
use crate::permissions::{Permissions, Role};

/// A login identity.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,

    /// Unique, compared case-insensitively
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

/// Per-user profile and organization membership.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub user_id: Uuid,
    pub full_name: String,
    pub organization_id: Option<Uuid>,
    /// Role within the organization (`owner`, `admin`, `dispatcher`, ...)
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// The organization this profile belongs to, or `NoOrganization`.
    pub fn organization(&self) -> Result<Uuid, FerryError> {
        self.organization_id.ok_or(FerryError::NoOrganization)
    }

    /// Role parsed from the stored string. Unknown roles degrade to viewer.
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or(Role::Viewer)
    }

    pub fn permissions(&self) -> Permissions {
        self.role().permissions()
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(min = 10, max = 128, message = "Password must be 10-128 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 120, message = "Full name must be 1-120 characters"))]
    pub full_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 120, message = "Full name must be 1-120 characters"))]
    pub full_name: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub organization_id: Option<Uuid>,
    pub role: String,
    pub permissions: Permissions,
}

impl ProfileResponse {
    pub fn new(email: String, profile: Profile) -> Self {
        let permissions = profile.permissions();
        Self {
            user_id: profile.user_id,
            email,
            full_name: profile.full_name,
            organization_id: profile.organization_id,
            role: profile.role,
            permissions,
        }
    }
}
