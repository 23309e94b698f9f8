//! Organization model — the tenant that owns aircraft and flights.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 2, max = 120, message = "Organization name must be 2-120 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    /// One of `admin`, `dispatcher`, `mechanic`, `pilot`, `viewer`
    pub role: String,
}

/// A member as listed to other members of the organization.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MemberResponse {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}
