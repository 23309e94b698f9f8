//! Aircraft registered to an organization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Aircraft {
    pub id: Uuid,
    pub organization_id: Uuid,

    /// Normalized N-number, unique within the organization
    pub tail_number: String,

    pub make: String,
    pub model: String,
    pub serial_number: Option<String>,
    pub year: Option<i32>,

    /// Created by the example-data seeder
    pub is_example: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAircraftRequest {
    pub tail_number: String,

    #[validate(length(min = 1, max = 80, message = "Make must be 1-80 characters"))]
    pub make: String,

    #[validate(length(min = 1, max = 80, message = "Model must be 1-80 characters"))]
    pub model: String,

    #[validate(length(max = 64))]
    pub serial_number: Option<String>,

    #[validate(range(min = 1903, max = 2100, message = "Year of manufacture is out of range"))]
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAircraftRequest {
    #[validate(length(min = 1, max = 80))]
    pub make: Option<String>,

    #[validate(length(min = 1, max = 80))]
    pub model: Option<String>,

    #[validate(length(max = 64))]
    pub serial_number: Option<String>,

    #[validate(range(min = 1903, max = 2100, message = "Year of manufacture is out of range"))]
    pub year: Option<i32>,
}
