//! Pilot certificates and medicals held by a profile.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PilotQualification {
    pub id: Uuid,
    pub profile_id: Uuid,
    /// e.g. `private`, `commercial`, `atp`
    pub certificate_type: String,
    pub certificate_number: String,
    pub medical_class: Option<i16>,
    pub expires_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQualificationRequest {
    #[validate(length(min = 1, max = 40, message = "Certificate type must be 1-40 characters"))]
    pub certificate_type: String,

    #[validate(length(min = 4, max = 32, message = "Certificate number must be 4-32 characters"))]
    pub certificate_number: String,

    #[validate(range(min = 1, max = 3, message = "Medical class must be 1, 2 or 3"))]
    pub medical_class: Option<i16>,

    pub expires_on: Option<NaiveDate>,
}
