//! Insurance coverage for a ferry flight.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InsurancePolicy {
    pub id: Uuid,
    pub ferry_flight_id: Uuid,
    pub carrier: String,
    pub policy_number: String,
    pub coverage_amount_cents: Option<i64>,
    pub effective_on: NaiveDate,
    pub expires_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInsuranceRequest {
    #[validate(length(min = 1, max = 120, message = "Carrier must be 1-120 characters"))]
    pub carrier: String,

    #[validate(length(min = 1, max = 64, message = "Policy number must be 1-64 characters"))]
    pub policy_number: String,

    #[validate(range(min = 0))]
    pub coverage_amount_cents: Option<i64>,

    pub effective_on: NaiveDate,

    pub expires_on: NaiveDate,
}
