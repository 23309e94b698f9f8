//! Insurance routes — coverage attached to a ferry flight.

use axum::{
    extract::{Extension, Path, State},
    middleware,
    routing::get,
    Json, Router,
};
use skyferry_common::{
    error::FerryResult,
    ids,
    models::insurance::{CreateInsuranceRequest, InsurancePolicy},
    permissions::Permissions,
    validation::{require_text, validate_date_range, validate_request},
};
use skyferry_db::repository::insurance;
use std::sync::Arc;
use uuid::Uuid;

use crate::{access, middleware::AuthContext, AppState};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/flights/{flight_id}/insurance",
            get(list_policies).post(create_policy),
        )
        .route_layer(middleware::from_fn(crate::middleware::auth_middleware))
}

/// GET /api/flights/{flight_id}/insurance
async fn list_policies(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(flight_id): Path<Uuid>,
) -> FerryResult<Json<Vec<InsurancePolicy>>> {
    let caller = access::caller(&state, &auth).await?;
    access::flight(&state, &caller, flight_id).await?;
    let rows = insurance::list_for_flight(&state.db.pool, flight_id).await?;
    Ok(Json(rows))
}

/// POST /api/flights/{flight_id}/insurance
async fn create_policy(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(flight_id): Path<Uuid>,
    Json(body): Json<CreateInsuranceRequest>,
) -> FerryResult<Json<InsurancePolicy>> {
    validate_request(&body)?;
    require_text("Carrier", &body.carrier)?;
    require_text("Policy number", &body.policy_number)?;
    validate_date_range(body.effective_on, body.expires_on)?;

    let caller = access::caller(&state, &auth).await?;
    caller.require(Permissions::MANAGE_FLIGHTS)?;
    access::flight(&state, &caller, flight_id).await?;

    let policy = insurance::create_policy(
        &state.db.pool,
        ids::generate_id(),
        flight_id,
        body.carrier.trim(),
        body.policy_number.trim(),
        body.coverage_amount_cents,
        body.effective_on,
        body.expires_on,
    )
    .await?;

    access::record(
        &state,
        &caller,
        Some(flight_id),
        "insurance.added",
        "insurance_policy",
        policy.id,
        serde_json::json!({
            "carrier": policy.carrier,
            "expires_on": policy.expires_on,
        }),
    )
    .await;

    Ok(Json(policy))
}
