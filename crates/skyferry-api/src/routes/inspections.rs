//! Inspection routes — discrepancies found on the aircraft and mechanic signoffs.

use axum::{
    extract::{Extension, Path, State},
    middleware,
    routing::{get, post},
    Json, Router,
};
use skyferry_common::{
    error::{FerryError, FerryResult},
    ids,
    models::inspection::{
        CreateDiscrepancyRequest, CreateSignoffRequest, Discrepancy, MechanicSignoff, Severity,
        SignoffType,
    },
    permissions::Permissions,
    validation::{require_text, validate_request},
};
use skyferry_db::repository::{discrepancies, signoffs};
use std::sync::Arc;
use uuid::Uuid;

use crate::{access, middleware::AuthContext, AppState};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/flights/{flight_id}/discrepancies",
            get(list_discrepancies).post(report_discrepancy),
        )
        .route(
            "/discrepancies/{discrepancy_id}/resolve",
            post(resolve_discrepancy),
        )
        .route(
            "/flights/{flight_id}/signoffs",
            get(list_signoffs).post(create_signoff),
        )
        .route_layer(middleware::from_fn(crate::middleware::auth_middleware))
}

/// GET /api/flights/{flight_id}/discrepancies
async fn list_discrepancies(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(flight_id): Path<Uuid>,
) -> FerryResult<Json<Vec<Discrepancy>>> {
    let caller = access::caller(&state, &auth).await?;
    access::flight(&state, &caller, flight_id).await?;
    let rows = discrepancies::list_for_flight(&state.db.pool, flight_id).await?;
    Ok(Json(rows))
}

/// POST /api/flights/{flight_id}/discrepancies
async fn report_discrepancy(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(flight_id): Path<Uuid>,
    Json(body): Json<CreateDiscrepancyRequest>,
) -> FerryResult<Json<Discrepancy>> {
    validate_request(&body)?;
    require_text("Description", &body.description)?;
    let severity: Severity = body.severity.parse()?;

    let caller = access::caller(&state, &auth).await?;
    caller.require(Permissions::REPORT_DISCREPANCIES)?;
    access::flight(&state, &caller, flight_id).await?;

    let row = discrepancies::create_discrepancy(
        &state.db.pool,
        ids::generate_id(),
        flight_id,
        caller.user_id,
        body.description.trim(),
        severity.as_str(),
    )
    .await?;

    access::record(
        &state,
        &caller,
        Some(flight_id),
        "discrepancy.reported",
        "discrepancy",
        row.id,
        serde_json::json!({ "severity": row.severity }),
    )
    .await;

    if severity == Severity::Grounding {
        tracing::warn!(flight_id = %flight_id, discrepancy_id = %row.id, "Grounding discrepancy reported");
    }

    Ok(Json(row))
}

/// POST /api/discrepancies/{discrepancy_id}/resolve
async fn resolve_discrepancy(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(discrepancy_id): Path<Uuid>,
) -> FerryResult<Json<Discrepancy>> {
    let caller = access::caller(&state, &auth).await?;

    let existing = discrepancies::find_by_id(&state.db.pool, discrepancy_id)
        .await?
        .ok_or_else(|| FerryError::not_found("Discrepancy"))?;
    access::flight(&state, &caller, existing.ferry_flight_id).await?;
    caller.require(Permissions::SIGN_OFF)?;

    let row = discrepancies::resolve(&state.db.pool, discrepancy_id, caller.user_id)
        .await?
        .ok_or(FerryError::Validation {
            message: "Discrepancy is already resolved".into(),
        })?;

    access::record(
        &state,
        &caller,
        Some(row.ferry_flight_id),
        "discrepancy.resolved",
        "discrepancy",
        row.id,
        serde_json::json!({ "severity": row.severity }),
    )
    .await;

    Ok(Json(row))
}

/// GET /api/flights/{flight_id}/signoffs
async fn list_signoffs(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(flight_id): Path<Uuid>,
) -> FerryResult<Json<Vec<MechanicSignoff>>> {
    let caller = access::caller(&state, &auth).await?;
    access::flight(&state, &caller, flight_id).await?;
    let rows = signoffs::list_for_flight(&state.db.pool, flight_id).await?;
    Ok(Json(rows))
}

/// POST /api/flights/{flight_id}/signoffs
async fn create_signoff(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(flight_id): Path<Uuid>,
    Json(body): Json<CreateSignoffRequest>,
) -> FerryResult<Json<MechanicSignoff>> {
    validate_request(&body)?;
    let signoff_type: SignoffType = body.signoff_type.parse()?;

    let caller = access::caller(&state, &auth).await?;
    caller.require(Permissions::SIGN_OFF)?;
    access::flight(&state, &caller, flight_id).await?;

    let row = signoffs::create_signoff(
        &state.db.pool,
        ids::generate_id(),
        flight_id,
        caller.user_id,
        body.certificate_number.trim(),
        signoff_type.as_str(),
        body.notes.as_deref(),
    )
    .await?;

    access::record(
        &state,
        &caller,
        Some(flight_id),
        "signoff.created",
        "mechanic_signoff",
        row.id,
        serde_json::json!({
            "signoff_type": row.signoff_type,
            "certificate_number": row.certificate_number,
        }),
    )
    .await;

    tracing::info!(
        flight_id = %flight_id,
        mechanic_id = %caller.user_id,
        signoff_type = signoff_type.as_str(),
        "Mechanic signoff recorded"
    );

    Ok(Json(row))
}
