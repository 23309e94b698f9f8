//! Ferry flight routes — records, workflow status, deletion, audit trail.

use axum::{
    extract::{Extension, Path, Query, State},
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use skyferry_common::{
    error::{FerryError, FerryResult},
    ids,
    models::{
        audit::AuditLog,
        flight::{
            CreateFlightRequest, FlightListQuery, FlightResponse, UpdateFlightRequest,
            UpdateStatusRequest,
        },
    },
    permissions::Permissions,
    phases::{self, FlightStatus, Phase},
    validation::{require_text, validate_airport, validate_request},
};
use skyferry_db::repository::{
    aircraft, audit,
    documents,
    flights::{self, FlightChanges, NewFlight},
    profiles,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    access::{self, Caller},
    middleware::AuthContext,
    AppState,
};

const AUDIT_PAGE: i64 = 200;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/flights", get(list_flights).post(create_flight))
        .route("/flights/{flight_id}", get(get_flight).patch(update_flight))
        .route("/flights/{flight_id}/status", post(update_status))
        .route("/flights/{flight_id}/delete", delete(delete_flight))
        .route("/flights/{flight_id}/audit", get(list_audit))
        .route_layer(middleware::from_fn(crate::middleware::auth_middleware))
}

/// A named pilot must belong to the same organization.
async fn check_pilot(state: &AppState, caller: &Caller, pilot_id: Option<Uuid>) -> FerryResult<()> {
    if let Some(pilot_id) = pilot_id {
        if !profiles::is_member(&state.db.pool, pilot_id, caller.organization_id).await? {
            return Err(FerryError::Validation {
                message: "Pilot must be a member of your organization".into(),
            });
        }
    }
    Ok(())
}

fn check_route(origin: &str, destination: &str) -> FerryResult<()> {
    if origin == destination {
        return Err(FerryError::Validation {
            message: "Origin and destination must differ".into(),
        });
    }
    Ok(())
}

/// GET /api/flights?phase=faa_review
async fn list_flights(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<FlightListQuery>,
) -> FerryResult<Json<Vec<FlightResponse>>> {
    let caller = access::caller(&state, &auth).await?;

    let statuses = match query.phase.as_deref() {
        Some(key) => {
            let phase: Phase = key.parse()?;
            Some(
                phase
                    .statuses()
                    .iter()
                    .map(|s| s.as_str().to_string())
                    .collect::<Vec<_>>(),
            )
        }
        None => None,
    };

    let rows =
        flights::list_for_organization(&state.db.pool, caller.organization_id, statuses.as_deref())
            .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// POST /api/flights
async fn create_flight(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateFlightRequest>,
) -> FerryResult<Json<FlightResponse>> {
    validate_request(&body)?;
    let caller = access::caller(&state, &auth).await?;
    caller.require(Permissions::MANAGE_FLIGHTS)?;

    let origin = validate_airport("Origin", &body.origin)?;
    let destination = validate_airport("Destination", &body.destination)?;
    check_route(&origin, &destination)?;
    require_text("Reason", &body.reason)?;

    let ac = aircraft::find_by_id(&state.db.pool, body.aircraft_id)
        .await?
        .ok_or_else(|| FerryError::not_found("Aircraft"))?;
    access::ensure_same_organization(&caller, ac.organization_id)?;
    check_pilot(&state, &caller, body.pilot_id).await?;

    let flight = flights::create_flight(
        &state.db.pool,
        NewFlight {
            id: ids::generate_id(),
            organization_id: caller.organization_id,
            aircraft_id: ac.id,
            created_by: caller.user_id,
            origin: &origin,
            destination: &destination,
            reason: body.reason.trim(),
            status: Phase::Documentation.entry_status().as_str(),
            planned_departure: body.planned_departure,
            pilot_id: body.pilot_id,
            notes: body.notes.as_deref(),
            is_example: false,
        },
    )
    .await?;

    access::record(
        &state,
        &caller,
        Some(flight.id),
        "flight.created",
        "ferry_flight",
        flight.id,
        serde_json::json!({
            "tail_number": ac.tail_number,
            "origin": flight.origin,
            "destination": flight.destination,
        }),
    )
    .await;

    tracing::info!(
        flight_id = %flight.id,
        aircraft = %ac.tail_number,
        route = %format!("{}-{}", flight.origin, flight.destination),
        "Ferry flight created"
    );

    Ok(Json(flight.into()))
}

/// GET /api/flights/{flight_id}
async fn get_flight(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(flight_id): Path<Uuid>,
) -> FerryResult<Json<FlightResponse>> {
    let caller = access::caller(&state, &auth).await?;
    let flight = access::flight(&state, &caller, flight_id).await?;
    Ok(Json(flight.into()))
}

/// PATCH /api/flights/{flight_id}
async fn update_flight(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(flight_id): Path<Uuid>,
    Json(body): Json<UpdateFlightRequest>,
) -> FerryResult<Json<FlightResponse>> {
    validate_request(&body)?;
    let caller = access::caller(&state, &auth).await?;
    caller.require(Permissions::MANAGE_FLIGHTS)?;
    let current = access::flight(&state, &caller, flight_id).await?;

    let origin = body
        .origin
        .as_deref()
        .map(|o| validate_airport("Origin", o))
        .transpose()?;
    let destination = body
        .destination
        .as_deref()
        .map(|d| validate_airport("Destination", d))
        .transpose()?;
    check_route(
        origin.as_deref().unwrap_or(&current.origin),
        destination.as_deref().unwrap_or(&current.destination),
    )?;
    check_pilot(&state, &caller, body.pilot_id.flatten()).await?;

    let changes = FlightChanges {
        origin: origin.as_deref(),
        destination: destination.as_deref(),
        reason: body.reason.as_deref().map(str::trim),
        planned_departure: body.planned_departure,
        pilot_id: body.pilot_id,
        notes: body.notes.as_ref().map(Option::as_deref),
    };
    let updated = flights::update_flight(&state.db.pool, flight_id, changes)
        .await?
        .ok_or_else(|| FerryError::not_found("Ferry flight"))?;

    access::record(
        &state,
        &caller,
        Some(flight_id),
        "flight.updated",
        "ferry_flight",
        flight_id,
        serde_json::json!({}),
    )
    .await;

    Ok(Json(updated.into()))
}

/// POST /api/flights/{flight_id}/status — move the flight through the workflow.
async fn update_status(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(flight_id): Path<Uuid>,
    Json(body): Json<UpdateStatusRequest>,
) -> FerryResult<Json<FlightResponse>> {
    validate_request(&body)?;
    let caller = access::caller(&state, &auth).await?;
    caller.require(Permissions::ADVANCE_STATUS)?;
    let flight = access::flight(&state, &caller, flight_id).await?;

    let target: FlightStatus = body.status.trim().parse()?;
    let current: FlightStatus = flight.status.parse().map_err(|_| {
        FerryError::Internal(anyhow::anyhow!(
            "flight {flight_id} holds unknown status '{}'",
            flight.status
        ))
    })?;
    phases::check_transition(current, target)?;

    let updated = flights::update_status(&state.db.pool, flight_id, current.as_str(), target.as_str())
        .await?
        .ok_or_else(|| FerryError::InvalidTransition {
            from: current.as_str().to_string(),
            to: target.as_str().to_string(),
        })?;

    access::record(
        &state,
        &caller,
        Some(flight_id),
        "flight.status_changed",
        "ferry_flight",
        flight_id,
        serde_json::json!({
            "from": current.as_str(),
            "to": target.as_str(),
            "phase": target.phase().key(),
            "note": body.note,
        }),
    )
    .await;

    tracing::info!(
        flight_id = %flight_id,
        from = current.as_str(),
        to = target.as_str(),
        phase = target.phase().label(),
        "Flight status changed"
    );

    Ok(Json(updated.into()))
}

/// DELETE /api/flights/{flight_id}/delete
async fn delete_flight(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(flight_id): Path<Uuid>,
) -> FerryResult<Json<serde_json::Value>> {
    let caller = access::caller(&state, &auth).await?;
    let flight = access::flight(&state, &caller, flight_id).await?;
    caller.require(Permissions::DELETE_FLIGHTS)?;

    let keys = documents::storage_keys_for_flight(&state.db.pool, flight_id).await?;

    if !flights::delete_flight(&state.db.pool, flight_id).await? {
        return Err(FerryError::not_found("Ferry flight"));
    }

    let orphaned = state.storage.delete_objects_best_effort(&keys).await;

    access::record(
        &state,
        &caller,
        Some(flight_id),
        "flight.deleted",
        "ferry_flight",
        flight_id,
        serde_json::json!({
            "status": flight.status,
            "documents": keys.len(),
        }),
    )
    .await;

    tracing::info!(
        flight_id = %flight_id,
        documents = keys.len(),
        orphaned,
        "Ferry flight deleted"
    );

    Ok(Json(serde_json::json!({ "success": true, "deleted_documents": keys.len() })))
}

/// GET /api/flights/{flight_id}/audit
async fn list_audit(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(flight_id): Path<Uuid>,
) -> FerryResult<Json<Vec<AuditLog>>> {
    let caller = access::caller(&state, &auth).await?;
    caller.require(Permissions::VIEW_AUDIT_LOG)?;
    access::flight(&state, &caller, flight_id).await?;

    let rows = audit::list_for_flight(&state.db.pool, flight_id, AUDIT_PAGE).await?;
    Ok(Json(rows))
}
