//! Aircraft routes — the organization's fleet.

use axum::{
    extract::{Extension, Path, State},
    middleware,
    routing::get,
    Json, Router,
};
use skyferry_common::{
    error::{FerryError, FerryResult},
    ids,
    models::aircraft::{Aircraft, CreateAircraftRequest, UpdateAircraftRequest},
    permissions::Permissions,
    validation::{normalize_tail_number, require_text, validate_request},
};
use skyferry_db::{
    postgres::is_unique_violation,
    repository::{
        aircraft::{self, NewAircraft},
        documents,
    },
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    access::{self, Caller},
    middleware::AuthContext,
    AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/aircraft", get(list_aircraft).post(create_aircraft))
        .route(
            "/aircraft/{aircraft_id}",
            get(get_aircraft).patch(update_aircraft).delete(delete_aircraft),
        )
        .route_layer(middleware::from_fn(crate::middleware::auth_middleware))
}

async fn load(state: &AppState, caller: &Caller, id: Uuid) -> FerryResult<Aircraft> {
    let ac = aircraft::find_by_id(&state.db.pool, id)
        .await?
        .ok_or_else(|| FerryError::not_found("Aircraft"))?;
    access::ensure_same_organization(caller, ac.organization_id)?;
    Ok(ac)
}

/// GET /api/aircraft
async fn list_aircraft(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
) -> FerryResult<Json<Vec<Aircraft>>> {
    let caller = access::caller(&state, &auth).await?;
    let fleet = aircraft::list_for_organization(&state.db.pool, caller.organization_id).await?;
    Ok(Json(fleet))
}

/// POST /api/aircraft
async fn create_aircraft(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateAircraftRequest>,
) -> FerryResult<Json<Aircraft>> {
    validate_request(&body)?;
    let caller = access::caller(&state, &auth).await?;
    caller.require(Permissions::MANAGE_AIRCRAFT)?;

    let tail_number = normalize_tail_number(&body.tail_number)?;
    require_text("Make", &body.make)?;
    require_text("Model", &body.model)?;

    let limit = skyferry_common::config::get()
        .limits
        .max_aircraft_per_organization;
    let new = NewAircraft {
        id: ids::generate_id(),
        organization_id: caller.organization_id,
        tail_number: &tail_number,
        make: body.make.trim(),
        model: body.model.trim(),
        serial_number: body.serial_number.as_deref().map(str::trim),
        year: body.year,
    };
    let ac = aircraft::create_aircraft(&state.db.pool, new, i64::from(limit))
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                FerryError::AlreadyExists {
                    resource: format!("Aircraft {tail_number}"),
                }
            } else {
                e.into()
            }
        })?
        .ok_or_else(|| FerryError::Validation {
            message: format!("An organization can register at most {limit} aircraft"),
        })?;

    access::record(
        &state,
        &caller,
        None,
        "aircraft.created",
        "aircraft",
        ac.id,
        serde_json::json!({ "tail_number": ac.tail_number }),
    )
    .await;

    tracing::info!(aircraft_id = %ac.id, tail_number = %ac.tail_number, "Aircraft registered");

    Ok(Json(ac))
}

/// GET /api/aircraft/{aircraft_id}
async fn get_aircraft(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(aircraft_id): Path<Uuid>,
) -> FerryResult<Json<Aircraft>> {
    let caller = access::caller(&state, &auth).await?;
    Ok(Json(load(&state, &caller, aircraft_id).await?))
}

/// PATCH /api/aircraft/{aircraft_id}
async fn update_aircraft(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(aircraft_id): Path<Uuid>,
    Json(body): Json<UpdateAircraftRequest>,
) -> FerryResult<Json<Aircraft>> {
    validate_request(&body)?;
    let caller = access::caller(&state, &auth).await?;
    caller.require(Permissions::MANAGE_AIRCRAFT)?;
    load(&state, &caller, aircraft_id).await?;

    let updated = aircraft::update_aircraft(
        &state.db.pool,
        aircraft_id,
        body.make.as_deref().map(str::trim),
        body.model.as_deref().map(str::trim),
        body.serial_number.as_deref().map(str::trim),
        body.year,
    )
    .await?;

    Ok(Json(updated))
}

/// DELETE /api/aircraft/{aircraft_id} — removes the aircraft and its flights.
async fn delete_aircraft(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(aircraft_id): Path<Uuid>,
) -> FerryResult<Json<serde_json::Value>> {
    let caller = access::caller(&state, &auth).await?;
    caller.require(Permissions::MANAGE_AIRCRAFT)?;
    caller.require(Permissions::DELETE_FLIGHTS)?;
    let ac = load(&state, &caller, aircraft_id).await?;

    let keys = documents::storage_keys_for_aircraft(&state.db.pool, aircraft_id).await?;
    if !aircraft::delete_aircraft(&state.db.pool, aircraft_id).await? {
        return Err(FerryError::not_found("Aircraft"));
    }

    state.storage.delete_objects_best_effort(&keys).await;

    access::record(
        &state,
        &caller,
        None,
        "aircraft.deleted",
        "aircraft",
        aircraft_id,
        serde_json::json!({ "tail_number": ac.tail_number }),
    )
    .await;

    tracing::info!(aircraft_id = %aircraft_id, "Aircraft deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}
