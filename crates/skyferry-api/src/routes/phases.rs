//! Public phase table, so clients render the workflow from one source.

use axum::{routing::get, Json, Router};
use skyferry_common::phases::{self, PhaseDefinition};
use std::sync::Arc;

use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/phases", get(list_phases))
}

/// GET /api/phases
async fn list_phases() -> Json<Vec<PhaseDefinition>> {
    Json(phases::definitions())
}
