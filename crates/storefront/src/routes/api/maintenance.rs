//! Maintenance mode toggle.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{ApiJson, Envelope, ok};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceStatus {
    pub enabled: bool,
}

/// `GET /api/maintenance`
#[instrument(skip(state))]
pub async fn status(State(state): State<AppState>) -> Json<Envelope<MaintenanceStatus>> {
    ok(MaintenanceStatus {
        enabled: state.maintenance_enabled(),
    })
}

/// `POST /api/maintenance` with `{enabled}`. Requires the admin token.
#[instrument(skip(state, _admin))]
pub async fn toggle(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    ApiJson(body): ApiJson<MaintenanceStatus>,
) -> Result<Json<Envelope<MaintenanceStatus>>> {
    let previous = state.set_maintenance(body.enabled);
    info!(previous, enabled = body.enabled, "Maintenance toggled via API");
    Ok(ok(body))
}
