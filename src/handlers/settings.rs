use axum::{extract::State, response::IntoResponse, Json};
use serde_json::{Map, Value};

use super::common::success_response;
use crate::{errors::ServiceError, models::settings::EfficiencyTargets, AppState};

/// Get settings
#[utoipa::path(
    get,
    path = "/api/v1/settings",
    responses(
        (status = 200, description = "Settings document, empty when none stored", body = crate::models::settings::Settings),
    ),
    tag = "settings"
)]
pub async fn get_settings(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let settings = state.services.settings.get_settings().await?;
    Ok(success_response(settings))
}

/// Merge settings
#[utoipa::path(
    put,
    path = "/api/v1/settings",
    request_body(content = Object, description = "Top-level keys to set"),
    responses(
        (status = 200, description = "Merged settings document", body = crate::models::settings::Settings),
        (status = 422, description = "Body is not a JSON object"),
    ),
    tag = "settings"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(patch): Json<Map<String, Value>>,
) -> Result<impl IntoResponse, ServiceError> {
    let settings = state.services.settings.update_settings(patch).await?;
    Ok(success_response(settings))
}

/// Get efficiency targets
#[utoipa::path(
    get,
    path = "/api/v1/settings/efficiency",
    responses(
        (status = 200, description = "Targets keyed by stage name; defaults when none stored",
            body = Object),
    ),
    tag = "settings"
)]
pub async fn get_efficiency(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let targets = state.services.settings.efficiency_targets().await?;
    Ok(success_response(targets))
}

/// Save efficiency targets
#[utoipa::path(
    put,
    path = "/api/v1/settings/efficiency",
    request_body(content = Object, description = "StageTarget objects keyed by stage name"),
    responses(
        (status = 200, description = "Targets saved",
            body = Object),
        (status = 400, description = "Unknown process in targets", body = crate::errors::ErrorResponse),
    ),
    tag = "settings"
)]
pub async fn save_efficiency(
    State(state): State<AppState>,
    Json(targets): Json<EfficiencyTargets>,
) -> Result<impl IntoResponse, ServiceError> {
    let saved = state
        .services
        .settings
        .save_efficiency_targets(targets)
        .await?;
    Ok(success_response(saved))
}
