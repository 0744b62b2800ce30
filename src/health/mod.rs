/*!
 * # Health Check Module
 *
 * - Basic health check (`/health`) - up/down, refreshed on every call
 * - Readiness check (`/health/ready`) - whether the store accepts traffic
 * - Liveness check (`/health/live`) - process is alive
 * - Version (`/health/version`)
 *
 * `/status` lives beside the API routes and reports service metadata.
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;
use tracing::{debug, error, warn};
use utoipa::ToSchema;

use crate::config::StorageBackend;
use crate::repositories::Storage;

pub const SERVICE_NAME: &str = "production-tracker";

/// Basic health status
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
    Degraded,
}

/// Health check detail
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct HealthDetail {
    pub status: HealthStatus,
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Overall health information
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct HealthInfo {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub details: HashMap<String, HealthDetail>,
}

/// Service metadata returned by `/status`
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ServiceStatus {
    pub service: String,
    pub version: String,
    pub environment: String,
    #[schema(value_type = String)]
    pub storage_backend: StorageBackend,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    pub storage: Storage,
    pub environment: String,
    pub health_cache: Arc<RwLock<HealthInfo>>,
    pub start_time: SystemTime,
}

impl HealthState {
    pub fn new(storage: Storage, environment: impl Into<String>) -> Self {
        Self {
            storage,
            environment: environment.into(),
            health_cache: Arc::new(RwLock::new(HealthInfo {
                status: HealthStatus::Up,
                version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: Utc::now(),
                uptime_seconds: 0,
                details: HashMap::new(),
            })),
            start_time: SystemTime::now(),
        }
    }

    /// Calculate system uptime
    pub fn uptime(&self) -> u64 {
        SystemTime::now()
            .duration_since(self.start_time)
            .unwrap_or(Duration::from_secs(0))
            .as_secs()
    }

    /// Re-checks the store and refreshes the cached health
    pub async fn update_health(&self) -> HealthInfo {
        let storage_detail = match self.storage.ping().await {
            Ok(()) => HealthDetail {
                status: HealthStatus::Up,
                message: Some(self.storage.backend.to_string()),
                timestamp: Utc::now(),
            },
            Err(e) => {
                error!("Storage health check failed: {}", e);
                HealthDetail {
                    status: HealthStatus::Down,
                    message: Some(e.response_message()),
                    timestamp: Utc::now(),
                }
            }
        };

        let mut health = self.health_cache.write().await;
        health.timestamp = Utc::now();
        health.uptime_seconds = self.uptime();
        health.details.insert("storage".to_string(), storage_detail);

        let any_down = health
            .details
            .values()
            .any(|detail| detail.status == HealthStatus::Down);
        let any_degraded = health
            .details
            .values()
            .any(|detail| detail.status == HealthStatus::Degraded);

        health.status = if any_down {
            HealthStatus::Down
        } else if any_degraded {
            HealthStatus::Degraded
        } else {
            HealthStatus::Up
        };

        health.clone()
    }

    pub fn service_status(&self) -> ServiceStatus {
        ServiceStatus {
            service: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: self.environment.clone(),
            storage_backend: self.storage.backend,
            uptime_seconds: self.uptime(),
            timestamp: Utc::now(),
        }
    }
}

fn status_code_for(status: HealthStatus) -> StatusCode {
    match status {
        HealthStatus::Up | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Returns build and version information
pub async fn version_info() -> impl IntoResponse {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Health check with a fresh storage ping
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthInfo),
        (status = 503, description = "Storage unreachable", body = HealthInfo),
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    debug!("Health check endpoint called");
    let health = state.update_health().await;
    (status_code_for(health.status), Json(health))
}

/// Readiness check endpoint
pub async fn readiness_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let health = state.update_health().await;
    (
        status_code_for(health.status),
        Json(json!({
            "ready": health.status == HealthStatus::Up,
            "timestamp": health.timestamp,
        })),
    )
}

/// Liveness check endpoint
pub async fn liveness_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "alive": true,
            "uptime_seconds": state.uptime(),
            "timestamp": Utc::now(),
        })),
    )
}

/// Service metadata
#[utoipa::path(
    get,
    path = "/api/v1/status",
    responses(
        (status = 200, description = "Service metadata", body = ServiceStatus),
    ),
    tag = "health"
)]
pub async fn service_status(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    Json(state.service_status())
}

/// Run periodic health checks
pub async fn run_health_checker(state: Arc<HealthState>, period: Duration) {
    let mut interval = tokio::time::interval(period);

    loop {
        interval.tick().await;
        let health = state.update_health().await;
        if health.status != HealthStatus::Up {
            warn!("System health is not optimal: {:?}", health.status);

            for (name, detail) in &health.details {
                if detail.status != HealthStatus::Up {
                    warn!("Component {name} is not healthy: {:?}", detail.status);
                }
            }
        }
    }
}

/// Health endpoints, to be nested under `/health`
pub fn health_routes<S>(state: Arc<HealthState>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
        .route("/version", get(version_info))
        .with_state(state)
}

/// `/status` route
pub fn status_routes<S>(state: Arc<HealthState>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/status", get(service_status))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_storage_is_up() {
        let state = HealthState::new(Storage::in_memory(), "test");
        let health = state.update_health().await;

        assert_eq!(health.status, HealthStatus::Up);
        assert_eq!(
            health.details["storage"].message.as_deref(),
            Some("in-memory")
        );
    }

    #[test]
    fn status_reports_backend_and_environment() {
        let status = HealthState::new(Storage::in_memory(), "staging").service_status();
        assert_eq!(status.service, SERVICE_NAME);
        assert_eq!(status.environment, "staging");
        assert_eq!(status.storage_backend, StorageBackend::InMemory);
    }

    #[test]
    fn down_maps_to_service_unavailable() {
        assert_eq!(status_code_for(HealthStatus::Down), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status_code_for(HealthStatus::Degraded), StatusCode::OK);
    }
}
