//! Production Tracker
//!
//! Tracks manufacturing orders through a fixed production pipeline and
//! derives each order's progress and status from its per-stage tracking.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod production;
pub mod repositories;
pub mod services;
pub mod tracing;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
};

use crate::config::AppConfig;
use crate::events::EventSender;
use crate::health::HealthState;
use crate::repositories::Storage;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Storage,
    pub services: handlers::AppServices,
    pub event_sender: Arc<EventSender>,
    pub health: Arc<HealthState>,
}

impl AppState {
    pub fn new(config: AppConfig, storage: Storage, event_sender: EventSender) -> Self {
        let event_sender = Arc::new(event_sender);
        let services = handlers::AppServices::new(&storage, event_sender.clone());
        let health = Arc::new(HealthState::new(storage.clone(), config.environment.clone()));

        Self {
            config: Arc::new(config),
            storage,
            services,
            event_sender,
            health,
        }
    }
}

/// Routes served under `/api/v1`
pub fn api_v1_routes(health: Arc<HealthState>) -> Router<AppState> {
    let orders = Router::new()
        .route(
            "/orders",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route(
            "/orders/:id",
            get(handlers::orders::get_order)
                .put(handlers::orders::update_order)
                .delete(handlers::orders::delete_order),
        )
        .route("/orders/:id/tracking", put(handlers::orders::update_tracking));

    let projects = Router::new()
        .route(
            "/projects",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route(
            "/projects/:id",
            get(handlers::projects::get_project)
                .put(handlers::projects::update_project)
                .delete(handlers::projects::delete_project),
        );

    let settings = Router::new()
        .route(
            "/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        .route(
            "/settings/efficiency",
            get(handlers::settings::get_efficiency)
                .put(handlers::settings::save_efficiency)
                .post(handlers::settings::save_efficiency),
        );

    Router::new()
        .merge(orders)
        .merge(projects)
        .merge(settings)
        .route("/pipeline", get(handlers::pipeline::list_stages))
        .route("/export/:target", get(handlers::export::export_data))
        .merge(health::status_routes(health.clone()))
        .nest("/health", health::health_routes(health))
}

/// CORS from configuration: explicit origins, permissive when allowed, or
/// same-origin only.
pub fn cors_layer(cfg: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !origins.is_empty() {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else if cfg.should_allow_permissive_cors() {
        ::tracing::info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if cfg.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        CorsLayer::permissive()
    } else {
        ::tracing::warn!("No CORS origins configured; cross-origin requests will be refused");
        CorsLayer::new()
    }
}

/// The full application router with every middleware layer applied.
pub fn app(state: AppState) -> Router {
    let cfg = state.config.clone();
    let health = state.health.clone();

    Router::new()
        .route("/", get(|| async { "production-tracker up" }))
        .nest("/api/v1", api_v1_routes(health.clone()))
        .nest("/health", health::health_routes(health))
        .merge(openapi::swagger_ui())
        .layer(DefaultBodyLimit::max(cfg.max_body_size))
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        .layer(cors_layer(&cfg))
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let cfg = AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            8080,
            "development".into(),
        );
        let (sender, _rx) = events::channel(16);
        AppState::new(cfg, Storage::in_memory(), sender)
    }

    #[tokio::test]
    async fn root_and_unknown_routes() {
        let router = app(test_state());

        let ok = router
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);
        assert!(ok.headers().contains_key(crate::tracing::REQUEST_ID_HEADER));

        let missing = router
            .oneshot(Request::get("/api/v1/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
