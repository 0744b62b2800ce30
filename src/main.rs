use std::{sync::Arc, time::Duration};

use anyhow::Context;
use tokio::signal;
use tracing::{error, info, warn};

use production_tracker as api;
use production_tracker::config::StorageBackend;
use production_tracker::repositories::Storage;

const HEALTH_CHECK_PERIOD: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = api::config::load_config().context("failed to load configuration")?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    let storage = match cfg.storage_backend {
        StorageBackend::Database => {
            let db_pool = api::db::establish_connection_from_app_config(&cfg)
                .await
                .context("failed to connect to the database")?;
            if cfg.auto_migrate {
                api::db::run_migrations(&db_pool).await.map_err(|e| {
                    error!("Failed running migrations: {}", e);
                    e
                })?;
            }
            Storage::database(Arc::new(db_pool))
        }
        StorageBackend::InMemory => {
            warn!("Using in-memory storage; data is lost on shutdown");
            Storage::in_memory()
        }
    };

    // Init events
    let (event_sender, event_rx) = api::events::channel(cfg.event_channel_capacity);
    tokio::spawn(api::events::process_events(event_rx));

    let app_state = api::AppState::new(cfg.clone(), storage, event_sender);
    tokio::spawn(api::health::run_health_checker(
        app_state.health.clone(),
        HEALTH_CHECK_PERIOD,
    ));

    let db_pool = app_state.storage.db.clone();
    let app = api::app(app_state);

    // Bind and serve
    let addr = cfg.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("production-tracker listening on http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = db_pool {
        if let Err(e) = api::db::close_pool(pool.as_ref().clone()).await {
            warn!("Failed to close database pool: {}", e);
        }
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
