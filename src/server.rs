//! Startup sequence and the serving loop.
//!
//! Order at launch: ensure the data directory → open the database and verify
//! the schema → generate the API secret → write the startup event line →
//! spawn the heartbeat → bind and accept connections. There is no drain or
//! flush on exit beyond the platform's file close.

use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::{self, AppState};
use crate::auth;
use crate::config::EngramConfig;
use crate::db;
use crate::event_log::EventLog;
use crate::heartbeat;

pub async fn serve(config: EngramConfig) -> Result<()> {
    let data_dir = config.resolved_data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let conn = db::open_database(config.memory_db_path())?;
    let db = Arc::new(Mutex::new(conn));

    let events = Arc::new(EventLog::new(config.event_log_path()));

    let api_secret = auth::generate_secret();
    // stderr only — the secret is never persisted and dies with the process
    tracing::info!(api_key = %api_secret, "API key generated — send as X-API-KEY on every request");

    events.append("INFO", "Engram memory daemon starting up")?;

    if config.heartbeat.enabled {
        let hb_events = Arc::clone(&events);
        let interval = Duration::from_secs(config.heartbeat.interval_secs);
        tokio::spawn(heartbeat::run(hb_events, interval));
    } else {
        tracing::warn!("heartbeat disabled by config");
    }

    let state = AppState::new(db, events, &api_secret);
    let app = api::router(state);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "engram listening at http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to listen for ctrl-c");
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
