//! Same-origin JSON endpoints the site's pages call.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod params;
pub mod state;

pub use error::ApiError;
pub use state::{AppState, CurrentsSettings};

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Extension, Router, routing::get};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing::{error, info};

/// Builds the router with every endpoint and the shared middleware.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_handler))
        // Tides and currents
        .route("/api/stations", get(handlers::currents::stations_handler))
        .route("/api/currents", get(handlers::currents::currents_handler))
        .route("/api/tides", get(handlers::tides::tides_handler))
        // Transit
        .route("/api/arrivals", get(handlers::arrivals::arrivals_handler))
        // Saunas
        .route("/api/places", get(handlers::places::places_handler))
        .route("/api/saunas", get(handlers::saunas::list_saunas_handler))
        .route(
            "/api/saunas/:sauna_id/availability",
            get(handlers::saunas::availability_handler),
        )
        // Calculators and static content
        .route("/api/marriage-tax", get(handlers::tax::marriage_tax_handler))
        .route("/api/gallery", get(handlers::gallery::gallery_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Could not install Ctrl+C handler; serving until killed");
            std::future::pending::<()>().await;
        }
    }
}

/// Binds `listen` and serves until Ctrl+C.
pub async fn serve(listen: &str, state: Arc<AppState>) -> Result<()> {
    let addr: SocketAddr = listen
        .parse()
        .with_context(|| format!("invalid listen address '{listen}'"))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "Site API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
