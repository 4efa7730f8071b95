// HTTP server.
// Router, middleware stack and graceful shutdown for the JSON API.

pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{HeaderName, Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::config::Settings;
use crate::error::Result;

pub use state::AppState;

/// Build the API router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(routes::USER_ID_HEADER)])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/leagues", get(routes::leagues))
        .route("/api/matches", get(routes::matches))
        .route("/api/matches/today", get(routes::matches_today))
        .route("/api/standings", get(routes::standings))
        .route("/api/teams/{id}", get(routes::team))
        .route("/api/comments", post(routes::comment))
        .route(
            "/api/favorites",
            get(routes::list_favorites).post(routes::add_favorite),
        )
        .route("/api/favorites/upcoming", get(routes::upcoming_favorites))
        .route(
            "/api/favorites/{team_id}",
            get(routes::favorite_status).delete(routes::remove_favorite),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until Ctrl+C or SIGTERM.
pub async fn serve(settings: &Settings) -> Result<()> {
    let state = AppState::from_settings(settings)?;
    let app = router(state);

    let address = settings.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!(%address, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("received SIGTERM, shutting down");
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
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
}
