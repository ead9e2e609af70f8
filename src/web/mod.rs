pub mod error;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::TokenVerifier;
use crate::config::Config;
use crate::db::Database;

/// Shared application state. Constructed once at startup and cloned
/// into each handler; there is no process-wide mutable singleton.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    /// Post-creation gate; `None` means the endpoint is ungated.
    pub verifier: Option<Arc<TokenVerifier>>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, db: Database) -> Self {
        let verifier = TokenVerifier::from_config(&config).map(Arc::new);
        Self {
            db,
            config: Arc::new(config),
            verifier,
        }
    }
}

/// Start the web server.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn serve(config: Config, db: Database) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.web_host, config.web_port)
        .parse()
        .context("Invalid web server address")?;

    if config.auth_jwks_url.is_some() {
        info!(scope = %config.auth_required_scope, "Post creation gated by bearer token");
    } else {
        info!("Post creation is ungated (no AUTH_JWKS_URL configured)");
    }

    let state = AppState::new(config, db);
    let app = create_app(state);

    info!(addr = %addr, "Starting HTTP web server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind web server")?;

    axum::serve(listener, app)
        .await
        .context("Web server error")?;

    Ok(())
}

/// Create the main application router.
#[must_use]
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
