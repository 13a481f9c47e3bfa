//! Listener and router: binds the address and mounts the echo endpoint.

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::ws::handler::ws_handler;

/// Builds the router with the upgrade endpoint mounted at `ws_path`.
///
/// Requests on any other path get axum's default `404`.
///
/// # Panics
///
/// Panics if `ws_path` does not start with `/`; [`GatewayConfig::validate`]
/// rejects such paths beforehand.
pub fn build_router(state: AppState, ws_path: &str) -> Router {
    Router::new()
        .route(ws_path, get(ws_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Binds `addr`, resolving host names.
///
/// # Errors
///
/// Returns [`GatewayError::Bind`] if the address is malformed, in use, or
/// not permitted.
pub async fn bind(addr: &str) -> Result<TcpListener, GatewayError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| GatewayError::Bind {
            addr: addr.to_string(),
            source,
        })
}

/// Accepts connections on `listener` until the process stops.
///
/// # Errors
///
/// Returns [`GatewayError::Serve`] if the accept loop fails.
pub async fn serve(listener: TcpListener, router: Router) -> Result<(), GatewayError> {
    axum::serve(listener, router).await?;
    Ok(())
}

/// Binds the configured address and serves the echo endpoint.
///
/// Nothing is accepted unless the bind succeeds.
///
/// # Errors
///
/// Returns [`GatewayError::Bind`] if the address cannot be bound, which the
/// binary treats as fatal, or [`GatewayError::Serve`] if serving fails.
pub async fn start(config: &GatewayConfig) -> Result<(), GatewayError> {
    let addr = config.listen_addr();
    tracing::info!(%addr, path = %config.ws_path, "starting echo-gateway");

    let listener = bind(&addr).await?;
    let local = listener.local_addr()?;
    tracing::info!(addr = %local, "server listening");

    let router = build_router(AppState::from_config(config), &config.ws_path);
    serve(listener, router).await
}
