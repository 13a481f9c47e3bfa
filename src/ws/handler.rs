//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use tracing::Instrument;

use super::connection::Connection;
use crate::app_state::AppState;
use crate::config::SessionConfig;
use crate::error::GatewayError;

/// `GET /ws` — Upgrade the HTTP connection to a WebSocket and echo.
///
/// Refused origins get `403`; malformed upgrade requests get the rejection
/// status axum chooses. Both are logged and nothing else happens for that
/// request.
pub async fn ws_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let origin = headers.get(header::ORIGIN);
    let origin_label = origin
        .map(|o| o.to_str().unwrap_or("<invalid>").to_string())
        .unwrap_or_default();

    if !state.origin_policy.permits(origin) {
        tracing::warn!(origin = %origin_label, "origin rejected");
        return GatewayError::OriginRejected(origin_label).into_response();
    }

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "upgrade failed");
            return rejection.into_response();
        }
    };

    let ws = match state.max_message_bytes {
        Some(limit) => ws.max_message_size(limit),
        None => ws,
    };

    let session = state.session;
    ws.on_failed_upgrade(|err| tracing::warn!(error = %err, "upgrade failed"))
        .on_upgrade(move |socket| run_connection(socket, session, origin_label))
}

async fn run_connection(socket: WebSocket, session: SessionConfig, origin: String) {
    let conn = Connection::new(socket, session);
    let span = tracing::info_span!("connection", conn_id = %conn.id(), %origin);
    let summary = conn.serve().instrument(span.clone()).await;
    span.in_scope(|| {
        tracing::info!(
            echoed = summary.echoed,
            ended_by = %summary.ended_by,
            "connection released"
        );
    });
}
