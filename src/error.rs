//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] covers startup and request-level failures. Failures
//! inside an upgraded connection are [`SessionError`]s: they never reach the
//! peer as a response, only the log.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Startup and request-level error enum with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The listen address could not be bound. Fatal at startup.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address as it was passed to the listener.
        addr: String,
        /// Underlying socket error.
        #[source]
        source: std::io::Error,
    },

    /// The accept loop stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),

    /// A configuration value is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The request's `Origin` is not on the allow-list.
    #[error("origin not allowed: {0}")]
    OriginRejected(String),
}

impl GatewayError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::OriginRejected(_) => StatusCode::FORBIDDEN,
            Self::InvalidConfig(_) | Self::Bind { .. } | Self::Serve(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

/// Why a connection's echo loop ended.
///
/// Every variant is terminal for the connection it occurred on.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Reading the next message failed at the transport.
    #[error("read failed: {0}")]
    Read(#[source] axum::Error),

    /// Writing the echo failed at the transport.
    #[error("write failed: {0}")]
    Write(#[source] axum::Error),

    /// No message arrived within the read deadline.
    #[error("no message within {0:?}")]
    ReadTimeout(Duration),

    /// The echo was not flushed within the write deadline.
    #[error("write not flushed within {0:?}")]
    WriteTimeout(Duration),

    /// The peer sent a close frame.
    #[error("peer closed the connection (code {code:?}): {reason}")]
    PeerClosed {
        /// Close code, if the frame carried one.
        code: Option<u16>,
        /// Close reason, empty when absent.
        reason: String,
    },

    /// The stream ended without a close frame.
    #[error("peer disconnected")]
    Disconnected,

    /// The connection was already closed.
    #[error("connection is closed")]
    Closed,
}

impl SessionError {
    /// Returns `true` if the failure happened while waiting for input.
    #[must_use]
    pub const fn is_read_side(&self) -> bool {
        matches!(
            self,
            Self::Read(_) | Self::ReadTimeout(_) | Self::PeerClosed { .. } | Self::Disconnected
        )
    }
}
