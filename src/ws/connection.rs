//! WebSocket connection state machine.
//!
//! A [`Connection`] is owned by exactly one task. It reads a message, logs
//! it, and writes the identical message back, until a read or write fails.
//! The socket is then closed once and the connection is `Closed` for good.

use axum::extract::ws::{Message, WebSocket};
use futures_util::SinkExt;
use uuid::Uuid;

use super::messages::Payload;
use crate::config::SessionConfig;
use crate::error::SessionError;

/// Lifecycle of a [`Connection`]. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Reads and writes are permitted.
    Open,
    /// The socket has been released; every operation fails.
    Closed,
}

/// Outcome of [`Connection::serve`].
#[derive(Debug)]
pub struct SessionSummary {
    /// Identifier the connection was logged under.
    pub conn_id: Uuid,
    /// Number of messages echoed before the session ended.
    pub echoed: u64,
    /// The failure that ended the session.
    pub ended_by: SessionError,
}

/// One upgraded duplex session.
#[derive(Debug)]
pub struct Connection {
    id: Uuid,
    /// `None` once closed.
    socket: Option<WebSocket>,
    config: SessionConfig,
    echoed: u64,
}

impl Connection {
    /// Wraps a freshly upgraded socket. The connection starts `Open`.
    #[must_use]
    pub fn new(socket: WebSocket, config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            socket: Some(socket),
            config,
            echoed: 0,
        }
    }

    /// Identifier used in this connection's log span.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        if self.socket.is_some() {
            ConnectionState::Open
        } else {
            ConnectionState::Closed
        }
    }

    /// Waits for the next text or binary message.
    ///
    /// Ping and pong frames are answered by the transport and skipped here.
    ///
    /// # Errors
    ///
    /// Returns the [`SessionError`] that makes the session terminal: a
    /// transport error, an expired read deadline, a close frame, the end of
    /// the stream, or [`SessionError::Closed`] if already closed.
    pub async fn receive(&mut self) -> Result<Message, SessionError> {
        let read_timeout = self.config.read_timeout;
        let socket = self.socket.as_mut().ok_or(SessionError::Closed)?;
        loop {
            let next = match read_timeout {
                Some(limit) => tokio::time::timeout(limit, socket.recv())
                    .await
                    .map_err(|_| SessionError::ReadTimeout(limit))?,
                None => socket.recv().await,
            };
            match next {
                None => return Err(SessionError::Disconnected),
                Some(Err(err)) => return Err(SessionError::Read(err)),
                Some(Ok(Message::Close(frame))) => {
                    let (code, reason) = frame
                        .map(|f| (Some(f.code), f.reason.as_str().to_owned()))
                        .unwrap_or_default();
                    return Err(SessionError::PeerClosed { code, reason });
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                Some(Ok(msg)) => return Ok(msg),
            }
        }
    }

    /// Sends `msg` and waits until it is flushed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Write`] on a transport error,
    /// [`SessionError::WriteTimeout`] if the write deadline expires, or
    /// [`SessionError::Closed`] if already closed.
    pub async fn transmit(&mut self, msg: Message) -> Result<(), SessionError> {
        let write_timeout = self.config.write_timeout;
        let socket = self.socket.as_mut().ok_or(SessionError::Closed)?;
        let sent = match write_timeout {
            Some(limit) => tokio::time::timeout(limit, socket.send(msg))
                .await
                .map_err(|_| SessionError::WriteTimeout(limit))?,
            None => socket.send(msg).await,
        };
        sent.map_err(SessionError::Write)
    }

    /// Sends a close frame and releases the socket.
    ///
    /// Returns `false` if the connection was already closed. A failed close
    /// handshake still releases the socket.
    pub async fn close(&mut self) -> bool {
        let Some(mut socket) = self.socket.take() else {
            return false;
        };
        let handshake = SinkExt::close(&mut socket);
        let result = match self.config.write_timeout {
            Some(limit) => match tokio::time::timeout(limit, handshake).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::debug!(?limit, "close handshake timed out");
                    Ok(())
                }
            },
            None => handshake.await,
        };
        if let Err(err) = result {
            tracing::debug!(error = %err, "close handshake failed");
        }
        true
    }

    /// Runs the echo loop until a read or write fails, then closes.
    ///
    /// Messages are echoed in receipt order with the same kind and payload.
    /// The connection is `Closed` when this returns.
    pub async fn serve(mut self) -> SessionSummary {
        tracing::info!("connection established");

        let ended_by = loop {
            let msg = match self.receive().await {
                Ok(msg) => msg,
                Err(err) => break err,
            };

            if let Some(payload) = Payload::of(&msg) {
                tracing::info!(
                    kind = %payload.kind(),
                    len = payload.len(),
                    %payload,
                    "received message"
                );
            }

            if let Err(err) = self.transmit(msg).await {
                break err;
            }
            self.echoed += 1;
        };
        log_session_end(&ended_by);

        self.close().await;

        SessionSummary {
            conn_id: self.id,
            echoed: self.echoed,
            ended_by,
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if self.socket.is_some() {
            tracing::debug!(conn_id = %self.id, "connection dropped while open");
        }
    }
}

fn log_session_end(err: &SessionError) {
    match err {
        SessionError::PeerClosed { code, reason } => {
            tracing::info!(?code, %reason, "peer closed connection");
        }
        _ if err.is_read_side() => tracing::warn!(error = %err, "read error"),
        _ => tracing::warn!(error = %err, "write error"),
    }
}
