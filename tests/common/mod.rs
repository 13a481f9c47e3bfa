//! Shared helpers for integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use echo_gateway::app_state::AppState;
use echo_gateway::server;

/// Client side of one test connection.
pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Upper bound for any single wait in a test.
pub const WAIT: Duration = Duration::from_secs(5);

/// Starts a server on an ephemeral loopback port and returns its address.
pub async fn spawn_server(state: AppState) -> SocketAddr {
    let listener = server::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve(listener, server::build_router(state, "/ws")));
    addr
}

/// Opens a WebSocket to the echo endpoint.
pub async fn connect(addr: SocketAddr) -> Client {
    let (client, _response) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    client
}

/// Returns the next text or binary message, skipping control frames.
pub async fn next_data(client: &mut Client) -> Message {
    loop {
        let msg = tokio::time::timeout(WAIT, client.next())
            .await
            .expect("timed out waiting for echo")
            .expect("stream ended")
            .expect("read failed");
        if msg.is_text() || msg.is_binary() {
            return msg;
        }
    }
}

/// Reads until the server ends the session. Returns any data messages seen.
pub async fn drain_until_closed(client: &mut Client) -> Vec<Message> {
    let mut seen = Vec::new();
    loop {
        let next = tokio::time::timeout(WAIT, client.next())
            .await
            .expect("server did not close the connection");
        match next {
            None | Some(Err(_)) | Some(Ok(Message::Close(_))) => return seen,
            Some(Ok(msg)) if msg.is_text() || msg.is_binary() => seen.push(msg),
            Some(Ok(_)) => {}
        }
    }
}
