//! WebSocket layer: upgrade handling, origin checks, the echo loop.
//!
//! The endpoint (by default `/ws`) upgrades the request and then reflects
//! every text or binary message back to the connection it came from.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod origin;
