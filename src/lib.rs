//! # echo-gateway
//!
//! A single WebSocket endpoint that upgrades HTTP requests and echoes every
//! message back to its sender, unmodified and in order.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket)
//!     │
//!     ├── Listener/Router (server)
//!     │       binds the address, routes the endpoint path
//!     │
//!     └── Connection Handler (ws/)
//!             origin check → upgrade → echo loop → close
//! ```
//!
//! Connections share nothing: each one is served by its own task and owns
//! its socket until it closes.

pub mod app_state;
pub mod config;
pub mod error;
pub mod server;
pub mod ws;
