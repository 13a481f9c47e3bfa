//! Gateway configuration loaded from command-line flags and environment
//! variables.
//!
//! Every flag has an environment fallback, and `dotenvy` loads an optional
//! `.env` file before parsing so the 12-factor style keeps working.

use std::time::Duration;

use clap::Parser;

use crate::error::GatewayError;
use crate::ws::origin::OriginPolicy;

/// Default listen address: all interfaces, port 8080.
pub const DEFAULT_LISTEN_ADDR: &str = ":8080";

/// Default path of the upgrade endpoint.
pub const DEFAULT_WS_PATH: &str = "/ws";

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::load`].
#[derive(Debug, Clone, Parser)]
#[command(name = "echo-gateway", version, about)]
pub struct GatewayConfig {
    /// Address to listen on: `host:port`, `:port` or a bare `port`.
    #[arg(long = "addr", env = "LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: String,

    /// Path of the WebSocket upgrade endpoint.
    #[arg(long = "path", env = "WS_PATH", default_value = DEFAULT_WS_PATH)]
    pub ws_path: String,

    /// Seconds to wait for the next inbound message (0 = wait forever).
    #[arg(long, env = "READ_TIMEOUT_SECS", default_value_t = 0)]
    pub read_timeout_secs: u64,

    /// Seconds to wait for an echo to be flushed (0 = wait forever).
    #[arg(long, env = "WRITE_TIMEOUT_SECS", default_value_t = 0)]
    pub write_timeout_secs: u64,

    /// Comma-separated list of accepted `Origin` values. Empty accepts any.
    #[arg(long, env = "ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    /// Largest message the transport will accept, in bytes.
    #[arg(long, env = "MAX_MESSAGE_BYTES")]
    pub max_message_bytes: Option<usize>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            ws_path: DEFAULT_WS_PATH.to_string(),
            read_timeout_secs: 0,
            write_timeout_secs: 0,
            allowed_origins: Vec::new(),
            max_message_bytes: None,
        }
    }
}

impl GatewayConfig {
    /// Loads configuration from the process arguments and environment.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file first.
    /// Invalid flags make clap print usage and exit the process.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidConfig`] if the parsed values fail
    /// [`GatewayConfig::validate`].
    pub fn load() -> Result<Self, GatewayError> {
        dotenvy::dotenv().ok();
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Checks values clap cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidConfig`] if the endpoint path does not
    /// start with `/` or the listen address is empty.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if !self.ws_path.starts_with('/') {
            return Err(GatewayError::InvalidConfig(format!(
                "endpoint path must start with '/': {}",
                self.ws_path
            )));
        }
        if self.listen_addr.trim().is_empty() {
            return Err(GatewayError::InvalidConfig(
                "listen address is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the listen address in a form `TcpListener::bind` accepts.
    ///
    /// A missing host (`:8080` or `8080`) means all interfaces.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        normalize_listen_addr(&self.listen_addr)
    }

    /// Per-connection deadlines handed to every [`Connection`](crate::ws::connection::Connection).
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            read_timeout: secs_to_timeout(self.read_timeout_secs),
            write_timeout: secs_to_timeout(self.write_timeout_secs),
        }
    }

    /// Origin policy applied before upgrading.
    #[must_use]
    pub fn origin_policy(&self) -> OriginPolicy {
        OriginPolicy::from_list(&self.allowed_origins)
    }
}

/// Read and write deadlines for one connection.
///
/// `None` blocks indefinitely, which is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Maximum wait for the next inbound message.
    pub read_timeout: Option<Duration>,
    /// Maximum wait for an outbound message to be flushed.
    pub write_timeout: Option<Duration>,
}

fn secs_to_timeout(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Expands the host-less address forms to the unspecified IPv4 address.
fn normalize_listen_addr(raw: &str) -> String {
    let raw = raw.trim();
    if let Some(port) = raw.strip_prefix(':') {
        return format!("0.0.0.0:{port}");
    }
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        return format!("0.0.0.0:{raw}");
    }
    raw.to_string()
}
