//! Shared application state injected into the upgrade handler.

use std::sync::Arc;

use crate::config::{GatewayConfig, SessionConfig};
use crate::ws::origin::OriginPolicy;

/// Read-only settings available to the handler via Axum's `State` extractor.
///
/// Holds no connection data: every connection owns its socket exclusively.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Deadlines passed to each new connection.
    pub session: SessionConfig,
    /// Which `Origin` headers may upgrade.
    pub origin_policy: Arc<OriginPolicy>,
    /// Transport message size cap, if any.
    pub max_message_bytes: Option<usize>,
}

impl AppState {
    /// Builds the state from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            session: config.session_config(),
            origin_policy: Arc::new(config.origin_policy()),
            max_message_bytes: config.max_message_bytes,
        }
    }
}
