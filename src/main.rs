//! echo-gateway server entry point.
//!
//! Parses configuration, binds the listen address and serves the echo
//! endpoint until the process is killed. A bind failure exits non-zero.

use tracing_subscriber::EnvFilter;

use echo_gateway::config::GatewayConfig;
use echo_gateway::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = GatewayConfig::load()?;

    if let Err(err) = server::start(&config).await {
        tracing::error!(error = %err, "fatal");
        return Err(err.into());
    }

    Ok(())
}
