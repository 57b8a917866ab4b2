//! Keyfold vault executable.

use anyhow::{Context, Result};
use keyfold_telemetry::{init_telemetry, TelemetryConfig};
use tracing::info;
use vault_runtime::{VaultConfig, VaultRuntime};

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::from_env()).context("initializing telemetry")?;

    let config = VaultConfig::from_env().context("loading configuration")?;
    let runtime = VaultRuntime::open(&config)
        .with_context(|| format!("opening vault in {}", config.data_dir.display()))?;

    info!("Vault is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    // Graceful shutdown
    runtime.seal_all()?;
    info!("Vault stopped");

    Ok(())
}
