use std::sync::OnceLock;

use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

static INIT: OnceLock<()> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install a stdout subscriber. `RUST_LOG` takes precedence over `default_level`.
/// Calls after the first are no-ops.
pub fn init(default_level: &str) -> Result<(), LoggingError> {
    if INIT.get().is_some() {
        return Ok(());
    }
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default().with(filter).with(fmt::layer().with_target(false));
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = INIT.set(());
    tracing::info!("Logging initialized at level {default_level}");
    Ok(())
}
