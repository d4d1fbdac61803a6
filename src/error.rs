use thiserror::Error;

use crate::config::ConfigError;
use crate::logging::LoggingError;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}
