use orbis_config::ConfigError;

use crate::platform::PlatformError;

/// Anything that stops the viewer from starting.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to start tile fetch workers: {0}")]
    Fetcher(#[source] std::io::Error),
}
