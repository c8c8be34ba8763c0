use thiserror::Error;

pub type Result<T, E = LinesightError> = std::result::Result<T, E>;

/// Unified error type covering common failure scenarios across subsystems.
#[derive(Debug, Error)]
pub enum LinesightError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("relay error: {0}")]
    Relay(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("uplink error: {0}")]
    Uplink(String),
    #[error("operational error: {0}")]
    Ops(String),
    #[error("no camera position has been received yet")]
    MissingCameraPosition,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
