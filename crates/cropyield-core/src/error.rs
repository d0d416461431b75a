use thiserror::Error;

/// Failures surfaced by the prediction pipeline and its configuration.
///
/// Translation problems never appear here: the normalizer degrades to the
/// raw input instead of failing.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Model not loaded")]
    ModelUnavailable,

    #[error("Unknown crop: {0}")]
    UnknownCrop(String),

    #[error("{0}")]
    Internal(String),
}

impl Error {
    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }

    /// True when the request itself was at fault rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::UnknownCrop(_))
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
