use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Result alias for errors emitted by the analyzer internals.
pub type NoCaptureResult<T> = Result<T, NoCaptureError>;

/// Structured error type for analyzer subsystems.
///
/// Analysis itself never fails: an ineligible or unresolvable lambda is simply
/// not reported. These variants cover the plumbing around it.
#[derive(Debug, Error)]
pub enum NoCaptureError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse failure: {0}")]
    Parse(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl NoCaptureError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Convert to anyhow::Error for interop with anyhow-based code.
    pub fn into_anyhow(self) -> AnyhowError {
        AnyhowError::new(self)
    }
}

impl From<AnyhowError> for NoCaptureError {
    fn from(err: AnyhowError) -> Self {
        NoCaptureError::other(format!("{err:#}"))
    }
}

impl From<toml::de::Error> for NoCaptureError {
    fn from(err: toml::de::Error) -> Self {
        NoCaptureError::config(err.to_string())
    }
}

/// Convenience macro mirroring `anyhow::bail!` but returning NoCaptureError.
#[macro_export]
macro_rules! no_capture_bail {
    ($($arg:tt)*) => {
        return Err($crate::error::NoCaptureError::other(format!($($arg)*)));
    };
}
