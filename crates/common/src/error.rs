//! Error types shared across BoardLens crates.

/// Top-level error type for BoardLens operations.
#[derive(Debug, thiserror::Error)]
pub enum BoardlensError {
    #[error("Camera permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Camera unavailable: {message}")]
    DeviceUnavailable { message: String },

    #[error("No active camera session")]
    NoActiveSession,

    #[error("Analysis request failed: {message}")]
    Analysis { message: String },

    #[error("Encoding error: {message}")]
    Encoding { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using BoardlensError.
pub type BoardlensResult<T> = Result<T, BoardlensError>;

impl BoardlensError {
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: msg.into(),
        }
    }

    pub fn device_unavailable(msg: impl Into<String>) -> Self {
        Self::DeviceUnavailable {
            message: msg.into(),
        }
    }

    pub fn analysis(msg: impl Into<String>) -> Self {
        Self::Analysis {
            message: msg.into(),
        }
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error came from a permission refusal during device
    /// acquisition.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}
