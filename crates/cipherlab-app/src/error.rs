//! User-facing error taxonomy.

use cipherlab_client::ApiError;
use thiserror::Error;

/// Error shown to the user.
///
/// The `Display` text is what ends up in the banner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// Required input missing or malformed; no request was sent.
    #[error("{0}")]
    Validation(String),

    /// The target entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Network or decode failure, shown as a generic retry message.
    #[error("{0}")]
    Transport(String),

    /// Server answered `success: false`; its message is shown verbatim.
    #[error("{0}")]
    Rejected(String),
}

impl ViewError {
    /// Classify a failed call.
    ///
    /// Rejections keep the server's message. Every other failure is logged
    /// and replaced by `retry`.
    pub fn from_api(err: &ApiError, retry: &str) -> Self {
        match err {
            ApiError::Rejected { message } => Self::Rejected(message.clone()),
            other => {
                tracing::warn!(error = %other, "request failed");
                Self::Transport(retry.to_string())
            },
        }
    }

    /// Short class name used by the renderer.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not-found",
            Self::Transport(_) => "transport",
            Self::Rejected(_) => "rejected",
        }
    }
}
