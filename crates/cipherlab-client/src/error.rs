//! Client error types.

use cipherlab_proto::ProtoError;
use thiserror::Error;

/// Failure of a single API call.
///
/// `Clone` so the outcome of a call can travel inside application events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Base URL or request could not be built.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Connection, timeout or body read failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx status without a decodable reply body.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// Reply body did not match the expected payload.
    #[error(transparent)]
    Decode(#[from] ProtoError),

    /// Server answered `success: false`.
    #[error("{message}")]
    Rejected {
        /// Server message, verbatim.
        message: String,
    },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_displays_server_message() {
        let err = ApiError::Rejected { message: "User already exists".into() };
        assert_eq!(err.to_string(), "User already exists");
    }

    #[test]
    fn decode_errors_convert() {
        let err = ApiError::from(ProtoError::NotAnObject);
        assert!(matches!(err, ApiError::Decode(ProtoError::NotAnObject)));
        assert_eq!(err.to_string(), "reply is not a JSON object");
    }
}
