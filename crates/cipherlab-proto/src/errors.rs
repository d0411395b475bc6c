//! Protocol error types.

use thiserror::Error;

/// Errors raised while encoding requests or decoding replies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtoError {
    /// Body was not valid JSON or did not match the expected payload.
    #[error("malformed reply: {0}")]
    Malformed(String),

    /// Reply body was JSON but not an object.
    #[error("reply is not a JSON object")]
    NotAnObject,

    /// String did not name a known enum variant.
    #[error("unknown {kind}: {value:?}")]
    UnknownVariant {
        /// Which enum was being parsed.
        kind: &'static str,
        /// Offending input.
        value: String,
    },

    /// Path parameter would escape its URL segment.
    #[error("invalid path segment: {0:?}")]
    InvalidPathSegment(String),
}

impl From<serde_json::Error> for ProtoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
