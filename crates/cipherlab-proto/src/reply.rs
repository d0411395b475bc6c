//! Tagged decoding of server replies.
//!
//! The server answers every JSON route with an object that may carry a
//! `success` flag and an optional `message`. [`Reply::decode`] folds that
//! envelope into `Ok(payload)` or `Err { message }` once, so no caller ever
//! looks at the flag again.
//!
//! # Invariants
//!
//! - `success: false` always yields [`Reply::Err`], whatever else the object
//!   carries. A missing or blank `message` becomes [`UNKNOWN_ERROR`].
//! - An object without a `success` field (e.g. `check-user`) is decoded as
//!   the payload directly.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{AttackResult, ConversationMessage, ProtoError, StegoAnalysis, UserSummary};

/// Message used when the server rejects without saying why.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Decoded server reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    /// Request accepted; typed payload.
    Ok(T),
    /// Request rejected (`success: false`).
    Err {
        /// Server message, surfaced verbatim.
        message: String,
    },
}

impl<T: DeserializeOwned> Reply<T> {
    /// Decode a raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError`] if the body is not a JSON object or an
    /// accepted reply does not match `T`.
    pub fn decode(body: &[u8]) -> Result<Self, ProtoError> {
        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(value)
    }

    /// Decode an already parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, ProtoError> {
        let Value::Object(map) = &value else {
            return Err(ProtoError::NotAnObject);
        };

        if map.get("success").and_then(Value::as_bool) == Some(false) {
            let message = map
                .get("message")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(UNKNOWN_ERROR);
            return Ok(Self::Err { message: message.to_string() });
        }

        Ok(Self::Ok(serde_json::from_value(value)?))
    }
}

/// Payload of `/api/crypto/attack`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherAttackReport {
    /// Attack label chosen by the server, e.g. "Caesar Brute-Force".
    #[serde(rename = "type", default)]
    pub label: String,
    /// Candidates. `None` when the server omitted the list.
    #[serde(default)]
    pub results: Option<Vec<AttackResult>>,
}

/// Payload of `/api/crypto/encrypt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encrypted {
    /// Ciphertext.
    pub encrypted: String,
}

/// Payload of `/api/crypto/decrypt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decrypted {
    /// Plaintext.
    pub decrypted: String,
}

/// Payload of `/api/attack_auth/check-user`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCheck {
    /// Target user is registered.
    pub exists: bool,
}

/// Payload of `/api/attack_auth/start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackOutcome {
    /// A matching password was found.
    pub found: bool,
    /// Recovered password when `found`.
    #[serde(default)]
    pub password: Option<String>,
    /// Candidates hashed.
    #[serde(default)]
    pub attempts: u64,
    /// Wall time on the server, in seconds.
    #[serde(default)]
    pub duration: f64,
}

/// Bare acknowledgement (`signup`, `signin`, `messages/send`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ack {
    /// Informational message, if any.
    #[serde(default)]
    pub message: Option<String>,
}

/// Payload of the `/api/users` routes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserList {
    /// Users.
    #[serde(default)]
    pub users: Vec<UserSummary>,
}

/// Payload of `/api/messages/conversation/:id`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Conversation {
    /// Messages in server order (oldest first).
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
}

/// Payload of `/api/stego/send`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StegoReceipt {
    /// Informational message, if any.
    #[serde(default)]
    pub message: Option<String>,
    /// Carrier analysis, if the server produced one.
    #[serde(default)]
    pub analysis: Option<StegoAnalysis>,
}

/// Payload of `/api/stego/decrypt/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StegoExtraction {
    /// Recovered hidden text.
    pub decrypted_message: String,
}
