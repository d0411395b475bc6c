//! JSON request bodies.
//!
//! Field names match the server's form keys exactly. The multipart upload
//! for `/api/stego/send` is assembled by the HTTP client from
//! [`StegoUpload`].

use serde::Serialize;

use crate::{Algorithm, AttackMethod, CipherAttackKind, KeyParams, UserId};

/// Body of `/api/crypto/attack`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CipherAttackRequest {
    /// Attack to run.
    pub cipher_type: CipherAttackKind,
    /// Ciphertext under attack.
    pub ciphertext: String,
}

/// Body of `/api/crypto/encrypt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncryptRequest {
    /// Plaintext.
    pub message: String,
    /// Cipher.
    pub algorithm: Algorithm,
    /// Key material.
    pub key_params: KeyParams,
}

/// Body of `/api/crypto/decrypt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecryptRequest {
    /// Ciphertext.
    pub encrypted_message: String,
    /// Cipher.
    pub algorithm: Algorithm,
    /// Key material.
    pub key_params: KeyParams,
}

/// Body of `/api/attack_auth/check-user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckUserRequest {
    /// Target login.
    pub username: String,
}

/// Body of `/api/attack_auth/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartAttackRequest {
    /// Target login.
    pub username: String,
    /// Search strategy.
    pub method: AttackMethod,
}

/// Body of `/api/auth/signup` and `/api/auth/signin`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Login name.
    pub username: String,
    /// Password in clear; the server hashes it.
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `/api/messages/send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMessageRequest {
    /// Plaintext; the server encrypts it.
    pub message: String,
    /// Cipher to use.
    pub algo_name: Algorithm,
    /// Recipient.
    pub receiver_id: UserId,
    /// Key material.
    pub key_params: KeyParams,
}

/// Parts of the `/api/stego/send` multipart form.
#[derive(Clone, PartialEq, Eq)]
pub struct StegoUpload {
    /// Original file name of the carrier.
    pub file_name: String,
    /// MIME type reported for the carrier.
    pub mime: String,
    /// Carrier WAV bytes.
    pub audio: Vec<u8>,
    /// Text to hide.
    pub secret_message: String,
    /// Recipient.
    pub receiver_id: UserId,
}

impl std::fmt::Debug for StegoUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StegoUpload")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("audio_len", &self.audio.len())
            .field("receiver_id", &self.receiver_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn start_attack_body() {
        let body = StartAttackRequest { username: "alice".into(), method: AttackMethod::Bruteforce };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"username": "alice", "method": "bruteforce"})
        );
    }

    #[test]
    fn send_message_body() {
        let body = SendMessageRequest {
            message: "hello".into(),
            algo_name: Algorithm::Hill,
            receiver_id: 4,
            key_params: KeyParams::Keyword { key: "FRID".into() },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"message": "hello", "algo_name": "hill", "receiver_id": 4, "key_params": {"key": "FRID"}})
        );
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials { username: "alice".into(), password: "q7*88+".into() };
        let shown = format!("{creds:?}");
        assert!(shown.contains("alice"));
        assert!(!shown.contains("q7*88+"));
    }
}
