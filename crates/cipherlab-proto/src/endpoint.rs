//! Endpoint table.
//!
//! One variant per server route. Paths are relative to the API base URL and
//! carry no leading slash so they join cleanly onto a base with a path
//! prefix.

use crate::{MessageId, ProtoError, UserId};

/// HTTP method used by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Body-less read.
    Get,
    /// JSON or multipart body.
    Post,
}

/// Server route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `POST /api/crypto/attack`
    CipherAttack,
    /// `POST /api/crypto/encrypt`
    Encrypt,
    /// `POST /api/crypto/decrypt`
    Decrypt,
    /// `POST /api/attack_auth/check-user`
    CheckUser,
    /// `POST /api/attack_auth/start`
    StartAttack,
    /// `POST /api/auth/signup`
    SignUp,
    /// `POST /api/auth/signin`
    SignIn,
    /// `GET /api/users`
    Users,
    /// `GET /api/users/:id/others`
    OtherUsers(UserId),
    /// `GET /api/messages/conversation/:otherUserId`
    Conversation(UserId),
    /// `POST /api/messages/send`
    SendMessage,
    /// `POST /api/stego/send` (multipart)
    StegoSend,
    /// `GET /api/stego/decrypt/:messageId`
    StegoExtract(MessageId),
    /// `GET /api/stego/audio/:filename`
    StegoAudio(String),
}

impl Endpoint {
    /// HTTP method.
    pub fn method(&self) -> Method {
        match self {
            Self::Users
            | Self::OtherUsers(_)
            | Self::Conversation(_)
            | Self::StegoExtract(_)
            | Self::StegoAudio(_) => Method::Get,
            Self::CipherAttack
            | Self::Encrypt
            | Self::Decrypt
            | Self::CheckUser
            | Self::StartAttack
            | Self::SignUp
            | Self::SignIn
            | Self::SendMessage
            | Self::StegoSend => Method::Post,
        }
    }

    /// Path relative to the API base.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::InvalidPathSegment`] if a file name is empty, is
    /// a dot segment, or contains a separator, a query or fragment marker, or
    /// a percent escape.
    pub fn path(&self) -> Result<String, ProtoError> {
        let path = match self {
            Self::CipherAttack => "api/crypto/attack".to_string(),
            Self::Encrypt => "api/crypto/encrypt".to_string(),
            Self::Decrypt => "api/crypto/decrypt".to_string(),
            Self::CheckUser => "api/attack_auth/check-user".to_string(),
            Self::StartAttack => "api/attack_auth/start".to_string(),
            Self::SignUp => "api/auth/signup".to_string(),
            Self::SignIn => "api/auth/signin".to_string(),
            Self::Users => "api/users".to_string(),
            Self::OtherUsers(id) => format!("api/users/{id}/others"),
            Self::Conversation(id) => format!("api/messages/conversation/{id}"),
            Self::SendMessage => "api/messages/send".to_string(),
            Self::StegoSend => "api/stego/send".to_string(),
            Self::StegoExtract(id) => format!("api/stego/decrypt/{id}"),
            Self::StegoAudio(name) => format!("api/stego/audio/{}", checked_segment(name)?),
        };
        Ok(path)
    }
}

fn checked_segment(segment: &str) -> Result<&str, ProtoError> {
    // No `%`: the server decodes escapes, so `%2e%2e` is `..` to it.
    let forbidden = |c: char| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_control();
    if segment.is_empty() || segment == "." || segment == ".." || segment.contains(forbidden) {
        return Err(ProtoError::InvalidPathSegment(segment.to_string()));
    }
    Ok(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameterised_paths() {
        assert_eq!(Endpoint::OtherUsers(7).path().unwrap(), "api/users/7/others");
        assert_eq!(Endpoint::Conversation(3).path().unwrap(), "api/messages/conversation/3");
        assert_eq!(Endpoint::StegoExtract(12).path().unwrap(), "api/stego/decrypt/12");
        assert_eq!(
            Endpoint::StegoAudio("stego_1_2.wav".into()).path().unwrap(),
            "api/stego/audio/stego_1_2.wav"
        );
    }

    #[test]
    fn audio_file_names_cannot_escape_segment() {
        for bad in ["", "..", "../secret.wav", "a/b.wav", "x.wav?raw=1", "x.wav#t", "%2e%2e", "a%2fb.wav"] {
            assert_eq!(
                Endpoint::StegoAudio(bad.into()).path(),
                Err(ProtoError::InvalidPathSegment(bad.into())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn methods() {
        assert_eq!(Endpoint::CheckUser.method(), Method::Post);
        assert_eq!(Endpoint::StegoSend.method(), Method::Post);
        assert_eq!(Endpoint::Conversation(1).method(), Method::Get);
        assert_eq!(Endpoint::StegoAudio("a.wav".into()).method(), Method::Get);
    }
}
