//! The API seam.
//!
//! [`Api`] is what the application layer holds. [`crate::HttpApi`] talks to
//! a real server; tests substitute an in-memory fake.

use std::future::Future;

use cipherlab_proto::{
    Ack, AttackOutcome, CipherAttackReport, Conversation, Decrypted, Encrypted, MessageId,
    StegoExtraction, StegoReceipt, UserCheck, UserId, UserList,
    requests::{
        CheckUserRequest, CipherAttackRequest, Credentials, DecryptRequest, EncryptRequest,
        SendMessageRequest, StartAttackRequest, StegoUpload,
    },
};

use crate::ApiError;

/// Typed cipherlab API.
///
/// Requests are taken by value so the returned futures own everything they
/// need and can be moved onto the runtime.
pub trait Api: Clone + Send + Sync + 'static {
    /// `POST /api/crypto/attack`
    fn cipher_attack(
        &self,
        request: CipherAttackRequest,
    ) -> impl Future<Output = Result<CipherAttackReport, ApiError>> + Send;

    /// `POST /api/crypto/encrypt`
    fn encrypt(
        &self,
        request: EncryptRequest,
    ) -> impl Future<Output = Result<Encrypted, ApiError>> + Send;

    /// `POST /api/crypto/decrypt`
    fn decrypt(
        &self,
        request: DecryptRequest,
    ) -> impl Future<Output = Result<Decrypted, ApiError>> + Send;

    /// `POST /api/attack_auth/check-user`
    fn check_user(
        &self,
        request: CheckUserRequest,
    ) -> impl Future<Output = Result<UserCheck, ApiError>> + Send;

    /// `POST /api/attack_auth/start`
    fn start_attack(
        &self,
        request: StartAttackRequest,
    ) -> impl Future<Output = Result<AttackOutcome, ApiError>> + Send;

    /// `POST /api/auth/signup`
    fn sign_up(
        &self,
        credentials: Credentials,
    ) -> impl Future<Output = Result<Ack, ApiError>> + Send;

    /// `POST /api/auth/signin`
    fn sign_in(
        &self,
        credentials: Credentials,
    ) -> impl Future<Output = Result<Ack, ApiError>> + Send;

    /// `GET /api/users`, or `GET /api/users/:id/others` when `except` is set.
    fn users(
        &self,
        except: Option<UserId>,
    ) -> impl Future<Output = Result<UserList, ApiError>> + Send;

    /// `GET /api/messages/conversation/:peer`
    fn conversation(
        &self,
        peer: UserId,
    ) -> impl Future<Output = Result<Conversation, ApiError>> + Send;

    /// `POST /api/messages/send`
    fn send_message(
        &self,
        request: SendMessageRequest,
    ) -> impl Future<Output = Result<Ack, ApiError>> + Send;

    /// `POST /api/stego/send` (multipart)
    fn stego_send(
        &self,
        upload: StegoUpload,
    ) -> impl Future<Output = Result<StegoReceipt, ApiError>> + Send;

    /// `GET /api/stego/decrypt/:id`
    fn stego_extract(
        &self,
        message: MessageId,
    ) -> impl Future<Output = Result<StegoExtraction, ApiError>> + Send;

    /// `GET /api/stego/audio/:file`, raw WAV bytes.
    fn stego_audio(
        &self,
        file_name: String,
    ) -> impl Future<Output = Result<Vec<u8>, ApiError>> + Send;
}
