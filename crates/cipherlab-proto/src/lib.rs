//! Cipherlab wire protocol
//!
//! Request bodies, response payloads and the endpoint table for the
//! cipherlab HTTP API. The server implements the ciphers, the password
//! search and the audio steganography; this crate only describes the shapes
//! that cross the wire.
//!
//! # Replies
//!
//! Every JSON response is decoded exactly once into a [`Reply`]: either the
//! typed payload or the server's rejection message. Callers never inspect
//! `success` flags or optional `message` fields themselves.
//!
//! # Components
//!
//! - [`Endpoint`]: method and path of every API route
//! - [`requests`]: JSON request bodies
//! - [`Reply`]: tagged decode of the `{success, message?, ...}` envelope
//! - [`types`]: shared domain values (attack methods, key params, messages)

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod endpoint;
mod errors;
mod reply;
pub mod requests;
pub mod types;

pub use endpoint::{Endpoint, Method};
pub use errors::ProtoError;
pub use reply::{
    Ack, AttackOutcome, CipherAttackReport, Conversation, Decrypted, Encrypted, Reply,
    StegoExtraction, StegoReceipt, UNKNOWN_ERROR, UserCheck, UserList,
};
pub use types::{
    Algorithm, AttackMethod, AttackResult, AudioProfile, CipherAttackKind, ConversationMessage,
    CryptoMessage, KeyParams, LsbComparison, MessageId, ResultKey, ShiftDirection, StegoAnalysis,
    StegoMessage, UserId, UserRef, UserSummary,
};
