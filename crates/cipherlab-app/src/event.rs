//! Application input events.
//!
//! [`AppEvent`]s drive the [`crate::App`] state machine. They come from
//! three places:
//! - user gestures ([`Intent`]), delivered by the driver
//! - completed API calls ([`AppEvent::Reply`]), delivered by the bridge
//! - the runtime's periodic [`AppEvent::Tick`]

use std::fmt;

use cipherlab_client::ApiError;
use cipherlab_proto::{
    Ack, Algorithm, AttackMethod, AttackOutcome, CipherAttackKind, CipherAttackReport,
    Conversation, Decrypted, Encrypted, KeyParams, MessageId, ProtoError, StegoExtraction,
    StegoReceipt, UserCheck, UserList, requests::Credentials,
};

use crate::{Page, Ticket, views::Panel};

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick; deadlines are checked against the current time.
    Tick,

    /// User gesture.
    Intent(Intent),

    /// An API call finished.
    Reply {
        /// Ticket the call was issued with.
        ticket: Ticket,
        /// Payload or failure.
        outcome: Result<ApiReply, ApiError>,
    },
}

/// User gesture.
///
/// Intents that make no sense on the current page are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Go to another page.
    Navigate(Page),
    /// Close the application.
    Quit,
    /// Hide the current banner.
    DismissNotice,

    /// Pick the password attack method.
    SelectMethod(AttackMethod),
    /// Start a password attack on `username` with the selected method.
    StartAttack {
        /// Target login, untrimmed.
        username: String,
    },

    /// Switch between the cipher-attack panels.
    SelectPanel(Panel),
    /// Run a cipher attack from one panel.
    Crack {
        /// Panel the request comes from.
        panel: Panel,
        /// Attack to run.
        kind: CipherAttackKind,
        /// Ciphertext, untrimmed.
        ciphertext: String,
    },

    /// Register.
    SignUp(Credentials),
    /// Sign in.
    SignIn(Credentials),

    /// Encrypt on the workbench.
    Encrypt {
        /// Plaintext.
        message: String,
        /// Cipher.
        algorithm: Algorithm,
        /// Key material.
        key_params: KeyParams,
    },
    /// Decrypt on the workbench.
    Decrypt {
        /// Ciphertext.
        ciphertext: String,
        /// Cipher.
        algorithm: Algorithm,
        /// Key material.
        key_params: KeyParams,
    },

    /// Reload the list shown on the current page.
    Reload,
    /// Send an encrypted message to the conversation peer.
    SendCrypto {
        /// Plaintext, untrimmed.
        message: String,
        /// Cipher.
        algorithm: Algorithm,
        /// Key material.
        key_params: KeyParams,
    },
    /// Hide a message in a WAV file and send it to the conversation peer.
    SendStego {
        /// Text to hide, untrimmed.
        secret: String,
        /// Carrier file, if one was picked.
        attachment: Option<Attachment>,
    },
    /// Decrypt a received text message.
    DecryptMessage(MessageId),
    /// Extract the text hidden in a received audio message.
    ExtractMessage(MessageId),
}

/// A file picked by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name as picked.
    pub file_name: String,
    /// Reported MIME type.
    pub mime: String,
    /// Contents.
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Whether the file is a WAV carrier, by MIME type or extension.
    pub fn is_wav(&self) -> bool {
        let mime = self.mime.to_ascii_lowercase();
        mime == "audio/wav"
            || mime == "audio/x-wav"
            || self.file_name.to_ascii_lowercase().ends_with(".wav")
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Successful reply payload, one variant per payload type.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply {
    /// Cipher attack candidates.
    CipherAttack(CipherAttackReport),
    /// Encryption result.
    Encrypted(Encrypted),
    /// Decryption result.
    Decrypted(Decrypted),
    /// User existence check.
    UserCheck(UserCheck),
    /// Password attack outcome.
    Attack(AttackOutcome),
    /// Bare acknowledgement.
    Ack(Ack),
    /// User listing.
    Users(UserList),
    /// Conversation messages.
    Conversation(Conversation),
    /// Audio message accepted.
    StegoReceipt(StegoReceipt),
    /// Hidden text recovered.
    StegoExtraction(StegoExtraction),
}

impl ApiReply {
    /// Short name for logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CipherAttack(_) => "cipher attack",
            Self::Encrypted(_) => "encrypted",
            Self::Decrypted(_) => "decrypted",
            Self::UserCheck(_) => "user check",
            Self::Attack(_) => "attack",
            Self::Ack(_) => "ack",
            Self::Users(_) => "users",
            Self::Conversation(_) => "conversation",
            Self::StegoReceipt(_) => "stego receipt",
            Self::StegoExtraction(_) => "stego extraction",
        }
    }
}

/// Payload types that can be taken out of an [`ApiReply`].
pub trait FromReply: Sized {
    /// The payload, if `reply` carries this type.
    fn from_reply(reply: ApiReply) -> Option<Self>;
}

macro_rules! from_reply {
    ($($variant:ident => $payload:ty),* $(,)?) => {
        $(
            impl FromReply for $payload {
                fn from_reply(reply: ApiReply) -> Option<Self> {
                    match reply {
                        ApiReply::$variant(payload) => Some(payload),
                        _ => None,
                    }
                }
            }
        )*
    };
}

from_reply! {
    CipherAttack => CipherAttackReport,
    Encrypted => Encrypted,
    Decrypted => Decrypted,
    UserCheck => UserCheck,
    Attack => AttackOutcome,
    Ack => Ack,
    Users => UserList,
    Conversation => Conversation,
    StegoReceipt => StegoReceipt,
    StegoExtraction => StegoExtraction,
}

/// Narrow a call outcome to the payload the caller expects.
///
/// A reply of the wrong kind is reported as a decode failure.
pub fn payload<T: FromReply>(outcome: Result<ApiReply, ApiError>) -> Result<T, ApiError> {
    let reply = outcome?;
    let kind = reply.kind();
    T::from_reply(reply)
        .ok_or_else(|| ApiError::Decode(ProtoError::Malformed(format!("unexpected {kind} reply"))))
}
