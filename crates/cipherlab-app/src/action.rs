//! Application side-effects.
//!
//! [`AppAction`]s are produced by the [`crate::App`] state machine for the
//! runtime to execute. API calls are described by [`ApiCall`] and carried
//! out by the [`crate::Bridge`].

use cipherlab_proto::{
    MessageId, UserId,
    requests::{
        CheckUserRequest, CipherAttackRequest, Credentials, DecryptRequest, EncryptRequest,
        SendMessageRequest, StartAttackRequest, StegoUpload,
    },
};

use crate::{Page, Ticket};

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the current page.
    Render,

    /// Quit the application.
    Quit,

    /// Leave the current page for another.
    Navigate(Page),

    /// Issue an API call; its reply comes back tagged with `ticket`.
    Call {
        /// Correlation id the issuing view waits for.
        ticket: Ticket,
        /// What to call.
        call: ApiCall,
    },
}

impl AppAction {
    /// Shorthand for [`AppAction::Call`].
    pub fn call(ticket: Ticket, call: ApiCall) -> Self {
        Self::Call { ticket, call }
    }
}

/// One API request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// Attack a ciphertext.
    CipherAttack(CipherAttackRequest),
    /// Encrypt a plaintext.
    Encrypt(EncryptRequest),
    /// Decrypt a ciphertext.
    Decrypt(DecryptRequest),
    /// Ask whether a user exists.
    CheckUser(CheckUserRequest),
    /// Run a password attack.
    StartAttack(StartAttackRequest),
    /// Register.
    SignUp(Credentials),
    /// Open a session.
    SignIn(Credentials),
    /// List users.
    Users {
        /// User to leave out.
        except: Option<UserId>,
    },
    /// Load the messages exchanged with `peer`.
    Conversation {
        /// Other participant.
        peer: UserId,
    },
    /// Send an encrypted text message.
    SendMessage(SendMessageRequest),
    /// Send a text hidden in a WAV carrier.
    StegoSend(StegoUpload),
    /// Recover the text hidden in an audio message.
    StegoExtract {
        /// Audio message.
        message: MessageId,
    },
}

impl ApiCall {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CipherAttack(_) => "cipher_attack",
            Self::Encrypt(_) => "encrypt",
            Self::Decrypt(_) => "decrypt",
            Self::CheckUser(_) => "check_user",
            Self::StartAttack(_) => "start_attack",
            Self::SignUp(_) => "sign_up",
            Self::SignIn(_) => "sign_in",
            Self::Users { .. } => "users",
            Self::Conversation { .. } => "conversation",
            Self::SendMessage(_) => "send_message",
            Self::StegoSend(_) => "stego_send",
            Self::StegoExtract { .. } => "stego_extract",
        }
    }
}
