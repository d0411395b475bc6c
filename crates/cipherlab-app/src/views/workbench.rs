//! Cipher workbench.
//!
//! Encrypt or decrypt free text with a chosen cipher and key. Decrypted
//! output is revealed for a bounded window like conversation messages.

use std::time::Duration;

use cipherlab_client::ApiError;
use cipherlab_proto::{
    Algorithm, Decrypted, Encrypted, KeyParams, MessageId,
    requests::{DecryptRequest, EncryptRequest},
};

use crate::{
    ApiCall, AppAction, AppConfig, Ticket, Tickets, ViewError,
    event::{ApiReply, payload},
    notice::Banner,
    reveal::RevealBoard,
    time::Moment,
};

const RETRY: &str = "Connection error. Please try again.";

/// Reveal slot used for the workbench output.
const OUTPUT: MessageId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Encrypt,
    Decrypt,
}

/// Workbench state.
#[derive(Debug, Clone)]
pub struct Workbench<I> {
    pending: Option<(Ticket, Op)>,
    encrypted: Option<String>,
    ciphertext: String,
    reveal: RevealBoard<I>,
    reveal_ttl: Duration,
    banner: Banner<I>,
}

impl<I: Moment> Workbench<I> {
    /// Empty workbench.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            pending: None,
            encrypted: None,
            ciphertext: String::new(),
            reveal: RevealBoard::new(),
            reveal_ttl: config.workbench_reveal,
            banner: Banner::new(config.error_clear),
        }
    }

    /// Encrypt `message`.
    pub fn encrypt(
        &mut self,
        message: &str,
        algorithm: Algorithm,
        key_params: KeyParams,
        now: I,
        tickets: &mut Tickets,
    ) -> Vec<AppAction> {
        if self.busy() {
            return vec![];
        }
        if message.trim().is_empty() {
            return self.invalid("Please enter a message to encrypt", now);
        }

        let request = EncryptRequest { message: message.to_string(), algorithm, key_params };
        self.issue(Op::Encrypt, ApiCall::Encrypt(request), tickets)
    }

    /// Decrypt `ciphertext`.
    pub fn decrypt(
        &mut self,
        ciphertext: &str,
        algorithm: Algorithm,
        key_params: KeyParams,
        now: I,
        tickets: &mut Tickets,
    ) -> Vec<AppAction> {
        if self.busy() {
            return vec![];
        }
        if ciphertext.trim().is_empty() {
            return self.invalid("Please enter a message to decrypt", now);
        }

        self.ciphertext = ciphertext.to_string();
        self.reveal.clear();
        let request =
            DecryptRequest { encrypted_message: ciphertext.to_string(), algorithm, key_params };
        self.issue(Op::Decrypt, ApiCall::Decrypt(request), tickets)
    }

    /// Apply a reply.
    pub fn on_reply(
        &mut self,
        ticket: Ticket,
        outcome: Result<ApiReply, ApiError>,
        now: I,
    ) -> Vec<AppAction> {
        let op = match self.pending {
            Some((expected, op)) if expected == ticket => op,
            _ => {
                tracing::debug!(%ticket, "stale workbench reply discarded");
                return vec![];
            },
        };
        self.pending = None;

        let applied = match op {
            Op::Encrypt => payload::<Encrypted>(outcome).map(|e| self.encrypted = Some(e.encrypted)),
            Op::Decrypt => payload::<Decrypted>(outcome)
                .map(|d| self.reveal.reveal(OUTPUT, d.decrypted, now, self.reveal_ttl)),
        };
        if let Err(err) = applied {
            self.banner.error(&ViewError::from_api(&err, RETRY), now);
        }
        vec![AppAction::Render]
    }

    /// Hide expired plaintext and banners.
    pub fn on_tick(&mut self, now: I) -> Vec<AppAction> {
        let hidden = !self.reveal.expire(now).is_empty();
        let cleared = self.banner.expire(now);
        if hidden || cleared { vec![AppAction::Render] } else { vec![] }
    }

    /// Hide the banner.
    pub fn dismiss(&mut self) -> Vec<AppAction> {
        self.banner.clear();
        vec![AppAction::Render]
    }

    /// No request in flight.
    pub fn is_settled(&self) -> bool {
        self.pending.is_none()
    }

    /// Last ciphertext produced by an encryption.
    pub fn encrypted(&self) -> Option<&str> {
        self.encrypted.as_deref()
    }

    /// Ciphertext last submitted for decryption.
    pub fn ciphertext(&self) -> &str {
        &self.ciphertext
    }

    /// Plaintext while its window is open.
    pub fn decrypted(&self) -> Option<&str> {
        self.reveal.text(OUTPUT)
    }

    /// Banner.
    pub fn banner(&self) -> &Banner<I> {
        &self.banner
    }

    fn busy(&self) -> bool {
        if self.pending.is_some() {
            tracing::debug!("workbench request in flight, submission ignored");
        }
        self.pending.is_some()
    }

    fn invalid(&mut self, message: &str, now: I) -> Vec<AppAction> {
        self.banner.error(&ViewError::Validation(message.into()), now);
        vec![AppAction::Render]
    }

    fn issue(&mut self, op: Op, call: ApiCall, tickets: &mut Tickets) -> Vec<AppAction> {
        self.banner.clear();
        let ticket = tickets.issue();
        self.pending = Some((ticket, op));
        vec![AppAction::call(ticket, call), AppAction::Render]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn ticket(actions: &[AppAction]) -> Ticket {
        match actions.first() {
            Some(AppAction::Call { ticket, .. }) => *ticket,
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn decrypt_reveals_for_five_minutes() {
        let mut bench = Workbench::new(&AppConfig::default());
        let mut tickets = Tickets::new();

        let t = ticket(&bench.decrypt(
            "KHOOR",
            Algorithm::Caesar,
            KeyParams::default_for(Algorithm::Caesar),
            ms(0),
            &mut tickets,
        ));
        bench.on_reply(t, Ok(ApiReply::Decrypted(Decrypted { decrypted: "HELLO".into() })), ms(100));

        assert_eq!(bench.decrypted(), Some("HELLO"));
        assert!(bench.on_tick(ms(300_099)).is_empty());
        assert_eq!(bench.on_tick(ms(300_100)), vec![AppAction::Render]);
        assert_eq!(bench.decrypted(), None);
        assert_eq!(bench.ciphertext(), "KHOOR");
    }

    #[test]
    fn encrypt_shows_ciphertext() {
        let mut bench = Workbench::<Duration>::new(&AppConfig::default());
        let mut tickets = Tickets::new();

        let t = ticket(&bench.encrypt("HELLO", Algorithm::Hill, KeyParams::Empty {}, ms(0), &mut tickets));
        // Second submission while the first is in flight is dropped.
        assert!(bench.encrypt("AGAIN", Algorithm::Hill, KeyParams::Empty {}, ms(1), &mut tickets).is_empty());

        bench.on_reply(t, Ok(ApiReply::Encrypted(Encrypted { encrypted: "APADJ".into() })), ms(5));
        assert_eq!(bench.encrypted(), Some("APADJ"));
        assert!(bench.is_settled());
    }

    #[test]
    fn empty_input_is_validation_error() {
        let mut bench = Workbench::<Duration>::new(&AppConfig::default());
        let actions = bench.decrypt("  ", Algorithm::Playfair, KeyParams::Empty {}, ms(0), &mut Tickets::new());

        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(bench.banner().error_text(), Some("Please enter a message to decrypt"));
    }
}
