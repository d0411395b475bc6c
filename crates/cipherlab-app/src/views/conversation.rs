//! Conversation with one peer.
//!
//! Lists the messages exchanged with the peer, sends new ones (cipher text
//! or audio steganography) and reveals decrypted or extracted text for a
//! bounded window.
//!
//! # Invariants
//!
//! - At most one load and one send in flight; at most one decrypt or
//!   extraction in flight per message. A load issued after a send lands
//!   supersedes any earlier one, whose list may predate the new message.
//! - A reveal only exists for a message that is currently listed. Reloading
//!   drops reveals whose message disappeared.
//! - A message is "received" when the peer sent it. Only received messages
//!   can be decrypted or extracted.

use std::{collections::BTreeMap, time::Duration};

use cipherlab_client::ApiError;
use cipherlab_proto::{
    Ack, Algorithm, Conversation, ConversationMessage, Decrypted, KeyParams, MessageId,
    StegoExtraction, StegoReceipt, UserId,
    requests::{DecryptRequest, SendMessageRequest, StegoUpload},
};

use crate::{
    ApiCall, AppAction, AppConfig, Ticket, Tickets, ViewError,
    event::{ApiReply, Attachment, payload},
    notice::Banner,
    reveal::RevealBoard,
    time::Moment,
};

const LOAD_RETRY: &str = "Could not load messages. Please try again.";
const SEND_RETRY: &str = "Failed to send message. Please try again.";
const DECRYPT_RETRY: &str = "Decryption failed. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Decrypt(MessageId),
    Extract(MessageId),
}

impl Op {
    fn message(self) -> MessageId {
        match self {
            Self::Decrypt(id) | Self::Extract(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SendKind {
    Crypto,
    Stego,
}

/// Conversation page state.
#[derive(Debug, Clone)]
pub struct ConversationView<I> {
    peer: UserId,
    peer_name: Option<String>,
    messages: Vec<ConversationMessage>,
    loaded: bool,
    loading: Option<Ticket>,
    sending: Option<(Ticket, SendKind)>,
    ops: BTreeMap<Ticket, Op>,
    reveals: RevealBoard<I>,
    receipt: Option<StegoReceipt>,
    next_poll: Option<I>,
    banner: Banner<I>,
    text_ttl: Duration,
    audio_ttl: Duration,
    poll_interval: Option<Duration>,
}

impl<I: Moment> ConversationView<I> {
    /// Unloaded view of the conversation with `peer`.
    pub fn new(peer: UserId, config: &AppConfig) -> Self {
        Self {
            peer,
            peer_name: None,
            messages: Vec::new(),
            loaded: false,
            loading: None,
            sending: None,
            ops: BTreeMap::new(),
            reveals: RevealBoard::new(),
            receipt: None,
            next_poll: None,
            banner: Banner::new(config.error_clear),
            text_ttl: config.conversation_reveal,
            audio_ttl: config.stego_reveal,
            poll_interval: config.poll_interval,
        }
    }

    /// Load the messages and start polling.
    pub fn mount(&mut self, now: I, tickets: &mut Tickets) -> Vec<AppAction> {
        self.next_poll = self.poll_interval.map(|every| now + every);
        self.reload(tickets)
    }

    /// Reload unless a load is already in flight.
    pub fn reload(&mut self, tickets: &mut Tickets) -> Vec<AppAction> {
        if self.loading.is_some() {
            tracing::debug!(peer = self.peer, "conversation load in flight, reload skipped");
            return vec![];
        }
        self.load(tickets)
    }

    /// Issue a load, superseding any load in flight.
    fn load(&mut self, tickets: &mut Tickets) -> Vec<AppAction> {
        if let Some(stale) = self.loading {
            tracing::debug!(peer = self.peer, %stale, "conversation load superseded");
        }
        let ticket = tickets.issue();
        self.loading = Some(ticket);
        vec![AppAction::call(ticket, ApiCall::Conversation { peer: self.peer }), AppAction::Render]
    }

    /// Send an encrypted text message.
    pub fn send_crypto(
        &mut self,
        message: &str,
        algorithm: Algorithm,
        key_params: KeyParams,
        now: I,
        tickets: &mut Tickets,
    ) -> Vec<AppAction> {
        if self.send_busy() {
            return vec![];
        }
        let message = message.trim();
        if message.is_empty() {
            return self.invalid("Please enter a message", now);
        }

        let request = SendMessageRequest {
            message: message.to_string(),
            algo_name: algorithm,
            receiver_id: self.peer,
            key_params,
        };
        self.issue_send(SendKind::Crypto, ApiCall::SendMessage(request), tickets)
    }

    /// Hide `secret` in `attachment` and send it.
    pub fn send_stego(
        &mut self,
        secret: &str,
        attachment: Option<Attachment>,
        now: I,
        tickets: &mut Tickets,
    ) -> Vec<AppAction> {
        if self.send_busy() {
            return vec![];
        }
        let secret = secret.trim();
        if secret.is_empty() {
            return self.invalid("Please enter a secret message", now);
        }
        let Some(attachment) = attachment else {
            return self.invalid("Please select a .wav file", now);
        };
        if !attachment.is_wav() {
            return self.invalid("The file must be in .wav format", now);
        }

        let upload = StegoUpload {
            file_name: attachment.file_name,
            mime: attachment.mime,
            audio: attachment.bytes,
            secret_message: secret.to_string(),
            receiver_id: self.peer,
        };
        self.issue_send(SendKind::Stego, ApiCall::StegoSend(upload), tickets)
    }

    /// Decrypt received text message `id` with its stored key.
    pub fn decrypt(&mut self, id: MessageId, now: I, tickets: &mut Tickets) -> Vec<AppAction> {
        if self.op_in_flight(id) {
            return vec![];
        }
        let request = match self.received(id) {
            Some(ConversationMessage::Crypto(m)) => DecryptRequest {
                encrypted_message: m.encrypted.clone(),
                algorithm: m.algo_name,
                key_params: KeyParams::from_stored(m.algorithm_key.as_deref()),
            },
            Some(ConversationMessage::Stego(_)) => {
                return self.invalid(&format!("Message {id} is an audio message"), now);
            },
            None => return self.missing(id, now),
        };
        self.issue_op(Op::Decrypt(id), ApiCall::Decrypt(request), tickets)
    }

    /// Extract the text hidden in received audio message `id`.
    pub fn extract(&mut self, id: MessageId, now: I, tickets: &mut Tickets) -> Vec<AppAction> {
        if self.op_in_flight(id) {
            return vec![];
        }
        match self.received(id) {
            Some(ConversationMessage::Stego(_)) => {},
            Some(ConversationMessage::Crypto(_)) => {
                return self.invalid(&format!("Message {id} is not an audio message"), now);
            },
            None => return self.missing(id, now),
        }
        self.issue_op(Op::Extract(id), ApiCall::StegoExtract { message: id }, tickets)
    }

    /// Apply a reply.
    pub fn on_reply(
        &mut self,
        ticket: Ticket,
        outcome: Result<ApiReply, ApiError>,
        now: I,
        tickets: &mut Tickets,
    ) -> Vec<AppAction> {
        if self.loading == Some(ticket) {
            self.loading = None;
            return self.on_loaded(payload(outcome), now);
        }
        if let Some((expected, kind)) = self.sending
            && expected == ticket
        {
            self.sending = None;
            return self.on_sent(kind, outcome, now, tickets);
        }
        if let Some(op) = self.ops.remove(&ticket) {
            return self.on_op(op, outcome, now);
        }

        tracing::debug!(%ticket, "stale conversation reply discarded");
        vec![]
    }

    /// Hide expired reveals and banners, and poll when due.
    pub fn on_tick(&mut self, now: I, tickets: &mut Tickets) -> Vec<AppAction> {
        let mut actions = Vec::new();
        let hidden = self.reveals.expire(now);
        if !hidden.is_empty() {
            tracing::debug!(?hidden, "reveals expired");
            actions.push(AppAction::Render);
        }
        if self.banner.expire(now) {
            actions.push(AppAction::Render);
        }

        if let (Some(at), Some(every)) = (self.next_poll, self.poll_interval)
            && at <= now
        {
            self.next_poll = Some(now + every);
            actions.extend(self.reload(tickets));
        }
        actions
    }

    /// Hide the banner.
    pub fn dismiss(&mut self) -> Vec<AppAction> {
        self.banner.clear();
        vec![AppAction::Render]
    }

    /// Nothing in flight. Polling and reveal deadlines do not count.
    pub fn is_settled(&self) -> bool {
        self.loading.is_none() && self.sending.is_none() && self.ops.is_empty()
    }

    fn on_loaded(&mut self, loaded: Result<Conversation, ApiError>, now: I) -> Vec<AppAction> {
        match loaded {
            Ok(conversation) => {
                self.messages = conversation.messages;
                self.loaded = true;
                if self.peer_name.is_none() {
                    self.peer_name = self.messages.first().and_then(|m| self.peer_ref(m));
                }
                let ids: Vec<MessageId> = self.messages.iter().map(ConversationMessage::id).collect();
                self.reveals.retain(|id| ids.contains(&id));
                tracing::debug!(peer = self.peer, count = self.messages.len(), "conversation loaded");
            },
            Err(err) => self.banner.error(&ViewError::from_api(&err, LOAD_RETRY), now),
        }
        vec![AppAction::Render]
    }

    fn on_sent(
        &mut self,
        kind: SendKind,
        outcome: Result<ApiReply, ApiError>,
        now: I,
        tickets: &mut Tickets,
    ) -> Vec<AppAction> {
        let sent = match kind {
            SendKind::Crypto => payload::<Ack>(outcome).map(|_| ()),
            SendKind::Stego => payload::<StegoReceipt>(outcome).map(|r| self.receipt = Some(r)),
        };
        match sent {
            Ok(()) => {
                tracing::info!(peer = self.peer, ?kind, "message sent");
                let mut actions = self.load(tickets);
                actions.push(AppAction::Render);
                actions
            },
            Err(err) => {
                self.banner.error(&ViewError::from_api(&err, SEND_RETRY), now);
                vec![AppAction::Render]
            },
        }
    }

    fn on_op(&mut self, op: Op, outcome: Result<ApiReply, ApiError>, now: I) -> Vec<AppAction> {
        let text = match op {
            Op::Decrypt(_) => payload::<Decrypted>(outcome).map(|d| (d.decrypted, self.text_ttl)),
            Op::Extract(_) => payload::<StegoExtraction>(outcome)
                .map(|e| (e.decrypted_message, self.audio_ttl)),
        };
        let id = op.message();

        match text {
            Ok(_) if !self.messages.iter().any(|m| m.id() == id) => {
                tracing::debug!(id, "message gone before its plaintext arrived");
            },
            Ok((text, ttl)) => self.reveals.reveal(id, text, now, ttl),
            Err(err) => self.banner.error(&ViewError::from_api(&err, DECRYPT_RETRY), now),
        }
        vec![AppAction::Render]
    }

    fn received(&self, id: MessageId) -> Option<&ConversationMessage> {
        self.messages.iter().find(|m| m.id() == id && m.sender_id() == self.peer)
    }

    fn peer_ref(&self, message: &ConversationMessage) -> Option<String> {
        let other =
            if message.sender_id() == self.peer { message.sender() } else { message.receiver() };
        other.map(|u| u.username.clone())
    }

    fn op_in_flight(&self, id: MessageId) -> bool {
        let busy = self.ops.values().any(|op| op.message() == id);
        if busy {
            tracing::debug!(id, "message operation in flight, request ignored");
        }
        busy
    }

    fn send_busy(&self) -> bool {
        if self.sending.is_some() {
            tracing::debug!("send in flight, submission ignored");
        }
        self.sending.is_some()
    }

    fn missing(&mut self, id: MessageId, now: I) -> Vec<AppAction> {
        let err = ViewError::NotFound(format!("No received message with id {id}"));
        self.banner.error(&err, now);
        vec![AppAction::Render]
    }

    fn invalid(&mut self, message: &str, now: I) -> Vec<AppAction> {
        self.banner.error(&ViewError::Validation(message.into()), now);
        vec![AppAction::Render]
    }

    fn issue_send(&mut self, kind: SendKind, call: ApiCall, tickets: &mut Tickets) -> Vec<AppAction> {
        self.banner.clear();
        let ticket = tickets.issue();
        self.sending = Some((ticket, kind));
        vec![AppAction::call(ticket, call), AppAction::Render]
    }

    fn issue_op(&mut self, op: Op, call: ApiCall, tickets: &mut Tickets) -> Vec<AppAction> {
        let ticket = tickets.issue();
        self.ops.insert(ticket, op);
        vec![AppAction::call(ticket, call), AppAction::Render]
    }

    /// Peer id.
    pub fn peer(&self) -> UserId {
        self.peer
    }

    /// Peer login, once a message revealed it.
    pub fn peer_name(&self) -> Option<&str> {
        self.peer_name.as_deref()
    }

    /// Messages in server order.
    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// At least one load succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether the peer sent `message`.
    pub fn is_received(&self, message: &ConversationMessage) -> bool {
        message.sender_id() == self.peer
    }

    /// A decrypt or extraction for `id` is in flight.
    pub fn is_busy(&self, id: MessageId) -> bool {
        self.ops.values().any(|op| op.message() == id)
    }

    /// Revealed plaintext for `id`.
    pub fn revealed(&self, id: MessageId) -> Option<&str> {
        self.reveals.text(id)
    }

    /// All active reveals.
    pub fn reveals(&self) -> &RevealBoard<I> {
        &self.reveals
    }

    /// Receipt of the last audio message sent.
    pub fn receipt(&self) -> Option<&StegoReceipt> {
        self.receipt.as_ref()
    }

    /// Banner.
    pub fn banner(&self) -> &Banner<I> {
        &self.banner
    }
}
