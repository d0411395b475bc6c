//! Time-boxed plaintext reveals.
//!
//! After a successful decrypt the plaintext is shown in place of the
//! ciphertext until its deadline, then the view falls back to the
//! ciphertext it already holds.
//!
//! # Invariants
//!
//! - At most one reveal per message id. A new reveal replaces the text and
//!   the deadline of the previous one.
//! - A reveal is removed exactly once: by [`RevealBoard::expire`] at or after
//!   its deadline, or earlier by [`RevealBoard::retain`]/[`RevealBoard::clear`]
//!   when its message goes away.

use std::{collections::BTreeMap, time::Duration};

use cipherlab_proto::MessageId;

use crate::time::Moment;

/// Plaintext currently shown for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Reveal<I> {
    text: String,
    until: I,
}

/// Reveals keyed by message id.
#[derive(Debug, Clone)]
pub struct RevealBoard<I> {
    shown: BTreeMap<MessageId, Reveal<I>>,
}

impl<I: Moment> RevealBoard<I> {
    /// Nothing revealed.
    pub fn new() -> Self {
        Self { shown: BTreeMap::new() }
    }

    /// Show `text` for `id` until `now + ttl`.
    pub fn reveal(&mut self, id: MessageId, text: impl Into<String>, now: I, ttl: Duration) {
        self.shown.insert(id, Reveal { text: text.into(), until: now + ttl });
    }

    /// Revealed text for `id`.
    pub fn text(&self, id: MessageId) -> Option<&str> {
        self.shown.get(&id).map(|r| r.text.as_str())
    }

    /// Hide every reveal whose deadline is `<= now`; returns their ids.
    pub fn expire(&mut self, now: I) -> Vec<MessageId> {
        let due: Vec<MessageId> =
            self.shown.iter().filter(|(_, r)| r.until <= now).map(|(id, _)| *id).collect();
        for id in &due {
            self.shown.remove(id);
        }
        due
    }

    /// Drop reveals for messages that are no longer displayed.
    pub fn retain(&mut self, mut present: impl FnMut(MessageId) -> bool) {
        self.shown.retain(|id, _| present(*id));
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.shown.clear();
    }

    /// No active reveal.
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }
}

impl<I: Moment> Default for RevealBoard<I> {
    fn default() -> Self {
        Self::new()
    }
}
