//! Recipient directory.

use cipherlab_client::ApiError;
use cipherlab_proto::{UserId, UserList, UserSummary};

use crate::{
    ApiCall, AppAction, AppConfig, Ticket, Tickets, ViewError,
    event::{ApiReply, payload},
    notice::Banner,
    time::Moment,
};

const RETRY: &str = "Could not load users. Please try again.";

/// Directory page state.
#[derive(Debug, Clone)]
pub struct Directory<I> {
    except: Option<UserId>,
    users: Vec<UserSummary>,
    loaded: bool,
    pending: Option<Ticket>,
    banner: Banner<I>,
}

impl<I: Moment> Directory<I> {
    /// Unloaded listing, leaving out `except` when set.
    pub fn new(except: Option<UserId>, config: &AppConfig) -> Self {
        Self { except, users: Vec::new(), loaded: false, pending: None, banner: Banner::new(config.error_clear) }
    }

    /// Load unless a load is in flight.
    pub fn reload(&mut self, tickets: &mut Tickets) -> Vec<AppAction> {
        if self.pending.is_some() {
            return vec![];
        }
        let ticket = tickets.issue();
        self.pending = Some(ticket);
        vec![AppAction::call(ticket, ApiCall::Users { except: self.except }), AppAction::Render]
    }

    /// Apply a reply.
    pub fn on_reply(
        &mut self,
        ticket: Ticket,
        outcome: Result<ApiReply, ApiError>,
        now: I,
    ) -> Vec<AppAction> {
        if self.pending != Some(ticket) {
            tracing::debug!(%ticket, "stale directory reply discarded");
            return vec![];
        }
        self.pending = None;

        match payload::<UserList>(outcome) {
            Ok(list) => {
                self.users = list.users;
                self.loaded = true;
            },
            Err(err) => self.banner.error(&ViewError::from_api(&err, RETRY), now),
        }
        vec![AppAction::Render]
    }

    /// Clear an expired banner.
    pub fn on_tick(&mut self, now: I) -> Vec<AppAction> {
        if self.banner.expire(now) { vec![AppAction::Render] } else { vec![] }
    }

    /// Hide the banner.
    pub fn dismiss(&mut self) -> Vec<AppAction> {
        self.banner.clear();
        vec![AppAction::Render]
    }

    /// No load in flight.
    pub fn is_settled(&self) -> bool {
        self.pending.is_none()
    }

    /// Listed users.
    pub fn users(&self) -> &[UserSummary] {
        &self.users
    }

    /// At least one load succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Banner.
    pub fn banner(&self) -> &Banner<I> {
        &self.banner
    }
}
