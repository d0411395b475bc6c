//! Per-page state machines.
//!
//! Every page owns its state, its in-flight tickets and its deadlines.
//! Navigating away drops the [`View`] and everything in it; replies that
//! arrive afterwards find no one waiting and are discarded.

mod attack;
mod auth;
mod conversation;
mod crack;
mod directory;
mod workbench;

use cipherlab_client::ApiError;

pub use attack::{AttackSession, LogEntry, LogKind, Progress, SessionStatus};
pub use auth::{AuthForm, AuthMode, valid_password_format};
pub use conversation::ConversationView;
pub use crack::{CrackBoard, CrackPanel, CrackResults, Panel};
pub use directory::Directory;
pub use workbench::Workbench;

use crate::{
    AppAction, AppConfig, Intent, Page, Ticket, Tickets, event::ApiReply, notice::Banner,
    time::Moment,
};

/// State of the current page.
#[derive(Debug, Clone)]
pub enum View<I> {
    /// Landing page; stateless.
    Home,
    /// Auth form.
    Auth(AuthForm<I>),
    /// Password attack.
    Attack(AttackSession<I>),
    /// Cipher-attack panels.
    Crack(CrackBoard<I>),
    /// Cipher workbench.
    Workbench(Workbench<I>),
    /// User listing.
    Directory(Directory<I>),
    /// Conversation.
    Conversation(ConversationView<I>),
}

impl<I: Moment> View<I> {
    /// Build the view for `page` and issue its initial loads.
    pub(crate) fn mount(
        page: Page,
        config: &AppConfig,
        now: I,
        tickets: &mut Tickets,
    ) -> (Self, Vec<AppAction>) {
        match page {
            Page::Home => (Self::Home, vec![]),
            Page::Auth => (Self::Auth(AuthForm::new(config)), vec![]),
            Page::Attack => (Self::Attack(AttackSession::new(config)), vec![]),
            Page::Crack => (Self::Crack(CrackBoard::new(config)), vec![]),
            Page::Workbench => (Self::Workbench(Workbench::new(config)), vec![]),
            Page::Directory { except } => {
                let mut directory = Directory::new(except, config);
                let actions = directory.reload(tickets);
                (Self::Directory(directory), actions)
            },
            Page::Conversation { peer } => {
                let mut conversation = ConversationView::new(peer, config);
                let actions = conversation.mount(now, tickets);
                (Self::Conversation(conversation), actions)
            },
        }
    }

    /// Route a page-level intent.
    pub(crate) fn intent(&mut self, intent: Intent, now: I, tickets: &mut Tickets) -> Vec<AppAction> {
        match (self, intent) {
            (Self::Attack(s), Intent::SelectMethod(method)) => s.select_method(method),
            (Self::Attack(s), Intent::StartAttack { username }) => s.start(&username, now, tickets),

            (Self::Crack(b), Intent::SelectPanel(panel)) => b.select(panel),
            (Self::Crack(b), Intent::Crack { panel, kind, ciphertext }) => {
                b.submit(panel, kind, &ciphertext, now, tickets)
            },

            (Self::Auth(f), Intent::SignUp(credentials)) => {
                f.submit(AuthMode::SignUp, credentials, now, tickets)
            },
            (Self::Auth(f), Intent::SignIn(credentials)) => {
                f.submit(AuthMode::SignIn, credentials, now, tickets)
            },

            (Self::Workbench(w), Intent::Encrypt { message, algorithm, key_params }) => {
                w.encrypt(&message, algorithm, key_params, now, tickets)
            },
            (Self::Workbench(w), Intent::Decrypt { ciphertext, algorithm, key_params }) => {
                w.decrypt(&ciphertext, algorithm, key_params, now, tickets)
            },

            (Self::Directory(d), Intent::Reload) => d.reload(tickets),

            (Self::Conversation(c), Intent::Reload) => c.reload(tickets),
            (Self::Conversation(c), Intent::SendCrypto { message, algorithm, key_params }) => {
                c.send_crypto(&message, algorithm, key_params, now, tickets)
            },
            (Self::Conversation(c), Intent::SendStego { secret, attachment }) => {
                c.send_stego(&secret, attachment, now, tickets)
            },
            (Self::Conversation(c), Intent::DecryptMessage(id)) => c.decrypt(id, now, tickets),
            (Self::Conversation(c), Intent::ExtractMessage(id)) => c.extract(id, now, tickets),

            (view, intent) => {
                tracing::debug!(view = view.name(), ?intent, "intent ignored on this page");
                vec![]
            },
        }
    }

    /// Route a reply to the view.
    pub(crate) fn reply(
        &mut self,
        ticket: Ticket,
        outcome: Result<ApiReply, ApiError>,
        now: I,
        tickets: &mut Tickets,
    ) -> Vec<AppAction> {
        match self {
            Self::Home => {
                tracing::debug!(%ticket, "reply discarded on home page");
                vec![]
            },
            Self::Auth(f) => f.on_reply(ticket, outcome, now),
            Self::Attack(s) => s.on_reply(ticket, outcome, now, tickets),
            Self::Crack(b) => b.on_reply(ticket, outcome, now),
            Self::Workbench(w) => w.on_reply(ticket, outcome, now),
            Self::Directory(d) => d.on_reply(ticket, outcome, now),
            Self::Conversation(c) => c.on_reply(ticket, outcome, now, tickets),
        }
    }

    /// Advance deadlines.
    pub(crate) fn tick(&mut self, now: I, tickets: &mut Tickets) -> Vec<AppAction> {
        match self {
            Self::Home => vec![],
            Self::Auth(f) => f.on_tick(now),
            Self::Attack(s) => s.on_tick(now, tickets),
            Self::Crack(b) => b.on_tick(now),
            Self::Workbench(w) => w.on_tick(now),
            Self::Directory(d) => d.on_tick(now),
            Self::Conversation(c) => c.on_tick(now, tickets),
        }
    }

    /// Hide the page banner.
    pub(crate) fn dismiss(&mut self) -> Vec<AppAction> {
        match self {
            Self::Home => vec![],
            Self::Auth(f) => f.dismiss(),
            Self::Attack(s) => s.dismiss(),
            Self::Crack(b) => b.dismiss(),
            Self::Workbench(w) => w.dismiss(),
            Self::Directory(d) => d.dismiss(),
            Self::Conversation(c) => c.dismiss(),
        }
    }

    /// Nothing in flight and no pending scripted step (auto-login,
    /// redirect).
    pub fn is_settled(&self) -> bool {
        match self {
            Self::Home => true,
            Self::Auth(f) => f.is_settled(),
            Self::Attack(s) => s.is_settled(),
            Self::Crack(b) => b.is_settled(),
            Self::Workbench(w) => w.is_settled(),
            Self::Directory(d) => d.is_settled(),
            Self::Conversation(c) => c.is_settled(),
        }
    }

    /// Stable short name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Auth(_) => "auth",
            Self::Attack(_) => "attack",
            Self::Crack(_) => "crack",
            Self::Workbench(_) => "workbench",
            Self::Directory(_) => "directory",
            Self::Conversation(_) => "conversation",
        }
    }

    /// Banner of the page; for the crack page, of the active panel.
    pub fn banner(&self) -> Option<&Banner<I>> {
        match self {
            Self::Home => None,
            Self::Auth(f) => Some(f.banner()),
            Self::Attack(s) => Some(s.banner()),
            Self::Crack(b) => Some(b.panel(b.active()).banner()),
            Self::Workbench(w) => Some(w.banner()),
            Self::Directory(d) => Some(d.banner()),
            Self::Conversation(c) => Some(c.banner()),
        }
    }
}
