//! Password attack session.
//!
//! Drives one run against a registered user: existence check, the attack
//! call itself, then an automatic sign-in with the recovered password and a
//! redirect to the home page.
//!
//! ```text
//! Idle ──start──► Checking ──exists──► Running ──outcome──► Done{found}
//!                    │                    │
//!                    └──missing/failed────┴──failed───────► Error
//! ```
//!
//! # Invariants
//!
//! - At most one run in flight. `start` while `Checking` or `Running` is a
//!   no-op: no call, no log change.
//! - Only the reply to the call the session is waiting for is applied.
//! - A new run cancels a pending auto-login and redirect.

use std::time::Duration;

use cipherlab_client::ApiError;
use cipherlab_proto::{
    Ack, AttackMethod, AttackOutcome, UserCheck,
    requests::{CheckUserRequest, Credentials, StartAttackRequest},
};

use crate::{
    ApiCall, AppAction, AppConfig, Page, Ticket, Tickets, ViewError,
    event::{ApiReply, payload},
    notice::Banner,
    time::{Moment, Timers},
};

const RETRY: &str = "Could not reach the server. Please try again.";

/// Lifecycle of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No run yet.
    Idle,
    /// Asking whether the target exists.
    Checking,
    /// Attack call in flight.
    Running,
    /// Attack finished.
    Done {
        /// A password was recovered.
        found: bool,
    },
    /// The run failed before an outcome.
    Error,
}

impl SessionStatus {
    /// A run is in flight; controls are disabled.
    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::Checking | Self::Running)
    }
}

/// Attack log line class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    /// Step in progress.
    Trying,
    /// Step succeeded.
    Success,
    /// Step failed.
    Error,
}

impl LogKind {
    /// CSS modifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trying => "trying",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// One attack log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Offset from the start of the run.
    pub at: Duration,
    /// Line class.
    pub kind: LogKind,
    /// Text, unescaped.
    pub text: String,
}

/// Progress bar state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// 0..=100.
    pub percent: u8,
    /// Caption.
    pub label: String,
}

impl Progress {
    fn new(percent: u8, label: &str) -> Self {
        Self { percent, label: label.to_string() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Deadline {
    AutoLogin,
    Redirect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    CheckUser,
    Attack,
    AutoLogin,
}

/// Password attack page state.
#[derive(Debug, Clone)]
pub struct AttackSession<I> {
    selected: Option<AttackMethod>,
    method: Option<AttackMethod>,
    username: String,
    status: SessionStatus,
    started_at: Option<I>,
    progress: Option<Progress>,
    log: Vec<LogEntry>,
    outcome: Option<AttackOutcome>,
    recovered: Option<Credentials>,
    pending: Option<(Ticket, Stage)>,
    timers: Timers<Deadline, I>,
    banner: Banner<I>,
    auto_login_delay: Duration,
    redirect_delay: Duration,
}

impl<I: Moment> AttackSession<I> {
    /// Idle session.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            selected: None,
            method: None,
            username: String::new(),
            status: SessionStatus::Idle,
            started_at: None,
            progress: None,
            log: Vec::new(),
            outcome: None,
            recovered: None,
            pending: None,
            timers: Timers::new(),
            banner: Banner::new(config.error_clear),
            auto_login_delay: config.auto_login_delay,
            redirect_delay: config.redirect_delay,
        }
    }

    /// Pick the method for the next run. Ignored while a run is in flight.
    pub fn select_method(&mut self, method: AttackMethod) -> Vec<AppAction> {
        if self.status.is_in_flight() {
            tracing::debug!(%method, "method change ignored during run");
            return vec![];
        }
        self.selected = Some(method);
        vec![AppAction::Render]
    }

    /// Start a run against `username` with the selected method.
    pub fn start(&mut self, username: &str, now: I, tickets: &mut Tickets) -> Vec<AppAction> {
        if self.status.is_in_flight() || self.pending.is_some() {
            tracing::debug!("attack already running, start ignored");
            return vec![];
        }

        let username = username.trim();
        if username.is_empty() {
            return self.reject(ViewError::Validation("Please enter a username".into()), now);
        }
        let Some(method) = self.selected else {
            return self.reject(ViewError::Validation("Please select an attack method".into()), now);
        };

        self.timers.clear();
        self.banner.clear();
        self.log.clear();
        self.outcome = None;
        self.recovered = None;
        self.username = username.to_string();
        self.method = Some(method);
        self.status = SessionStatus::Checking;
        self.started_at = Some(now);
        self.progress = Some(Progress::new(0, "Checking target user..."));
        self.push(now, LogKind::Trying, format!("Checking whether user '{username}' exists..."));
        tracing::info!(%username, %method, "attack session started");

        let ticket = tickets.issue();
        self.pending = Some((ticket, Stage::CheckUser));
        let request = CheckUserRequest { username: username.to_string() };
        vec![AppAction::call(ticket, ApiCall::CheckUser(request)), AppAction::Render]
    }

    /// Apply the outcome of a call.
    pub fn on_reply(
        &mut self,
        ticket: Ticket,
        outcome: Result<ApiReply, ApiError>,
        now: I,
        tickets: &mut Tickets,
    ) -> Vec<AppAction> {
        let stage = match self.pending {
            Some((expected, stage)) if expected == ticket => stage,
            _ => {
                tracing::debug!(%ticket, "stale attack reply discarded");
                return vec![];
            },
        };
        self.pending = None;

        match stage {
            Stage::CheckUser => self.on_check(payload(outcome), now, tickets),
            Stage::Attack => self.on_outcome(payload(outcome), now),
            Stage::AutoLogin => self.on_auto_login(payload(outcome), now),
        }
    }

    /// Fire due deadlines and clear an expired banner.
    pub fn on_tick(&mut self, now: I, tickets: &mut Tickets) -> Vec<AppAction> {
        let mut actions = Vec::new();
        if self.banner.expire(now) {
            actions.push(AppAction::Render);
        }

        for deadline in self.timers.expire(now) {
            match deadline {
                Deadline::AutoLogin => {
                    let Some(credentials) = self.recovered.clone() else { continue };
                    self.push(now, LogKind::Success, "Attempting automatic sign-in...".into());
                    let ticket = tickets.issue();
                    self.pending = Some((ticket, Stage::AutoLogin));
                    actions.push(AppAction::call(ticket, ApiCall::SignIn(credentials)));
                    actions.push(AppAction::Render);
                },
                Deadline::Redirect => actions.push(AppAction::Navigate(Page::Home)),
            }
        }
        actions
    }

    /// Hide the banner.
    pub fn dismiss(&mut self) -> Vec<AppAction> {
        self.banner.clear();
        vec![AppAction::Render]
    }

    /// Nothing in flight and no auto-login or redirect pending.
    pub fn is_settled(&self) -> bool {
        self.pending.is_none() && self.timers.is_empty()
    }

    fn on_check(
        &mut self,
        check: Result<UserCheck, ApiError>,
        now: I,
        tickets: &mut Tickets,
    ) -> Vec<AppAction> {
        match check {
            Ok(UserCheck { exists: true }) => {
                let Some(method) = self.method else { return vec![] };
                self.status = SessionStatus::Running;
                self.progress = Some(Progress::new(10, "Preparing attack..."));
                self.push(now, LogKind::Success, "User found, launching attack...".into());
                self.push(now, LogKind::Trying, format!("Mode: {}", method.description()));

                let ticket = tickets.issue();
                self.pending = Some((ticket, Stage::Attack));
                let request = StartAttackRequest { username: self.username.clone(), method };
                vec![AppAction::call(ticket, ApiCall::StartAttack(request)), AppAction::Render]
            },
            Ok(UserCheck { exists: false }) => {
                let message = format!("User '{}' not found", self.username);
                self.push(now, LogKind::Error, "User not found in the database".into());
                self.fail(ViewError::NotFound(message), now)
            },
            Err(err) => {
                self.push(now, LogKind::Error, format!("User check failed: {err}"));
                self.fail(ViewError::from_api(&err, RETRY), now)
            },
        }
    }

    fn on_outcome(&mut self, outcome: Result<AttackOutcome, ApiError>, now: I) -> Vec<AppAction> {
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                self.push(now, LogKind::Error, format!("Attack failed: {err}"));
                return self.fail(ViewError::from_api(&err, RETRY), now);
            },
        };

        let attempts = format!("Attempts: {}", thousands(outcome.attempts));
        let duration = format!("Duration: {:.2}s", outcome.duration);

        if outcome.found {
            let password = outcome.password.clone().unwrap_or_default();
            self.push(now, LogKind::Success, format!("Password found: {password}"));
            self.push(now, LogKind::Success, attempts);
            self.push(now, LogKind::Success, duration);
            self.progress = Some(Progress::new(100, "Attack completed successfully!"));
            self.banner.success(format!("Password found: {password}"));
            self.status = SessionStatus::Done { found: true };
            tracing::info!(username = %self.username, attempts = outcome.attempts, "password recovered");

            self.recovered = Some(Credentials { username: self.username.clone(), password });
            self.timers.schedule(Deadline::AutoLogin, now + self.auto_login_delay);
        } else {
            self.push(now, LogKind::Error, "No password found with this method".into());
            self.push(now, LogKind::Trying, attempts);
            self.push(now, LogKind::Trying, duration);
            self.progress = Some(Progress::new(100, "Attack finished - no password found"));
            self.banner.info("No password found. Try another method.");
            self.status = SessionStatus::Done { found: false };
            tracing::info!(username = %self.username, attempts = outcome.attempts, "search exhausted");
        }

        self.outcome = Some(outcome);
        vec![AppAction::Render]
    }

    fn on_auto_login(&mut self, ack: Result<Ack, ApiError>, now: I) -> Vec<AppAction> {
        match ack {
            Ok(_) => {
                self.push(now, LogKind::Success, "Signed in, redirecting...".into());
                self.timers.schedule(Deadline::Redirect, now + self.redirect_delay);
            },
            Err(err) => {
                tracing::warn!(error = %err, "automatic sign-in failed");
                self.push(now, LogKind::Error, format!("Automatic sign-in failed: {err}"));
            },
        }
        vec![AppAction::Render]
    }

    fn fail(&mut self, err: ViewError, now: I) -> Vec<AppAction> {
        self.status = SessionStatus::Error;
        self.banner.error(&err, now);
        vec![AppAction::Render]
    }

    fn reject(&mut self, err: ViewError, now: I) -> Vec<AppAction> {
        self.banner.error(&err, now);
        vec![AppAction::Render]
    }

    fn push(&mut self, now: I, kind: LogKind, text: String) {
        let at = self.started_at.map_or(Duration::ZERO, |start| now.since(start));
        self.log.push(LogEntry { at, kind, text });
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Method picked for the next run.
    pub fn selected(&self) -> Option<AttackMethod> {
        self.selected
    }

    /// Target of the current or last run.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Progress bar, once a run has started.
    pub fn progress(&self) -> Option<&Progress> {
        self.progress.as_ref()
    }

    /// Log of the current or last run.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Server outcome of the last completed run.
    pub fn outcome(&self) -> Option<&AttackOutcome> {
        self.outcome.as_ref()
    }

    /// Banner.
    pub fn banner(&self) -> &Banner<I> {
        &self.banner
    }

    /// When the automatic sign-in fires, if scheduled.
    pub fn auto_login_at(&self) -> Option<I> {
        self.timers.deadline(Deadline::AutoLogin)
    }

    /// When the redirect fires, if scheduled.
    pub fn redirect_at(&self) -> Option<I> {
        self.timers.deadline(Deadline::Redirect)
    }
}

/// `12345` → `12,345`.
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
