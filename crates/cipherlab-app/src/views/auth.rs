//! Sign-in and sign-up form.

use cipherlab_client::ApiError;
use cipherlab_proto::{Ack, requests::Credentials};

use crate::{
    ApiCall, AppAction, AppConfig, Page, Ticket, Tickets, ViewError,
    event::{ApiReply, payload},
    notice::Banner,
    time::Moment,
};

const RETRY: &str = "Connection error. Please try again.";

/// Which button was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Create an account.
    SignUp,
    /// Open a session.
    SignIn,
}

/// Whether `password` matches one of the formats the server accepts at
/// sign-up: three characters from `2`, `3`, `4`; five digits; or six
/// characters from `[A-Za-z0-9+*]`.
pub fn valid_password_format(password: &str) -> bool {
    let all = |f: fn(char) -> bool| password.chars().all(f);
    match password.chars().count() {
        3 => all(|c| matches!(c, '2'..='4')),
        5 => all(|c| c.is_ascii_digit()),
        6 => all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '*'),
        _ => false,
    }
}

/// Auth page state.
#[derive(Debug, Clone)]
pub struct AuthForm<I> {
    pending: Option<(Ticket, AuthMode)>,
    username: String,
    banner: Banner<I>,
}

impl<I: Moment> AuthForm<I> {
    /// Empty form.
    pub fn new(config: &AppConfig) -> Self {
        Self { pending: None, username: String::new(), banner: Banner::new(config.error_clear) }
    }

    /// Submit `credentials` for `mode`.
    pub fn submit(
        &mut self,
        mode: AuthMode,
        credentials: Credentials,
        now: I,
        tickets: &mut Tickets,
    ) -> Vec<AppAction> {
        if self.pending.is_some() {
            tracing::debug!(?mode, "auth request in flight, submission ignored");
            return vec![];
        }

        let username = credentials.username.trim().to_string();
        let password = credentials.password.trim().to_string();
        if username.is_empty() || password.is_empty() {
            let err = ViewError::Validation("Please enter both username and password".into());
            self.banner.error(&err, now);
            return vec![AppAction::Render];
        }
        if mode == AuthMode::SignUp && !valid_password_format(&password) {
            let err = ViewError::Validation(
                "Invalid password format. Please follow the password requirements.".into(),
            );
            self.banner.error(&err, now);
            return vec![AppAction::Render];
        }

        self.banner.clear();
        self.username.clone_from(&username);
        let credentials = Credentials { username, password };
        let call = match mode {
            AuthMode::SignUp => ApiCall::SignUp(credentials),
            AuthMode::SignIn => ApiCall::SignIn(credentials),
        };

        let ticket = tickets.issue();
        self.pending = Some((ticket, mode));
        vec![AppAction::call(ticket, call), AppAction::Render]
    }

    /// Apply the server's answer.
    pub fn on_reply(
        &mut self,
        ticket: Ticket,
        outcome: Result<ApiReply, ApiError>,
        now: I,
    ) -> Vec<AppAction> {
        let mode = match self.pending {
            Some((expected, mode)) if expected == ticket => mode,
            _ => {
                tracing::debug!(%ticket, "stale auth reply discarded");
                return vec![];
            },
        };
        self.pending = None;

        match payload::<Ack>(outcome) {
            Ok(_) => {
                tracing::info!(username = %self.username, ?mode, "authenticated");
                vec![AppAction::Navigate(Page::Home)]
            },
            Err(err) => {
                self.banner.error(&ViewError::from_api(&err, RETRY), now);
                vec![AppAction::Render]
            },
        }
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

    /// No request in flight.
    pub fn is_settled(&self) -> bool {
        self.pending.is_none()
    }

    /// Request in flight, if any.
    pub fn pending_mode(&self) -> Option<AuthMode> {
        self.pending.map(|(_, mode)| mode)
    }

    /// Last submitted login.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Banner.
    pub fn banner(&self) -> &Banner<I> {
        &self.banner
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials { username: username.into(), password: password.into() }
    }

    #[test]
    fn password_formats() {
        for ok in ["234", "442", "12345", "00000", "aB3+*z", "qwerty"] {
            assert!(valid_password_format(ok), "{ok} should pass");
        }
        for bad in ["", "235", "1234", "1234a", "abc-de", "abcdefg", "ab c12"] {
            assert!(!valid_password_format(bad), "{bad} should fail");
        }
    }

    #[test]
    fn sign_up_checks_format_but_sign_in_does_not() {
        let mut form = AuthForm::<Duration>::new(&AppConfig::default());
        let mut tickets = Tickets::new();

        let actions = form.submit(AuthMode::SignUp, creds("alice", "hunter2"), Duration::ZERO, &mut tickets);
        assert_eq!(actions, vec![AppAction::Render]);
        assert!(form.banner().error_text().is_some_and(|t| t.starts_with("Invalid password format")));

        let actions = form.submit(AuthMode::SignIn, creds("alice", "hunter2"), Duration::ZERO, &mut tickets);
        assert!(matches!(actions[0], AppAction::Call { call: ApiCall::SignIn(_), .. }));
    }

    #[test]
    fn success_goes_home_and_rejection_is_verbatim() {
        let mut form = AuthForm::<Duration>::new(&AppConfig::default());
        let mut tickets = Tickets::new();

        let actions = form.submit(AuthMode::SignUp, creds(" bob ", "234"), Duration::ZERO, &mut tickets);
        let AppAction::Call { ticket, call } = &actions[0] else { panic!("expected call") };
        assert_eq!(call, &ApiCall::SignUp(creds("bob", "234")));

        let rejected = Err(ApiError::Rejected { message: "User already exists".into() });
        assert_eq!(form.on_reply(*ticket, rejected, Duration::ZERO), vec![AppAction::Render]);
        assert_eq!(form.banner().error_text(), Some("User already exists"));

        let actions = form.submit(AuthMode::SignIn, creds("bob", "234"), Duration::ZERO, &mut tickets);
        let AppAction::Call { ticket, .. } = &actions[0] else { panic!("expected call") };
        let accepted = Ok(ApiReply::Ack(Ack::default()));
        assert_eq!(form.on_reply(*ticket, accepted, Duration::ZERO), vec![AppAction::Navigate(Page::Home)]);
    }
}
