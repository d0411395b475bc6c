//! Cipher-attack panels.
//!
//! Two independent panels share the page: brute force and dictionary. Each
//! has its own in-flight guard, so one can run while the other is idle.

use std::{fmt, str::FromStr, time::Duration};

use cipherlab_client::ApiError;
use cipherlab_proto::{
    AttackResult, CipherAttackKind, CipherAttackReport, ProtoError, UNKNOWN_ERROR,
    requests::CipherAttackRequest,
};

use crate::{
    ApiCall, AppAction, AppConfig, Ticket, Tickets, ViewError,
    event::{ApiReply, payload},
    notice::Banner,
    time::Moment,
};

const RETRY: &str = "Error during attack. Please try again.";

/// Which panel a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    /// Exhaustive key search.
    BruteForce,
    /// Key search over a word list.
    Dictionary,
}

impl Panel {
    /// Both panels, in tab order.
    pub const ALL: [Self; 2] = [Self::BruteForce, Self::Dictionary];

    /// Stable name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BruteForce => "brute-force",
            Self::Dictionary => "dictionary",
        }
    }

    /// Tab caption.
    pub fn title(self) -> &'static str {
        match self {
            Self::BruteForce => "Brute Force",
            Self::Dictionary => "Dictionary",
        }
    }

    /// Attacks offered by the panel's selector; the first is the default.
    pub fn kinds(self) -> &'static [CipherAttackKind] {
        match self {
            Self::BruteForce => &[CipherAttackKind::Caesar, CipherAttackKind::HillBrute],
            Self::Dictionary => &[CipherAttackKind::PlayfairDict, CipherAttackKind::HillDict],
        }
    }

    /// Panel whose selector offers `kind`.
    pub fn for_kind(kind: CipherAttackKind) -> Self {
        match kind {
            CipherAttackKind::Caesar | CipherAttackKind::HillBrute => Self::BruteForce,
            CipherAttackKind::PlayfairDict | CipherAttackKind::HillDict => Self::Dictionary,
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Panel {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ProtoError::UnknownVariant { kind: "panel", value: s.into() })
    }
}

/// Candidates from a completed attack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrackResults {
    /// Server's attack label.
    pub label: String,
    /// Candidates in server order.
    pub results: Vec<AttackResult>,
}

/// One attack panel.
#[derive(Debug, Clone)]
pub struct CrackPanel<I> {
    kind: CipherAttackKind,
    ciphertext: String,
    pending: Option<Ticket>,
    started_at: Option<I>,
    elapsed: Option<Duration>,
    results: Option<CrackResults>,
    banner: Banner<I>,
}

impl<I: Moment> CrackPanel<I> {
    fn new(panel: Panel, config: &AppConfig) -> Self {
        Self {
            kind: panel.kinds()[0],
            ciphertext: String::new(),
            pending: None,
            started_at: None,
            elapsed: None,
            results: None,
            banner: Banner::new(config.error_clear),
        }
    }

    fn submit(
        &mut self,
        kind: CipherAttackKind,
        ciphertext: &str,
        now: I,
        tickets: &mut Tickets,
    ) -> Vec<AppAction> {
        if self.pending.is_some() {
            tracing::debug!(%kind, "panel busy, submission ignored");
            return vec![];
        }

        let ciphertext = ciphertext.trim();
        if ciphertext.is_empty() {
            let err = ViewError::Validation("Please enter a ciphertext to attack".into());
            self.banner.error(&err, now);
            return vec![AppAction::Render];
        }

        self.kind = kind;
        self.ciphertext = ciphertext.to_string();
        self.banner.clear();
        self.results = None;
        self.elapsed = None;
        self.started_at = Some(now);

        let ticket = tickets.issue();
        self.pending = Some(ticket);
        let request = CipherAttackRequest { cipher_type: kind, ciphertext: self.ciphertext.clone() };
        vec![AppAction::call(ticket, ApiCall::CipherAttack(request)), AppAction::Render]
    }

    fn on_report(&mut self, report: Result<CipherAttackReport, ApiError>, now: I) {
        self.pending = None;
        self.elapsed = self.started_at.map(|start| now.since(start));

        match report {
            Ok(CipherAttackReport { label, results: Some(results) }) => {
                tracing::info!(kind = %self.kind, count = results.len(), "cipher attack finished");
                self.results = Some(CrackResults { label, results });
            },
            Ok(CipherAttackReport { results: None, .. }) => {
                let err = ViewError::Rejected(format!("Attack failed: {UNKNOWN_ERROR}"));
                self.banner.error(&err, now);
            },
            Err(ApiError::Rejected { message }) => {
                let err = ViewError::Rejected(format!("Attack failed: {message}"));
                self.banner.error(&err, now);
            },
            Err(err) => self.banner.error(&ViewError::from_api(&err, RETRY), now),
        }
    }

    /// Attack picked in the selector.
    pub fn kind(&self) -> CipherAttackKind {
        self.kind
    }

    /// Ciphertext of the current or last run.
    pub fn ciphertext(&self) -> &str {
        &self.ciphertext
    }

    /// A request is in flight; the button is disabled.
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Round-trip time of the last run.
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    /// Candidates of the last successful run.
    pub fn results(&self) -> Option<&CrackResults> {
        self.results.as_ref()
    }

    /// Banner.
    pub fn banner(&self) -> &Banner<I> {
        &self.banner
    }
}

/// Both panels plus the selected tab.
#[derive(Debug, Clone)]
pub struct CrackBoard<I> {
    active: Panel,
    brute_force: CrackPanel<I>,
    dictionary: CrackPanel<I>,
}

impl<I: Moment> CrackBoard<I> {
    /// Idle panels, brute force selected.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            active: Panel::BruteForce,
            brute_force: CrackPanel::new(Panel::BruteForce, config),
            dictionary: CrackPanel::new(Panel::Dictionary, config),
        }
    }

    /// Switch tabs.
    pub fn select(&mut self, panel: Panel) -> Vec<AppAction> {
        self.active = panel;
        vec![AppAction::Render]
    }

    /// Run `kind` against `ciphertext` from `panel`.
    pub fn submit(
        &mut self,
        panel: Panel,
        kind: CipherAttackKind,
        ciphertext: &str,
        now: I,
        tickets: &mut Tickets,
    ) -> Vec<AppAction> {
        self.active = panel;
        self.panel_mut(panel).submit(kind, ciphertext, now, tickets)
    }

    /// Route a reply to the panel waiting for it.
    pub fn on_reply(
        &mut self,
        ticket: Ticket,
        outcome: Result<ApiReply, ApiError>,
        now: I,
    ) -> Vec<AppAction> {
        let Some(panel) = Panel::ALL.into_iter().find(|p| self.panel(*p).pending == Some(ticket))
        else {
            tracing::debug!(%ticket, "stale cipher attack reply discarded");
            return vec![];
        };
        self.panel_mut(panel).on_report(payload(outcome), now);
        vec![AppAction::Render]
    }

    /// Clear expired banners.
    pub fn on_tick(&mut self, now: I) -> Vec<AppAction> {
        let a = self.brute_force.banner.expire(now);
        let b = self.dictionary.banner.expire(now);
        if a || b { vec![AppAction::Render] } else { vec![] }
    }

    /// Hide both banners.
    pub fn dismiss(&mut self) -> Vec<AppAction> {
        self.brute_force.banner.clear();
        self.dictionary.banner.clear();
        vec![AppAction::Render]
    }

    /// Neither panel has a request in flight.
    pub fn is_settled(&self) -> bool {
        !self.brute_force.is_running() && !self.dictionary.is_running()
    }

    /// Selected tab.
    pub fn active(&self) -> Panel {
        self.active
    }

    /// Panel state.
    pub fn panel(&self, panel: Panel) -> &CrackPanel<I> {
        match panel {
            Panel::BruteForce => &self.brute_force,
            Panel::Dictionary => &self.dictionary,
        }
    }

    fn panel_mut(&mut self, panel: Panel) -> &mut CrackPanel<I> {
        match panel {
            Panel::BruteForce => &mut self.brute_force,
            Panel::Dictionary => &mut self.dictionary,
        }
    }
}

#[cfg(test)]
mod tests {
    use cipherlab_proto::ResultKey;

    use super::*;

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn board() -> CrackBoard<Duration> {
        CrackBoard::new(&AppConfig::default())
    }

    fn only_ticket(actions: &[AppAction]) -> Ticket {
        match actions {
            [AppAction::Call { ticket, .. }, AppAction::Render] => *ticket,
            other => panic!("unexpected actions: {other:?}"),
        }
    }

    #[test]
    fn whitespace_ciphertext_makes_no_call() {
        let mut board = board();
        let actions =
            board.submit(Panel::BruteForce, CipherAttackKind::Caesar, " \n\t", ms(0), &mut Tickets::new());

        assert_eq!(actions, vec![AppAction::Render]);
        let panel = board.panel(Panel::BruteForce);
        assert!(!panel.is_running());
        assert_eq!(panel.banner().error_text(), Some("Please enter a ciphertext to attack"));
    }

    #[test]
    fn panels_run_independently() {
        let mut board = board();
        let mut tickets = Tickets::new();

        let bf = only_ticket(&board.submit(
            Panel::BruteForce,
            CipherAttackKind::Caesar,
            "KHOOR",
            ms(0),
            &mut tickets,
        ));
        let dict = only_ticket(&board.submit(
            Panel::Dictionary,
            CipherAttackKind::PlayfairDict,
            "BMODZ",
            ms(0),
            &mut tickets,
        ));
        assert_ne!(bf, dict);

        // Busy panel ignores a second submission.
        assert!(
            board
                .submit(Panel::BruteForce, CipherAttackKind::HillBrute, "X", ms(1), &mut tickets)
                .is_empty()
        );

        let report = CipherAttackReport {
            label: "Caesar Brute-Force".into(),
            results: Some(vec![AttackResult {
                key: ResultKey::Number(3),
                plaintext: "HELLO".into(),
                is_likely: true,
            }]),
        };
        board.on_reply(bf, Ok(ApiReply::CipherAttack(report)), ms(1_500));

        let panel = board.panel(Panel::BruteForce);
        assert_eq!(panel.elapsed(), Some(ms(1_500)));
        assert_eq!(panel.results().map(|r| r.results.len()), Some(1));
        assert!(board.panel(Panel::Dictionary).is_running());
        assert!(!board.is_settled());
    }

    #[test]
    fn failure_messages() {
        let mut tickets = Tickets::new();
        let cases = [
            (
                Ok(ApiReply::CipherAttack(CipherAttackReport { label: "X".into(), results: None })),
                "Attack failed: Unknown error",
            ),
            (Err(ApiError::Rejected { message: "Invalid cipher type.".into() }), "Attack failed: Invalid cipher type."),
            (Err(ApiError::Transport("refused".into())), RETRY),
        ];

        for (outcome, expected) in cases {
            let mut board = board();
            let t = only_ticket(&board.submit(
                Panel::Dictionary,
                CipherAttackKind::HillDict,
                "ABCD",
                ms(0),
                &mut tickets,
            ));
            board.on_reply(t, outcome, ms(10));

            let panel = board.panel(Panel::Dictionary);
            assert!(!panel.is_running(), "control re-enabled");
            assert_eq!(panel.banner().error_text(), Some(expected));
            assert!(panel.results().is_none());
        }
    }

    #[test]
    fn panel_names_round_trip() {
        for panel in Panel::ALL {
            assert_eq!(panel.as_str().parse::<Panel>(), Ok(panel));
            for kind in panel.kinds() {
                assert_eq!(Panel::for_kind(*kind), panel);
            }
        }
    }
}
