//! Property-based tests for the App state machine.
//!
//! Arbitrary event sequences must keep the page invariants: blank input
//! never reaches the network, at most one password attack call is
//! outstanding, and render requests are collapsed.

use std::time::Duration;

use cipherlab_app::{
    ApiCall, ApiReply, App, AppAction, AppConfig, AppEvent, Intent, Page, Ticket,
    views::Panel,
};
use cipherlab_proto::{Algorithm, AttackMethod, AttackOutcome, CipherAttackKind, KeyParams, UserCheck};
use proptest::prelude::*;

fn blank() -> impl Strategy<Value = String> {
    "[ \t\r\n]{0,6}"
}

fn has_call(actions: &[AppAction]) -> bool {
    actions.iter().any(|a| matches!(a, AppAction::Call { .. }))
}

/// Steps a user can take on the attack page, plus server answers.
#[derive(Debug, Clone)]
enum Step {
    Select(AttackMethod),
    Start(String),
    Tick(u64),
    /// Answer the oldest outstanding call.
    Answer { exists: bool, found: bool },
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        1 => prop::sample::select(AttackMethod::ALL.to_vec()).prop_map(Step::Select),
        2 => prop_oneof![Just("alice".to_string()), Just(" ".to_string())].prop_map(Step::Start),
        2 => (0u64..4_000).prop_map(Step::Tick),
        3 => (any::<bool>(), any::<bool>()).prop_map(|(exists, found)| Step::Answer { exists, found }),
    ]
}

fn answer(call: &ApiCall, exists: bool, found: bool) -> ApiReply {
    match call {
        ApiCall::CheckUser(_) => ApiReply::UserCheck(UserCheck { exists }),
        ApiCall::StartAttack(_) => ApiReply::Attack(AttackOutcome {
            found,
            password: found.then(|| "234".to_string()),
            attempts: 1,
            duration: 0.1,
        }),
        _ => ApiReply::Ack(cipherlab_proto::Ack::default()),
    }
}

proptest! {
    #[test]
    fn prop_blank_username_sends_nothing(username in blank(), method in prop::sample::select(AttackMethod::ALL.to_vec())) {
        let mut app = App::<Duration>::new(AppConfig::default());
        app.navigate(Page::Attack, Duration::ZERO);
        app.handle(AppEvent::Intent(Intent::SelectMethod(method)), Duration::ZERO);

        let actions = app.handle(AppEvent::Intent(Intent::StartAttack { username }), Duration::ZERO);
        prop_assert!(!has_call(&actions));
        prop_assert!(app.is_settled());
    }

    #[test]
    fn prop_blank_ciphertext_sends_nothing(
        ciphertext in blank(),
        kind in prop::sample::select(CipherAttackKind::ALL.to_vec()),
    ) {
        let mut app = App::<Duration>::new(AppConfig::default());
        app.navigate(Page::Crack, Duration::ZERO);
        let panel = Panel::for_kind(kind);

        let actions = app.handle(AppEvent::Intent(Intent::Crack { panel, kind, ciphertext }), Duration::ZERO);
        prop_assert!(!has_call(&actions));
    }

    #[test]
    fn prop_blank_workbench_input_sends_nothing(text in blank()) {
        let mut app = App::<Duration>::new(AppConfig::default());
        app.navigate(Page::Workbench, Duration::ZERO);
        let key_params = KeyParams::default_for(Algorithm::Caesar);

        let encrypt = Intent::Encrypt { message: text.clone(), algorithm: Algorithm::Caesar, key_params: key_params.clone() };
        prop_assert!(!has_call(&app.handle(AppEvent::Intent(encrypt), Duration::ZERO)));
        let decrypt = Intent::Decrypt { ciphertext: text, algorithm: Algorithm::Caesar, key_params };
        prop_assert!(!has_call(&app.handle(AppEvent::Intent(decrypt), Duration::ZERO)));
    }

    #[test]
    fn prop_attack_page_invariants(steps in prop::collection::vec(step_strategy(), 1..40)) {
        let mut app = App::<Duration>::new(AppConfig::default());
        app.navigate(Page::Attack, Duration::ZERO);
        let mut now = Duration::ZERO;
        let mut outstanding: Vec<(Ticket, ApiCall)> = Vec::new();

        for step in steps {
            let actions = match step {
                Step::Select(method) => app.handle(AppEvent::Intent(Intent::SelectMethod(method)), now),
                Step::Start(username) => app.handle(AppEvent::Intent(Intent::StartAttack { username }), now),
                Step::Tick(ms) => {
                    now += Duration::from_millis(ms);
                    app.handle(AppEvent::Tick, now)
                },
                Step::Answer { exists, found } => {
                    if outstanding.is_empty() {
                        continue;
                    }
                    let (ticket, call) = outstanding.remove(0);
                    let reply = answer(&call, exists, found);
                    app.handle(AppEvent::Reply { ticket, outcome: Ok(reply) }, now)
                },
            };

            let renders = actions.iter().filter(|a| **a == AppAction::Render).count();
            prop_assert!(renders <= 1);
            if renders == 1 {
                prop_assert_eq!(actions.last(), Some(&AppAction::Render));
            }

            // Navigation away ends the session; nothing else to check.
            if actions.iter().any(|a| matches!(a, AppAction::Navigate(_))) {
                break;
            }

            for action in actions {
                if let AppAction::Call { ticket, call } = action {
                    outstanding.push((ticket, call));
                }
            }
            prop_assert!(outstanding.len() <= 1, "more than one call in flight: {:?}", outstanding);
            if !outstanding.is_empty() {
                prop_assert!(!app.is_settled());
            }
        }
    }
}
