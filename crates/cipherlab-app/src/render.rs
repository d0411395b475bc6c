//! HTML rendering.
//!
//! Pure functions from view state to HTML. Page skeletons are askama
//! templates under `templates/`, which escape what they interpolate.
//! Repeated fragments (results, log lines, message bubbles) are written
//! directly, and every string from the server or the user in them passes
//! through [`escape_html`]. Templates embed fragments with `|safe`, so
//! fragments are only ever produced by this module.

use std::{fmt::Write, time::Duration};

use askama::Template;
use cipherlab_proto::{AttackMethod, AttackResult, ConversationMessage, UserSummary};

use crate::{
    App,
    notice::Banner,
    time::Moment,
    views::{
        AttackSession, AuthForm, ConversationView, CrackBoard, CrackPanel, CrackResults,
        Directory, LogEntry, Panel, Progress, View, Workbench,
    },
};

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate {
    name: &'static str,
    body: String,
}

struct NavLink {
    page: &'static str,
    label: &'static str,
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    links: Vec<NavLink>,
}

#[derive(Template)]
#[template(path = "auth.html")]
struct AuthTemplate<'a> {
    notice: String,
    username: &'a str,
    busy: bool,
}

struct Found<'a> {
    password: &'a str,
    attempts: u64,
    duration: String,
}

#[derive(Template)]
#[template(path = "attack.html")]
struct AttackTemplate<'a> {
    notice: String,
    method: &'static str,
    username: &'a str,
    busy: bool,
    progress: String,
    found: Option<Found<'a>>,
    log: String,
}

struct Tab {
    panel: Panel,
    title: &'static str,
    active: bool,
}

#[derive(Template)]
#[template(path = "crack.html")]
struct CrackTemplate {
    tabs: Vec<Tab>,
    panels: String,
}

#[derive(Template)]
#[template(path = "crack_panel.html")]
struct CrackPanelTemplate<'a> {
    panel: Panel,
    kind: String,
    notice: String,
    ciphertext: &'a str,
    busy: bool,
    results: String,
}

struct Analysis {
    capacity_chars: u64,
    binary_length: u64,
}

#[derive(Template)]
#[template(path = "conversation.html")]
struct ConversationTemplate {
    peer: String,
    notice: String,
    analysis: Option<Analysis>,
    messages: String,
}

/// Escape text for use in element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Whole page for the app's current view.
pub fn page<I: Moment>(app: &App<I>) -> String {
    let body = match app.view() {
        View::Home => home(),
        View::Auth(form) => auth(form),
        View::Attack(session) => attack(session),
        View::Crack(board) => crack(board),
        View::Workbench(bench) => workbench(bench),
        View::Directory(dir) => directory(dir),
        View::Conversation(conv) => conversation(conv),
    };
    PageTemplate { name: app.page().name(), body }.render().unwrap_or_default()
}

/// Banner slot. Empty when nothing is shown.
pub fn notice<I: Moment>(banner: &Banner<I>) -> String {
    let Some(notice) = banner.current() else {
        return String::new();
    };
    let kind = notice.kind.map(|k| format!(" data-kind=\"{k}\"")).unwrap_or_default();
    format!(
        "<div class=\"notice {}\"{kind}>{}</div>",
        notice.tone.as_str(),
        escape_html(&notice.text)
    )
}

/// Progress bar.
pub fn progress(progress: &Progress) -> String {
    format!(
        "<div class=\"progress\"><div class=\"progress-bar\" style=\"width: {p}%\"></div>\
         <span class=\"progress-label\">{label}</span></div>",
        p = progress.percent,
        label = escape_html(&progress.label)
    )
}

/// Attack log, oldest line first.
pub fn log(entries: &[LogEntry]) -> String {
    if entries.is_empty() {
        return "<div class=\"log\"><p class=\"log-empty\">Ready to launch an attack...</p></div>"
            .to_string();
    }
    let mut out = String::from("<div class=\"log\">");
    for entry in entries {
        let _ = write!(
            out,
            "<p class=\"log-line {}\"><span class=\"log-time\">+{:.1}s</span> {}</p>",
            entry.kind.as_str(),
            entry.at.as_secs_f64(),
            escape_html(&entry.text)
        );
    }
    out.push_str("</div>");
    out
}

/// Cipher-attack candidates.
pub fn results(results: &CrackResults, elapsed_secs: Option<f64>) -> String {
    let found = results.results.iter().filter(|r| r.is_likely).count();
    let mut out = String::from("<div class=\"results\">");
    let _ = write!(
        out,
        "<div class=\"stats\"><span class=\"tested\">{}</span><span class=\"found\">{found}</span>",
        results.results.len()
    );
    if let Some(secs) = elapsed_secs {
        let _ = write!(out, "<span class=\"elapsed\">{secs:.1}s</span>");
    }
    out.push_str("</div><div class=\"progress\"><div class=\"progress-bar\" style=\"width: 100%\"></div></div>");

    if results.results.is_empty() {
        out.push_str("<p class=\"empty-state\">No results found with the current attack method.</p>");
    } else {
        let _ = write!(
            out,
            "<p class=\"results-header\"><strong>{}</strong> - Found {} result(s)</p><ul>",
            escape_html(&results.label),
            results.results.len()
        );
        for result in &results.results {
            out.push_str(&result_item(result));
        }
        out.push_str("</ul>");
    }
    out.push_str("</div>");
    out
}

fn result_item(result: &AttackResult) -> String {
    let (class, mark) = if result.is_likely { ("result-item likely", "✅") } else { ("result-item", "❌") };
    format!(
        "<li class=\"{class}\">{mark} <span class=\"key\">Key: {}</span> \
         <span class=\"plaintext\">Plaintext: {}</span></li>",
        escape_html(&result.key.to_string()),
        escape_html(&result.plaintext)
    )
}

fn home() -> String {
    let links = [
        ("auth", "Sign in"),
        ("attack", "Password attack"),
        ("crack", "Cipher attacks"),
        ("workbench", "Cipher workbench"),
        ("directory", "Users"),
    ]
    .into_iter()
    .map(|(page, label)| NavLink { page, label })
    .collect();
    HomeTemplate { links }.render().unwrap_or_default()
}

fn auth<I: Moment>(form: &AuthForm<I>) -> String {
    AuthTemplate {
        notice: notice(form.banner()),
        username: form.username(),
        busy: form.pending_mode().is_some(),
    }
    .render()
    .unwrap_or_default()
}

fn attack<I: Moment>(session: &AttackSession<I>) -> String {
    let found = session.outcome().and_then(|outcome| {
        let password = outcome.password.as_deref().filter(|_| outcome.found)?;
        Some(Found {
            password,
            attempts: outcome.attempts,
            duration: format!("{:.2}", outcome.duration),
        })
    });
    AttackTemplate {
        notice: notice(session.banner()),
        method: session.selected().map_or("", AttackMethod::as_str),
        username: session.username(),
        busy: session.status().is_in_flight(),
        progress: session.progress().map(progress).unwrap_or_default(),
        found,
        log: log(session.log()),
    }
    .render()
    .unwrap_or_default()
}

fn crack<I: Moment>(board: &CrackBoard<I>) -> String {
    let tabs = Panel::ALL
        .into_iter()
        .map(|panel| Tab { panel, title: panel.title(), active: panel == board.active() })
        .collect();
    let panels = Panel::ALL.into_iter().map(|panel| crack_panel(panel, board.panel(panel))).collect();
    CrackTemplate { tabs, panels }.render().unwrap_or_default()
}

fn crack_panel<I: Moment>(panel: Panel, state: &CrackPanel<I>) -> String {
    let results = state
        .results()
        .map(|found| results(found, state.elapsed().as_ref().map(Duration::as_secs_f64)))
        .unwrap_or_default();
    CrackPanelTemplate {
        panel,
        kind: state.kind().to_string(),
        notice: notice(state.banner()),
        ciphertext: state.ciphertext(),
        busy: state.is_running(),
        results,
    }
    .render()
    .unwrap_or_default()
}

fn workbench<I: Moment>(bench: &Workbench<I>) -> String {
    let mut out = notice(bench.banner());
    if let Some(ciphertext) = bench.encrypted() {
        let _ = write!(out, "<output class=\"encrypted\">{}</output>", escape_html(ciphertext));
    }
    match bench.decrypted() {
        Some(plaintext) => {
            let _ = write!(out, "<output class=\"decrypted\">{}</output>", escape_html(plaintext));
        },
        None if !bench.ciphertext().is_empty() => {
            let _ = write!(out, "<output class=\"ciphertext\">{}</output>", escape_html(bench.ciphertext()));
        },
        None => {},
    }
    out
}

fn directory<I: Moment>(dir: &Directory<I>) -> String {
    let mut out = notice(dir.banner());
    out.push_str(&user_list(dir.users(), dir.is_loaded()));
    out
}

/// Recipient list.
pub fn user_list(users: &[UserSummary], loaded: bool) -> String {
    if !loaded {
        return "<p class=\"loading\">Loading users...</p>".to_string();
    }
    if users.is_empty() {
        return "<p class=\"empty-state\">No users found</p>".to_string();
    }
    let mut out = String::from("<ul class=\"users\">");
    for user in users {
        let _ = write!(out, "<li data-user=\"{}\">{}</li>", user.id, escape_html(&user.username));
    }
    out.push_str("</ul>");
    out
}

fn conversation<I: Moment>(conv: &ConversationView<I>) -> String {
    let peer = conv.peer_name().map_or_else(|| format!("User {}", conv.peer()), str::to_string);
    let analysis = conv.receipt().and_then(|r| r.analysis.as_ref()).map(|a| Analysis {
        capacity_chars: a.original.capacity_chars,
        binary_length: a.binary_length,
    });
    ConversationTemplate { peer, notice: notice(conv.banner()), analysis, messages: messages(conv) }
        .render()
        .unwrap_or_default()
}

fn messages<I: Moment>(conv: &ConversationView<I>) -> String {
    if !conv.is_loaded() {
        return "<p class=\"loading\">Loading messages...</p>".to_string();
    }
    if conv.messages().is_empty() {
        return "<p class=\"empty-state\">No messages yet</p>".to_string();
    }
    let mut out = String::from("<div class=\"messages\">");
    for message in conv.messages() {
        out.push_str(&bubble(conv, message));
    }
    out.push_str("</div>");
    out
}

fn bubble<I: Moment>(conv: &ConversationView<I>, message: &ConversationMessage) -> String {
    let received = conv.is_received(message);
    let side = if received { "received" } else { "sent" };
    let author = if received {
        message.sender().map_or_else(|| "Unknown".to_string(), |u| escape_html(&u.username))
    } else {
        "You".to_string()
    };
    let busy = if conv.is_busy(message.id()) { " disabled" } else { "" };
    let revealed = conv.revealed(message.id());

    let body = match message {
        ConversationMessage::Crypto(m) => {
            let text = revealed.unwrap_or(&m.encrypted);
            let mut body = format!(
                "<span class=\"badge\">(Crypto)</span> <span class=\"algo\">{}</span>\
                 <p class=\"text\">{}</p>",
                m.algo_name.label(),
                escape_html(text)
            );
            if received && revealed.is_none() {
                let _ = write!(body, "<button data-decrypt=\"{}\"{busy}>Decrypt</button>", m.id);
            }
            body
        },
        ConversationMessage::Stego(m) => {
            let mut body = format!(
                "<span class=\"badge\">(Audio)</span>\
                 <audio controls src=\"/api/stego/audio/{}\"></audio>",
                escape_html(&m.audio_filename)
            );
            match revealed {
                Some(text) => {
                    let _ = write!(
                        body,
                        "<p class=\"extracted\">Extracted message: &quot;{}&quot;</p>",
                        escape_html(text)
                    );
                },
                None if received => {
                    let _ = write!(body, "<button data-extract=\"{}\"{busy}>Extract</button>", m.id);
                },
                None => {},
            }
            body
        },
    };

    format!(
        "<div class=\"bubble {side}\" data-message=\"{}\"><span class=\"author\">{author}</span> \
         <time>{}</time>{body}</div>",
        message.id(),
        escape_html(message.date_created())
    )
}

#[cfg(test)]
mod tests {
    use cipherlab_proto::ResultKey;

    use super::*;

    #[test]
    fn escapes_all_specials() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn empty_results_show_empty_state() {
        let html = results(&CrackResults { label: "Caesar".into(), results: vec![] }, None);
        assert!(html.contains("No results found with the current attack method."));
        assert!(!html.contains("<ul>"));
    }

    #[test]
    fn likely_results_are_marked() {
        let found = CrackResults {
            label: "Caesar Brute-Force".into(),
            results: vec![
                AttackResult { key: ResultKey::Number(3), plaintext: "HELLO".into(), is_likely: true },
                AttackResult { key: ResultKey::Number(4), plaintext: "GDKKN".into(), is_likely: false },
            ],
        };
        let html = results(&found, Some(1.26));

        assert!(html.contains("<strong>Caesar Brute-Force</strong> - Found 2 result(s)"));
        assert!(html.contains("<li class=\"result-item likely\">✅ <span class=\"key\">Key: 3</span>"));
        assert!(html.contains("<li class=\"result-item\">❌"));
        assert!(html.contains("1.3s"));
    }

    #[test]
    fn empty_log_placeholder() {
        assert!(log(&[]).contains("Ready to launch an attack..."));
    }
}
